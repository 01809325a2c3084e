//! Domain model for the Story Structure context.

pub mod beats;
pub mod commands;
pub mod events;
pub mod scenes;
pub mod structure;
pub mod templates;
