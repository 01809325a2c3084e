//! Application layer for the Story Structure context.

pub mod acts_registry;
pub mod command_handlers;
pub mod document;
pub mod layout;
pub mod query_handlers;
