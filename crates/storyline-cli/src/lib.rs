//! Storyline command-line host.
//!
//! Loads a structure and a scene list, builds a story document and renders
//! its timeline view as JSON.

pub mod config;
pub mod error;
pub mod host;
