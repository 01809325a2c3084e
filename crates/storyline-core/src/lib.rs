//! Storyline Core — shared domain abstractions.
//!
//! This crate defines the error type and the command and change-notification
//! traits that the structure context builds on. It contains no layout or
//! registry code.

pub mod command;
pub mod error;
pub mod event;
