//! Storyline — Story Structure bounded context.
//!
//! Responsible for the beat timeline of a story structure: the act
//! partition, the derived act membership of scenes, and the proportional
//! layout math used when beats and act boundaries are dragged.

pub mod application;
pub mod domain;
