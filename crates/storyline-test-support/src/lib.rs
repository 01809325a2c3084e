//! Shared test fixtures and listeners for the Storyline timeline.

mod fixtures;
mod listener;

pub use fixtures::{MidpointFixture, assert_percentage, midpoint_structure, scenes_on};
pub use listener::RecordingListener;
