//! Structure and scene fixtures.

use storyline_structure::domain::beats::{Beat, BeatId};
use storyline_structure::domain::scenes::Scene;
use storyline_structure::domain::structure::Structure;

/// A two-boundary structure with a milestone in each of its three acts.
///
/// | beat      | kind         | act | percentage |
/// |-----------|--------------|-----|------------|
/// | Catalyst  | milestone    | 1   | 30         |
/// | Midpoint  | act boundary | 1   | 50         |
/// | Crisis    | milestone    | 2   | 70         |
/// | Climax    | act boundary | 2   | 90         |
/// | Resolve   | milestone    | 3   | 95         |
#[derive(Debug, Clone)]
pub struct MidpointFixture {
    pub structure: Structure,
    pub catalyst: BeatId,
    pub midpoint: BeatId,
    pub crisis: BeatId,
    pub climax: BeatId,
    pub resolve: BeatId,
}

/// Builds the [`MidpointFixture`].
#[must_use]
pub fn midpoint_structure() -> MidpointFixture {
    let catalyst = Beat::milestone("Catalyst", 1, 30.0);
    let midpoint = Beat::act_boundary("Midpoint", 1, 50.0);
    let crisis = Beat::milestone("Crisis", 2, 70.0);
    let climax = Beat::act_boundary("Climax", 2, 90.0);
    let resolve = Beat::milestone("Resolve", 3, 95.0);
    MidpointFixture {
        catalyst: catalyst.id,
        midpoint: midpoint.id,
        crisis: crisis.id,
        climax: climax.id,
        resolve: resolve.id,
        structure: Structure::new("Midpoint fixture")
            .with_beats([catalyst, midpoint, crisis, climax, resolve]),
    }
}

/// One scene per entry, linked to the given beat of `structure` when the
/// entry is `Some`.
#[must_use]
pub fn scenes_on(structure: &Structure, beats: &[Option<BeatId>]) -> Vec<Scene> {
    beats
        .iter()
        .enumerate()
        .map(|(i, beat)| {
            let mut scene = Scene::new(format!("Scene {}", i + 1));
            if let Some(beat_id) = beat {
                scene.assign_beat(structure.id, *beat_id);
            }
            scene
        })
        .collect()
}

/// Asserts two percentages are equal up to float noise.
///
/// # Panics
///
/// Panics if they differ by more than `1e-9`.
pub fn assert_percentage(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}%, got {actual}%"
    );
}
