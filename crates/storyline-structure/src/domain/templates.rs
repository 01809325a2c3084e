//! Built-in story structure templates.
//!
//! Template beats carry fixed identifiers so that scene references survive
//! a structure being re-created from its template.

use uuid::Uuid;

use super::beats::Beat;
use super::structure::Structure;

const THREE_ACT_ID: Uuid = Uuid::from_u128(0x5801_3be5_1efb_4de4_9dd2_1433_ce6e_df90);
const SAVE_THE_CAT_ID: Uuid = Uuid::from_u128(0x1f1c_4433_6afa_48e1_a8dc_f8fc_b94b_fede);

fn shipped(id: Uuid, title: &str, beats: Vec<Beat>) -> Structure {
    let mut structure = Structure::new(title).with_id(id).with_beats(beats);
    structure.custom = false;
    structure
}

/// The classic three act structure with two plot points and two pinches.
#[must_use]
pub fn three_act_structure() -> Structure {
    shipped(
        THREE_ACT_ID,
        "Three Act Structure",
        vec![
            Beat::milestone("Hook", 1, 1.0)
                .with_id(Uuid::from_u128(0x4036_5047_e7df_4543_8816_f9f8_dcce_12da))
                .with_description("Raises curiosity and sets expectations for the story."),
            Beat::milestone("Inciting Incident", 1, 10.0)
                .with_id(Uuid::from_u128(0xa0c2_d94a_b53c_485e_a279_f254_8bdb_38ec))
                .with_description("The first event that changes the protagonist's status quo."),
            Beat::act_boundary("First Plot Point", 1, 20.0)
                .with_id(Uuid::from_u128(0x8d85_c960_1c63_44d4_812d_545d_3ba4_d153))
                .with_description("Point of no return that commits the protagonist."),
            Beat::milestone("First Pinch Point", 2, 35.0)
                .with_id(Uuid::from_u128(0xaf02_4374_12e6_44dc_80e6_28f2_bc0e_59ed))
                .with_description("A reminder of the antagonistic forces."),
            Beat::milestone("Midpoint", 2, 50.0)
                .with_id(Uuid::from_u128(0x3f81_7e10_85d1_46af_91c6_70f1_ad5c_0542))
                .with_description("Raises the stakes; the protagonist turns proactive."),
            Beat::milestone("Second Pinch Point", 2, 62.0)
                .with_id(Uuid::from_u128(0x7408_7e28_b37a_4797_95bc_41d9_6f6a_9393))
                .with_description("The antagonistic forces at full strength."),
            Beat::milestone("Dark Moment", 2, 75.0)
                .with_id(Uuid::from_u128(0x4ded_5006_c90a_4825_9de7_e16b_f620_17a3))
                .with_description("All-time low for the protagonist."),
            Beat::act_boundary("Second Plot Point", 2, 80.0)
                .with_id(Uuid::from_u128(0x9570_5e5e_a6b8_4abe_b2ea_426f_2ae8_d020))
                .with_description("The last piece of information that launches the climax."),
            Beat::milestone("Crisis", 3, 95.0)
                .with_id(Uuid::from_u128(0x4666_88f7_ebee_4d36_a655_83ff_40e1_c46d))
                .with_description("A choice between two bad or two irreconcilable options.")
                .disabled(),
            Beat::milestone("Climax", 3, 97.0)
                .with_id(Uuid::from_u128(0x342e_b27c_52ff_40c2_8c5e_cf56_3d4e_38bc))
                .with_description("The final confrontation; the dramatic question resolves."),
            Beat::milestone("Resolution", 3, 99.0)
                .with_id(Uuid::from_u128(0x9966_95b1_8db6_4c68_8dc4_51bb_fe72_0e8b))
                .with_description("An after snapshot that ties up loose ends."),
        ],
    )
}

/// Blake Snyder's beat sheet, including its container spans.
#[must_use]
pub fn save_the_cat() -> Structure {
    shipped(
        SAVE_THE_CAT_ID,
        "Save the Cat",
        vec![
            Beat::milestone("Opening Image", 1, 1.0)
                .with_id(Uuid::from_u128(0x249b_ba52_98b8_4577_8b3c_9448_1f6b_f622))
                .with_description("Establishes the setting and the protagonist."),
            Beat::container("Setup", 1, 1.0, 10.0)
                .with_id(Uuid::from_u128(0x7ce4_345b_60eb_4cd6_98cc_7cce_9802_8839)),
            Beat::milestone("Theme Stated", 1, 5.0)
                .with_id(Uuid::from_u128(0x1c8b_0903_f169_48d5_bcec_3e84_2f36_0150))
                .with_description("Hints at the lesson the protagonist will learn."),
            Beat::milestone("Catalyst", 1, 10.0)
                .with_id(Uuid::from_u128(0xcc3d_8641_bcdf_402b_ba84_7ff5_9b2c_c76a))
                .with_description("The event that upsets the status quo."),
            Beat::container("Debate", 1, 10.0, 20.0)
                .with_id(Uuid::from_u128(0x0203_696e_dc54_4a10_820a_bfdf_392a_82dc)),
            Beat::act_boundary("Break into Two", 1, 20.0)
                .with_id(Uuid::from_u128(0x43eb_267f_2840_437b_9eac_9e52_d80e_ba2b))
                .with_description("The protagonist decides and enters a new world."),
            Beat::milestone("B Story", 2, 22.0)
                .with_id(Uuid::from_u128(0x6422_9c74_5513_4391_9b45_c54a_d106_c137))
                .with_description("Introduces the thematic story of the journey."),
            Beat::container("Fun and Games", 2, 20.0, 50.0)
                .with_id(Uuid::from_u128(0x4901_57f0_f255_4ab3_82f3_bc5c_b22c_e03b)),
            Beat::milestone("Midpoint", 2, 50.0)
                .with_id(Uuid::from_u128(0xaf4f_b4e9_f287_47b6_b219_be75_af75_2622))
                .with_description("A false victory or false defeat that raises the stakes."),
            Beat::container("Bad Guys Close In", 2, 50.0, 75.0)
                .with_id(Uuid::from_u128(0x2060_c95f_dcdb_4074_a096_4b05_4f70_d57a)),
            Beat::milestone("All is Lost", 2, 75.0)
                .with_id(Uuid::from_u128(0x2971_ce1a_eb69_4ac1_9f2d_7440_7e6f_ac92))
                .with_description("All-time low for the protagonist."),
            Beat::milestone("Return to the Familiar", 2, 77.0)
                .with_id(Uuid::from_u128(0xaed2_a29a_2d9d_4f5e_8539_7358_8b77_4101))
                .with_description("The old world no longer feels the same.")
                .disabled(),
            Beat::container("Dark Night of the Soul", 2, 75.0, 80.0)
                .with_id(Uuid::from_u128(0xc0e8_9a87_224d_4b97_b4f5_a2ac_e08f_dadb)),
            Beat::act_boundary("Break into Three", 2, 80.0)
                .with_id(Uuid::from_u128(0x677f_83ad_355a_47fb_8ff7_8129_97bd_b23a))
                .with_description("The protagonist realizes how to fix their flaws."),
            Beat::container("Finale", 3, 80.0, 99.0)
                .with_id(Uuid::from_u128(0x1019_1cac_7786_4e85_9a36_75f9_9be2_2b92)),
            Beat::milestone("Gather the Team", 3, 84.0)
                .with_id(Uuid::from_u128(0x777d_81b6_b427_4fc0_ba8d_01cd_e45e_edde)),
            Beat::milestone("Execute the Plan", 3, 86.0)
                .with_id(Uuid::from_u128(0xb990_12a6_8c41_43c8_845d_7595_ce71_40d9)),
            Beat::milestone("High Tower Surprise", 3, 88.0)
                .with_id(Uuid::from_u128(0xfe77_f4f2_9064_4b06_8062_9206_35aa_415c)),
            Beat::milestone("Dig Deep Down", 3, 90.0)
                .with_id(Uuid::from_u128(0xa5c4_d0aa_9811_4988_8611_3483_b249_9732)),
            Beat::milestone("Execute a New Plan", 3, 95.0)
                .with_id(Uuid::from_u128(0x13d5_35f6_6b3d_4211_ae44_e0fc_f397_0186)),
            Beat::milestone("Final Image", 3, 99.0)
                .with_id(Uuid::from_u128(0x12d5_ec21_af96_4e51_9c26_0658_3d83_0d87))
                .with_description("An after snapshot that mirrors the opening image."),
        ],
    )
}

/// All shipped templates.
#[must_use]
pub fn default_structures() -> Vec<Structure> {
    vec![three_act_structure(), save_the_cat()]
}

fn slug(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Finds a shipped template by title, ignoring case and punctuation
/// (`"save-the-cat"`, `"Save the Cat"`).
#[must_use]
pub fn by_name(name: &str) -> Option<Structure> {
    let wanted = slug(name);
    default_structures()
        .into_iter()
        .find(|structure| slug(&structure.title) == wanted)
}
