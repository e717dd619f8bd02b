//! Profile loading integration tests
//!
//! Exercises the loader against the on-disk fixture set: well-formed
//! files in sorted order, a malformed file that must be skipped, and the
//! defaulted icon references.

use macro_deck::action::{Action, MediaStep};
use macro_deck::hid::keycodes::{ConsumerCode, Keycode};
use macro_deck::profiles::loader::load_profiles;
use macro_deck::Rgb;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/profiles")
}

#[test]
fn test_loads_fixture_set_in_order() {
    let profiles = load_profiles(&fixtures_dir());

    // 30-broken.toml is skipped; the rest load in file-name order
    let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Premiere", "Media", "Minimal"]);
}

#[test]
fn test_premiere_bindings_parse_fully() {
    let profiles = load_profiles(&fixtures_dir());
    let premiere = &profiles[0];

    assert_eq!(premiere.icon, "premiere.png");
    assert_eq!(premiere.binding_count(), 3);

    let undo = premiere.binding(0).unwrap();
    assert_eq!(undo.color, Rgb(0xBB51FB));
    assert_eq!(undo.label, "Undo");
    assert_eq!(
        undo.sequence,
        vec![
            Action::KeyDown(Keycode::LeftCtrl),
            Action::KeyDown(Keycode::Z),
            Action::KeyUp(Keycode::Z),
            Action::KeyUp(Keycode::LeftCtrl),
        ]
    );

    let cut = premiere.binding(1).unwrap();
    assert_eq!(cut.sequence, vec![Action::Text("c".to_string())]);

    assert!(premiere.binding(3).is_none());
    assert!(!premiere.has_encoder_binding());
}

#[test]
fn test_media_profile_mixes_action_kinds() {
    let profiles = load_profiles(&fixtures_dir());
    let media = &profiles[1];

    let next = media.binding(1).unwrap();
    assert_eq!(
        next.sequence,
        vec![Action::Media(vec![
            MediaStep::Code(ConsumerCode::NextTrack),
            MediaStep::Delay(0.1),
            MediaStep::Code(ConsumerCode::VolumeUp),
        ])]
    );

    let drag = media.binding(2).unwrap();
    assert!(matches!(drag.sequence[0], Action::Mouse(_)));
    assert_eq!(drag.sequence[1], Action::Delay(0.05));
}

#[test]
fn test_default_icon_follows_loaded_index() {
    let profiles = load_profiles(&fixtures_dir());

    // "Media" is the second successfully loaded profile, "Minimal" the
    // third; neither names an icon, so they default by loaded index.
    assert_eq!(profiles[1].icon, "1.png");
    assert_eq!(profiles[2].icon, "2.png");
}

#[test]
fn test_minimal_profile_has_no_bindings() {
    let profiles = load_profiles(&fixtures_dir());
    let minimal = &profiles[2];

    assert_eq!(minimal.binding_count(), 0);
    for index in 0..13 {
        assert!(minimal.binding(index).is_none());
    }
}
