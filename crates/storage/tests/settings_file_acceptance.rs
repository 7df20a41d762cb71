use shared::domain::{SourceMode, StatusToken};
use storage::SettingsStore;

#[test]
fn loads_partial_hand_written_settings_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SettingsStore::in_dir(dir.path());
    std::fs::write(
        store.path(),
        r##"{
  "mode": "buttons",
  "sheet_link": "https://example.com/pub?output=csv",
  "weather_cell": "M7",
  "manual_range": "no go",
  "gn_font_px": 32,
  "some_future_key": true
}"##,
    )
    .expect("write");

    let settings = store.load();
    assert_eq!(settings.mode, SourceMode::Buttons);
    assert_eq!(settings.weather_cell, "M7");
    assert_eq!(settings.range_cell, "L2");
    assert_eq!(settings.manual_range, StatusToken::NoGo);
    assert_eq!(settings.appearance.gn_font_px, 32);
    assert_eq!(settings.appearance.bg_color, "#000000");
    assert_eq!(settings.timezone, "local");
}
