// Kept in its own integration-test binary: the tests below redirect the
// config directory through COMPETIA_CONFIG_DIR, which is process-global.

use chrono::{Duration, Utc};
use competia_cli::config::SettingsCache;
use competia_cli::models::PlatformSettings;
use serde_json::json;

#[test]
fn test_store_then_load_fresh_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("COMPETIA_CONFIG_DIR", dir.path());

    let mut settings = PlatformSettings::default();
    settings.platform_name = "Olimpíada do Conhecimento".to_string();
    settings.primary_color = "#aa0000".to_string();

    SettingsCache::store(&settings).unwrap();

    let loaded = SettingsCache::load_fresh().expect("freshly stored cache should load");
    assert_eq!(loaded.platform_name, "Olimpíada do Conhecimento");
    assert_eq!(loaded.primary_color, "#aa0000");

    // A stale timestamp invalidates the cache
    let stale = json!({
        "settings": PlatformSettings::default(),
        "fetched_at": Utc::now() - Duration::minutes(10),
    });
    std::fs::write(
        dir.path().join("settings_cache.json"),
        stale.to_string(),
    )
    .unwrap();

    assert!(SettingsCache::load_fresh().is_none());

    // As does a corrupt cache file
    std::fs::write(dir.path().join("settings_cache.json"), "not json").unwrap();
    assert!(SettingsCache::load_fresh().is_none());

    std::env::remove_var("COMPETIA_CONFIG_DIR");
}
