use shelly_exporter::config::Config;

#[test]
fn test_config_load() {
    // This assumes config/config.example.json exists relative to where cargo test is run
    let config = Config::load("config/config.example.json").expect("Failed to load example config");
    assert_eq!(config.shelly_plugs.len(), 2);
    assert_eq!(config.shelly_plugs[1].username.as_deref(), Some("admin"));
}
