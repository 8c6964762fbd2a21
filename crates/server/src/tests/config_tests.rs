use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(
        normalize_database_url("sqlite:./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn keeps_memory_and_full_urls() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("sqlite://./data/test.db?mode=rwc"),
        "sqlite://./data/test.db?mode=rwc"
    );
    assert_eq!(
        normalize_database_url("  "),
        Settings::default().database_url
    );
}

#[tokio::test]
async fn normalized_path_opens_database_in_new_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("data").join("neurocare.db");

    let database_url = normalize_database_url(db_path.to_string_lossy().as_ref());
    assert!(!dir.path().join("data").exists());
    let storage = storage::Storage::new(&database_url).await.expect("db");
    storage.health_check().await.expect("health check");
    assert!(db_path.exists());
}

#[test]
fn missing_file_keeps_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join(SERVER_CONFIG_FILE));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.server_bind, "127.0.0.1:5000");
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SERVER_CONFIG_FILE);
    fs::write(
        &path,
        "bind_addr = \"0.0.0.0:8080\"\nseed_path = \"data/questions.json\"\n",
    )
    .expect("write");

    let settings = load_settings_from(&path);
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.seed_path.as_deref(), Some("data/questions.json"));
    assert_eq!(settings.database_url, Settings::default().database_url);
}

#[test]
fn prefixed_env_wins_over_bare_name() {
    let settings = apply_env(
        Settings::default(),
        env_from(&[
            ("DATABASE_URL", "sqlite://./a.db"),
            ("APP__DATABASE_URL", "sqlite://./b.db"),
            ("SERVER_BIND", "127.0.0.1:7000"),
        ]),
    );
    assert_eq!(settings.database_url, "sqlite://./b.db");
    assert_eq!(settings.server_bind, "127.0.0.1:7000");
}

#[test]
fn blank_seed_path_env_disables_seeding() {
    let settings = Settings {
        seed_path: Some("data/questions.json".into()),
        ..Settings::default()
    };
    let settings = apply_env(settings, env_from(&[("SEED_PATH", "")]));
    assert_eq!(settings.seed_path, None);
}
