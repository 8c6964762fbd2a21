use super::*;
use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_point_at_local_api() {
    let config = ClientConfig::default();
    assert_eq!(config.api_base_url, "http://127.0.0.1:5000");
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(
        config.base_url().expect("url").as_str(),
        "http://127.0.0.1:5000/"
    );
}

#[test]
fn missing_file_keeps_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = load_client_config_from(&dir.path().join("client.toml"));
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("client.toml");
    fs::write(
        &path,
        "api_base_url = \"http://10.0.2.2:5000\"\nrequest_timeout_secs = 3\n",
    )
    .expect("write");

    let config = load_client_config_from(&path);
    assert_eq!(config.api_base_url, "http://10.0.2.2:5000");
    assert_eq!(config.request_timeout, Duration::from_secs(3));
}

#[test]
fn unreadable_file_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("client.toml");
    fs::write(&path, "request_timeout_secs = \"soon\"").expect("write");

    assert_eq!(load_client_config_from(&path), ClientConfig::default());
}

#[test]
fn env_overrides_file_values() {
    let settings = ClientConfig {
        api_base_url: "http://from-file:5000".into(),
        request_timeout: Duration::from_secs(3),
    };
    let config = apply_env(
        settings,
        env_from(&[
            ("NEUROCARE_API_URL", "https://api.neurocare.cm"),
            ("NEUROCARE_TIMEOUT_SECS", "30"),
        ]),
    );
    assert_eq!(config.api_base_url, "https://api.neurocare.cm");
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}

#[test]
fn invalid_timeout_env_is_ignored() {
    let config = apply_env(
        ClientConfig::default(),
        env_from(&[("NEUROCARE_TIMEOUT_SECS", "ten")]),
    );
    assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
}

#[test]
fn invalid_base_url_is_rejected() {
    let config = ClientConfig {
        api_base_url: "not a url".into(),
        ..ClientConfig::default()
    };
    assert!(config.base_url().is_err());
}

#[test]
fn zero_timeout_keeps_previous_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("client.toml");
    fs::write(&path, "request_timeout_secs = 0\n").expect("write");
    assert_eq!(
        load_client_config_from(&path).request_timeout,
        DEFAULT_REQUEST_TIMEOUT
    );

    let config = apply_env(
        ClientConfig::default(),
        env_from(&[("NEUROCARE_TIMEOUT_SECS", "0")]),
    );
    assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    assert_eq!(timeout_from_secs(0), None);
    assert_eq!(timeout_from_secs(5), Some(Duration::from_secs(5)));
}
