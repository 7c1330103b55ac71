//! Settings validation and parsing tests.

use std::time::Duration;

use cwrelay::core::{Settings, SettingsBuilder};
use pretty_assertions::assert_eq;

#[test]
fn default_settings_are_incomplete() {
    // Defaults alone fail validation: credentials and endpoint are required.
    assert!(Settings::default().validate().is_err());
}

#[test]
fn builder_round_trip() {
    let settings = SettingsBuilder::new()
        .access_key("AKIA123")
        .secret_key("s3cr3t")
        .endpoint("https://monitoring.example.com/")
        .namespace("Servers/Web")
        .auto_namespace(true)
        .send_interval(Duration::from_secs(120))
        .max_retries(5)
        .max_queue_len(512)
        .build()
        .unwrap();

    assert_eq!(settings.access_key, "AKIA123");
    assert_eq!(settings.namespace, "Servers/Web");
    assert!(settings.auto_namespace);
    assert_eq!(settings.send_interval, Duration::from_secs(120));
    assert_eq!(settings.max_retries, 5);
    assert_eq!(settings.max_queue_len, 512);
}

#[test]
fn yaml_settings() {
    let yaml = r#"
access_key: AKIA123
secret_key: s3cr3t
endpoint: "https://monitoring.example.com/"
namespace: "Servers/Web"
group_file: /etc/asg-name
send_interval: 90s
"#;

    let settings = SettingsBuilder::new().from_yaml(yaml).unwrap().build().unwrap();
    assert_eq!(settings.send_interval, Duration::from_secs(90));
    assert_eq!(settings.group_file.as_deref().unwrap().to_str().unwrap(), "/etc/asg-name");
    assert!(!settings.auto_namespace);
    assert!(settings.instance_lookup_url.is_none());
}

#[test]
fn invalid_endpoint_rejected() {
    let result = SettingsBuilder::new()
        .access_key("AK")
        .secret_key("SK")
        .endpoint("monitoring.example.com")
        .namespace("NS")
        .build();
    assert!(result.is_err());
}

#[test]
fn malformed_yaml_rejected() {
    assert!(SettingsBuilder::new().from_yaml(": not yaml : [").is_err());
}
