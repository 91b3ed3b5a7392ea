//! Tests for configuration loading and validation

use std::io::Write;

use stellarlink::{LinkConfig, LinkError};
use tokio_test::{assert_err, assert_ok};

#[test]
fn test_empty_document_uses_defaults() {
    let config = assert_ok!(LinkConfig::from_json("{}"));
    assert_eq!(config, LinkConfig::default());
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.observer.queue_capacity, 64);
    assert!(config.observer.webhook_url.is_none());
}

#[test]
fn test_full_document() {
    let config = assert_ok!(LinkConfig::from_json(
        r#"{
            "host": "0.0.0.0",
            "port": 4444,
            "log_level": "debug",
            "observer": {
                "queue_capacity": 8,
                "webhook_url": "https://chat.example.com/hooks/abc"
            }
        }"#,
    ));

    assert_eq!(config.listen_address(), "0.0.0.0:4444");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.observer.queue_capacity, 8);
    assert_eq!(
        config.observer.webhook_url.as_deref(),
        Some("https://chat.example.com/hooks/abc")
    );
}

#[test]
fn test_listen_address_formats_ipv6_and_hostnames() {
    let mut config = LinkConfig {
        host: "::1".to_string(),
        port: 9000,
        ..LinkConfig::default()
    };
    assert_eq!(config.listen_address(), "[::1]:9000");

    config.host = "localhost".to_string();
    assert_eq!(config.listen_address(), "localhost:9000");
}

#[test]
fn test_invalid_values_are_rejected() {
    for json in [
        r#"{"port": 0}"#,
        r#"{"host": "  "}"#,
        r#"{"observer": {"queue_capacity": 0}}"#,
        r#"{"observer": {"webhook_url": "ftp://example.com"}}"#,
    ] {
        let err = assert_err!(LinkConfig::from_json(json));
        assert!(
            matches!(err, LinkError::InvalidConfig(_)),
            "{json} gave {err:?}"
        );
    }
}

#[test]
fn test_malformed_and_unknown_fields() {
    assert!(matches!(
        LinkConfig::from_json("{ not json"),
        Err(LinkError::Json(_))
    ));
    assert!(matches!(
        LinkConfig::from_json(r#"{"prot": 8080}"#),
        Err(LinkError::Json(_))
    ));
    assert!(matches!(
        LinkConfig::from_json(r#"{"port": 70000}"#),
        Err(LinkError::Json(_))
    ));
    // Capture and command channel tuning belong to the embedding integration
    assert!(matches!(
        LinkConfig::from_json(r#"{"capture": {"quiescence_ms": 250}}"#),
        Err(LinkError::Json(_))
    ));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"port": 31337}}"#).unwrap();

    let config = assert_ok!(LinkConfig::load(file.path()));
    assert_eq!(config.port, 31337);
}

#[test]
fn test_load_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = assert_err!(LinkConfig::load(dir.path().join("absent.json")));
    assert!(err.to_string().contains("cannot read"));
}
