//! # Configuration File Tests
//!
//! Loading capacities from TOML on disk and building a controller from them.

use std::io::Write;

use tessera_ecs::{Controller, EcsConfig, EcsError, MAX_COMPONENT_COUNT};

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn loads_capacities_from_file() {
    let file = write_config(
        r#"
        # Small arena for a level editor preview
        max_entities = 3
        max_components = 16
        "#,
    );

    let config = EcsConfig::from_file(file.path()).unwrap();
    assert_eq!(config.max_entities, 3);
    assert_eq!(config.max_components, 16);

    let mut ecs = Controller::with_config(config).unwrap();
    for _ in 0..3 {
        ecs.create_entity().unwrap();
    }
    assert!(matches!(
        ecs.create_entity(),
        Err(EcsError::CapacityExceeded { capacity: 3 })
    ));
    assert_eq!(ecs.config(), &config);
}

#[test]
fn empty_file_uses_defaults() {
    let file = write_config("");
    let config = EcsConfig::from_file(file.path()).unwrap();
    assert_eq!(config, EcsConfig::default());
    assert_eq!(config.max_components, MAX_COMPONENT_COUNT);
}

#[test]
fn missing_file_is_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let result = EcsConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(EcsError::InvalidConfig(_))));
}

#[test]
fn malformed_file_is_invalid_config() {
    let file = write_config("max_entities = \"lots\"");
    assert!(matches!(
        EcsConfig::from_file(file.path()),
        Err(EcsError::InvalidConfig(_))
    ));
}
