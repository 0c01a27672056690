use std::fs;

use duel_content::{ConfigError, ConfigLoader, SkillLoader};
use duel_core::SkillId;
use tempfile::TempDir;

const TOML_CATALOG: &str = r#"
[[skills]]
id = "basic_attack"
name = "Basic Attack"
base_damage = 10
cooldown_turns = 0

[[skills]]
id = "venom"
name = "Venom"
base_damage = 5
max_damage = 9
cooldown_turns = 3
weight = 2

[[skills.status_effects]]
kind = "poison"
magnitude = 12
duration = 2
chance_percent = 70
"#;

#[test]
fn format_follows_extension() {
    let dir = TempDir::new().unwrap();
    let toml_path = dir.path().join("skills.toml");
    fs::write(&toml_path, TOML_CATALOG).unwrap();

    let catalog = SkillLoader::load(&toml_path).unwrap();
    let venom = catalog.lookup(&SkillId::from("venom")).unwrap();
    assert_eq!(venom.max_damage, 9);
    assert_eq!(venom.status_effects[0].chance_percent, 70);

    let ron_path = dir.path().join("skills.ron");
    fs::write(
        &ron_path,
        r#"(skills: [(id: "basic_attack", name: "Jab", base_damage: 3, cooldown_turns: 0)])"#,
    )
    .unwrap();
    assert_eq!(SkillLoader::load(&ron_path).unwrap().basic_attack().name, "Jab");
}

#[test]
fn unsupported_and_missing_files_are_reported() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("skills.json");
    fs::write(&json_path, "{}").unwrap();
    assert!(matches!(
        SkillLoader::load(&json_path),
        Err(ConfigError::UnsupportedFormat(_))
    ));

    let missing = dir.path().join("absent.ron");
    assert!(matches!(
        SkillLoader::load(&missing),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn rules_file_overrides_starting_hp() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(&path, "starting_hp = 450\n").unwrap();

    assert_eq!(ConfigLoader::load(&path).unwrap().starting_hp, 450);
}
