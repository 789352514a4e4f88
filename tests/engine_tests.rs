use autoconfig::{ConfigError, ConfigFile, ConfigRecord, Host, SchemaBuilder, option};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Location {
    world: String,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct ServerConfig {
    max: i32,
    window: i64,
    motd: String,
    banned: Vec<String>,
    ports: BTreeSet<i32>,
    spawn: Host<Location>,
    debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max: 10,
            window: 60_000,
            motd: "Welcome".to_string(),
            banned: Vec::new(),
            ports: BTreeSet::new(),
            spawn: Host(Location {
                world: "world".to_string(),
                x: 0.5,
                y: 64.0,
                z: -12.5,
            }),
            debug: false,
        }
    }
}

impl ConfigRecord for ServerConfig {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        option!(schema, max).category("limits").comment("Upper bound");
        option!(schema, window)
            .category("limits")
            .comment("Sliding window in milliseconds\nApplies to every player");
        option!(schema, motd).comment("Shown on join");
        option!(schema, banned).category("players");
        option!(schema, ports).category("network");
        option!(schema, spawn).category("world");
        option!(schema, debug);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Credentials {
    user: Option<String>,
    timeout: i32,
}

impl ConfigRecord for Credentials {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        option!(schema, timeout).category("database");
        option!(schema, user)
            .category("database")
            .comment("Account used to connect");
    }
}

#[derive(Debug, Clone, Default)]
struct ModuleToggles {
    disabled_modules: HashSet<String>,
    saves: i32,
}

impl ConfigRecord for ModuleToggles {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .option(
                "disabledModules",
                |c| &c.disabled_modules,
                |c| &mut c.disabled_modules,
            )
            .comment("Modules that will not be enabled on startup");
        option!(schema, saves);
    }

    fn post_load(&mut self) -> anyhow::Result<()> {
        self.disabled_modules = self
            .disabled_modules
            .iter()
            .map(|m| m.to_lowercase())
            .collect();
        Ok(())
    }

    fn pre_save(&mut self) -> anyhow::Result<()> {
        self.saves += 1;
        Ok(())
    }
}

#[test]
fn test_save_then_load_round_trips() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("server.yml");

    let mut original = ConfigFile::<ServerConfig>::new(&path).unwrap();
    {
        let record = original.get_mut();
        record.max = 42;
        record.motd = "Hello: world".to_string();
        record.banned = vec!["notch".to_string(), "jeb_".to_string()];
        record.ports = [25565, 25566].into_iter().collect();
        record.spawn.x = 100.25;
        record.debug = true;
    }
    assert!(original.save());

    let mut reloaded = ConfigFile::<ServerConfig>::new(&path).unwrap();
    assert!(reloaded.load());
    assert_eq!(reloaded.get(), original.get());
}

#[test]
fn test_save_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("server.yml");

    let config = ConfigFile::<ServerConfig>::new(&path).unwrap();
    assert!(config.save());
    let first = fs::read_to_string(&path).unwrap();

    let mut config = ConfigFile::<ServerConfig>::new(&path).unwrap();
    assert!(config.load());
    assert!(config.save());
    let second = fs::read_to_string(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_missing_required_field_fails_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db.yml");
    fs::write(&path, "database:\n  timeout: 30\n").unwrap();

    let mut config = ConfigFile::<Credentials>::new(&path).unwrap();
    let err = config.try_load().unwrap_err();

    match &err {
        ConfigError::MissingRequiredField { path, comment } => {
            assert_eq!(path, "database.user");
            assert_eq!(comment.as_deref(), Some("Account used to connect"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "database.user is required to be set! Info:\nAccount used to connect"
    );
    // Nothing is applied when a required option is missing
    assert_eq!(config.timeout, 0);
    assert!(!config.load());
    assert_eq!(config.get(), &Credentials::default());
}

#[test]
fn test_null_value_keeps_default() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("server.yml");
    fs::write(&path, "limits:\n  max:\n  window: 5\n").unwrap();

    let mut config = ConfigFile::<ServerConfig>::new(&path).unwrap();
    assert!(config.load());
    assert_eq!(config.max, 10);
    assert_eq!(config.window, 5);
}

#[test]
fn test_null_required_value_fails_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db.yml");
    fs::write(&path, "database:\n  timeout: 30\n  user:\n").unwrap();

    let mut config = ConfigFile::<Credentials>::new(&path).unwrap();
    assert!(matches!(
        config.try_load(),
        Err(ConfigError::MissingRequiredField { .. })
    ));
    assert_eq!(config.timeout, 0);
}

#[test]
fn test_required_field_present_loads() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db.yml");
    fs::write(&path, "database:\n  user: admin\n").unwrap();

    let mut config = ConfigFile::<Credentials>::new(&path).unwrap();
    assert!(config.load());
    assert_eq!(config.user.as_deref(), Some("admin"));
    assert_eq!(config.timeout, 0);
}

#[test]
fn test_comment_sits_directly_above_option() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("server.yml");

    let config = ConfigFile::<ServerConfig>::new(&path).unwrap();
    assert!(config.save());

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    let max = lines.iter().position(|l| *l == "  max: 10").unwrap();
    assert_eq!(lines[max - 1], "  # Upper bound");
    assert_eq!(lines[max - 2], "");

    let window = lines.iter().position(|l| *l == "  window: 60000").unwrap();
    assert_eq!(lines[window - 2], "  # Sliding window in milliseconds");
    assert_eq!(lines[window - 1], "  # Applies to every player");

    let motd = lines.iter().position(|l| *l == "motd: Welcome").unwrap();
    assert_eq!(lines[motd - 1], "# Shown on join");
}

#[test]
fn test_string_list_keeps_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("server.yml");

    let record = ServerConfig {
        banned: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        ..ServerConfig::default()
    };
    let config = ConfigFile::with_record(&path, record).unwrap();
    assert!(config.save());

    let text = fs::read_to_string(&path).unwrap();
    let a = text.find("- a\n").unwrap();
    let b = text.find("- b\n").unwrap();
    let c = text.find("- c\n").unwrap();
    assert!(a < b && b < c, "{text}");

    let mut reloaded = ConfigFile::<ServerConfig>::new(&path).unwrap();
    assert!(reloaded.load());
    assert_eq!(reloaded.banned, vec!["a", "b", "c"]);
}

#[test]
fn test_integer_set_reloads() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("server.yml");
    fs::write(&path, "network:\n  ports:\n  - 3\n  - 1\n  - 2\n  - 1\n").unwrap();

    let mut config = ConfigFile::<ServerConfig>::new(&path).unwrap();
    assert!(config.load());
    assert_eq!(config.ports, BTreeSet::from([1, 2, 3]));
}

#[test]
fn test_type_mismatch_leaves_field_unchanged() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("server.yml");
    fs::write(&path, "limits:\n  max: not-a-number\n").unwrap();

    let mut config = ConfigFile::<ServerConfig>::new(&path).unwrap();
    match config.try_load() {
        Err(ConfigError::TypeMismatch { path, found, .. }) => {
            assert_eq!(path, "limits.max");
            assert!(found.contains("not-a-number"), "{found}");
        }
        other => panic!("expected a type mismatch, got {other:?}"),
    }
    assert_eq!(config.max, 10);
    assert!(!config.load());
}

#[test]
fn test_post_load_normalizes_modules() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("modules.yml");
    fs::write(&path, "disabledModules:\n- Chat\n- WORLDEDIT\n").unwrap();

    let mut config = ConfigFile::<ModuleToggles>::new(&path).unwrap();
    assert!(config.load());

    let expected: HashSet<String> = ["chat", "worldedit"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(config.disabled_modules, expected);
}

#[test]
fn test_pre_save_does_not_touch_live_record() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("modules.yml");

    let config = ConfigFile::<ModuleToggles>::new(&path).unwrap();
    assert!(config.save());
    assert!(config.save());

    assert_eq!(config.saves, 0);
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("saves: 1"), "{text}");
}

#[test]
fn test_host_value_round_trips_as_mapping() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("server.yml");

    let config = ConfigFile::<ServerConfig>::new(&path).unwrap();
    assert!(config.save());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("world:\n  spawn:\n"), "{text}");
    assert!(text.contains("    world: world\n"), "{text}");

    let mut reloaded = ConfigFile::<ServerConfig>::new(&path).unwrap();
    assert!(reloaded.load());
    assert_eq!(reloaded.spawn, ServerConfig::default().spawn);
}

#[test]
fn test_unknown_keys_are_ignored_and_dropped_on_save() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("server.yml");
    fs::write(&path, "legacy: true\nlimits:\n  max: 7\n  old: 1\n").unwrap();

    let mut config = ConfigFile::<ServerConfig>::new(&path).unwrap();
    assert!(config.load());
    assert_eq!(config.max, 7);
    assert!(config.save());

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("legacy"));
    assert!(!text.contains("old"));
}
