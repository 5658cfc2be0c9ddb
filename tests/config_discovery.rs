use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use dtf_tester::config::{
    CONFIG_ENV_VAR, Env, Overrides, Settings, discover_settings_with,
};

#[derive(Default)]
struct FakeEnv {
    cwd: PathBuf,
    cfg_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    files: HashMap<PathBuf, String>,
    exists: HashSet<PathBuf>,
    vars: HashMap<String, String>,
}

impl FakeEnv {
    fn with_cwd(mut self, p: impl Into<PathBuf>) -> Self {
        self.cwd = p.into();
        self
    }
    fn with_config_dir(mut self, p: impl Into<PathBuf>) -> Self {
        self.cfg_dir = Some(p.into());
        self
    }
    fn with_data_dir(mut self, p: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(p.into());
        self
    }
    fn add_file(mut self, p: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(p.into(), content.into());
        self
    }
    fn add_exist(mut self, p: impl Into<PathBuf>) -> Self {
        self.exists.insert(p.into());
        self
    }
    fn set_var(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.vars.insert(k.into(), v.into());
        self
    }
}

impl Env for FakeEnv {
    fn current_dir(&self) -> PathBuf {
        self.cwd.clone()
    }
    fn config_dir(&self) -> Option<PathBuf> {
        self.cfg_dir.clone()
    }
    fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone()
    }
    fn read_to_string(&self, p: &Path) -> Result<String, String> {
        self.files
            .get(p)
            .cloned()
            .ok_or_else(|| format!("failed to read settings file {}: not found", p.display()))
    }
    fn path_exists(&self, p: &Path) -> bool {
        self.files.contains_key(p) || self.exists.contains(p)
    }
    fn env_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

fn home() -> FakeEnv {
    FakeEnv::default()
        .with_cwd("/home/user/proj/sub")
        .set_var("HOME", "/home/user")
}

fn none() -> Overrides {
    Overrides::default()
}

#[test]
fn defaults_without_any_settings() {
    let ctx = discover_settings_with(&none(), &home()).unwrap();
    assert!(ctx.source.is_none());
    assert_eq!(ctx.settings, Settings::default());
    assert_eq!(ctx.settings.locales(), ["en-US", "ko-KR"]);
    assert_eq!(ctx.settings.time_zone(), "UTC");
    assert_eq!(ctx.base_dir, PathBuf::from("/home/user/proj/sub"));
}

#[test]
fn inline_data_wins_over_everything() {
    let env = home()
        .add_file("/home/user/proj/.dtf-tester.yaml", "locales: [de-DE]\n")
        .add_file("/cfg/x.yaml", "locales: [fr-FR]\n");
    let ctx = discover_settings_with(
        &Overrides {
            config_file: Some(PathBuf::from("/cfg/x.yaml")),
            config_data: Some("locales: ko-KR\n".into()),
        },
        &env,
    )
    .unwrap();
    assert_eq!(ctx.settings.locales(), ["ko-KR"]);
    assert!(ctx.source.is_none());
}

#[test]
fn explicit_file_resolves_storage_against_its_directory() {
    let env = home().add_file("/cfg/x.yaml", "storage: state\ntime-zone: Asia/Seoul\n");
    let ctx = discover_settings_with(
        &Overrides {
            config_file: Some(PathBuf::from("/cfg/x.yaml")),
            config_data: None,
        },
        &env,
    )
    .unwrap();
    assert_eq!(ctx.source, Some(PathBuf::from("/cfg/x.yaml")));
    assert_eq!(ctx.base_dir, PathBuf::from("/cfg"));
    assert_eq!(ctx.settings.storage(), Some(Path::new("/cfg/state")));
    assert_eq!(ctx.settings.time_zone(), "Asia/Seoul");
    assert_eq!(ctx.storage_dir(&env), PathBuf::from("/cfg/state"));
}

#[test]
fn project_file_is_found_walking_up() {
    let env = home().add_file("/home/user/proj/.dtf-tester.yml", "locales: [en-GB]\n");
    let ctx = discover_settings_with(&none(), &env).unwrap();
    assert_eq!(
        ctx.source,
        Some(PathBuf::from("/home/user/proj/.dtf-tester.yml"))
    );
    assert_eq!(ctx.base_dir, PathBuf::from("/home/user/proj"));
    assert_eq!(ctx.settings.locales(), ["en-GB"]);
}

#[test]
fn project_search_stops_at_home() {
    let env = home().add_file("/home/.dtf-tester.yaml", "locales: [en-GB]\n");
    let ctx = discover_settings_with(&none(), &env).unwrap();
    assert!(ctx.source.is_none());
}

#[test]
fn env_var_file_is_used_when_present() {
    let env = home()
        .set_var(CONFIG_ENV_VAR, "/etc/dtf.yaml")
        .add_file("/etc/dtf.yaml", "locales: [ja-JP]\n")
        .with_config_dir("/cfg")
        .add_file("/cfg/dtf-tester/config.yaml", "locales: [fr-FR]\n");
    let ctx = discover_settings_with(&none(), &env).unwrap();
    assert_eq!(ctx.source, Some(PathBuf::from("/etc/dtf.yaml")));
    assert_eq!(ctx.settings.locales(), ["ja-JP"]);
}

#[test]
fn missing_env_var_file_falls_through_to_user_global() {
    let env = home()
        .set_var(CONFIG_ENV_VAR, "/etc/missing.yaml")
        .with_config_dir("/cfg")
        .add_file("/cfg/dtf-tester/config.yaml", "locales: [fr-FR]\n");
    let ctx = discover_settings_with(&none(), &env).unwrap();
    assert_eq!(ctx.source, Some(PathBuf::from("/cfg/dtf-tester/config.yaml")));
    assert_eq!(ctx.settings.locales(), ["fr-FR"]);
}

#[test]
fn unreadable_project_file_is_an_error() {
    let env = home().add_exist("/home/user/proj/sub/.dtf-tester.yaml");
    let err = discover_settings_with(&none(), &env).unwrap_err();
    assert!(err.contains("failed to read settings file"), "{err}");
}

#[test]
fn invalid_settings_name_the_file() {
    let env = home().add_file("/home/user/proj/.dtf-tester.yaml", "colour: red\n");
    let err = discover_settings_with(&none(), &env).unwrap_err();
    assert_eq!(
        err,
        "/home/user/proj/.dtf-tester.yaml: invalid settings: unknown key 'colour'"
    );
}

#[test]
fn settings_shapes_are_checked() {
    assert!(Settings::from_yaml_str("locales: []\n").is_err());
    assert!(Settings::from_yaml_str("locales: [1]\n").is_err());
    assert!(Settings::from_yaml_str("- a\n").is_err());
    assert!(Settings::from_yaml_str("storage: [a]\n").is_err());
    let err = Settings::from_yaml_str("time-zone: Mars/Base\n").unwrap_err();
    assert_eq!(err, "invalid settings: unknown time-zone 'Mars/Base'");
    assert_eq!(Settings::from_yaml_str("").unwrap(), Settings::default());
    assert_eq!(
        Settings::from_yaml_str("storage: rel\n").unwrap().storage(),
        Some(Path::new("rel"))
    );
}

#[test]
fn storage_dir_prefers_settings_then_data_dir() {
    let env = home().with_data_dir("/data");
    let ctx = discover_settings_with(&none(), &env).unwrap();
    assert_eq!(ctx.storage_dir(&env), PathBuf::from("/data/dtf-tester"));

    let bare = home();
    assert_eq!(
        ctx.storage_dir(&bare),
        PathBuf::from("/home/user/proj/sub/.dtf-tester")
    );

    let ctx = discover_settings_with(
        &Overrides {
            config_file: None,
            config_data: Some("storage: /abs/presets\n".into()),
        },
        &env,
    )
    .unwrap();
    assert_eq!(ctx.storage_dir(&env), PathBuf::from("/abs/presets"));
}
