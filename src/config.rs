use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use saphyr::{LoadableYamlNode, YamlOwned};
use tracing::debug;

use crate::conf;
use crate::formatter::Zone;

/// Environment variable naming a settings file.
pub const CONFIG_ENV_VAR: &str = "DTF_TESTER_CONFIG";
/// Project settings files looked up from the working directory upward.
pub const PROJECT_FILES: [&str; 2] = [".dtf-tester.yaml", ".dtf-tester.yml"];
const APP_DIR: &str = "dtf-tester";

/// Minimal environment abstraction used by tests to cover file system and env-var behavior.
pub trait Env {
    /// Current working directory.
    fn current_dir(&self) -> PathBuf;
    /// Platform configuration directory (e.g., XDG config dir).
    fn config_dir(&self) -> Option<PathBuf>;
    /// Platform data directory (e.g., XDG data dir).
    fn data_dir(&self) -> Option<PathBuf>;
    /// Read file contents.
    ///
    /// # Errors
    /// Returns an error string when the file cannot be read.
    fn read_to_string(&self, p: &Path) -> Result<String, String>;
    fn path_exists(&self, p: &Path) -> bool;
    fn env_var(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl Env for SystemEnv {
    fn current_dir(&self) -> PathBuf {
        env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
    fn config_dir(&self) -> Option<PathBuf> {
        dirs_next::config_dir()
    }
    fn data_dir(&self) -> Option<PathBuf> {
        dirs_next::data_dir()
    }
    fn read_to_string(&self, p: &Path) -> Result<String, String> {
        match fs::read_to_string(p) {
            Ok(s) => Ok(s),
            Err(e) => Err(format!("failed to read settings file {}: {e}", p.display())),
        }
    }
    fn path_exists(&self, p: &Path) -> bool {
        p.exists()
    }
    fn env_var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// The tool's own settings: preview locales, host zone and storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    locales: Vec<String>,
    time_zone: String,
    storage: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locales: vec!["en-US".to_owned(), "ko-KR".to_owned()],
            time_zone: "UTC".to_owned(),
            storage: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub config_data: Option<String>,
}

impl Settings {
    /// Parse settings data without filesystem access. A relative `storage`
    /// path is kept as written.
    ///
    /// # Errors
    /// Returns an error when the data is not YAML or a key has the wrong shape.
    pub fn from_yaml_str(s: &str) -> Result<Self, String> {
        Self::from_yaml_str_with_base(s, None)
    }

    fn from_yaml_str_with_base(s: &str, base_dir: Option<&Path>) -> Result<Self, String> {
        let docs =
            YamlOwned::load_from_str(s).map_err(|e| format!("failed to parse settings: {e}"))?;
        let mut settings = Self::default();

        let Some(doc) = docs.first().filter(|doc| !doc.is_null()) else {
            return Ok(settings);
        };
        let Some(map) = doc.as_mapping() else {
            return Err("invalid settings: not a mapping".to_string());
        };

        for (key, value) in map {
            match key.as_str() {
                Some("locales") => settings.locales = load_locales(value)?,
                Some("time-zone") => {
                    let Some(zone) = value.as_str() else {
                        return Err("invalid settings: time-zone should be a string".to_string());
                    };
                    if Zone::resolve(zone).is_none() {
                        return Err(format!("invalid settings: unknown time-zone '{zone}'"));
                    }
                    zone.clone_into(&mut settings.time_zone);
                }
                Some("storage") => {
                    let Some(dir) = value.as_str() else {
                        return Err(
                            "invalid settings: storage should be a directory path".to_string()
                        );
                    };
                    let dir = PathBuf::from(dir);
                    settings.storage = Some(match base_dir {
                        Some(base) if dir.is_relative() => base.join(dir),
                        _ => dir,
                    });
                }
                Some(other) => return Err(format!("invalid settings: unknown key '{other}'")),
                None => return Err("invalid settings: keys should be strings".to_string()),
            }
        }
        Ok(settings)
    }

    #[must_use]
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    #[must_use]
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    /// Explicit storage directory, if configured.
    #[must_use]
    pub fn storage(&self) -> Option<&Path> {
        self.storage.as_deref()
    }
}

fn load_locales(node: &YamlOwned) -> Result<Vec<String>, String> {
    let invalid = || "invalid settings: locales should be a list of locale tags".to_string();
    if let Some(tag) = node.as_str() {
        return Ok(vec![tag.to_owned()]);
    }
    let seq = node.as_sequence().ok_or_else(invalid)?;
    let locales = seq
        .iter()
        .map(|item| item.as_str().map(str::to_owned).ok_or_else(invalid))
        .collect::<Result<Vec<_>, _>>()?;
    if locales.is_empty() {
        return Err(invalid());
    }
    Ok(locales)
}

/// Result of settings discovery.
#[derive(Debug, Clone)]
pub struct SettingsContext {
    pub settings: Settings,
    pub base_dir: PathBuf,
    pub source: Option<PathBuf>,
}

impl SettingsContext {
    /// Where presets are stored: the configured directory, else the
    /// platform data directory, else `.dtf-tester` under the base directory.
    #[must_use]
    pub fn storage_dir(&self, envx: &dyn Env) -> PathBuf {
        if let Some(dir) = self.settings.storage() {
            return dir.to_path_buf();
        }
        envx.data_dir().map_or_else(
            || self.base_dir.join(".dtf-tester"),
            |dir| dir.join(APP_DIR),
        )
    }
}

fn context_from_str(
    data: &str,
    base_dir: PathBuf,
    source: Option<PathBuf>,
) -> Result<SettingsContext, String> {
    let settings = Settings::from_yaml_str_with_base(data, Some(&base_dir)).map_err(|e| {
        source
            .as_ref()
            .map_or_else(|| e.clone(), |p| format!("{}: {e}", p.display()))
    })?;
    debug!(source = ?source, "settings loaded");
    Ok(SettingsContext {
        settings,
        base_dir,
        source,
    })
}

/// Discover settings with precedence:
/// config-data > config-file > project > env var > user-global > defaults.
///
/// # Errors
/// Returns an error when a settings file cannot be read or parsed.
pub fn discover_settings(overrides: &Overrides) -> Result<SettingsContext, String> {
    discover_settings_with(overrides, &SystemEnv)
}

/// Discover settings using a provided `Env` implementation.
///
/// # Errors
/// Returns an error when a settings file cannot be read or parsed.
pub fn discover_settings_with(
    overrides: &Overrides,
    envx: &dyn Env,
) -> Result<SettingsContext, String> {
    if let Some(ref data) = overrides.config_data {
        return context_from_str(data, envx.current_dir(), None);
    }
    if let Some(ref file) = overrides.config_file {
        return ctx_from_settings_path(envx, file);
    }
    if let Some(path) = find_project_settings(envx) {
        return ctx_from_settings_path(envx, &path);
    }
    if let Some(ctx) = try_env_settings(envx)? {
        return Ok(ctx);
    }
    if let Some(ctx) = try_user_global(envx)? {
        return Ok(ctx);
    }
    let builtin = conf::builtin("settings").unwrap_or_default();
    context_from_str(builtin, envx.current_dir(), None)
}

fn ctx_from_settings_path(envx: &dyn Env, p: &Path) -> Result<SettingsContext, String> {
    let data = envx.read_to_string(p)?;
    let base = p
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| envx.current_dir(), Path::to_path_buf);
    context_from_str(&data, base, Some(p.to_path_buf()))
}

fn try_env_settings(envx: &dyn Env) -> Result<Option<SettingsContext>, String> {
    envx.env_var(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .map(|p| if p.is_absolute() { p } else { envx.current_dir().join(p) })
        .filter(|p| envx.path_exists(p))
        .map(|p| ctx_from_settings_path(envx, &p))
        .transpose()
}

fn try_user_global(envx: &dyn Env) -> Result<Option<SettingsContext>, String> {
    envx.config_dir()
        .map(|base| base.join(APP_DIR).join("config.yaml"))
        .filter(|p| envx.path_exists(p))
        .map(|p| ctx_from_settings_path(envx, &p))
        .transpose()
}

fn find_project_settings(envx: &dyn Env) -> Option<PathBuf> {
    let cwd = envx.current_dir();
    let home = envx
        .env_var("HOME")
        .map(PathBuf::from)
        .or_else(dirs_next::home_dir)
        .map(|h| if h.is_absolute() { h } else { cwd.join(h) });
    let mut dir = cwd;
    loop {
        for name in PROJECT_FILES {
            let cand = dir.join(name);
            if envx.path_exists(&cand) {
                return Some(cand);
            }
        }
        if home.as_ref().is_some_and(|home| home == &dir) {
            break;
        }
        match dir.parent() {
            Some(parent) if parent != dir && !parent.as_os_str().is_empty() => {
                dir = parent.to_path_buf();
            }
            _ => break,
        }
    }
    None
}
