//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing or incomplete.
//! Problems are kept in `GameConfig::warnings` and logged by the caller
//! once logging is up, since the log settings live in this file too.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::sim::session::{SessionRules, DEFAULT_FRAGMENT_SLOTS, DEFAULT_LEVEL_UP_STREAK};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: SessionRules,
    /// Fragment buttons per row in the on-screen grid.
    pub grid_columns: usize,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
    pub levels_dir: PathBuf,
    /// Fixed shuffle seed. `None` draws a fresh one per run.
    pub seed: Option<u64>,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GamepadConfig {
    pub pick: Vec<String>,
    pub submit: Vec<String>,
    pub clear: Vec<String>,
    pub confirm: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    /// Log destination. The terminal belongs to the game, so without a
    /// file only `RUST_LOG` turns stderr logging on.
    pub file: Option<PathBuf>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_fragment_slots")]
    fragment_slots: usize,
    #[serde(default = "default_level_up_streak")]
    level_up_streak: u32,
    #[serde(default = "default_grid_columns")]
    grid_columns: usize,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pick")]
    pick: Vec<String>,
    #[serde(default = "default_submit")]
    submit: Vec<String>,
    #[serde(default = "default_clear")]
    clear: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_level")]
    level: String,
    #[serde(default)]
    file: Option<String>,
}

// ── Defaults ──

fn default_levels_dir() -> String { "levels".into() }
fn default_fragment_slots() -> usize { DEFAULT_FRAGMENT_SLOTS }
fn default_level_up_streak() -> u32 { DEFAULT_LEVEL_UP_STREAK }
fn default_grid_columns() -> usize { 5 }  // 4 x 5 grid for 20 slots

fn default_pick() -> Vec<String> { vec!["A".into()] }
fn default_submit() -> Vec<String> { vec!["X".into(), "R1".into()] }
fn default_clear() -> Vec<String> { vec!["B".into(), "L1".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

fn default_log_level() -> String { "off".into() }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            seed: None,
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            fragment_slots: default_fragment_slots(),
            level_up_streak: default_level_up_streak(),
            grid_columns: default_grid_columns(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            pick: default_pick(),
            submit: default_submit(),
            clear: default_clear(),
            confirm: default_confirm(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            level: default_log_level(),
            file: None,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/wordbits`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = vec![];
        let toml_cfg = load_toml(&search_dirs, &mut warnings);
        GameConfig::resolve(toml_cfg, &search_dirs, warnings)
    }

    /// Parse config text directly. Relative paths stay relative.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::resolve(toml_cfg, &[], vec![]))
    }

    fn resolve(toml_cfg: TomlConfig, search_dirs: &[PathBuf], mut warnings: Vec<String>) -> Self {
        let levels_dir = resolve_dir(&toml_cfg.general.levels_dir, search_dirs);

        let rules = toml_cfg.rules;
        let fragment_slots = at_least_one(rules.fragment_slots, "rules.fragment_slots", &mut warnings);
        let level_up_streak = at_least_one(rules.level_up_streak as usize, "rules.level_up_streak", &mut warnings) as u32;
        let grid_columns = at_least_one(rules.grid_columns, "rules.grid_columns", &mut warnings);

        if crate::logging::parse_level(&toml_cfg.log.level).is_none() {
            warnings.push(format!("log.level {:?} is not a log level, logging is off", toml_cfg.log.level));
        }

        GameConfig {
            rules: SessionRules { fragment_slots, level_up_streak },
            grid_columns,
            gamepad: GamepadConfig {
                pick: toml_cfg.gamepad.pick,
                submit: toml_cfg.gamepad.submit,
                clear: toml_cfg.gamepad.clear,
                confirm: toml_cfg.gamepad.confirm,
                quit: toml_cfg.gamepad.quit,
            },
            log: LogConfig {
                level: toml_cfg.log.level,
                file: toml_cfg.log.file.map(PathBuf::from),
            },
            levels_dir,
            seed: toml_cfg.general.seed,
            warnings,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::resolve(TomlConfig::default(), &[], vec![])
    }
}

fn at_least_one(value: usize, key: &str, warnings: &mut Vec<String>) -> usize {
    if value == 0 {
        warnings.push(format!("{key} must be at least 1, using 1"));
        1
    } else {
        value
    }
}

/// Absolute paths are used as-is. Relative ones are looked up in the
/// search dirs, defaulting to relative-to-CWD.
fn resolve_dir(dir: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = PathBuf::from(dir);
    if path.is_absolute() {
        return path;
    }
    search_dirs
        .iter()
        .map(|d| d.join(dir))
        .find(|p| p.is_dir())
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD + XDG data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so an installed link still finds data
        // next to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/wordbits)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/wordbits");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match read_toml(&path) {
            Ok(cfg) => return cfg,
            Err(msg) => {
                warnings.push(msg);
                warnings.push("using default settings".into());
                return TomlConfig::default();
            }
        }
    }
    TomlConfig::default()
}

fn read_toml(path: &Path) -> Result<TomlConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read {}: {e}", path.display()))?;
    toml::from_str::<TomlConfig>(&text)
        .map_err(|e| format!("{} parse error: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.rules, SessionRules::default());
        assert_eq!(cfg.rules.fragment_slots, 20);
        assert_eq!(cfg.rules.level_up_streak, 7);
        assert_eq!(cfg.grid_columns, 5);
        assert_eq!(cfg.levels_dir, PathBuf::from("levels"));
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.log.level, "off");
        assert_eq!(cfg.log.file, None);
        assert_eq!(cfg.gamepad.pick, vec!["A".to_string()]);
        assert!(cfg.warnings.is_empty());
    }

    #[test]
    fn partial_sections_override_only_given_keys() {
        let cfg = GameConfig::from_toml_str(
            r#"
            [general]
            seed = 1234

            [rules]
            level_up_streak = 3

            [log]
            level = "debug"
            file = "wordbits.log"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(1234));
        assert_eq!(cfg.rules.level_up_streak, 3);
        assert_eq!(cfg.rules.fragment_slots, 20);
        assert_eq!(cfg.levels_dir, PathBuf::from("levels"));
        assert_eq!(cfg.log.level, "debug");
        assert_eq!(cfg.log.file, Some(PathBuf::from("wordbits.log")));
    }

    #[test]
    fn gamepad_lists_are_read() {
        let cfg = GameConfig::from_toml_str("[gamepad]\nsubmit = [\"Y\"]\n").unwrap();
        assert_eq!(cfg.gamepad.submit, vec!["Y".to_string()]);
        assert_eq!(cfg.gamepad.clear, default_clear());
    }

    #[test]
    fn zero_values_are_clamped_with_a_warning() {
        let cfg = GameConfig::from_toml_str("[rules]\nfragment_slots = 0\nlevel_up_streak = 0\n").unwrap();
        assert_eq!(cfg.rules.fragment_slots, 1);
        assert_eq!(cfg.rules.level_up_streak, 1);
        assert_eq!(cfg.warnings.len(), 2);
    }

    #[test]
    fn unknown_log_level_is_a_warning() {
        let cfg = GameConfig::from_toml_str("[log]\nlevel = \"chatty\"\n").unwrap();
        assert_eq!(cfg.log.level, "chatty");
        assert_eq!(cfg.warnings.len(), 1);
        assert!(cfg.warnings[0].contains("chatty"));
    }

    #[test]
    fn bad_types_are_errors() {
        assert!(GameConfig::from_toml_str("[rules]\nfragment_slots = \"many\"\n").is_err());
    }

    #[test]
    fn absolute_levels_dir_is_kept() {
        let cfg = GameConfig::from_toml_str("[general]\nlevels_dir = \"/srv/wordbits/levels\"\n").unwrap();
        assert_eq!(cfg.levels_dir, PathBuf::from("/srv/wordbits/levels"));
    }

    #[test]
    fn unreadable_config_falls_back_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[rules\nbroken").unwrap();
        let mut warnings = vec![];
        let cfg = load_toml(&[dir.path().to_path_buf()], &mut warnings);
        assert_eq!(cfg.rules.fragment_slots, 20);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn relative_levels_dir_found_in_search_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("packs")).unwrap();
        let found = resolve_dir("packs", &[PathBuf::from("/nope"), dir.path().to_path_buf()]);
        assert_eq!(found, dir.path().join("packs"));
        assert_eq!(resolve_dir("missing", &[dir.path().to_path_buf()]), PathBuf::from("missing"));
    }
}
