// Configuration loading and validation (league.toml, categories.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::draft::player::{HittingLine, PitchingLine};
use crate::valuation::category::{CategoryConfig, CategoryId, CategorySet, Direction};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub categories: CategorySet,
    pub replacement: ReplacementBaselines,
    /// Directory the config was loaded from; relative data paths resolve against it.
    pub base_dir: PathBuf,
}

impl Config {
    pub fn hitters_path(&self) -> PathBuf {
        self.base_dir.join(&self.league.data_paths.hitters)
    }

    pub fn pitchers_path(&self) -> PathBuf {
        self.base_dir.join(&self.league.data_paths.pitchers)
    }

    /// Draft picks recorded so far; see `draft::picks`.
    pub fn picks_path(&self) -> PathBuf {
        self.base_dir.join("config").join("picks.toml")
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Scheduled weeks; converts hitter season totals to weekly rates.
    pub num_weeks: u32,
    pub roster: RosterShape,
    #[serde(default)]
    pub teams: Vec<TeamConfig>,
    /// Team ranked against when no team is given explicitly.
    #[serde(default)]
    pub my_team: Option<String>,
    pub data_paths: DataPaths,
}

/// Pitcher slot counts. Hitter slots are fixed at nine.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RosterShape {
    pub sp_slots: usize,
    pub rp_slots: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub keepers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub hitters: String,
    pub pitchers: String,
}

// ---------------------------------------------------------------------------
// categories.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct CategoriesFile {
    categories: Vec<RawCategory>,
    replacement: ReplacementBaselines,
}

/// SD and average are optional here so that a missing value is reported as a
/// validation error naming the category rather than a generic parse failure.
#[derive(Debug, Clone, Deserialize)]
struct RawCategory {
    id: String,
    direction: Direction,
    weekly_sd: Option<f64>,
    weekly_avg: Option<f64>,
}

/// Replacement-level stat lines substituted into empty slots.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplacementBaselines {
    /// Season totals.
    pub hitter: HittingLine,
    /// One starter slot's weekly line.
    pub sp_per_start: PitchingLine,
    /// One reliever slot's weekly line.
    pub rp_per_slot: PitchingLine,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/categories.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` for that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_file: LeagueFile = parse_file(&league_path)?;
    let league = league_file.league;

    let categories_path = config_dir.join("categories.toml");
    let categories_file: CategoriesFile = parse_file(&categories_path)?;
    let categories = build_category_set(categories_file.categories)?;
    let replacement = categories_file.replacement;

    validate_league(&league)?;
    validate_replacement(&replacement)?;

    info!(
        "Config loaded: league={}, {} teams, {} weeks, {} SP / {} RP slots",
        league.name,
        league.teams.len(),
        league.num_weeks,
        league.roster.sp_slots,
        league.roster.rp_slots
    );

    Ok(Config {
        league,
        categories,
        replacement,
        base_dir: base_dir.to_path_buf(),
    })
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Existing files are never
/// overwritten.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                info!("Seeded {} from defaults", target.display());
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Directory to load from: the working directory when it holds `config/` or
/// `defaults/`, otherwise the per-user config directory.
pub fn config_base_dir() -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        return Ok(cwd);
    }
    directories::ProjectDirs::from("", "", "h2h-draft")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(ConfigError::FileNotFound { path: cwd })
}

/// Resolve the base directory, seed missing files from defaults, and load.
pub fn load_config() -> Result<Config, ConfigError> {
    let base = config_base_dir()?;
    ensure_config_files(&base)?;
    load_config_from(&base)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn build_category_set(raw: Vec<RawCategory>) -> Result<CategorySet, ConfigError> {
    let mut configs = Vec::with_capacity(raw.len());
    for (i, entry) in raw.into_iter().enumerate() {
        let id = CategoryId::from_str_id(&entry.id).ok_or_else(|| ConfigError::ValidationError {
            field: format!("categories[{i}].id"),
            message: format!("unknown category `{}`", entry.id),
        })?;
        let weekly_sd = entry.weekly_sd.ok_or_else(|| missing(id, "weekly_sd"))?;
        let weekly_avg = entry.weekly_avg.ok_or_else(|| missing(id, "weekly_avg"))?;
        configs.push(CategoryConfig {
            id,
            direction: entry.direction,
            weekly_sd,
            weekly_avg,
        });
    }
    CategorySet::new(configs)
}

fn missing(id: CategoryId, field: &str) -> ConfigError {
    ConfigError::ValidationError {
        field: format!("categories.{id}.{field}"),
        message: "is required".into(),
    }
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_league(league: &LeagueConfig) -> Result<(), ConfigError> {
    if league.num_weeks == 0 {
        return Err(invalid("league.num_weeks", "must be greater than 0".into()));
    }

    if league.roster.sp_slots + league.roster.rp_slots == 0 {
        return Err(invalid(
            "league.roster",
            "at least one SP or RP slot is required".into(),
        ));
    }

    for (i, team) in league.teams.iter().enumerate() {
        if team.id.trim().is_empty() {
            return Err(invalid(&format!("league.teams[{i}].id"), "must not be empty".into()));
        }
        if league.teams[..i].iter().any(|t| t.id == team.id) {
            return Err(invalid(
                &format!("league.teams[{i}].id"),
                format!("duplicate team id `{}`", team.id),
            ));
        }
    }

    if let Some(my_team) = &league.my_team {
        if !league.teams.iter().any(|t| &t.id == my_team) {
            return Err(invalid(
                "league.my_team",
                format!("`{my_team}` is not a configured team id"),
            ));
        }
    }

    Ok(())
}

fn validate_replacement(replacement: &ReplacementBaselines) -> Result<(), ConfigError> {
    let h = &replacement.hitter;
    let hitter_fields: &[(&str, f64)] = &[
        ("replacement.hitter.pa", h.pa),
        ("replacement.hitter.r", h.r),
        ("replacement.hitter.hr", h.hr),
        ("replacement.hitter.rbi", h.rbi),
        ("replacement.hitter.so", h.so),
        ("replacement.hitter.tb", h.tb),
        ("replacement.hitter.sb", h.sb),
    ];
    for (name, val) in hitter_fields {
        if !(val.is_finite() && *val >= 0.0) {
            return Err(invalid(name, format!("must be finite and >= 0, got {val}")));
        }
    }
    if !(0.0..=1.0).contains(&h.obp) {
        return Err(invalid(
            "replacement.hitter.obp",
            format!("must be between 0.0 and 1.0 inclusive, got {}", h.obp),
        ));
    }

    for (prefix, line) in [
        ("replacement.sp_per_start", &replacement.sp_per_start),
        ("replacement.rp_per_slot", &replacement.rp_per_slot),
    ] {
        let fields: &[(&str, f64)] = &[
            ("l", line.l),
            ("sv", line.sv),
            ("hld", line.hld),
            ("k", line.k),
            ("qs", line.qs),
            ("er", line.er),
            ("wh", line.wh),
        ];
        for (name, val) in fields {
            if !(val.is_finite() && *val >= 0.0) {
                return Err(invalid(
                    &format!("{prefix}.{name}"),
                    format!("must be finite and >= 0, got {val}"),
                ));
            }
        }
        if !(line.ip.is_finite() && line.ip > 0.0) {
            return Err(invalid(
                &format!("{prefix}.ip"),
                format!("must be > 0, got {}", line.ip),
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// The crate root, where `defaults/` lives.
    fn project_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    /// A fresh temp dir with `config/` populated from the shipped defaults.
    fn temp_config_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        let config_dir = tmp.join("config");
        fs::create_dir_all(&config_dir).unwrap();
        let root = project_root();
        for file in ["league.toml", "categories.toml"] {
            fs::copy(root.join("defaults").join(file), config_dir.join(file)).unwrap();
        }
        tmp
    }

    fn rewrite(tmp: &Path, file: &str, from: &str, to: &str) {
        let path = tmp.join("config").join(file);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(from), "{file} does not contain `{from}`");
        fs::write(&path, text.replacen(from, to, 1)).unwrap();
    }

    fn expect_validation_field(tmp: &Path, expected: &str) {
        match load_config_from(tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let tmp = temp_config_dir("h2h_config_valid");
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.league.num_weeks, 25);
        assert_eq!(config.league.roster.sp_slots, 7);
        assert_eq!(config.league.roster.rp_slots, 4);
        assert_eq!(config.league.teams.len(), 10);
        assert_eq!(config.league.my_team.as_deref(), Some("team_1"));
        assert_eq!(config.categories.len(), 14);

        let so = config.categories.get(CategoryId::BatterStrikeouts);
        assert_eq!(so.direction, Direction::Lower);
        assert!((so.weekly_sd - 7.45).abs() < f64::EPSILON);
        assert!((config.categories.get(CategoryId::Whip).weekly_avg - 1.2048).abs() < f64::EPSILON);

        assert!((config.replacement.hitter.r - 76.0).abs() < f64::EPSILON);
        assert!((config.replacement.hitter.obp - 0.324).abs() < f64::EPSILON);
        assert!((config.replacement.sp_per_start.ip - 5.756).abs() < f64::EPSILON);
        assert!((config.replacement.rp_per_slot.hld - 0.8484).abs() < f64::EPSILON);

        assert!(config.hitters_path().starts_with(&tmp));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_missing_category_sd() {
        let tmp = temp_config_dir("h2h_config_missing_sd");
        rewrite(&tmp, "categories.toml", "weekly_sd = 1.3141\n", "");
        expect_validation_field(&tmp, "categories.ERA.weekly_sd");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_missing_category_average() {
        let tmp = temp_config_dir("h2h_config_missing_avg");
        rewrite(&tmp, "categories.toml", "weekly_avg = 8.02\n", "");
        expect_validation_field(&tmp, "categories.HR.weekly_avg");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_category_sd() {
        let tmp = temp_config_dir("h2h_config_zero_sd");
        rewrite(&tmp, "categories.toml", "weekly_sd = 2.57", "weekly_sd = 0.0");
        expect_validation_field(&tmp, "categories.SB.weekly_sd");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_category_id() {
        let tmp = temp_config_dir("h2h_config_unknown_cat");
        rewrite(&tmp, "categories.toml", "id = \"QS\"", "id = \"W\"");
        expect_validation_field(&tmp, "categories[13].id");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_weeks() {
        let tmp = temp_config_dir("h2h_config_zero_weeks");
        rewrite(&tmp, "league.toml", "num_weeks = 25", "num_weeks = 0");
        expect_validation_field(&tmp, "league.num_weeks");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_my_team() {
        let tmp = temp_config_dir("h2h_config_my_team");
        rewrite(&tmp, "league.toml", "my_team = \"team_1\"", "my_team = \"team_99\"");
        expect_validation_field(&tmp, "league.my_team");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_duplicate_team_id() {
        let tmp = temp_config_dir("h2h_config_dup_team");
        rewrite(&tmp, "league.toml", "id = \"team_2\"", "id = \"team_1\"");
        expect_validation_field(&tmp, "league.teams[1].id");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_innings_baseline() {
        let tmp = temp_config_dir("h2h_config_zero_ip");
        rewrite(&tmp, "categories.toml", "ip = 2.480", "ip = 0.0");
        expect_validation_field(&tmp, "replacement.rp_per_slot.ip");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_out_of_range_obp() {
        let tmp = temp_config_dir("h2h_config_obp");
        rewrite(&tmp, "categories.toml", "obp = 0.324", "obp = 1.5");
        expect_validation_field(&tmp, "replacement.hitter.obp");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_categories_toml() {
        let tmp = temp_config_dir("h2h_config_missing_categories");
        fs::remove_file(tmp.join("config/categories.toml")).unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("categories.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config_dir("h2h_config_invalid_toml");
        fs::write(tmp.join("config/league.toml"), "this is not valid [[[ toml").unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_and_keeps_existing() {
        let tmp = std::env::temp_dir().join("h2h_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();

        let root = project_root();
        for file in ["league.toml", "categories.toml"] {
            fs::copy(root.join("defaults").join(file), defaults_dir.join(file)).unwrap();
        }
        fs::write(defaults_dir.join("README.txt"), "not config").unwrap();
        fs::write(config_dir.join("league.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(copied[0].ends_with("categories.toml"));
        assert!(!config_dir.join("README.txt").exists());
        assert_eq!(
            fs::read_to_string(config_dir.join("league.toml")).unwrap(),
            "# custom\n"
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_seeds_once_and_never_truncates() {
        let tmp = std::env::temp_dir().join("h2h_config_seed_once");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        let root = project_root();
        for file in ["league.toml", "categories.toml"] {
            fs::copy(root.join("defaults").join(file), defaults_dir.join(file)).unwrap();
        }

        let first = ensure_config_files(&tmp).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(
            fs::read(tmp.join("config/categories.toml")).unwrap(),
            fs::read(defaults_dir.join("categories.toml")).unwrap()
        );

        // A file another process created in the meantime, even an empty
        // one, is left alone.
        fs::write(tmp.join("config/league.toml"), "").unwrap();
        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        assert_eq!(fs::read_to_string(tmp.join("config/league.toml")).unwrap(), "");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("h2h_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
