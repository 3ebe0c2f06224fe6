use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::{PointBudgets, RankingOptions};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub job_postings: String,
    pub preference_profiles: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_enabled() -> bool { true }
fn default_cache_ttl() -> u64 { 60 }
fn default_cache_capacity() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_min_score_threshold")]
    pub min_score_threshold: f64,
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    /// Falls back to the number of available cores when unset
    pub max_workers: Option<usize>,
    pub default_deadline_ms: Option<u64>,
    pub candidate_fetch_limit: Option<usize>,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            min_score_threshold: default_min_score_threshold(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            max_workers: None,
            default_deadline_ms: None,
            candidate_fetch_limit: None,
        }
    }
}

impl RankingSettings {
    pub fn default_options(&self) -> RankingOptions {
        RankingOptions {
            min_score_threshold: self.min_score_threshold,
            limit: self.default_limit as usize,
            require_preferences: false,
        }
    }
}

fn default_min_score_threshold() -> f64 { 20.0 }
fn default_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub budgets: BudgetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetsConfig {
    #[serde(default = "default_skills_budget")]
    pub skills: f64,
    #[serde(default = "default_location_budget")]
    pub location: f64,
    #[serde(default = "default_compensation_budget")]
    pub compensation: f64,
    #[serde(default = "default_seniority_budget")]
    pub seniority: f64,
    #[serde(default = "default_employer_size_budget")]
    pub employer_size: f64,
}

impl Default for BudgetsConfig {
    fn default() -> Self {
        Self {
            skills: default_skills_budget(),
            location: default_location_budget(),
            compensation: default_compensation_budget(),
            seniority: default_seniority_budget(),
            employer_size: default_employer_size_budget(),
        }
    }
}

impl From<&BudgetsConfig> for PointBudgets {
    fn from(config: &BudgetsConfig) -> Self {
        PointBudgets {
            skills: config.skills,
            location: config.location,
            compensation: config.compensation,
            seniority: config.seniority,
            employer_size: config.employer_size,
        }
    }
}

fn default_skills_budget() -> f64 { 40.0 }
fn default_location_budget() -> f64 { 25.0 }
fn default_compensation_budget() -> f64 { 20.0 }
fn default_seniority_budget() -> f64 { 15.0 }
fn default_employer_size_budget() -> f64 { 10.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with JOBMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., JOBMATCH__RANKING__MAX_WORKERS -> ranking.max_workers
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_appwrite_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn point_budgets(&self) -> PointBudgets {
        PointBudgets::from(&self.scoring.budgets)
    }
}

/// Let the conventional APPWRITE_* variables override the file values
fn apply_appwrite_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("APPWRITE_ENDPOINT", "appwrite.endpoint"),
        ("APPWRITE_API_KEY", "appwrite.api_key"),
        ("APPWRITE_PROJECT_ID", "appwrite.project_id"),
        ("APPWRITE_DATABASE_ID", "appwrite.database_id"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_budgets() {
        let budgets = PointBudgets::from(&BudgetsConfig::default());
        assert_eq!(budgets, PointBudgets::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let raw = r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [appwrite]
            endpoint = "https://appwrite.test/v1"
            api_key = "key"
            project_id = "project"
            database_id = "db"

            [collection]
            job_postings = "job_postings"
            preference_profiles = "preference_profiles"

            [ranking]
            max_workers = 2
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.ranking.max_workers, Some(2));
        assert_eq!(settings.ranking.min_score_threshold, 20.0);
        assert_eq!(settings.ranking.default_options().limit, 20);
        assert!(settings.cache.enabled);
        assert_eq!(settings.point_budgets().total(), 100.0);
    }
}
