use crate::Result;
use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// TOML configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisParams,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 各分析呼び出しに渡すパラメータ
///
/// グローバルには保持しない。呼び出し側が明示的に渡す。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisParams {
    /// トレンド変化検出のウィンドウ幅
    #[serde(default = "default_trend_window_size")]
    pub trend_window_size: usize,
    /// 季節性の周期（日次データなら 7 = 週次）
    #[serde(default = "default_season_length")]
    pub season_length: usize,
    /// Z スコア外れ値の閾値
    #[serde(default = "default_zscore_threshold")]
    pub zscore_threshold: f64,
    /// 変化点検出の最小セグメント長
    #[serde(default = "default_min_segment_length")]
    pub min_segment_length: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// "term" または "json"。`analytics::init_logging` でロガーに反映する
    #[serde(default = "default_rust_log_format")]
    pub rust_log_format: String,
}

// Default values
fn default_trend_window_size() -> usize {
    7
}

fn default_season_length() -> usize {
    7
}

fn default_zscore_threshold() -> f64 {
    2.5
}

fn default_min_segment_length() -> usize {
    3
}

fn default_rust_log_format() -> String {
    "term".to_string()
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            trend_window_size: default_trend_window_size(),
            season_length: default_season_length(),
            zscore_threshold: default_zscore_threshold(),
            min_segment_length: default_min_segment_length(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log_format: default_rust_log_format(),
        }
    }
}

impl AnalysisParams {
    /// 最初に見つかった不正な項目の名前と理由を返す
    pub fn find_invalid(&self) -> Option<(&'static str, String)> {
        if self.trend_window_size == 0 {
            return Some(("trend_window_size", "must be greater than 0".to_string()));
        }
        if self.season_length == 0 {
            return Some(("season_length", "must be greater than 0".to_string()));
        }
        if self.min_segment_length == 0 {
            return Some(("min_segment_length", "must be greater than 0".to_string()));
        }
        if !self.zscore_threshold.is_finite() || self.zscore_threshold < 0.0 {
            return Some((
                "zscore_threshold",
                format!(
                    "must be a finite non-negative number: {}",
                    self.zscore_threshold
                ),
            ));
        }
        None
    }

    /// 0 長のウィンドウや不正な閾値を拒否する
    pub fn validate(&self) -> Result<()> {
        match self.find_invalid() {
            Some((name, reason)) => Err(anyhow!("{} {}", name, reason)),
            None => Ok(()),
        }
    }
}

/// TOML 文字列から設定を読み込む
pub fn from_toml_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.analysis.validate()?;
    Ok(config)
}

/// Load configuration from a directory with priority:
/// 1. Environment variables (ANALYSIS_*, RUST_LOG_FORMAT)
/// 2. <dir>/config.local.toml (git-ignored, for local overrides)
/// 3. <dir>/config.toml (git-managed template)
/// 4. Default values
pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Config> {
    let dir = dir.as_ref();
    let mut config = Config::default();

    let base_path = dir.join("config.toml");
    if base_path.exists() {
        let content = fs::read_to_string(&base_path)
            .with_context(|| format!("failed to read {}", base_path.display()))?;
        config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", base_path.display()))?;
    }

    let local_path = dir.join("config.local.toml");
    if local_path.exists() {
        let content = fs::read_to_string(&local_path)
            .with_context(|| format!("failed to read {}", local_path.display()))?;
        let local_config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", local_path.display()))?;
        merge_config(&mut config, local_config);
    }

    apply_env_overrides(&mut config)?;
    config.analysis.validate()?;
    Ok(config)
}

/// Merge local config into base config (local values override base values)
fn merge_config(base: &mut Config, local: Config) {
    // Analysis
    if local.analysis.trend_window_size != default_trend_window_size() {
        base.analysis.trend_window_size = local.analysis.trend_window_size;
    }
    if local.analysis.season_length != default_season_length() {
        base.analysis.season_length = local.analysis.season_length;
    }
    if local.analysis.zscore_threshold != default_zscore_threshold() {
        base.analysis.zscore_threshold = local.analysis.zscore_threshold;
    }
    if local.analysis.min_segment_length != default_min_segment_length() {
        base.analysis.min_segment_length = local.analysis.min_segment_length;
    }

    // Logging
    if local.logging.rust_log_format != default_rust_log_format() {
        base.logging.rust_log_format = local.logging.rust_log_format;
    }
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(v) = env_value("ANALYSIS_TREND_WINDOW_SIZE") {
        config.analysis.trend_window_size = parse_env("ANALYSIS_TREND_WINDOW_SIZE", &v)?;
    }
    if let Some(v) = env_value("ANALYSIS_SEASON_LENGTH") {
        config.analysis.season_length = parse_env("ANALYSIS_SEASON_LENGTH", &v)?;
    }
    if let Some(v) = env_value("ANALYSIS_ZSCORE_THRESHOLD") {
        config.analysis.zscore_threshold = parse_env("ANALYSIS_ZSCORE_THRESHOLD", &v)?;
    }
    if let Some(v) = env_value("ANALYSIS_MIN_SEGMENT_LENGTH") {
        config.analysis.min_segment_length = parse_env("ANALYSIS_MIN_SEGMENT_LENGTH", &v)?;
    }
    if let Some(v) = env_value("RUST_LOG_FORMAT") {
        config.logging.rust_log_format = v;
    }
    Ok(())
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_env<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| anyhow!("invalid value for {}: {}: {}", name, value, e))
}
