use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use common::{ReportError, ReportResult};
use report::FigureSize;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Путь к отчёту BenchmarkDotNet относительно каталога `plotter/`
pub const DEFAULT_INPUT: &str =
    "../BenchmarkDotNet.Artifacts/results/Matrix.Benchmarks.MatrixBenchmarks-report.csv";

pub const ENV_PREFIX: &str = "BENCHPLOT_";

/// Настройки запуска benchplot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    /// CSV-отчёт
    pub input: PathBuf,
    /// Каталог для PNG
    pub output_dir: PathBuf,
    /// Плотность пикселей
    pub dpi: u32,
    /// Ширина фигуры в дюймах
    pub width_in: f64,
    /// Высота фигуры в дюймах
    pub height_in: f64,
    /// Открывать графики после сохранения
    pub show: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        let figure = FigureSize::default();
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            dpi: figure.dpi,
            width_in: figure.width_in,
            height_in: figure.height_in,
            show: false,
        }
    }
}

impl PlotConfig {
    pub fn figure(&self) -> FigureSize {
        FigureSize {
            width_in: self.width_in,
            height_in: self.height_in,
            dpi: self.dpi,
        }
    }

    pub fn to_toml(&self) -> ReportResult<String> {
        toml::to_string_pretty(self).map_err(|e| ReportError::Config(e.to_string()))
    }
}

/// Откуда взята конфигурация
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    config_paths: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            config_paths: Self::default_config_paths(),
        }
    }

    /// Файл, указанный явно (`--config`), обязан существовать
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.explicit_path = Some(path);
        self
    }

    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("benchplot.toml"),
            PathBuf::from(".benchplotrc.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("benchplot").join("config.toml"));
        }

        paths
    }

    /// Умолчания → файл → переменные окружения
    pub fn load(&self) -> ReportResult<(PlotConfig, ConfigSource)> {
        let (config, source) = self.load_base_config()?;
        let config = self.apply_env_overrides(config, |key| env::var(key).ok())?;
        Ok((config, source))
    }

    fn load_base_config(&self) -> ReportResult<(PlotConfig, ConfigSource)> {
        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                return Err(ReportError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            let config = Self::load_file(path)?;
            info!("Loaded configuration from: {}", path.display());
            return Ok((config, ConfigSource::File(path.clone())));
        }

        for path in &self.config_paths {
            if path.exists() {
                let config = Self::load_file(path)?;
                info!("Loaded configuration from: {}", path.display());
                return Ok((config, ConfigSource::File(path.clone())));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok((PlotConfig::default(), ConfigSource::Default))
    }

    pub fn load_file(path: &Path) -> ReportResult<PlotConfig> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))
    }

    /// Применить `BENCHPLOT_*`; `lookup` читает значение переменной
    pub fn apply_env_overrides<F>(&self, mut config: PlotConfig, lookup: F) -> ReportResult<PlotConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((_, value)) = var("INPUT") {
            config.input = PathBuf::from(value);
        }
        if let Some((_, value)) = var("OUTPUT_DIR") {
            config.output_dir = PathBuf::from(value);
        }
        if let Some((key, value)) = var("DPI") {
            config.dpi = value
                .trim()
                .parse()
                .map_err(|_| ReportError::Config(format!("{key}={value:?} is not a valid dpi")))?;
        }
        if let Some((key, value)) = var("SHOW") {
            config.show = parse_bool(&value)
                .ok_or_else(|| ReportError::Config(format!("{key}={value:?} is not a boolean")))?;
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PlotConfig::default();
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.figure().pixels(), (3600, 1800));
        assert!(!config.show);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("benchplot.toml");
        fs::write(&path, "input = \"report.csv\"\ndpi = 150\n").unwrap();

        let (config, source) = ConfigLoader::new()
            .with_search_paths(vec![dir.path().join("missing.toml"), path.clone()])
            .load_base_config()
            .unwrap();

        assert_eq!(source, ConfigSource::File(path));
        assert_eq!(config.input, PathBuf::from("report.csv"));
        assert_eq!(config.dpi, 150);
        assert_eq!(config.width_in, 12.0);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("benchplot.toml");
        fs::write(&path, "dpi = \"high\"\n").unwrap();

        let err = ConfigLoader::new().with_path(path).load_base_config().unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("benchplot.toml");
        fs::write(&path, "colour = \"red\"\n").unwrap();

        assert!(ConfigLoader::load_file(&path).is_err());
    }

    #[test]
    fn test_missing_explicit_path() {
        let err = ConfigLoader::new()
            .with_path(PathBuf::from("nope/benchplot.toml"))
            .load_base_config()
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_no_files_uses_defaults() {
        let (config, source) = ConfigLoader::new()
            .with_search_paths(Vec::new())
            .load_base_config()
            .unwrap();
        assert_eq!(source, ConfigSource::Default);
        assert_eq!(config, PlotConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let loader = ConfigLoader::new();
        let config = loader
            .apply_env_overrides(
                PlotConfig::default(),
                lookup(&[
                    ("BENCHPLOT_INPUT", "data.csv"),
                    ("BENCHPLOT_OUTPUT_DIR", "charts"),
                    ("BENCHPLOT_DPI", " 96 "),
                    ("BENCHPLOT_SHOW", "yes"),
                ]),
            )
            .unwrap();

        assert_eq!(config.input, PathBuf::from("data.csv"));
        assert_eq!(config.output_dir, PathBuf::from("charts"));
        assert_eq!(config.dpi, 96);
        assert!(config.show);
    }

    #[test]
    fn test_env_ignores_foreign_prefix_and_rejects_invalid_values() {
        let loader = ConfigLoader::new();
        let config = loader
            .apply_env_overrides(PlotConfig::default(), lookup(&[("PLOT_DPI", "1")]))
            .unwrap();
        assert_eq!(config.dpi, 300);

        let err = loader
            .apply_env_overrides(PlotConfig::default(), lookup(&[("BENCHPLOT_SHOW", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("BENCHPLOT_SHOW"));

        let err = loader
            .apply_env_overrides(PlotConfig::default(), lookup(&[("BENCHPLOT_DPI", "high")]))
            .unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PlotConfig {
            show: true,
            ..PlotConfig::default()
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("show = true"));
        assert_eq!(toml::from_str::<PlotConfig>(&text).unwrap(), config);
    }
}
