use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use tracing::info;

use crate::config::{ConfigSource, PlotConfig};

/// Работа с файлом конфигурации
#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Показать итоговую конфигурацию (файл + окружение)
    Show,

    /// Создать benchplot.toml с настройками по умолчанию
    Init {
        /// Куда записать файл
        #[arg(short, long, default_value = "benchplot.toml")]
        output: PathBuf,

        /// Перезаписать существующий файл
        #[arg(short, long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(&self, config: &PlotConfig, source: &ConfigSource) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Show => {
                match source {
                    ConfigSource::File(path) => println!("# Loaded from {}", path.display()),
                    ConfigSource::Default => println!("# Built-in defaults"),
                }
                print!("{}", config.to_toml()?);
                Ok(())
            }
            ConfigSubcommand::Init { output, force } => init_config(output, *force),
        }
    }
}

fn init_config(output: &PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "configuration file {} already exists, use --force to overwrite",
            output.display()
        );
    }

    fs::write(output, PlotConfig::default().to_toml()?)?;
    info!("Configuration file generated at: {}", output.display());
    println!("Created {}", output.display());
    Ok(())
}
