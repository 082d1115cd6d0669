use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use cli::{ConfigCommand, ConfigLoader, RenderCommand, SummaryCommand};
use common::{init_structured_logging, LoggingConfig, ReportError};
use console::style;
use tracing::debug;

#[derive(Parser)]
#[command(name = "benchplot")]
#[command(about = "Графики сравнения производительности по отчёту BenchmarkDotNet")]
#[command(version)]
struct Cli {
    /// Файл конфигурации (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Логи в JSON формате
    #[arg(long, global = true)]
    json_logs: bool,

    /// Подробнее: -v, -vv, -vvv
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Построить графики (команда по умолчанию)
    Render(RenderCommand),
    /// Показать нормализованную таблицу отчёта
    Summary(SummaryCommand),
    /// Управление конфигурацией
    Config(ConfigCommand),
}

fn main() {
    let cli = Cli::parse();

    let logging = LoggingConfig::default()
        .with_level(LoggingConfig::level_for_verbosity(cli.verbose))
        .with_json_output(cli.json_logs)
        .with_color_output(console::Term::stderr().features().colors_supported());
    if let Err(e) = init_structured_logging(logging) {
        eprintln!("failed to initialize logging: {e}");
    }

    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", style("error:").red().bold());
        let code = err
            .downcast_ref::<ReportError>()
            .map_or(1, ReportError::exit_code);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let loader = match cli.config {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let (config, source) = loader.load()?;
    debug!(?source, ?config, "Configuration resolved");

    match cli.command {
        Some(Commands::Render(command)) => {
            for path in command.execute(config)? {
                println!("{}", path.display());
            }
        }
        Some(Commands::Summary(command)) => command.execute(config)?,
        Some(Commands::Config(command)) => command.execute(&config, &source)?,
        None => {
            for path in RenderCommand::default().execute(config)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
