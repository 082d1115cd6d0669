use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use report::{ChartKind, PlottersRenderer, ReportRenderer};
use tracing::info;

use super::load_table;
use crate::config::PlotConfig;
use crate::progress::ChartProgress;

/// Построить графики и сохранить их в PNG
#[derive(Debug, Default, Args)]
pub struct RenderCommand {
    /// CSV-отчёт BenchmarkDotNet
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Каталог для PNG-файлов
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Только выбранные графики: fill, foreach, read, memory
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<ChartKind>,

    /// Открыть каждый график в системном просмотрщике после сохранения
    /// (по умолчанию графики только сохраняются)
    #[arg(long)]
    pub show: bool,

    /// Плотность пикселей
    #[arg(long)]
    pub dpi: Option<u32>,
}

impl RenderCommand {
    /// Флаги командной строки поверх конфигурации
    pub fn apply_overrides(&self, config: &mut PlotConfig) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if self.show {
            config.show = true;
        }
    }

    /// Графики в порядке запроса, без повторов
    pub fn kinds(&self) -> Vec<ChartKind> {
        if self.only.is_empty() {
            return ChartKind::ALL.to_vec();
        }
        let mut kinds = Vec::with_capacity(self.only.len());
        for kind in &self.only {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }

    pub fn execute(&self, mut config: PlotConfig) -> Result<Vec<PathBuf>> {
        self.apply_overrides(&mut config);

        // размер фигуры проверяется до чтения отчёта
        let plotter = PlottersRenderer::new(config.figure())?;
        let table = load_table(&config.input)?;

        fs::create_dir_all(&config.output_dir).with_context(|| {
            format!("cannot create output directory {}", config.output_dir.display())
        })?;

        let kinds = self.kinds();
        let renderer = ReportRenderer::new(&table, plotter)
            .with_output_dir(&config.output_dir)
            .with_display(config.show);

        let progress = ChartProgress::new(kinds.len());
        let mut written = Vec::with_capacity(kinds.len());
        for kind in kinds {
            progress.start(kind.file_name());
            match renderer.render(kind) {
                Ok(path) => {
                    progress.complete(kind.file_name());
                    written.push(path);
                }
                Err(e) => {
                    progress.finish_error(&format!("{kind}: {e}"));
                    return Err(e).with_context(|| format!("failed to render {kind} chart"));
                }
            }
        }
        progress.finish_success(&format!("{} charts written", written.len()));

        info!(count = written.len(), dir = %config.output_dir.display(), "Rendering finished");
        Ok(written)
    }
}
