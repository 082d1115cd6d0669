use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use prettytable::{format, row, Table};
use report::{allocated_to_kb, ReportTable};
use serde::Serialize;

use super::load_table;
use crate::config::PlotConfig;

/// Показать нормализованную таблицу отчёта
#[derive(Debug, Default, Args)]
pub struct SummaryCommand {
    /// CSV-отчёт BenchmarkDotNet
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Вывести JSON вместо таблицы
    #[arg(long)]
    pub json: bool,
}

/// Строка сводки
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub method: Option<String>,
    pub size: u32,
    pub mean: Option<String>,
    pub mean_us: f64,
    pub allocated: Option<String>,
    /// `None`, если ячейка пуста или не переводится в КБ (`"-"`)
    pub allocated_kb: Option<f64>,
}

impl SummaryCommand {
    pub fn execute(&self, config: PlotConfig) -> Result<()> {
        let input = self.input.clone().unwrap_or(config.input);
        let table = load_table(&input)?;
        let rows = summary_rows(&table);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            print!("{}", render_table(&rows));
        }
        Ok(())
    }
}

/// Строки сводки. В КБ переводится только то, что переводится:
/// `"-"` у методов без аллокаций выводится как есть.
pub fn summary_rows(table: &ReportTable) -> Vec<SummaryRow> {
    table
        .rows()
        .iter()
        .map(|row| SummaryRow {
            method: row.row.method.clone(),
            size: row.size(),
            mean: row.row.mean.clone(),
            mean_us: row.mean_us,
            allocated: row.row.allocated.clone(),
            allocated_kb: row.allocated().and_then(|cell| allocated_to_kb(cell).ok()),
        })
        .collect()
}

pub fn render_table(rows: &[SummaryRow]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row!["Method", "Size", "Mean", "Mean (µs)", "Allocated (KB)"]);

    for entry in rows {
        table.add_row(row![
            entry.method.as_deref().unwrap_or("-"),
            r->entry.size,
            entry.mean.as_deref().unwrap_or("-"),
            r->format!("{:.3}", entry.mean_us),
            r->allocated_cell(entry),
        ]);
    }

    table
}

fn allocated_cell(entry: &SummaryRow) -> String {
    match (entry.allocated_kb, entry.allocated.as_deref()) {
        (Some(kb), _) => format!("{kb:.2}"),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "-".to_string(),
    }
}
