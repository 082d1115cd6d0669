use common::ReportResult;
use serde::Serialize;

use crate::units::convert_to_us;

/// Значения, которые считаются пропуском (NA-маркеры pandas по умолчанию)
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Пустая ячейка или NA-маркер
pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Одна строка отчёта BenchmarkDotNet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Имя метода бенчмарка (`Fill_N`, `GetRow`, ...)
    pub method: Option<String>,
    /// Размер матрицы N
    pub size: u32,
    /// Среднее время с единицей измерения (`"1,234.5 us"`)
    pub mean: Option<String>,
    /// Выделенная память с суффиксом `" B"`
    pub allocated: Option<String>,
}

impl ReportRow {
    pub fn new(
        method: impl Into<String>,
        size: u32,
        mean: impl Into<String>,
        allocated: Option<&str>,
    ) -> Self {
        Self {
            method: Some(method.into()),
            size,
            mean: Some(mean.into()),
            allocated: allocated.map(str::to_string),
        }
    }
}

/// Строка отчёта с нормализованным временем
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    #[serde(flatten)]
    pub row: ReportRow,
    /// Среднее время в микросекундах
    pub mean_us: f64,
}

impl NormalizedRow {
    pub fn method(&self) -> Option<&str> {
        self.row.method.as_deref()
    }

    pub fn size(&self) -> u32 {
        self.row.size
    }

    pub fn allocated(&self) -> Option<&str> {
        self.row.allocated.as_deref()
    }
}

/// Загруженная таблица: порядок строк как в файле, после нормализации
/// только для чтения.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTable {
    rows: Vec<NormalizedRow>,
}

impl ReportTable {
    /// Добавить колонку `Mean_us` ко всем строкам
    pub fn normalize(rows: Vec<ReportRow>) -> ReportResult<Self> {
        let rows = rows
            .into_iter()
            .map(|row| -> ReportResult<NormalizedRow> {
                let mean_us = convert_to_us(row.mean.as_deref().unwrap_or_default())?;
                Ok(NormalizedRow { row, mean_us })
            })
            .collect::<ReportResult<Vec<_>>>()?;

        tracing::debug!(rows = rows.len(), "Report normalized");
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
