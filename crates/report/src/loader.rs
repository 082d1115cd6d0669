use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use common::{ReportError, ReportResult};
use csv::StringRecord;
use tracing::{debug, info};

use crate::model::{is_missing, ReportRow};

/// Разделитель колонок в CSV-экспорте BenchmarkDotNet
pub const DELIMITER: u8 = b';';

/// Обязательные колонки заголовка
pub const REQUIRED_COLUMNS: [&str; 4] = ["Method", "Size", "Mean", "Allocated"];

/// Индексы обязательных колонок в заголовке
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    method: usize,
    size: usize,
    mean: usize,
    allocated: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> ReportResult<Self> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();

        let find = |column: &str| {
            names
                .iter()
                .position(|name| *name == column)
                .ok_or_else(|| {
                    ReportError::parse(1, format!("missing required column `{column}`"))
                })
        };

        Ok(Self {
            method: find("Method")?,
            size: find("Size")?,
            mean: find("Mean")?,
            allocated: find("Allocated")?,
        })
    }
}

/// Загрузить отчёт из файла
pub fn load_report(path: impl AsRef<Path>) -> ReportResult<Vec<ReportRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ReportError::NotFound(path.to_path_buf()),
        _ => ReportError::Io(e),
    })?;

    let rows = load_report_from_reader(file)?;
    info!(path = %path.display(), rows = rows.len(), "Report loaded");
    Ok(rows)
}

/// Загрузить отчёт из произвольного источника
pub fn load_report_from_reader<R: Read>(reader: R) -> ReportResult<Vec<ReportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    debug!(?columns, "Header parsed");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(parse_row(&record, columns)?);
    }

    Ok(rows)
}

fn parse_row(record: &StringRecord, columns: ColumnIndex) -> ReportResult<ReportRow> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let cell = |index: usize| {
        record
            .get(index)
            .filter(|value| !is_missing(value))
            .map(|value| value.trim().to_string())
    };

    let size = match cell(columns.size) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|e| ReportError::parse(line, format!("invalid Size {raw:?}: {e}")))?,
        None => return Err(ReportError::parse(line, "missing Size")),
    };

    Ok(ReportRow {
        method: cell(columns.method),
        size,
        mean: cell(columns.mean),
        allocated: cell(columns.allocated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Method;Job;Size;Mean;Error;StdDev;Allocated";

    fn load(body: &str) -> ReportResult<Vec<ReportRow>> {
        load_report_from_reader(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn test_load_preserves_order_and_ignores_extra_columns() {
        let rows = load(
            "Fill_100;Default;100;50.00 us;0.1 us;0.2 us;1,024 B\n\
             GetRow;Default;100;120.0 ns;1 ns;2 ns;-\n\
             Fill_200;Default;200;1.5 ms;0.1 ms;0.2 ms;\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ReportRow::new("Fill_100", 100, "50.00 us", Some("1,024 B")));
        assert_eq!(rows[1].allocated.as_deref(), Some("-"));
        assert_eq!(rows[2].method.as_deref(), Some("Fill_200"));
        assert_eq!(rows[2].allocated, None);
    }

    #[test]
    fn test_quoted_cells_and_column_order() {
        let data = "Allocated;Mean;Size;Method\n\"2,048 B\";\"1,234.5 us\";300;'Fill_300'\n";
        let rows = load_report_from_reader(data.as_bytes()).unwrap();

        assert_eq!(rows[0].allocated.as_deref(), Some("2,048 B"));
        assert_eq!(rows[0].mean.as_deref(), Some("1,234.5 us"));
        assert_eq!(rows[0].size, 300);
        assert_eq!(rows[0].method.as_deref(), Some("'Fill_300'"));
    }

    #[test]
    fn test_missing_method_is_none() {
        let rows = load(";Default;100;1 us;;;NA\n").unwrap();
        assert_eq!(rows[0].method, None);
        assert_eq!(rows[0].allocated, None);
    }

    #[test]
    fn test_missing_required_column() {
        let err = load_report_from_reader("Method;Size;Mean\nFill;1;1 us\n".as_bytes())
            .unwrap_err();
        match err {
            ReportError::Parse { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("Allocated"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_size() {
        let err = load("Fill_100;Default;big;1 us;;;\n").unwrap_err();
        assert!(matches!(err, ReportError::Parse { line: 2, .. }));

        let err = load("Fill_100;Default;;1 us;;;\n").unwrap_err();
        assert!(matches!(err, ReportError::Parse { .. }));
    }

    #[test]
    fn test_row_with_wrong_field_count() {
        let err = load("Fill_100;Default;100\n").unwrap_err();
        assert!(matches!(err, ReportError::Parse { .. }));
    }

    #[test]
    fn test_header_only() {
        assert!(load("").unwrap().is_empty());
    }

    #[test]
    fn test_not_found() {
        let err = load_report("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, ReportError::NotFound(p) if p.ends_with("here.csv")));
    }
}
