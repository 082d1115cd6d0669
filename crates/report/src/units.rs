//! Unit conversion for BenchmarkDotNet cells.
//!
//! Timing cells look like `"1,234.56 us"`, allocation cells like `"2,048 B"`.

use common::{ReportError, ReportResult};

const THOUSANDS_SEPARATOR: char = ',';

/// Перевести значение `Mean` в микросекунды.
///
/// Единица ищется как подстрока в порядке `ns`, `us`/`μs`/`µs`, `ms`;
/// без единицы значение считается уже в микросекундах.
pub fn convert_to_us(time: &str) -> ReportResult<f64> {
    let time = time.trim();

    if time.contains("ns") {
        Ok(parse_number("Mean", time, &["ns"])? / 1000.0)
    } else if time.contains("us") || time.contains("μs") || time.contains("µs") {
        parse_number("Mean", time, &["us", "μs", "µs"])
    } else if time.contains("ms") {
        Ok(parse_number("Mean", time, &["ms"])? * 1000.0)
    } else {
        parse_number("Mean", time, &[])
    }
}

/// Перевести значение `Allocated` (`"2,048 B"`) в килобайты.
pub fn allocated_to_kb(allocated: &str) -> ReportResult<f64> {
    Ok(parse_number("Allocated", allocated, &[" B"])? / 1024.0)
}

fn parse_number(field: &'static str, raw: &str, units: &[&str]) -> ReportResult<f64> {
    let mut text = raw.to_string();
    for unit in units {
        text = text.replace(unit, "");
    }
    text.retain(|c| c != THOUSANDS_SEPARATOR);

    text.trim()
        .parse::<f64>()
        .map_err(|_| ReportError::format(field, raw))
}
