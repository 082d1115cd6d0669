use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use common::{OperationTimer, ReportError, ReportResult};
use tracing::info;

use crate::chart::{ChartRenderer, ChartSpec, Marker, Series, YScale};
use crate::model::ReportTable;
use crate::selection::{
    memory_groups, select_groups, Selector, FILL_PATTERN, FOREACH_PATTERN, READ_METHODS,
};

const X_LABEL: &str = "Размер матрицы (N×N)";
const TIME_LABEL: &str = "Время (микросекунды)";
const MEMORY_LABEL: &str = "Выделенная память (КБ)";

/// Один из четырёх графиков отчёта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Fill,
    ForEach,
    Read,
    Memory,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Fill,
        ChartKind::ForEach,
        ChartKind::Read,
        ChartKind::Memory,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::Fill => "fill_comparison.png",
            ChartKind::ForEach => "foreach_comparison.png",
            ChartKind::Read => "read_operations.png",
            ChartKind::Memory => "memory_allocation.png",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Fill => "fill",
            ChartKind::ForEach => "foreach",
            ChartKind::Read => "read",
            ChartKind::Memory => "memory",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ReportError::Config(format!(
                    "unknown chart {s:?}, expected one of: fill, foreach, read, memory"
                ))
            })
    }
}

/// Строит четыре графика по загруженной таблице.
///
/// Все проходы только читают таблицу и не зависят друг от друга.
pub struct ReportRenderer<'t, R> {
    table: &'t ReportTable,
    renderer: R,
    output_dir: PathBuf,
    display: bool,
}

impl<'t, R: ChartRenderer> ReportRenderer<'t, R> {
    pub fn new(table: &'t ReportTable, renderer: R) -> Self {
        Self {
            table,
            renderer,
            output_dir: PathBuf::from("."),
            display: false,
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Показывать каждый график после сохранения
    #[must_use]
    pub fn with_display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Сравнение Fill операций
    pub fn fill_comparison(&self) -> ChartSpec {
        self.timing_chart(
            ChartKind::Fill,
            Selector::MethodContains(FILL_PATTERN),
            "Сравнение производительности Fill операций",
            Marker::Circle,
        )
    }

    /// Сравнение ForEach операций
    pub fn foreach_comparison(&self) -> ChartSpec {
        self.timing_chart(
            ChartKind::ForEach,
            Selector::MethodContains(FOREACH_PATTERN),
            "Сравнение производительности ForEach операций",
            Marker::Square,
        )
    }

    /// Операции чтения `GetRow` / `GetColumn`
    pub fn read_operations(&self) -> ChartSpec {
        self.timing_chart(
            ChartKind::Read,
            Selector::MethodIn(&READ_METHODS),
            "Производительность операций чтения",
            Marker::Triangle,
        )
    }

    /// Выделенная память методов Fill, в КБ
    pub fn memory_allocation(&self) -> ReportResult<ChartSpec> {
        let series = memory_groups(self.table)
            .iter()
            .map(|group| -> ReportResult<Series> {
                let points = group.allocations().collect::<ReportResult<Vec<_>>>()?;
                Ok(Series::new(group.method, points))
            })
            .collect::<ReportResult<Vec<_>>>()?;

        Ok(ChartSpec {
            file_name: ChartKind::Memory.file_name(),
            title: "Использование памяти",
            x_label: X_LABEL,
            y_label: MEMORY_LABEL,
            y_scale: YScale::Linear,
            marker: Marker::Circle,
            series,
        })
    }

    fn timing_chart(
        &self,
        kind: ChartKind,
        selector: Selector<'_>,
        title: &'static str,
        marker: Marker,
    ) -> ChartSpec {
        let series = select_groups(self.table, selector)
            .iter()
            .map(|group| Series::new(group.method, group.timings()))
            .collect();

        ChartSpec {
            file_name: kind.file_name(),
            title,
            x_label: X_LABEL,
            y_label: TIME_LABEL,
            y_scale: YScale::Log,
            marker,
            series,
        }
    }

    pub fn chart(&self, kind: ChartKind) -> ReportResult<ChartSpec> {
        match kind {
            ChartKind::Fill => Ok(self.fill_comparison()),
            ChartKind::ForEach => Ok(self.foreach_comparison()),
            ChartKind::Read => Ok(self.read_operations()),
            ChartKind::Memory => self.memory_allocation(),
        }
    }

    /// Построить, сохранить и (по флагу) показать один график
    pub fn render(&self, kind: ChartKind) -> ReportResult<PathBuf> {
        let mut timer = OperationTimer::new(format!("render_{kind}"));

        let result = self.chart(kind).and_then(|spec| {
            timer.add_field("series", spec.series.len());
            if spec.is_empty() {
                info!(chart = %kind, "No matching rows, rendering empty chart");
            }

            let path = self.output_dir.join(spec.file_name);
            self.renderer.render(&spec, &path)?;
            info!(chart = %kind, path = %path.display(), series = spec.series.len(), "Chart written");

            if self.display {
                self.renderer.show(&path)?;
            }
            Ok(path)
        });

        timer.finish_with_result(&result);
        result
    }

    /// Построить графики по очереди; первая ошибка прерывает запуск
    pub fn render_all(&self, kinds: &[ChartKind]) -> ReportResult<Vec<PathBuf>> {
        kinds.iter().map(|&kind| self.render(kind)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RecordingRenderer;
    use crate::model::ReportRow;

    #[test]
    fn test_chart_kind_parsing() {
        assert_eq!("fill".parse::<ChartKind>().unwrap(), ChartKind::Fill);
        assert_eq!(" ForEach ".parse::<ChartKind>().unwrap(), ChartKind::ForEach);
        assert_eq!("MEMORY".parse::<ChartKind>().unwrap(), ChartKind::Memory);
        assert!(matches!(
            "transpose".parse::<ChartKind>(),
            Err(ReportError::Config(_))
        ));
    }

    #[test]
    fn test_file_names() {
        let names: Vec<_> = ChartKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "fill_comparison.png",
                "foreach_comparison.png",
                "read_operations.png",
                "memory_allocation.png"
            ]
        );
    }

    #[test]
    fn test_timing_charts_use_log_scale() {
        let table =
            ReportTable::normalize(vec![ReportRow::new("ForEach_Span", 10, "2 us", None)]).unwrap();
        let recorder = RecordingRenderer::new();
        let renderer = ReportRenderer::new(&table, &recorder);

        let foreach = renderer.foreach_comparison();
        assert_eq!(foreach.y_scale, YScale::Log);
        assert_eq!(foreach.marker, Marker::Square);
        assert_eq!(foreach.series[0].points, vec![(10.0, 2.0)]);

        assert_eq!(renderer.memory_allocation().unwrap().y_scale, YScale::Linear);
    }

    #[test]
    fn test_memory_conversion_error_aborts() {
        let table = ReportTable::normalize(vec![ReportRow::new(
            "Fill_Span",
            10,
            "2 us",
            Some("12 KB"),
        )])
        .unwrap();
        let recorder = RecordingRenderer::new();
        let renderer = ReportRenderer::new(&table, &recorder);

        assert!(matches!(
            renderer.render(ChartKind::Memory),
            Err(ReportError::Format { field: "Allocated", .. })
        ));
        assert!(recorder.rendered().is_empty());
    }

    #[test]
    fn test_display_flag() {
        let table = ReportTable::default();
        let recorder = RecordingRenderer::new();

        ReportRenderer::new(&table, &recorder)
            .with_output_dir("out")
            .with_display(true)
            .render(ChartKind::Read)
            .unwrap();

        assert_eq!(recorder.shown(), vec![PathBuf::from("out/read_operations.png")]);
    }
}
