//! `plotters`-backed chart renderer.

use std::ops::Range;
use std::path::Path;
use std::process::Command;

use common::{ReportError, ReportResult};
use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use tracing::{debug, warn};

use crate::chart::{ChartRenderer, ChartSpec, Marker, Series, YScale};

/// Палитра tab10
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const FONT: &str = "sans-serif";

/// Размер фигуры в дюймах и плотность пикселей
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Default for FigureSize {
    fn default() -> Self {
        Self {
            width_in: 12.0,
            height_in: 6.0,
            dpi: 300,
        }
    }
}

impl FigureSize {
    pub fn validate(&self) -> ReportResult<()> {
        if !(self.width_in > 0.0 && self.height_in > 0.0) {
            return Err(ReportError::Config(format!(
                "figure size must be positive, got {}x{} in",
                self.width_in, self.height_in
            )));
        }
        if self.dpi == 0 {
            return Err(ReportError::Config("dpi must be positive".to_string()));
        }
        Ok(())
    }

    pub fn pixels(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Типографские пункты в пиксели
    fn pt(&self, points: f64) -> u32 {
        self.font(points).round().max(1.0) as u32
    }

    fn font(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }
}

/// Рендерер PNG через `BitMapBackend`
#[derive(Debug, Clone, Default)]
pub struct PlottersRenderer {
    figure: FigureSize,
}

impl PlottersRenderer {
    pub fn new(figure: FigureSize) -> ReportResult<Self> {
        figure.validate()?;
        Ok(Self { figure })
    }

    pub fn figure(&self) -> FigureSize {
        self.figure
    }

    fn draw_chart<DB, Y>(
        &self,
        root: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
        series: &[Series],
        x_range: Range<f64>,
        y_range: Y,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
    where
        DB: DrawingBackend,
        Y: AsRangedCoord<Value = f64>,
        Y::CoordDescType: ValueFormatter<f64>,
    {
        let fig = &self.figure;
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption(spec.title, (FONT, fig.font(14.0), FontStyle::Bold))
            .margin(fig.pt(10.0))
            .x_label_area_size(fig.pt(36.0))
            .y_label_area_size(fig.pt(54.0))
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_label)
            .y_desc(spec.y_label)
            .axis_desc_style((FONT, fig.font(12.0)))
            .label_style((FONT, fig.font(10.0)))
            .bold_line_style(&BLACK.mix(0.3))
            .light_line_style(&TRANSPARENT)
            .draw()?;

        let line_width = fig.pt(2.0);
        let marker_size = fig.pt(3.0);

        for (idx, line) in series.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            let stroke = color.stroke_width(line_width);
            let legend_len = fig.pt(20.0) as i32;

            chart
                .draw_series(LineSeries::new(line.points.iter().copied(), stroke))?
                .label(line.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], stroke));

            let points = line.points.iter().copied();
            match spec.marker {
                Marker::Circle => {
                    chart.draw_series(points.map(|p| Circle::new(p, marker_size, color.filled())))?;
                }
                Marker::Square => {
                    let half = marker_size as i32;
                    chart.draw_series(points.map(|p| {
                        EmptyElement::at(p)
                            + Rectangle::new([(-half, -half), (half, half)], color.filled())
                    }))?;
                }
                Marker::Triangle => {
                    chart.draw_series(
                        points.map(|p| TriangleMarker::new(p, marker_size, color.filled())),
                    )?;
                }
            }
        }

        if !series.is_empty() {
            chart
                .configure_series_labels()
                .label_font((FONT, fig.font(10.0)))
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK.mix(0.3))
                .position(SeriesLabelPosition::UpperLeft)
                .draw()?;
        }

        root.present()?;
        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, spec: &ChartSpec, path: &Path) -> ReportResult<()> {
        let series = match spec.y_scale {
            YScale::Linear => spec.series.clone(),
            YScale::Log => positive_only(spec),
        };
        let x_range = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)));

        let root = BitMapBackend::new(path, self.figure.pixels()).into_drawing_area();
        let result = match spec.y_scale {
            YScale::Linear => {
                let y_range = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
                self.draw_chart(&root, spec, &series, x_range, y_range)
            }
            YScale::Log => {
                let y_range = log_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
                self.draw_chart(&root, spec, &series, x_range, y_range.log_scale())
            }
        };

        result.map_err(|e| ReportError::Render(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), series = series.len(), "Chart rasterized");
        Ok(())
    }

    fn show(&self, path: &Path) -> ReportResult<()> {
        let mut command = viewer_command();
        command.arg(path);
        command
            .spawn()
            .map_err(|e| ReportError::Render(format!("cannot open viewer for {}: {e}", path.display())))?;
        Ok(())
    }
}

fn viewer_command() -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    }
}

/// На логарифмической оси нельзя показать значения <= 0
fn positive_only(spec: &ChartSpec) -> Vec<Series> {
    spec.series
        .iter()
        .map(|series| {
            let points: Vec<(f64, f64)> = series.points.iter().copied().filter(|p| p.1 > 0.0).collect();
            if points.len() != series.points.len() {
                warn!(
                    chart = spec.file_name,
                    series = %series.label,
                    dropped = series.points.len() - points.len(),
                    "Non-positive values dropped from log-scale chart"
                );
            }
            Series {
                label: series.label.clone(),
                points,
            }
        })
        .collect()
}

/// Диапазон данных с отступом 5%; пустые данные дают `0..1`
pub(crate) fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let Some((min, max)) = min_max(values) else {
        return 0.0..1.0;
    };
    if min == max {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        return (min - pad)..(max + pad);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Диапазон для логарифмической оси; пустые данные дают `1..10`
pub(crate) fn log_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    match min_max(values.filter(|v| *v > 0.0)) {
        Some((min, max)) => (min / 1.5)..(max * 1.5),
        None => 1.0..10.0,
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
