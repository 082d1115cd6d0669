//! Benchmark report renderer
//!
//! Loads a BenchmarkDotNet CSV report, normalizes timings to microseconds and
//! draws four comparison charts: Fill, ForEach, read operations and memory.

pub mod chart;
pub mod loader;
pub mod model;
pub mod plotting;
pub mod renderer;
pub mod selection;
pub mod units;

// Re-export commonly used types
pub use chart::{ChartRenderer, ChartSpec, Marker, RecordingRenderer, Series, YScale};
pub use loader::{load_report, load_report_from_reader};
pub use model::{NormalizedRow, ReportRow, ReportTable};
pub use plotting::{FigureSize, PlottersRenderer};
pub use renderer::{ChartKind, ReportRenderer};
pub use selection::{group_by_method, memory_groups, select_groups, MethodGroup, Selector};
pub use units::{allocated_to_kb, convert_to_us};
