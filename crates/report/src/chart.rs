use std::cell::RefCell;
use std::path::{Path, PathBuf};

use common::ReportResult;
use serde::Serialize;

/// Масштаб оси Y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum YScale {
    Linear,
    Log,
}

/// Форма маркера точек
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
}

/// Одна линия графика
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: impl IntoIterator<Item = (u32, f64)>) -> Self {
        Self {
            label: label.into(),
            points: points
                .into_iter()
                .map(|(size, value)| (f64::from(size), value))
                .collect(),
        }
    }
}

/// Описание графика, не зависящее от бэкенда отрисовки
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub file_name: &'static str,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub y_scale: YScale,
    pub marker: Marker,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn series(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label == label)
    }
}

/// Внешний исполнитель графиков: сохраняет и показывает изображения
pub trait ChartRenderer {
    /// Отрисовать график и записать изображение в `path`
    fn render(&self, spec: &ChartSpec, path: &Path) -> ReportResult<()>;

    /// Показать сохранённое изображение пользователю
    fn show(&self, path: &Path) -> ReportResult<()>;
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for &R {
    fn render(&self, spec: &ChartSpec, path: &Path) -> ReportResult<()> {
        (**self).render(spec, path)
    }

    fn show(&self, path: &Path) -> ReportResult<()> {
        (**self).show(path)
    }
}

/// Renderer that only remembers what it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    rendered: RefCell<Vec<(ChartSpec, PathBuf)>>,
    shown: RefCell<Vec<PathBuf>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> Vec<(ChartSpec, PathBuf)> {
        self.rendered.borrow().clone()
    }

    pub fn shown(&self) -> Vec<PathBuf> {
        self.shown.borrow().clone()
    }

    pub fn chart(&self, file_name: &str) -> Option<ChartSpec> {
        self.rendered
            .borrow()
            .iter()
            .find(|(spec, _)| spec.file_name == file_name)
            .map(|(spec, _)| spec.clone())
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, spec: &ChartSpec, path: &Path) -> ReportResult<()> {
        self.rendered
            .borrow_mut()
            .push((spec.clone(), path.to_path_buf()));
        Ok(())
    }

    fn show(&self, path: &Path) -> ReportResult<()> {
        self.shown.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}
