use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Прогресс по списку графиков
///
/// indicatif сам скрывает вывод, если stderr не терминал.
pub struct ChartProgress {
    bar: ProgressBar,
}

impl ChartProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub fn start(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    pub fn complete(&self, message: &str) {
        self.bar.set_message(format!("{} {message}", "✓".green()));
        self.bar.inc(1);
    }

    pub fn finish_success(&self, message: &str) {
        self.bar.finish_with_message(message.green().to_string());
    }

    pub fn finish_error(&self, message: &str) {
        let error_msg = format!("✗ {message}");
        self.bar.abandon_with_message(error_msg.red().to_string());
    }
}
