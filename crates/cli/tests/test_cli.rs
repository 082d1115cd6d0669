use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REPORT: &str = "\
Method;Job;Size;Mean;Error;StdDev;Allocated
Fill_Span;Default;100;50.00 us;0.1 us;0.2 us;1,024 B
Fill_Span;Default;200;0.1 ms;0.1 us;0.2 us;2,048 B
GetRow;Default;100;850 ns;1 ns;2 ns;-
";

/// Запуск benchplot в пустом каталоге без пользовательской конфигурации
fn benchplot(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("benchplot").expect("binary built");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("BENCHPLOT_INPUT")
        .env_remove("BENCHPLOT_OUTPUT_DIR")
        .env_remove("BENCHPLOT_DPI")
        .env_remove("BENCHPLOT_SHOW")
        .env_remove("RUST_LOG");
    cmd
}

fn write_report(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("report.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_missing_report_exits_with_not_found() {
    let dir = TempDir::new().unwrap();

    benchplot(dir.path())
        .args(["render", "--input", "missing.csv"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not found"));

    assert!(!dir.path().join("fill_comparison.png").exists());
}

#[test]
fn test_default_command_is_render() {
    let dir = TempDir::new().unwrap();

    // без подкоманды используется путь по умолчанию, которого нет
    benchplot(dir.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("MatrixBenchmarks-report.csv"));
}

#[test]
fn test_summary_table() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), REPORT);

    benchplot(dir.path())
        .arg("summary")
        .arg("--input")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fill_Span"))
        .stdout(predicate::str::contains("100.000"))
        .stdout(predicate::str::contains("0.850"));
}

#[test]
fn test_summary_json() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), REPORT);

    let output = benchplot(dir.path())
        .arg("summary")
        .arg("--json")
        .arg("--input")
        .arg(&report)
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["method"], "Fill_Span");
    assert_eq!(rows[1]["mean_us"], 100.0);
    assert_eq!(rows[1]["allocated_kb"], 2.0);
    assert_eq!(rows[2]["allocated"], "-");
    assert!(rows[2]["allocated_kb"].is_null());
}

#[test]
fn test_summary_reads_input_from_env() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), REPORT);

    benchplot(dir.path())
        .arg("summary")
        .env("BENCHPLOT_INPUT", "report.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("GetRow"));
}

#[test]
fn test_missing_column_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), "Method;Size;Mean\nFill_Span;100;1 us\n");

    benchplot(dir.path())
        .arg("summary")
        .arg("--input")
        .arg(&report)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("missing required column `Allocated`"));
}

#[test]
fn test_bad_mean_is_format_error() {
    let dir = TempDir::new().unwrap();
    let report = write_report(
        dir.path(),
        "Method;Size;Mean;Allocated\nFill_Span;100;fast;1 B\n",
    );

    benchplot(dir.path())
        .arg("render")
        .arg("--input")
        .arg(&report)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("\"fast\""));
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("benchplot.toml"), "dpi = \"high\"\n").unwrap();

    benchplot(dir.path())
        .arg("summary")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_zero_dpi_rejected() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), REPORT);

    benchplot(dir.path())
        .arg("render")
        .arg("--dpi")
        .arg("0")
        .arg("--input")
        .arg(&report)
        .assert()
        .code(5);
}

#[test]
fn test_unknown_chart_is_usage_error() {
    let dir = TempDir::new().unwrap();

    benchplot(dir.path())
        .args(["render", "--only", "fill,transpose"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("transpose"));
}

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();

    benchplot(dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    let written = fs::read_to_string(dir.path().join("benchplot.toml")).unwrap();
    assert!(written.contains("dpi = 300"));

    benchplot(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    benchplot(dir.path())
        .args(["config", "show"])
        .env("BENCHPLOT_DPI", "96")
        .assert()
        .success()
        .stdout(predicate::str::contains("benchplot.toml"))
        .stdout(predicate::str::contains("dpi = 96"));
}

#[test]
fn test_render_help_mentions_opt_in_display() {
    let dir = TempDir::new().unwrap();

    benchplot(dir.path())
        .args(["render", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--show"))
        .stdout(predicate::str::contains("только сохраняются"));
}
