//! End-to-end tests for the `txr` binary.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::TempDir;

/// A `txr` command isolated from any user configuration.
fn txr(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("txr");
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env_remove("TXR_CONFIG")
        .env_remove("TXR_CONFIG_DIR")
        .env_remove("TXR_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("run txr");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

mod sweep {
    use super::*;

    #[test]
    fn default_sweep_spans_ten_points() {
        let home = TempDir::new().unwrap();
        let json = json_stdout(txr(&home).arg("sweep"));
        let n_total = json["figure"]["sweep"]["n_total"].as_array().unwrap();
        assert_eq!(n_total.len(), 10);
        assert_eq!(n_total[0], 100);
        assert_eq!(n_total[9], 1000);
        assert_eq!(json["confidence_level"], 95.0);
        assert_eq!(json["figure"]["tpr_panel"]["series"][1]["label"], "Lower CI (95.0%)");
    }

    #[test]
    fn two_points_return_endpoints() {
        let home = TempDir::new().unwrap();
        let json = json_stdout(txr(&home).args([
            "sweep", "--ntot-min", "50", "--ntot-max", "5000", "--num-points", "2",
        ]));
        assert_eq!(json["figure"]["sweep"]["n_total"], serde_json::json!([50, 5000]));
    }

    #[test]
    fn inverted_range_is_adjusted_with_warning() {
        let home = TempDir::new().unwrap();
        txr(&home)
            .args(["sweep", "--ntot-min", "800", "--ntot-max", "200"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Adjusted automatically"))
            .stdout(predicate::str::contains("\"ntot_max\": 900"));
    }

    #[test]
    fn out_of_range_prevalence_fails() {
        let home = TempDir::new().unwrap();
        txr(&home)
            .args(["sweep", "--prevalence", "0.999"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("prevalence"))
            .stdout(predicate::str::contains("\"code\": 13"));
    }

    #[test]
    fn markdown_output_has_notes() {
        let home = TempDir::new().unwrap();
        txr(&home)
            .args(["--format", "md", "sweep"])
            .assert()
            .success()
            .stdout(predicate::str::contains("| 100 | 50 | 50 |"))
            .stdout(predicate::str::contains("About this Visualization"));
    }
}

mod interval {
    use super::*;

    #[test]
    fn explicit_counts() {
        let home = TempDir::new().unwrap();
        let json = json_stdout(txr(&home).args([
            "interval", "--tpr", "0.8", "--n-pos", "100", "--n-neg", "100",
        ]));
        let lower = json["interval"]["tpr"]["lower"].as_f64().unwrap();
        let upper = json["interval"]["tpr"]["upper"].as_f64().unwrap();
        assert!((lower - 0.7082).abs() < 1e-3);
        assert!((upper - 0.8733).abs() < 1e-3);
    }

    #[test]
    fn prevalence_and_total() {
        let home = TempDir::new().unwrap();
        let json = json_stdout(txr(&home).args([
            "interval", "--prevalence", "0.3", "--n-total", "200",
        ]));
        assert_eq!(json["interval"]["n_pos"], 60);
        assert_eq!(json["interval"]["n_neg"], 140);
    }

    #[test]
    fn missing_parameterization_fails() {
        let home = TempDir::new().unwrap();
        txr(&home)
            .args(["interval", "--n-pos", "10"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("invalid argument"));
    }
}

mod simulate {
    use super::*;

    #[test]
    fn seeded_runs_are_identical() {
        let home = TempDir::new().unwrap();
        let args = [
            "simulate", "--n-pos", "50", "--n-neg", "50", "--trials", "200", "--seed", "3",
        ];
        let a = json_stdout(txr(&home).args(args));
        let b = json_stdout(txr(&home).args(args));
        assert_eq!(a, b);
        assert_eq!(a["summary"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn summary_table() {
        let home = TempDir::new().unwrap();
        txr(&home)
            .args([
                "--format", "summary", "simulate", "--n-pos", "20", "--n-neg", "80", "--trials",
                "100", "--seed", "1",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("=== STATISTICS SUMMARY ==="))
            .stdout(predicate::str::contains("Correlation Coefficient"));
    }

    #[test]
    fn bad_layout_token_fails() {
        let home = TempDir::new().unwrap();
        txr(&home)
            .args(["simulate", "--n-pos", "5", "--n-neg", "5", "--layout", "11"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("'01' or '10'"));
    }
}

mod compare {
    use super::*;

    #[test]
    fn explicit_values() {
        let home = TempDir::new().unwrap();
        let json = json_stdout(txr(&home).args(["compare", "--v1", "5,5,5", "--v2", "1,2,3"]));
        assert_eq!(json["probability"], 1.0);
        assert_eq!(json["n1"], 3);
    }

    #[test]
    fn simulated_metric() {
        let home = TempDir::new().unwrap();
        let json = json_stdout(txr(&home).args([
            "compare", "--metric", "tpr", "--tpr1", "0.95", "--tpr2", "0.5", "--n-pos", "100",
            "--n-neg", "100", "--trials", "500", "--seed", "9",
        ]));
        assert_eq!(json["metric"], "tpr");
        assert!(json["probability"].as_f64().unwrap() > 0.99);
    }

    #[test]
    fn empty_sample_fails() {
        let home = TempDir::new().unwrap();
        txr(&home)
            .args(["compare", "--v2", "1,2"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("must not be empty"));
    }
}

mod config {
    use super::*;

    #[test]
    fn show_defaults() {
        let home = TempDir::new().unwrap();
        let json = json_stdout(txr(&home).args(["config", "show"]));
        assert_eq!(json["source"], "builtin default");
        assert_eq!(json["settings"]["sweep"]["num_points"], 10);
        assert_eq!(json["ranges"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn explicit_file_sets_defaults() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[sweep]\nnum_points = 4\nalpha = 0.1").unwrap();

        let json = json_stdout(txr(&home).arg("--config").arg(&path).arg("sweep"));
        assert_eq!(json["figure"]["sweep"]["n_total"].as_array().unwrap().len(), 4);
        assert_eq!(json["confidence_level"], 90.0);
    }

    #[test]
    fn xdg_file_is_discovered() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir_all(home.path().join("txr")).unwrap();
        std::fs::write(home.path().join("txr/config.toml"), "[sweep]\ntpr = 0.9\n").unwrap();

        let json = json_stdout(txr(&home).args(["config", "show"]));
        assert_eq!(json["source"], "XDG config");
        assert_eq!(json["settings"]["sweep"]["tpr"], 0.9);
    }

    #[test]
    fn invalid_file_fails() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("bad.toml");
        std::fs::write(&path, "[sweep]\nalpha = 0.9\n").unwrap();
        txr(&home)
            .arg("--config")
            .arg(&path)
            .arg("sweep")
            .assert()
            .code(11)
            .stderr(predicate::str::contains("sweep.alpha"));
    }
}

#[test]
fn version_reports_package_version() {
    let home = TempDir::new().unwrap();
    let json = json_stdout(txr(&home).arg("version"));
    assert_eq!(json["txr_version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn unknown_command_is_args_error() {
    let home = TempDir::new().unwrap();
    txr(&home)
        .arg("nonexistent")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("error"));
}
