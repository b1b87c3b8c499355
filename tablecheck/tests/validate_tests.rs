use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const DATASET: &str = "covenant_pl";
const VERSION: &str = "v1.0.0";

/// A throwaway copy of the fixture repository.
struct TablecheckTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl TablecheckTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/repo");

        let dest = tmp.path().join("repo");
        Self::copy_dir(&fixture, &dest)?;

        Ok(Self {
            _tmp: tmp,
            root: dest,
        })
    }

    fn copy_dir(src: &PathBuf, dst: &PathBuf) -> std::io::Result<()> {
        let mut options = fs_extra::dir::CopyOptions::new();
        options.content_only = true;

        fs::create_dir_all(dst)?;
        fs_extra::dir::copy(src, dst, &options)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    fn data_file(&self, name: &str) -> PathBuf {
        self.root
            .join("datasets")
            .join(DATASET)
            .join(VERSION)
            .join(name)
    }

    fn report_dir(&self, dataset: &str) -> PathBuf {
        self.root
            .join("artifacts/validation")
            .join(dataset)
            .join(VERSION)
    }

    fn tablecheck(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tablecheck"));
        cmd.current_dir(&self.root)
            .env_remove("TABLECHECK_ARTIFACTS_PATH")
            .env_remove("TABLECHECK_ORPHAN_THRESHOLD")
            .env_remove("RUST_LOG");
        cmd
    }

    fn validate(&self, dataset: &str) -> Command {
        let mut cmd = self.tablecheck();
        cmd.args(["validate", "--dataset", dataset, "--version", VERSION, "--repo"])
            .arg(&self.root);
        cmd
    }

    fn json_report(&self) -> Result<serde_json::Value> {
        let path = self.report_dir(DATASET).join("validation_report.json");
        let raw = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn results_for<'a>(
    report: &'a serde_json::Value,
    rule: &'a str,
) -> impl Iterator<Item = &'a serde_json::Value> {
    report["results"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(move |r| r["rule"] == rule)
}

#[test]
fn test_clean_dataset_passes_and_writes_reports() -> Result<()> {
    let env = TablecheckTestEnv::new()?;

    env.validate(DATASET)
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS"));

    let report = env.json_report()?;
    assert_eq!(report["dataset"], DATASET);
    assert_eq!(report["version"], VERSION);
    assert_eq!(report["passed"], true);
    assert_eq!(report["summary"]["fail"], 0);
    assert_eq!(report["summary"]["warn"], 0);
    assert!(report["run_timestamp"].as_str().is_some_and(|s| !s.is_empty()));

    // Catalog size and checksum both match the fixture files.
    assert_eq!(results_for(&report, "catalog_checksum").count(), 2);
    assert!(results_for(&report, "catalog_size").all(|r| r["severity"] == "pass"));

    let md = fs::read_to_string(env.report_dir(DATASET).join("validation_report.md"))?;
    assert!(md.starts_with("# Validation Report: covenant_pl v1.0.0"));
    assert!(md.contains("- **Status:** PASS"));
    assert!(!md.contains("## Failures"));
    Ok(())
}

#[test]
fn test_duplicate_primary_key_fails() -> Result<()> {
    let env = TablecheckTestEnv::new()?;
    fs::write(
        env.data_file("customers.csv"),
        "customer_id,segment,credit_limit\nC001,retail,5000\nC002,corporate,250000\nC002,corporate,250000\nC003,retail,\n",
    )?;

    env.validate(DATASET)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("FAILURE"));

    let report = env.json_report()?;
    assert_eq!(report["passed"], false);
    assert_eq!(report["summary"]["fail"], 1);

    let pk: Vec<_> = results_for(&report, "primary_key")
        .filter(|r| r["table"] == "customers")
        .collect();
    assert_eq!(pk.len(), 1);
    assert_eq!(pk[0]["severity"], "fail");
    assert_eq!(pk[0]["count"], 2);
    Ok(())
}

#[test]
fn test_low_orphan_rate_warns_but_passes() -> Result<()> {
    let env = TablecheckTestEnv::new()?;

    // 997 rows pointing at C001 on distinct months, 3 pointing nowhere.
    let mut body = String::from("customer_id,month,amount\n");
    for i in 0..1000 {
        let customer = if i < 997 {
            "C001".to_string()
        } else {
            format!("C9{:02}", i - 997)
        };
        body.push_str(&format!(
            "{},{}-{:02}-01,10.0\n",
            customer,
            1900 + i / 12,
            i % 12 + 1
        ));
    }
    fs::write(env.data_file("outflows.csv"), body)?;

    env.validate(DATASET).assert().success();

    let report = env.json_report()?;
    assert_eq!(report["passed"], true);
    let fk: Vec<_> = results_for(&report, "referential_integrity").collect();
    assert_eq!(fk.len(), 1);
    assert_eq!(fk[0]["severity"], "warn");
    assert_eq!(fk[0]["count"], 3);
    assert!(
        fk[0]["message"]
            .as_str()
            .is_some_and(|m| m.contains("0.30%"))
    );
    Ok(())
}

#[test]
fn test_missing_schema_aborts_without_reports() -> Result<()> {
    let env = TablecheckTestEnv::new()?;

    env.validate("unknown_ds")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Schema not found"));

    assert!(!env.report_dir("unknown_ds").exists());
    Ok(())
}

#[test]
fn test_unsafe_identifier_is_rejected() -> Result<()> {
    let env = TablecheckTestEnv::new()?;

    env.validate("../escape")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsafe dataset identifier"));
    Ok(())
}

#[test]
fn test_missing_file_and_unexpected_column() -> Result<()> {
    let env = TablecheckTestEnv::new()?;
    fs::remove_file(env.data_file("outflows.csv"))?;
    fs::write(
        env.data_file("customers.csv"),
        "customer_id,segment,credit_limit,region\nC001,retail,5000,north\n",
    )?;

    env.validate(DATASET).assert().failure();

    let report = env.json_report()?;
    let exists: Vec<_> = results_for(&report, "file_exists")
        .filter(|r| r["table"] == "outflows")
        .collect();
    assert_eq!(exists[0]["severity"], "fail");

    let unexpected: Vec<_> = results_for(&report, "unexpected_column").collect();
    assert_eq!(unexpected.len(), 1);
    assert_eq!(unexpected[0]["column"], "region");
    assert_eq!(unexpected[0]["severity"], "warn");
    Ok(())
}

#[test]
fn test_no_write_leaves_no_artifacts() -> Result<()> {
    let env = TablecheckTestEnv::new()?;

    env.validate(DATASET)
        .arg("--no-write")
        .assert()
        .success()
        .stdout(predicate::str::contains("Severity"));

    assert!(!env.report_dir(DATASET).exists());
    Ok(())
}

#[test]
fn test_schema_command_lists_tables() -> Result<()> {
    let env = TablecheckTestEnv::new()?;

    env.tablecheck()
        .args(["schema", "--dataset", DATASET, "--version", VERSION, "--repo"])
        .arg(&env.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("customers (customers.csv)"))
        .stdout(predicate::str::contains(
            "Foreign key: customer_id -> customers.customer_id",
        ));
    Ok(())
}

#[test]
fn test_repo_is_discovered_from_working_directory() -> Result<()> {
    let env = TablecheckTestEnv::new()?;

    env.tablecheck()
        .current_dir(env.root.join("datasets"))
        .args(["validate", "--dataset", DATASET, "--version", VERSION])
        .assert()
        .success();

    assert!(env.report_dir(DATASET).join("validation_report.md").exists());
    Ok(())
}

#[test]
fn test_short_row_is_padded_not_dropped() -> Result<()> {
    let env = TablecheckTestEnv::new()?;
    fs::write(
        env.data_file("customers.csv"),
        "customer_id,segment,credit_limit\nC001,retail,5000\nC002,corporate,250000\nC003,retail\n",
    )?;

    env.validate(DATASET).assert().success();

    let report = env.json_report()?;
    let shape: Vec<_> = results_for(&report, "row_shape").collect();
    assert_eq!(shape.len(), 1);
    assert_eq!(shape[0]["severity"], "warn");
    assert_eq!(shape[0]["count"], 1);

    // customers still loaded, so outflows keeps a real orphan check.
    let fk: Vec<_> = results_for(&report, "referential_integrity").collect();
    assert_eq!(fk[0]["severity"], "pass");
    Ok(())
}

#[test]
fn test_unparseable_value_fails_not_null() -> Result<()> {
    let env = TablecheckTestEnv::new()?;
    fs::write(
        env.data_file("outflows.csv"),
        "customer_id,month,amount\nC001,2024-01-01,lots\nC002,2024-01-01,15000\n",
    )?;

    env.validate(DATASET).assert().failure().code(1);

    let report = env.json_report()?;
    let dtype: Vec<_> = results_for(&report, "dtype")
        .filter(|r| r["column"] == "amount")
        .collect();
    assert_eq!(dtype[0]["severity"], "warn");
    let not_null: Vec<_> = results_for(&report, "not_null")
        .filter(|r| r["column"] == "amount")
        .collect();
    assert_eq!(not_null[0]["severity"], "fail");
    assert_eq!(not_null[0]["count"], 1);
    Ok(())
}
