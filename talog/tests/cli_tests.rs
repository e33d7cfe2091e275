use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const MANIFEST: &str = "\
name: demo
parameters:
  - params/base.yaml
  - params/dev.yaml
optional-parameters:
  - params/local.yaml
catalog: catalog.yaml
";

const CATALOG: &str = "\
numbers:
  callable: talog.sources.InMemory
  args:
    data: [1, 2, 3]
  validations:
    - callable: talog.validators.min_length
      args:
        min: {{ min_rows }}
greeting:
  callable: talog.sources.File
  args:
    path: data/greeting.txt
  validations:
    - callable: talog.validators.file_exists
tiny:
  callable: talog.sources.InMemory
  args:
    data: [1]
  validations:
    - callable: talog.validators.min_length
      args:
        min: 5
    - callable: talog.validators.not_empty
";

/// A throwaway project directory with a manifest, two parameter layers and
/// a catalog mixing in-memory and file sources.
struct TalogTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl TalogTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("params"))?;
        fs::create_dir_all(root.join("data"))?;

        fs::write(root.join("talog.yaml"), MANIFEST)?;
        fs::write(root.join("params/base.yaml"), "env: base\nmin_rows: 2\n")?;
        fs::write(
            root.join("params/dev.yaml"),
            "env: dev\nlabel: \"{{ env }}-label\"\n",
        )?;
        fs::write(root.join("catalog.yaml"), CATALOG)?;
        fs::write(root.join("data/greeting.txt"), "hello")?;

        Ok(Self { _tmp: tmp, root })
    }

    fn path(&self) -> &Path {
        &self.root
    }

    fn talog(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("talog"));
        cmd.arg("--project-dir")
            .arg(&self.root)
            .env_remove("TALOG_CATALOG")
            .env_remove("TALOG_PARAMETERS")
            .env_remove("TALOG_LOG");
        cmd
    }
}

#[test]
fn test_list_prints_dataset_names() -> Result<()> {
    let env = TalogTestEnv::new()?;
    env.talog()
        .arg("list")
        .assert()
        .success()
        .stdout("greeting\nnumbers\ntiny\n");
    Ok(())
}

#[test]
fn test_inspect_shows_callables_and_validators() -> Result<()> {
    let env = TalogTestEnv::new()?;
    env.talog()
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("talog.sources.File"))
        .stdout(predicate::str::contains("talog.validators.file_exists"));
    Ok(())
}

#[test]
fn test_read_in_memory_dataset_as_json() -> Result<()> {
    let env = TalogTestEnv::new()?;
    let output = env.talog().args(["read", "numbers"]).output()?;
    assert!(output.status.success());
    let data: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(data, serde_json::json!([1, 2, 3]));
    Ok(())
}

#[test]
fn test_read_file_dataset_relative_to_project() -> Result<()> {
    let env = TalogTestEnv::new()?;
    env.talog()
        .args(["read", "greeting", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"));
    Ok(())
}

#[test]
fn test_read_blocked_by_failing_validator() -> Result<()> {
    let env = TalogTestEnv::new()?;
    env.talog()
        .args(["read", "tiny"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("talog.validators.min_length"))
        .stderr(predicate::str::contains("length 1 is below 5"));

    env.talog()
        .args(["read", "tiny", "--skip-validation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
    Ok(())
}

#[test]
fn test_validate_exit_codes() -> Result<()> {
    let env = TalogTestEnv::new()?;
    env.talog()
        .args(["validate", "numbers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passed 1 validator(s)"));

    env.talog()
        .args(["validate", "tiny"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("length 1 is below 5"));
    Ok(())
}

#[test]
fn test_validate_reports_missing_file() -> Result<()> {
    let env = TalogTestEnv::new()?;
    fs::remove_file(env.path().join("data/greeting.txt"))?;
    env.talog()
        .args(["validate", "greeting"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("does not exist"));
    Ok(())
}

#[test]
fn test_params_are_stacked_in_order() -> Result<()> {
    let env = TalogTestEnv::new()?;
    let output = env.talog().arg("params").output()?;
    assert!(output.status.success());

    let params: serde_yaml::Mapping = serde_yaml::from_slice(&output.stdout)?;
    // label was rendered while only base.yaml was merged.
    assert_eq!(params.get("label"), Some(&serde_yaml::Value::from("base-label")));
    assert_eq!(params.get("env"), Some(&serde_yaml::Value::from("dev")));
    Ok(())
}

#[test]
fn test_optional_parameters_override_when_present() -> Result<()> {
    let env = TalogTestEnv::new()?;
    fs::write(env.path().join("params/local.yaml"), "env: local\n")?;
    let out = env.path().join("merged.yaml");

    env.talog()
        .args(["params", "--output"])
        .arg(&out)
        .assert()
        .success();

    let params: serde_yaml::Mapping = serde_yaml::from_str(&fs::read_to_string(&out)?)?;
    assert_eq!(params.get("env"), Some(&serde_yaml::Value::from("local")));
    Ok(())
}

#[test]
fn test_unknown_dataset_fails() -> Result<()> {
    let env = TalogTestEnv::new()?;
    env.talog()
        .args(["read", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'nope' is not in the catalog"))
        .stderr(predicate::str::contains("talog::domain::unknown_dataset"));
    Ok(())
}

#[test]
fn test_unresolved_catalog_placeholder_fails() -> Result<()> {
    let env = TalogTestEnv::new()?;
    fs::write(env.path().join("params/base.yaml"), "env: base\n")?;
    env.talog()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("catalog.yaml"));
    Ok(())
}

#[test]
fn test_missing_manifest_fails() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    Command::new(assert_cmd::cargo::cargo_bin!("talog"))
        .arg("--project-dir")
        .arg(tmp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("talog.yaml"));
    Ok(())
}
