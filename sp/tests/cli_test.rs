//! CLI tests for the `sp` binary
//!
//! Each test runs against its own database and data/config directories.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn sp(&self) -> Command {
        let mut cmd = Command::cargo_bin("sp").expect("sp binary");
        let db = self.dir.path().join("studyplan.db");
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .arg("--db")
            .arg(db);
        cmd
    }

    fn write_file(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create config dir");
        }
        std::fs::write(path, content).expect("write config");
    }

    fn task_count(&self) -> usize {
        self.json(&["task", "list"]).as_array().unwrap().len()
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.sp().args(args).args(["--format", "json"]).output().expect("run sp");
        assert!(output.status.success(), "sp {:?} failed", args);
        serde_json::from_slice(&output.stdout).expect("valid json")
    }
}

#[test]
fn test_task_add_and_list() {
    let env = Env::new();
    env.sp()
        .args(["task", "add", "Read chapter 4", "--due", "2024-03-01", "-d", "pages 80-120"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task"));

    let tasks = env.json(&["task", "list"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Read chapter 4");
    assert_eq!(tasks[0]["status"], "pending");
    assert_eq!(tasks[0]["due_date"], "2024-03-01");
    assert!(tasks[0]["plan_id"].is_null());
}

#[test]
fn test_task_add_rejects_bad_date() {
    let env = Env::new();
    env.sp()
        .args(["task", "add", "Read", "--due", "next friday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_generate_creates_plan_and_steps() {
    let env = Env::new();
    env.sp()
        .args(["plan", "generate", "History essay", "--due", "2030-01-11", "--steps", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created plan"))
        .stdout(predicate::str::contains("Step 4 of 4"));

    let plans = env.json(&["plan", "list"]);
    assert_eq!(plans.as_array().unwrap().len(), 1);
    let plan_id = plans[0]["id"].as_str().unwrap().to_string();

    let tasks = env.json(&["task", "list"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 4);
    assert!(tasks.iter().all(|t| t["plan_id"] == plan_id.as_str()));
    assert_eq!(tasks[3]["due_date"], "2030-01-11");
}

#[test]
fn test_generate_clamps_steps() {
    let env = Env::new();
    env.sp()
        .args(["plan", "generate", "Thesis", "--due", "2030-06-01", "--steps", "25", "--standalone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 10 standalone tasks"));

    assert!(env.json(&["plan", "list"]).as_array().unwrap().is_empty());
    assert_eq!(env.json(&["task", "list"]).as_array().unwrap().len(), 10);
}

#[test]
fn test_status_update_and_overview_progress() {
    let env = Env::new();
    env.sp()
        .args(["plan", "generate", "Lab report", "--due", "2030-01-11", "--steps", "3"])
        .assert()
        .success();

    let tasks = env.json(&["task", "list"]);
    let first = tasks[0]["id"].as_str().unwrap().to_string();
    env.sp()
        .args(["task", "status", &first, "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));

    let view = env.json(&["overview"]);
    let group = &view["plan_groups"][0];
    assert_eq!(group["completed"], 1);
    assert_eq!(group["total"], 3);
    let pct = group["progress_pct"].as_f64().unwrap();
    assert!((pct - 100.0 / 3.0).abs() < 1e-9);
    assert!(view["standalone"].as_array().unwrap().is_empty());

    env.sp()
        .args(["overview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("33%"));
}

#[test]
fn test_status_errors_are_distinguishable() {
    let env = Env::new();
    env.sp()
        .args(["task", "status", "does-not-exist", "completed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));

    env.sp().args(["task", "add", "Read", "--due", "2024-03-01"]).assert().success();
    let tasks = env.json(&["task", "list"]);
    let id = tasks[0]["id"].as_str().unwrap().to_string();
    env.sp()
        .args(["task", "status", &id, "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown status"));
}

#[test]
fn test_plan_rm_cascades() {
    let env = Env::new();
    env.sp()
        .args(["plan", "generate", "Project", "--due", "2030-02-01", "--steps", "5"])
        .assert()
        .success();
    env.sp().args(["task", "add", "Laundry", "--due", "2030-01-02"]).assert().success();

    let plan_id = env.json(&["plan", "list"])[0]["id"].as_str().unwrap().to_string();
    env.sp()
        .args(["plan", "rm", &plan_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted plan"));

    assert!(env.json(&["plan", "list"]).as_array().unwrap().is_empty());
    let tasks = env.json(&["task", "list"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Laundry");

    env.sp()
        .args(["plan", "rm", &plan_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plan not found"));
}

#[test]
fn test_task_add_with_plan_prefix() {
    let env = Env::new();
    env.sp()
        .args([
            "plan",
            "add",
            "Finals",
            "--due",
            "2030-05-01",
            "-d",
            "Exam prep",
            "-a",
            "Revise all units",
        ])
        .assert()
        .success();
    let plan_id = env.json(&["plan", "list"])[0]["id"].as_str().unwrap().to_string();

    env.sp()
        .args(["task", "add", "Unit 1", "--due", "2030-04-01", "--plan", &plan_id[..8]])
        .assert()
        .success();

    let view = env.json(&["overview"]);
    assert_eq!(view["plan_groups"][0]["total"], 1);
    assert_eq!(view["plan_groups"][0]["plan"]["id"], plan_id.as_str());
}

#[test]
fn test_generate_dry_run_prints_deadlines_only() {
    let env = Env::new();
    env.sp()
        .args(["plan", "generate", "Term paper", "--due", "2030-01-11", "--steps", "3", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 1: "))
        .stdout(predicate::str::contains("Step 3: 2030-01-11"))
        .stdout(predicate::str::contains("Step 4").not());

    assert_eq!(env.task_count(), 0);
    assert!(env.json(&["plan", "list"]).as_array().unwrap().is_empty());
}

#[test]
fn test_generate_dry_run_rejects_bad_date() {
    let env = Env::new();
    env.sp()
        .args(["plan", "generate", "Term paper", "--due", "soon", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

// =============================================================================
// Config fallback chain
// =============================================================================

#[test]
fn test_default_steps_from_project_config() {
    let env = Env::new();
    env.write_file(".studyplan.yml", "schedule:\n  default-steps: 3\n");

    env.sp()
        .args(["plan", "generate", "Essay", "--due", "2030-01-11"])
        .assert()
        .success();
    assert_eq!(env.task_count(), 3);
}

#[test]
fn test_default_steps_from_user_config() {
    let env = Env::new();
    env.write_file("config/studyplan/studyplan.yml", "schedule:\n  default-steps: 2\n");

    env.sp()
        .args(["plan", "generate", "Essay", "--due", "2030-01-11"])
        .assert()
        .success();
    assert_eq!(env.task_count(), 2);
}

#[test]
fn test_project_config_wins_over_user_config() {
    let env = Env::new();
    env.write_file(".studyplan.yml", "schedule:\n  default-steps: 4\n");
    env.write_file("config/studyplan/studyplan.yml", "schedule:\n  default-steps: 2\n");

    env.sp()
        .args(["plan", "generate", "Essay", "--due", "2030-01-11"])
        .assert()
        .success();
    assert_eq!(env.task_count(), 4);
}

#[test]
fn test_unparseable_project_config_falls_through() {
    let env = Env::new();
    env.write_file(".studyplan.yml", "schedule: [not, a, map");
    env.write_file("config/studyplan/studyplan.yml", "schedule:\n  default-steps: 2\n");

    env.sp()
        .args(["plan", "generate", "Essay", "--due", "2030-01-11"])
        .assert()
        .success();
    assert_eq!(env.task_count(), 2);
}

#[test]
fn test_no_config_uses_five_steps() {
    let env = Env::new();
    env.sp()
        .args(["plan", "generate", "Essay", "--due", "2030-01-11"])
        .assert()
        .success();
    assert_eq!(env.task_count(), 5);
}

#[test]
fn test_explicit_config_overrides_chain() {
    let env = Env::new();
    env.write_file(".studyplan.yml", "schedule:\n  default-steps: 4\n");
    env.write_file("custom.yml", "schedule:\n  default-steps: 1\n");

    env.sp()
        .args(["--config", "custom.yml", "plan", "generate", "Essay", "--due", "2030-01-11"])
        .assert()
        .success();
    assert_eq!(env.task_count(), 1);
}
