use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A scratch database plus the acting user for one test.
struct TestEnv {
    _dir: TempDir,
    db: String,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory");
        let db = dir
            .path()
            .join("cli_test.db")
            .to_str()
            .expect("Non UTF-8 temp path")
            .to_string();
        Self { _dir: dir, db }
    }

    /// `ved` against the scratch database, acting as alice, without colors.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("ved").expect("Failed to find ved binary");
        cmd.env_remove("VED_API_URL")
            .args(["--no-color", "--database-file", &self.db, "--user", "alice"]);
        cmd
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.cmd().args(args).assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Invalid UTF-8")
    }

    fn create_plan(&self, name: &str) -> String {
        extract_id_from_output(&self.stdout(&["plan", "create", name]))
    }
}

fn extract_id_from_output(output: &str) -> String {
    output
        .lines()
        .find_map(|line| line.strip_prefix("Created plan with ID: "))
        .map(|id| id.trim().to_string())
        .expect("No plan ID in output")
}

#[test]
fn test_cli_help_lists_commands() {
    Command::cargo_bin("ved")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("page"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_cli_list_empty_plans() {
    let env = TestEnv::new();
    env.cmd()
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_create_and_list_plan() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("Climate VE");
    assert!(!plan_id.is_empty());

    env.cmd()
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Plans"))
        .stdout(predicate::str::contains(format!("Climate VE (ID: {plan_id})")));

    // No subcommand lists plans too
    env.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Climate VE"));
}

#[test]
fn test_cli_show_plan() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("Climate VE");

    env.cmd()
        .args(["plan", "show", &plan_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Climate VE"))
        .stdout(predicate::str::contains("alice"));
}

#[test]
fn test_cli_show_unknown_plan_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["plan", "show", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_page_show_prints_values_as_json() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("Climate VE");

    env.cmd()
        .args(["page", "show", &plan_id, "name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("```json"))
        .stdout(predicate::str::contains(r#""name": "Climate VE""#));
}

#[test]
fn test_cli_page_show_rejects_unknown_page() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("Climate VE");

    env.cmd()
        .args(["page", "show", &plan_id, "summary"])
        .assert()
        .failure();
}

#[test]
fn test_cli_submit_page_and_follow_route() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("Climate VE");

    env.cmd()
        .args([
            "page",
            "submit",
            &plan_id,
            "institutions",
            "-v",
            r#"{"institutions": [{"name": "TU Berlin", "country": "DE"}, {"name": ""}]}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved page `institutions`"))
        .stdout(predicate::str::contains("Next: `lectures`"));

    // The blank second row was dropped on save
    let shown = env.stdout(&["page", "show", &plan_id, "institutions"]);
    assert!(shown.contains("TU Berlin"));
    assert_eq!(shown.matches(r#""name""#).count(), 1);

    env.cmd()
        .args(["plan", "progress", &plan_id, "--current", "lectures"])
        .assert()
        .success()
        .stdout(predicate::str::contains("`institutions`: ✓ Completed"))
        .stdout(predicate::str::contains("**◀**"));
}

#[test]
fn test_cli_submit_values_from_file() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("");

    let values = env._dir.path().join("name.json");
    std::fs::write(&values, r#"{"name": "Renamed VE"}"#).unwrap();

    env.cmd()
        .args([
            "page",
            "submit",
            &plan_id,
            "name",
            "--direction",
            "stay",
            "-v",
            &format!("@{}", values.display()),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next: `name`"));

    env.cmd()
        .args(["plan", "show", &plan_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Renamed VE"));
}

#[test]
fn test_cli_validation_error_exits_non_zero() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("Climate VE");

    env.cmd()
        .args(["page", "submit", &plan_id, "name", "-v", r#"{"name": "<script>"}"#])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Please correct"))
        .stderr(predicate::str::contains("Page name was not saved"));

    // Nothing was written
    env.cmd()
        .args(["plan", "show", &plan_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Climate VE"));
}

#[test]
fn test_cli_navigate_without_saving() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("Climate VE");

    env.cmd()
        .args(["page", "nav", &plan_id, "name", "-d", "prev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("`name` → `overview`"));

    env.cmd()
        .args(["page", "nav", &plan_id, "lectures"])
        .assert()
        .success()
        .stdout(predicate::str::contains("`lectures` → `target-groups`"));
}

#[test]
fn test_cli_step_names_lead_to_first_step() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("Climate VE");

    env.cmd()
        .args([
            "page",
            "submit",
            &plan_id,
            "step-names",
            "-v",
            r#"{"steps": [{"name": "Kickoff"}, {"name": "Wrap-up"}]}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next: Kickoff"));

    env.cmd()
        .args(["plan", "show", &plan_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("### 1. Kickoff"))
        .stdout(predicate::str::contains("### 2. Wrap-up"));
}

#[test]
fn test_cli_profile_import_institutions() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("Climate VE");

    env.cmd()
        .args([
            "profile",
            "institutions",
            "alice",
            "-v",
            r#"[{"name": "Uni Leipzig", "school_type": "university", "country": "DE", "department": ""}]"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 1 institution(s) for alice"));

    env.cmd()
        .args(["import", "institutions", &plan_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("- `0` Uni Leipzig"));

    env.cmd()
        .args(["import", "institutions", &plan_id, "--select", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 institution(s)"));

    env.cmd()
        .args(["page", "show", &plan_id, "institutions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uni Leipzig"));
}

#[test]
fn test_cli_share_plan() {
    let env = TestEnv::new();
    let plan_id = env.create_plan("Climate VE");

    env.cmd()
        .args(["plan", "share", &plan_id, "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bob can now edit plan"));

    env.cmd()
        .args(["plan", "share", &plan_id, "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bob already edits plan"));

    env.cmd()
        .args(["page", "show", &plan_id, "evaluation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Partners"))
        .stdout(predicate::str::contains("`bob`"));
}

#[test]
fn test_cli_local_commands_need_local_database() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--api-url", "http://127.0.0.1:9", "plan", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs a local database"));
}
