//! CLI output compared with the core Display implementations
//!
//! With `--no-color` the CLI prints the same markdown the MCP server returns,
//! so both front ends can be checked against the core types directly.

use std::process::Command;

use serde_json::json;
use tempfile::TempDir;
use vedesigner_core::{
    display::{PlanList, ProgressSidebar},
    Backend, Direction, LocalStore, PageForm, PageKind, PlanStore, Wizard, WizardBuilder,
};

/// Helper function to create a test wizard with temporary database
async fn create_test_wizard() -> (Wizard<Backend>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let wizard = WizardBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_user(Some("alice"))
        .build()
        .await
        .expect("Failed to create wizard");
    (wizard, temp_dir)
}

fn local(wizard: &Wizard<Backend>) -> LocalStore {
    wizard
        .store()
        .as_local()
        .cloned()
        .expect("Expected a local store")
}

/// Run a CLI command and capture its output
fn run_cli_command(temp_dir: &TempDir, args: &[&str]) -> String {
    let db_path = temp_dir.path().join("test.db");
    let output = Command::new(env!("CARGO_BIN_EXE_ved"))
        .env_remove("VED_API_URL")
        .arg("--no-color")
        .arg("--database-file")
        .arg(&db_path)
        .args(["--user", "alice"])
        .args(args)
        .output()
        .expect("Failed to run CLI command");
    assert!(
        output.status.success(),
        "ved {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

#[tokio::test]
async fn test_plan_show_matches_plan_display() {
    let (mut wizard, temp_dir) = create_test_wizard().await;
    let plan = local(&wizard).create_plan("Climate VE").await.unwrap();

    let mut session = wizard.open(Some(plan.id.as_str())).await.unwrap();
    let form = PageForm::from_json(
        &PageKind::StepNames,
        json!({"steps": [{"name": "Kickoff", "workload": 4}]}),
    )
    .unwrap();
    session.submit(&form, Direction::Stay).await.unwrap();
    let id = session.plan_id().clone();
    drop(session);

    let stored = wizard.store().fetch_plan(&id).await.unwrap();
    let cli_output = run_cli_command(&temp_dir, &["plan", "show", id.as_str()]);
    assert_eq!(cli_output, stored.to_string());
    assert!(cli_output.contains("Kickoff"));
}

#[tokio::test]
async fn test_plan_list_matches_plan_list_display() {
    let (wizard, temp_dir) = create_test_wizard().await;
    let store = local(&wizard);
    store.create_plan("First").await.unwrap();
    store.create_plan("Second").await.unwrap();

    let plans = PlanList(store.list_plans().await.unwrap());
    let cli_output = run_cli_command(&temp_dir, &["plan", "list"]);
    assert_eq!(cli_output, format!("# Plans\n\n{plans}"));
}

#[tokio::test]
async fn test_progress_matches_sidebar_display() {
    let (mut wizard, temp_dir) = create_test_wizard().await;
    let plan = local(&wizard).create_plan("Climate VE").await.unwrap();

    let mut session = wizard.open(Some(plan.id.as_str())).await.unwrap();
    let form = PageForm::from_json(&PageKind::Lectures, json!({"lectures": []})).unwrap();
    session.submit(&form, Direction::Next).await.unwrap();

    let sidebar = ProgressSidebar::new(session.plan(), session.routes(), session.state().scheme());
    let expected = format!("{sidebar}\n{}\n", session.progress_summary());
    drop(session);

    let cli_output = run_cli_command(&temp_dir, &["plan", "progress", &plan.id]);
    assert_eq!(cli_output, expected);
}

#[tokio::test]
async fn test_page_show_matches_page_view_display() {
    let (mut wizard, temp_dir) = create_test_wizard().await;
    let plan = local(&wizard).create_plan("Climate VE").await.unwrap();

    let session = wizard.open(Some(plan.id.as_str())).await.unwrap();
    let view = session.page_view(&PageKind::TargetGroups).unwrap();
    drop(session);

    let cli_output = run_cli_command(&temp_dir, &["page", "show", &plan.id, "target-groups"]);
    // The renderer drops nothing in plain mode
    assert_eq!(cli_output, view.to_string());
}
