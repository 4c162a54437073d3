use serde_json::json;
use tempfile::NamedTempFile;
use vedesigner_core::{
    models::{Institution, UserSnippet},
    Database, FieldUpdate, PlanField, PlannerError,
};

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

#[test]
fn test_database_initialization_sets_schema_version() {
    let (temp_file, db) = create_test_db();
    assert_eq!(db.schema_version().unwrap(), 1);
    drop(db);

    // reopening an initialized file is fine
    let db = Database::new(temp_file.path()).expect("Failed to reopen database");
    assert_eq!(db.schema_version().unwrap(), 1);
}

#[test]
fn test_create_plan_starts_empty() {
    let (_temp_file, mut db) = create_test_db();

    let plan = db.create_plan("Climate VE", "alice").unwrap();
    assert_eq!(plan.name, "Climate VE");
    assert_eq!(plan.author, "alice");
    assert!(plan.institutions.is_empty());
    assert!(plan.steps.is_empty());
    assert!(plan.progress.is_empty());
    assert!(plan.creation_timestamp.is_some());

    let stored = db.get_plan(&plan.id).unwrap().expect("plan should exist");
    assert_eq!(stored, plan);
    assert!(db.get_plan("missing").unwrap().is_none());
}

#[test]
fn test_update_fields_merges_only_named_fields() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Climate VE", "alice").unwrap();

    db.update_fields(
        &plan.id,
        &[FieldUpdate::new(PlanField::Languages, json!(["German", "English"]))],
    )
    .unwrap();
    db.update_fields(
        &plan.id,
        &[FieldUpdate::new(PlanField::Realization, json!("online"))],
    )
    .unwrap();

    let stored = db.get_plan(&plan.id).unwrap().unwrap();
    assert_eq!(stored.name, "Climate VE");
    assert_eq!(stored.languages, vec!["German", "English"]);
    assert_eq!(stored.realization, "online");
}

#[test]
fn test_update_fields_assigns_step_ids() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("", "alice").unwrap();

    db.update_fields(
        &plan.id,
        &[FieldUpdate::new(
            PlanField::Steps,
            json!([{"_id": "kept", "name": "Kickoff"}, {"name": "Wrap-up"}]),
        )],
    )
    .unwrap();

    let steps = db.get_plan(&plan.id).unwrap().unwrap().steps;
    assert_eq!(steps[0].id.as_deref(), Some("kept"));
    let generated = steps[1].id.as_deref().expect("step id should be assigned");
    assert!(!generated.is_empty());
    assert_ne!(generated, "kept");
}

#[test]
fn test_update_fields_unknown_plan() {
    let (_temp_file, mut db) = create_test_db();
    let err = db
        .update_fields("missing", &[FieldUpdate::new(PlanField::Name, json!("x"))])
        .unwrap_err();
    assert!(matches!(err, PlannerError::PlanNotFound { .. }));
}

#[test]
fn test_update_fields_rejects_malformed_value_atomically() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Before", "alice").unwrap();

    let result = db.update_fields(
        &plan.id,
        &[
            FieldUpdate::new(PlanField::Name, json!("After")),
            FieldUpdate::new(PlanField::Institutions, json!("not a list")),
        ],
    );
    assert!(result.is_err());
    assert_eq!(db.get_plan(&plan.id).unwrap().unwrap().name, "Before");
}

#[test]
fn test_list_plans_most_recent_first() {
    let (_temp_file, mut db) = create_test_db();
    let first = db.create_plan("First", "alice").unwrap();
    let second = db.create_plan("Second", "alice").unwrap();
    db.update_fields(&first.id, &[FieldUpdate::new(PlanField::Name, json!("First again"))])
        .unwrap();

    let plans = db.list_plans().unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].id, first.id);
    assert_eq!(plans[1].id, second.id);
}

#[test]
fn test_profiles_and_snippets() {
    let (_temp_file, mut db) = create_test_db();
    assert!(db.get_profile_institutions("alice").unwrap().is_empty());

    let institutions = vec![Institution {
        name: "TU Berlin".to_string(),
        ..Default::default()
    }];
    db.save_profile("alice", &institutions).unwrap();
    assert_eq!(db.get_profile_institutions("alice").unwrap(), institutions);

    for (username, first_name) in [("alice", "Alice"), ("bob", "Bob")] {
        db.save_snippet(&UserSnippet {
            username: username.to_string(),
            first_name: first_name.to_string(),
            ..Default::default()
        })
        .unwrap();
    }
    let snippets = db
        .get_snippets(&["bob".to_string(), "nobody".to_string(), "alice".to_string()])
        .unwrap();
    let names: Vec<_> = snippets.iter().map(|s| s.username.as_str()).collect();
    assert_eq!(names, vec!["bob", "alice"]);
}

#[test]
fn test_grant_write_access_keeps_partner_order() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db.create_plan("Shared", "alice").unwrap();

    assert!(db.grant_write_access(&plan.id, "bob").unwrap());
    assert!(db.grant_write_access(&plan.id, "carol").unwrap());
    assert!(!db.grant_write_access(&plan.id, "bob").unwrap());
    assert!(!db.grant_write_access(&plan.id, "alice").unwrap());

    let stored = db.get_plan(&plan.id).unwrap().unwrap();
    assert_eq!(stored.partners(), vec!["alice", "bob", "carol"]);
}
