use serde_json::json;

use super::*;
use crate::{
    editor::{ImportDialog, RowFloor},
    error::PlannerError,
    models::{FieldUpdate, Institution, Plan, PlanField, Step, Task},
    navigation::StepKeyScheme,
};

fn plan_with(value: serde_json::Value) -> Plan {
    let mut document = json!({ "_id": "p1" });
    if let (Some(target), Some(source)) = (document.as_object_mut(), value.as_object()) {
        target.extend(source.clone());
    }
    serde_json::from_value(document).unwrap()
}

fn update<'a>(updates: &'a [FieldUpdate], field: PlanField) -> &'a serde_json::Value {
    &updates.iter().find(|u| u.field == field).unwrap().value
}

#[test]
fn test_empty_required_lists_load_one_blank_row() {
    let plan = Plan::empty("p1");
    for kind in [PageKind::Institutions, PageKind::Lectures, PageKind::StepNames] {
        let form = PageForm::load(&kind, &plan).unwrap();
        let rows = match &form {
            PageForm::Institutions(f) => f.institutions.len(),
            PageForm::Lectures(f) => f.lectures.len(),
            PageForm::StepNames(f) => f.steps.len(),
            _ => unreachable!(),
        };
        assert_eq!(rows, 1, "{kind}");
        assert!(form.is_empty(), "{kind}");
    }

    let PageForm::TargetGroups(groups) = PageForm::load(&PageKind::TargetGroups, &plan).unwrap()
    else {
        panic!("wrong variant");
    };
    assert_eq!(groups.audience.len(), 1);
    assert_eq!(groups.languages.len(), 1);
}

#[test]
fn test_institutions_serialize_exact_payload() {
    let plan = Plan::empty("p1");
    let mut form = InstitutionsForm::load(&plan);
    form.institutions.get_mut(0).unwrap().name = "TU Berlin".to_string();

    let updates = form.serialize(&plan).unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(
        serde_json::to_value(&updates[0]).unwrap(),
        json!({
            "field_name": "institutions",
            "value": [{"name": "TU Berlin", "school_type": "", "country": "", "department": ""}]
        })
    );
    assert!(!form.is_empty());
}

#[test]
fn test_blank_placeholder_rows_are_dropped() {
    let plan = Plan::empty("p1");
    let form = InstitutionsForm::load(&plan);
    let updates = form.serialize(&plan).unwrap();
    assert_eq!(update(&updates, PlanField::Institutions), &json!([]));
}

#[test]
fn test_import_prepends_into_form() {
    let plan = plan_with(json!({"institutions": [{"name": "Existing"}]}));
    let mut form = InstitutionsForm::load(&plan);
    let mut dialog = ImportDialog::new(vec![
        Institution {
            name: "Profile A".to_string(),
            ..Default::default()
        },
        Institution {
            name: "Profile B".to_string(),
            ..Default::default()
        },
    ]);
    dialog.toggle(1);
    assert_eq!(dialog.confirm(&mut form.institutions), 1);

    let names: Vec<_> = form.institutions.iter().map(|i| i.name.clone()).collect();
    assert_eq!(names, vec!["Profile B", "Existing"]);
}

#[test]
fn test_mobility_dates_truncate_and_restore() {
    let plan = plan_with(json!({
        "physical_mobility": true,
        "physical_mobilities": [{
            "location": "Leipzig",
            "timestamp_from": "2024-05-01T00:00:00Z",
            "timestamp_to": "2024-05-03T12:30:00"
        }]
    }));
    let form = LearningEnvForm::load(&plan);
    let row = form.physical_mobilities.get(0).unwrap();
    assert_eq!(row.timestamp_from, "2024-05-01");
    assert_eq!(row.timestamp_to, "2024-05-03");

    let updates = form.serialize(&plan).unwrap();
    assert_eq!(
        update(&updates, PlanField::PhysicalMobilities),
        &json!([{
            "location": "Leipzig",
            "timestamp_from": "2024-05-01T00:00:00",
            "timestamp_to": "2024-05-03T00:00:00"
        }])
    );
}

#[test]
fn test_mobilities_cleared_unless_answered_yes() {
    let plan = plan_with(json!({
        "physical_mobility": false,
        "physical_mobilities": [{"location": "Leipzig"}]
    }));
    let form = LearningEnvForm::load(&plan);
    let updates = form.serialize(&plan).unwrap();
    assert_eq!(update(&updates, PlanField::PhysicalMobility), &json!(false));
    assert_eq!(update(&updates, PlanField::PhysicalMobilities), &json!([]));
}

#[test]
fn test_learning_env_validation_rejects_reversed_dates() {
    let mut form = LearningEnvForm::load(&Plan::empty("p1"));
    form.physical_mobility = Some(true);
    let row = form.physical_mobilities.get_mut(0).unwrap();
    row.timestamp_from = "2024-05-03".to_string();
    row.timestamp_to = "2024-05-01".to_string();

    let errors = form.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_target_group_languages_round_trip_as_strings() {
    let plan = plan_with(json!({
        "audience": [{"name": "Students", "age_min": 18, "age_max": 25, "languages": ["de", "en"]}],
        "languages": ["en"]
    }));
    let form = TargetGroupsForm::load(&plan);
    assert_eq!(form.audience.get(0).unwrap().languages.len(), 2);

    let updates = form.serialize(&plan).unwrap();
    assert_eq!(update(&updates, PlanField::Languages), &json!(["en"]));
    assert_eq!(
        update(&updates, PlanField::Audience)[0]["languages"],
        json!(["de", "en"])
    );
}

#[test]
fn test_partner_pages_align_rows_with_partners() {
    let plan = plan_with(json!({
        "author": "alice",
        "write_access": ["bob", "alice"],
        "evaluation": [
            {"username": "alice", "is_graded": true},
            {"username": "mallory", "is_graded": false}
        ]
    }));
    let form = EvaluationForm::load(&plan);
    let users: Vec<_> = form.evaluation.iter().map(|e| e.username.clone()).collect();
    assert_eq!(users, vec!["alice", "bob"]);
    assert_eq!(form.evaluation.get(0).unwrap().is_graded, Some(true));
    assert!(!form.is_empty());

    let conditions = FormalConditionsForm::load(&plan);
    assert_eq!(conditions.formal_conditions.len(), 2);
    assert!(conditions.is_empty());
}

#[test]
fn test_partner_pages_without_partners_keep_rows() {
    let plan = plan_with(json!({"formal_conditions": [{"username": "carol", "notes": "x"}]}));
    let form = FormalConditionsForm::load(&plan);
    assert_eq!(form.formal_conditions.len(), 1);
    assert_eq!(form.formal_conditions.get(0).unwrap().username, "carol");
}

fn two_step_plan() -> Plan {
    Plan {
        steps: vec![
            Step {
                id: Some("s1".to_string()),
                name: "Kickoff".to_string(),
                has_tasks: true,
                tasks: vec![Task {
                    task_formulation: "Introduce yourself".to_string(),
                    tools: vec!["Zoom".to_string()],
                    ..Default::default()
                }],
                ..Default::default()
            },
            Step {
                name: "Wrap-up".to_string(),
                learning_activity: "Reflect".to_string(),
                ..Default::default()
            },
        ],
        ..Plan::empty("p1")
    }
}

#[test]
fn test_step_names_preserve_fine_planning() {
    let plan = two_step_plan();
    let mut form = StepNamesForm::load(&plan);
    form.steps.get_mut(0).unwrap().name = "Kick-off".to_string();
    form.steps.append(StepRow {
        name: "Project work".to_string(),
        workload: Some(10),
        timestamp_from: "2024-06-01".to_string(),
        ..Default::default()
    });

    let updates = form.serialize(&plan).unwrap();
    let steps: Vec<Step> =
        serde_json::from_value(update(&updates, PlanField::Steps).clone()).unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].id.as_deref(), Some("s1"));
    assert_eq!(steps[0].name, "Kick-off");
    assert_eq!(steps[0].tasks.len(), 1);
    assert_eq!(steps[1].learning_activity, "Reflect");
    assert_eq!(steps[2].id, None);
    assert_eq!(steps[2].workload, 10);
    assert_eq!(steps[2].timestamp_from.as_deref(), Some("2024-06-01T00:00:00"));
}

#[test]
fn test_renamed_unsaved_step_keeps_fine_planning() {
    let plan = two_step_plan();
    let mut form = StepNamesForm::load(&plan);
    form.steps.get_mut(1).unwrap().name = "Closing".to_string();
    form.steps.append(StepRow {
        name: "Wrap-up".to_string(),
        ..Default::default()
    });

    let updates = form.serialize(&plan).unwrap();
    let steps: Vec<Step> =
        serde_json::from_value(update(&updates, PlanField::Steps).clone()).unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[1].name, "Closing");
    assert_eq!(steps[1].learning_activity, "Reflect");
    assert_eq!(steps[2].name, "Wrap-up");
    assert!(steps[2].learning_activity.is_empty());
}

#[test]
fn test_renamed_unsaved_step_survives_json_edit() {
    let plan = two_step_plan();
    let mut value = PageForm::load(&PageKind::StepNames, &plan)
        .unwrap()
        .to_json()
        .unwrap();
    assert_eq!(value["steps"][1]["_origin"], json!("Wrap-up"));
    assert!(value["steps"][0].get("_origin").is_none());
    value["steps"][1]["name"] = json!("Closing");

    let form = PageForm::from_json(&PageKind::StepNames, value).unwrap();
    let updates = form.serialize(&plan).unwrap();
    let steps: Vec<Step> =
        serde_json::from_value(update(&updates, PlanField::Steps).clone()).unwrap();
    assert_eq!(steps[1].name, "Closing");
    assert_eq!(steps[1].learning_activity, "Reflect");
    assert_eq!(steps[0].tasks.len(), 1);
}

#[test]
fn test_step_names_must_be_unique() {
    let mut form = StepNamesForm::load(&Plan::empty("p1"));
    form.steps.get_mut(0).unwrap().name = "Kickoff".to_string();
    form.steps.append(StepRow {
        name: " Kickoff ".to_string(),
        ..Default::default()
    });
    form.steps.append_blank();

    let errors = form.validate().unwrap_err();
    let second = form.steps.id_at(1).unwrap();
    assert_eq!(errors.for_row(second).count(), 1);
}

#[test]
fn test_step_names_require_a_name_on_filled_rows() {
    let mut form = StepNamesForm::load(&Plan::empty("p1"));
    form.steps.get_mut(0).unwrap().workload = Some(4);
    assert!(form.validate().is_err());
}

#[test]
fn test_step_form_replaces_only_its_step() {
    let plan = two_step_plan();
    let mut form = StepForm::load(&plan, "Wrap-up").unwrap();
    assert_eq!(form.tasks.len(), 1);
    form.learning_activity = "Present results".to_string();
    form.has_tasks = true;
    form.tasks.get_mut(0).unwrap().task_formulation = "Slides".to_string();

    let updates = form.serialize(&plan).unwrap();
    let steps: Vec<Step> =
        serde_json::from_value(update(&updates, PlanField::Steps).clone()).unwrap();
    assert_eq!(steps[0], plan.steps[0]);
    assert_eq!(steps[1].learning_activity, "Present results");
    assert_eq!(steps[1].tasks[0].task_formulation, "Slides");
    assert!(steps[1].tasks[0].tools.is_empty());
}

#[test]
fn test_step_form_unknown_key() {
    let plan = two_step_plan();
    assert!(matches!(
        StepForm::load(&plan, "nope"),
        Err(PlannerError::StepNotFound { .. })
    ));
}

#[test]
fn test_from_json_applies_row_floors() {
    let kind = PageKind::Step("s1".to_string());
    let form = PageForm::from_json(
        &kind,
        json!({"learning_activity": "", "has_tasks": true, "tasks": [{"task_formulation": "x"}]}),
    )
    .unwrap();
    let PageForm::Step(step) = &form else {
        panic!("wrong variant");
    };
    assert_eq!(step.key, "s1");
    let task = step.tasks.get(0).unwrap();
    assert_eq!(task.tools.len(), 1);
    assert_eq!(task.materials.len(), 1);
    assert_eq!(form.kind(), kind);

    let empty = PageForm::from_json(&PageKind::Lectures, json!({})).unwrap();
    let PageForm::Lectures(lectures) = &empty else {
        panic!("wrong variant");
    };
    assert_eq!(lectures.lectures.len(), 1);
    assert_eq!(lectures.lectures.floor(), RowFloor::One);
}

#[test]
fn test_from_json_rejects_unknown_keys() {
    let misspelled = PageForm::from_json(
        &PageKind::Institutions,
        json!({"institution": [{"name": "TU Berlin"}]}),
    );
    assert!(matches!(misspelled, Err(PlannerError::InvalidInput { .. })));

    let row = PageForm::from_json(
        &PageKind::Institutions,
        json!({"institutions": [{"nam": "TU Berlin"}]}),
    );
    assert!(matches!(row, Err(PlannerError::InvalidInput { .. })));

    let task = PageForm::from_json(
        &PageKind::Step("s1".to_string()),
        json!({"tasks": [{"task": "x"}]}),
    );
    assert!(matches!(task, Err(PlannerError::InvalidInput { .. })));

    let plan = plan_with(json!({"institutions": [{"name": "TU Berlin", "country": "DE"}]}));
    let value = PageForm::load(&PageKind::Institutions, &plan)
        .unwrap()
        .to_json()
        .unwrap();
    assert!(PageForm::from_json(&PageKind::Institutions, value).is_ok());
}

#[test]
fn test_to_json_uses_edit_representation() {
    let plan = plan_with(json!({"languages": ["en", "de"]}));
    let form = PageForm::load(&PageKind::TargetGroups, &plan).unwrap();
    let value = form.to_json().unwrap();
    assert_eq!(value["languages"], json!([{"name": "en"}, {"name": "de"}]));
}

#[test]
fn test_page_kind_parsing() {
    assert_eq!("target-groups".parse::<PageKind>().unwrap(), PageKind::TargetGroups);
    assert_eq!(
        "step:s1".parse::<PageKind>().unwrap(),
        PageKind::Step("s1".to_string())
    );
    assert!("step:".parse::<PageKind>().is_err());
    assert!("finish".parse::<PageKind>().is_err());
    assert_eq!(PageKind::Step("s1".to_string()).to_string(), "step:s1");
}

#[test]
fn test_progress_key_prefers_step_id() {
    let plan = two_step_plan();
    let id = StepKeyScheme::Id;
    assert_eq!(PageKind::Step("Kickoff".to_string()).progress_key(&plan, id), "s1");
    assert_eq!(PageKind::Step("Wrap-up".to_string()).progress_key(&plan, id), "Wrap-up");
    assert_eq!(PageKind::LearningEnv.progress_key(&plan, id), "learning-env");
    assert_eq!(
        PageKind::Step("s1".to_string()).progress_key(&plan, StepKeyScheme::DisplayName),
        "Kickoff"
    );
}
