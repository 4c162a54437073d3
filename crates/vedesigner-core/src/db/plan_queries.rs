//! Plan document storage and partial-field merge.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{FieldUpdate, Plan, PlanField},
};

const INSERT_PLAN_SQL: &str =
    "INSERT INTO plans (id, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_DOCUMENT_SQL: &str = "SELECT document FROM plans WHERE id = ?1";
const SELECT_ALL_DOCUMENTS_SQL: &str =
    "SELECT document FROM plans ORDER BY updated_at DESC, id ASC";
const UPDATE_DOCUMENT_SQL: &str = "UPDATE plans SET document = ?1, updated_at = ?2 WHERE id = ?3";

fn parse_document(raw: &str) -> Result<Plan> {
    Ok(serde_json::from_str(raw)?)
}

/// Gives every step object without an `_id` a fresh one, the way the Plan
/// API does on save.
fn assign_step_ids(steps: &mut Value) {
    let Value::Array(steps) = steps else {
        return;
    };
    for step in steps.iter_mut() {
        if let Value::Object(step) = step {
            let missing = step.get("_id").is_none_or(|id| id.is_null());
            if missing {
                step.insert("_id".to_string(), Value::String(Uuid::new_v4().to_string()));
            }
        }
    }
}

impl super::Database {
    /// Creates a plan with every content field empty.
    pub fn create_plan(&mut self, name: &str, author: &str) -> Result<Plan> {
        let now = Timestamp::now();
        let plan = Plan {
            name: name.to_string(),
            author: author.to_string(),
            creation_timestamp: Some(now.to_string()),
            last_modified: Some(now.to_string()),
            ..Plan::empty(Uuid::new_v4().to_string())
        };
        let document = serde_json::to_string(&plan)?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        tx.execute(
            INSERT_PLAN_SQL,
            params![plan.id, document, now.as_microsecond(), now.as_microsecond()],
        )
        .db_context("Failed to insert plan")?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(plan)
    }

    /// Retrieves a plan document by id.
    pub fn get_plan(&self, id: &str) -> Result<Option<Plan>> {
        let raw: Option<String> = self
            .connection
            .query_row(SELECT_DOCUMENT_SQL, params![id], |row| row.get(0))
            .optional()
            .db_context("Failed to query plan")?;
        raw.as_deref().map(parse_document).transpose()
    }

    /// All plans, most recently modified first.
    pub fn list_plans(&self) -> Result<Vec<Plan>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ALL_DOCUMENTS_SQL)
            .db_context("Failed to prepare query")?;
        let documents = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .db_context("Failed to query plans")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read plan row")?;

        documents.iter().map(|raw| parse_document(raw)).collect()
    }

    /// Merges `updates` into the stored document.
    ///
    /// Only the named fields are replaced; everything else in the document,
    /// including fields this crate does not model, is left as stored. The
    /// whole batch is applied in one transaction.
    pub fn update_fields(&mut self, id: &str, updates: &[FieldUpdate]) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let raw: String = tx
            .query_row(SELECT_DOCUMENT_SQL, params![id], |row| row.get(0))
            .optional()
            .db_context("Failed to query plan")?
            .ok_or_else(|| PlannerError::PlanNotFound { id: id.to_string() })?;

        let mut document: Map<String, Value> = serde_json::from_str(&raw)?;
        for update in updates {
            let mut value = update.value.clone();
            if update.field == PlanField::Steps {
                assign_step_ids(&mut value);
            }
            document.insert(update.field.as_str().to_string(), value);
        }

        let now = Timestamp::now();
        document.insert("last_modified".to_string(), Value::String(now.to_string()));

        // Reject batches that would leave a document the wizard cannot load.
        let merged = Value::Object(document);
        serde_json::from_value::<Plan>(merged.clone())?;

        tx.execute(
            UPDATE_DOCUMENT_SQL,
            params![serde_json::to_string(&merged)?, now.as_microsecond(), id],
        )
        .db_context("Failed to update plan")?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }

    /// Adds `username` to the plan's co-authors.
    ///
    /// Returns false when the user already had write access.
    pub fn grant_write_access(&mut self, id: &str, username: &str) -> Result<bool> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let raw: String = tx
            .query_row(SELECT_DOCUMENT_SQL, params![id], |row| row.get(0))
            .optional()
            .db_context("Failed to query plan")?
            .ok_or_else(|| PlannerError::PlanNotFound { id: id.to_string() })?;

        let mut plan = parse_document(&raw)?;
        if plan.author == username || plan.write_access.iter().any(|u| u == username) {
            return Ok(false);
        }
        plan.write_access.push(username.to_string());

        let mut document: Map<String, Value> = serde_json::from_str(&raw)?;
        document.insert(
            "write_access".to_string(),
            serde_json::to_value(&plan.write_access)?,
        );
        tx.execute(
            UPDATE_DOCUMENT_SQL,
            params![
                serde_json::to_string(&document)?,
                Timestamp::now().as_microsecond(),
                id
            ],
        )
        .db_context("Failed to update plan")?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(true)
    }
}
