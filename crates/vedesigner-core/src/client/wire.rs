//! Request and response bodies of the Plan and Profile APIs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{nullable, Institution, Plan, PlanField, UserSnippet};

/// `GET /planner/get?_id=<id>`
#[derive(Debug, Deserialize)]
pub struct PlanResponse {
    pub plan: Plan,
}

/// One entry of an update request.
#[derive(Debug, Serialize, PartialEq)]
pub struct WireFieldUpdate<'a> {
    pub plan_id: &'a str,
    pub field_name: PlanField,
    pub value: &'a Value,
}

/// `POST /planner/update_fields`
#[derive(Debug, Serialize)]
pub struct UpdateFieldsRequest<'a> {
    pub update: Vec<WireFieldUpdate<'a>>,
}

/// `POST /profile_snippets`
#[derive(Debug, Serialize)]
pub struct SnippetsRequest<'a> {
    pub usernames: &'a [String],
}

#[derive(Debug, Deserialize)]
pub struct SnippetsResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub user_snippets: Vec<UserSnippet>,
}

/// `GET /profileinformation`, reduced to what the import dialog reads.
#[derive(Debug, Deserialize)]
pub struct ProfileInformationResponse {
    pub profile: ProfileInformation,
}

#[derive(Debug, Deserialize)]
pub struct ProfileInformation {
    #[serde(default, deserialize_with = "nullable")]
    pub institutions: Vec<Institution>,
}

/// Body of a failed request. The backend is not consistent about the key.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub reason: Option<String>,
    pub message: Option<String>,
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.reason.or(self.message).or(self.detail)
    }
}
