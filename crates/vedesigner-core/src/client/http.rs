//! HTTP client for the VE-Designer backend.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::{
    wire::{
        ErrorBody, PlanResponse, ProfileInformationResponse, SnippetsRequest, SnippetsResponse,
        UpdateFieldsRequest, WireFieldUpdate,
    },
    PlanStore,
};
use crate::{
    error::{NetworkResultExt, PlannerError, Result},
    models::{FieldUpdate, Institution, Plan, PlanId, UserSnippet},
};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error bodies longer than this are cut in messages.
const MAX_ERROR_MESSAGE: usize = 200;

/// Plan API client authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| PlannerError::Configuration {
            message: format!("Invalid API url '{base_url}': {e}"),
        })?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends one request and decodes a successful JSON body.
    ///
    /// `plan_id` turns a 404 into `PlanNotFound`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
        plan_id: Option<&PlanId>,
    ) -> Result<T> {
        let response = request.send().await.net_context(what)?;
        let status = response.status();
        debug!("{what}: {status}");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(
                status,
                error_message(&body),
                plan_id.map(PlanId::as_str),
            ));
        }
        response.json::<T>().await.net_context(what)
    }

    /// Like [`send`](Self::send) for endpoints whose success body is ignored.
    async fn send_ignoring_body(&self, request: RequestBuilder, what: &str) -> Result<()> {
        let response = request.send().await.net_context(what)?;
        let status = response.status();
        debug!("{what}: {status}");
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, error_message(&body), None))
    }
}

/// Maps a non-success status to the wizard's error taxonomy.
pub fn classify_status(status: StatusCode, message: String, plan_id: Option<&str>) -> PlannerError {
    match (status, plan_id) {
        (StatusCode::UNAUTHORIZED, _) => PlannerError::Unauthorized,
        (StatusCode::FORBIDDEN, _) => PlannerError::Forbidden { message },
        (StatusCode::NOT_FOUND, Some(id)) => PlannerError::PlanNotFound { id: id.to_string() },
        (other, _) => PlannerError::Http {
            status: other.as_u16(),
            message,
        },
    }
}

/// Human readable message of an error body.
pub fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.into_message() {
            return message;
        }
    }
    let body = body.trim();
    if body.chars().count() > MAX_ERROR_MESSAGE {
        let cut: String = body.chars().take(MAX_ERROR_MESSAGE).collect();
        format!("{cut}…")
    } else {
        body.to_string()
    }
}

#[async_trait]
impl PlanStore for ApiClient {
    fn backend_tag(&self) -> &'static str {
        "api"
    }

    async fn fetch_plan(&self, id: &PlanId) -> Result<Plan> {
        debug!("fetching plan {id} from {}", self.base_url);
        let request = self
            .request(Method::GET, "/planner/get")
            .query(&[("_id", id.as_str())]);
        let response: PlanResponse = self.send(request, "Failed to fetch plan", Some(id)).await?;
        Ok(response.plan)
    }

    async fn update_fields(&self, id: &PlanId, updates: &[FieldUpdate]) -> Result<()> {
        debug!("updating {} field(s) of plan {id}", updates.len());
        let body = UpdateFieldsRequest {
            update: updates
                .iter()
                .map(|update| WireFieldUpdate {
                    plan_id: id.as_str(),
                    field_name: update.field,
                    value: &update.value,
                })
                .collect(),
        };
        let request = self.request(Method::POST, "/planner/update_fields").json(&body);
        self.send_ignoring_body(request, "Failed to update plan").await
    }

    async fn update_field(&self, id: &PlanId, update: &FieldUpdate) -> Result<()> {
        debug!("updating field {} of plan {id}", update.field);
        let body = WireFieldUpdate {
            plan_id: id.as_str(),
            field_name: update.field,
            value: &update.value,
        };
        let request = self.request(Method::POST, "/planner/update_field").json(&body);
        self.send_ignoring_body(request, "Failed to update plan").await
    }

    async fn profile_snippets(&self, usernames: &[String]) -> Result<Vec<UserSnippet>> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .request(Method::POST, "/profile_snippets")
            .json(&SnippetsRequest { usernames });
        let response: SnippetsResponse = self
            .send(request, "Failed to fetch profile snippets", None)
            .await?;
        Ok(response.user_snippets)
    }

    async fn profile_institutions(&self) -> Result<Vec<Institution>> {
        let request = self.request(Method::GET, "/profileinformation");
        let response: ProfileInformationResponse = self
            .send(request, "Failed to fetch profile information", None)
            .await?;
        Ok(response.profile.institutions)
    }
}
