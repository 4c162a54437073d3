//! Error handling utilities for MCP server

use rmcp::ErrorData;
use vedesigner_core::{ErrorOutcome, PlannerError};

/// Converts a wizard error into the matching MCP error.
pub fn to_mcp_error(message: &str, error: &PlannerError) -> ErrorData {
    let text = format!("{message}: {error}");
    match (error.outcome(), error) {
        (ErrorOutcome::Reauthenticate, _) => ErrorData::invalid_request(text, None),
        (ErrorOutcome::Redirect | ErrorOutcome::BlockNavigation, _)
        | (_, PlannerError::InvalidInput { .. }) => ErrorData::invalid_params(text, None),
        (_, PlannerError::PlanNotFound { .. } | PlannerError::StepNotFound { .. }) => {
            ErrorData::resource_not_found(text, None)
        }
        _ => ErrorData::internal_error(text, None),
    }
}

#[cfg(test)]
mod tests {
    use rmcp::model::ErrorCode;

    use super::*;

    #[test]
    fn test_error_codes_follow_outcome() {
        let error = to_mcp_error("Failed to open plan", &PlannerError::MissingPlanId);
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);

        let error = to_mcp_error(
            "Failed to open plan",
            &PlannerError::PlanNotFound {
                id: "p1".to_string(),
            },
        );
        assert_eq!(error.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(error.message.contains("p1"));

        let error = to_mcp_error("Failed to save", &PlannerError::Unauthorized);
        assert_eq!(error.code, ErrorCode::INVALID_REQUEST);
    }
}
