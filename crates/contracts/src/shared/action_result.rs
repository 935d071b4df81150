use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Outcome of a user-triggered action (form submit, delete, toggle).
///
/// Call sites never propagate failures past the handler: they fold them into
/// this shape and let the view decide how to show `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl<T, E: Display> From<Result<T, E>> for ActionResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        let ok: ActionResult<u32> = Ok::<u32, String>(7).into();
        assert!(ok.success);
        assert_eq!(ok.data, Some(7));

        let failed: ActionResult<u32> = Err::<u32, String>("boom".into()).into();
        assert!(!failed.success);
        assert_eq!(failed.error_message(), Some("boom"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ActionResult::<()>::failed("Route creation error")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error": "Route creation error" })
        );
    }
}
