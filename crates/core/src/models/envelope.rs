//! Response envelope wrapping every REST payload.

use serde::{Deserialize, Serialize};

/// `{ success, data, error? }` wrapper returned by the ticketing service.
///
/// Older endpoints report failures through `message` or a list of `errors`
/// instead of `error`; [`ApiEnvelope::failure_message`] folds all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiEnvelope<T> {
    /// Build a successful envelope around `data`.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            errors: None,
        }
    }

    /// Build a failed envelope carrying `error`.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            errors: None,
        }
    }

    /// Human-readable reason for a failed envelope.
    #[must_use]
    pub fn failure_message(&self) -> String {
        if let Some(error) = &self.error {
            return error.clone();
        }
        if let Some(errors) = &self.errors
            && !errors.is_empty()
        {
            return errors.join("; ");
        }
        self.message
            .clone()
            .unwrap_or_else(|| "request was not successful".to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2,3]}"#).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_failure_message_prefers_error() {
        let envelope: ApiEnvelope<()> = serde_json::from_str(
            r#"{"success":false,"data":null,"error":"venue not found","message":"ignored"}"#,
        )
        .unwrap();
        assert_eq!(envelope.failure_message(), "venue not found");
    }

    #[test]
    fn test_failure_message_joins_validation_errors() {
        let envelope: ApiEnvelope<()> = serde_json::from_str(
            r#"{"success":false,"errors":["title: too short","price: negative"]}"#,
        )
        .unwrap();
        assert_eq!(
            envelope.failure_message(),
            "title: too short; price: negative"
        );
    }

    #[test]
    fn test_failure_message_fallback() {
        let envelope = ApiEnvelope::<()> {
            success: false,
            data: None,
            error: None,
            message: None,
            errors: Some(vec![]),
        };
        assert_eq!(envelope.failure_message(), "request was not successful");
    }
}
