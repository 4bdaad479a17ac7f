//! Response envelope shared by every endpoint

use serde::{Deserialize, Serialize};

/// Outcome flag carried in every response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    /// Request handled
    Success,
    /// Request rejected; see `error`
    Error,
    /// Any other marker; treated as a failure
    #[serde(other)]
    Unknown,
}

/// `{ status, data?, error? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Outcome flag
    pub status: EnvelopeStatus,
    /// Payload on success
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Message on failure
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope with a message
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Whether the backend reported success
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success
    }

    /// Split into the payload or the backend's message
    ///
    /// # Errors
    /// Returns the `error` text (or a generic message) when `status` is not
    /// `success`.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "backend reported an error".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_data() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":"success","data":[1,2]}"#).unwrap();
        assert_eq!(env.into_result(), Ok(Some(vec![1, 2])));
    }

    #[test]
    fn error_carries_message() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":"error","error":"Vendor not found"}"#).unwrap();
        assert_eq!(env.into_result(), Err("Vendor not found".to_string()));
    }

    #[test]
    fn unknown_status_is_a_failure() {
        let env: Envelope<()> = serde_json::from_str(r#"{"status":"maybe"}"#).unwrap();
        assert_eq!(env.status, EnvelopeStatus::Unknown);
        assert!(env.into_result().is_err());
    }
}
