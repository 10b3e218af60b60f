//! API reply types.

use serde_json::Value;

/// Reply status reported in `ret`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiStatus {
    Success,
    Fail,
}

/// Decoded reply of the send or upload endpoint.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ApiResponse {
    pub ret: ApiStatus,
    #[serde(default)]
    pub data: Value,
}

impl ApiResponse {
    /// Create a successful reply.
    pub fn success(data: Value) -> Self {
        Self {
            ret: ApiStatus::Success,
            data,
        }
    }

    /// Create a failed reply.
    pub fn fail(error_code: impl Into<String>, error_msg: impl Into<String>) -> Self {
        Self {
            ret: ApiStatus::Fail,
            data: serde_json::json!({
                "error_code": error_code.into(),
                "error_msg": error_msg.into(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.ret == ApiStatus::Success
    }

    /// Message id of a unicast/listcast send.
    pub fn msg_id(&self) -> Option<&str> {
        self.data_str("msg_id")
    }

    /// Task id of a broadcast/groupcast/filecast/customizedcast send.
    pub fn task_id(&self) -> Option<&str> {
        self.data_str("task_id")
    }

    /// File id of an upload.
    pub fn file_id(&self) -> Option<&str> {
        self.data_str("file_id")
    }

    /// Error code; the API sends it as a string or a number.
    pub fn error_code(&self) -> Option<String> {
        match self.data.get("error_code")? {
            Value::String(code) => Some(code.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.data_str("error_msg")
    }

    fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"ret":"SUCCESS","data":{"msg_id":"uu123"}}"#).unwrap();
        assert!(response.is_success());
        assert_eq!(response.msg_id(), Some("uu123"));
        assert_eq!(response.task_id(), None);
    }

    #[test]
    fn test_decode_failure_with_numeric_code() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"ret":"FAIL","data":{"error_code":2018,"error_msg":"bad sign"}}"#)
                .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error_code().as_deref(), Some("2018"));
        assert_eq!(response.error_msg(), Some("bad sign"));
    }

    #[test]
    fn test_missing_data_defaults_to_null() {
        let response: ApiResponse = serde_json::from_str(r#"{"ret":"SUCCESS"}"#).unwrap();
        assert!(response.is_success());
        assert_eq!(response.file_id(), None);
    }
}
