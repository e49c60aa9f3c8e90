use serde::Serialize;

/// Uniform response envelope: `{status: "ok"|"error", message?, data?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "ok",
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "ok",
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            status: "ok",
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
            data: None,
        }
    }
}
