use crate::StableHash;
use crate::sdk_model;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{AsRefStr, Display, EnumString};

/// Which side of the exchange a service error blames.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ErrorType {
    Client,
    Service,
    #[default]
    Unknown,
}

impl ErrorType {
    /// Classifies an HTTP status: 4xx is the caller's fault, 5xx the service's.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            400..=499 => Self::Client,
            500..=599 => Self::Service,
            _ => Self::Unknown,
        }
    }
}

impl StableHash for ErrorType {
    fn stable_hash(&self) -> i32 {
        self.as_ref().stable_hash()
    }
}

/// Metadata every service error carries, whatever its specific shape.
///
/// The message is the primary diagnostic; the rest is filled in from the
/// response (status, request id) by whoever maps the response.
#[sdk_model(shape = "ServiceError", rename_all = "camelCase", display = false)]
pub struct ServiceErrorDetails {
    #[model(name = "message")]
    #[serde(default)]
    error_message: String,
    error_code: Option<String>,
    #[model(copy)]
    error_type: Option<ErrorType>,
    status_code: Option<u16>,
    service_name: Option<String>,
    request_id: Option<String>,
}

impl ServiceErrorDetails {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
            error_code: None,
            error_type: None,
            status_code: None,
            service_name: None,
            request_id: None,
        }
    }
}

impl fmt::Display for ServiceErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Service: {}; Status Code: {}; Error Code: {}; Error Type: {}; Request ID: {})",
            self.error_message,
            self.service_name.as_deref().unwrap_or("null"),
            self.status_code.unwrap_or_default(),
            self.error_code.as_deref().unwrap_or("null"),
            self.error_type.unwrap_or_default(),
            self.request_id.as_deref().unwrap_or("null"),
        )
    }
}

impl std::error::Error for ServiceErrorDetails {}
