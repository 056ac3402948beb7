//! Maps raw error responses onto modeled service faults.
//!
//! A 408, or a body whose code names `RequestTimeoutException`, becomes a
//! [`TimeoutSignal`]. Everything else stays a generic [`ServiceErrorDetails`].
//! Faults are handed back to the caller as-is; nothing here retries.
use crate::wire::{self, WireSettings};
use cirrus_model::{ErrorType, ServiceErrorDetails, TimeoutSignal};
use serde::Deserialize;
use tracing::{debug, warn};

/// Raw failure as received from a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub request_id: Option<String>,
    pub service: Option<String>,
    pub body: Vec<u8>,
}

impl ErrorResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, request_id: None, service: None, body: body.into() }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }
}

/// A failed service call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceFault {
    #[error(transparent)]
    RequestTimeout(TimeoutSignal),
    #[error(transparent)]
    Service(ServiceErrorDetails),
}

impl ServiceFault {
    #[must_use]
    pub fn details(&self) -> &ServiceErrorDetails {
        match self {
            Self::RequestTimeout(signal) => signal.details(),
            Self::Service(details) => details,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.details().status_code()
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.details().request_id()
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestTimeout(_))
    }
}

/// The subset of an error body every service agrees on.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(alias = "Message")]
    message: Option<String>,
    #[serde(alias = "Code")]
    code: Option<String>,
    #[serde(rename = "__type")]
    type_name: Option<String>,
    #[serde(rename = "type", alias = "Type")]
    kind: Option<String>,
}

impl ErrorBody {
    fn parse(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::default();
        }
        serde_json::from_slice(bytes).unwrap_or_else(|err| {
            warn!(error = %err, "Unreadable error body");
            Self::default()
        })
    }

    /// Error code from `__type` (minus any `namespace#` prefix) or `code`.
    fn error_code(&self) -> Option<&str> {
        self.type_name
            .as_deref()
            .and_then(|name| name.rsplit('#').next())
            .filter(|name| !name.is_empty())
            .or(self.code.as_deref())
    }

    /// Like [`Self::error_code`], but a free-form `code` only counts when it
    /// names an exception.
    fn exception_name(&self) -> Option<&str> {
        self.error_code().filter(|code| code.ends_with("Exception"))
    }

    fn names_timeout(&self) -> bool {
        [self.type_name.as_deref(), self.code.as_deref()]
            .into_iter()
            .flatten()
            .any(|name| name.ends_with(TimeoutSignal::ERROR_CODE))
    }

    fn error_type(&self, status: u16) -> ErrorType {
        self.kind
            .as_deref()
            .and_then(|kind| kind.parse().ok())
            .unwrap_or_else(|| ErrorType::from_status(status))
    }
}

/// Canonical reason phrase, used as the message when the body carries none.
#[must_use]
pub const fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        408 => "Request Timeout",
        409 => "Conflict",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        400..=499 => "Client Error",
        500..=599 => "Server Error",
        _ => "Unknown Status",
    }
}

/// Turns a raw error response into the fault handed to the caller.
#[must_use]
pub fn map_error_response(response: &ErrorResponse) -> ServiceFault {
    let body = ErrorBody::parse(&response.body);
    let message = body.message.clone().unwrap_or_else(|| reason_phrase(response.status).to_owned());

    let fault = if response.status == TimeoutSignal::STATUS || body.names_timeout() {
        ServiceFault::RequestTimeout(timeout_signal(response, &body, message))
    } else {
        let mut details = ServiceErrorDetails::new(message);
        details.set_error_code(body.error_code().map(str::to_owned));
        details.set_error_type(Some(body.error_type(response.status)));
        fill_base(&mut details, response);
        ServiceFault::Service(details)
    };

    debug!(
        status = response.status,
        timeout = fault.is_timeout(),
        request_id = ?response.request_id,
        "Mapped error response"
    );
    fault
}

fn timeout_signal(response: &ErrorResponse, body: &ErrorBody, message: String) -> TimeoutSignal {
    // Overlays go through the regular shape decoder; a body that is not a
    // timeout payload still yields a signal carrying the message.
    let mut signal = match wire::decode::<TimeoutSignal>(&response.body, &WireSettings::default()) {
        Ok(mut signal) => {
            if signal.message().is_empty() {
                signal.details_mut().set_error_message(message);
            }
            signal
        },
        Err(err) => {
            warn!(
                error = %err,
                status = response.status,
                "Timeout body did not decode, using lenient fields"
            );
            let mut signal = TimeoutSignal::new(message);
            signal.set_kind(body.kind.clone());
            signal.set_code(body.code.clone());
            signal
        },
    };

    signal.details_mut().set_error_code(body.exception_name().map(str::to_owned));

    let mut signal = signal.with_timeout_defaults();
    fill_base(signal.details_mut(), response);
    signal
}

fn fill_base(details: &mut ServiceErrorDetails, response: &ErrorResponse) {
    details.set_status_code(Some(response.status));
    details.set_request_id(response.request_id.clone());
    details.set_service_name(response.service.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_prefers_short_type_name() {
        let body = ErrorBody {
            type_name: Some("com.example.glacier#RequestTimeoutException".to_owned()),
            code: Some("Other".to_owned()),
            ..ErrorBody::default()
        };
        assert_eq!(body.error_code(), Some("RequestTimeoutException"));
        assert_eq!(body.exception_name(), Some("RequestTimeoutException"));
        assert!(body.names_timeout());
    }

    #[test]
    fn status_text_code_is_not_an_exception_name() {
        let body = ErrorBody { code: Some("408 Request Timeout".to_owned()), ..ErrorBody::default() };
        assert_eq!(body.error_code(), Some("408 Request Timeout"));
        assert_eq!(body.exception_name(), None);

        let body = ErrorBody { code: Some("ThrottlingException".to_owned()), ..ErrorBody::default() };
        assert_eq!(body.exception_name(), Some("ThrottlingException"));
    }

    #[test]
    fn error_type_falls_back_to_status() {
        let body = ErrorBody { kind: Some("bogus".to_owned()), ..ErrorBody::default() };
        assert_eq!(body.error_type(503), ErrorType::Service);
        assert_eq!(ErrorBody::default().error_type(404), ErrorType::Client);
    }

    #[test]
    fn reason_phrases_cover_classes() {
        assert_eq!(reason_phrase(408), "Request Timeout");
        assert_eq!(reason_phrase(418), "Client Error");
        assert_eq!(reason_phrase(302), "Unknown Status");
    }

    #[test]
    fn empty_body_is_not_an_error() {
        let body = ErrorBody::parse(b"");
        assert!(body.message.is_none());
        assert!(!body.names_timeout());
    }
}
