use crate::sdk_model;
use crate::service_error::{ErrorType, ServiceErrorDetails};

/// The upstream request timed out (`RequestTimeoutException`, HTTP 408).
///
/// Built once with a message where the timeout is detected; `kind` and `code`
/// are optional overlays filled from the response payload and may be absent.
/// The signal is propagated to the caller unchanged: no retry happens here.
#[sdk_model(shape = "RequestTimeoutException", rename_all = "camelCase", display = false)]
#[derive(thiserror::Error)]
#[error("{details}")]
pub struct TimeoutSignal {
    #[serde(flatten)]
    details: ServiceErrorDetails,
    /// Usually `Client`.
    #[model(name = "type")]
    kind: Option<String>,
    /// Usually `408 Request Timeout`.
    code: Option<String>,
}

impl TimeoutSignal {
    pub const STATUS: u16 = 408;
    pub const EXPECTED_KIND: &'static str = "Client";
    pub const EXPECTED_CODE: &'static str = "408 Request Timeout";
    pub const ERROR_CODE: &'static str = "RequestTimeoutException";

    pub fn new(message: impl Into<String>) -> Self {
        Self { details: ServiceErrorDetails::new(message), kind: None, code: None }
    }

    /// The human-readable message; never rewritten by the overlays.
    #[must_use]
    pub fn message(&self) -> &str {
        self.details.error_message()
    }

    /// Mutable access to the base metadata for the response-mapping layer.
    pub const fn details_mut(&mut self) -> &mut ServiceErrorDetails {
        &mut self.details
    }

    /// Fills the base metadata the service would report for a 408.
    #[must_use]
    pub fn with_timeout_defaults(mut self) -> Self {
        let details = &mut self.details;
        details.set_status_code(Some(Self::STATUS));
        if details.error_code().is_none() {
            details.set_error_code(Some(Self::ERROR_CODE.to_owned()));
        }
        if details.error_type().is_none() {
            let error_type = self
                .kind
                .as_deref()
                .and_then(|kind| kind.parse().ok())
                .unwrap_or(ErrorType::Client);
            details.set_error_type(Some(error_type));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlays_do_not_touch_message() {
        let signal = TimeoutSignal::new("Timed out waiting for input")
            .with_kind(TimeoutSignal::EXPECTED_KIND)
            .with_code(TimeoutSignal::EXPECTED_CODE);

        assert_eq!(signal.kind(), Some("Client"));
        assert_eq!(signal.code(), Some("408 Request Timeout"));
        assert_eq!(signal.message(), "Timed out waiting for input");
    }

    #[test]
    fn timeout_defaults_respect_existing_values() {
        let mut signal = TimeoutSignal::new("slow").with_kind("Service");
        signal.details_mut().set_error_code(Some("Custom".to_owned()));

        let signal = signal.with_timeout_defaults();
        assert_eq!(signal.details().status_code(), Some(408));
        assert_eq!(signal.details().error_code(), Some("Custom"));
        assert_eq!(signal.details().error_type(), Some(ErrorType::Service));
    }

    #[test]
    fn renders_as_service_error_message() {
        let signal = TimeoutSignal::new("slow").with_timeout_defaults();
        assert_eq!(
            signal.to_string(),
            "slow (Service: null; Status Code: 408; Error Code: RequestTimeoutException; \
             Error Type: Client; Request ID: null)"
        );
    }
}
