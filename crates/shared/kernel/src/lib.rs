//! Kernel utilities shared by the CLI and any future transport.
//! Keep this crate lightweight; it owns configuration loading, the JSON wire codec and the
//! mapping from raw error responses to modeled service faults.
//!
//! ## Decoding a shape
//! ```rust
//! use cirrus_kernel::wire::{self, WireSettings};
//! use cirrus_model::EngineOption;
//!
//! let option: EngineOption = wire::decode_str(r#"{"Name":"MEMCACHED"}"#, &WireSettings::default())?;
//! assert_eq!(option.name(), Some("MEMCACHED"));
//! # Ok::<(), cirrus_kernel::wire::WireError>(())
//! ```
//!
//! ## Mapping an error response
//! ```rust
//! use cirrus_kernel::response::{ErrorResponse, map_error_response};
//!
//! let fault = map_error_response(&ErrorResponse::new(408, r#"{"message":"slow"}"#));
//! assert!(fault.is_timeout());
//! ```
pub mod config;
pub mod response;
pub mod wire;

pub use cirrus_model as model;
