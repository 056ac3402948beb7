//! # SDK Models
//!
//! Typed request/response shapes for the cloud services we talk to.
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.
//!
//! Every shape is declared with [`sdk_model`], which generates the accessors,
//! fluent `with_*` setters, equality, [`StableHash`], [`SdkModel`] metadata and the
//! `{Label: value,}` rendering.
//!
//! ## Example
//!
//! ```rust
//! use cirrus_model::{EngineOption, StableHash};
//!
//! let option = EngineOption::new().with_name("mysql_audit").with_port_required(false);
//! assert_eq!(option.name(), Some("mysql_audit"));
//! assert_eq!(option.to_string(), "{Name: mysql_audit,PortRequired: false,}");
//! assert_eq!(option.stable_hash(), option.clone().stable_hash());
//! ```
//!
//! Model instances are plain values owned by a single request/response cycle;
//! they are not meant to be mutated from several threads at once.

extern crate self as cirrus_model;

pub mod hash;
mod option;
pub mod render;
pub mod seq;
mod service_error;
mod timeout;

pub use crate::hash::StableHash;
pub use crate::option::{EngineOption, EngineOptionSetting};
pub use crate::seq::Sequence;
pub use crate::service_error::{ErrorType, ServiceErrorDetails};
pub use crate::timeout::TimeoutSignal;
pub use cirrus_derive::sdk_model;

/// Metadata every generated model exposes.
pub trait SdkModel: StableHash + Clone + PartialEq + std::fmt::Debug {
    /// Wire-level shape name, e.g. `OptionGroupOption`.
    const SHAPE: &'static str;
    /// Field labels in declaration order.
    const FIELDS: &'static [&'static str];
}
