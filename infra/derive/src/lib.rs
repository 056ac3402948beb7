#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros behind the SDK model layer.
//! `#[sdk_model]` turns a plain struct of optional fields into a full model object
//! (accessors, fluent setters, equality, stable hash, rendering), and
//! `#[cirrus_error]` wires infrastructure error enums into `thiserror`.
//!
//! ## Usage
//! The generated code refers to `::cirrus_model` and `::serde`, so consuming crates
//! depend on both:
//! ```toml
//! [dependencies]
//! cirrus-derive = { path = "../infra/derive" }
//! cirrus-model = { path = "../crates/shared/model" }
//! serde = { version = "1", features = ["derive", "rc"] }
//! ```
//!
//! Examples below are `ignore`d to avoid compiling in this crate; the `tests/`
//! directory exercises them against real models.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// Attribute macro that expands a struct into a complete SDK model object.
///
/// # Field kinds
///
/// * `Option<Vec<T>>` - a **sequence** field, stored as `cirrus_model::Sequence<T>`.
///   `Clone` is shallow: the copy shares the list, and writes through `f_mut()` show
///   through every copy. Unset and empty compare and hash the same.
///   Generates `f()`, `f_mut()`, `has_f()`, `set_f()` and an appending `with_f()`.
/// * `Option<T>` - an **optional** field. Generates `f()`, `set_f()` and `with_f()`.
/// * any other `T` - a **required** field with the same three accessors.
///
/// Getters return `Option<&str>` for `String`, a copy for primitives (or fields
/// marked `#[model(copy)]`), and a reference otherwise.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Serialize`,
///   `Deserialize`, plus `Default` when every field is optional.
/// * **Traits**: `cirrus_model::StableHash` (31-prime, declaration order) and
///   `cirrus_model::SdkModel`.
/// * **Display**: `{Label: value,...}` over the set fields, unless `display = false`.
/// * **Serde Policy**: `rename_all = "PascalCase"` by default; unset fields are
///   skipped on output and defaulted on input.
///
/// # Arguments
///
/// * `shape = "OptionGroupOption"` - wire shape name (defaults to the struct name).
/// * `rename_all = "camelCase"` - overrides the default Serde rename policy.
/// * `display = false` - leaves `Display` to the caller.
///
/// Field attribute `#[model(name = "...")]` overrides the wire name and label.
///
/// # Example
///
/// ```rust,ignore
/// use cirrus_derive::sdk_model;
///
/// #[sdk_model(shape = "OptionGroupOption")]
/// pub struct EngineOption {
///     name: Option<String>,
///     port_required: Option<bool>,
///     #[model(name = "OptionsDependedOn")]
///     depends_on: Option<Vec<String>>,
/// }
///
/// let option = EngineOption::default().with_name("mysql_audit").with_depends_on(["a", "b"]);
/// assert_eq!(option.to_string(), "{Name: mysql_audit,OptionsDependedOn: [a, b],}");
/// ```
#[proc_macro_attribute]
pub fn sdk_model(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::model::expand_sdk_model(args.into(), input).into()
}

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `#[source]` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&str>` and `From<String>` implementations
///   if an `Internal` variant is present.
/// * **Variant Names**: Adds `kind()` returning the variant name for programmatic branching.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]` (compatible with `thiserror`).
/// 4. Tuple or unit variants are rejected to keep error wiring explicit.
///
/// # Example
///
/// ```rust,ignore
/// use cirrus_derive::cirrus_error;
/// use std::borrow::Cow;
///
/// #[cirrus_error]
/// pub enum WireError {
///     #[error("Malformed payload{}: {source}", format_context(.context))]
///     Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// let err = serde_json::from_str::<u8>("x").context("Decoding port").unwrap_err();
/// assert_eq!(err.kind(), "Json");
/// ```
#[proc_macro_attribute]
pub fn cirrus_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
