//! Facade crate for Cirrus shapes and shared modules.
//! Re-exports the model and kernel crates and keeps a registry of the shapes it ships.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust
//! use cirrus::prelude::*;
//!
//! let option: EngineOption = wire::decode_str(r#"{"Name":"SQLT"}"#, &WireSettings::default())?;
//! assert_eq!(option.to_string(), "{Name: SQLT,}");
//! # Ok::<(), WireError>(())
//! ```

pub use cirrus_kernel as kernel;
pub use cirrus_model as model;

pub mod prelude {
    pub use cirrus_kernel::response::{ErrorResponse, ServiceFault, map_error_response};
    pub use cirrus_kernel::wire::{self, WireError, WireSettings};
    pub use cirrus_model::{
        EngineOption, EngineOptionSetting, ErrorType, SdkModel, ServiceErrorDetails, StableHash,
        TimeoutSignal,
    };
}

/// Shape registry for runtime introspection.
pub mod shapes {
    use cirrus_model::{EngineOption, EngineOptionSetting, SdkModel, TimeoutSignal};

    /// One modeled shape: its wire name and field labels in declaration order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShapeInfo {
        pub name: &'static str,
        pub fields: &'static [&'static str],
    }

    impl ShapeInfo {
        const fn of<M: SdkModel>() -> Self {
            Self { name: M::SHAPE, fields: M::FIELDS }
        }
    }

    pub const ALL: &[ShapeInfo] = &[
        ShapeInfo::of::<EngineOption>(),
        ShapeInfo::of::<EngineOptionSetting>(),
        ShapeInfo::of::<TimeoutSignal>(),
    ];

    #[must_use]
    pub fn find(name: &str) -> Option<&'static ShapeInfo> {
        ALL.iter().find(|shape| shape.name == name)
    }
}
