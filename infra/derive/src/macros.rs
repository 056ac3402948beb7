pub mod error;
pub mod model;
mod shared;
