//! Rendering helpers shared by the generated `Display` impls.

use std::fmt::{self, Display, Formatter};

/// Writes `items` as `[a, b, c]`.
///
/// # Errors
/// Propagates formatter errors.
pub fn write_sequence<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}
