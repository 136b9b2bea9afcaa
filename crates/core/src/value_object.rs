//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// holding the same attributes are interchangeable. To "modify" one, build a
/// new one. Constructors are expected to validate, so a value object in hand
/// is always well-formed.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Alpha(f64);
///
/// impl ValueObject for Alpha {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
