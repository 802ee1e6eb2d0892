//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. Two
/// `Money` amounts of 1200 minor units are the same amount no matter where they
/// came from; two order lines for the same `ItemId` are the same line.
///
/// ```ignore
/// let a = Money::from_minor(1200);
/// let b: Money = "12.00".parse()?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
