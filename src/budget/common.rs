//! Shared trait for budget tree nodes.

/// Supplies the canonical amount carried by a node.
pub trait Amounted {
    fn amount(&self) -> f64;
}
