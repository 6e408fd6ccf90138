//! Placeholder classification: decide what role a payload type reference
//! plays before the resolver commits to a resolution strategy.

use crate::provider::{MarkerKind, SpecialConstraint, TypeInfoProvider, TypeRef};

/// What a non-absent payload type reference turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadClass {
    /// The generic-slot marker: introduce a fresh parameter here.
    GenericSlot,
    /// A special-constraint marker. Only legal inside a generic-argument
    /// list; the resolver rejects it in payload position.
    Special(SpecialConstraint),
    /// An ordinary type reference (closed or unbound generic).
    Ordinary,
}

/// Classify one type reference. Pure; all identity questions go through the
/// provider's closed marker enumeration.
pub fn classify<P: TypeInfoProvider + ?Sized>(provider: &P, ty: TypeRef) -> PayloadClass {
    match provider.marker_kind(ty) {
        Some(MarkerKind::GenericSlot) => PayloadClass::GenericSlot,
        Some(MarkerKind::Constraint(special)) => PayloadClass::Special(special),
        None => PayloadClass::Ordinary,
    }
}
