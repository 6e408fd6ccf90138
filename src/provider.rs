//! The type-identity capability interface the resolver depends on.
//!
//! The core never talks to a concrete compiler API. The host implements
//! [`TypeInfoProvider`] over its own symbol service; tests implement it with
//! the fake in [`crate::test_support`]. Marker recognition is a closed
//! enumeration resolved once by the provider, so the core does no string
//! matching on type names.

/// Opaque handle to a type known to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef(pub u32);

/// The five built-in special constraints, in the fixed order they are
/// emitted when recomputed from a type parameter's declared flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialConstraint {
    ReferenceType,
    ValueType,
    Constructor,
    NonNull,
    Unmanaged,
}

impl SpecialConstraint {
    /// All five, in declared-flag emission order.
    pub const ALL: [SpecialConstraint; 5] = [
        SpecialConstraint::ReferenceType,
        SpecialConstraint::ValueType,
        SpecialConstraint::Constructor,
        SpecialConstraint::NonNull,
        SpecialConstraint::Unmanaged,
    ];

    /// The constraint keyword as it appears in generated output.
    pub fn keyword(&self) -> &'static str {
        match self {
            SpecialConstraint::ReferenceType => "class",
            SpecialConstraint::ValueType => "struct",
            SpecialConstraint::Constructor => "new()",
            SpecialConstraint::NonNull => "notnull",
            SpecialConstraint::Unmanaged => "unmanaged",
        }
    }
}

/// Classification of the reserved placeholder types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// "Introduce a fresh generic parameter here."
    GenericSlot,
    /// One of the five built-in constraint markers.
    Constraint(SpecialConstraint),
}

/// The declared constraints of one type parameter: five special flags plus
/// an ordered list of constraint-type references.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    pub reference_type: bool,
    pub value_type: bool,
    pub constructor: bool,
    pub non_null: bool,
    pub unmanaged: bool,
    pub types: Vec<ConstraintTypeRef>,
}

impl ConstraintSet {
    pub fn has_flag(&self, special: SpecialConstraint) -> bool {
        match special {
            SpecialConstraint::ReferenceType => self.reference_type,
            SpecialConstraint::ValueType => self.value_type,
            SpecialConstraint::Constructor => self.constructor,
            SpecialConstraint::NonNull => self.non_null,
            SpecialConstraint::Unmanaged => self.unmanaged,
        }
    }

    pub fn is_empty(&self) -> bool {
        !SpecialConstraint::ALL.iter().any(|s| self.has_flag(*s)) && self.types.is_empty()
    }
}

/// One entry of a parameter's declared constraint-type list.
#[derive(Debug, Clone)]
pub enum ConstraintTypeRef {
    /// A named constraint type, possibly generic over other parameters.
    Type(TypeRef),
    /// A bare reference to a sibling type parameter (e.g. `where TT : TK`).
    Param(String),
}

/// A declared type parameter of an unbound generic type.
#[derive(Debug, Clone)]
pub struct TypeParam {
    pub name: String,
    pub constraints: ConstraintSet,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: ConstraintSet::default(),
        }
    }

    pub fn constrained(name: impl Into<String>, constraints: ConstraintSet) -> Self {
        Self {
            name: name.into(),
            constraints,
        }
    }
}

/// One generic argument of a (constraint) type, as declared: either a
/// reference to an enclosing type parameter or a nested type.
#[derive(Debug, Clone)]
pub enum GenericArg {
    Type(TypeRef),
    Param(String),
}

/// Capability interface over the host's symbol/type-identity service.
///
/// The resolver composes display strings itself (base name applied to an
/// ordered argument list), so the provider only answers identity questions.
pub trait TypeInfoProvider {
    /// Recognize the reserved placeholder types. `None` for ordinary types.
    fn marker_kind(&self, ty: TypeRef) -> Option<MarkerKind>;

    /// Declared generic arity. Zero for non-generic types.
    fn arity(&self, ty: TypeRef) -> usize;

    /// Whether the reference is an unbound generic type (arity > 0 with no
    /// arguments applied). A closed instantiation returns `false`.
    fn is_unbound_generic(&self, ty: TypeRef) -> bool;

    /// Fully qualified display name, generic arguments included for closed
    /// instantiations (e.g. `System.Collections.Generic.List<string>`).
    fn display_name(&self, ty: TypeRef) -> String;

    /// Fully qualified name without any generic argument list — the string
    /// the resolver applies computed arguments to.
    fn base_name(&self, ty: TypeRef) -> String;

    /// Declared type parameters of an unbound generic type, in order.
    fn type_params(&self, ty: TypeRef) -> Vec<TypeParam>;

    /// The type's own generic arguments, for recursive substitution inside
    /// generic constraint types. Empty for non-generic types.
    fn generic_args(&self, ty: TypeRef) -> Vec<GenericArg>;
}
