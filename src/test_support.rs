//! Test support infrastructure: a fake [`TypeInfoProvider`] and shorthand
//! helpers for building descriptor worlds in tests.
//!
//! The resolver only ever asks identity questions through the provider
//! trait, so tests register a small universe of types up front and drive the
//! whole pipeline against it without any compiler backend.

use crate::plan::GenerationPlan;
use crate::provider::{
    ConstraintSet, GenericArg, MarkerKind, SpecialConstraint, TypeInfoProvider, TypeParam, TypeRef,
};
use crate::resolve::{resolve_case, ResolveResult, ResolvedVariant};
use crate::schema::{CaseDescriptor, SchemaDescriptor};

/// A registry of fake types acting as the symbol service.
///
/// The six reserved markers are pre-registered with the placeholder names
/// the host convention uses; everything else is added by the test.
pub struct TypeWorld {
    types: Vec<TypeData>,
}

struct TypeData {
    marker: Option<MarkerKind>,
    base: String,
    display: String,
    arity: usize,
    unbound: bool,
    params: Vec<TypeParam>,
    args: Vec<GenericArg>,
}

impl TypeData {
    fn plain(name: &str) -> Self {
        Self {
            marker: None,
            base: name.to_string(),
            display: name.to_string(),
            arity: 0,
            unbound: false,
            params: Vec::new(),
            args: Vec::new(),
        }
    }
}

impl TypeWorld {
    pub fn new() -> Self {
        let markers = [
            (MarkerKind::GenericSlot, "GenericPlaceholder"),
            (
                MarkerKind::Constraint(SpecialConstraint::ReferenceType),
                "ClassConstraintPlaceholder",
            ),
            (
                MarkerKind::Constraint(SpecialConstraint::ValueType),
                "StructConstraintPlaceholder",
            ),
            (
                MarkerKind::Constraint(SpecialConstraint::Constructor),
                "ConstructorConstraintPlaceholder",
            ),
            (
                MarkerKind::Constraint(SpecialConstraint::NonNull),
                "NotNullConstraintPlaceholder",
            ),
            (
                MarkerKind::Constraint(SpecialConstraint::Unmanaged),
                "UnmanagedConstraintPlaceholder",
            ),
        ];
        let types = markers
            .into_iter()
            .map(|(kind, name)| TypeData {
                marker: Some(kind),
                ..TypeData::plain(name)
            })
            .collect();
        Self { types }
    }

    /// The generic-slot marker: "introduce a fresh parameter here".
    pub fn generic_slot(&self) -> TypeRef {
        TypeRef(0)
    }

    /// One of the five special-constraint markers.
    pub fn special(&self, special: SpecialConstraint) -> TypeRef {
        let idx = SpecialConstraint::ALL
            .iter()
            .position(|s| *s == special)
            .unwrap();
        TypeRef(1 + idx as u32)
    }

    /// Register a closed, non-generic type.
    pub fn concrete(&mut self, name: &str) -> TypeRef {
        self.push(TypeData::plain(name))
    }

    /// Register a closed generic instantiation, e.g.
    /// `closed("List", "List<string>")`. Takes no further arguments.
    pub fn closed(&mut self, base: &str, display: &str) -> TypeRef {
        self.push(TypeData {
            display: display.to_string(),
            ..TypeData::plain(base)
        })
    }

    /// Register an unbound generic type with its declared parameters.
    pub fn unbound(&mut self, base: &str, params: Vec<TypeParam>) -> TypeRef {
        let display = format!(
            "{}<{}>",
            base,
            params
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.push(TypeData {
            marker: None,
            base: base.to_string(),
            display,
            arity: params.len(),
            unbound: true,
            params,
            args: Vec::new(),
        })
    }

    /// Register a generic constraint type with its own argument list, for
    /// substitution tests, e.g. `generic("IList", vec![GenericArg::Type(slot)])`.
    pub fn generic(&mut self, base: &str, args: Vec<GenericArg>) -> TypeRef {
        let display = format!(
            "{}<{}>",
            base,
            args.iter()
                .map(|arg| match arg {
                    GenericArg::Param(name) => name.clone(),
                    GenericArg::Type(ty) => self.display_name(*ty),
                })
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.push(TypeData {
            marker: None,
            base: base.to_string(),
            display,
            arity: args.len(),
            unbound: false,
            params: Vec::new(),
            args,
        })
    }

    fn push(&mut self, data: TypeData) -> TypeRef {
        self.types.push(data);
        TypeRef((self.types.len() - 1) as u32)
    }

    fn data(&self, ty: TypeRef) -> &TypeData {
        &self.types[ty.0 as usize]
    }
}

impl Default for TypeWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInfoProvider for TypeWorld {
    fn marker_kind(&self, ty: TypeRef) -> Option<MarkerKind> {
        self.data(ty).marker
    }

    fn arity(&self, ty: TypeRef) -> usize {
        self.data(ty).arity
    }

    fn is_unbound_generic(&self, ty: TypeRef) -> bool {
        self.data(ty).unbound
    }

    fn display_name(&self, ty: TypeRef) -> String {
        self.data(ty).display.clone()
    }

    fn base_name(&self, ty: TypeRef) -> String {
        self.data(ty).base.clone()
    }

    fn type_params(&self, ty: TypeRef) -> Vec<TypeParam> {
        self.data(ty).params.clone()
    }

    fn generic_args(&self, ty: TypeRef) -> Vec<GenericArg> {
        self.data(ty).args.clone()
    }
}

/// Build a `ConstraintSet` carrying only constraint types, no flags.
pub fn types_only(types: Vec<crate::provider::ConstraintTypeRef>) -> ConstraintSet {
    ConstraintSet {
        types,
        ..ConstraintSet::default()
    }
}

/// Resolve one case against the world.
pub fn resolve(
    world: &TypeWorld,
    base_name: &str,
    case: &CaseDescriptor,
) -> ResolveResult<ResolvedVariant> {
    resolve_case(world, base_name, case)
}

/// Run the full per-schema pipeline against the world.
pub fn plan_for(world: &TypeWorld, schema: &SchemaDescriptor) -> ResolveResult<GenerationPlan> {
    crate::generate::generate_schema(world, schema)
}
