//! Unionforge - compile-time synthesis of tagged-union type families
//!
//! Consumes per-schema case descriptors (tag plus an optional,
//! possibly-generic payload-type descriptor) and produces a structured
//! generation plan: a capability interface, one variant type per case,
//! factories and extractors, and exhaustive sync/async dispatch specs. The
//! core of the work is resolving which generic parameters are pre-bound
//! versus freshly introduced, and recomputing their constraint lists.

pub mod classify;
pub mod diag;
pub mod emit;
pub mod generate;
pub mod plan;
pub mod provider;
pub mod resolve;
pub mod schema;
pub mod test_support;

pub use classify::{classify, PayloadClass};
pub use diag::{DiagCode, Diagnostic};
pub use emit::{render, EmitOptions};
pub use generate::{generate_batch, generate_schema, BatchOutput};
pub use plan::{DispatchSpec, GenerationPlan, InterfaceSpec, VariantSpec};
pub use provider::{
    ConstraintSet, ConstraintTypeRef, GenericArg, MarkerKind, SpecialConstraint, TypeInfoProvider,
    TypeParam, TypeRef,
};
pub use resolve::{
    resolve_case, ConstraintTerm, ParamConstraints, ResolveError, ResolvedVariant,
};
pub use schema::{CaseDescriptor, Location, PayloadSpec, SchemaDescriptor, KIND_SUFFIX};
