//! Generic resolution: turn one case descriptor into a [`ResolvedVariant`].
//!
//! This is the heart of the synthesizer. For each case it decides which of
//! the payload type's generic parameters are pre-bound versus freshly
//! introduced, recomputes constraint lists for the fresh parameters, and
//! recursively substitutes bindings through nested generic constraint types.
//!
//! Resolution is a pure function of `(base name, descriptor)`: it reads no
//! shared state and can run independently per case.

use indexmap::IndexSet;
use thiserror::Error;

use crate::classify::{classify, PayloadClass};
use crate::provider::{
    ConstraintTypeRef, GenericArg, MarkerKind, SpecialConstraint, TypeInfoProvider, TypeRef,
};
use crate::schema::{CaseDescriptor, Location, PayloadSpec};

/// Hard bound on constraint-type substitution depth. Legitimate schemas are
/// finite and shallow; anything past this is rejected as malformed.
pub const MAX_SUBSTITUTION_DEPTH: usize = 32;

/// One right-hand-side entry of a resolved constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintTerm {
    /// One of the five built-in constraints.
    Special(SpecialConstraint),
    /// A fully resolved constraint-type string, substitution already done.
    Type(String),
    /// A reference to another fresh parameter of the same variant.
    Param(String),
}

impl ConstraintTerm {
    /// The term as it appears in generated output.
    pub fn as_str(&self) -> &str {
        match self {
            ConstraintTerm::Special(special) => special.keyword(),
            ConstraintTerm::Type(name) | ConstraintTerm::Param(name) => name,
        }
    }
}

/// The resolved constraint list of one fresh parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamConstraints {
    pub param: String,
    pub terms: Vec<ConstraintTerm>,
}

/// The fully computed generic signature for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariant {
    pub tag: String,
    /// Generated variant type name: tag + family base name.
    pub type_name: String,
    /// Fresh parameters introduced by this case, in declaration order.
    /// Tag-namespaced, so distinct cases never collide.
    pub fresh_params: Vec<String>,
    /// Constraints for fresh parameters that have any; declaration order.
    pub constraints: Vec<ParamConstraints>,
    /// Resolved payload type name, `None` for payload-free variants.
    pub payload_type_name: Option<String>,
}

/// Errors detected during schema validation and case resolution. Each one
/// aborts only its own schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("discriminator schema name `{name}` must end with the `Kind` suffix")]
    InvalidSchemaName { name: String, location: Location },

    #[error("discriminator schema `{name}` must declare at least one case")]
    EmptySchema { name: String, location: Location },

    #[error("case `{tag}` is missing its payload descriptor")]
    MissingPayloadSpec { tag: String, location: Location },

    #[error("case `{tag}`: a special-constraint marker cannot be a payload type")]
    SpecialMarkerPayload { tag: String, location: Location },

    #[error("case `{tag}`: generic payload type must have its arguments specified explicitly")]
    ExplicitArgsRequired { tag: String, location: Location },

    #[error("case `{tag}`: expected {expected} generic arguments but got {found}")]
    ArgCountMismatch {
        tag: String,
        expected: usize,
        found: usize,
        location: Location,
    },

    #[error("case `{tag}`: expected no generic arguments for the type `{type_name}`")]
    UnexpectedArgs {
        tag: String,
        type_name: String,
        location: Location,
    },

    #[error("case `{tag}`: generic constraint `{constraint}` is duplicated")]
    DuplicateConstraint {
        tag: String,
        constraint: String,
        location: Location,
    },

    #[error("case `{tag}`: special constraints must be positioned before other constraints")]
    SpecialConstraintPosition { tag: String, location: Location },

    #[error("case `{tag}`: constraint types nest deeper than the substitution limit")]
    NestingTooDeep { tag: String, location: Location },

    #[error("fresh generic parameter `{param}` collides with one from another case")]
    ParamCollision { param: String, location: Location },
}

impl ResolveError {
    /// The source location the diagnostic should point at.
    pub fn location(&self) -> Location {
        match self {
            ResolveError::InvalidSchemaName { location, .. }
            | ResolveError::EmptySchema { location, .. }
            | ResolveError::MissingPayloadSpec { location, .. }
            | ResolveError::SpecialMarkerPayload { location, .. }
            | ResolveError::ExplicitArgsRequired { location, .. }
            | ResolveError::ArgCountMismatch { location, .. }
            | ResolveError::UnexpectedArgs { location, .. }
            | ResolveError::DuplicateConstraint { location, .. }
            | ResolveError::SpecialConstraintPosition { location, .. }
            | ResolveError::NestingTooDeep { location, .. }
            | ResolveError::ParamCollision { location, .. } => *location,
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolve one case of a schema whose stripped base name is `base_name`.
pub fn resolve_case<P: TypeInfoProvider + ?Sized>(
    provider: &P,
    base_name: &str,
    case: &CaseDescriptor,
) -> ResolveResult<ResolvedVariant> {
    let payload = case.payload.as_ref().ok_or(ResolveError::MissingPayloadSpec {
        tag: case.tag.clone(),
        location: case.location,
    })?;

    let type_name = format!("{}{}", case.tag, base_name);

    let Some(ty) = payload.ty else {
        // Case A: no payload.
        return Ok(ResolvedVariant {
            tag: case.tag.clone(),
            type_name,
            fresh_params: Vec::new(),
            constraints: Vec::new(),
            payload_type_name: None,
        });
    };

    match classify(provider, ty) {
        PayloadClass::Special(_) => Err(ResolveError::SpecialMarkerPayload {
            tag: case.tag.clone(),
            location: case.location,
        }),
        PayloadClass::GenericSlot => resolve_slot(provider, case, type_name, payload),
        PayloadClass::Ordinary if provider.is_unbound_generic(ty) => {
            resolve_unbound(provider, case, type_name, ty, payload)
        }
        PayloadClass::Ordinary => resolve_closed(provider, case, type_name, ty, payload),
    }
}

/// Case B: the payload is the bare generic-slot marker. One fresh parameter
/// named from the tag; attached arguments become its constraint list.
fn resolve_slot<P: TypeInfoProvider + ?Sized>(
    provider: &P,
    case: &CaseDescriptor,
    type_name: String,
    payload: &PayloadSpec,
) -> ResolveResult<ResolvedVariant> {
    let fresh = format!("T{}", case.tag);

    // Omitted entries inside the list carry no constraint information here.
    let args: Vec<TypeRef> = payload
        .generic_args
        .iter()
        .flatten()
        .filter_map(|arg| *arg)
        .collect();

    let mut seen: IndexSet<String> = IndexSet::new();
    let mut terms: Vec<ConstraintTerm> = Vec::new();

    // Leading contiguous run of special markers.
    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx];
        let PayloadClass::Special(special) = classify(provider, arg) else {
            break;
        };
        if !seen.insert(provider.display_name(arg)) {
            return Err(duplicate(case, provider.display_name(arg)));
        }
        terms.push(ConstraintTerm::Special(special));
        idx += 1;
    }

    // Everything after the run must be an ordinary constraint type.
    for &arg in &args[idx..] {
        let display = provider.display_name(arg);
        if !seen.insert(display.clone()) {
            return Err(duplicate(case, display));
        }
        if matches!(classify(provider, arg), PayloadClass::Special(_)) {
            return Err(ResolveError::SpecialConstraintPosition {
                tag: case.tag.clone(),
                location: case.location,
            });
        }
        let resolved =
            substitute_slot(provider, arg, &fresh, 0).map_err(|_| too_deep(case))?;
        terms.push(ConstraintTerm::Type(resolved));
    }

    let constraints = if terms.is_empty() {
        Vec::new()
    } else {
        vec![ParamConstraints {
            param: fresh.clone(),
            terms,
        }]
    };

    Ok(ResolvedVariant {
        tag: case.tag.clone(),
        type_name,
        fresh_params: vec![fresh.clone()],
        constraints,
        payload_type_name: Some(fresh),
    })
}

/// How one declared parameter slot of an unbound generic type resolved.
#[derive(Debug, Clone)]
enum Binding {
    /// Caller left the slot open; a fresh parameter fills it.
    Fresh(String),
    /// Caller supplied a concrete type; its display string fills it.
    Bound(String),
}

impl Binding {
    fn as_str(&self) -> &str {
        match self {
            Binding::Fresh(name) | Binding::Bound(name) => name,
        }
    }
}

/// Case C: the payload is an unbound generic type with an explicit argument
/// list. Walk declared parameters pairwise with supplied arguments, then
/// recompute constraints for every slot left open.
fn resolve_unbound<P: TypeInfoProvider + ?Sized>(
    provider: &P,
    case: &CaseDescriptor,
    type_name: String,
    ty: TypeRef,
    payload: &PayloadSpec,
) -> ResolveResult<ResolvedVariant> {
    let Some(args) = payload.generic_args.as_ref() else {
        return Err(ResolveError::ExplicitArgsRequired {
            tag: case.tag.clone(),
            location: case.location,
        });
    };

    if provider.arity(ty) != args.len() {
        return Err(ResolveError::ArgCountMismatch {
            tag: case.tag.clone(),
            expected: provider.arity(ty),
            found: args.len(),
            location: case.location,
        });
    }
    let params = provider.type_params(ty);

    let bindings: Vec<(String, Binding)> = params
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let binding = match arg {
                Some(arg_ty)
                    if !matches!(provider.marker_kind(*arg_ty), Some(MarkerKind::GenericSlot)) =>
                {
                    Binding::Bound(provider.display_name(*arg_ty))
                }
                // Omitted slot or the generic-slot marker: introduce a
                // fresh parameter named from tag + original parameter name.
                _ => Binding::Fresh(format!("T{}{}", case.tag, param.name)),
            };
            (param.name.clone(), binding)
        })
        .collect();

    let mut fresh_params = Vec::new();
    let mut constraints = Vec::new();

    for (param, (_, binding)) in params.iter().zip(&bindings) {
        let Binding::Fresh(fresh_name) = binding else {
            continue;
        };
        fresh_params.push(fresh_name.clone());

        let mut terms = Vec::new();
        for special in SpecialConstraint::ALL {
            if param.constraints.has_flag(special) {
                terms.push(ConstraintTerm::Special(special));
            }
        }
        for constraint in &param.constraints.types {
            terms.push(resolve_constraint_type(provider, case, &bindings, constraint)?);
        }
        if !terms.is_empty() {
            constraints.push(ParamConstraints {
                param: fresh_name.clone(),
                terms,
            });
        }
    }

    let arg_strings: Vec<String> = bindings
        .iter()
        .map(|(_, binding)| binding.as_str().to_string())
        .collect();
    let payload_name = apply_args(provider.base_name(ty), &arg_strings);

    Ok(ResolvedVariant {
        tag: case.tag.clone(),
        type_name,
        fresh_params,
        constraints,
        payload_type_name: Some(payload_name),
    })
}

/// Case D: closed type. Takes no arguments; the name is used as declared.
fn resolve_closed<P: TypeInfoProvider + ?Sized>(
    provider: &P,
    case: &CaseDescriptor,
    type_name: String,
    ty: TypeRef,
    payload: &PayloadSpec,
) -> ResolveResult<ResolvedVariant> {
    if matches!(&payload.generic_args, Some(args) if !args.is_empty()) {
        return Err(ResolveError::UnexpectedArgs {
            tag: case.tag.clone(),
            type_name: provider.display_name(ty),
            location: case.location,
        });
    }
    Ok(ResolvedVariant {
        tag: case.tag.clone(),
        type_name,
        fresh_params: Vec::new(),
        constraints: Vec::new(),
        payload_type_name: Some(provider.display_name(ty)),
    })
}

/// Resolve one declared constraint-type entry against the binding table.
fn resolve_constraint_type<P: TypeInfoProvider + ?Sized>(
    provider: &P,
    case: &CaseDescriptor,
    bindings: &[(String, Binding)],
    constraint: &ConstraintTypeRef,
) -> ResolveResult<ConstraintTerm> {
    match constraint {
        // A bare reference to a sibling parameter resolves to that slot's
        // already-computed argument string, not structurally.
        ConstraintTypeRef::Param(name) => match lookup(bindings, name) {
            Some(Binding::Fresh(fresh)) => Ok(ConstraintTerm::Param(fresh.clone())),
            Some(Binding::Bound(bound)) => Ok(ConstraintTerm::Type(bound.clone())),
            None => Ok(ConstraintTerm::Param(name.clone())),
        },
        ConstraintTypeRef::Type(constraint_ty) => {
            let rendered = if provider.generic_args(*constraint_ty).is_empty() {
                provider.display_name(*constraint_ty)
            } else {
                substitute_bound(provider, *constraint_ty, bindings, 0)
                    .map_err(|_| too_deep(case))?
            };
            Ok(ConstraintTerm::Type(rendered))
        }
    }
}

struct DepthExceeded;

/// Case B substitution: re-express a constraint type with every nested
/// occurrence of the generic-slot marker replaced by the fresh name.
fn substitute_slot<P: TypeInfoProvider + ?Sized>(
    provider: &P,
    ty: TypeRef,
    fresh: &str,
    depth: usize,
) -> Result<String, DepthExceeded> {
    if depth > MAX_SUBSTITUTION_DEPTH {
        return Err(DepthExceeded);
    }
    if matches!(provider.marker_kind(ty), Some(MarkerKind::GenericSlot)) {
        return Ok(fresh.to_string());
    }
    let args = provider.generic_args(ty);
    if args.is_empty() {
        return Ok(provider.display_name(ty));
    }
    let rendered = args
        .iter()
        .map(|arg| match arg {
            GenericArg::Param(name) => Ok(name.clone()),
            GenericArg::Type(nested) => substitute_slot(provider, *nested, fresh, depth + 1),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(apply_args(provider.base_name(ty), &rendered))
}

/// Case C substitution: re-express a generic constraint type with its
/// parameter references replaced through the binding table, recursing
/// through arbitrarily nested generic constraint types.
fn substitute_bound<P: TypeInfoProvider + ?Sized>(
    provider: &P,
    ty: TypeRef,
    bindings: &[(String, Binding)],
    depth: usize,
) -> Result<String, DepthExceeded> {
    if depth > MAX_SUBSTITUTION_DEPTH {
        return Err(DepthExceeded);
    }
    let args = provider.generic_args(ty);
    if args.is_empty() {
        return Ok(provider.display_name(ty));
    }
    let rendered = args
        .iter()
        .map(|arg| match arg {
            GenericArg::Param(name) => Ok(match lookup(bindings, name) {
                Some(binding) => binding.as_str().to_string(),
                None => name.clone(),
            }),
            GenericArg::Type(nested) => {
                if provider.generic_args(*nested).is_empty() {
                    Ok(provider.display_name(*nested))
                } else {
                    substitute_bound(provider, *nested, bindings, depth + 1)
                }
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(apply_args(provider.base_name(ty), &rendered))
}

fn lookup<'a>(bindings: &'a [(String, Binding)], name: &str) -> Option<&'a Binding> {
    bindings
        .iter()
        .find(|(param, _)| param == name)
        .map(|(_, binding)| binding)
}

fn apply_args(base: String, args: &[String]) -> String {
    format!("{}<{}>", base, args.join(", "))
}

fn duplicate(case: &CaseDescriptor, constraint: String) -> ResolveError {
    ResolveError::DuplicateConstraint {
        tag: case.tag.clone(),
        constraint,
        location: case.location,
    }
}

fn too_deep(case: &CaseDescriptor) -> ResolveError {
    ResolveError::NestingTooDeep {
        tag: case.tag.clone(),
        location: case.location,
    }
}
