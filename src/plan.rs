//! Plan assembly: merge all resolved variants of one schema into the final
//! generation plan handed to the emitter.
//!
//! The interface and every variant share one uniform parameter/constraint
//! signature, so a variant that never mentions some parameter still declares
//! it. This keeps every variant structurally assignable to the one common
//! interface instantiation.

use indexmap::IndexSet;

use crate::resolve::{ParamConstraints, ResolveError, ResolveResult, ResolvedVariant};
use crate::schema::{lower_first, Location, SchemaDescriptor};

/// The complete, ordered specification for one schema. The emitter renders
/// this as-is; it must not reorder any list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    /// Schema name with the `Kind` suffix stripped.
    pub base_name: String,
    pub namespace_path: Vec<String>,
    /// Fully qualified discriminator name.
    pub discriminator: String,
    /// All fresh parameters across all cases, in case-declaration order.
    pub shared_generic_params: Vec<String>,
    /// Their constraints, same order.
    pub shared_constraints: Vec<ParamConstraints>,
    pub interface: InterfaceSpec,
    pub variants: Vec<VariantSpec>,
    pub factories: Vec<FactorySpec>,
    pub extractors: Vec<ExtractorSpec>,
    pub sync_dispatch: DispatchSpec,
    pub async_dispatch: DispatchSpec,
}

/// The shared capability interface: one discriminator-typed accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSpec {
    pub name: String,
    pub accessor_name: String,
}

/// One generated variant type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    pub tag: String,
    pub type_name: String,
    pub payload_type_name: Option<String>,
}

/// Construction operation for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorySpec {
    pub tag: String,
    pub name: String,
    pub variant_type_name: String,
    /// `None` for payload-free cases: the factory takes no value.
    pub payload_type_name: Option<String>,
}

/// Extraction operation; present only for payload-carrying cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorSpec {
    pub tag: String,
    pub name: String,
    pub variant_type_name: String,
    pub payload_type_name: String,
    /// Parameter name for the variant value, first character lowered.
    pub value_param: String,
}

/// A total dispatch operation: exactly one handler per case, declaration
/// order, no default branch. An unmatched discriminator at dispatch time is
/// an internal-consistency failure, not a normal error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSpec {
    pub name: String,
    /// Whether handlers return a deferred value.
    pub deferred: bool,
    pub handlers: Vec<HandlerSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSpec {
    pub tag: String,
    pub handler_name: String,
    /// Handler input; `None` for payload-free cases.
    pub payload_type_name: Option<String>,
}

/// Merge resolved variants into one plan.
///
/// Fresh-parameter names are tag-namespaced upstream, which makes cross-case
/// collisions impossible for distinct tags; the explicit uniqueness check
/// here fails fast instead of silently overwriting if that assumption is
/// ever violated (duplicate tags being the one known way to do it).
pub fn assemble(
    schema: &SchemaDescriptor,
    base_name: &str,
    variants: Vec<ResolvedVariant>,
) -> ResolveResult<GenerationPlan> {
    let shared_generic_params = collect_params(&variants, schema.location)?;
    let shared_constraints: Vec<ParamConstraints> = variants
        .iter()
        .flat_map(|variant| variant.constraints.iter().cloned())
        .collect();

    let interface = InterfaceSpec {
        name: format!("I{}", base_name),
        accessor_name: "Kind".to_string(),
    };

    let variant_specs: Vec<VariantSpec> = variants
        .iter()
        .map(|variant| VariantSpec {
            tag: variant.tag.clone(),
            type_name: variant.type_name.clone(),
            payload_type_name: variant.payload_type_name.clone(),
        })
        .collect();

    let factories: Vec<FactorySpec> = variants
        .iter()
        .map(|variant| FactorySpec {
            tag: variant.tag.clone(),
            name: format!("Get{}", variant.type_name),
            variant_type_name: variant.type_name.clone(),
            payload_type_name: variant.payload_type_name.clone(),
        })
        .collect();

    let extractors: Vec<ExtractorSpec> = variants
        .iter()
        .filter_map(|variant| {
            let payload = variant.payload_type_name.clone()?;
            Some(ExtractorSpec {
                tag: variant.tag.clone(),
                name: "GetValue".to_string(),
                variant_type_name: variant.type_name.clone(),
                payload_type_name: payload,
                value_param: lower_first(&variant.type_name),
            })
        })
        .collect();

    let handlers: Vec<HandlerSpec> = variants
        .iter()
        .map(|variant| HandlerSpec {
            tag: variant.tag.clone(),
            handler_name: format!("func{}", variant.tag),
            payload_type_name: variant.payload_type_name.clone(),
        })
        .collect();

    Ok(GenerationPlan {
        base_name: base_name.to_string(),
        namespace_path: schema.namespace_path.clone(),
        discriminator: schema.qualified_name(),
        shared_generic_params,
        shared_constraints,
        interface,
        variants: variant_specs,
        factories,
        extractors,
        sync_dispatch: DispatchSpec {
            name: "Match".to_string(),
            deferred: false,
            handlers: handlers.clone(),
        },
        async_dispatch: DispatchSpec {
            name: "MatchAsync".to_string(),
            deferred: true,
            handlers,
        },
    })
}

fn collect_params(
    variants: &[ResolvedVariant],
    location: Location,
) -> ResolveResult<Vec<String>> {
    let mut params: IndexSet<String> = IndexSet::new();
    for variant in variants {
        for fresh in &variant.fresh_params {
            if !params.insert(fresh.clone()) {
                return Err(ResolveError::ParamCollision {
                    param: fresh.clone(),
                    location,
                });
            }
        }
    }
    Ok(params.into_iter().collect())
}
