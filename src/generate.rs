//! Batch driver: validate each schema, resolve its cases, assemble its plan.
//!
//! Schemas in a batch are independent: the first error on one schema aborts
//! that schema only (no partial plan), and an unexpected panic during one
//! schema's generation is caught and reported as a generic diagnostic
//! instead of taking the whole batch down.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::diag::Diagnostic;
use crate::plan::{assemble, GenerationPlan};
use crate::provider::TypeInfoProvider;
use crate::resolve::{resolve_case, ResolveError, ResolveResult, ResolvedVariant};
use crate::schema::{SchemaDescriptor, KIND_SUFFIX};

/// The outcome of a batch: plans for well-formed schemas, diagnostics for
/// the rest. A schema contributes to exactly one of the two lists.
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub plans: Vec<GenerationPlan>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Generate the plan for one schema.
pub fn generate_schema<P: TypeInfoProvider + ?Sized>(
    provider: &P,
    schema: &SchemaDescriptor,
) -> ResolveResult<GenerationPlan> {
    let Some(base_name) = schema.name.strip_suffix(KIND_SUFFIX) else {
        return Err(ResolveError::InvalidSchemaName {
            name: schema.name.clone(),
            location: schema.location,
        });
    };

    if schema.cases.is_empty() {
        return Err(ResolveError::EmptySchema {
            name: schema.name.clone(),
            location: schema.location,
        });
    }

    // Cases resolve independently; nothing here depends on a sibling case.
    let variants: Vec<ResolvedVariant> = schema
        .cases
        .iter()
        .map(|case| resolve_case(provider, base_name, case))
        .collect::<ResolveResult<_>>()?;

    assemble(schema, base_name, variants)
}

/// Generate plans for a whole batch of schemas, isolating failures.
pub fn generate_batch<P: TypeInfoProvider + ?Sized>(
    provider: &P,
    schemas: &[SchemaDescriptor],
) -> BatchOutput {
    let mut output = BatchOutput::default();

    for schema in schemas {
        let result = catch_unwind(AssertUnwindSafe(|| generate_schema(provider, schema)));
        match result {
            Ok(Ok(plan)) => output.plans.push(plan),
            Ok(Err(error)) => output.diagnostics.push(Diagnostic::from(&error)),
            Err(payload) => {
                output.diagnostics.push(Diagnostic::generation_failed(
                    panic_description(payload.as_ref()),
                    schema.location,
                ));
            }
        }
    }

    output
}

fn panic_description(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}
