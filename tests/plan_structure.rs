//! Plan structure tests
//!
//! The assembled plan must share one uniform parameter/constraint signature
//! across the interface and every variant, generate the right operation set
//! per case, and keep both dispatch specs exhaustive with no default branch.

use unionforge::provider::SpecialConstraint;
use unionforge::test_support::{plan_for, TypeWorld};
use unionforge::{CaseDescriptor, GenerationPlan, PayloadSpec, SchemaDescriptor};

// ============================================================================
// Helpers
// ============================================================================

/// The OperationResultKind example: a payload-free case, a bare-slot case,
/// and a constrained-slot case.
fn operation_result(world: &mut TypeWorld) -> SchemaDescriptor {
    let enumerable = world.closed("IEnumerable", "IEnumerable<string>");
    SchemaDescriptor::new(
        "OperationResultKind",
        vec![
            CaseDescriptor::new("Success", PayloadSpec::of(world.generic_slot())),
            CaseDescriptor::new(
                "Error",
                PayloadSpec::with_args(
                    world.generic_slot(),
                    vec![
                        Some(world.special(SpecialConstraint::ReferenceType)),
                        Some(enumerable),
                    ],
                ),
            ),
            CaseDescriptor::new("Nothing", PayloadSpec::none()),
        ],
    )
}

fn plan(world: &mut TypeWorld) -> GenerationPlan {
    let schema = operation_result(world);
    plan_for(world, &schema).unwrap()
}

// ============================================================================
// Shared signature
// ============================================================================

mod shared_signature {
    use super::*;

    #[test]
    fn base_name_strips_the_kind_suffix() {
        let mut world = TypeWorld::new();
        let plan = plan(&mut world);
        assert_eq!(plan.base_name, "OperationResult");
        assert_eq!(plan.interface.name, "IOperationResult");
        assert_eq!(plan.interface.accessor_name, "Kind");
    }

    #[test]
    fn fresh_parameters_aggregate_in_case_order() {
        let mut world = TypeWorld::new();
        let plan = plan(&mut world);
        assert_eq!(
            plan.shared_generic_params,
            vec!["TSuccess".to_string(), "TError".to_string()]
        );
    }

    #[test]
    fn only_constrained_parameters_contribute_constraint_groups() {
        let mut world = TypeWorld::new();
        let plan = plan(&mut world);
        assert_eq!(plan.shared_constraints.len(), 1);
        assert_eq!(plan.shared_constraints[0].param, "TError");
        assert_eq!(plan.shared_constraints[0].terms.len(), 2);
    }

    #[test]
    fn discriminator_is_the_qualified_schema_name() {
        let mut world = TypeWorld::new();
        let schema = operation_result(&mut world).with_namespace(&["Some", "Module"]);
        let plan = plan_for(&world, &schema).unwrap();
        assert_eq!(plan.discriminator, "Some.Module.OperationResultKind");
        assert_eq!(plan.namespace_path, vec!["Some".to_string(), "Module".to_string()]);
    }
}

// ============================================================================
// Variants and per-case operations
// ============================================================================

mod variants {
    use super::*;

    #[test]
    fn one_variant_per_case_with_traceable_tags() {
        let mut world = TypeWorld::new();
        let plan = plan(&mut world);
        assert_eq!(plan.variants.len(), 3);
        let tags: Vec<&str> = plan.variants.iter().map(|v| v.tag.as_str()).collect();
        assert_eq!(tags, vec!["Success", "Error", "Nothing"]);
    }

    #[test]
    fn variant_type_names_are_tag_plus_base() {
        let mut world = TypeWorld::new();
        let plan = plan(&mut world);
        assert_eq!(plan.variants[0].type_name, "SuccessOperationResult");
        assert_eq!(plan.variants[2].type_name, "NothingOperationResult");
    }

    #[test]
    fn every_case_gets_a_factory() {
        let mut world = TypeWorld::new();
        let plan = plan(&mut world);
        assert_eq!(plan.factories.len(), 3);
        assert_eq!(plan.factories[0].name, "GetSuccessOperationResult");
        // The payload-free factory takes no value.
        assert_eq!(plan.factories[2].payload_type_name, None);
    }

    #[test]
    fn extractors_exist_only_for_payload_cases() {
        let mut world = TypeWorld::new();
        let plan = plan(&mut world);
        assert_eq!(plan.extractors.len(), 2);
        let tags: Vec<&str> = plan.extractors.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["Success", "Error"]);
        assert_eq!(plan.extractors[0].value_param, "successOperationResult");
    }
}

// ============================================================================
// Dispatch exhaustiveness
// ============================================================================

mod dispatch {
    use super::*;

    #[test]
    fn both_dispatches_require_one_handler_per_case_in_order() {
        let mut world = TypeWorld::new();
        let plan = plan(&mut world);
        for dispatch in [&plan.sync_dispatch, &plan.async_dispatch] {
            assert_eq!(dispatch.handlers.len(), plan.variants.len());
            for (handler, variant) in dispatch.handlers.iter().zip(&plan.variants) {
                assert_eq!(handler.tag, variant.tag);
                assert_eq!(handler.payload_type_name, variant.payload_type_name);
            }
        }
    }

    #[test]
    fn dispatch_names_and_deferral() {
        let mut world = TypeWorld::new();
        let plan = plan(&mut world);
        assert_eq!(plan.sync_dispatch.name, "Match");
        assert!(!plan.sync_dispatch.deferred);
        assert_eq!(plan.async_dispatch.name, "MatchAsync");
        assert!(plan.async_dispatch.deferred);
    }

    #[test]
    fn handler_names_derive_from_tags() {
        let mut world = TypeWorld::new();
        let plan = plan(&mut world);
        let names: Vec<&str> = plan
            .sync_dispatch
            .handlers
            .iter()
            .map(|h| h.handler_name.as_str())
            .collect();
        assert_eq!(names, vec!["funcSuccess", "funcError", "funcNothing"]);
    }
}
