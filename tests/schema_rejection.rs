//! Schema rejection tests
//!
//! Every malformed schema must be rejected with the right error kind, and a
//! bad schema must never poison its siblings in the same batch.

use unionforge::provider::{GenericArg, SpecialConstraint, TypeParam};
use unionforge::test_support::{plan_for, resolve, TypeWorld};
use unionforge::{
    generate_batch, CaseDescriptor, DiagCode, Location, PayloadSpec, ResolveError,
    SchemaDescriptor,
};

// ============================================================================
// Schema-level validation
// ============================================================================

mod schema_shape {
    use super::*;

    #[test]
    fn name_without_kind_suffix_is_rejected() {
        let world = TypeWorld::new();
        let schema = SchemaDescriptor::new(
            "Contact",
            vec![CaseDescriptor::new("Nothing", PayloadSpec::none())],
        );
        assert!(matches!(
            plan_for(&world, &schema),
            Err(ResolveError::InvalidSchemaName { name, .. }) if name == "Contact"
        ));
    }

    #[test]
    fn empty_schema_is_rejected() {
        let world = TypeWorld::new();
        let schema = SchemaDescriptor::new("ContactKind", vec![]);
        assert!(matches!(
            plan_for(&world, &schema),
            Err(ResolveError::EmptySchema { .. })
        ));
    }

    #[test]
    fn unannotated_case_is_rejected() {
        let world = TypeWorld::new();
        let schema = SchemaDescriptor::new("ContactKind", vec![CaseDescriptor::unannotated("Email")]);
        assert!(matches!(
            plan_for(&world, &schema),
            Err(ResolveError::MissingPayloadSpec { tag, .. }) if tag == "Email"
        ));
    }

    #[test]
    fn duplicate_tags_collide_on_fresh_parameter_names() {
        let world = TypeWorld::new();
        let schema = SchemaDescriptor::new(
            "ResultKind",
            vec![
                CaseDescriptor::new("Ok", PayloadSpec::of(world.generic_slot())),
                CaseDescriptor::new("Ok", PayloadSpec::of(world.generic_slot())),
            ],
        );
        assert!(matches!(
            plan_for(&world, &schema),
            Err(ResolveError::ParamCollision { param, .. }) if param == "TOk"
        ));
    }
}

// ============================================================================
// Payload argument validation
// ============================================================================

mod payload_arguments {
    use super::*;

    #[test]
    fn special_marker_as_payload_type_is_rejected() {
        let world = TypeWorld::new();
        let case = CaseDescriptor::new(
            "Weird",
            PayloadSpec::of(world.special(SpecialConstraint::ReferenceType)),
        );
        assert!(matches!(
            resolve(&world, "Result", &case),
            Err(ResolveError::SpecialMarkerPayload { tag, .. }) if tag == "Weird"
        ));
    }

    #[test]
    fn unbound_generic_without_explicit_arguments_is_rejected() {
        let mut world = TypeWorld::new();
        let list = world.unbound("List", vec![TypeParam::new("T")]);
        let case = CaseDescriptor::new("Items", PayloadSpec::of(list));
        assert!(matches!(
            resolve(&world, "Result", &case),
            Err(ResolveError::ExplicitArgsRequired { .. })
        ));
    }

    #[test]
    fn argument_count_must_match_arity() {
        let mut world = TypeWorld::new();
        let pair = world.unbound("Pair", vec![TypeParam::new("A"), TypeParam::new("B")]);
        let string_ty = world.concrete("string");
        let case = CaseDescriptor::new("Both", PayloadSpec::with_args(pair, vec![Some(string_ty)]));
        assert!(matches!(
            resolve(&world, "Result", &case),
            Err(ResolveError::ArgCountMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn arguments_for_a_closed_type_are_rejected() {
        let mut world = TypeWorld::new();
        let email = world.concrete("Email");
        let string_ty = world.concrete("string");
        let case = CaseDescriptor::new(
            "Email",
            PayloadSpec::with_args(email, vec![Some(string_ty)]),
        );
        assert!(matches!(
            resolve(&world, "Contact", &case),
            Err(ResolveError::UnexpectedArgs { type_name, .. }) if type_name == "Email"
        ));
    }
}

// ============================================================================
// Constraint list validation
// ============================================================================

mod constraint_lists {
    use super::*;

    #[test]
    fn duplicate_special_marker_in_the_leading_run_is_rejected() {
        let world = TypeWorld::new();
        let case = CaseDescriptor::new(
            "Dup",
            PayloadSpec::with_args(
                world.generic_slot(),
                vec![
                    Some(world.special(SpecialConstraint::ReferenceType)),
                    Some(world.special(SpecialConstraint::ReferenceType)),
                ],
            ),
        );
        assert!(matches!(
            resolve(&world, "Result", &case),
            Err(ResolveError::DuplicateConstraint { .. })
        ));
    }

    #[test]
    fn repeated_special_marker_reports_duplicate_regardless_of_position() {
        // Duplicate detection fires before the position check: a marker
        // repeated after the run still reports the duplicate error.
        let mut world = TypeWorld::new();
        let alpha = world.concrete("IAlpha");
        let case = CaseDescriptor::new(
            "Dup",
            PayloadSpec::with_args(
                world.generic_slot(),
                vec![
                    Some(world.special(SpecialConstraint::NonNull)),
                    Some(alpha),
                    Some(world.special(SpecialConstraint::NonNull)),
                ],
            ),
        );
        assert!(matches!(
            resolve(&world, "Result", &case),
            Err(ResolveError::DuplicateConstraint { .. })
        ));
    }

    #[test]
    fn duplicate_ordinary_constraint_type_is_rejected() {
        let mut world = TypeWorld::new();
        let alpha = world.concrete("IAlpha");
        let case = CaseDescriptor::new(
            "Dup",
            PayloadSpec::with_args(world.generic_slot(), vec![Some(alpha), Some(alpha)]),
        );
        assert!(matches!(
            resolve(&world, "Result", &case),
            Err(ResolveError::DuplicateConstraint { constraint, .. }) if constraint == "IAlpha"
        ));
    }

    #[test]
    fn special_marker_after_an_ordinary_constraint_is_rejected() {
        let mut world = TypeWorld::new();
        let alpha = world.concrete("IAlpha");
        let case = CaseDescriptor::new(
            "Late",
            PayloadSpec::with_args(
                world.generic_slot(),
                vec![
                    Some(alpha),
                    Some(world.special(SpecialConstraint::ValueType)),
                ],
            ),
        );
        assert!(matches!(
            resolve(&world, "Result", &case),
            Err(ResolveError::SpecialConstraintPosition { .. })
        ));
    }

    #[test]
    fn special_markers_mixed_into_the_tail_are_rejected_wherever_they_sit() {
        let mut world = TypeWorld::new();
        let alpha = world.concrete("IAlpha");
        let beta = world.concrete("IBeta");
        let case = CaseDescriptor::new(
            "Late",
            PayloadSpec::with_args(
                world.generic_slot(),
                vec![
                    Some(world.special(SpecialConstraint::ReferenceType)),
                    Some(alpha),
                    Some(world.special(SpecialConstraint::Constructor)),
                    Some(beta),
                ],
            ),
        );
        assert!(matches!(
            resolve(&world, "Result", &case),
            Err(ResolveError::SpecialConstraintPosition { .. })
        ));
    }

    #[test]
    fn constraint_nesting_past_the_depth_limit_is_rejected() {
        let mut world = TypeWorld::new();
        let mut ty = world.concrete("Leaf");
        for _ in 0..40 {
            ty = world.generic("Wrap", vec![GenericArg::Type(ty)]);
        }
        let case = CaseDescriptor::new(
            "Deep",
            PayloadSpec::with_args(world.generic_slot(), vec![Some(ty)]),
        );
        assert!(matches!(
            resolve(&world, "Result", &case),
            Err(ResolveError::NestingTooDeep { .. })
        ));
    }
}

// ============================================================================
// Batch isolation
// ============================================================================

mod batch {
    use super::*;

    #[test]
    fn a_failing_schema_does_not_block_its_siblings() {
        let mut world = TypeWorld::new();
        let email = world.concrete("Email");

        let bad = SchemaDescriptor::new("Broken", vec![]).at(Location::new(10, 1));
        let good = SchemaDescriptor::new(
            "ContactKind",
            vec![CaseDescriptor::new("Email", PayloadSpec::of(email))],
        );

        let output = generate_batch(&world, &[bad, good]);
        assert_eq!(output.plans.len(), 1);
        assert_eq!(output.plans[0].base_name, "Contact");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code, DiagCode::InvalidSchemaName);
        assert_eq!(output.diagnostics[0].location, Location::new(10, 1));
    }

    #[test]
    fn no_partial_plan_is_emitted_for_a_failing_schema() {
        let mut world = TypeWorld::new();
        let email = world.concrete("Email");
        let schema = SchemaDescriptor::new(
            "ContactKind",
            vec![
                CaseDescriptor::new("Email", PayloadSpec::of(email)),
                CaseDescriptor::unannotated("Phone"),
            ],
        );
        let output = generate_batch(&world, &[schema]);
        assert!(output.plans.is_empty());
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code, DiagCode::MissingPayloadSpec);
    }

    #[test]
    fn a_panicking_resolution_is_reported_not_propagated() {
        // A dangling handle makes the fake provider panic; the driver must
        // catch it and report the generic failure diagnostic instead.
        let mut world = TypeWorld::new();
        let email = world.concrete("Email");
        let dangling = unionforge::TypeRef(9999);

        let faulty = SchemaDescriptor::new(
            "BoomKind",
            vec![CaseDescriptor::new("Boom", PayloadSpec::of(dangling))],
        );
        let fine = SchemaDescriptor::new(
            "ContactKind",
            vec![CaseDescriptor::new("Email", PayloadSpec::of(email))],
        );

        let previous_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));
        let output = generate_batch(&world, &[faulty, fine]);
        std::panic::set_hook(previous_hook);

        assert_eq!(output.plans.len(), 1);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code, DiagCode::GenerationFailed);
    }

    #[test]
    fn diagnostics_carry_the_offending_case_location() {
        let world = TypeWorld::new();
        let schema = SchemaDescriptor::new(
            "ResultKind",
            vec![CaseDescriptor::unannotated("Oops").at(Location::new(7, 3))],
        );
        let output = generate_batch(&world, &[schema]);
        let diag = &output.diagnostics[0];
        assert_eq!(diag.location, Location::new(7, 3));
        assert_eq!(diag.code.as_str(), "UF004");
        assert!(diag.message.contains("Oops"));
    }
}
