//! Reference emitter: render a [`GenerationPlan`] to host source text.
//!
//! Pure string rendering. Ordering of every plan list is semantically
//! meaningful and is preserved exactly; the emitter makes no decisions.

use crate::plan::{DispatchSpec, GenerationPlan};
use crate::resolve::ParamConstraints;
use crate::schema::lower_first;

/// Rendering options supplied by the host.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Namespace the generated family lives under; the schema's own
    /// namespace path is appended to it.
    pub base_namespace: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            base_namespace: "Unionforge.Generated".to_string(),
        }
    }
}

/// Render one plan as a complete generated unit.
pub fn render(plan: &GenerationPlan, options: &EmitOptions) -> String {
    let generics = generics_str(&plan.shared_generic_params);
    let constraints = constraints_str(&plan.shared_constraints);
    let mut out = String::new();

    out.push_str(&format!("namespace {};\n", namespace_str(plan, options)));

    render_interface(&mut out, plan, &generics, &constraints);
    for variant in &plan.variants {
        render_variant(&mut out, plan, variant, &generics, &constraints);
    }
    render_companion(&mut out, plan, &generics, &constraints);

    out
}

fn namespace_str(plan: &GenerationPlan, options: &EmitOptions) -> String {
    if plan.namespace_path.is_empty() {
        options.base_namespace.clone()
    } else {
        format!("{}.{}", options.base_namespace, plan.namespace_path.join("."))
    }
}

/// `<T1, T2>`, or empty when the plan introduces no parameters.
fn generics_str(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}

/// ` where T : class, IFoo where U : struct`, or empty.
fn constraints_str(constraints: &[ParamConstraints]) -> String {
    if constraints.is_empty() {
        return String::new();
    }
    let clauses: Vec<String> = constraints
        .iter()
        .map(|group| {
            let terms: Vec<&str> = group.terms.iter().map(|term| term.as_str()).collect();
            format!("where {} : {}", group.param, terms.join(", "))
        })
        .collect();
    format!(" {}", clauses.join(" "))
}

fn render_interface(out: &mut String, plan: &GenerationPlan, generics: &str, constraints: &str) {
    out.push_str(&format!(
        "\npublic interface {}{}{}\n{{\n    {} {} {{ get; }}\n}}\n",
        plan.interface.name, generics, constraints, plan.discriminator, plan.interface.accessor_name
    ));
}

fn render_variant(
    out: &mut String,
    plan: &GenerationPlan,
    variant: &crate::plan::VariantSpec,
    generics: &str,
    constraints: &str,
) {
    let ctor = match &variant.payload_type_name {
        Some(payload) => format!("({} Value)", payload),
        None => "()".to_string(),
    };
    out.push_str(&format!(
        "\npublic record {}{}{} : {}{}{}\n{{\n    public {} {} => {}.{};\n}}\n",
        variant.type_name,
        generics,
        ctor,
        plan.interface.name,
        generics,
        constraints,
        plan.discriminator,
        plan.interface.accessor_name,
        plan.discriminator,
        variant.tag
    ));
}

fn render_companion(out: &mut String, plan: &GenerationPlan, generics: &str, constraints: &str) {
    out.push_str(&format!("\npublic static class {}\n{{\n", plan.base_name));

    for factory in &plan.factories {
        let (params, body) = match &factory.payload_type_name {
            Some(payload) => (format!("{} value", payload), "new(value)"),
            None => (String::new(), "new()"),
        };
        out.push_str(&format!(
            "    public static {}{} {}{}({}){} =>\n        {};\n\n",
            factory.variant_type_name, generics, factory.name, generics, params, constraints, body
        ));
    }

    for extractor in &plan.extractors {
        out.push_str(&format!(
            "    public static {} {}{}({}{} {}){} =>\n        {}.Value;\n\n",
            extractor.payload_type_name,
            extractor.name,
            generics,
            extractor.variant_type_name,
            generics,
            extractor.value_param,
            constraints,
            extractor.value_param
        ));
    }

    render_dispatch(out, plan, &plan.sync_dispatch, generics, constraints);
    out.push('\n');
    render_dispatch(out, plan, &plan.async_dispatch, generics, constraints);

    out.push_str("}\n");
}

fn render_dispatch(
    out: &mut String,
    plan: &GenerationPlan,
    dispatch: &DispatchSpec,
    generics: &str,
    constraints: &str,
) {
    let subject = lower_first(&plan.base_name);
    let result_type = if dispatch.deferred { "Task<TResult>" } else { "TResult" };

    let mut with_result: Vec<String> = plan.shared_generic_params.clone();
    with_result.push("TResult".to_string());
    let dispatch_generics = format!("<{}>", with_result.join(", "));

    let handler_params: Vec<String> = dispatch
        .handlers
        .iter()
        .map(|handler| match &handler.payload_type_name {
            Some(payload) => {
                format!("Func<{}, {}> {}", payload, result_type, handler.handler_name)
            }
            None => format!("Func<{}> {}", result_type, handler.handler_name),
        })
        .collect();

    out.push_str(&format!(
        "    public static {} {}{}({}{} {}, {}){} =>\n        {}.{} switch\n        {{\n",
        result_type,
        dispatch.name,
        dispatch_generics,
        plan.interface.name,
        generics,
        subject,
        handler_params.join(", "),
        constraints,
        subject,
        plan.interface.accessor_name
    ));

    for (handler, variant) in dispatch.handlers.iter().zip(&plan.variants) {
        let argument = match &handler.payload_type_name {
            Some(_) => format!("GetValue(({}{}){})", variant.type_name, generics, subject),
            None => String::new(),
        };
        out.push_str(&format!(
            "            {}.{} => {}({}),\n",
            plan.discriminator, handler.tag, handler.handler_name, argument
        ));
    }

    // The schema is closed by construction; reaching this arm is an
    // internal-consistency failure, not a normal error path.
    out.push_str("            _ => throw new Exception(\"Enum value not handled\")\n        };\n");
}
