//! Host-boundary data model: the normalized schema descriptors the host's
//! discovery pass hands to the resolution core.
//!
//! The host is responsible for finding discriminator declarations in source
//! text and turning each one into a [`SchemaDescriptor`]. Everything past
//! that boundary is a pure function of these values.

use crate::provider::TypeRef;

/// Required suffix on every discriminator schema name. The generated
/// family's base name is the schema name with this suffix stripped.
pub const KIND_SUFFIX: &str = "Kind";

/// A source position attached to a schema or case by the host, echoed back
/// in diagnostics so the host can point at the offending declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One discriminator schema: the unit of generation.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    /// Declared name, required to end with [`KIND_SUFFIX`].
    pub name: String,
    /// Enclosing namespace path, outermost first. Empty for the global
    /// namespace.
    pub namespace_path: Vec<String>,
    pub location: Location,
    /// Cases in declaration order. Order is semantically meaningful and is
    /// preserved through every later stage.
    pub cases: Vec<CaseDescriptor>,
}

impl SchemaDescriptor {
    pub fn new(name: impl Into<String>, cases: Vec<CaseDescriptor>) -> Self {
        Self {
            name: name.into(),
            namespace_path: Vec::new(),
            location: Location::default(),
            cases,
        }
    }

    pub fn with_namespace(mut self, path: &[&str]) -> Self {
        self.namespace_path = path.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Fully qualified discriminator name, e.g. `Module3.WebRequestResultKind`.
    pub fn qualified_name(&self) -> String {
        if self.namespace_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace_path.join("."), self.name)
        }
    }
}

/// One labeled alternative of a schema.
///
/// `payload = None` means the case lacks its payload descriptor annotation
/// entirely (a schema error). A case that deliberately carries no payload
/// has `payload = Some(PayloadSpec::none())`.
#[derive(Debug, Clone)]
pub struct CaseDescriptor {
    pub tag: String,
    pub location: Location,
    pub payload: Option<PayloadSpec>,
}

impl CaseDescriptor {
    pub fn new(tag: impl Into<String>, payload: PayloadSpec) -> Self {
        Self {
            tag: tag.into(),
            location: Location::default(),
            payload: Some(payload),
        }
    }

    /// A case whose payload annotation is missing altogether.
    pub fn unannotated(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            location: Location::default(),
            payload: None,
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

/// The payload-type descriptor attached to one case.
#[derive(Debug, Clone, Default)]
pub struct PayloadSpec {
    /// The payload type reference. `None` means the variant carries no
    /// payload value.
    pub ty: Option<TypeRef>,
    /// Explicitly supplied generic arguments. `None` means no argument list
    /// was supplied at all; an entry of `None` inside the list is an omitted
    /// slot, which the resolver treats like the generic-slot marker.
    pub generic_args: Option<Vec<Option<TypeRef>>>,
}

impl PayloadSpec {
    /// Annotation present, no payload.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(ty: TypeRef) -> Self {
        Self {
            ty: Some(ty),
            generic_args: None,
        }
    }

    pub fn with_args(ty: TypeRef, args: Vec<Option<TypeRef>>) -> Self {
        Self {
            ty: Some(ty),
            generic_args: Some(args),
        }
    }
}

/// Lower the first character of a name, leaving the rest untouched.
/// Used for value-parameter names in the generated companion operations.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
