//! Diagnostics handed back to the host: stable codes plus the human-readable
//! message and the location the host should point at.

use crate::resolve::ResolveError;
use crate::schema::Location;

/// Stable diagnostic codes, one per reportable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagCode {
    /// Unexpected internal fault; caught, never propagated as a crash.
    GenerationFailed,
    InvalidSchemaName,
    EmptySchema,
    MissingPayloadSpec,
    ExplicitArgsRequired,
    ArgCountMismatch,
    UnexpectedArgs,
    DuplicateConstraint,
    SpecialConstraintPosition,
    SpecialMarkerPayload,
    NestingTooDeep,
    ParamCollision,
}

impl DiagCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagCode::GenerationFailed => "UF001",
            DiagCode::InvalidSchemaName => "UF002",
            DiagCode::EmptySchema => "UF003",
            DiagCode::MissingPayloadSpec => "UF004",
            DiagCode::ExplicitArgsRequired => "UF005",
            DiagCode::ArgCountMismatch => "UF006",
            DiagCode::UnexpectedArgs => "UF007",
            DiagCode::DuplicateConstraint => "UF008",
            DiagCode::SpecialConstraintPosition => "UF009",
            DiagCode::SpecialMarkerPayload => "UF010",
            DiagCode::NestingTooDeep => "UF011",
            DiagCode::ParamCollision => "UF012",
        }
    }
}

/// One reportable error, tied to the originating case or schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagCode,
    pub message: String,
    pub location: Location,
}

impl Diagnostic {
    /// Wrap an unexpected fault's description as the generic failure
    /// diagnostic for one schema.
    pub fn generation_failed(description: impl Into<String>, location: Location) -> Self {
        Self {
            code: DiagCode::GenerationFailed,
            message: format!("generation failed due to unexpected fault: {}", description.into()),
            location,
        }
    }
}

impl From<&ResolveError> for Diagnostic {
    fn from(error: &ResolveError) -> Self {
        let code = match error {
            ResolveError::InvalidSchemaName { .. } => DiagCode::InvalidSchemaName,
            ResolveError::EmptySchema { .. } => DiagCode::EmptySchema,
            ResolveError::MissingPayloadSpec { .. } => DiagCode::MissingPayloadSpec,
            ResolveError::SpecialMarkerPayload { .. } => DiagCode::SpecialMarkerPayload,
            ResolveError::ExplicitArgsRequired { .. } => DiagCode::ExplicitArgsRequired,
            ResolveError::ArgCountMismatch { .. } => DiagCode::ArgCountMismatch,
            ResolveError::UnexpectedArgs { .. } => DiagCode::UnexpectedArgs,
            ResolveError::DuplicateConstraint { .. } => DiagCode::DuplicateConstraint,
            ResolveError::SpecialConstraintPosition { .. } => DiagCode::SpecialConstraintPosition,
            ResolveError::NestingTooDeep { .. } => DiagCode::NestingTooDeep,
            ResolveError::ParamCollision { .. } => DiagCode::ParamCollision,
        };
        Self {
            code,
            message: error.to_string(),
            location: error.location(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error[{}]: {} at {}",
            self.code.as_str(),
            self.message,
            self.location
        )
    }
}
