//! Error types for graph construction and ordering, and the stable error
//! codes surfaced by the CLI.

use std::fmt;

/// Machine-readable error codes for scripts and CI annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    TargetNotFound,
    InvalidDependency,
    CyclicDependency,
    DuplicateId,
    SourceReadFailed,
    ArtifactWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::TargetNotFound => "E1002",
            Self::InvalidDependency => "E2001",
            Self::CyclicDependency => "E2002",
            Self::DuplicateId => "E2003",
            Self::SourceReadFailed => "E3001",
            Self::ArtifactWriteFailed => "E3002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::TargetNotFound => "Target not found",
            Self::InvalidDependency => "Invalid (not existing) dependency",
            Self::CyclicDependency => "Cyclic dependency",
            Self::DuplicateId => "Duplicate file identifier",
            Self::SourceReadFailed => "Source file read failed",
            Self::ArtifactWriteFailed => "Artifact write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to users.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in preconcat.toml and retry."),
            Self::TargetNotFound => Some("Run `preconcat targets` to list configured targets."),
            Self::InvalidDependency => Some(
                "Check the @require identifiers against the file paths relative to the root directory.",
            ),
            Self::CyclicDependency => Some("Remove one @require from each listed cycle."),
            Self::DuplicateId => {
                Some("Rename one of the files or narrow the source patterns so ids are unique.")
            }
            Self::SourceReadFailed => Some("Check that every source pattern matches readable files."),
            Self::ArtifactWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// GraphError
// ---------------------------------------------------------------------------

/// Failure to produce a build order.
///
/// Every variant carries the complete report (all offending nodes, all
/// cycles), never just the first problem found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// One or more `@require` identifiers name no known file.
    #[error("{0}")]
    InvalidDependencies(InvalidDependencies),

    /// The dependency relation contains at least one cycle.
    #[error("{0}")]
    CyclicDependencies(CycleReport),

    /// Two files normalized to the same identifier (reject policy only).
    #[error("{0}")]
    DuplicateIds(DuplicateIds),
}

impl GraphError {
    /// Stable kind label: `invalid-dependency`, `cyclic-dependency` or
    /// `duplicate-id`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDependencies(_) => "invalid-dependency",
            Self::CyclicDependencies(_) => "cyclic-dependency",
            Self::DuplicateIds(_) => "duplicate-id",
        }
    }

    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidDependencies(_) => ErrorCode::InvalidDependency,
            Self::CyclicDependencies(_) => ErrorCode::CyclicDependency,
            Self::DuplicateIds(_) => ErrorCode::DuplicateId,
        }
    }
}

/// One node whose declared dependencies could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependencies {
    pub id: String,
    /// Unresolved identifiers, in declaration order.
    pub missing: Vec<String>,
}

/// All unresolved dependencies found while validating a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDependencies {
    pub nodes: Vec<MissingDependencies>,
}

impl fmt::Display for InvalidDependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "invalid (not existing) dependencies:")?;
        for node in &self.nodes {
            writeln!(f, "\t{} => {};", node.id, node.missing.join(", "))?;
        }
        Ok(())
    }
}

/// A strongly connected set of nodes, members listed in discovery pop order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Cycle {
    pub members: Vec<String>,
}

impl Cycle {
    /// Returns `true` if this cycle is a single file requiring itself.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.members.len() == 1
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self_loop() {
            let id = &self.members[0];
            write!(f, "{id} -> {id}")
        } else {
            write!(f, "{}", self.members.join(" -> "))
        }
    }
}

/// Every cycle found in a graph that could not be ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycles: Vec<Cycle>,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cyclic dependencies detected:")?;
        for (index, cycle) in self.cycles.iter().enumerate() {
            writeln!(f, "\t{}) {cycle}", index + 1)?;
        }
        Ok(())
    }
}

/// Two input files that produced the same identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCollision {
    pub id: String,
    pub first_path: String,
    pub second_path: String,
}

/// All identifier collisions found while building a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIds {
    pub collisions: Vec<IdCollision>,
}

impl fmt::Display for DuplicateIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "duplicate identifiers:")?;
        for collision in &self.collisions {
            writeln!(
                f,
                "\t{} => {}, {};",
                collision.id, collision.first_path, collision.second_path
            )?;
        }
        Ok(())
    }
}
