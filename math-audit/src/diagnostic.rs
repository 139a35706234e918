//! The records produced while analyzing a file.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use serde::Serialize;
use sfnt_read::{FontKind, ReadError};

/// One step or finding of an analysis.
///
/// A file's diagnostics start with [`Diagnostic::AnalyzingFile`], followed
/// by an [`Diagnostic::AnalyzingFont`] for each font it contains. Findings
/// follow the font (and `MATH` table) they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    AnalyzingFile {
        path: PathBuf,
    },
    AnalyzingFont {
        kind: FontKind,
        offset: u32,
    },
    AnalyzingMathTable,
    /// A top accent attachment table has a null coverage offset.
    CoverageMissing,
    /// The number of top accent values differs from the number of glyphs
    /// in the coverage table.
    CountMismatch {
        declared: u32,
        derived: u32,
    },
    /// Some structure could not be decoded; analysis of the current font
    /// (or file, for container failures) stops here.
    DecodeFailure {
        kind: FailureKind,
        context: String,
    },
}

/// The category of a [`Diagnostic::DecodeFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    OutOfBounds,
    UnknownContainer,
    UnsupportedCoverageFormat,
    Malformed,
}

impl Diagnostic {
    /// Returns `true` for diagnostics that report a problem with the font.
    pub fn is_finding(&self) -> bool {
        matches!(
            self,
            Diagnostic::CoverageMissing
                | Diagnostic::CountMismatch { .. }
                | Diagnostic::DecodeFailure { .. }
        )
    }

    /// How far this record is nested under its file, for text output.
    pub fn depth(&self) -> usize {
        match self {
            Diagnostic::AnalyzingFile { .. } => 0,
            Diagnostic::AnalyzingFont { .. } => 1,
            _ => 2,
        }
    }
}

impl From<&ReadError> for FailureKind {
    fn from(error: &ReadError) -> Self {
        match error {
            ReadError::OutOfBounds => FailureKind::OutOfBounds,
            ReadError::UnknownContainer => FailureKind::UnknownContainer,
            // coverage tables are the only format-switched structure we decode
            ReadError::InvalidFormat(_) => FailureKind::UnsupportedCoverageFormat,
            _ => FailureKind::Malformed,
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::OutOfBounds => "out of bounds",
            FailureKind::UnknownContainer => "unknown container",
            FailureKind::UnsupportedCoverageFormat => "unsupported coverage format",
            FailureKind::Malformed => "malformed data",
        };
        f.write_str(name)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AnalyzingFile { path } => {
                write!(f, "Analyzing file \"{}\"", path.display())
            }
            Diagnostic::AnalyzingFont {
                kind: FontKind::Single,
                offset,
            } => write!(f, "Analyzing font at offset {offset}"),
            Diagnostic::AnalyzingFont {
                kind: FontKind::Collection,
                offset,
            } => write!(f, "Analyzing font at offset {offset} in collection"),
            Diagnostic::AnalyzingMathTable => f.write_str("Analyzing MATH table"),
            Diagnostic::CoverageMissing => f.write_str("Coverage table missing"),
            Diagnostic::CountMismatch { declared, derived } => write!(
                f,
                "Inconsistent count (values = {declared}, coverage = {derived})"
            ),
            Diagnostic::DecodeFailure { kind, context } => {
                write!(f, "Decode failure ({kind}): {context}")
            }
        }
    }
}
