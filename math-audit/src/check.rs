//! Walking the `MATH` table down to its top accent coverage.
//!
//! The walk is a small state machine. Each null offset along the way is an
//! explicit terminal state rather than an error: a font with no glyph info,
//! or glyph info with no top accent attachment, has nothing to check.

use sfnt_read::{
    tables::math::{Math, MathGlyphInfo, MathTopAccentAttachment},
    types::Offset16,
    FontData, FontRead, ReadError,
};

use crate::diagnostic::{Diagnostic, FailureKind};

/// A position in the walk from the `MATH` header to the top accent coverage.
#[derive(Debug, Clone)]
pub enum WalkState<'a> {
    /// The raw `MATH` table, not yet decoded.
    Start(FontData<'a>),
    HeaderOk(Math<'a>),
    GlyphInfoOk(MathGlyphInfo<'a>),
    /// The header has a null MathGlyphInfo offset.
    GlyphInfoAbsent,
    TopAccentOk(MathTopAccentAttachment<'a>),
    /// MathGlyphInfo has a null top accent attachment offset.
    TopAccentAbsent,
    /// The coverage table was decoded; `declared` is the number of value
    /// records, `derived` the number of covered glyphs.
    CoverageOk { declared: u32, derived: u32 },
    /// The top accent attachment has a null coverage offset.
    CoverageMissing,
}

/// A structure in the walk that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepError {
    /// The name of the structure being decoded.
    pub structure: &'static str,
    /// The absolute position of the structure in the file.
    pub position: u32,
    pub error: ReadError,
}

impl StepError {
    pub fn new(structure: &'static str, position: u32, error: ReadError) -> Self {
        StepError {
            structure,
            position,
            error,
        }
    }

    /// A structure's position when it is found at `offset` from its parent.
    fn at_offset(
        structure: &'static str,
        parent_position: u32,
        offset: Offset16,
        error: ReadError,
    ) -> Self {
        let position = parent_position.saturating_add(offset.to_u32());
        Self::new(structure, position, error)
    }

    /// The text naming where the failure occurred.
    pub fn context(&self) -> String {
        format!("{} at 0x{:08X}", self.structure, self.position)
    }
}

impl From<StepError> for Diagnostic {
    fn from(src: StepError) -> Diagnostic {
        Diagnostic::DecodeFailure {
            kind: FailureKind::from(&src.error),
            context: src.context(),
        }
    }
}

impl<'a> WalkState<'a> {
    /// Returns `true` if the walk cannot advance further.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WalkState::GlyphInfoAbsent
                | WalkState::TopAccentAbsent
                | WalkState::CoverageOk { .. }
                | WalkState::CoverageMissing
        )
    }

    /// Advance the walk by one structure.
    ///
    /// Terminal states are returned unchanged.
    pub fn step(self) -> Result<WalkState<'a>, StepError> {
        match self {
            WalkState::Start(data) => Math::read(data)
                .map(WalkState::HeaderOk)
                .map_err(|e| StepError::new("MATH header", data.position(), e)),
            WalkState::HeaderOk(math) => match math.math_glyph_info() {
                None => Ok(WalkState::GlyphInfoAbsent),
                Some(Ok(glyph_info)) => Ok(WalkState::GlyphInfoOk(glyph_info)),
                Some(Err(e)) => Err(StepError::at_offset(
                    "MathGlyphInfo",
                    math.position(),
                    math.math_glyph_info_offset(),
                    e,
                )),
            },
            WalkState::GlyphInfoOk(glyph_info) => {
                log::debug!("analyzing glyph info at {}", glyph_info.position());
                match glyph_info.math_top_accent_attachment() {
                    None => Ok(WalkState::TopAccentAbsent),
                    Some(Ok(top_accent)) => Ok(WalkState::TopAccentOk(top_accent)),
                    Some(Err(e)) => Err(StepError::at_offset(
                        "MathTopAccentAttachment",
                        glyph_info.position(),
                        glyph_info.math_top_accent_attachment_offset(),
                        e,
                    )),
                }
            }
            WalkState::TopAccentOk(top_accent) => {
                log::debug!(
                    "analyzing top accent attachment at {}",
                    top_accent.position()
                );
                let declared = top_accent.top_accent_attachment_count() as u32;
                match top_accent.top_accent_coverage() {
                    None => Ok(WalkState::CoverageMissing),
                    Some(Ok(coverage)) => coverage
                        .coverage_size()
                        .map(|derived| WalkState::CoverageOk { declared, derived })
                        .map_err(|e| StepError::new("coverage table", coverage.position(), e)),
                    Some(Err(e)) => Err(StepError::at_offset(
                        "coverage table",
                        top_accent.position(),
                        top_accent.top_accent_coverage_offset(),
                        e,
                    )),
                }
            }
            terminal => Ok(terminal),
        }
    }

    /// Advance the walk until it reaches a terminal state.
    pub fn run(self) -> Result<WalkState<'a>, StepError> {
        let mut state = self;
        while !state.is_terminal() {
            state = state.step()?;
        }
        Ok(state)
    }

    /// The diagnostic for a finished walk, if any.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            WalkState::CoverageOk { declared, derived } => compare_counts(*declared, *derived),
            WalkState::CoverageMissing => Some(Diagnostic::CoverageMissing),
            _ => None,
        }
    }
}

/// Walk a `MATH` table and return its diagnostic, if any.
pub fn check_math_table(data: FontData) -> Result<Option<Diagnostic>, StepError> {
    WalkState::Start(data)
        .run()
        .map(|state| state.diagnostic())
}

/// Check that a top accent attachment table's count matches its coverage.
///
/// Returns [`Diagnostic::CoverageMissing`] if the coverage offset is null,
/// [`Diagnostic::CountMismatch`] if the counts differ, and `None` if they
/// agree.
pub fn check_top_accent(
    top_accent: &MathTopAccentAttachment,
) -> Result<Option<Diagnostic>, StepError> {
    WalkState::TopAccentOk(top_accent.clone())
        .run()
        .map(|state| state.diagnostic())
}

/// Compare a declared count against the count derived from a coverage table.
pub fn compare_counts(declared: u32, derived: u32) -> Option<Diagnostic> {
    (declared != derived).then_some(Diagnostic::CountMismatch { declared, derived })
}
