//! Checking the consistency of `MATH` tables in font files.
//!
//! For every font in a file (a single font, or each member of a
//! collection) this walks the `MATH` table down to the top accent
//! attachment and compares the number of accent values it declares with the
//! number of glyphs in its coverage table.
//!
//! The analysis of a file produces a sequence of [`Diagnostic`]s. Decoding
//! problems are reported as diagnostics too, so a malformed font never stops
//! the analysis of the other fonts in the same file, or of other files.
//!
//! ```no_run
//! let path = std::path::Path::new("STIXTwoMath.otf");
//! for diagnostic in math_audit::analyze_file(path).unwrap() {
//!     println!("{diagnostic}");
//! }
//! ```

mod check;
mod diagnostic;
mod error;
mod report;

use std::fs::File;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use sfnt_read::{tables::math, FileRef, FontRef};

pub use check::{check_math_table, check_top_accent, compare_counts, StepError, WalkState};
pub use diagnostic::{Diagnostic, FailureKind};
pub use error::AuditError;
pub use report::{write_report, AuditOptions, FileReport, OutputFormat};

/// Analyze the contents of a font or font collection file.
///
/// The result holds every diagnostic after [`Diagnostic::AnalyzingFile`],
/// and depends only on `bytes`.
pub fn analyze_font_data(bytes: &[u8]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let file = match FileRef::new(bytes) {
        Ok(file) => file,
        Err(e) => {
            diagnostics.push(StepError::new(container_name(bytes), 0, e).into());
            return diagnostics;
        }
    };
    let kind = file.kind();
    for (offset, font) in file.fonts() {
        diagnostics.push(Diagnostic::AnalyzingFont { kind, offset });
        match font {
            Ok(font) => analyze_font(&font, &mut diagnostics),
            Err(e) => diagnostics.push(StepError::new("table directory", offset, e).into()),
        }
    }
    diagnostics
}

/// Analyze the contents of the file at `path`, which have already been read.
pub fn analyze_bytes(path: &Path, bytes: &[u8]) -> Vec<Diagnostic> {
    let mut diagnostics = vec![Diagnostic::AnalyzingFile {
        path: path.to_owned(),
    }];
    diagnostics.extend(analyze_font_data(bytes));
    diagnostics
}

/// Map the file at `path` into memory and analyze it.
pub fn analyze_file(path: &Path) -> Result<Vec<Diagnostic>, AuditError> {
    let io_error = |source| AuditError::Io {
        path: path.to_owned(),
        source,
    };
    log::debug!("analyzing {}", path.display());
    let file = File::open(path).map_err(io_error)?;
    // mapping an empty file fails on some platforms
    if file.metadata().map_err(io_error)?.len() == 0 {
        return Ok(analyze_bytes(path, &[]));
    }
    // SAFETY: the map is only read and does not outlive this function. We do
    // not guard against another process modifying the file while it is mapped.
    let data = unsafe { memmap2::Mmap::map(&file) }.map_err(io_error)?;
    Ok(analyze_bytes(path, &data))
}

/// Analyze each file in `paths`, in parallel.
///
/// Reports are returned in the same order as `paths`.
pub fn audit_files(paths: &[PathBuf]) -> Vec<FileReport> {
    paths
        .par_iter()
        .map(|path| FileReport {
            path: path.clone(),
            outcome: analyze_file(path),
        })
        .collect()
}

/// Analyze each file in `paths` using the thread count in `options`.
pub fn audit(paths: &[PathBuf], options: &AuditOptions) -> Result<Vec<FileReport>, AuditError> {
    let pool = options.thread_pool()?;
    Ok(pool.install(|| audit_files(paths)))
}

fn analyze_font(font: &FontRef, diagnostics: &mut Vec<Diagnostic>) {
    let Some(record) = font.locate_table(math::TAG) else {
        log::debug!("no MATH table in font at {}", font.offset());
        return;
    };
    diagnostics.push(Diagnostic::AnalyzingMathTable);
    let result = font
        .record_start_data(&record)
        .map_err(|e| StepError::new("MATH table", record.offset().to_u32(), e))
        .and_then(check_math_table);
    match result {
        Ok(Some(diagnostic)) => diagnostics.push(diagnostic),
        Ok(None) => (),
        Err(e) => diagnostics.push(e.into()),
    }
}

// names the structure a container-level failure occurred in
fn container_name(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"ttcf") {
        "collection header"
    } else {
        "file header"
    }
}
