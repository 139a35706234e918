//! Options and output for a run over many files.

use std::io::Write;
use std::path::PathBuf;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::{AuditError, Diagnostic};

/// How reports are written.
#[derive(clap::ValueEnum, Copy, Clone, Default, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per diagnostic, indented under its file and font.
    #[default]
    Text,
    /// A JSON array with one object per file.
    Json,
}

/// Settings for a run.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct AuditOptions {
    /// The report format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
    /// The number of files to analyze at once (defaults to the number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,
    /// Exit with a failure status if any file has a finding
    #[arg(long)]
    pub strict: bool,
    /// Log more detail (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl AuditOptions {
    /// The default log filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Returns `true` if a run with these options should exit with a failure
    /// status after producing `reports`.
    pub fn is_failure(&self, reports: &[FileReport]) -> bool {
        self.strict && reports.iter().any(FileReport::has_findings)
    }

    pub(crate) fn thread_pool(&self) -> Result<rayon::ThreadPool, AuditError> {
        // zero means 'let rayon decide'
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.unwrap_or(0))
            .build()
            .map_err(Into::into)
    }
}

/// The outcome of analyzing one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<Vec<Diagnostic>, AuditError>,
}

impl FileReport {
    /// The file's diagnostics; empty if it could not be read.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.outcome.as_deref().unwrap_or_default()
    }

    /// Returns `true` if the file could not be read, or if any of its
    /// diagnostics reports a problem.
    pub fn has_findings(&self) -> bool {
        match &self.outcome {
            Ok(diagnostics) => diagnostics.iter().any(Diagnostic::is_finding),
            Err(_) => true,
        }
    }
}

impl Serialize for FileReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut report = serializer.serialize_struct("FileReport", 3)?;
        report.serialize_field("path", &self.path)?;
        report.serialize_field("diagnostics", self.diagnostics())?;
        let error = self.outcome.as_ref().err().map(ToString::to_string);
        report.serialize_field("error", &error)?;
        report.end()
    }
}

/// Write `reports` to `out`, in order.
pub fn write_report(
    out: &mut impl Write,
    reports: &[FileReport],
    format: OutputFormat,
) -> Result<(), AuditError> {
    match format {
        OutputFormat::Text => write_text(out, reports),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn write_text(out: &mut impl Write, reports: &[FileReport]) -> Result<(), AuditError> {
    for report in reports {
        match &report.outcome {
            Ok(diagnostics) => {
                for diagnostic in diagnostics {
                    let indent = diagnostic.depth() * 2;
                    writeln!(out, "{:indent$}{diagnostic}", "")?;
                }
            }
            Err(e) => {
                let header = Diagnostic::AnalyzingFile {
                    path: report.path.clone(),
                };
                writeln!(out, "{header}")?;
                writeln!(out, "  {e}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sfnt_read::FontKind;

    use super::*;

    fn reports() -> Vec<FileReport> {
        vec![
            FileReport {
                path: "a.otf".into(),
                outcome: Ok(vec![
                    Diagnostic::AnalyzingFile {
                        path: "a.otf".into(),
                    },
                    Diagnostic::AnalyzingFont {
                        kind: FontKind::Single,
                        offset: 0,
                    },
                    Diagnostic::AnalyzingMathTable,
                    Diagnostic::CoverageMissing,
                ]),
            },
            FileReport {
                path: "missing.otf".into(),
                outcome: Err(AuditError::Io {
                    path: "missing.otf".into(),
                    source: std::io::ErrorKind::NotFound.into(),
                }),
            },
        ]
    }

    #[test]
    fn text_output() {
        let mut out = Vec::new();
        write_report(&mut out, &reports(), OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "\
Analyzing file \"a.otf\"
  Analyzing font at offset 0
    Analyzing MATH table
    Coverage table missing

Analyzing file \"missing.otf\"
  Failed to read 'missing.otf': entity not found

";
        assert_eq!(text, expected);
    }

    #[test]
    fn json_output() {
        let mut out = Vec::new();
        write_report(&mut out, &reports(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["path"], "a.otf");
        assert_eq!(value[0]["diagnostics"][3]["type"], "coverage_missing");
        assert_eq!(value[0]["error"], serde_json::Value::Null);
        assert_eq!(value[1]["diagnostics"], serde_json::json!([]));
        assert!(value[1]["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to read 'missing.otf'"));
    }

    #[test]
    fn findings() {
        let reports = reports();
        assert!(reports[0].has_findings());
        assert!(reports[1].has_findings());
        let clean = FileReport {
            path: "b.otf".into(),
            outcome: Ok(vec![Diagnostic::AnalyzingFile {
                path: "b.otf".into(),
            }]),
        };
        assert!(!clean.has_findings());
    }

    #[test]
    fn strict_fails_on_unreadable_files() {
        let reports = reports();
        let strict = AuditOptions {
            strict: true,
            ..Default::default()
        };
        assert!(strict.is_failure(&reports[1..]));
        assert!(!AuditOptions::default().is_failure(&reports));
        assert!(!strict.is_failure(&[]));
    }

    #[test]
    fn verbosity() {
        let mut options = AuditOptions::default();
        assert_eq!(options.log_level(), "warn");
        options.verbose = 2;
        assert_eq!(options.log_level(), "trace");
    }
}
