use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use math_audit::{AuditError, AuditOptions};

/// Check MATH tables for a top accent count that disagrees with its coverage.
#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(flatten)]
    options: AuditOptions,
    /// Paths to font or font collection files (may use glob syntax)
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    use clap::Parser as _;
    let args = Args::parse_from(wild::args());
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.options.log_level()),
    )
    .init();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, AuditError> {
    let reports = math_audit::audit(&args.files, &args.options)?;
    let mut stdout = std::io::stdout().lock();
    math_audit::write_report(&mut stdout, &reports, args.options.format)?;
    stdout.flush()?;

    if args.options.is_failure(&reports) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
