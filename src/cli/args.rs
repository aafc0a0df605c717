use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the withgen binary.
#[derive(Parser, Debug)]
#[command(
    name = "withgen",
    version,
    about = "Hierarchy-aware with-pattern and describe-pattern generator for C#"
)]
pub struct CliArgs {
    // ==================== Output ====================
    /// Directory where generated source files are written.
    #[arg(
        short = 'o',
        long = "outDir",
        alias = "out-dir",
        value_name = "DIR",
        default_value = "."
    )]
    pub out_dir: PathBuf,

    /// Print generated compilation units to stdout instead of writing files.
    #[arg(long)]
    pub stdout: bool,

    /// Print diagnostics as a JSON array on stdout.
    #[arg(long = "diagnosticsJson", alias = "diagnostics-json")]
    pub diagnostics_json: bool,

    // ==================== Reporting ====================
    /// Disable colored diagnostic output.
    #[arg(long = "noColor", alias = "no-color")]
    pub no_color: bool,

    /// Print the types in the request and their patterns, then stop processing.
    #[arg(long = "listTypesOnly", alias = "list-types-only")]
    pub list_types_only: bool,

    // ==================== Input ====================
    /// Generation request manifest (JSON).
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,
}
