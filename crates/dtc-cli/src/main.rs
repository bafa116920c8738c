//! DTC seed importer CLI
//!
//! Command-line tool for merging vendor DTC datasets into the seed CSV.

mod logging;

use clap::{Args, Parser, Subcommand};
use dtc_core::{
    normalize_code, read_vendor_file, run_import, FieldMap, ImportOutcome, ImportPlan, Language,
    MergeConfig, SourceFormat, DEFAULT_LICENSE,
};
use logging::{init_logging, LogConfig, LogFormat};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dtc-import")]
#[command(about = "Import vendor DTC datasets and merge them into the seed CSV", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge vendor files into the seed CSV
    Import {
        /// Input files (CSV or JSON) or directories containing them
        #[arg(long = "in", value_name = "PATH", required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Output CSV path (created, or appended to with --append)
        #[arg(long)]
        out_csv: PathBuf,

        /// Manufacturer slug (e.g. toyota, volkswagen, delphi, bosch, launch, autel)
        #[arg(long)]
        manufacturer: String,

        /// Language of the provided descriptions (en or tr)
        #[arg(long, default_value = "en")]
        lang: Language,

        #[command(flatten)]
        fields: FieldArgs,

        /// Override system (Powertrain/Body/Chassis/Network); inferred from the code prefix if omitted
        #[arg(long)]
        system: Option<String>,

        /// License note written on every row
        #[arg(long, default_value = DEFAULT_LICENSE)]
        license: String,

        /// Append to an existing CSV instead of overwriting it
        #[arg(long)]
        append: bool,
    },

    /// Run an import described by a plan file
    Run {
        /// Path to plan file (JSON)
        #[arg(short, long)]
        plan: PathBuf,
    },

    /// Create a plan file template
    CreatePlan {
        /// Output path for the plan file
        #[arg(short, long)]
        output: PathBuf,

        /// Manufacturer slug for the plan
        #[arg(short, long)]
        manufacturer: String,

        /// Input files or directories to include
        #[arg(long = "in", value_name = "PATH")]
        inputs: Vec<PathBuf>,

        /// Seed CSV the plan writes to
        #[arg(long, default_value = "seed.csv")]
        out_csv: PathBuf,
    },

    /// Show the records a vendor file yields and how their codes normalize
    Inspect {
        /// Path to a CSV or JSON vendor file
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        fields: FieldArgs,

        /// Maximum number of records to display
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Print the raw records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Vendor field name overrides
#[derive(Args)]
struct FieldArgs {
    /// Field name for the DTC code in vendor files
    #[arg(long, default_value = "code")]
    code_field: String,

    /// Field name for the description
    #[arg(long, default_value = "description")]
    desc_field: String,

    /// Field name for causes (string; ";" separated)
    #[arg(long, default_value = "causes")]
    causes_field: String,

    /// Field name for fixes (string; ";" separated)
    #[arg(long, default_value = "fixes")]
    fixes_field: String,
}

impl From<FieldArgs> for FieldMap {
    fn from(args: FieldArgs) -> Self {
        FieldMap {
            code: args.code_field,
            description: args.desc_field,
            causes: args.causes_field,
            fixes: args.fixes_field,
        }
    }
}

/// How a successful command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Done,
    NoRows,
}

fn main() {
    let result = run();
    match &result {
        Ok(Status::Done) => {}
        Ok(Status::NoRows) => eprintln!("No rows imported"),
        Err(e) => eprintln!("Error: {}", e),
    }
    std::process::exit(exit_code(&result));
}

/// 0 on success, 2 when nothing was imported, 1 on any error
fn exit_code(result: &dtc_core::Result<Status>) -> i32 {
    match result {
        Ok(Status::Done) => 0,
        Ok(Status::NoRows) => 2,
        Err(_) => 1,
    }
}

fn run() -> dtc_core::Result<Status> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose, cli.log_format));

    match cli.command {
        Commands::Import {
            inputs,
            out_csv,
            manufacturer,
            lang,
            fields,
            system,
            license,
            append,
        } => {
            let plan = ImportPlan {
                inputs,
                out_csv,
                append,
                manufacturer,
                lang,
                fields: fields.into(),
                system,
                license,
            };
            cmd_import(&plan)
        }
        Commands::Run { plan } => cmd_run(&plan),
        Commands::CreatePlan {
            output,
            manufacturer,
            inputs,
            out_csv,
        } => cmd_create_plan(&output, manufacturer, inputs, out_csv),
        Commands::Inspect {
            file,
            fields,
            limit,
            json,
        } => cmd_inspect(&file, fields.into(), limit, json),
    }
}

fn cmd_import(plan: &ImportPlan) -> dtc_core::Result<Status> {
    let outcome = run_import(plan)?;
    print_outcome(plan, &outcome);

    if outcome.written.is_none() {
        return Ok(Status::NoRows);
    }
    Ok(Status::Done)
}

fn cmd_run(plan_path: &Path) -> dtc_core::Result<Status> {
    let plan = ImportPlan::load(plan_path)?;
    tracing::info!(
        plan = %plan_path.display(),
        inputs = plan.inputs.len(),
        manufacturer = %plan.manufacturer,
        "Loaded import plan"
    );
    cmd_import(&plan)
}

fn print_outcome(plan: &ImportPlan, outcome: &ImportOutcome) {
    let Some(written) = outcome.written else {
        return;
    };

    println!(
        "Imported {} rows into {}",
        written.rows_written,
        plan.out_csv.display()
    );

    let duplicates = outcome.report.duplicate_count();
    let skipped = outcome.report.skipped_count();
    if duplicates > 0 || skipped > 0 {
        println!(
            "  {} duplicate(s) dropped, {} row(s) without a code skipped",
            duplicates, skipped
        );
    }

    let unsupported = outcome.report.unsupported().count();
    if unsupported > 0 {
        println!("  {} unsupported file(s) ignored", unsupported);
    }
}

fn cmd_create_plan(
    output: &Path,
    manufacturer: String,
    inputs: Vec<PathBuf>,
    out_csv: PathBuf,
) -> dtc_core::Result<Status> {
    let inputs = if inputs.is_empty() {
        vec![PathBuf::from("vendor.csv"), PathBuf::from("vendor.json")]
    } else {
        inputs
    };

    let plan = ImportPlan::new(inputs, out_csv, manufacturer);
    plan.save(output)?;

    println!("Created plan file: {}", output.display());
    println!("Manufacturer: {}", plan.manufacturer);
    println!("Inputs: {}", plan.inputs.len());
    println!();
    println!("Edit the file to configure your import, then run:");
    println!("  dtc-import run --plan {}", output.display());

    Ok(Status::Done)
}

fn cmd_inspect(file: &Path, fields: FieldMap, limit: usize, json: bool) -> dtc_core::Result<Status> {
    let records = read_vendor_file(file)?;

    if json {
        let shown: Vec<_> = records.iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(Status::Done);
    }

    let format = SourceFormat::from_path(file)
        .map(|f| f.as_str())
        .unwrap_or("unsupported");

    println!("File: {}", file.display());
    println!("Format: {}", format);
    println!("Records: {}", records.len());
    let empty = records.iter().filter(|r| r.is_empty()).count();
    if empty > 0 {
        println!("Empty records: {}", empty);
    }
    println!();

    // Preview rows with a placeholder manufacturer; only the mapping matters here
    let config = MergeConfig::new("preview").with_fields(fields);
    config.validate()?;

    println!("raw_code\tcode\tsystem\tdescription");
    println!("{}", "-".repeat(48));
    for record in records.iter().take(limit) {
        let raw = record.get_or_empty(&config.fields.code);
        match config.normalize_record(record) {
            Some(row) => println!("{}\t{}\t{}\t{}", raw, row.code, row.system, row.description()),
            None => println!("{}\t(skipped: empty code)\t\t", raw),
        }
    }

    if records.len() > limit {
        println!("... ({} more records)", records.len() - limit);
    }

    let distinct: std::collections::HashSet<String> = records
        .iter()
        .map(|r| normalize_code(r.get_or_empty(&config.fields.code)))
        .filter(|c| !c.is_empty())
        .collect();
    println!();
    println!("Distinct codes: {}", distinct.len());

    Ok(Status::Done)
}
