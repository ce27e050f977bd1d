//! `insv-dump`: dump Insta360 INSV metadata to JSON.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};

use insv_rs::{
    files::{affix_file_name, insv_paths},
    scan_files, FrameType, InsvError, InsvMetadata, ParseOptions, FRAME_CATALOG,
};

#[derive(Parser, Debug)]
#[command(
    name = "insv-dump",
    version,
    about = "Dump Insta360 INSV metadata to JSON",
    after_help = "Types for --include: MAGNETIC, EULER, GYRO_SECONDARY, SPEED, HEARTRATE, EXPOSURE_SECONDARY, POS"
)]
struct Cli {
    /// Input INSV file(s). Directories are searched for .insv, .insp, .lrv with --scan.
    input: Vec<PathBuf>,
    /// Output JSON file (default: <input>.meta.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Only decode frames with specified numeric type code
    #[arg(long, value_name = "CODE")]
    frame_type: Option<u8>,
    /// Additional frame types to decode (comma-separated)
    #[arg(long, value_name = "TYPES")]
    include: Vec<String>,
    /// List all known frame types and exit
    #[arg(long, default_value_t = false)]
    list_types: bool,
    /// Show frame types present in file(s), no dump
    #[arg(long, default_value_t = false)]
    scan: bool,
    /// Also write valid GPS points as GeoJSON (<input>.gps.geojson)
    #[arg(long, default_value_t = false)]
    geojson: bool,
    /// Show progress bar when scanning
    #[arg(long, default_value_t = false)]
    progress: bool,
    /// Log level, repeat for more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn list_types() {
    println!("Known frame types:");
    for entry in FRAME_CATALOG.iter() {
        let optional = match entry.frame_type.is_optional() {
            true => " (optional, use --include)",
            false => "",
        };
        println!("  {:3}: {}{optional}", entry.code, entry.name);
    }
}

/// Comma-separated type names. Unknown names are ignored.
fn include_types(args: &[String]) -> HashSet<FrameType> {
    args.iter()
        .flat_map(|arg| arg.split(','))
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter_map(|name| {
            let frame_type = FrameType::from_name(name);
            if frame_type.is_none() {
                log::warn!("Unknown frame type '{name}', ignoring");
            }
            frame_type
        })
        .collect()
}

fn scan(cli: &Cli) -> ExitCode {
    let paths = insv_paths(&cli.input);
    let mut errors = 0;

    for (path, result) in scan_files(&paths, cli.progress) {
        match result {
            Ok(summary) => println!("{summary}\n"),
            Err(err) => {
                eprintln!("{}: {err}", path.display());
                errors += 1;
            }
        }
    }

    if errors > 0 {
        eprintln!("Failed to read {errors} of {} files", paths.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn dump(cli: &Cli, input: &Path) -> Result<(), InsvError> {
    if !input.is_file() {
        return Err(InsvError::InvalidFileType(input.to_owned()));
    }

    let mut options = ParseOptions::new().include_all(include_types(&cli.include));
    if let Some(code) = cli.frame_type {
        options = options.frame_type(code);
    }

    let insv = InsvMetadata::new(input)?;
    if let Some(code) = cli.frame_type {
        if !insv.contains_code(code) {
            return Err(InsvError::FrameTypeNotFound(code));
        }
    }
    let insv = insv.parse(&options);

    let suffix = match cli.frame_type {
        Some(code) => format!(".frame{code}.meta.json"),
        None => ".meta.json".to_owned(),
    };
    let output = cli.output.to_owned()
        .unwrap_or_else(|| affix_file_name(input, &suffix));

    insv.write_json(&output)?;
    println!("Metadata dumped to {}", output.display());

    if cli.geojson {
        let gps = insv.gps();
        if gps.is_empty() {
            log::warn!("No GPS records in {}", input.display());
        } else {
            let output = affix_file_name(input, ".gps.geojson");
            gps.write_geojson(&output)?;
            println!("GPS dumped to {}", output.display());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_types {
        list_types();
        return ExitCode::SUCCESS;
    }

    if cli.input.is_empty() {
        eprintln!("Error: No input file specified");
        return ExitCode::from(2);
    }

    if cli.scan {
        return scan(&cli);
    }

    let [input] = cli.input.as_slice() else {
        eprintln!("Error: Multiple files only supported with --scan");
        return ExitCode::FAILURE;
    };

    match dump(&cli, input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
