use anyhow::{bail, Context, Result};
use crabcaps::config::{BackendSelection, CrabCapsConfig};
use crabcaps::platform::CameraSystem;
use crabcaps::types::CapabilityReport;
use std::env;
use std::path::PathBuf;

const USAGE: &str =
    "Usage: crabcaps-cli <list|info> [--json] [--legacy|--modern] [--config <path>]";

struct Options {
    json: bool,
    backend: Option<BackendSelection>,
    config_path: PathBuf,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }

    let options = parse_options(&args[2..])?;
    let mut config = CrabCapsConfig::load_from_file(&options.config_path)
        .with_context(|| format!("loading {}", options.config_path.display()))?;
    if let Some(backend) = options.backend {
        config.enumeration.backend = backend;
    }
    crabcaps::init_logging_with(&config.logging.filter);

    match args[1].as_str() {
        "list" => cmd_list(&config, &options),
        "info" => cmd_info(&options),
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    }
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options {
        json: false,
        backend: None,
        config_path: CrabCapsConfig::default_path(),
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => options.json = true,
            "--legacy" => options.backend = Some(BackendSelection::Legacy),
            "--modern" => options.backend = Some(BackendSelection::Modern),
            "--config" => {
                i += 1;
                let path = args.get(i).context("--config requires a path")?;
                options.config_path = PathBuf::from(path);
            }
            other => bail!("Unknown option: {}", other),
        }
        i += 1;
    }
    Ok(options)
}

fn cmd_list(config: &CrabCapsConfig, options: &Options) -> Result<()> {
    let report = CameraSystem::report(config).context("enumerating cameras")?;
    if options.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn cmd_info(options: &Options) -> Result<()> {
    let info = CameraSystem::platform_info().context("probing platform")?;
    if options.json {
        println!("{}", serde_json::to_string(&info)?);
    } else {
        println!(
            "{} via {} (extended API: {})",
            info.platform.as_str(),
            info.provider,
            info.extended_api
        );
    }
    Ok(())
}

fn print_report(report: &CapabilityReport) {
    if report.is_empty() {
        println!("No camera available");
        return;
    }
    for device in &report.devices {
        let sizes: Vec<String> = device.resolutions.iter().map(|r| r.to_string()).collect();
        println!(
            "{}: {}-{} mfps [{}]",
            device.name,
            device.min_milli_fps,
            device.max_milli_fps,
            sizes.join(", ")
        );
    }
}
