mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use mobipress::{output_paths, AsciidoctorCli, MobiProducer, OsFamily, PublicationConfig};

fn main() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(e) = real_main() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<()> {
    let args = cli::Args::parse();

    match args.sub.unwrap_or(cli::Cmd::Produce { config: None }) {
        cli::Cmd::Produce { config } => run_produce(config),
        cli::Cmd::Check { config } => handle_check(config),
    }
}

fn config_path(override_path: Option<String>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(PathBuf::from(path));
    }
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("mobipress");
    Ok(config_dir.join("mobipress.toml"))
}

fn run_produce(config: Option<String>) -> Result<()> {
    let cfg_path = config_path(config)?;
    let cfg = PublicationConfig::load_or_init(&cfg_path)?;
    info!("Using config from: {}", cfg_path.display());

    let family = OsFamily::detect()?;
    let producer =
        MobiProducer::new(&cfg, family).context("Failed to construct the .mobi producer")?;

    let engine = AsciidoctorCli::default();
    let outputs = producer.produce(&engine)?;

    info!(
        "done; artifacts: {} and {}",
        outputs[0].display(),
        outputs[1].display()
    );
    Ok(())
}

/// Handle check command - report component presence without producing
fn handle_check(config: Option<String>) -> Result<()> {
    let cfg_path = config_path(config)?;
    let cfg = PublicationConfig::load_or_init(&cfg_path)?;

    let binary = &cfg.mobi.kindlegen.binary_location;
    let mut all_present = true;

    if binary.exists() {
        println!("kindlegen present at {}", binary.display());
    } else {
        println!("kindlegen missing at {}", binary.display());
        all_present = false;
    }

    for path in output_paths(&cfg.root) {
        if path.exists() {
            println!("artifact present: {}", path.display());
        } else {
            println!("artifact missing: {}", path.display());
            all_present = false;
        }
    }

    if !all_present {
        std::process::exit(1);
    }
    Ok(())
}
