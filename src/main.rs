use anyhow::{Context, Result};
use clap::{Arg, Command};

use raylib_addon::config::{AddonConfig, Backend};
use raylib_addon::core::initialize_logging;
use raylib_addon::native::NativeLayer;
use raylib_addon::JsHost;

fn main() -> Result<()> {
    let matches = Command::new("raylib_addon")
        .about("Runs a JavaScript file against raylib through the addon bindings")
        .arg(
            Arg::new("script")
                .value_name("SCRIPT")
                .help("JavaScript file to run")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (.toml or .json)"),
        )
        .arg(
            Arg::new("headless")
                .long("headless")
                .help("Use the in-process backend instead of loading raylib")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("frames")
                .long("frames")
                .value_name("N")
                .help("Headless only: report windowShouldClose after N frames")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("library")
                .long("library")
                .value_name("PATH")
                .help("Path to the raylib shared library"),
        )
        .get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => AddonConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => AddonConfig::load_or_default(),
    };
    config.apply_env_overrides();

    if matches.get_flag("headless") {
        config.native.backend = Backend::Headless;
    }
    if let Some(frames) = matches.get_one::<u64>("frames") {
        config.native.frame_limit = Some(*frames);
    }
    if let Some(library) = matches.get_one::<String>("library") {
        config.native.library_path = Some(library.into());
    }
    config.validate().context("Invalid configuration")?;

    initialize_logging(&config.logging);

    let native = NativeLayer::from_config(&config).context("Failed to set up the native layer")?;
    let host = JsHost::new(native, &config).context("Failed to start the JS host")?;

    let script = matches
        .get_one::<String>("script")
        .context("No script given")?;
    host.eval_file(script)
        .with_context(|| format!("Script {} failed", script))?;

    Ok(())
}
