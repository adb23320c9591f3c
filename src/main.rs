pub(crate) mod color;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod intervaltimer;
pub(crate) mod olaoutput;
pub(crate) mod output;
pub(crate) mod playlist;
pub(crate) mod strip;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use eyre::Result;

use crate::config::Config;
use crate::intervaltimer::IntervalTimer;
use crate::olaoutput::OlaOutput;
use crate::output::{Output, TerminalOutput};
use crate::playlist::Playlist;
use crate::strip::Strip;

#[derive(Parser)]
struct Cli {
    /// TOML file with strip, output and playlist settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Preview the strip in the terminal instead of sending it to OLA
    #[arg(short, long)]
    terminal: bool,

    /// Play the playlist once and exit
    #[arg(long)]
    once: bool,
}

fn create_output(args: &Cli, config: &Config) -> Result<Box<dyn Output>> {
    if args.terminal {
        return Ok(Box::new(TerminalOutput::new()));
    }

    let output = &config.output;
    Ok(Box::new(OlaOutput::new(
        output.ola_addr,
        output.universe,
        output.start_channel,
        output.color_order,
        config.strip.pixel_count,
    )?))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    let config = match args.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let output = create_output(&args, &config)?;
    let mut strip = Strip::new(
        config.strip.pixel_count,
        config.strip.correction,
        output,
        Box::new(IntervalTimer::new(true)),
    );
    let mut playlist = Playlist::from_config(&config)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst))?;
    }

    log::info!(
        "Effects starting up: {} pixels on {}, {} effects",
        strip.len(),
        strip.describe_output(),
        playlist.len()
    );
    strip.clear_and_show()?;

    if args.once {
        playlist.run_once(&mut strip, &shutdown)?;
        return strip.clear_and_show();
    }
    playlist.run(&mut strip, &shutdown)
}
