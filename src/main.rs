//! Head tracking application streaming pose datagrams to opentrack.

use anyhow::Result;
use clap::Parser;
use head_tracker::config::Config;
use head_tracker::replay::ReplaySource;
use head_tracker::tracker::{Tracker, TrackerState};
use log::info;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded landmark session to replay (one frame per line)
    #[arg(short, long)]
    replay: String,

    /// Destination host for pose datagrams
    #[arg(long)]
    host: Option<String>,

    /// Destination port
    #[arg(long)]
    port: Option<u16>,

    /// Capture frame rate
    #[arg(long)]
    fps: Option<f64>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let mut config = match &args.config {
        Some(path) => {
            info!("loading configuration from {path}");
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    // Command line overrides
    if let Some(host) = args.host {
        config.output.host = host;
    }
    if let Some(port) = args.port {
        config.output.port = port;
    }
    if let Some(fps) = args.fps {
        config.tracking.fps = fps;
    }
    config.validate()?;

    let destination = config.destination()?;
    let source = ReplaySource::from_file(&args.replay)?;

    let mut tracker = Tracker::new(config.tracker());
    tracker.start(Box::new(source), destination)?;
    info!("streaming to {destination}");

    // The loop ends on its own when the replay runs out
    while tracker.state() == TrackerState::Tracking {
        std::thread::sleep(Duration::from_millis(100));
    }
    tracker.stop();

    Ok(())
}
