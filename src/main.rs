//! sigye-rs: talking analog clock window.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sigye_rs::config::Config;
use sigye_rs::notifier::Notifier;
use sigye_rs::speech::{self, Speaker};

#[derive(Parser, Debug)]
#[command(name = "sigye-rs", about = "Talking analog clock for learning to read time in Korean")]
struct Args {
    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in 24-hour display mode
    #[arg(long = "24h")]
    twenty_four_hour: bool,

    /// Disable speech output
    #[arg(long)]
    no_speech: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging (suppress noisy windowing internals)
    let filter = if args.verbose {
        EnvFilter::new("debug,eframe=info,egui_glow=warn,winit=warn")
    } else {
        EnvFilter::new("info,eframe=warn,egui_glow=warn,winit=warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("sigye-rs starting");

    let mut config = Config::load(args.config.as_deref());
    if args.twenty_four_hour {
        config.display.use_24_hour = true;
    }
    if args.no_speech {
        config.speech.enabled = false;
    }
    info!("Speech config: {:?}", config.speech);

    // Speech processes are supervised off the UI thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("sigye-speech")
        .enable_all()
        .build()?;

    let narrator = speech::narrator_from_config(&config.speech, runtime.handle().clone());
    let speaker = Speaker::new(
        narrator,
        config.speech.clone(),
        Notifier::new(config.feedback.notifications),
    );

    sigye_rs::ui::run(config, speaker)?;

    info!("Window closed, shutting down");
    Ok(())
}
