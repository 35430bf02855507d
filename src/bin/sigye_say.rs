//! sigye-say: print or speak Korean clock readings from the command line.
//!
//!   sigye-say now                 현재 시각
//!   sigye-say at 15:30            설정한 시각
//!   sigye-say until 18:00         목표 시간까지 남은 시간
//!   sigye-say since 09:00         시작 시간부터 지난 시간

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sigye_rs::config::Config;
use sigye_rs::duration::{difference_now, parse_clock_time, TimeArg, TimeDifference};
use sigye_rs::korean::{format_korean, set_time_phrase, since_phrase, until_phrase, HourFormat};
use sigye_rs::notifier::Notifier;
use sigye_rs::speech::{self, Speaker};
use sigye_rs::ticker::{LocalClock, TimeSource};

const SPEECH_POLL: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "sigye-say", about = "Read clock times aloud in Korean")]
struct Args {
    /// Path to config.yaml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use 24-hour readings
    #[arg(long = "24h", global = true)]
    twenty_four_hour: bool,

    /// Speak the result as well as printing it
    #[arg(short, long, global = true)]
    speak: bool,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// The current time
    Now,
    /// A given time of day today (HH:MM)
    At { time: String },
    /// Time remaining until HH:MM
    Until { target: String },
    /// Time elapsed since HH:MM
    Since { start: String },
}

#[derive(Serialize)]
struct Reading {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    difference: Option<TimeDifference>,
}

fn read(command: &Command, format: HourFormat) -> Result<Reading, Box<dyn std::error::Error>> {
    let now = LocalClock.now();

    let reading = match command {
        Command::Now => Reading {
            text: format_korean(&now, format),
            difference: None,
        },
        Command::At { time } => {
            let time = now.date().and_time(parse_clock_time(time)?);
            Reading {
                text: set_time_phrase(&format_korean(&time, format)),
                difference: None,
            }
        }
        Command::Until { target } => {
            let d = difference_now(&TimeArg::Instant(now), &TimeArg::clock(target.as_str()))
                .ok_or_else(|| format!("invalid target time {target:?}, expected HH:MM"))?;
            Reading {
                text: until_phrase(&d.description),
                difference: Some(d),
            }
        }
        Command::Since { start } => {
            let d = difference_now(&TimeArg::clock(start.as_str()), &TimeArg::Instant(now))
                .ok_or_else(|| format!("invalid start time {start:?}, expected HH:MM"))?;
            Reading {
                text: since_phrase(&d.description),
                difference: Some(d),
            }
        }
    };
    Ok(reading)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(args.config.as_deref());
    let format = HourFormat::from_24_hour(args.twenty_four_hour || config.display.use_24_hour);

    let reading = read(&args.command, format)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        println!("{}", reading.text);
    }

    if !args.speak {
        return Ok(());
    }

    let narrator = speech::narrator_from_config(&config.speech, tokio::runtime::Handle::current());
    let speaker = Speaker::new(
        narrator,
        config.speech.clone(),
        Notifier::new(config.feedback.notifications),
    );
    speaker.speak(&reading.text)?;
    info!("Waiting for narration to finish");

    // Poll for completion (the supervising task runs on this runtime)
    while speaker.is_speaking() {
        tokio::time::sleep(SPEECH_POLL).await;
    }
    debug!("Narration finished");

    Ok(())
}
