//! `keyboard-io` builds the Note-On message for a note and velocity given on the command line, and
//! draws a random velocity next to it.

use anyhow::{Context, Result};
use clap::Parser;
use midi_voice::{random::SyncVelocityRandomizer, Channel, Encode, Message, Note, NoteOn, Velocity};
use std::io::Write;
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(Parser, Debug)]
#[clap(author, about, long_about = None)]
struct Args {
    /// MIDI note number, between 0 and 127
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    note: i32,

    /// MIDI note velocity, clamped between 0 and 127
    #[clap(long = "vel", default_value_t = 0, allow_negative_numbers = true)]
    velocity: i32,

    /// Channel index, between 0 and 15
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    channel: i32,

    /// Lowest random velocity (clamped)
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    min_vel: i32,

    /// Highest random velocity (clamped)
    #[clap(long, default_value_t = 127, allow_negative_numbers = true)]
    max_vel: i32,

    /// Seed the random velocity generator for reproducible output
    #[clap(long)]
    seed: Option<u64>,

    /// Enable debug logging, unless RUST_LOG says otherwise
    #[clap(short = 'v', long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02X}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}

fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let note = Note::new(args.note).context("invalid --note")?;
    let channel = Channel::new(args.channel).context("invalid --channel")?;
    let velocity = Velocity::new(args.velocity);

    let randomizer = match args.seed {
        Some(seed) => SyncVelocityRandomizer::seeded(seed),
        None => SyncVelocityRandomizer::from_entropy(),
    };
    let random_vel = randomizer
        .random_velocity_in_range(Velocity::new(args.min_vel), Velocity::new(args.max_vel))
        .context("error generating random velocity")?;

    let msg = Message::from(NoteOn {
        channel,
        note,
        velocity,
    });
    debug!(%msg, "built message");

    writeln!(out, "MIDI note number: {}", note)?;
    writeln!(out, "MIDI note velocity: {}", velocity)?;
    writeln!(out, "Random MIDI note velocity: {}", random_vel)?;
    writeln!(out, "{} message: {} ({})", msg.name(), hex(&msg.encode()), msg)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!(?args, "parsed arguments");
    run(&args, &mut std::io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(argv: &[&str]) -> Result<String> {
        let args = Args::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(&args, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["keyboard-io"]).unwrap();
        assert_eq!(args.note, 0);
        assert_eq!(args.velocity, 0);
        assert_eq!(args.channel, 0);
        assert_eq!((args.min_vel, args.max_vel), (0, 127));
        assert_eq!(args.seed, None);
        assert!(!args.verbose);
    }

    #[test]
    fn prints_note_on() {
        let text = output(&[
            "keyboard-io", "--note", "64", "--vel", "200", "--channel", "1", "--min-vel", "20",
            "--max-vel", "20", "--seed", "3",
        ])
        .unwrap();
        assert_eq!(
            text,
            "MIDI note number: 64\n\
             MIDI note velocity: 127\n\
             Random MIDI note velocity: 20\n\
             Note-On message: 91 40 7F (midiv1:Note-On:1:64:127)\n"
        );
    }

    #[test]
    fn negative_velocity_is_clamped() {
        let text = output(&["keyboard-io", "--note", "60", "--vel", "-5", "-v"]).unwrap();
        assert!(text.contains("MIDI note velocity: 0\n"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(output(&["keyboard-io", "--note", "128"]).is_err());
        assert!(output(&["keyboard-io", "--channel", "16"]).is_err());
        assert!(output(&["keyboard-io", "--min-vel", "100", "--max-vel", "10"]).is_err());
        assert!(output(&["keyboard-io", "--note", "sixty"]).is_err());
    }
}
