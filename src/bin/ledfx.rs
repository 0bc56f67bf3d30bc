use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use ledfx::animation::AnimationKind;
use ledfx::audio::NoAudio;
use ledfx::config::SessionConfig;
use ledfx::player::Player;

#[derive(Parser, Debug)]
#[command(name = "ledfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stream an animation to the configured panels.
    Run(RunArgs),
    /// List the available animations.
    List,
    /// Validate a session configuration file.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Session configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Animation to run.
    #[arg(long, value_enum)]
    animation: AnimationKind,

    /// Stop after this many seconds (runs until interrupted by default).
    #[arg(long)]
    duration: Option<u64>,

    /// Master brightness override in [0, 1].
    #[arg(long)]
    brightness: Option<f64>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Session configuration JSON.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::List => cmd_list(),
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = SessionConfig::load(&args.config)
        .with_context(|| format!("load session config '{}'", args.config.display()))?;
    if let Some(brightness) = args.brightness {
        config.brightness = brightness;
        config.validate()?;
    }

    let player = Player::new(config);
    let duration = args.duration.map(Duration::from_secs);
    player.run(args.animation, &mut NoAudio, duration)?;
    Ok(())
}

fn cmd_list() -> anyhow::Result<()> {
    let mut audio = NoAudio;
    for kind in AnimationKind::ALL {
        let animation = kind.create(&mut audio);
        let reactive = if animation.is_audio_reactive() {
            " (audio-reactive)"
        } else {
            ""
        };
        println!("{}{reactive}", animation.name());
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let config = SessionConfig::load(&args.config)
        .with_context(|| format!("load session config '{}'", args.config.display()))?;
    println!(
        "{}x{} canvas, {} device(s), ok",
        config.canvas.width,
        config.canvas.height,
        config.devices.len()
    );
    Ok(())
}
