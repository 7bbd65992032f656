//! Flappy headless runner
//!
//! Plays the game on autopilot at a fixed frame rate and reports what happened.
//! Usage: `flappy [config.json] [--seconds N] [--seed N] [--json]`

use std::path::{Path, PathBuf};

use clap::Parser;
use flappy::consts::SIM_DT;
use flappy::scene::{Director, SceneKind};
use flappy::sim::{FixedStep, GameEvent, TickInput};
use flappy::GameConfig;

#[derive(Parser, Debug)]
#[command(name = "flappy")]
#[command(about = "Play flappy on autopilot and report each run")]
struct Cli {
    /// JSON file with game tuning; defaults are used when omitted
    config: Option<PathBuf>,

    /// Simulated play time in seconds
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// Seed for the session RNG
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Print every game event as a JSON line
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&Path>) -> GameConfig {
    let Some(path) = path else {
        return GameConfig::default();
    };
    match GameConfig::load(path) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("{}; using default config", err);
            GameConfig::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Flappy (headless) starting...");

    let options = Cli::parse();
    let config = load_config(options.config.as_deref());
    let mut director = Director::new(config, options.seed);
    let mut clock = FixedStep::new();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    // Simulated 60 fps frames
    let frame_dt = 1.0 / 60.0;
    let frames = (options.seconds / frame_dt).round() as u64;
    let mut best = 0;
    let mut runs = 0;

    for _ in 0..frames {
        for _ in 0..clock.advance(frame_dt) {
            director.update(&input, SIM_DT);
        }
        for event in director.drain_events() {
            if options.json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(err) => log::error!("failed to encode event: {}", err),
                }
            }
            if let GameEvent::GameOver { score } = event {
                runs += 1;
                best = best.max(score);
                if !options.json {
                    println!("Run {} over: score {}", runs, score);
                }
            }
        }
    }

    if director.scene_kind() == SceneKind::Session {
        if let Some(session) = director.session() {
            log::info!("Run in progress with score {}", session.score());
        }
    }
    if !options.json {
        println!(
            "{} sessions started, {} finished, best score {}",
            director.sessions_started(),
            runs,
            best
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["flappy"]).unwrap();
        assert_eq!(cli.seconds, 60.0);
        assert_eq!(cli.seed, 0x5eed);
        assert!(cli.config.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_parses_all_options() {
        let cli = Cli::try_parse_from(["flappy", "tuning.json", "--seconds", "5", "--seed", "7", "--json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("tuning.json")));
        assert_eq!(cli.seconds, 5.0);
        assert_eq!(cli.seed, 7);
        assert!(cli.json);
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["flappy", "--secnds", "1"]).is_err());
    }

    #[test]
    fn test_rejects_second_config_path() {
        assert!(Cli::try_parse_from(["flappy", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_rejects_bad_number() {
        assert!(Cli::try_parse_from(["flappy", "--seed", "abc"]).is_err());
    }
}
