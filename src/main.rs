use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use ml_pacman::game::{GameConfig, Layout};
use ml_pacman::modes::{TrainConfig, TrainMode, WatchMode};
use ml_pacman::rl::{default_device, TrainingBackend};

#[derive(Parser)]
#[command(name = "ml_pacman")]
#[command(version, about = "Pac-Man maze chase with a DQN agent")]
struct Cli {
    /// Execution mode
    #[arg(long, default_value = "watch")]
    mode: Mode,

    /// Checkpoint path (written by train, read by watch)
    #[arg(short, long, default_value = "checkpoints/latest_model.mpk")]
    model: PathBuf,

    /// Number of episodes to run
    #[arg(short, long)]
    episodes: Option<usize>,

    /// Environment steps per second in watch mode
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Base random seed; episode i uses seed + i
    #[arg(long, default_value = "42")]
    seed: u64,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Watch a trained agent play greedily
    Watch,
    /// Train a DQN agent from scratch
    Train,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let game_config = GameConfig::default();
    let layout = Layout::classic();
    let device = default_device();

    match cli.mode {
        Mode::Watch => {
            let episodes = cli.episodes.unwrap_or(5);
            let mut watch_mode = WatchMode::<TrainingBackend>::new(
                &cli.model,
                game_config,
                layout,
                episodes,
                cli.fps,
                cli.seed,
                device,
            )?;
            watch_mode.run().await?;
        }
        Mode::Train => {
            let episodes = cli.episodes.unwrap_or(5000);
            let mut train_config = TrainConfig::new(episodes, cli.model);
            train_config.seed = cli.seed;
            train_config.game_config = game_config;
            train_config.layout = layout;

            let mut train_mode = TrainMode::<TrainingBackend>::new(train_config, device);
            train_mode.run()?;
        }
    }

    Ok(())
}
