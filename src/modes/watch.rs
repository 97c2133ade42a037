//! Watch mode for evaluating trained agents
//!
//! Loads a checkpoint and plays greedy episodes in a TUI, rendering the maze
//! at a configurable speed. Exploration is forced to zero and no learning
//! happens; this is pure evaluation.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - Q/Esc: Quit
//!
//! Per-episode results are printed after the terminal is restored, so they
//! stay readable in the scrollback.

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{stderr, Stderr},
    path::Path,
    time::Duration,
};
use tokio::time::interval;

use crate::game::{GameConfig, Layout, TerminationReason};
use crate::render::{Renderer, WatchHud};
use crate::rl::{load_agent, DqnAgent, PacmanEnvironment, StateVector};

/// Result of one evaluation episode
#[derive(Debug, Clone)]
struct EpisodeResult {
    steps: usize,
    total_reward: f32,
    score: u32,
    outcome: Option<TerminationReason>,
}

/// Watch mode: greedy evaluation of a trained agent in a TUI
pub struct WatchMode<B: AutodiffBackend> {
    /// Trained agent, with epsilon forced to zero
    agent: DqnAgent<B>,

    /// Maze environment
    env: PacmanEnvironment,

    /// Renderer for TUI display
    renderer: Renderer,

    /// Number of episodes to play
    num_episodes: usize,

    /// Environment steps per second
    fps: u32,

    /// Base seed; episode i runs with seed `seed + i`
    seed: u64,

    /// Finished episode results, printed after cleanup
    results: Vec<EpisodeResult>,

    /// Whether to quit the visualization
    should_quit: bool,

    /// Whether playback is paused
    paused: bool,
}

impl<B: AutodiffBackend> WatchMode<B> {
    /// Load a checkpoint and prepare the evaluation environment
    ///
    /// Fails if the checkpoint is missing or does not match the layout's
    /// observation size.
    pub fn new(
        model_path: &Path,
        game_config: GameConfig,
        layout: Layout,
        num_episodes: usize,
        fps: u32,
        seed: u64,
        device: B::Device,
    ) -> Result<Self> {
        let mut agent = load_agent::<B>(model_path, &device)
            .with_context(|| format!("No valid checkpoint found at {:?}", model_path))?;

        let env = PacmanEnvironment::new(game_config, layout, seed);
        anyhow::ensure!(
            agent.state_dim() == env.state_dim(),
            "checkpoint was trained for observation size {}, but this maze produces {}",
            agent.state_dim(),
            env.state_dim(),
        );
        anyhow::ensure!(
            agent.num_actions() == env.num_actions(),
            "checkpoint was trained for {} actions, but this game has {}",
            agent.num_actions(),
            env.num_actions(),
        );

        // Greedy evaluation
        agent.set_epsilon(0.0);

        println!("{}", "=".repeat(60));
        println!("Loaded Checkpoint");
        println!("{}", "=".repeat(60));
        println!("Model path: {:?}", model_path);
        println!("Episodes trained: {}", agent.episode_count());
        println!("Training steps: {}", agent.step_count());
        println!("{}", "=".repeat(60));
        println!();

        Ok(Self {
            agent,
            env,
            renderer: Renderer::new(),
            num_episodes,
            fps,
            seed,
            results: Vec::new(),
            should_quit: false,
            paused: false,
        })
    }

    /// Run the evaluation loop
    ///
    /// Sets up the terminal, plays the configured number of episodes, cleans
    /// up, and prints the per-episode results.
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_watch_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;
        self.print_results();

        result
    }

    /// Main evaluation loop
    async fn run_watch_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Environment ticks at the requested speed, frames at 30 FPS
        let mut tick_timer = interval(Duration::from_secs_f64(1.0 / self.fps as f64));
        let mut render_timer = interval(Duration::from_millis(33));

        let mut episode = 0usize;
        let mut obs = self.start_episode(episode);
        let mut episode_reward = 0.0f32;
        let mut done = false;
        // Ticks spent lingering on the end-of-episode screen
        let mut linger = 0u32;

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    if self.paused {
                        // Skip
                    } else if done {
                        // Hold the summary screen for about a second
                        linger += 1;
                        if linger >= self.fps {
                            episode += 1;
                            if episode >= self.num_episodes {
                                self.should_quit = true;
                            } else {
                                obs = self.start_episode(episode);
                                episode_reward = 0.0;
                                done = false;
                                linger = 0;
                            }
                        }
                    } else {
                        let action = self.agent.greedy_action(&obs);
                        let (next_obs, reward, terminated) = self.env.step(action);
                        episode_reward += reward;
                        obs = next_obs;

                        if terminated {
                            done = true;
                            self.record_episode(episode_reward);
                        }
                    }
                }

                _ = render_timer.tick() => {
                    let hud = WatchHud {
                        episode: episode + 1,
                        total_episodes: self.num_episodes,
                        episode_reward,
                        paused: self.paused,
                        outcome: if done { self.env.termination() } else { None },
                    };
                    if let Some(state) = self.env.state() {
                        terminal.draw(|frame| {
                            self.renderer.render(frame, state, &hud);
                        }).context("Failed to draw frame")?;
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Reseed and reset the environment for episode `index`
    fn start_episode(&mut self, index: usize) -> StateVector {
        self.env.set_seed(self.seed.wrapping_add(index as u64));
        self.env.reset()
    }

    /// Record the result of the episode that just finished
    fn record_episode(&mut self, total_reward: f32) {
        let state = self.env.state().expect("episode just ran");
        self.results.push(EpisodeResult {
            steps: state.steps as usize,
            total_reward,
            score: state.score,
            outcome: self.env.termination(),
        });
    }

    /// Handle keyboard events
    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char(' ') => {
                    self.paused = !self.paused;
                }
                _ => {}
            }
        }
    }

    /// Print per-episode results and a summary line
    fn print_results(&self) {
        for (i, result) in self.results.iter().enumerate() {
            let outcome = match result.outcome {
                Some(TerminationReason::Cleared) => "cleared",
                Some(TerminationReason::Caught) => "caught",
                Some(TerminationReason::TimedOut) => "timed out",
                None => "incomplete",
            };
            println!(
                "[Episode {}] Steps: {}, Score: {}, Total Reward: {:.2} ({})",
                i + 1,
                result.steps,
                result.score,
                result.total_reward,
                outcome,
            );
        }

        if !self.results.is_empty() {
            let n = self.results.len() as f32;
            let mean_reward: f32 =
                self.results.iter().map(|r| r.total_reward).sum::<f32>() / n;
            let wins = self
                .results
                .iter()
                .filter(|r| r.outcome == Some(TerminationReason::Cleared))
                .count();
            println!();
            println!(
                "Mean reward over {} episodes: {:.2} | Cleared: {}/{}",
                self.results.len(),
                mean_reward,
                wins,
                self.results.len(),
            );
        }
    }

    /// Cleanup terminal state
    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
