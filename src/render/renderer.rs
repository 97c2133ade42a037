use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Position, TerminationReason};

/// Per-episode information shown around the maze while watching an agent
pub struct WatchHud {
    pub episode: usize,
    pub total_episodes: usize,
    pub episode_reward: f32,
    pub paused: bool,
    pub outcome: Option<TerminationReason>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, hud: &WatchHud) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Maze area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(chunks[0], state, hud);
        frame.render_widget(stats, chunks[0]);

        // Center the maze horizontally
        let maze_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if state.game_over {
            let summary = self.render_episode_end(maze_area, state, hud);
            frame.render_widget(summary, maze_area);
        } else {
            let maze = self.render_maze(maze_area, state);
            frame.render_widget(maze, maze_area);
        }

        let controls = self.render_controls(chunks[2], hud);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_maze(&self, _area: Rect, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::new();

        for y in 0..state.layout.height() {
            let mut spans = Vec::new();

            for x in 0..state.layout.width() {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.player {
                    Span::styled(
                        "C ",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if let Some(ghost) = state.ghosts.iter().find(|g| g.position == pos) {
                    if ghost.mode.is_frightened() {
                        Span::styled("m ", Style::default().fg(Color::Blue))
                    } else {
                        Span::styled(
                            "M ",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        )
                    }
                } else if state.is_wall(pos) {
                    Span::styled("██", Style::default().fg(Color::DarkGray))
                } else if state.power_pellets.contains(&pos) {
                    Span::styled(
                        "o ",
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.pellets.contains(&pos) {
                    Span::styled("· ", Style::default().fg(Color::Gray))
                } else {
                    Span::raw("  ")
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Pac-Man "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, _area: Rect, state: &GameState, hud: &WatchHud) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Episode: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}/{}", hud.episode, hud.total_episodes),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Reward: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:.2}", hud.episode_reward),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.steps.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Pellets left: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.pellets_remaining().to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_episode_end(
        &self,
        _area: Rect,
        state: &GameState,
        hud: &WatchHud,
    ) -> Paragraph<'_> {
        let (title, color) = match hud.outcome {
            Some(TerminationReason::Cleared) => ("MAZE CLEARED", Color::Green),
            Some(TerminationReason::Caught) => ("CAUGHT", Color::Red),
            Some(TerminationReason::TimedOut) => ("OUT OF TIME", Color::Yellow),
            None => ("EPISODE OVER", Color::White),
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Total Reward: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{:.2}", hud.episode_reward),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Next episode starting...",
                Style::default().fg(Color::Gray),
            )]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self, _area: Rect, hud: &WatchHud) -> Paragraph<'_> {
        let pause_label = if hud.paused { "resume" } else { "pause" };
        let text = vec![Line::from(vec![
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" to {pause_label} | ")),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
