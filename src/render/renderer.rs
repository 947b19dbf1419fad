use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table},
};

use crate::config::{Rgb, Theme};
use crate::game::{Position, Snapshot, Status};
use crate::storage::LeaderboardEntry;

/// Rows shown in the leaderboard overlay
pub const OVERLAY_ROWS: usize = 20;

/// Everything a frame needs besides the terminal
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub snapshot: Snapshot<'a>,
    pub theme: Theme,
    /// Opacity of the dimming behind overlays (0..=255)
    pub overlay_alpha: u32,
    /// Open leaderboard overlay: the ranked top entries to list
    pub leaderboard: Option<&'a [LeaderboardEntry]>,
    /// Transient footer message
    pub toast: Option<&'a str>,
    /// Wrap setting the next game will start with
    pub next_wrap: bool,
    pub show_profile: bool,
}

impl View<'_> {
    fn has_overlay(&self) -> bool {
        self.leaderboard.is_some() || self.snapshot.status != Status::Running
    }

    /// Factor applied to board colors while an overlay is up
    fn dim_factor(&self) -> f32 {
        if self.has_overlay() {
            1.0 - self.overlay_alpha.min(255) as f32 / 255.0
        } else {
            1.0
        }
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &View) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(view), chunks[0]);

        let board = board_rect(chunks[1], view.snapshot.cols, view.snapshot.rows);
        frame.render_widget(self.render_grid(view), board);

        if let Some(entries) = view.leaderboard {
            let area = centered_rect(chunks[1], 64, (OVERLAY_ROWS as u16) + 4);
            frame.render_widget(Clear, area);
            frame.render_widget(self.render_leaderboard(entries), area);
        } else if view.snapshot.status == Status::Over {
            let area = centered_rect(chunks[1], 40, 8);
            frame.render_widget(Clear, area);
            frame.render_widget(self.render_game_over(view), area);
        } else if view.snapshot.status == Status::Paused {
            let area = centered_rect(chunks[1], 24, 3);
            frame.render_widget(Clear, area);
            frame.render_widget(self.render_paused(), area);
        }

        frame.render_widget(self.render_controls(view), chunks[2]);
    }

    fn render_grid(&self, view: &View) -> Paragraph<'_> {
        let snap = &view.snapshot;
        let dim = view.dim_factor();
        let theme = &view.theme;
        let bg = color(theme.bg.dimmed(dim));
        let head = snap.snake.first().copied();

        let mut lines = Vec::with_capacity(snap.rows as usize);

        for y in 0..snap.rows {
            let mut spans = Vec::with_capacity(snap.cols as usize);

            for x in 0..snap.cols {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == head {
                    Span::styled(
                        "██",
                        Style::default()
                            .fg(color(theme.head.dimmed(dim)))
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snap.snake.contains(&pos) {
                    Span::styled("▓▓", Style::default().fg(color(theme.body.dimmed(dim))))
                } else if pos == snap.food {
                    Span::styled(
                        "<>",
                        Style::default()
                            .fg(color(theme.food.dimmed(dim)))
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snap.walls.contains(&pos) {
                    Span::styled("░░", Style::default().fg(color(theme.grid.dimmed(dim))))
                } else {
                    Span::styled(" ·", Style::default().fg(color(theme.grid.dimmed(dim * 0.5))))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).style(Style::default().bg(bg)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color(theme.grid)))
                .title(format!(" Level {} ", snap.level)),
        )
    }

    fn render_stats(&self, view: &View) -> Paragraph<'_> {
        let snap = &view.snapshot;
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

        let best_label = if view.show_profile {
            format!("Best[P{}]: ", snap.profile)
        } else {
            "Best: ".to_string()
        };

        let text = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snap.score.to_string(), value),
            Span::raw("   "),
            Span::styled(best_label, label),
            Span::styled(snap.best.to_string(), value),
            Span::raw("   "),
            Span::styled("Level: ", label),
            Span::styled(snap.level.to_string(), value),
            Span::raw("   "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", snap.tick_ms), value),
            Span::raw("   "),
            Span::styled("Wrap: ", label),
            Span::styled(if snap.wrap { "On" } else { "Off" }, value),
            Span::raw("   "),
            Span::styled("Seed: ", label),
            Span::styled(snap.seed.to_string(), Style::default().fg(Color::Gray)),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_paused(&self) -> Paragraph<'_> {
        Paragraph::new(Line::from(Span::styled(
            "PAUSED",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
    }

    fn render_game_over(&self, view: &View) -> Paragraph<'_> {
        let snap = &view.snapshot;
        let key = |k: &'static str, c: Color| {
            Span::styled(k, Style::default().fg(c).add_modifier(Modifier::BOLD))
        };

        let text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snap.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(snap.best.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                key("R", Color::Green),
                Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
                key("N", Color::Green),
                Span::styled(" for a new seed", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_leaderboard<'a>(&self, entries: &'a [LeaderboardEntry]) -> Table<'a> {
        let header = Row::new(["#", "Name", "Score", "P", "Grid", "Wrap", "Speed"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows = entries.iter().enumerate().map(|(i, e)| {
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(e.name.as_str()),
                Cell::from(e.score.to_string()),
                Cell::from(e.profile.to_string()),
                Cell::from(format!("{}x{}", e.cols, e.rows)),
                Cell::from(if e.wrap { "On" } else { "Off" }),
                Cell::from(format!("{}ms", e.speed)),
            ])
        });

        Table::new(
            rows,
            [
                Constraint::Length(3),
                Constraint::Min(12),
                Constraint::Length(6),
                Constraint::Length(2),
                Constraint::Length(6),
                Constraint::Length(4),
                Constraint::Length(6),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(" Leaderboard (L/Esc to close) "),
        )
    }

    fn render_controls(&self, view: &View) -> Paragraph<'_> {
        if let Some(toast) = view.toast {
            return Paragraph::new(Line::from(Span::styled(
                toast.to_string(),
                Style::default().fg(Color::Cyan),
            )))
            .alignment(Alignment::Center);
        }

        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
        let mut spans = vec![
            key("↑↓←→/WASD"),
            Span::raw(" move  "),
            key("P"),
            Span::raw(" pause  "),
            key("R/N"),
            Span::raw(" restart/new  "),
            key("T"),
            Span::raw(if view.next_wrap { " wrap:on  " } else { " wrap:off  " }),
        ];
        if view.show_profile {
            spans.extend([
                key("L"),
                Span::raw(" board  "),
                key("C"),
                Span::raw(" challenge  "),
            ]);
        }
        spans.extend([
            key("E/J"),
            Span::raw(" export  "),
            key("K/O"),
            Span::raw(" save/load  "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ]);

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Board area centered in `area`, two terminal columns per cell plus borders
fn board_rect(area: Rect, cols: u32, rows: u32) -> Rect {
    let width = (cols as u16).saturating_mul(2).saturating_add(2);
    let height = (rows as u16).saturating_add(2);
    centered_rect(area, width, height)
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
