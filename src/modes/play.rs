use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{info, warn};

use crate::challenge::Challenge;
use crate::config::{AppConfig, Features, fresh_seed, load_config, save_config};
use crate::game::{GameConfig, Session, TickClock};
use crate::input::{InputHandler, KeyAction};
use crate::render::{OVERLAY_ROWS, Renderer, View};
use crate::storage::{Leaderboard, ScoreKeeper, StoreError, unix_now};

/// Frame pacing; ticks run on their own clock inside frames
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const TOAST_DURATION: Duration = Duration::from_secs(2);

struct Toast {
    text: String,
    until: Instant,
}

/// Interactive game in the terminal
pub struct PlayMode {
    session: Session,
    clock: TickClock,
    keeper: ScoreKeeper,
    /// Settings the next game starts with; theme and overlay alpha apply at once
    config: AppConfig,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Open leaderboard overlay
    leaderboard: Option<Leaderboard>,
    toast: Option<Toast>,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: AppConfig, keeper: ScoreKeeper) -> Self {
        let game = config.game_config();
        let best = keeper.load_best(game.profile);
        info!(
            profile = game.profile,
            seed = game.seed,
            cols = game.cols,
            rows = game.rows,
            wrap = game.wrap,
            speed_ms = game.speed_ms,
            best,
            "starting session"
        );

        Self {
            session: Session::new(game, best),
            clock: TickClock::new(Instant::now()),
            keeper,
            config,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            leaderboard: None,
            toast: None,
            should_quit: false,
        }
    }

    fn features(&self) -> Features {
        self.keeper.features()
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);
        self.clock.reset(Instant::now());

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Advance and draw one frame
                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    self.update(now);
                    let view = self.view(now);
                    let renderer = &self.renderer;
                    terminal.draw(|frame| {
                        renderer.render(frame, &view);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.apply(KeyAction::Quit, Instant::now());
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.apply(action, Instant::now());
        }
    }

    /// Run at most one tick if one is due
    fn update(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.until) {
            self.toast = None;
        }

        if !self.session.is_running() || self.leaderboard.is_some() {
            return;
        }
        let interval = Duration::from_millis(u64::from(self.session.tick_ms));
        if !self.clock.due(now, interval) {
            return;
        }

        let result = self.session.step();
        if result.terminated {
            self.on_game_over();
        }
    }

    fn on_game_over(&mut self) {
        match self.keeper.record_game_over(&self.session, unix_now()) {
            Ok(report) if report.new_best => {
                self.show_toast(format!("New best: {}", self.session.best), Instant::now());
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to record game over"),
        }
    }

    fn apply(&mut self, action: KeyAction, now: Instant) {
        match action {
            KeyAction::Move(direction) => {
                if self.leaderboard.is_none() {
                    self.session.set_direction(direction);
                }
            }
            KeyAction::TogglePause => {
                self.session.toggle_pause();
                self.clock.reset(now);
            }
            KeyAction::Restart => {
                self.flush_best();
                self.adopt_settings();
                self.session.restart();
                self.clock.reset(now);
            }
            KeyAction::NewGame => {
                self.flush_best();
                self.adopt_settings();
                self.session.new_game(fresh_seed());
                self.clock.reset(now);
                info!(seed = self.session.config.seed, "new game");
            }
            KeyAction::ToggleWrap => {
                self.config.wrap = !self.config.wrap;
                let state = if self.config.wrap { "on" } else { "off" };
                self.show_toast(format!("Wrap {state} from the next game"), now);
            }
            KeyAction::Faster | KeyAction::Slower => {
                self.config.step_speed(action == KeyAction::Slower);
                let speed = self.config.speed_ms;
                self.show_toast(format!("Speed {speed} ms from the next game"), now);
            }
            KeyAction::AlphaDown | KeyAction::AlphaUp => {
                self.config.step_overlay_alpha(action == KeyAction::AlphaUp);
                let alpha = self.config.overlay_alpha;
                self.show_toast(format!("Overlay alpha {alpha}"), now);
            }
            KeyAction::PrevPreset | KeyAction::NextPreset => {
                self.config.cycle_preset(action == KeyAction::NextPreset);
                // Records and challenge codes carry the theme in use
                self.session.config.preset = self.config.preset;
                let preset = self.config.preset;
                self.show_toast(format!("Preset {preset}"), now);
            }
            KeyAction::ReloadConfig => self.reload_config(now),
            KeyAction::ResetDefaults => {
                self.config.reset_to_defaults();
                self.session.config.preset = self.config.preset;
                self.show_toast("Defaults restored".to_string(), now);
            }
            KeyAction::CopyChallenge => {
                if self.features().challenge {
                    let code = Challenge::from_config(&self.session.config).to_string();
                    info!(code = %code, "challenge code");
                    self.show_toast(format!("Challenge: {code}"), now);
                }
            }
            KeyAction::ToggleLeaderboard => {
                if self.features().leaderboard {
                    self.toggle_leaderboard(now);
                }
            }
            KeyAction::ExportHtml => {
                if self.features().leaderboard {
                    let result = self.keeper.export_html();
                    self.report_export(result, now);
                }
            }
            KeyAction::ExportJson => {
                if self.features().leaderboard {
                    let result = self.keeper.export_json();
                    self.report_export(result, now);
                }
            }
            KeyAction::SaveConfig => {
                let path = self.keeper.paths().config(self.session.config.profile);
                match save_config(&self.config, &path) {
                    Ok(()) => self.show_toast(format!("Saved {}", path.display()), now),
                    Err(e) => {
                        warn!(error = %e, "failed to save config");
                        self.show_toast("Config save failed".to_string(), now);
                    }
                }
            }
            KeyAction::Back => {
                if self.leaderboard.is_some() {
                    self.toggle_leaderboard(now);
                } else {
                    self.quit();
                }
            }
            KeyAction::Quit => self.quit(),
            KeyAction::None => {}
        }
    }

    /// Start the next board from the current settings, keeping the session seed
    fn adopt_settings(&mut self) {
        self.session.config = GameConfig {
            seed: self.session.config.seed,
            ..self.config.game_config()
        };
    }

    /// Load the profile's file onto a copy so a failed read changes nothing
    fn reload_config(&mut self, now: Instant) {
        let path = self.keeper.paths().config(self.config.profile);
        let mut reloaded = self.config.clone();
        match load_config(&mut reloaded, &path) {
            Ok(true) => {
                self.config = reloaded;
                self.session.config.preset = self.config.preset;
                self.show_toast(format!("Reloaded {}", path.display()), now);
            }
            Ok(false) => self.show_toast("No saved config".to_string(), now),
            Err(e) => {
                warn!(error = %e, "failed to reload config");
                self.show_toast("Config reload failed".to_string(), now);
            }
        }
    }

    fn toggle_leaderboard(&mut self, now: Instant) {
        if self.leaderboard.take().is_some() {
            self.clock.reset(now);
            return;
        }
        let board = self.keeper.leaderboard().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load leaderboard");
            Leaderboard::default()
        });
        self.leaderboard = Some(board);
    }

    fn report_export(&mut self, result: Result<PathBuf, StoreError>, now: Instant) {
        match result {
            Ok(path) => self.show_toast(format!("Exported {}", path.display()), now),
            Err(e) => {
                warn!(error = %e, "export failed");
                self.show_toast("Export failed".to_string(), now);
            }
        }
    }

    fn show_toast(&mut self, text: String, now: Instant) {
        self.toast = Some(Toast {
            text,
            until: now + TOAST_DURATION,
        });
    }

    /// Bank the current score and persist the best if it improved
    fn flush_best(&mut self) {
        self.session.bank_score();
        if let Err(e) = self.keeper.save_best(&self.session) {
            warn!(error = %e, "failed to save best score");
        }
    }

    fn quit(&mut self) {
        self.flush_best();
        self.should_quit = true;
    }

    fn view(&self, now: Instant) -> View<'_> {
        View {
            snapshot: self.session.snapshot(),
            theme: self.config.active_theme(),
            overlay_alpha: self.config.overlay_alpha,
            leaderboard: self.leaderboard.as_ref().map(|b| b.top(OVERLAY_ROWS)),
            toast: self
                .toast
                .as_ref()
                .filter(|t| now < t.until)
                .map(|t| t.text.as_str()),
            next_wrap: self.config.wrap,
            show_profile: self.features().profiles,
        }
    }

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Status};
    use crate::storage::DataPaths;
    use tempfile::TempDir;

    fn mode(dir: &TempDir, features: Features) -> PlayMode {
        let config = AppConfig {
            seed: 9,
            cols: 16,
            rows: 12,
            ..AppConfig::default()
        };
        let keeper = ScoreKeeper::new(DataPaths::in_dir(dir.path()), features, "tester");
        PlayMode::new(config, keeper)
    }

    fn later(ms: u64) -> Instant {
        Instant::now() + Duration::from_millis(ms)
    }

    /// Put a wall right in front of the head so the next tick ends the game
    fn block_head(mode: &mut PlayMode) {
        let ahead = mode
            .session
            .snake
            .head()
            .moved_in_direction(mode.session.snake.direction);
        mode.session.walls.insert(ahead);
        mode.session.food = crate::game::Position::new(1, 1);
    }

    #[test]
    fn test_game_initialization() {
        let dir = TempDir::new().unwrap();
        let mode = mode(&dir, Features::full());
        assert!(mode.session.is_running());
        assert_eq!(mode.session.score, 0);
        assert_eq!(mode.session.config.seed, 9);
        assert_eq!(mode.session.config.cols, 16);
    }

    #[test]
    fn test_one_tick_per_frame() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());
        mode.session.food = crate::game::Position::new(1, 1);

        // Far past several intervals, still only one tick per update
        mode.update(later(1000));
        assert_eq!(mode.session.steps, 1);
        mode.update(later(1000));
        assert_eq!(mode.session.steps, 2);
    }

    #[test]
    fn test_leaderboard_overlay_blocks_ticks() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());

        mode.apply(KeyAction::ToggleLeaderboard, Instant::now());
        assert!(mode.leaderboard.is_some());
        mode.update(later(1000));
        assert_eq!(mode.session.steps, 0);

        // Esc closes the overlay before it quits
        mode.apply(KeyAction::Back, Instant::now());
        assert!(mode.leaderboard.is_none());
        assert!(!mode.should_quit);
        mode.apply(KeyAction::Back, Instant::now());
        assert!(mode.should_quit);
    }

    #[test]
    fn test_pause_blocks_ticks() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());

        mode.apply(KeyAction::TogglePause, Instant::now());
        mode.update(later(1000));
        assert_eq!(mode.session.steps, 0);
        assert_eq!(mode.session.status, Status::Paused);

        // Direction intake still works while paused
        mode.apply(KeyAction::Move(Direction::Up), Instant::now());
        assert_eq!(mode.session.pending_direction, Direction::Up);
    }

    #[test]
    fn test_game_over_is_recorded() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());
        mode.session.score = 4;
        block_head(&mut mode);

        mode.update(later(1000));

        assert!(mode.session.is_over());
        assert_eq!(mode.keeper.load_best(1), 4);
        let board = mode.keeper.leaderboard().unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board.entries[0].name, "tester");
        assert_eq!(board.entries[0].seed, 9);
        assert!(mode.toast.is_some());
    }

    #[test]
    fn test_classic_records_best_only() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::classic());
        mode.session.score = 2;
        block_head(&mut mode);

        mode.update(later(1000));
        mode.apply(KeyAction::ToggleLeaderboard, Instant::now());
        mode.apply(KeyAction::CopyChallenge, Instant::now());

        assert_eq!(mode.keeper.load_best(1), 2);
        assert!(!mode.keeper.paths().leaderboard().exists());
        assert!(mode.leaderboard.is_none());
        assert!(
            mode.toast
                .as_ref()
                .is_none_or(|t| !t.text.starts_with("Challenge"))
        );
    }

    #[test]
    fn test_quit_flushes_best() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());
        mode.session.score = 7;

        mode.apply(KeyAction::Quit, Instant::now());

        assert!(mode.should_quit);
        assert_eq!(mode.keeper.load_best(1), 7);
        // Quitting mid-game does not write a leaderboard record
        assert!(!mode.keeper.paths().leaderboard().exists());
    }

    #[test]
    fn test_restart_keeps_seed_and_new_game_changes_it() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());
        mode.session.score = 3;

        mode.apply(KeyAction::Restart, Instant::now());
        assert_eq!(mode.session.score, 0);
        assert_eq!(mode.session.best, 3);
        assert_eq!(mode.session.config.seed, 9);

        mode.apply(KeyAction::NewGame, Instant::now());
        assert_eq!(mode.session.score, 0);
        assert_eq!(mode.keeper.load_best(1), 3);
    }

    #[test]
    fn test_wrap_toggle_applies_to_next_game() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());
        assert!(!mode.session.config.wrap);

        mode.apply(KeyAction::ToggleWrap, Instant::now());
        assert!(!mode.session.config.wrap);
        assert!(mode.config.wrap);

        mode.apply(KeyAction::Restart, Instant::now());
        assert!(mode.session.config.wrap);
    }

    #[test]
    fn test_challenge_toast_expires() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());
        let now = Instant::now();

        mode.apply(KeyAction::CopyChallenge, now);
        let view = mode.view(now);
        assert_eq!(view.toast, Some("Challenge: v1:9:16:12:0:120:0"));

        assert!(mode.view(now + TOAST_DURATION).toast.is_none());
        mode.update(now + TOAST_DURATION);
        assert!(mode.toast.is_none());
    }

    #[test]
    fn test_save_config_and_exports() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());

        mode.apply(KeyAction::SaveConfig, Instant::now());
        mode.apply(KeyAction::ExportHtml, Instant::now());
        mode.apply(KeyAction::ExportJson, Instant::now());

        let paths = mode.keeper.paths();
        let saved = std::fs::read_to_string(paths.config(1)).unwrap();
        assert!(saved.contains("cols = 16"));
        assert!(paths.leaderboard_html().exists());
        assert!(paths.leaderboard_json().exists());
    }

    #[test]
    fn test_speed_change_waits_for_next_game() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());

        mode.apply(KeyAction::Faster, Instant::now());
        mode.apply(KeyAction::Faster, Instant::now());
        assert_eq!(mode.config.speed_ms, 110);
        assert_eq!(mode.session.config.speed_ms, 120);
        assert_eq!(mode.session.tick_ms, 120);

        mode.apply(KeyAction::Restart, Instant::now());
        assert_eq!(mode.session.config.speed_ms, 110);
        assert_eq!(mode.session.tick_ms, 110);
        assert_eq!(mode.session.config.seed, 9);
        assert_eq!(mode.session.config.cols, 16);
    }

    #[test]
    fn test_alpha_and_preset_apply_at_once() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());
        let now = Instant::now();

        mode.apply(KeyAction::AlphaDown, now);
        assert_eq!(mode.view(now).overlay_alpha, 150);

        mode.apply(KeyAction::PrevPreset, now);
        assert_eq!(mode.config.preset, 4);
        assert_eq!(mode.session.config.preset, 4);
        assert_eq!(mode.view(now).theme, crate::config::PRESETS[4]);

        mode.apply(KeyAction::CopyChallenge, now);
        assert_eq!(mode.view(now).toast, Some("Challenge: v1:9:16:12:0:120:4"));

        mode.apply(KeyAction::NextPreset, now);
        assert_eq!(mode.session.config.preset, 0);
    }

    #[test]
    fn test_reload_config_replaces_settings() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());
        let now = Instant::now();

        // Nothing saved yet: settings stay as they are
        mode.apply(KeyAction::Slower, now);
        mode.apply(KeyAction::ReloadConfig, now);
        assert_eq!(mode.config.speed_ms, 125);
        assert_eq!(mode.view(now).toast, Some("No saved config"));

        let path = mode.keeper.paths().config(1);
        std::fs::write(&path, "speed_ms = 200\npreset = 3\nwrap = true\n").unwrap();
        mode.apply(KeyAction::ReloadConfig, now);
        assert_eq!(mode.config.speed_ms, 200);
        assert_eq!(mode.config.cols, 16);
        assert!(mode.config.wrap);
        assert_eq!(mode.session.config.preset, 3);
        assert!(!mode.session.config.wrap);

        mode.apply(KeyAction::NewGame, now);
        assert!(mode.session.config.wrap);
        assert_eq!(mode.session.tick_ms, 200);
    }

    #[test]
    fn test_reset_defaults_keeps_profile_and_seed() {
        let dir = TempDir::new().unwrap();
        let mut mode = mode(&dir, Features::full());
        let now = Instant::now();
        mode.apply(KeyAction::ToggleWrap, now);
        mode.apply(KeyAction::NextPreset, now);
        mode.apply(KeyAction::AlphaUp, now);

        mode.apply(KeyAction::ResetDefaults, now);

        assert!(!mode.config.wrap);
        assert_eq!(mode.config.preset, 0);
        assert_eq!(mode.session.config.preset, 0);
        assert_eq!(mode.config.overlay_alpha, 160);
        assert_eq!(mode.config.seed, 9);

        // Default board size takes over at the next game
        mode.apply(KeyAction::Restart, now);
        assert_eq!(mode.session.config.cols, 32);
        assert_eq!(mode.session.config.seed, 9);
    }
}
