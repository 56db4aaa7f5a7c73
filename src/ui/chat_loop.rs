//! Main chat event loop and UI state.
//!
//! Runs the full-screen session: draws frames, feeds keystrokes into the
//! session store, and drives submissions. The network call runs on a spawned
//! task; its outcome comes back over an mpsc channel and is applied between
//! frames, so the event loop itself never blocks on the backend.

use std::{error::Error, io, sync::Arc, time::Duration, time::Instant};

use ratatui::crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, text::Line, Terminal};
use tokio::sync::{mpsc, Mutex};

use crate::api::client::{GenerationClient, HttpGenerationClient};
use crate::core::session::SessionSnapshot;
use crate::core::submit::{GenerationOutcome, SubmissionController};
use crate::ui::markdown::render_markdown;
use crate::ui::renderer::{ui, user_message_lines};

pub struct ChatApp {
    controller: SubmissionController<HttpGenerationClient>,
    endpoint: String,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub pulse_start: Instant,
}

impl ChatApp {
    pub fn new(endpoint: String) -> Self {
        let controller = SubmissionController::new(HttpGenerationClient::new(&endpoint));
        Self {
            controller,
            endpoint,
            scroll_offset: 0,
            auto_scroll: true,
            pulse_start: Instant::now(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        self.controller.snapshot()
    }

    pub fn insert_char(&mut self, c: char) {
        let mut draft = self.controller.session().draft().to_string();
        draft.push(c);
        self.controller.session_mut().set_draft(draft);
    }

    pub fn backspace(&mut self) {
        let mut draft = self.controller.session().draft().to_string();
        draft.pop();
        self.controller.session_mut().set_draft(draft);
    }

    /// Optimistic half of a submit. Returns the prompt and a client handle
    /// when the preconditions pass; the caller owns the network call.
    pub fn begin_submit(&mut self) -> Option<(String, HttpGenerationClient)> {
        let prompt = self.controller.take_prompt().ok()?;
        self.pulse_start = Instant::now();
        Some((prompt, self.controller.client().clone()))
    }

    pub fn finish_submit(&mut self, outcome: GenerationOutcome) {
        self.controller.complete(outcome);
    }

    pub fn build_display_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for msg in self.controller.session().transcript() {
            if msg.is_user() {
                lines.extend(user_message_lines(&msg.content));
            } else {
                lines.extend(render_markdown(&msg.content));
            }
            lines.push(Line::from("")); // Empty line for spacing
        }
        lines
    }

    pub fn calculate_max_scroll_offset(&self, available_height: u16) -> u16 {
        let total_lines = self.build_display_lines().len() as u16;
        total_lines.saturating_sub(available_height)
    }

    pub fn scroll_to_bottom(&mut self, available_height: u16) {
        self.scroll_offset = self.calculate_max_scroll_offset(available_height);
    }
}

fn transcript_height(terminal_height: u16) -> u16 {
    // 3 rows for the input box, 1 for the transcript title.
    terminal_height.saturating_sub(3).saturating_sub(1)
}

pub async fn run_chat(endpoint: String) -> Result<(), Box<dyn Error>> {
    let app = Arc::new(Mutex::new(ChatApp::new(endpoint)));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Outcomes of spawned generation requests flow back through this channel.
    let (tx, mut rx) = mpsc::unbounded_channel::<GenerationOutcome>();

    let result = loop {
        {
            let app_guard = app.lock().await;
            terminal.draw(|f| ui(f, &app_guard))?;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break Ok(());
                    }
                    KeyCode::Enter => {
                        let started = {
                            let mut app_guard = app.lock().await;
                            app_guard.begin_submit()
                        };
                        if let Some((prompt, client)) = started {
                            let tx_clone = tx.clone();
                            tokio::spawn(async move {
                                let outcome = client.generate(&prompt).await;
                                let _ = tx_clone.send(outcome);
                            });
                        }
                    }
                    KeyCode::Char(c) => {
                        let mut app_guard = app.lock().await;
                        app_guard.insert_char(c);
                    }
                    KeyCode::Backspace => {
                        let mut app_guard = app.lock().await;
                        app_guard.backspace();
                    }
                    KeyCode::Up => {
                        let mut app_guard = app.lock().await;
                        app_guard.auto_scroll = false;
                        app_guard.scroll_offset = app_guard.scroll_offset.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        let mut app_guard = app.lock().await;
                        let height = transcript_height(terminal.size()?.height);
                        let max_scroll = app_guard.calculate_max_scroll_offset(height);
                        app_guard.scroll_offset =
                            app_guard.scroll_offset.saturating_add(1).min(max_scroll);
                        if app_guard.scroll_offset >= max_scroll {
                            app_guard.auto_scroll = true;
                        }
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        let mut app_guard = app.lock().await;
                        app_guard.auto_scroll = false;
                        app_guard.scroll_offset = app_guard.scroll_offset.saturating_sub(3);
                    }
                    MouseEventKind::ScrollDown => {
                        let mut app_guard = app.lock().await;
                        let height = transcript_height(terminal.size()?.height);
                        let max_scroll = app_guard.calculate_max_scroll_offset(height);
                        app_guard.scroll_offset =
                            app_guard.scroll_offset.saturating_add(3).min(max_scroll);
                        if app_guard.scroll_offset >= max_scroll {
                            app_guard.auto_scroll = true;
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        // Apply resolved submissions between frames.
        while let Ok(outcome) = rx.try_recv() {
            let mut app_guard = app.lock().await;
            app_guard.finish_submit(outcome);
            if app_guard.auto_scroll {
                let height = transcript_height(terminal.size()?.height);
                app_guard.scroll_to_bottom(height);
            }
        }
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
