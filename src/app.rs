//! Application event loop
//!
//! One `select!` loop is the session's single logical thread of control:
//! terminal input, exchange outcomes, and the loading-indicator pulse all
//! funnel through it, so state only ever changes in one place.

use crate::archive::AnswerService;
use crate::runtime::SessionRuntime;
use crate::session::Event;
use crate::ui::{self, InputAction, InputBuffer, ScrollState};
use crossterm::event::{
    Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Lines moved per scroll step
const SCROLL_STEP: usize = 3;
/// Loading indicator animation cadence
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// What one turn of the loop produced
enum Step {
    Terminal(TermEvent),
    Outcome(Event),
    Pulse,
    Quit,
}

pub struct App<A: AnswerService + 'static> {
    runtime: SessionRuntime<A>,
    outcome_rx: mpsc::Receiver<Event>,
    input: InputBuffer,
    scroll: ScrollState,
    tick: usize,
    running: bool,
}

impl<A: AnswerService + 'static> App<A> {
    pub fn new(service: A) -> Self {
        let (tx, rx) = mpsc::channel(32);
        Self {
            runtime: SessionRuntime::new(service, tx),
            outcome_rx: rx,
            input: InputBuffer::default(),
            scroll: ScrollState::default(),
            tick: 0,
            running: true,
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let mut term_events = EventStream::new();
        let mut ticker = tokio::time::interval(TICK_INTERVAL);

        while self.running {
            terminal.draw(|frame| {
                ui::draw(
                    frame,
                    self.runtime.conversation(),
                    self.runtime.state(),
                    &mut self.input,
                    &mut self.scroll,
                    self.tick,
                );
            })?;

            let step = tokio::select! {
                maybe_event = term_events.next() => match maybe_event {
                    Some(Ok(event)) => Step::Terminal(event),
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal event stream failed");
                        Step::Quit
                    }
                    None => Step::Quit,
                },
                Some(outcome) = self.outcome_rx.recv() => Step::Outcome(outcome),
                _ = ticker.tick() => Step::Pulse,
            };

            match step {
                Step::Terminal(event) => self.on_terminal_event(event),
                Step::Outcome(outcome) => self.runtime.handle(outcome),
                Step::Pulse => self.tick = self.tick.wrapping_add(1),
                Step::Quit => self.running = false,
            }
        }

        Ok(())
    }

    fn on_terminal_event(&mut self, event: TermEvent) {
        match event {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
            TermEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll.scroll_up(SCROLL_STEP),
                MouseEventKind::ScrollDown => self.scroll.scroll_down(SCROLL_STEP),
                _ => {}
            },
            _ => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
                return;
            }
            KeyCode::PageUp => {
                self.scroll.scroll_up(SCROLL_STEP);
                return;
            }
            KeyCode::PageDown => {
                self.scroll.scroll_down(SCROLL_STEP);
                return;
            }
            _ => {}
        }

        match self.input.apply_key(&self.runtime.state().draft, key) {
            Some(InputAction::Edited { text }) => {
                self.runtime.handle(Event::DraftChanged { text });
            }
            Some(InputAction::Submit) => self.runtime.handle(Event::SubmitRequested),
            None => {}
        }
    }
}
