use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use livesearch_core::{update, AppState, DispatcherConfig, EventToken, Msg};
use livesearch_engine::EngineHandle;
use livesearch_logging::search_info;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;

use super::config::{self, Cli};
use super::effects::EffectRunner;
use super::ui;
use super::ui::input::TextInput;
use super::ui::render::RenderContext;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const INPUT_POLL: Duration = Duration::from_millis(50);

pub fn run_app() -> Result<()> {
    let cli = Cli::parse();
    let resolved = config::resolve(&cli)?;
    livesearch_logging::initialize(&resolved.log_destination, resolved.log_level);
    search_info!(
        "Starting base_url={} endpoint={} debounce={:?} ordering={:?}",
        resolved.search.base_url,
        resolved.search.endpoint,
        resolved.dispatcher.debounce,
        resolved.dispatcher.ordering
    );

    let engine = EngineHandle::new(resolved.search).context("failed to set up search client")?;
    let mut app = App::new(resolved.dispatcher, EffectRunner::new(engine));
    app.run()
}

struct App {
    state: AppState,
    input: TextInput,
    effects: EffectRunner,
    last_token: EventToken,
    results_scroll: u16,
}

impl App {
    fn new(config: DispatcherConfig, effects: EffectRunner) -> Self {
        Self {
            state: AppState::with_config(config),
            input: TextInput::default(),
            effects,
            last_token: 0,
            results_scroll: 0,
        }
    }

    fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        // Restore the terminal on every exit path, including a failed clear.
        let result = match terminal.clear() {
            Ok(()) => self.event_loop(&mut terminal),
            Err(err) => Err(err.into()),
        };
        ratatui::restore();

        search_info!("Exiting");
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let (event_tx, event_rx) = mpsc::channel();
        let event_loop_running = Arc::new(AtomicBool::new(true));
        let event_loop_flag = Arc::clone(&event_loop_running);

        let event_thread = thread::spawn(move || -> Result<()> {
            while event_loop_flag.load(Ordering::Relaxed) {
                if event::poll(INPUT_POLL)? {
                    let event = event::read()?;
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
            Ok(())
        });

        self.dispatch(Msg::Loaded);
        let mut pending_events = VecDeque::new();
        let mut needs_draw = true;

        let result: Result<()> = 'event_loop: loop {
            for msg in self.effects.drain_messages() {
                self.dispatch(msg);
            }

            loop {
                match event_rx.try_recv() {
                    Ok(event) => pending_events.push_back(event),
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        break 'event_loop Err(anyhow!("input event channel disconnected"));
                    }
                }
            }

            let mut quit = false;
            while let Some(event) = pending_events.pop_front() {
                match event {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        if self.handle_key(key) {
                            quit = true;
                            break;
                        }
                        needs_draw = true;
                    }
                    Event::Resize(_, _) => needs_draw = true,
                    _ => {}
                }
            }
            if quit {
                break Ok(());
            }

            if self.state.consume_dirty() || needs_draw {
                let view = self.state.view();
                let ctx = RenderContext {
                    view: &view,
                    input: &self.input,
                    results_scroll: self.results_scroll,
                };
                if let Err(err) = terminal.draw(|frame| ui::render::draw(frame, &ctx)) {
                    break Err(err.into());
                }
                needs_draw = false;
            }

            thread::sleep(FRAME_INTERVAL);
        };

        event_loop_running.store(false, Ordering::Relaxed);
        match event_thread.join() {
            Ok(join_result) => join_result?,
            Err(err) => std::panic::resume_unwind(err),
        }

        result
    }

    /// Returns true when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match route_key(&key) {
            KeyRoute::Quit => return true,
            KeyRoute::ScrollUp => {
                self.results_scroll = self
                    .results_scroll
                    .saturating_sub(ui::constants::RESULTS_PAGE);
            }
            KeyRoute::ScrollDown => {
                self.results_scroll = self
                    .results_scroll
                    .saturating_add(ui::constants::RESULTS_PAGE);
            }
            KeyRoute::Field => {
                self.input.apply(key);
                self.last_token += 1;
                self.dispatch(Msg::KeyUp {
                    token: self.last_token,
                    text: self.input.text().to_string(),
                });
            }
        }
        false
    }

    fn dispatch(&mut self, msg: Msg) {
        if matches!(msg, Msg::QueryCompleted { .. }) {
            self.results_scroll = 0;
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.enqueue(effects);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyRoute {
    Quit,
    ScrollUp,
    ScrollDown,
    /// Delivered to the query field as a keyup, edits or not.
    Field,
}

fn route_key(key: &KeyEvent) -> KeyRoute {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => KeyRoute::Quit,
        KeyCode::Char('c') if ctrl => KeyRoute::Quit,
        KeyCode::PageUp => KeyRoute::ScrollUp,
        KeyCode::PageDown => KeyRoute::ScrollDown,
        _ => KeyRoute::Field,
    }
}
