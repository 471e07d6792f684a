//! Menu and game loop.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use calcsweeper_core::{ActionOutcome, Difficulty, GameError, GameSession, Millis};
use crossterm::event::{self, Event};

use crate::keys::{self, GameKey, MenuKey};
use crate::render;
use crate::terminal::TerminalGuard;

/// Redraw interval so the timer keeps ticking without input.
const FRAME: Duration = Duration::from_millis(250);

enum Screen {
    Menu(Difficulty),
    Playing(GameSession),
}

pub struct App {
    seed: u64,
    rounds: u64,
    screen: Screen,
    clock: Instant,
}

impl App {
    pub fn new(seed: u64, difficulty: Option<Difficulty>) -> Self {
        let mut app = Self {
            seed,
            rounds: 0,
            screen: Screen::Menu(Difficulty::default()),
            clock: Instant::now(),
        };
        if let Some(difficulty) = difficulty {
            app.start_round(difficulty);
        }
        app
    }

    fn now(&self) -> Millis {
        self.clock.elapsed().as_millis() as Millis
    }

    fn start_round(&mut self, difficulty: Difficulty) {
        // a fresh board per round while keeping a forced seed reproducible
        let seed = self.seed.wrapping_add(self.rounds);
        self.rounds += 1;
        log::info!("Starting {} round {}, seed: {}", difficulty.label(), self.rounds, seed);
        self.screen = Screen::Playing(GameSession::new(difficulty, seed));
    }

    pub fn run(mut self) -> Result<()> {
        let _guard = TerminalGuard::enter()?;
        let mut out = io::stdout();

        let mut redraw = true;
        loop {
            if redraw {
                self.draw(&mut out)?;
            }

            if !event::poll(FRAME)? {
                // the timer still has to tick
                redraw = true;
                continue;
            }
            let key = match event::read()? {
                Event::Key(key) => key,
                other => {
                    redraw = matches!(other, Event::Resize(..));
                    continue;
                }
            };

            let step = match &mut self.screen {
                Screen::Menu(selected) => match keys::menu_key(key) {
                    Some(MenuKey::Previous) => {
                        *selected = selected.prev();
                        Some(true)
                    }
                    Some(MenuKey::Next) => {
                        *selected = selected.next();
                        Some(true)
                    }
                    Some(MenuKey::Select) => {
                        let difficulty = *selected;
                        self.start_round(difficulty);
                        Some(true)
                    }
                    Some(MenuKey::Quit) => None,
                    None => Some(false),
                },
                Screen::Playing(session) => {
                    let finished = session.is_finished();
                    match keys::game_key(key, finished) {
                        Some(GameKey::Play(action)) => {
                            let now = self.clock.elapsed().as_millis() as Millis;
                            match session.apply(action, now) {
                                Ok(outcome) => {
                                    match outcome {
                                        ActionOutcome::Won => {
                                            log::info!("Won round {}", self.rounds)
                                        }
                                        ActionOutcome::Lost => {
                                            log::info!("Lost round {}", self.rounds)
                                        }
                                        _ => log::trace!("{:?} -> {:?}", action, outcome),
                                    }
                                    Some(outcome.has_update())
                                }
                                Err(GameError::AlreadyEnded) => {
                                    log::debug!("Ignoring {:?} after game end", action);
                                    Some(false)
                                }
                                Err(err) => return Err(err.into()),
                            }
                        }
                        Some(GameKey::Continue) => {
                            let difficulty = session.difficulty().unwrap_or_default();
                            self.screen = Screen::Menu(difficulty);
                            Some(true)
                        }
                        Some(GameKey::Quit) => None,
                        None => Some(false),
                    }
                }
            };

            // `None` quits, otherwise whether the screen changed
            let Some(changed) = step else {
                log::info!("Quit after {} rounds", self.rounds);
                return Ok(());
            };
            redraw = changed;
        }
    }

    fn draw(&self, out: &mut Stdout) -> Result<()> {
        match &self.screen {
            Screen::Menu(selected) => render::draw_menu(out, *selected),
            Screen::Playing(session) => render::draw_game(out, session, self.now()),
        }
    }
}
