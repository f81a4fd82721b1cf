//! Browser bindings
//!
//! The page owns rendering and DOM events. It forwards pointer input here,
//! calls `frame` once per animation frame, and draws the returned JSON
//! snapshot.

use wasm_bindgen::prelude::*;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::platform::storage::LocalStorage;
use crate::platform::{Control, InputQueue};
use crate::quiz::{Level, Question};
use crate::sim::{CardMatch, Combination, SliceGame, TickInput, tick};
use crate::{Progress, Settings, Theme};

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Logger and panic hook setup
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Math Slice starting...");
}

/// Slice round driven by the page's animation loop
#[wasm_bindgen]
pub struct WebSliceGame {
    game: SliceGame,
    queue: InputQueue,
    accumulator: f32,
    ended_reported: bool,
}

#[wasm_bindgen]
impl WebSliceGame {
    #[wasm_bindgen(constructor)]
    pub fn new(prompt: String, answer: String) -> WebSliceGame {
        let seed = js_sys::Date::now() as u64;
        Self::with_seed(seed, prompt, answer)
    }

    /// Fixed seed for reproducible rounds
    pub fn with_seed(seed: u64, prompt: String, answer: String) -> WebSliceGame {
        Self {
            game: SliceGame::new(seed, Question::new(prompt, answer)),
            queue: InputQueue::new(),
            accumulator: 0.0,
            ended_reported: false,
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.queue.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.queue.pointer_move(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.queue.pointer_up();
    }

    pub fn pause(&mut self) {
        self.queue.control(Control::Pause);
    }

    pub fn resume(&mut self) {
        self.queue.control(Control::Resume);
    }

    /// Answer the recovery question shown after touching a hazard
    pub fn answer(&mut self, answer: String) {
        self.queue.answer(answer);
    }

    /// Recovery prompt while awaiting an answer
    pub fn prompt(&self) -> String {
        self.game.question.prompt.clone()
    }

    /// Operation family of the recovery prompt, for choosing a hint
    pub fn hint(&self) -> String {
        self.game.question.operation().as_str().to_string()
    }

    /// Advance by `dt` seconds of wall time and return the snapshot JSON
    pub fn frame(&mut self, dt: f32) -> Result<String, JsValue> {
        self.accumulator += dt.clamp(0.0, 0.1);

        // Queued input goes into the first substep only
        let mut input = self.queue.drain();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.game, &input, SIM_DT);
            input = TickInput::default();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Events that arrived between substeps wait for the next frame
        if substeps == 0 {
            self.requeue(input);
        }

        serde_json::to_string(&self.game.snapshot()).map_err(to_js)
    }

    /// Events since the last call, as JSON
    pub fn events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.drain_events()).map_err(to_js)
    }

    /// "success", "fail" or empty while the round is live
    pub fn outcome(&mut self) -> String {
        match self.game.phase() {
            crate::sim::RoundPhase::Ended(outcome) => {
                if !self.ended_reported {
                    log::info!("Round over: {outcome:?}, score {}", self.game.round.score);
                    self.ended_reported = true;
                }
                match outcome {
                    crate::sim::Outcome::Success => "success".into(),
                    crate::sim::Outcome::Fail => "fail".into(),
                }
            }
            _ => String::new(),
        }
    }
}

impl WebSliceGame {
    fn requeue(&mut self, input: TickInput) {
        for event in input.pointer {
            match event {
                crate::platform::PointerEvent::Down(p) => self.queue.pointer_down(p.x, p.y),
                crate::platform::PointerEvent::Move(p) => self.queue.pointer_move(p.x, p.y),
                crate::platform::PointerEvent::Up => self.queue.pointer_up(),
            }
        }
        if let Some(control) = input.control {
            self.queue.control(control);
        }
        if let Some(answer) = input.recovery_answer {
            self.queue.answer(answer);
        }
    }
}

/// Card matching game for the browser
#[wasm_bindgen]
pub struct WebCardGame {
    game: CardMatch,
}

#[wasm_bindgen]
impl WebCardGame {
    /// Deal a deck whose single matching pair sums to `target`
    #[wasm_bindgen(constructor)]
    pub fn new(target: f64, size: usize, signed: bool) -> WebCardGame {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(js_sys::Date::now() as u64);
        let combination = if signed { Combination::SignedSum } else { Combination::Sum };
        Self {
            game: CardMatch::deal(target, size, combination, &mut rng),
        }
    }

    /// Flip a card; false if the flip was ignored
    pub fn flip(&mut self, index: usize) -> bool {
        self.game.flip(index)
    }

    pub fn is_face_up(&self, index: usize) -> bool {
        self.game.is_face_up(index)
    }

    /// Advance timers; returns the move count once solved
    pub fn frame(&mut self, dt: f32) -> Option<u32> {
        self.game.tick(f64::from(dt) * 1000.0)
    }

    pub fn pause(&mut self) {
        self.game.pause();
    }

    pub fn resume(&mut self) {
        self.game.resume();
    }

    pub fn state(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game).map_err(to_js)
    }
}

/// Persisted progress and settings
#[wasm_bindgen]
pub struct WebProfile {
    progress: Progress,
    settings: Settings,
    storage: Option<LocalStorage>,
}

#[wasm_bindgen]
impl WebProfile {
    /// Load from LocalStorage, or defaults if storage is unavailable
    pub fn load() -> WebProfile {
        let storage = LocalStorage::open();
        let (progress, settings) = match &storage {
            Some(store) => (Progress::load(store), Settings::load(store)),
            None => {
                log::warn!("LocalStorage unavailable, progress will not persist");
                (Progress::default(), Settings::default())
            }
        };
        Self {
            progress,
            settings,
            storage,
        }
    }

    pub fn is_unlocked(&self, level: &str) -> bool {
        Level::from_str(level).is_some_and(|l| self.progress.is_unlocked(l))
    }

    /// Record a finished level; returns the newly unlocked level name, if any
    pub fn record_result(&mut self, level: &str, percent: u32) -> Result<Option<String>, JsValue> {
        let level = Level::from_str(level).ok_or_else(|| to_js(format!("unknown level {level}")))?;
        let unlocked = self.progress.record_result(level, percent);
        if let Some(store) = self.storage.as_mut() {
            self.progress.save(store).map_err(to_js)?;
        }
        Ok(unlocked.map(|l| l.as_str().to_string()))
    }

    pub fn theme(&self) -> String {
        self.settings.theme.as_str().to_string()
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<(), JsValue> {
        self.settings.theme = Theme::from_str(theme).ok_or_else(|| to_js(format!("unknown theme {theme}")))?;
        if let Some(store) = self.storage.as_mut() {
            self.settings.save(store).map_err(to_js)?;
        }
        Ok(())
    }
}
