//! Math Slice entry point
//!
//! The browser build is driven from `math_slice::web`. Natively this runs a
//! headless demo: the autopilot plays a slice round, then a card deck is
//! dealt and solved, and the results feed level progression.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use math_slice::consts::{MAX_SUBSTEPS, SIM_DT};
    use math_slice::persistence::MemoryStore;
    use math_slice::sim::{CardMatch, Combination, GameEvent, RoundPhase, SliceGame, TickInput, tick};
    use math_slice::{Level, Progress, Question, QuizSession, Settings};

    /// Simulated display frame (slightly uneven, like a real rAF loop)
    const FRAME_DT: [f32; 3] = [0.016, 0.017, 0.0175];

    pub fn run(seed: u64) {
        log::info!("Math Slice (native demo) starting, seed {seed}");

        let mut store = MemoryStore::new();
        let settings = Settings::load(&store);
        let mut progress = Progress::load(&store);
        log::info!("Theme: {}", settings.theme.as_str());

        let questions = vec![
            Question::new("2 + 5", "7"),
            Question::new("9 - 4", "5"),
            Question::new("3 × 4", "12"),
        ];
        let mut session = QuizSession::new(Level::Easy, questions);

        let mut rng = Pcg32::seed_from_u64(seed);
        while let Some(question) = session.current().cloned() {
            let solved = if session.position() % 2 == 1 {
                play_slice_round(seed.wrapping_add(session.position() as u64), question)
            } else {
                play_card_round(&mut rng, &question)
            };
            session.record(solved);
        }

        log::info!(
            "Level {} finished: {}/{} ({}%)",
            session.level.as_str(),
            session.correct(),
            session.total(),
            session.percent()
        );
        if let Some(next) = progress.record_session(&session) {
            log::info!("{} unlocked", next.as_str());
        }
        if let Err(e) = progress.save(&mut store) {
            log::error!("Could not save progress: {e}");
        }
    }

    /// Autopilot slice round; true if the round ended in success
    fn play_slice_round(seed: u64, question: Question) -> bool {
        log::info!("Slice round for \"{}\"", question.prompt);
        let mut game = SliceGame::new(seed, question);
        let input = TickInput {
            idle_mode: true,
            ..TickInput::default()
        };

        let mut accumulator = 0.0_f32;
        let mut frame = 0usize;
        while !game.phase().is_ended() {
            accumulator += FRAME_DT[frame % FRAME_DT.len()];
            frame += 1;

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut game, &input, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
            }

            for event in game.drain_events() {
                match event {
                    GameEvent::HazardTouched { id } => log::debug!("Hazard {id} touched"),
                    GameEvent::RecoveryAnswered { correct, lives } => {
                        log::debug!("Recovery answered (correct: {correct}, lives: {lives})")
                    }
                    GameEvent::ModifierActivated(m) => log::debug!("Modifier {m:?}"),
                    _ => {}
                }
            }
        }

        let RoundPhase::Ended(outcome) = game.phase() else {
            return false;
        };
        log::info!(
            "Round ended: {outcome:?}, score {}, lives {}",
            game.round.score,
            game.round.lives
        );
        outcome == math_slice::sim::Outcome::Success
    }

    /// Deal a deck for the question and flip cards until the pair is found
    fn play_card_round(rng: &mut Pcg32, question: &Question) -> bool {
        let Some(target) = question.target() else {
            log::warn!("\"{}\" has no numeric answer, skipping cards", question.prompt);
            return false;
        };
        let mut cards = CardMatch::deal(target, 8, Combination::Sum, rng);
        log::info!(
            "Card round for \"{}\": {:?}",
            question.prompt,
            cards.deck.cards.iter().map(|c| c.value).collect::<Vec<_>>()
        );

        // Try pairs in order, waiting out the flip-back between misses
        let n = cards.deck.len();
        for a in 0..n {
            for b in (a + 1)..n {
                cards.flip(a);
                cards.flip(b);
                while cards.is_locked() {
                    if let Some(moves) = cards.tick(100.0) {
                        log::info!("Pair found in {moves} moves");
                        return true;
                    }
                }
                if cards.is_solved() {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is math_slice::web::start, this is just to satisfy the compiler
}
