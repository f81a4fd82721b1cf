//! Round state and core simulation types
//!
//! Everything the slice loop owns lives here. The loop mutates it only inside
//! `tick`; drivers read it through `snapshot`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SessionClock;
use super::gesture::GestureTracker;
use super::spawn::Spawner;
use crate::consts::*;
use crate::quiz::Question;
use crate::tuning::SliceTuning;

/// How a round finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Fail,
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Objects spawn, move and can be sliced
    Running,
    /// Frozen by an external request
    Paused,
    /// A hazard was touched; waiting for the correct answer
    AwaitingRecovery,
    /// Round over (terminal)
    Ended(Outcome),
}

impl RoundPhase {
    pub fn is_ended(&self) -> bool {
        matches!(self, RoundPhase::Ended(_))
    }
}

/// Moving object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Scorable
    Target,
    /// Forces a recovery question when touched
    Hazard,
}

/// Target categories (drive points and, for specials, modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetCategory {
    Low,
    Mid,
    High,
    /// Grants speed reduction
    SpecialA,
    /// Grants spawn acceleration
    SpecialB,
    /// Grants hazard boost
    SpecialC,
}

impl TargetCategory {
    pub fn is_special(&self) -> bool {
        self.modifier().is_some()
    }

    /// Modifier granted when a target of this category is sliced
    pub fn modifier(&self) -> Option<Modifier> {
        match self {
            TargetCategory::SpecialA => Some(Modifier::SpeedReduction),
            TargetCategory::SpecialB => Some(Modifier::SpawnAcceleration),
            TargetCategory::SpecialC => Some(Modifier::HazardBoost),
            _ => None,
        }
    }
}

/// Whether an object has been sliced (touched is terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitState {
    #[default]
    Untouched,
    Touched,
}

/// A target or hazard flying through the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// `None` for hazards
    pub category: Option<TargetCategory>,
    pub points: u32,
    pub alive: bool,
    pub hit: HitState,
    /// Round clock time at spawn (ms)
    pub spawn_ms: f64,
    /// Opacity (1 = fully visible, fades after being touched)
    pub alpha: f32,
}

impl MovingObject {
    pub fn target(id: u32, category: TargetCategory, points: u32, pos: Vec2, vel: Vec2, spawn_ms: f64) -> Self {
        Self {
            id,
            kind: ObjectKind::Target,
            pos,
            vel,
            radius: TARGET_RADIUS,
            category: Some(category),
            points,
            alive: true,
            hit: HitState::Untouched,
            spawn_ms,
            alpha: 1.0,
        }
    }

    pub fn hazard(id: u32, pos: Vec2, vel: Vec2, spawn_ms: f64) -> Self {
        Self {
            id,
            kind: ObjectKind::Hazard,
            pos,
            vel,
            radius: HAZARD_RADIUS,
            category: None,
            points: 0,
            alive: true,
            hit: HitState::Untouched,
            spawn_ms,
            alpha: 1.0,
        }
    }

    #[inline]
    pub fn is_touched(&self) -> bool {
        self.hit == HitState::Touched
    }

    /// Mark as touched. Returns false if it already was.
    pub fn touch(&mut self) -> bool {
        if self.is_touched() {
            return false;
        }
        self.hit = HitState::Touched;
        true
    }
}

/// Time-limited effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    /// Slows simulation time
    SpeedReduction,
    /// Shorter spawn interval, higher object cap ("frenzy")
    SpawnAcceleration,
    /// Higher hazard probability
    HazardBoost,
}

/// Active modifier timers (ms remaining, 0 = inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveModifiers {
    pub slow_ms: f64,
    pub frenzy_ms: f64,
    pub hazard_boost_ms: f64,
}

/// Round bookkeeping shared with the render sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u64,
    pub lives: u8,
    /// Whole seconds left
    pub time_remaining: u32,
    pub combo: u32,
    /// Round clock time of the previous scoring hit (ms)
    pub last_hit_ms: Option<f64>,
    pub modifiers: ActiveModifiers,
    pub phase: RoundPhase,
}

impl RoundState {
    pub fn new(round_seconds: u32) -> Self {
        Self {
            score: 0,
            lives: MAX_LIVES,
            time_remaining: round_seconds,
            combo: 0,
            last_hit_ms: None,
            modifiers: ActiveModifiers::default(),
            phase: RoundPhase::Running,
        }
    }
}

/// Things that happened during a tick, drained by the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObjectSpawned { id: u32, kind: ObjectKind },
    TargetSliced { id: u32, category: TargetCategory, points: u32, combo: u32 },
    ModifierActivated(Modifier),
    HazardTouched { id: u32 },
    RecoveryAnswered { correct: bool, lives: u8 },
    Paused,
    Resumed,
    RoundEnded(Outcome),
}

/// What the presentation layer needs to draw one object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: ObjectKind,
    pub category: Option<TargetCategory>,
    pub alpha: f32,
}

/// Per-tick view for the render sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub objects: Vec<ObjectView>,
    /// Recent gesture points, oldest first
    pub trail: Vec<Vec2>,
    pub score: u64,
    pub lives: u8,
    pub time_remaining: u32,
    pub combo: u32,
    pub tier: usize,
    pub modifiers: ActiveModifiers,
    pub phase: RoundPhase,
}

/// Entity ID allocator shared by spawning and manual placement
///
/// IDs start at 1 and are never reused within a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Outcome callback invoked once when a round ends
pub type OutcomeCallback = Box<dyn FnMut(Outcome)>;

/// A single slice round bound to one quiz question
pub struct SliceGame {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: SliceTuning,
    /// Question used for recovery challenges
    pub question: Question,
    pub round: RoundState,
    /// Live objects (sorted by id)
    pub objects: Vec<MovingObject>,
    pub gesture: GestureTracker,
    pub spawner: Spawner,
    pub clock: SessionClock,
    /// Round clock (ms), advances only while running
    pub now_ms: f64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    /// Phase to return to on resume
    paused_from: Option<RoundPhase>,
    outcome_callback: Option<OutcomeCallback>,
    outcome_reported: bool,
    pub(crate) ids: EntityIds,
}

impl std::fmt::Debug for SliceGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliceGame")
            .field("seed", &self.seed)
            .field("round", &self.round)
            .field("objects", &self.objects.len())
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}

impl SliceGame {
    /// Start a round for `question` with default tuning
    pub fn new(seed: u64, question: Question) -> Self {
        Self::with_tuning(seed, question, SliceTuning::default())
    }

    pub fn with_tuning(seed: u64, question: Question, tuning: SliceTuning) -> Self {
        log::info!("Slice round started (seed {seed}, {}s)", tuning.round_seconds);
        Self {
            seed,
            round: RoundState::new(tuning.round_seconds),
            tuning,
            question,
            objects: Vec::new(),
            gesture: GestureTracker::default(),
            spawner: Spawner::default(),
            clock: SessionClock::default(),
            now_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            paused_from: None,
            outcome_callback: None,
            outcome_reported: false,
            ids: EntityIds::default(),
        }
    }

    /// Register the outcome callback
    pub fn on_outcome(&mut self, callback: OutcomeCallback) {
        self.outcome_callback = Some(callback);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.allocate()
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    /// Freeze the round. No-op unless running or awaiting recovery.
    pub fn pause(&mut self) {
        match self.round.phase {
            RoundPhase::Running | RoundPhase::AwaitingRecovery => {
                self.paused_from = Some(self.round.phase);
                self.round.phase = RoundPhase::Paused;
                self.gesture.end();
                self.events.push(GameEvent::Paused);
                log::debug!("Round paused");
            }
            RoundPhase::Paused | RoundPhase::Ended(_) => {}
        }
    }

    /// Unfreeze the round. No-op unless paused.
    pub fn resume(&mut self) {
        if self.round.phase == RoundPhase::Paused {
            self.round.phase = self.paused_from.take().unwrap_or(RoundPhase::Running);
            self.events.push(GameEvent::Resumed);
            log::debug!("Round resumed");
        }
    }

    /// Answer the recovery question after a hazard touch
    ///
    /// Returns `None` when no recovery is pending. A wrong answer costs a
    /// life; the last life ends the round in failure.
    pub fn submit_recovery_answer(&mut self, answer: &str) -> Option<bool> {
        if self.round.phase != RoundPhase::AwaitingRecovery {
            return None;
        }

        let correct = self.question.is_correct(answer);
        if correct {
            self.round.phase = RoundPhase::Running;
            log::info!("Recovery answered correctly, resuming");
        } else {
            self.round.lives = self.round.lives.saturating_sub(1);
            log::info!("Wrong recovery answer, {} lives left", self.round.lives);
        }
        self.events.push(GameEvent::RecoveryAnswered {
            correct,
            lives: self.round.lives,
        });

        if self.round.lives == 0 {
            self.end_round(Outcome::Fail);
        }
        Some(correct)
    }

    /// Terminate the round, discard objects and report the outcome once
    pub fn end_round(&mut self, outcome: Outcome) {
        if self.round.phase.is_ended() {
            return;
        }
        self.round.phase = RoundPhase::Ended(outcome);
        self.paused_from = None;
        self.objects.clear();
        self.gesture.clear();

        if !self.outcome_reported {
            self.outcome_reported = true;
            log::info!("Round ended: {:?} (score {})", outcome, self.round.score);
            self.events.push(GameEvent::RoundEnded(outcome));
            if let Some(callback) = self.outcome_callback.as_mut() {
                callback(outcome);
            }
        }
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current difficulty tier
    pub fn tier(&self) -> usize {
        self.tuning.tier_for_score(self.round.score)
    }

    /// Render view of the current frame
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            objects: self
                .objects
                .iter()
                .map(|o| ObjectView {
                    id: o.id,
                    pos: o.pos,
                    radius: o.radius,
                    kind: o.kind,
                    category: o.category,
                    alpha: o.alpha,
                })
                .collect(),
            trail: self.gesture.trail().collect(),
            score: self.round.score,
            lives: self.round.lives,
            time_remaining: self.round.time_remaining,
            combo: self.round.combo,
            tier: self.tier(),
            modifiers: self.round.modifiers,
            phase: self.round.phase,
        }
    }

    /// Ensure objects are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.objects.sort_by_key(|o| o.id);
    }
}
