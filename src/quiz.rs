//! Levels, questions and quiz session scoring
//!
//! Question content comes from outside (JSON or code); this module only
//! knows how to walk through it and grade it.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::PASS_PERCENT;

/// Difficulty levels, unlocked in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Easy => "Easy",
            Level::Medium => "Medium",
            Level::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Level::Easy),
            "medium" | "med" => Some(Level::Medium),
            "hard" => Some(Level::Hard),
            _ => None,
        }
    }

    /// Level unlocked by passing this one
    pub fn next(&self) -> Option<Level> {
        match self {
            Level::Easy => Some(Level::Medium),
            Level::Medium => Some(Level::Hard),
            Level::Hard => None,
        }
    }
}

/// A quiz prompt and its expected answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub answer: String,
}

impl Question {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    /// Numeric answer, used as the card deck target
    pub fn target(&self) -> Option<f64> {
        self.answer.trim().parse::<f64>().ok()
    }

    pub fn operation(&self) -> Operation {
        Operation::classify(&self.prompt)
    }

    pub fn is_correct(&self, given: &str) -> bool {
        answers_match(given, &self.answer)
    }
}

/// Which kind of arithmetic a prompt asks for (drives the hint shown)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    SquareRoot,
    Other,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
            Operation::SquareRoot => "square_root",
            Operation::Other => "other",
        }
    }

    /// Classify by the first operator family found, in priority order
    pub fn classify(prompt: &str) -> Self {
        let q: String = prompt.chars().filter(|c| !c.is_whitespace()).collect();
        if q.contains('+') {
            Operation::Addition
        } else if q.contains('-') || q.contains('−') {
            Operation::Subtraction
        } else if q.contains(['×', 'x', '*']) {
            Operation::Multiplication
        } else if q.contains(['÷', '/']) {
            Operation::Division
        } else if q.contains('√') {
            Operation::SquareRoot
        } else {
            Operation::Other
        }
    }
}

/// Compare a typed answer against the expected one
///
/// Surrounding whitespace is ignored; numeric answers compare by value so
/// "07" matches "7".
pub fn answers_match(given: &str, expected: &str) -> bool {
    let given = given.trim();
    let expected = expected.trim();
    match (given.parse::<f64>(), expected.parse::<f64>()) {
        (Ok(a), Ok(b)) => (a - b).abs() < 1e-9,
        _ => !given.is_empty() && given.eq_ignore_ascii_case(expected),
    }
}

/// Options for the multiple-choice variant, answer included, shuffled
///
/// Distractors sit near the answer and stay non-negative when it is.
pub fn multiple_choice(answer: i64, count: usize, rng: &mut impl Rng) -> Vec<i64> {
    let count = count.clamp(2, 6);
    let spread = (answer.abs() / 4).max(5);
    let lo = if answer >= 0 { (answer - spread).max(0) } else { answer - spread };
    let hi = answer + spread;

    let mut options = vec![answer];
    let mut draws = 0;
    while options.len() < count && draws < 200 {
        draws += 1;
        let n = rng.random_range(lo..=hi);
        if !options.contains(&n) {
            options.push(n);
        }
    }
    // Fill deterministically if the draws kept colliding
    let mut n = hi + 1;
    while options.len() < count {
        options.push(n);
        n += 1;
    }

    options.shuffle(rng);
    options
}

/// Question content for every level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub easy: Vec<Question>,
    #[serde(default)]
    pub medium: Vec<Question>,
    #[serde(default)]
    pub hard: Vec<Question>,
}

impl QuestionBank {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn questions(&self, level: Level) -> &[Question] {
        match level {
            Level::Easy => &self.easy,
            Level::Medium => &self.medium,
            Level::Hard => &self.hard,
        }
    }

    pub fn session(&self, level: Level) -> QuizSession {
        QuizSession::new(level, self.questions(level).to_vec())
    }
}

/// One pass through a level's questions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub level: Level,
    questions: Vec<Question>,
    index: usize,
    correct: u32,
}

impl QuizSession {
    pub fn new(level: Level, questions: Vec<Question>) -> Self {
        Self {
            level,
            questions,
            index: 0,
            correct: 0,
        }
    }

    /// Question being played, `None` once the session is complete
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// Record the current question's result and move on
    pub fn record(&mut self, solved: bool) {
        if self.is_complete() {
            return;
        }
        if solved {
            self.correct += 1;
        }
        self.index += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.questions.len()
    }

    /// 1-based position for display
    pub fn position(&self) -> usize {
        (self.index + 1).min(self.questions.len())
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Rounded percentage of questions solved
    pub fn percent(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        (self.correct as f64 / self.questions.len() as f64 * 100.0).round() as u32
    }

    pub fn passed(&self) -> bool {
        self.percent() >= PASS_PERCENT
    }
}
