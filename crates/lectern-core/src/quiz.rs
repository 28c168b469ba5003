//! # Quiz
//!
//! Multiple-choice questions and the state of one pass through them.
//!
//! A question is answered at most once; only that first answer counts
//! toward the score. The session moves forward only after the current
//! question was answered, and finishes after the last one.

use serde::{Deserialize, Serialize};

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
    /// Wording for addressing the belief behind a wrong answer with a patient.
    pub empathetic_response: Option<String>,
}

impl QuizQuestion {
    #[must_use]
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

/// Result band shown when a session finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// Every question right.
    Perfect,
    /// At least 60% right.
    Good,
    Review,
}

impl ScoreBand {
    /// Band for `score` out of `total`, in integer arithmetic.
    #[must_use]
    pub fn for_score(score: usize, total: usize) -> Self {
        if score == total {
            Self::Perfect
        } else if score.saturating_mul(5) >= total.saturating_mul(3) {
            Self::Good
        } else {
            Self::Review
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect! You have a solid understanding of the evidence-based facts.",
            Self::Good | Self::Review => {
                "Review the myth-debunking slides for a deeper understanding."
            }
        }
    }
}

/// Feedback for an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_index: usize,
}

/// One pass through a question set.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<usize>,
    score: usize,
    completed: bool,
}

impl QuizSession {
    #[must_use]
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let completed = questions.is_empty();
        Self {
            questions,
            current: 0,
            selected: None,
            score: 0,
            completed,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.completed {
            return None;
        }
        self.questions.get(self.current)
    }

    /// Answer the current question.
    ///
    /// Returns `None` when the question was already answered, the session
    /// is finished, or `option` is not one of the choices.
    pub fn answer(&mut self, option: usize) -> Option<AnswerOutcome> {
        if self.selected.is_some() {
            return None;
        }
        let question = self.current_question()?;
        if option >= question.options.len() {
            return None;
        }
        let outcome = AnswerOutcome {
            correct: option == question.correct_index,
            correct_index: question.correct_index,
        };
        self.selected = Some(option);
        if outcome.correct {
            self.score += 1;
        }
        Some(outcome)
    }

    /// Move past an answered question. After the last question the session
    /// is finished. Returns whether anything changed.
    pub fn advance(&mut self) -> bool {
        if self.completed || self.selected.is_none() {
            return false;
        }
        self.selected = None;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.completed = true;
        }
        true
    }

    /// Start over with the same questions.
    pub fn restart(&mut self) {
        *self = Self::new(std::mem::take(&mut self.questions));
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completed
    }

    /// Band of the final score, once finished.
    #[must_use]
    pub fn band(&self) -> Option<ScoreBand> {
        self.completed
            .then(|| ScoreBand::for_score(self.score, self.questions.len()))
    }
}
