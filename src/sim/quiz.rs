//! Revival quiz
//!
//! A small state machine: pick a question, move the cursor, confirm, show
//! feedback for a fixed number of frames, then report the outcome.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::quiz_bank::Question;

/// Options per question
pub const OPTION_COUNT: usize = 4;

/// Answer feedback being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizFeedback {
    pub correct: bool,
    pub frames_left: u32,
}

/// An open question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
    /// Index into the question bank
    pub question: usize,
    /// Cursor position
    pub selected: usize,
    /// Set once an answer is confirmed
    pub feedback: Option<QuizFeedback>,
}

impl QuizState {
    /// Uniform pick with replacement. None for an empty bank.
    pub fn pick<R: Rng>(rng: &mut R, bank_len: usize) -> Option<Self> {
        if bank_len == 0 {
            return None;
        }
        Some(Self {
            question: rng.random_range(0..bank_len),
            selected: 0,
            feedback: None,
        })
    }

    pub fn is_answered(&self) -> bool {
        self.feedback.is_some()
    }

    pub fn current<'a>(&self, bank: &'a [Question]) -> Option<&'a Question> {
        bank.get(self.question)
    }

    /// Move the cursor, wrapping around the options
    pub fn move_selection(&mut self, delta: i32) {
        if self.is_answered() {
            return;
        }
        let n = OPTION_COUNT as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(n) as usize;
    }

    /// Point the cursor straight at an option (ignored if out of range)
    pub fn select(&mut self, option: usize) {
        if !self.is_answered() && option < OPTION_COUNT {
            self.selected = option;
        }
    }

    /// Lock in the current selection. Returns the verdict the first time.
    pub fn confirm(&mut self, bank: &[Question], feedback_frames: u32) -> Option<bool> {
        if self.is_answered() {
            return None;
        }
        let correct = self
            .current(bank)
            .is_some_and(|q| q.answer == self.selected);
        self.feedback = Some(QuizFeedback {
            correct,
            frames_left: feedback_frames,
        });
        Some(correct)
    }

    /// Count down the feedback window. Returns the verdict once it elapses.
    pub fn update(&mut self) -> Option<bool> {
        let feedback = self.feedback.as_mut()?;
        if feedback.frames_left > 0 {
            feedback.frames_left -= 1;
        }
        if feedback.frames_left == 0 {
            Some(feedback.correct)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz_bank::QUESTIONS;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn open(question: usize) -> QuizState {
        QuizState {
            question,
            selected: 0,
            feedback: None,
        }
    }

    #[test]
    fn test_pick_in_range_and_empty_bank() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let quiz = QuizState::pick(&mut rng, QUESTIONS.len()).unwrap();
            assert!(quiz.question < QUESTIONS.len());
            assert_eq!(quiz.selected, 0);
        }
        assert!(QuizState::pick(&mut rng, 0).is_none());
    }

    #[test]
    fn test_cursor_wraps() {
        let mut quiz = open(0);
        quiz.move_selection(-1);
        assert_eq!(quiz.selected, 3);
        quiz.move_selection(1);
        assert_eq!(quiz.selected, 0);
        quiz.move_selection(5);
        assert_eq!(quiz.selected, 1);
        quiz.select(9);
        assert_eq!(quiz.selected, 1);
    }

    #[test]
    fn test_confirm_evaluates_selection() {
        // First question: answer is option 2
        let mut quiz = open(0);
        quiz.select(2);
        assert_eq!(quiz.confirm(&QUESTIONS, 54), Some(true));
        assert_eq!(quiz.confirm(&QUESTIONS, 54), None);

        let mut quiz = open(0);
        assert_eq!(quiz.confirm(&QUESTIONS, 54), Some(false));
    }

    #[test]
    fn test_cursor_frozen_after_confirm() {
        let mut quiz = open(0);
        quiz.confirm(&QUESTIONS, 54);
        quiz.move_selection(1);
        quiz.select(3);
        assert_eq!(quiz.selected, 0);
    }

    #[test]
    fn test_feedback_window() {
        let mut quiz = open(3);
        assert_eq!(quiz.update(), None);
        quiz.confirm(&QUESTIONS, 54);
        for _ in 0..53 {
            assert_eq!(quiz.update(), None);
        }
        assert_eq!(quiz.update(), Some(true));
    }
}
