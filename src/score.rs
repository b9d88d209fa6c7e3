use crate::session::{LetterMark, Session, WordMark};
use serde::Serialize;

/// Final numbers of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    /// Percentage of judged letters that were correct.
    pub accuracy: f64,
    pub wpm: f64,
    pub correct_words: usize,
    pub correct_letters: usize,
    pub incorrect_letters: usize,
    pub duration_secs: u64,
}

impl Score {
    /// Reads the session without touching it. Meant for a finished
    /// session, but any session gives a snapshot.
    pub fn calculate(session: &Session) -> Self {
        let (correct_letters, incorrect_letters) = (0..session.word_count())
            .flat_map(|w| session.letter_marks(w).iter())
            .fold((0, 0), |(ok, bad), mark| match mark {
                LetterMark::Correct => (ok + 1, bad),
                LetterMark::Incorrect => (ok, bad + 1),
                LetterMark::Unmarked => (ok, bad),
            });

        let correct_words = session
            .word_marks()
            .iter()
            .filter(|m| **m == WordMark::Correct)
            .count();

        Self {
            accuracy: accuracy(correct_letters, incorrect_letters),
            wpm: wpm(correct_words, session.duration_secs()),
            correct_words,
            correct_letters,
            incorrect_letters,
            duration_secs: session.duration_secs(),
        }
    }
}

pub fn accuracy(correct: usize, incorrect: usize) -> f64 {
    match correct + incorrect {
        0 => 0.0,
        judged => correct as f64 / judged as f64 * 100.0,
    }
}

/// Correct words extrapolated to a per-minute rate.
pub fn wpm(correct_words: usize, duration_secs: u64) -> f64 {
    if duration_secs == 0 {
        return 0.0;
    }
    correct_words as f64 * (60.0 / duration_secs as f64)
}
