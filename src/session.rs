use crate::error::{Transition, TypingError, TypingResult};
use tracing::{debug, info};

/// Stands in for a wrongly typed letter when a word's input is rebuilt.
pub const PLACEHOLDER: char = '*';

/// Judged status of one letter of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum LetterMark {
    #[default]
    Unmarked,
    Correct,
    Incorrect,
}

/// Status of a whole word, set when the session moves past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum WordMark {
    #[default]
    Pending,
    Correct,
    Marked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Running,
    Finished,
}

/// One timed game: the words to type and everything judged so far.
///
/// `active_letter` may equal the active word's length; that is the
/// "is-last" position one past the final letter, reached when the buffer
/// is full.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) words: Vec<Vec<char>>,
    pub(crate) letter_marks: Vec<Vec<LetterMark>>,
    pub(crate) word_marks: Vec<WordMark>,
    pub(crate) active_word: usize,
    pub(crate) active_letter: usize,
    pub(crate) buffer: String,
    remaining_secs: u64,
    duration_secs: u64,
    phase: Phase,
}

impl Session {
    /// Start a fresh session over `word_list`, lasting `duration_secs`.
    pub fn initialize<S: AsRef<str>>(word_list: &[S], duration_secs: u64) -> TypingResult<Self> {
        if word_list.is_empty() {
            return Err(TypingError::Configuration(
                "cannot start a session without words".to_string(),
            ));
        }
        if duration_secs == 0 {
            return Err(TypingError::Configuration(
                "session duration must be at least one second".to_string(),
            ));
        }

        let words: Vec<Vec<char>> = word_list
            .iter()
            .map(|w| w.as_ref().chars().collect())
            .collect();

        if let Some(pos) = words.iter().position(|w| w.is_empty()) {
            return Err(TypingError::Configuration(format!(
                "word {pos} of the word list is empty"
            )));
        }
        if let Some(pos) = words.iter().position(|w| w.contains(&PLACEHOLDER)) {
            return Err(TypingError::Configuration(format!(
                "word {pos} of the word list contains '{PLACEHOLDER}'"
            )));
        }

        let letter_marks = words
            .iter()
            .map(|w| vec![LetterMark::Unmarked; w.len()])
            .collect();

        info!(words = words.len(), duration_secs, "session initialized");

        Ok(Self {
            word_marks: vec![WordMark::Pending; words.len()],
            letter_marks,
            words,
            active_word: 0,
            active_letter: 0,
            buffer: String::new(),
            remaining_secs: duration_secs,
            duration_secs,
            phase: Phase::Running,
        })
    }

    /// One second of the countdown elapsed.
    pub fn tick(&mut self) -> TypingResult<()> {
        if self.is_finished() {
            return Err(TypingError::InvalidTransition(Transition::Tick));
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.finish();
        }
        Ok(())
    }

    /// Game over by timeout. The active word was never advanced past, so
    /// its mark is finalized here straight from its letter marks.
    pub fn finish(&mut self) {
        if self.is_finished() {
            return;
        }

        let idx = self.active_word;
        self.word_marks[idx] = judge_word(&self.letter_marks[idx]);
        self.remaining_secs = 0;
        self.phase = Phase::Finished;

        debug!(word = idx, mark = %self.word_marks[idx], "active word finalized by timeout");
        info!("session finished");
    }

    pub(crate) fn ensure_running(&self) -> TypingResult<()> {
        match self.phase {
            Phase::Running => Ok(()),
            Phase::Finished => Err(TypingError::InvalidTransition(Transition::Keystroke)),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn word(&self, idx: usize) -> &[char] {
        &self.words[idx]
    }

    /// The words as strings, e.g. to restart with the same prompt.
    pub fn word_list(&self) -> Vec<String> {
        self.words.iter().map(|w| w.iter().collect()).collect()
    }

    pub fn letter_marks(&self, word: usize) -> &[LetterMark] {
        &self.letter_marks[word]
    }

    pub fn word_mark(&self, word: usize) -> WordMark {
        self.word_marks[word]
    }

    pub fn word_marks(&self) -> &[WordMark] {
        &self.word_marks
    }

    pub fn active_word(&self) -> usize {
        self.active_word
    }

    pub fn active_letter(&self) -> usize {
        self.active_letter
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_last_word(&self) -> bool {
        self.active_word + 1 == self.words.len()
    }

    pub(crate) fn active_word_len(&self) -> usize {
        self.words[self.active_word].len()
    }
}

/// Correct only when every letter was judged correct.
pub(crate) fn judge_word(marks: &[LetterMark]) -> WordMark {
    if marks.iter().all(|m| *m == LetterMark::Correct) {
        WordMark::Correct
    } else {
        WordMark::Marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn initialize_resets_everything() {
        let session = Session::initialize(&["cat", "dog"], 30).unwrap();

        assert_eq!(session.word_count(), 2);
        assert_eq!(session.active_word(), 0);
        assert_eq!(session.active_letter(), 0);
        assert_eq!(session.remaining_secs(), 30);
        assert_eq!(session.duration_secs(), 30);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.buffer(), "");
        assert_eq!(session.word_marks(), &[WordMark::Pending, WordMark::Pending]);
        assert!(session
            .letter_marks(1)
            .iter()
            .all(|m| *m == LetterMark::Unmarked));
    }

    #[test]
    fn initialize_rejects_empty_word_list() {
        let empty: [&str; 0] = [];
        assert_matches!(
            Session::initialize(&empty, 30),
            Err(TypingError::Configuration(_))
        );
    }

    #[test]
    fn initialize_rejects_empty_word() {
        assert_matches!(
            Session::initialize(&["cat", ""], 30),
            Err(TypingError::Configuration(msg)) if msg.contains("word 1")
        );
    }

    #[test]
    fn initialize_rejects_placeholder_in_word() {
        assert_matches!(
            Session::initialize(&["cat", "a*b"], 30),
            Err(TypingError::Configuration(msg)) if msg.contains("word 1")
        );
    }

    #[test]
    fn initialize_rejects_zero_duration() {
        assert_matches!(
            Session::initialize(&["cat"], 0),
            Err(TypingError::Configuration(_))
        );
    }

    #[test]
    fn words_keep_multibyte_letters_addressable() {
        let session = Session::initialize(&["año"], 30).unwrap();
        assert_eq!(session.word(0), &['a', 'ñ', 'o']);
        assert_eq!(session.letter_marks(0).len(), 3);
        assert_eq!(session.word_list(), vec!["año".to_string()]);
    }

    #[test]
    fn tick_counts_down_then_finishes() {
        let mut session = Session::initialize(&["cat"], 2).unwrap();

        session.tick().unwrap();
        assert_eq!(session.remaining_secs(), 1);
        assert!(!session.is_finished());

        session.tick().unwrap();
        assert_eq!(session.remaining_secs(), 0);
        assert!(session.is_finished());
    }

    #[test]
    fn tick_after_finish_is_rejected() {
        let mut session = Session::initialize(&["cat"], 1).unwrap();
        session.tick().unwrap();

        assert_matches!(
            session.tick(),
            Err(TypingError::InvalidTransition(Transition::Tick))
        );
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn finish_judges_the_active_word() {
        let mut session = Session::initialize(&["cat", "dog"], 30).unwrap();
        session.active_word = 1;
        session.letter_marks[1] = vec![LetterMark::Correct; 3];

        session.finish();

        assert_eq!(session.word_mark(1), WordMark::Correct);
        assert_eq!(session.word_mark(0), WordMark::Pending);
    }

    #[test]
    fn finish_marks_a_partially_typed_word() {
        let mut session = Session::initialize(&["cat"], 30).unwrap();
        session.letter_marks[0][0] = LetterMark::Correct;

        session.finish();

        assert_eq!(session.word_mark(0), WordMark::Marked);
    }

    #[test]
    fn finish_is_idempotent() {
        let mut session = Session::initialize(&["cat"], 30).unwrap();
        session.finish();
        session.letter_marks[0] = vec![LetterMark::Correct; 3];
        session.finish();

        assert_eq!(session.word_mark(0), WordMark::Marked);
    }

    #[test]
    fn ensure_running_fails_once_finished() {
        let mut session = Session::initialize(&["cat"], 30).unwrap();
        assert!(session.ensure_running().is_ok());

        session.finish();
        assert_matches!(
            session.ensure_running(),
            Err(TypingError::InvalidTransition(Transition::Keystroke))
        );
    }

    #[test]
    fn judge_word_requires_every_letter() {
        use LetterMark::*;
        assert_eq!(judge_word(&[Correct, Correct]), WordMark::Correct);
        assert_eq!(judge_word(&[Correct, Unmarked]), WordMark::Marked);
        assert_eq!(judge_word(&[Incorrect, Correct]), WordMark::Marked);
    }
}
