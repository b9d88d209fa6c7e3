use crate::session::{LetterMark, Session, WordMark};

#[derive(Debug, Clone, PartialEq)]
pub struct LetterView {
    pub letter: char,
    pub mark: LetterMark,
    pub active: bool,
    /// The buffer is full and the cursor sits past this final letter.
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordView {
    pub letters: Vec<LetterView>,
    pub mark: WordMark,
    pub active: bool,
}

impl WordView {
    pub fn text(&self) -> String {
        self.letters.iter().map(|l| l.letter).collect()
    }
}

/// Render data for one frame, read off a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub words: Vec<WordView>,
    pub remaining_secs: u64,
    pub finished: bool,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let running = !session.is_finished();
        let active_word = session.active_word();

        let words = (0..session.word_count())
            .map(|w| {
                let is_active_word = running && w == active_word;
                let word = session.word(w);
                // one past the end is shown on the final letter
                let cursor = session.active_letter().min(word.len() - 1);
                let is_last = session.active_letter() >= word.len();

                let letters = word
                    .iter()
                    .zip(session.letter_marks(w))
                    .enumerate()
                    .map(|(i, (letter, mark))| {
                        let active = is_active_word && i == cursor;
                        LetterView {
                            letter: *letter,
                            mark: *mark,
                            active,
                            is_last: active && is_last,
                        }
                    })
                    .collect();

                WordView {
                    letters,
                    mark: session.word_mark(w),
                    active: is_active_word,
                }
            })
            .collect();

        Self {
            words,
            remaining_secs: session.remaining_secs(),
            finished: !running,
        }
    }
}

impl SessionView {
    pub fn active_letter(&self) -> Option<(usize, usize)> {
        self.words.iter().enumerate().find_map(|(w, word)| {
            word.letters
                .iter()
                .position(|l| l.active)
                .map(|l| (w, l))
        })
    }
}
