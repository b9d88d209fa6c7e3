use crate::error::TypingResult;
use crate::session::{judge_word, LetterMark, Session};
use tracing::debug;

pub use crate::session::PLACEHOLDER;

/// A key the typing screen forwards to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Space,
    Backspace,
}

impl From<char> for Keystroke {
    fn from(c: char) -> Self {
        match c {
            ' ' => Keystroke::Space,
            c => Keystroke::Char(c),
        }
    }
}

/// Where the cursor went as a result of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Stayed inside the active word; the buffer edit applies.
    InWord,
    NextWord,
    PreviousWord,
    /// Boundary reached, nothing moved.
    Held,
}

/// Apply one keystroke, including the default buffer edit for keys that
/// do not suppress it.
pub fn apply(session: &mut Session, key: Keystroke) -> TypingResult<Navigation> {
    session.ensure_running()?;

    match key {
        Keystroke::Space => on_advance_key(session),
        Keystroke::Backspace => {
            let nav = on_retreat_key(session)?;
            let mut buffer = session.buffer.clone();
            match nav {
                Navigation::InWord => {
                    buffer.pop();
                    on_buffer_change(session, &buffer)?;
                }
                // deletion suppressed; the rebuilt buffer still places the cursor
                Navigation::PreviousWord => on_buffer_change(session, &buffer)?,
                Navigation::NextWord | Navigation::Held => {}
            }
            Ok(nav)
        }
        Keystroke::Char(c) => {
            let mut buffer = session.buffer.clone();
            buffer.push(c);
            on_buffer_change(session, &buffer)?;
            Ok(Navigation::InWord)
        }
    }
}

/// Space: judge the active word and move on to the next one.
pub fn on_advance_key(session: &mut Session) -> TypingResult<Navigation> {
    session.ensure_running()?;

    rejudge_active_word(session);

    let idx = session.active_word;
    session.word_marks[idx] = judge_word(&session.letter_marks[idx]);
    debug!(word = idx, mark = %session.word_marks[idx], "word judged");

    if session.is_last_word() {
        debug!(word = idx, "advance on the last word held");
        return Ok(Navigation::Held);
    }

    session.active_word += 1;
    session.active_letter = 0;
    session.buffer.clear();
    Ok(Navigation::NextWord)
}

/// Backspace: step back a letter, or into the previous word from letter 0.
///
/// Returns [`Navigation::InWord`] when the normal deletion should still
/// happen; when the cursor crosses into the previous word the deletion is
/// suppressed and the buffer is rebuilt from that word's marks.
pub fn on_retreat_key(session: &mut Session) -> TypingResult<Navigation> {
    session.ensure_running()?;

    if session.active_letter > 0 {
        session.active_letter -= 1;
        return Ok(Navigation::InWord);
    }

    if session.active_word == 0 {
        return Ok(Navigation::Held);
    }

    session.active_word -= 1;
    let idx = session.active_word;
    session.active_letter = session.words[idx].len();
    session.buffer = session.letter_marks[idx]
        .iter()
        .zip(&session.words[idx])
        .filter_map(|(mark, letter)| match mark {
            LetterMark::Correct => Some(*letter),
            LetterMark::Incorrect => Some(PLACEHOLDER),
            LetterMark::Unmarked => None,
        })
        .collect();

    debug!(word = idx, buffer = %session.buffer, "retreated into previous word");
    Ok(Navigation::PreviousWord)
}

/// The input buffer changed: clamp it to the active word and re-judge
/// every letter of that word from scratch.
pub fn on_buffer_change(session: &mut Session, buffer: &str) -> TypingResult<()> {
    session.ensure_running()?;

    let limit = session.active_word_len();
    if buffer.chars().count() > limit {
        debug!(limit, "buffer clamped to word length");
    }
    session.buffer = buffer.chars().take(limit).collect();

    rejudge_active_word(session);
    Ok(())
}

fn rejudge_active_word(session: &mut Session) {
    let idx = session.active_word;
    let typed: Vec<char> = session.buffer.chars().collect();
    let word = &session.words[idx];

    for (i, mark) in session.letter_marks[idx].iter_mut().enumerate() {
        *mark = match typed.get(i) {
            Some(c) if *c == word[i] => LetterMark::Correct,
            Some(_) => LetterMark::Incorrect,
            None => LetterMark::Unmarked,
        };
    }

    session.active_letter = typed.len().min(word.len());
}
