use crate::error::{TypingError, TypingResult};
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::debug;

static WORDS_DIR: Dir = include_dir!("src/words");

/// A bundled word list.
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    pub fn bundled(name: &str) -> TypingResult<Self> {
        let file_name = format!("{name}.json");
        let file = WORDS_DIR.get_file(&file_name).ok_or_else(|| {
            TypingError::Configuration(format!("no bundled word list named {name}"))
        })?;

        let contents = file.contents_utf8().ok_or_else(|| {
            TypingError::Configuration(format!("word list {file_name} is not valid utf-8"))
        })?;

        Self::from_json(contents)
    }

    /// Parses a list, checking the declared `size` against its words.
    pub fn from_json(contents: &str) -> TypingResult<Self> {
        let list: WordList = serde_json::from_str(contents)?;
        if list.words.is_empty() {
            return Err(TypingError::Configuration(format!(
                "word list {} has no words",
                list.name
            )));
        }
        if list.size as usize != list.words.len() {
            return Err(TypingError::Configuration(format!(
                "word list {} declares {} words but has {}",
                list.name,
                list.size,
                list.words.len()
            )));
        }
        Ok(list)
    }

    pub fn english() -> TypingResult<Self> {
        Self::bundled("english")
    }
}

/// Supplies the target words of one session.
pub trait WordSource {
    fn words(&self, count: usize) -> TypingResult<Vec<String>>;
}

/// Random subset of a word list, without replacement.
#[derive(Debug, Clone)]
pub struct RandomWords {
    list: WordList,
}

impl RandomWords {
    pub fn new(list: WordList) -> Self {
        Self { list }
    }
}

impl WordSource for RandomWords {
    fn words(&self, count: usize) -> TypingResult<Vec<String>> {
        if self.list.words.is_empty() {
            return Err(TypingError::Configuration(format!(
                "word list {} has no words",
                self.list.name
            )));
        }

        let mut rng = rand::thread_rng();
        let words: Vec<String> = self
            .list
            .words
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect();

        debug!(list = %self.list.name, requested = count, picked = words.len(), "words selected");
        Ok(words)
    }
}

/// A user supplied prompt, typed in order.
#[derive(Debug, Clone)]
pub struct FixedWords {
    words: Vec<String>,
}

impl FixedWords {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            words: prompt.split_whitespace().map(str::to_string).collect(),
        }
    }
}

impl WordSource for FixedWords {
    fn words(&self, _count: usize) -> TypingResult<Vec<String>> {
        if self.words.is_empty() {
            return Err(TypingError::Configuration(
                "prompt contains no words".to_string(),
            ));
        }
        Ok(self.words.clone())
    }
}
