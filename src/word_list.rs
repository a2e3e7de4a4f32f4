//! Loading and normalizing the candidate word list.
//!
//! Each line holds one entry, optionally followed by `;score` or `,score`. Entries are trimmed,
//! uppercased, and deduplicated. The order of first appearance is kept, since it is the order
//! value ties are broken in during search.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::Path;

use smallvec::SmallVec;

use crate::errors::WordListError;
use crate::{WordId, MAX_SLOT_LENGTH};

/// A struct representing a word that can be chosen for a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    fn new(string: String) -> Word {
        let glyphs = string.chars().collect();
        Word { string, glyphs }
    }

    /// Length in characters, which is what variable lengths are measured in.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }
}

/// The master list of candidate words, indexed by [`WordId`].
#[derive(Clone, Default)]
pub struct WordList {
    words: Vec<Word>,
    ids_by_string: HashMap<String, WordId>,
}

impl Debug for WordList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordList")
            .field("words", &(["(", &self.words.len().to_string(), " entries)"].join("")))
            .finish()
    }
}

impl WordList {
    /// Build a word list from bare entries.
    pub fn new<I, S>(entries: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut word_list = WordList::default();
        for entry in entries {
            word_list.push(entry.as_ref());
        }
        word_list
    }

    fn push(&mut self, entry: &str) {
        let normalized = entry.trim().to_uppercase();
        if normalized.is_empty() || self.ids_by_string.contains_key(&normalized) {
            return;
        }
        self.ids_by_string.insert(normalized.clone(), self.words.len());
        self.words.push(Word::new(normalized));
    }

    /// Parse a word list from file contents, dropping entries scored below `min_score`.
    ///
    /// Entries without a score are always kept.
    pub fn parse_from_str(contents: &str, min_score: Option<i32>) -> Result<WordList, WordListError> {
        let mut word_list = WordList::default();

        for (line_idx, raw_line) in contents.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let (entry, score) = match line.split_once([';', ',']) {
                Some((entry, score)) => {
                    let score: i32 = score.trim().parse().map_err(|_| WordListError::InvalidScore {
                        line: line_idx + 1,
                        score: score.trim().to_string(),
                    })?;
                    (entry, Some(score))
                }
                None => (line, None),
            };

            let keep = match (score, min_score) {
                (Some(score), Some(min_score)) => score >= min_score,
                _ => true,
            };
            if keep {
                word_list.push(entry);
            }
        }

        log::debug!("Parsed {} distinct words", word_list.len());

        Ok(word_list)
    }

    /// Read and parse a word list file.
    pub fn load_from_path<P: AsRef<Path>>(path: P, min_score: Option<i32>) -> Result<WordList, WordListError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| WordListError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        WordList::parse_from_str(&contents, min_score)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    /// Look up a word by its (case-insensitive) spelling.
    pub fn id_of(&self, word: &str) -> Option<WordId> {
        self.ids_by_string.get(&word.trim().to_uppercase()).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WordId, &Word)> {
        self.words.iter().enumerate()
    }
}
