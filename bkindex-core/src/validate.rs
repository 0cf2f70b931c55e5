//! Word list integrity checks applied before construction and restore.

use crate::error::{BkTreeError, Result, WordDefect};

/// Classifies `word`, returning the first defect that disqualifies it.
///
/// Surrounding whitespace is tolerated; only interior whitespace splits a
/// word into several tokens. The word itself is stored untouched.
///
/// # Examples
/// ```
/// use bkindex_core::{WordDefect, word_defect};
///
/// assert_eq!(word_defect("cat"), None);
/// assert_eq!(word_defect("two words"), Some(WordDefect::Whitespace));
/// assert_eq!(word_defect("1984"), Some(WordDefect::Numeric));
/// assert_eq!(word_defect("r2d2"), None);
/// assert_eq!(word_defect("dog "), None);
/// ```
#[must_use]
pub fn word_defect(word: &str) -> Option<WordDefect> {
    let token = word.trim();
    if token.is_empty() {
        Some(WordDefect::Empty)
    } else if token.chars().any(char::is_whitespace) {
        Some(WordDefect::Whitespace)
    } else if token.chars().all(char::is_numeric) {
        Some(WordDefect::Numeric)
    } else {
        None
    }
}

pub(crate) fn validate_word(index: usize, word: &str) -> Result<()> {
    match word_defect(word) {
        None => Ok(()),
        Some(defect) => Err(BkTreeError::ListIntegrity {
            index,
            word: word.to_owned(),
            defect,
        }),
    }
}

/// Checks every element, reporting the first offender in input order.
pub(crate) fn validate_words<S: AsRef<str>>(words: &[S]) -> Result<()> {
    words
        .iter()
        .enumerate()
        .try_for_each(|(index, word)| validate_word(index, word.as_ref()))
}
