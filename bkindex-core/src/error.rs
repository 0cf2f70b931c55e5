//! Error types for the bkindex core library.
//!
//! Every failure the index can report is a precondition violation surfaced
//! synchronously to the caller of construction, search or restore. Each
//! variant carries a stable machine-readable code for logs and exit paths.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Reason a word was rejected by list validation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WordDefect {
    /// The word has no characters other than whitespace.
    Empty,
    /// The word contains interior whitespace and therefore is not a single
    /// token.
    Whitespace,
    /// The word consists solely of numeric characters.
    Numeric,
}

impl fmt::Display for WordDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("is empty"),
            Self::Whitespace => f.write_str("is not a single token"),
            Self::Numeric => f.write_str("is purely numeric"),
        }
    }
}

/// Error type produced when constructing, querying or restoring a
/// [`crate::BkTree`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BkTreeError {
    /// An element of the word list is not a single non-numeric token.
    #[error("every element in the word list must be a single word: element {index} (`{word}`) {defect}")]
    ListIntegrity {
        /// Position of the offending element in the input collection.
        index: usize,
        /// The rejected element.
        word: String,
        /// Why the element was rejected.
        defect: WordDefect,
    },
    /// The word list contained no elements.
    #[error("the word list contains no words")]
    EmptyWordList,
    /// The requested metric is not registered.
    #[error("invalid metric function `{requested}`; available functions: {available}")]
    UnknownMetric {
        /// Name supplied by the caller.
        requested: String,
        /// Comma separated list of registered metric names.
        available: String,
    },
    /// The search word was empty.
    #[error("search word must be a string of at least one character")]
    InvalidSearchWord,
    /// The maximum search distance was negative.
    #[error("distance must be an integer equal to or greater than 0 (got {got})")]
    InvalidSearchDistance {
        /// The rejected distance.
        got: i64,
    },
    /// A snapshot could not be restored into a valid tree.
    #[error("snapshot is corrupt: {reason}")]
    CorruptSnapshot {
        /// Description of the violated invariant.
        reason: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`BkTreeError`] variants.
    enum BkTreeErrorCode for BkTreeError {
        /// An element of the word list is not a single non-numeric token.
        ListIntegrity => ListIntegrity { .. } => "BKTREE_LIST_INTEGRITY",
        /// The word list contained no elements.
        EmptyWordList => EmptyWordList => "BKTREE_EMPTY_WORD_LIST",
        /// The requested metric is not registered.
        UnknownMetric => UnknownMetric { .. } => "BKTREE_UNKNOWN_METRIC",
        /// The search word was empty.
        InvalidSearchWord => InvalidSearchWord => "BKTREE_INVALID_SEARCH_WORD",
        /// The maximum search distance was negative.
        InvalidSearchDistance => InvalidSearchDistance { .. } => "BKTREE_INVALID_SEARCH_DISTANCE",
        /// A snapshot could not be restored into a valid tree.
        CorruptSnapshot => CorruptSnapshot { .. } => "BKTREE_CORRUPT_SNAPSHOT",
    }
}

impl BkTreeError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptSnapshot {
            reason: reason.into(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, BkTreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::list_integrity(
        BkTreeError::ListIntegrity { index: 0, word: "a b".into(), defect: WordDefect::Whitespace },
        "BKTREE_LIST_INTEGRITY",
    )]
    #[case::empty(BkTreeError::EmptyWordList, "BKTREE_EMPTY_WORD_LIST")]
    #[case::metric(
        BkTreeError::UnknownMetric { requested: "x".into(), available: "levenshtein".into() },
        "BKTREE_UNKNOWN_METRIC",
    )]
    #[case::word(BkTreeError::InvalidSearchWord, "BKTREE_INVALID_SEARCH_WORD")]
    #[case::distance(
        BkTreeError::InvalidSearchDistance { got: -1 },
        "BKTREE_INVALID_SEARCH_DISTANCE",
    )]
    #[case::snapshot(BkTreeError::corrupt("cycle"), "BKTREE_CORRUPT_SNAPSHOT")]
    fn codes_are_stable(#[case] error: BkTreeError, #[case] expected: &str) {
        assert_eq!(error.code().as_str(), expected);
        assert_eq!(error.code().to_string(), expected);
    }

    #[test]
    fn list_integrity_message_names_the_element() {
        let error = BkTreeError::ListIntegrity {
            index: 3,
            word: "42".into(),
            defect: WordDefect::Numeric,
        };
        let message = error.to_string();
        assert!(message.contains("element 3"));
        assert!(message.contains("`42`"));
        assert!(message.contains("purely numeric"));
    }

    #[test]
    fn unknown_metric_lists_available_names() {
        let error = BkTreeError::UnknownMetric {
            requested: "hamming".into(),
            available: "levenshtein, lcs_distance".into(),
        };
        assert!(error.to_string().ends_with("levenshtein, lcs_distance"));
    }
}
