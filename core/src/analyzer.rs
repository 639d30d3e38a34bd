//! Text analysis shared by indexing and query preprocessing.
//!
//! ```text
//! text -> tokenize -> lowercase -> stop filter -> lemmatize -> fold diacritics
//! ```
//!
//! Every stage is a lazy iterator adapter that yields at most one token per input
//! token. The only behavioural difference between [`Mode::Index`] and
//! [`Mode::Query`] is whether the lemmatizer's part-of-speech tag survives.

use crate::config::LemmatizerKind;
use crate::lemma::{Lemmatizer, PartOfSpeech};
use crate::tokenizer::{is_stopword, tokenize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Index,
    Query,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    /// Set by the lemmatizer in index mode only.
    pub pos: Option<PartOfSpeech>,
    /// Index of the token in the raw token stream.
    pub position: u32,
    pub boost: f32,
    pub stopped: bool,
    pub remove_stopped: bool,
    pub mode: Mode,
}

impl Token {
    pub fn new(text: &str, position: u32, mode: Mode) -> Self {
        Self {
            text: text.to_string(),
            pos: None,
            position,
            boost: 1.0,
            stopped: false,
            remove_stopped: true,
            mode,
        }
    }
}

pub fn lowercase<I>(tokens: I) -> impl Iterator<Item = Token>
where
    I: Iterator<Item = Token>,
{
    tokens.map(|mut t| {
        t.text = t.text.to_lowercase();
        t
    })
}

pub fn stop_filter<I>(tokens: I) -> impl Iterator<Item = Token>
where
    I: Iterator<Item = Token>,
{
    tokens.filter_map(|mut t| {
        if is_stopword(&t.text) {
            t.stopped = true;
            if t.remove_stopped {
                return None;
            }
        }
        Some(t)
    })
}

/// A lemma that lands on a stopword is discarded and the surface form kept,
/// so a second pass never drops a term the first pass indexed.
pub fn lemmatize<'a, I>(tokens: I, lemmatizer: &'a Lemmatizer) -> impl Iterator<Item = Token> + 'a
where
    I: Iterator<Item = Token> + 'a,
{
    tokens.map(move |mut t| {
        let lemma = lemmatizer.lemmatize(&t.text);
        if is_stopword(&lemma.text) {
            t.pos = None;
            return t;
        }
        t.text = lemma.text;
        t.pos = match t.mode {
            Mode::Index => lemma.pos,
            Mode::Query => None,
        };
        t
    })
}

/// Replace accented characters by their unaccented base. Tokens made only of
/// combining marks vanish.
pub fn fold_diacritics<I>(tokens: I) -> impl Iterator<Item = Token>
where
    I: Iterator<Item = Token>,
{
    tokens.filter_map(|mut t| {
        if !t.text.is_ascii() {
            t.text = fold(&t.text);
        }
        (!t.text.is_empty()).then_some(t)
    })
}

fn fold(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

pub struct Analyzer {
    lemmatizer: Lemmatizer,
}

impl Analyzer {
    pub fn new(kind: LemmatizerKind) -> Self {
        Self { lemmatizer: Lemmatizer::new(kind) }
    }

    pub fn kind(&self) -> LemmatizerKind { self.lemmatizer.kind() }

    pub fn analyze<'a>(&'a self, text: &'a str, mode: Mode) -> impl Iterator<Item = Token> + 'a {
        let tokens = lowercase(tokenize(text, mode));
        let tokens = lemmatize(stop_filter(tokens), &self.lemmatizer);
        fold_diacritics(tokens)
    }

    pub fn terms(&self, text: &str, mode: Mode) -> Vec<String> {
        self.analyze(text, mode).map(|t| t.text).collect()
    }

    /// Analyzed terms joined by single spaces, ready to be used as query text.
    pub fn normalize(&self, text: &str, mode: Mode) -> String {
        self.terms(text, mode).join(" ")
    }
}

impl Default for Analyzer {
    fn default() -> Self { Self::new(LemmatizerKind::default()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::stopwords;

    #[test]
    fn full_pipeline() {
        let a = Analyzer::default();
        assert_eq!(a.terms("The Children visited Cafés in Zürich", Mode::Index), vec!["child", "visited", "cafe", "zurich"]);
    }

    #[test]
    fn stopwords_are_removed_not_flagged() {
        let a = Analyzer::default();
        let tokens: Vec<Token> = a.analyze("the and of", Mode::Index).collect();
        assert!(tokens.is_empty());
    }

    #[test]
    fn never_longer_than_raw_token_stream() {
        let a = Analyzer::default();
        for text in ["", "a b c", "Wolves ran across the frozen lakes of Norway", "42 is the answer, isn't it?"] {
            let raw = tokenize(text, Mode::Index).count();
            assert!(a.analyze(text, Mode::Index).count() <= raw);
        }
    }

    #[test]
    fn part_of_speech_kept_only_when_indexing() {
        let a = Analyzer::default();
        let indexed: Vec<Token> = a.analyze("geese ran", Mode::Index).collect();
        assert_eq!(indexed[0].pos, Some(PartOfSpeech::Noun));
        assert_eq!(indexed[1].pos, Some(PartOfSpeech::Verb));
        assert!(a.analyze("geese ran", Mode::Query).all(|t| t.pos.is_none()));
    }

    #[test]
    fn modes_agree_on_text() {
        let a = Analyzer::default();
        let text = "Famous rivers flowing through European capitals";
        assert_eq!(a.terms(text, Mode::Index), a.terms(text, Mode::Query));
    }

    #[test]
    fn pipeline_is_idempotent() {
        let a = Analyzer::default();
        for text in [
            "The oldest cities of ancient Greece",
            "Mice, geese and wolves crossed the Pyrénées",
            "Churches, boxes and classes; Los Angeles' movies",
            "Prince William wills",
            "Ares, cans and Yemen",
        ] {
            let once = a.normalize(text, Mode::Query);
            assert_eq!(a.normalize(&once, Mode::Query), once);
        }
    }

    #[test]
    fn lemmas_never_collide_with_stopwords() {
        for kind in [LemmatizerKind::Lexicon, LemmatizerKind::Porter] {
            let a = Analyzer::new(kind);
            for word in stopwords() {
                let plural = format!("{word}s");
                let once = a.terms(&plural, Mode::Index);
                assert!(once.iter().all(|t| !is_stopword(t)), "{plural} -> {once:?}");
                assert_eq!(a.terms(&once.join(" "), Mode::Index), once, "{plural} is not stable");
            }
        }
    }

    #[test]
    fn fold_strips_combining_marks() {
        assert_eq!(fold("Ångström"), "Angstrom");
        assert_eq!(fold("naïve"), "naive");
    }

    #[test]
    fn porter_variant_stems() {
        let a = Analyzer::new(LemmatizerKind::Porter);
        assert_eq!(a.terms("running runners", Mode::Query), vec!["run", "runner"]);
    }
}
