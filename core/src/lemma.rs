//! Reduction of inflected words to their dictionary base form.

use crate::config::LemmatizerKind;
use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    Verb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lemma {
    pub text: String,
    pub pos: Option<PartOfSpeech>,
}

lazy_static! {
    static ref NOUNS: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("children","child"),("men","man"),("women","woman"),("mice","mouse"),("lice","louse"),
            ("geese","goose"),("feet","foot"),("teeth","tooth"),("oxen","ox"),("dice","die"),
            ("analyses","analysis"),("crises","crisis"),("theses","thesis"),("hypotheses","hypothesis"),
            ("diagnoses","diagnosis"),("parentheses","parenthesis"),("phenomena","phenomenon"),
            ("criteria","criterion"),("cacti","cactus"),("fungi","fungus"),("nuclei","nucleus"),
            ("radii","radius"),("stimuli","stimulus"),("alumni","alumnus"),("syllabi","syllabus"),
            ("foci","focus"),("genera","genus"),("corpora","corpus"),("indices","index"),
            ("matrices","matrix"),("appendices","appendix"),("vertices","vertex"),
            ("lives","life"),("wives","wife"),("knives","knife"),("wolves","wolf"),("leaves","leaf"),
            ("halves","half"),("calves","calf"),("shelves","shelf"),("thieves","thief"),("loaves","loaf"),
            ("movies","movie"),("cookies","cookie"),("calories","calorie"),("zombies","zombie"),
            ("rookies","rookie"),("prairies","prairie"),("genies","genie"),
        ];
        pairs.iter().copied().collect()
    };
    static ref VERBS: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("went","go"),("gone","go"),("ran","run"),("wrote","write"),("written","write"),
            ("sang","sing"),("sung","sing"),("began","begin"),("begun","begin"),("brought","bring"),
            ("bought","buy"),("caught","catch"),("chose","choose"),("chosen","choose"),("came","come"),
            ("drew","draw"),("drawn","draw"),("drove","drive"),("driven","drive"),("ate","eat"),
            ("eaten","eat"),("fell","fall"),("fallen","fall"),("flew","fly"),("flown","fly"),
            ("forgot","forget"),("forgotten","forget"),("froze","freeze"),("frozen","freeze"),
            ("gave","give"),("given","give"),("grew","grow"),("grown","grow"),("knew","know"),
            ("known","know"),("led","lead"),("made","make"),("met","meet"),("paid","pay"),
            ("rode","ride"),("ridden","ride"),("seen","see"),("sold","sell"),("sent","send"),
            ("shook","shake"),("spoke","speak"),("spoken","speak"),("stole","steal"),("stolen","steal"),
            ("swam","swim"),("swum","swim"),("taught","teach"),("thought","think"),("threw","throw"),
            ("thrown","throw"),("took","take"),("taken","take"),("told","tell"),
            ("understood","understand"),("woke","wake"),("wore","wear"),("worn","wear"),
            ("fought","fight"),("found","find"),("kept","keep"),("slept","sleep"),("built","build"),
            ("sought","seek"),("struck","strike"),("hid","hide"),("hidden","hide"),("bitten","bite"),
            ("broke","break"),("broken","break"),("became","become"),
        ];
        pairs.iter().copied().collect()
    };
    /// Words that look plural but are their own base form.
    static ref INVARIANT: HashSet<&'static str> = {
        let words: &[&str] = &[
            "news","series","species","means","physics","mathematics","politics","economics",
            "athletics","ethics","gymnastics","linguistics","genetics","measles","mumps","billiards",
            "always","perhaps","whereas","atlas","chaos","canvas","bias","alias","lens","christmas",
            "specimen","abdomen","omen","stamen","regimen","semen","hymen","yemen","carmen","bremen",
            "amen","cyclamen","acumen",
        ];
        words.iter().copied().collect()
    };
}

fn lookup(word: &str) -> Option<Lemma> {
    if let Some(base) = NOUNS.get(word) {
        return Some(Lemma { text: (*base).to_string(), pos: Some(PartOfSpeech::Noun) });
    }
    VERBS.get(word).map(|base| Lemma { text: (*base).to_string(), pos: Some(PartOfSpeech::Verb) })
}

/// Regular English plural detachment. Returns `None` when no rule applies.
fn detach_plural(word: &str) -> Option<String> {
    let len = word.chars().count();
    if len <= 3 || !word.chars().all(char::is_alphabetic) || INVARIANT.contains(word) {
        return None;
    }
    if len > 5 {
        if let Some(stem) = word.strip_suffix("men") {
            return Some(format!("{stem}man"));
        }
    }
    if len >= 5 {
        if let Some(stem) = word.strip_suffix("ies") {
            return Some(format!("{stem}y"));
        }
    }
    if ["sses", "shes", "ches", "xes", "zzes"].iter().any(|s| word.ends_with(s)) {
        return Some(word[..word.len() - 2].to_string());
    }
    if ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return None;
    }
    word.strip_suffix('s').map(str::to_string)
}

/// Lexicon-backed lemmatizer. Every lemma it produces maps to itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconLemmatizer;

impl LexiconLemmatizer {
    pub fn lemmatize(&self, word: &str) -> Lemma {
        if let Some(lemma) = lookup(word) {
            return lemma;
        }
        let mut current = word.to_string();
        let mut pos = None;
        while let Some(base) = detach_plural(&current) {
            if let Some(lemma) = lookup(&base) {
                return lemma;
            }
            current = base;
            pos = Some(PartOfSpeech::Noun);
        }
        Lemma { text: current, pos }
    }
}

pub enum Lemmatizer {
    Lexicon(LexiconLemmatizer),
    Porter(Stemmer),
}

impl Lemmatizer {
    pub fn new(kind: LemmatizerKind) -> Self {
        match kind {
            LemmatizerKind::Lexicon => Self::Lexicon(LexiconLemmatizer),
            LemmatizerKind::Porter => Self::Porter(Stemmer::create(Algorithm::English)),
        }
    }

    pub fn kind(&self) -> LemmatizerKind {
        match self {
            Self::Lexicon(_) => LemmatizerKind::Lexicon,
            Self::Porter(_) => LemmatizerKind::Porter,
        }
    }

    pub fn lemmatize(&self, word: &str) -> Lemma {
        match self {
            Self::Lexicon(l) => l.lemmatize(word),
            Self::Porter(stemmer) => Lemma { text: stemmer.stem(word).into_owned(), pos: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(word: &str) -> String { LexiconLemmatizer.lemmatize(word).text }

    #[test]
    fn regular_plurals() {
        assert_eq!(lemma("cities"), "city");
        assert_eq!(lemma("churches"), "church");
        assert_eq!(lemma("boxes"), "box");
        assert_eq!(lemma("classes"), "class");
        assert_eq!(lemma("days"), "day");
        assert_eq!(lemma("firemen"), "fireman");
    }

    #[test]
    fn guarded_words_are_untouched() {
        for w in ["glass", "bus", "virus", "analysis", "news", "gas", "1990s", "specimen"] {
            assert_eq!(lemma(w), w);
        }
    }

    #[test]
    fn men_rule_spares_names_and_short_words() {
        for w in ["yemen", "carmen", "amen", "bremen"] {
            assert_eq!(lemma(w), w);
        }
        assert_eq!(lemma("firemen"), "fireman");
        assert_eq!(lemma("policemen"), "policeman");
    }

    #[test]
    fn irregular_forms() {
        assert_eq!(LexiconLemmatizer.lemmatize("wolves"), Lemma { text: "wolf".into(), pos: Some(PartOfSpeech::Noun) });
        assert_eq!(LexiconLemmatizer.lemmatize("written"), Lemma { text: "write".into(), pos: Some(PartOfSpeech::Verb) });
        assert_eq!(LexiconLemmatizer.lemmatize("river").pos, None);
    }

    #[test]
    fn lexicon_entries_are_fixed_points() {
        for base in NOUNS.values().chain(VERBS.values()) {
            assert_eq!(lemma(base), *base, "{base} is not a fixed point");
        }
    }

    #[test]
    fn lemmas_are_fixed_points() {
        for w in ["omens", "firemens", "glasses", "bodies", "calories", "parties", "mountains"] {
            let once = lemma(w);
            assert_eq!(lemma(&once), once);
        }
    }
}
