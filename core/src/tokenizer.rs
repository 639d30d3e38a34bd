use crate::analyzer::{Mode, Token};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref RE: Regex = Regex::new(r"\w+(?:\.?\w+)*").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "i","me","my","myself","we","our","ours","ourselves","you","you're","you've","you'll","you'd","your","yours","yourself","yourselves",
            "he","him","his","himself","she","she's","her","hers","herself","it","it's","its","itself",
            "they","them","their","theirs","themselves","what","which","who","whom","this","that","that'll","these","those",
            "am","is","are","was","were","be","been","being","have","has","had","having","do","does","did","doing",
            "a","an","the","and","but","if","or","because","as","until","while","of","at","by","for","with","about","against",
            "between","into","through","during","before","after","above","below","to","from","up","down","in","out","on","off",
            "over","under","again","further","then","once","here","there","when","where","why","how","all","any","both","each",
            "few","more","most","other","some","such","no","nor","not","only","own","same","so","than","too","very",
            "s","t","can","will","just","don","don't","should","should've","now","d","ll","m","o","re","ve","y",
            "ain","aren","aren't","couldn","couldn't","didn","didn't","doesn","doesn't","hadn","hadn't","hasn","hasn't",
            "haven","haven't","isn","isn't","ma","mightn","mightn't","mustn","mustn't","needn","needn't","shan","shan't",
            "shouldn","shouldn't","wasn","wasn't","weren","weren't","won","won't","wouldn","wouldn't"
        ];
        words.iter().copied().collect()
    };
}

/// Membership test against the English stopword list. Expects lowercased input.
pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

pub fn stopwords() -> impl Iterator<Item = &'static str> { STOPWORDS.iter().copied() }

/// Split text on word boundaries. Punctuation and whitespace never become tokens;
/// dots between word characters are kept so "U.S" stays one token.
pub fn tokenize(text: &str, mode: Mode) -> impl Iterator<Item = Token> + '_ {
    RE.find_iter(text)
        .enumerate()
        .map(move |(pos, mat)| Token::new(mat.as_str(), pos as u32, mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        let t: Vec<String> = tokenize("Hello, world! It's U.S.A-based.", Mode::Index).map(|t| t.text).collect();
        assert_eq!(t, vec!["Hello", "world", "It", "s", "U.S.A", "based"]);
    }

    #[test]
    fn positions_follow_raw_order() {
        let pos: Vec<u32> = tokenize("one two  three", Mode::Query).map(|t| t.position).collect();
        assert_eq!(pos, vec![0, 1, 2]);
    }
}
