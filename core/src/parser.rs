//! Conversion of raw article dumps into page records and redirect aliases.
//!
//! A dump is plain text. Pages are separated by two blank lines. Inside a page,
//! `[[Title]]`, `#REDIRECT <target>` and `CATEGORIES:<a>, <b>` lines are
//! structural; every other non-empty line is body text.

use crate::error::{Error, Result};
use crate::index::{PageRecord, RedirectMap};
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref TEMPLATE: Regex = Regex::new(r"(?s)\[tpl\].*?\[/tpl\]").expect("valid regex");
    static ref REFERENCE: Regex = Regex::new(r"(?s)\[ref\].*?\[/ref\]").expect("valid regex");
    static ref URL: Regex = Regex::new(r"http\S+|www.\S+").expect("valid regex");
    static ref TITLE: Regex = Regex::new(r"^\[\[(.*?)\]\]$").expect("valid regex");
    static ref REDIRECT: Regex = Regex::new(r"(?i)^#REDIRECT (.*)").expect("valid regex");
    static ref CATEGORY: Regex = Regex::new(r"^CATEGORIES:(.*)").expect("valid regex");
}

const PAGE_DELIMITER: &str = "\n\n\n";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParseResult {
    pub pages: BTreeSet<PageRecord>,
    pub redirects: RedirectMap,
    /// Every title seen on a redirect block. None of them is ever a page.
    pub aliases: BTreeSet<String>,
}

impl ParseResult {
    pub fn merge(&mut self, other: ParseResult) {
        self.pages.extend(other.pages);
        for (target, aliases) in other.redirects {
            let entry = self.redirects.entry(target).or_default();
            for alias in aliases {
                if !entry.contains(&alias) {
                    entry.push(alias);
                }
            }
        }
        self.aliases.extend(other.aliases);
        let aliases = &self.aliases;
        self.pages.retain(|p| !aliases.contains(&p.title));
    }

    pub fn alias_count(&self) -> usize { self.redirects.values().map(Vec::len).sum() }
}

/// Remove template blocks, reference blocks and bare URLs.
pub fn preprocess(text: &str) -> String {
    let text = TEMPLATE.replace_all(text, "");
    let text = REFERENCE.replace_all(&text, "");
    URL.replace_all(&text, "").into_owned()
}

pub fn parse_text(text: &str) -> ParseResult {
    let cleaned = preprocess(&text.replace("\r\n", "\n"));
    let mut result = ParseResult::default();
    for block in cleaned.split(PAGE_DELIMITER) {
        parse_block(block, &mut result);
    }
    let aliases = &result.aliases;
    result.pages.retain(|p| !aliases.contains(&p.title));
    result
}

fn parse_block(block: &str, result: &mut ParseResult) {
    let mut page = PageRecord::default();
    let mut targets: Vec<String> = Vec::new();

    for line in block.split('\n').filter(|l| !l.is_empty()) {
        if let Some(caps) = TITLE.captures(line) {
            page.title = caps[1].to_string();
        } else if let Some(caps) = REDIRECT.captures(line) {
            targets.push(caps[1].trim().to_string());
        } else if let Some(caps) = CATEGORY.captures(line) {
            page.categories = caps[1]
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
        } else {
            page.content.push_str(line);
        }
    }

    if page.title.is_empty() {
        return;
    }
    if !targets.is_empty() {
        for target in targets.into_iter().filter(|t| !t.is_empty()) {
            let aliases = result.redirects.entry(target).or_default();
            if !aliases.contains(&page.title) {
                aliases.push(page.title.clone());
            }
        }
        result.aliases.insert(page.title);
    } else if !result.aliases.contains(&page.title) {
        result.pages.insert(page);
    }
}

pub fn parse_file(path: &Path) -> Result<ParseResult> {
    let text = fs::read_to_string(path)?;
    let result = parse_text(&text);
    tracing::debug!(file = %path.display(), pages = result.pages.len(), aliases = result.aliases.len(), "parsed dump file");
    Ok(result)
}

/// Regular files directly inside `dir`, sorted by path.
pub fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Parse every dump file of a corpus directory in parallel and merge the results.
pub fn parse_corpus_dir(dir: &Path) -> Result<ParseResult> {
    let files = corpus_files(dir)?;
    tracing::info!(dir = %dir.display(), files = files.len(), "started parsing files");
    let parsed = files.par_iter().map(|f| parse_file(f)).collect::<Result<Vec<_>>>()?;
    let mut merged = ParseResult::default();
    for result in parsed {
        merged.merge(result);
    }
    tracing::info!(pages = merged.pages.len(), aliases = merged.alias_count(), "finished parsing files");
    Ok(merged)
}
