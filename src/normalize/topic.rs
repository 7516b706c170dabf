// Topic normalization (msg_norm -> msg_topic).
//
// An ordered cascade of pure string -> string stages. Later stages assume
// the earlier ones already ran: the punctuation stage, for instance, never
// sees digits or commas between digits because number removal came first.

use anyhow::{Context, Result};
use regex_lite::Regex;

use super::rewrite::RewriteTable;
use super::rules::{RuleSet, Whitespace};

const MARKUP_RULES: &[(&str, &str)] = &[
    // angle-bracket tags
    (r"<\S+>", " "),
    // links
    (r"https?://?\s*\S+\s", " "),
    (r"https?://?\s*\S+$", ""),
    (r"\(https?:\\\S+\)", " "),
    (r"\(?www\.\S+\)?", " "),
    (r"\[ID:[^\]]+\]", " "),
    (r"\[id:[^\]]+\]", " "),
    (r"\(PDF\)", " "),
    // named entities
    ("&mdash;", " "),
    ("&quot;", " "),
    ("&#39;", " "),
];

const NUMBER_RULES: &[(&str, &str)] = &[(r"[0-9,]+", " ")];

const PUNCTUATION_RULES: &[(&str, &str)] = &[
    // hyphens
    (r"^-+", ""),
    (r"--+", ""),
    (r"\s-+", ""),
    (r"^-(\s+)", "${1}"),
    (r"\s-(\S+)", " ${1}"),
    ("~", " "),
    ("\"", ""),
    // single quotes and backticks at word edges
    (r"^'+", ""),
    (r"'+$", ""),
    (r"'+\s+", " "),
    (r"\s+'+", " "),
    (r"\s+`+", " "),
    (r"^`+", " "),
    // parentheses, keeping what they wrap
    (r"\((\S+)", "${1}"),
    (r"(\S+)\)", "${1}"),
    (r":\s", " "),
    (r":$", ""),
    (r";\s", " "),
    (r";$", ""),
    (r"_+\s", " "),
    (r"^_+", ""),
    (r"_+$", ""),
    (r"__+", " "),
    // commas
    (r",+([A-Za-z])", " ${1}"),
    (r",+$", " "),
    (r",\.\s", " "),
    (r",\s", " "),
    // asterisks
    (r"\s\*+", " "),
    (r"\*+\s", " "),
    (r"\*\.", " "),
    (r"\s\*+\s", " "),
    (r"^\*+", ""),
    (r"\*+$", ""),
    // one terminator is enough
    (r"\?[!?]+", "? "),
    (r"![?!]+", "! "),
    (r"\.\.+", ". "),
    (r"\s/", " "),
    (r"/\s", " "),
    (r"[!?]+\s*$", ""),
    (r"\|", " "),
    (r"\\", " "),
];

const CAPITALIZED_RULES: &[(&str, &str)] = &[(r"[A-Z]\S*", " ")];

const ISOLATED_SYMBOL_RULES: &[(&str, &str)] = &[
    (r"\s[$.:()=/\\<>@\s-]+\s", " "),
    (r"^[$.:()=/\\<>@\s-]+\s", " "),
    (r"\s[$.:()=/\\<>@\s-]+$", " "),
];

/// Pass 2 of the cascade. Owns the rewrite table it was built with.
#[derive(Debug, Clone)]
pub struct TopicNormalizer {
    table: RewriteTable,
    whitespace: Whitespace,
    trailing_char: Regex,
    markup: RuleSet,
    numbers: RuleSet,
    punctuation: RuleSet,
    capitalized: RuleSet,
    isolated_symbols: RuleSet,
}

impl TopicNormalizer {
    pub fn new(table: RewriteTable) -> Result<Self> {
        Ok(Self {
            table,
            whitespace: Whitespace::new()?,
            trailing_char: Regex::new(r"\s+.$").context("compiling trailing character pattern")?,
            markup: RuleSet::compile("markup", MARKUP_RULES)?,
            numbers: RuleSet::compile("numbers", NUMBER_RULES)?,
            punctuation: RuleSet::compile("punctuation", PUNCTUATION_RULES)?,
            capitalized: RuleSet::compile("capitalized words", CAPITALIZED_RULES)?,
            isolated_symbols: RuleSet::compile("isolated symbols", ISOLATED_SYMBOL_RULES)?,
        })
    }

    pub fn table(&self) -> &RewriteTable {
        &self.table
    }

    /// Run the whole cascade. A result that is nothing but one space
    /// becomes the empty string.
    pub fn normalize(&self, msg_norm: &str) -> String {
        let msg = self.transliterate(msg_norm);
        let msg = self.remove_markup(&msg);
        let msg = self.remove_numbers(&msg);
        let msg = self.remove_nonsentential_punctuation(&msg);
        let msg = self.remove_capitalized_words(&msg);
        let msg = self.remove_isolated_symbols(&msg);
        let msg = self.whitespace.collapse(&msg);
        if msg == " " {
            String::new()
        } else {
            msg
        }
    }

    /// Map every character to ASCII, then tidy whitespace.
    ///
    /// A lone character after the final space is folded into a period
    /// ("pay in a b" -> "pay in a."). Kept as-is for compatibility with
    /// existing topic models.
    pub fn transliterate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            self.table.rewrite_into(c, &mut out);
        }
        let out = self.whitespace.squeeze(&out);
        self.trailing_char.replace_all(&out, ".").into_owned()
    }

    /// Drop tags, links, bracketed ids, and HTML entities.
    pub fn remove_markup(&self, text: &str) -> String {
        self.whitespace.squeeze(&self.markup.apply(text))
    }

    /// Replace digit/comma runs with a space. Whitespace is left alone.
    pub fn remove_numbers(&self, text: &str) -> String {
        self.numbers.apply(text)
    }

    pub fn remove_nonsentential_punctuation(&self, text: &str) -> String {
        self.whitespace.squeeze(&self.punctuation.apply(text))
    }

    /// Blank out anything starting with an uppercase letter, which in this
    /// corpus is mostly names, places, and acronyms.
    pub fn remove_capitalized_words(&self, text: &str) -> String {
        self.capitalized.apply(text)
    }

    pub fn remove_isolated_symbols(&self, text: &str) -> String {
        self.isolated_symbols.apply(text)
    }
}
