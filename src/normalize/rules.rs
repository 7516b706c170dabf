// Ordered regex rewrite rules.
//
// Every normalization stage is a fixed list of (pattern, replacement) pairs
// applied left to right, each one seeing the output of the one before it.
// Patterns are compiled once when the stage is built.

use anyhow::{Context, Result};
use regex_lite::Regex;

/// A single compiled substitution.
#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

/// A named, ordered list of substitutions.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: &'static str,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile `specs` in order. Replacements use `${n}` for capture groups.
    pub fn compile(name: &'static str, specs: &[(&'static str, &'static str)]) -> Result<Self> {
        let rules = specs
            .iter()
            .map(|&(pattern, replacement)| {
                let pattern = Regex::new(pattern)
                    .with_context(|| format!("compiling {name} rule /{pattern}/"))?;
                Ok(Rule {
                    pattern,
                    replacement,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name, rules })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule over `text`, in order.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.rules {
            let replaced = rule.pattern.replace_all(&out, rule.replacement);
            // replace_all borrows when nothing matched
            if let std::borrow::Cow::Owned(changed) = replaced {
                out = changed;
            }
        }
        out
    }
}

/// Whitespace cleanup shared by every stage.
///
/// Uses the ASCII `\s` class (space, tab, newline, vertical tab, form feed,
/// carriage return) so non-breaking spaces are left for the rewrite table.
#[derive(Debug, Clone)]
pub struct Whitespace {
    runs: Regex,
    edges: Regex,
}

impl Whitespace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            runs: Regex::new(r"\s+").context("compiling whitespace pattern")?,
            edges: Regex::new(r"^\s+|\s+$").context("compiling edge whitespace pattern")?,
        })
    }

    /// Collapse every whitespace run to one space. Leading and trailing
    /// runs become a single space rather than disappearing.
    pub fn collapse(&self, text: &str) -> String {
        self.runs.replace_all(text, " ").into_owned()
    }

    /// Strip leading/trailing whitespace, then collapse interior runs.
    pub fn squeeze(&self, text: &str) -> String {
        let trimmed = self.edges.replace_all(text, "");
        self.runs.replace_all(&trimmed, " ").into_owned()
    }
}
