// DocumentRecord: one parsed input line plus the fields normalization
// attaches to it.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::normalize::counts::TokenCounts;

/// A single document from the raw corpus.
///
/// `id`, `msg`, and `metadata` are fixed at parse time. The derived fields
/// are each written exactly once, in pipeline order.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub id: String,
    pub msg: String,
    /// Schema-specific extras (subject, author, date, counters...)
    pub metadata: BTreeMap<String, String>,
    msg_norm: Option<String>,
    lang_code: Option<String>,
    msg_topic: Option<String>,
    counts: Option<TokenCounts>,
}

/// Store `value` into an unset slot, refusing to overwrite.
fn write_once<T>(slot: &mut Option<T>, value: T, field: &str, id: &str) -> Result<()> {
    if slot.is_some() {
        anyhow::bail!("{field} already set for document {id}");
    }
    *slot = Some(value);
    Ok(())
}

impl DocumentRecord {
    pub fn new(id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            msg: msg.into(),
            metadata: BTreeMap::new(),
            msg_norm: None,
            lang_code: None,
            msg_topic: None,
            counts: None,
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn msg_norm(&self) -> Option<&str> {
        self.msg_norm.as_deref()
    }

    pub fn lang_code(&self) -> Option<&str> {
        self.lang_code.as_deref()
    }

    pub fn msg_topic(&self) -> Option<&str> {
        self.msg_topic.as_deref()
    }

    pub fn counts(&self) -> Option<&TokenCounts> {
        self.counts.as_ref()
    }

    pub fn set_msg_norm(&mut self, value: String) -> Result<()> {
        write_once(&mut self.msg_norm, value, "msg_norm", &self.id)
    }

    pub fn set_lang_code(&mut self, value: String) -> Result<()> {
        write_once(&mut self.lang_code, value, "lang_code", &self.id)
    }

    pub fn set_msg_topic(&mut self, value: String) -> Result<()> {
        write_once(&mut self.msg_topic, value, "msg_topic", &self.id)
    }

    pub fn set_counts(&mut self, value: TokenCounts) -> Result<()> {
        write_once(&mut self.counts, value, "counts", &self.id)
    }

    /// All populated fields as (name, value) pairs sorted by name, for display.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = vec![
            ("id".to_string(), self.id.clone()),
            ("msg".to_string(), self.msg.clone()),
        ];
        fields.extend(self.metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(v) = &self.msg_norm {
            fields.push(("msg_norm".to_string(), v.clone()));
        }
        if let Some(v) = &self.lang_code {
            fields.push(("lang_code".to_string(), v.clone()));
        }
        if let Some(v) = &self.msg_topic {
            fields.push(("msg_topic".to_string(), v.clone()));
        }
        if let Some(counts) = &self.counts {
            let pairs: Vec<String> = counts.iter().map(|(w, c)| format!("({w},{c})")).collect();
            fields.push(("counts".to_string(), format!("[{}]", pairs.join(" "))));
        }
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        fields
    }

    /// Value of a named field, used for `key=value` filtering.
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields()
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }
}
