use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use super::text::{normalize_query, NormalizePolicy};

/// A query exactly as it arrived: one phrase, or several terms matched with OR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuery {
    Text(CompactString),
    Terms(Vec<CompactString>),
}

impl Default for RawQuery {
    fn default() -> Self {
        RawQuery::Text(CompactString::default())
    }
}

impl From<&str> for RawQuery {
    fn from(value: &str) -> Self {
        RawQuery::Text(CompactString::from(value))
    }
}

impl RawQuery {
    pub fn terms(&self) -> Vec<&str> {
        match self {
            RawQuery::Text(text) => vec![text.as_str()],
            RawQuery::Terms(terms) => terms.iter().map(CompactString::as_str).collect(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.terms().iter().all(|t| t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryFlags {
    pub case_sensitive: bool,
    pub entire_word: bool,
    pub match_diacritics: bool,
    pub highlight_all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindQuery {
    pub raw: RawQuery,
    pub flags: QueryFlags,
}

impl FindQuery {
    pub fn new(raw: RawQuery, flags: QueryFlags) -> Self {
        Self { raw, flags }
    }

    pub fn policy(&self) -> NormalizePolicy {
        NormalizePolicy::new(self.flags.case_sensitive, self.flags.match_diacritics)
    }

    /// Normalizes the terms with this query's policy, dropping blank and
    /// duplicate terms.
    pub fn compile(&self) -> CompiledQuery {
        let policy = self.policy();
        let mut terms: Vec<CompactString> = Vec::new();
        for term in self.raw.terms() {
            let normalized = normalize_query(term, policy);
            if normalized.is_empty() || terms.iter().any(|t| t.as_str() == normalized) {
                continue;
            }
            terms.push(CompactString::from(normalized));
        }
        CompiledQuery {
            terms,
            policy,
            entire_word: self.flags.entire_word,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    terms: Vec<CompactString>,
    policy: NormalizePolicy,
    entire_word: bool,
}

impl CompiledQuery {
    pub fn terms(&self) -> &[CompactString] {
        &self.terms
    }

    pub fn policy(&self) -> NormalizePolicy {
        self.policy
    }

    pub fn entire_word(&self) -> bool {
        self.entire_word
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
