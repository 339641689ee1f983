//! Development override table
//!
//! A fixed, case-sensitive map from known references to their IDs. The
//! resolver consults it only when dev mode is enabled, and a hit bypasses the
//! whole resolution chain.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::id::FacebookId;

const BUILTIN: [(&str, &str); 4] = [
    ("TheQbanguy", "100047085038525"),
    ("@TheQbanguy", "100047085038525"),
    ("theqbanguy", "100047085038525"),
    ("https://www.facebook.com/TheQbanguy", "100047085038525"),
];

#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<String, FacebookId>,
}

impl OverrideTable {
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut table = HashMap::new();
        for (key, value) in entries {
            let key = key.into();
            let id = FacebookId::parse(value.as_ref()).ok_or_else(|| {
                ConfigError::InvalidOverride {
                    key: key.clone(),
                    value: value.as_ref().to_string(),
                }
            })?;
            table.insert(key, id);
        }
        Ok(OverrideTable { entries: table })
    }

    /// The table shipped for local development.
    pub fn builtin() -> Self {
        OverrideTable {
            entries: BUILTIN
                .iter()
                .filter_map(|(k, v)| FacebookId::parse(v).map(|id| (k.to_string(), id)))
                .collect(),
        }
    }

    /// Looks up the raw input first, then its normalized form.
    pub fn get(&self, raw: &str, normalized: &str) -> Option<&FacebookId> {
        self.entries
            .get(raw)
            .or_else(|| self.entries.get(normalized))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
