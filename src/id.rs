use serde::Serialize;
use std::fmt;

const MIN_ID_LEN: usize = 8;

/// A numeric Facebook user or page ID: eight or more ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FacebookId(String);

impl FacebookId {
    pub fn parse(s: &str) -> Option<Self> {
        if is_facebook_id(s) {
            Some(FacebookId(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacebookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_facebook_id(s: &str) -> bool {
    s.len() >= MIN_ID_LEN && s.bytes().all(|b| b.is_ascii_digit())
}
