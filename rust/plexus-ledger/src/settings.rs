use plexus_resolver::DEFAULT_CALL_DEPTH_LIMIT;
use serde::{Deserialize, Serialize};

/// Configuration of a [`Ledger`](crate::Ledger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// How deep resolvers may nest calls to other resolvers.
    pub max_call_depth: usize,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_CALL_DEPTH_LIMIT,
        }
    }
}

impl LedgerSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_fills_in_defaults() -> testresult::TestResult {
        assert_eq!(LedgerSettings::from_json("{}")?, LedgerSettings::default());
        assert_eq!(
            LedgerSettings::from_json(r#"{ "max_call_depth": 8 }"#)?.max_call_depth,
            8
        );
        Ok(())
    }
}
