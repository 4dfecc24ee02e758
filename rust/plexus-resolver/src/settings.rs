use plexus_common::Address;
use serde::{Deserialize, Serialize};

/// Who may bind new plugins on a dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationPolicy {
    /// Anyone.
    #[default]
    Open,
    /// Only the given address.
    Owner(Address),
}

impl RegistrationPolicy {
    /// Whether `registrant` may register plugins.
    pub fn permits(&self, registrant: &Address) -> bool {
        match self {
            RegistrationPolicy::Open => true,
            RegistrationPolicy::Owner(owner) => owner == registrant,
        }
    }
}

/// Configuration of a [`DispatchResolver`](crate::DispatchResolver).
///
/// ```rust
/// use plexus_resolver::{DispatchSettings, RegistrationPolicy};
///
/// let settings = DispatchSettings::from_json(
///     r#"{ "plugin_offset": 32, "registration": { "owner": "0x1111111111111111111111111111111111111111" } }"#,
/// )
/// .unwrap();
///
/// assert!(!settings.payable);
/// assert_eq!(settings.plugin_offset, 32);
/// assert!(matches!(settings.registration, RegistrationPolicy::Owner(_)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Whether the dispatcher accepts calls carrying value. Value is only
    /// ever forwarded to the plugin resolver.
    pub payable: bool,
    /// Byte offset of the plugin id inside attestation payloads.
    pub plugin_offset: usize,
    /// Who may register plugins.
    pub registration: RegistrationPolicy,
}

impl DispatchSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_to_an_open_non_payable_dispatcher() -> testresult::TestResult {
        let settings = DispatchSettings::from_json("{}")?;
        assert_eq!(settings, DispatchSettings::default());
        assert!(!settings.payable);
        assert_eq!(settings.plugin_offset, 0);
        assert_eq!(settings.registration, RegistrationPolicy::Open);
        Ok(())
    }

    #[test]
    fn owner_policy_only_permits_the_owner() {
        let owner = Address::derive(&[b"owner"]);
        let policy = RegistrationPolicy::Owner(owner);
        assert!(policy.permits(&owner));
        assert!(!policy.permits(&Address::derive(&[b"mallory"])));
        assert!(RegistrationPolicy::Open.permits(&Address::ZERO));
    }
}
