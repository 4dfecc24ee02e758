use std::fmt::{Debug, Display, Formatter};

use plexus_common::Word;
use serde::{Deserialize, Serialize};

/// Identifier of a plugin registration.
///
/// Issued by a [`PluginRegistry`](crate::PluginRegistry) and embedded by
/// attesters as a word of their attestation payload.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(Word);

impl PluginId {
    /// The underlying word.
    pub fn word(&self) -> &Word {
        &self.0
    }
}

impl From<Word> for PluginId {
    fn from(word: Word) -> Self {
        Self(word)
    }
}

impl From<PluginId> for Word {
    fn from(plugin: PluginId) -> Self {
        plugin.0
    }
}

impl Display for PluginId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for PluginId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PluginId({})", self.0)
    }
}
