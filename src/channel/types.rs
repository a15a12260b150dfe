//! Channel identifier sets.

use std::collections::BTreeSet;
use std::fmt;

/// Set of channel identifiers, unique and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSet(BTreeSet<String>);

impl ChannelSet {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn insert(&mut self, channel: impl Into<String>) -> bool {
        self.0.insert(channel.into())
    }

    #[cfg(test)]
    pub fn contains(&self, channel: &str) -> bool {
        self.0.contains(channel)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Channels in `self` that are not in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        self.0.difference(&other.0).cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ChannelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "[{}]", joined.join(", "))
    }
}
