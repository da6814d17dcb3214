//! Configured transition chains.

use crate::jira::Transition;

/// Ordered workflow states an issue is expected to pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionChain {
    links: Vec<String>,
}

impl TransitionChain {
    /// Parses a comma-separated list of state names or transition ids.
    ///
    /// Entries are trimmed; empty entries are dropped.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self {
            links: input
                .split(',')
                .map(str::trim)
                .filter(|link| !link.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The chain links in order.
    #[must_use]
    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Position of `target` in the chain.
    #[must_use]
    pub fn position_of(&self, target: &str) -> Option<usize> {
        self.links.iter().position(|link| link == target)
    }

    /// Links that must be walked to reach `target`, excluding the target itself.
    ///
    /// Returns `None` when the target is not part of the chain.
    #[must_use]
    pub fn links_before(&self, target: &str) -> Option<&[String]> {
        self.position_of(target).map(|index| &self.links[..index])
    }
}

/// Picks the transition matching a chain link among those currently offered.
///
/// An id match always wins over a name match; names compare
/// case-insensitively. Only the first match is returned.
#[must_use]
pub fn select_transition<'a>(available: &'a [Transition], link: &str) -> Option<&'a Transition> {
    available
        .iter()
        .find(|transition| transition.id == link)
        .or_else(|| {
            available
                .iter()
                .find(|transition| transition.name.to_lowercase() == link.to_lowercase())
        })
}
