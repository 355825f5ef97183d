use std::collections::HashMap;

use tracing::debug;

use crate::target::Target;

/// Named groups of targets.
///
/// Each group is a set, a target is a member at most once no matter how often
/// it is registered. Members keep their registration order.
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: HashMap<String, Vec<Target>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `target` to every group in `groups`.
    pub fn register<I>(&mut self, target: &Target, groups: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for group in groups {
            let members = self.groups.entry(group.into()).or_default();
            if !members.contains(target) {
                members.push(target.clone());
            }
        }
        debug!(function = target.name(), "registered function");
        self
    }

    /// The members of `group`, empty if nothing was registered under it.
    pub fn members(&self, group: &str) -> &[Target] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    /// The members of all `groups` one after another.
    ///
    /// A target in several of the groups shows up once for each of them.
    pub fn resolve<'g, I>(&self, groups: I) -> Vec<Target>
    where
        I: IntoIterator<Item = &'g str>,
    {
        groups
            .into_iter()
            .flat_map(|group| self.members(group))
            .cloned()
            .collect()
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Forget every group.
    pub fn reset(&mut self) {
        self.groups.clear();
    }
}
