//! Descriptor groups keyed by group id

use crate::descriptor::Descriptor;
use std::collections::BTreeMap;

/// All descriptors sharing one group id, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorGroup {
    id: u64,
    members: Vec<Descriptor>,
}

impl DescriptorGroup {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            members: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// First non-empty caption among the members
    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.members
            .iter()
            .map(|d| d.caption.as_str())
            .find(|c| !c.is_empty())
    }

    #[must_use]
    pub fn members(&self) -> &[Descriptor] {
        &self.members
    }

    fn push(&mut self, descriptor: Descriptor) {
        self.members.push(descriptor);
    }
}

/// Registry of descriptor groups produced by one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorRegistry {
    groups: BTreeMap<u64, DescriptorGroup>,
}

impl DescriptorRegistry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor to its group, creating the group on first sight
    pub fn insert(&mut self, descriptor: Descriptor) {
        self.groups
            .entry(descriptor.group_id)
            .or_insert_with(|| DescriptorGroup::new(descriptor.group_id))
            .push(descriptor);
    }

    /// Register a group that has no positions
    pub fn ensure_group(&mut self, id: u64) -> &DescriptorGroup {
        self.groups.entry(id).or_insert_with(|| DescriptorGroup::new(id))
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&DescriptorGroup> {
        self.groups.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.groups.contains_key(&id)
    }

    /// Groups in ascending id order
    pub fn groups(&self) -> impl Iterator<Item = &DescriptorGroup> {
        self.groups.values()
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of descriptors across all groups
    #[must_use]
    pub fn descriptor_count(&self) -> usize {
        self.groups.values().map(|g| g.members.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Annotation;
    use crate::orientation::Facing;
    use mcb_world::Position;

    fn descriptor(id: u64, caption: &str, x: i32) -> Descriptor {
        Descriptor::new(
            Annotation {
                group_id: id,
                caption: caption.to_string(),
            },
            Position::new(x, 64, 0),
            Facing::South,
            0,
        )
    }

    #[test]
    fn first_non_empty_caption_wins() {
        let mut registry = DescriptorRegistry::new();
        registry.insert(descriptor(1, "", 0));
        registry.insert(descriptor(1, "Vault", 1));
        registry.insert(descriptor(1, "Other", 2));

        let group = registry.get(1).unwrap();
        assert_eq!(group.caption(), Some("Vault"));
        assert_eq!(group.members().len(), 3);
        assert_eq!(group.members()[0].position, Position::new(0, 64, 0));
    }

    #[test]
    fn group_without_captions_has_none() {
        let mut registry = DescriptorRegistry::new();
        registry.insert(descriptor(2, "", 0));
        assert_eq!(registry.get(2).unwrap().caption(), None);
    }

    #[test]
    fn grouping_ignores_insertion_order_across_groups() {
        let mut a = DescriptorRegistry::new();
        a.insert(descriptor(1, "A", 0));
        a.insert(descriptor(2, "B", 1));

        let mut b = DescriptorRegistry::new();
        b.insert(descriptor(2, "B", 1));
        b.insert(descriptor(1, "A", 0));

        assert_eq!(a, b);
        assert_eq!(a.groups().map(DescriptorGroup::id).collect::<Vec<_>>(), [1, 2]);
        assert_eq!(a.descriptor_count(), 2);
    }

    #[test]
    fn ensured_group_is_empty() {
        let mut registry = DescriptorRegistry::new();
        registry.ensure_group(8);
        assert!(registry.contains(8));
        assert!(registry.get(8).unwrap().members().is_empty());
        assert_eq!(registry.descriptor_count(), 0);
    }

}
