use std::collections::BTreeMap;

use crate::error::{Result, SpatialRelError};
use crate::object::ObjectSummary;

/// Binary per-label flags recording which labels a scene contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    flags: Vec<bool>,
}

impl Presence {
    pub fn empty(max_labels: usize) -> Self {
        Self {
            flags: vec![false; max_labels],
        }
    }

    /// Number of label slots, i.e. the configured `max_labels`.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn contains(&self, label: u32) -> bool {
        self.flags.get(label as usize).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    /// Flags as `0`/`1` in label-index order.
    pub fn to_flags(&self) -> Vec<u8> {
        self.flags.iter().map(|&f| u8::from(f)).collect()
    }

    pub fn iter_present(&self) -> impl Iterator<Item = u32> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| i as u32)
    }
}

/// Objects extracted from one point cloud, keyed by label.
///
/// A label is flagged in [`Scene::presence`] exactly when it has an
/// [`ObjectSummary`]; both are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    objects: BTreeMap<u32, ObjectSummary>,
    presence: Presence,
}

impl Scene {
    pub fn empty(max_labels: usize) -> Self {
        Self {
            objects: BTreeMap::new(),
            presence: Presence::empty(max_labels),
        }
    }

    /// Assembles a scene from finished summaries. A repeated label keeps the
    /// last summary given for it.
    pub fn from_objects(
        max_labels: usize,
        objects: impl IntoIterator<Item = ObjectSummary>,
    ) -> Result<Self> {
        let mut scene = Self::empty(max_labels);
        for (index, obj) in objects.into_iter().enumerate() {
            let label = obj.label();
            if label as usize >= max_labels {
                return Err(SpatialRelError::LabelOutOfRange {
                    label,
                    max_labels,
                    point_index: index,
                });
            }
            scene.presence.flags[label as usize] = true;
            scene.objects.insert(label, obj);
        }
        Ok(scene)
    }

    pub fn max_labels(&self) -> usize {
        self.presence.len()
    }

    pub fn object(&self, label: u32) -> Option<&ObjectSummary> {
        self.objects.get(&label)
    }

    /// Summaries in ascending label order.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectSummary> + '_ {
        self.objects.values()
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn contains(&self, label: u32) -> bool {
        self.presence.contains(label)
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Both summaries when `a` and `b` co-occur in this scene.
    pub fn pair(&self, a: u32, b: u32) -> Option<(&ObjectSummary, &ObjectSummary)> {
        Some((self.objects.get(&a)?, self.objects.get(&b)?))
    }
}
