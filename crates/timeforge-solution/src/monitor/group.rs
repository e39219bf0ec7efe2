//! Group monitors.

use crate::ids::MonitorId;

/// Aggregates the cost of its children and tracks those with non-zero cost.
///
/// The group's own cost lives on the enclosing [`Monitor`](super::Monitor)
/// and always equals the sum of its children's costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMonitor {
    tag: String,
    pub(crate) children: Vec<MonitorId>,
    pub(crate) defects: Vec<MonitorId>,
}

impl GroupMonitor {
    pub(crate) fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: Vec::new(),
            defects: Vec::new(),
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn children(&self) -> &[MonitorId] {
        &self.children
    }

    /// Children with non-zero cost, in no particular order.
    #[inline]
    pub fn defects(&self) -> &[MonitorId] {
        &self.defects
    }

    /// Appends a defect, returning its index.
    pub(crate) fn push_defect(&mut self, child: MonitorId) -> usize {
        self.defects.push(child);
        self.defects.len() - 1
    }

    /// Removes the defect at `index` by swapping in the last one.
    ///
    /// Returns the defect that moved into `index`, if any.
    pub(crate) fn swap_remove_defect(&mut self, index: usize) -> Option<MonitorId> {
        self.defects.swap_remove(index);
        self.defects.get(index).copied()
    }
}
