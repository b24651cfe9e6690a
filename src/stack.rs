//! Ordered stack of live banners: the single source of truth for vertical
//! offsets. Positions are running prefix sums of effective heights.

use tracing::debug;

use crate::controller::{BannerController, BannerId};

/// Insertion order = presentation order = top-to-bottom visual order.
#[derive(Default)]
pub(crate) struct BannerStack {
    entries: Vec<BannerController>,
}

impl BannerStack {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append at the end, assigning the new entry's position at the current
    /// total height.
    pub(crate) fn present(&mut self, mut controller: BannerController) {
        let position = self.total_height();
        controller.set_stack_position(position);
        debug!(id = controller.id().0, position, "banner joined stack");
        self.entries.push(controller);
    }

    /// Remove by id. Absent ids are a silent no-op: duplicate dismisses are
    /// expected (a timer can fire after the user already dismissed).
    pub(crate) fn remove(&mut self, id: BannerId) -> Option<BannerController> {
        let index = self.entries.iter().position(|entry| entry.id() == id)?;
        Some(self.remove_at(index))
    }

    /// Remove by index; later entries shift up by the removed height via the
    /// follow-up `reposition`.
    pub(crate) fn remove_at(&mut self, index: usize) -> BannerController {
        let removed = self.entries.remove(index);
        debug!(id = removed.id().0, "banner left stack");
        self.reposition();
        removed
    }

    /// Vertical offset of a live entry, always consistent with the current
    /// effective heights of everything above it.
    #[must_use]
    pub(crate) fn position_of(&self, id: BannerId) -> Option<f32> {
        let mut offset = 0.0;
        for entry in &self.entries {
            if entry.id() == id {
                return Some(offset);
            }
            offset += entry.effective_height();
        }
        None
    }

    /// Rewrite every entry's stored position as the running prefix sum.
    /// Cheap, and called after every transition so collapses shift survivors
    /// continuously.
    pub(crate) fn reposition(&mut self) {
        let mut offset = 0.0;
        for entry in &mut self.entries {
            entry.set_stack_position(offset);
            offset += entry.effective_height();
        }
    }

    #[must_use]
    pub(crate) fn total_height(&self) -> f32 {
        self.entries
            .iter()
            .map(BannerController::effective_height)
            .sum()
    }

    #[must_use]
    pub(crate) fn get(&self, id: BannerId) -> Option<&BannerController> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    #[must_use]
    pub(crate) fn get_mut(&mut self, id: BannerId) -> Option<&mut BannerController> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    #[must_use]
    pub(crate) fn entry_mut(&mut self, index: usize) -> &mut BannerController {
        &mut self.entries[index]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &BannerController> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut BannerController> {
        self.entries.iter_mut()
    }
}
