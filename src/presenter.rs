//! Presentation manager: the public present/dismiss surface, pointer
//! routing, and the tick that drives every banner on one logical thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Sender;

use crate::announcement::{Announcement, CompletionFn};
use crate::config::EngineConfig;
use crate::controller::{
    BannerController, BannerId, BannerInstance, BannerState, ControllerAction,
};
use crate::gesture::PointerSample;
use crate::layout::{compute_layout, Rect};
use crate::render::{HostMetrics, Renderer};
use crate::stack::BannerStack;

/// Handle to a presented banner. Stays valid (and harmless) after the banner
/// is gone; operations on a dead handle are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BannerHandle {
    id: BannerId,
}

impl BannerHandle {
    #[must_use]
    pub fn id(&self) -> BannerId {
        self.id
    }

    pub(crate) fn from_id(id: BannerId) -> Self {
        Self { id }
    }
}

/// Host-observable lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerEvent {
    Presented { id: BannerId },
    Removed { id: BannerId },
}

/// Monotonic id source, shareable so a pump handle can pre-allocate ids
/// without a round trip to the engine thread.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdAllocator(Arc<AtomicU64>);

impl IdAllocator {
    pub(crate) fn next(&self) -> BannerId {
        BannerId(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

/// Owns the banner stack and the renderer for one host surface. All methods
/// take an explicit `now` so hosts and tests drive the clock; nothing here
/// blocks or spawns.
pub struct Presenter<R: Renderer> {
    stack: BannerStack,
    renderer: R,
    config: EngineConfig,
    metrics: HostMetrics,
    ids: IdAllocator,
    events_tx: Option<Sender<BannerEvent>>,
}

impl<R: Renderer> Presenter<R> {
    #[must_use]
    pub fn new(renderer: R, config: EngineConfig) -> Self {
        let metrics = renderer.metrics();
        Self {
            stack: BannerStack::new(),
            renderer,
            config,
            metrics,
            ids: IdAllocator::default(),
            events_tx: None,
        }
    }

    /// Attach a notification channel for host-side observation.
    #[must_use]
    pub fn with_events(mut self, events_tx: Sender<BannerEvent>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }

    /// Present a banner with no completion callback.
    pub fn present(&mut self, announcement: Announcement, now: Instant) -> BannerHandle {
        self.present_with(announcement, None, now)
    }

    /// Present a banner; `completion` fires exactly once when it fully
    /// leaves the stack.
    pub fn present_with(
        &mut self,
        announcement: Announcement,
        completion: Option<CompletionFn>,
        now: Instant,
    ) -> BannerHandle {
        let id = self.ids.next();
        self.present_with_id(id, announcement, completion, now)
    }

    pub(crate) fn present_with_id(
        &mut self,
        id: BannerId,
        announcement: Announcement,
        completion: Option<CompletionFn>,
        now: Instant,
    ) -> BannerHandle {
        let layout = compute_layout(
            &announcement,
            self.metrics,
            self.stack.is_empty(),
            &self.renderer,
        );
        let controller =
            BannerController::new(id, announcement, layout, self.config, completion, now);
        self.renderer.mount(controller.view());
        self.stack.present(controller);
        self.stack.reposition();
        self.apply_frames();
        self.notify(BannerEvent::Presented { id });
        BannerHandle { id }
    }

    /// Dismiss through the standard collapse. Idempotent and safe on an
    /// already-removed handle.
    pub fn dismiss(&mut self, handle: BannerHandle, now: Instant) {
        if let Some(controller) = self.stack.get_mut(handle.id) {
            controller.dismiss(now);
        }
    }

    /// Route one raw pointer sample to the targeted banner.
    pub fn pointer_event(&mut self, handle: BannerHandle, sample: PointerSample, now: Instant) {
        let metrics = self.metrics;
        let action = {
            let Self {
                stack, renderer, ..
            } = self;
            match stack.get_mut(handle.id) {
                Some(controller) => controller.pointer(sample, now, metrics, &*renderer),
                None => ControllerAction::None,
            }
        };
        if action == ControllerAction::Remove {
            self.finalize_removal(handle.id);
        }
        self.stack.reposition();
        self.apply_frames();
    }

    /// Advance timers and animations. Removals are applied in place, so a
    /// survivor observes the stack shift before its own events this tick.
    pub fn tick(&mut self, now: Instant) {
        let mut index = 0;
        while index < self.stack.len() {
            match self.stack.entry_mut(index).tick(now) {
                ControllerAction::Remove => {
                    let removed = self.stack.remove_at(index);
                    self.renderer.detach(removed.id());
                    self.notify(BannerEvent::Removed { id: removed.id() });
                }
                ControllerAction::None => index += 1,
            }
        }
        self.stack.reposition();
        self.apply_frames();
    }

    /// Device rotation / surface resize: recompute every live layout and
    /// reflow the whole stack.
    pub fn host_metrics_changed(&mut self, metrics: HostMetrics) {
        self.metrics = metrics;
        {
            let Self {
                stack, renderer, ..
            } = self;
            let mut first = true;
            for controller in stack.iter_mut() {
                let layout = compute_layout(
                    &controller.instance().announcement,
                    metrics,
                    first,
                    &*renderer,
                );
                controller.relayout(layout, metrics, &*renderer);
                first = false;
            }
        }
        self.stack.reposition();
        self.apply_frames();
    }

    #[must_use]
    pub fn banner_count(&self) -> usize {
        self.stack.len()
    }

    /// Whether the handle still refers to a live (not yet removed) banner.
    #[must_use]
    pub fn is_live(&self, handle: BannerHandle) -> bool {
        self.stack.get(handle.id).is_some()
    }

    #[must_use]
    pub fn state_of(&self, handle: BannerHandle) -> Option<BannerState> {
        self.stack.get(handle.id).map(BannerController::state)
    }

    #[must_use]
    pub fn instance_of(&self, handle: BannerHandle) -> Option<&BannerInstance> {
        self.stack.get(handle.id).map(BannerController::instance)
    }

    /// Vertical offset from the stack's prefix sums.
    #[must_use]
    pub fn position_of(&self, handle: BannerHandle) -> Option<f32> {
        self.stack.position_of(handle.id)
    }

    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.stack.total_height()
    }

    #[must_use]
    pub fn metrics(&self) -> HostMetrics {
        self.metrics
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub(crate) fn ids(&self) -> IdAllocator {
        self.ids.clone()
    }

    /// Stored positions must always equal freshly computed prefix sums.
    /// Exposed for the invariant checks in the test suites.
    #[must_use]
    pub fn positions_are_prefix_sums(&self) -> bool {
        let mut offset = 0.0_f32;
        for controller in self.stack.iter() {
            if (controller.instance().stack_position - offset).abs() > f32::EPSILON * 8.0 {
                return false;
            }
            offset += controller.effective_height();
        }
        true
    }

    fn finalize_removal(&mut self, id: BannerId) {
        if self.stack.remove(id).is_some() {
            self.renderer.detach(id);
            self.notify(BannerEvent::Removed { id });
        }
    }

    fn apply_frames(&mut self) {
        let width = self.metrics.width;
        let Self {
            stack, renderer, ..
        } = self;
        for controller in stack.iter() {
            let instance = controller.instance();
            let frame = Rect::new(
                0.0,
                instance.stack_position,
                width,
                instance.current_height,
            );
            renderer.apply(instance.id, &frame, controller.layout());
        }
    }

    fn notify(&self, event: BannerEvent) {
        if let Some(events_tx) = &self.events_tx {
            let _ = events_tx.send(event);
        }
    }
}
