//! Per-banner lifecycle state machine: presentation, steady display, the
//! drag session, and every dismissal path.

use std::time::Instant;

use tracing::debug;

use crate::animation::HeightAnimation;
use crate::announcement::{ActionFn, Announcement, CompletionFn};
use crate::config::EngineConfig;
use crate::gesture::{GestureIntent, GestureInterpreter, PointerSample};
use crate::layout::{self, BannerLayout};
use crate::render::{BannerView, HostMetrics, TextMeasure};
use crate::timer::DismissTimer;

/// Damping divisor applied to drag translation past the natural expansion
/// point.
const RUBBER_BAND_DIVISOR: f32 = 25.0;

/// Release translation below this (an upward flick) dismisses outright.
const FLICK_DISMISS_THRESHOLD: f32 = -5.0;

/// Opaque banner identity, monotonic per presenter. Identity is the only
/// equality that matters; two banners with equal content are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BannerId(pub u64);

/// Lifecycle states. `Removed` is terminal; nothing is processed after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    Presenting,
    Displayed,
    Dragging,
    AutoDismissing,
    Dismissing,
    Removed,
}

/// Live data for one banner. Owned exclusively by its controller; the stack
/// writes `stack_position`, everything else is controller-internal.
#[derive(Debug)]
pub struct BannerInstance {
    pub id: BannerId,
    pub announcement: Announcement,
    /// Resting height from the last layout pass.
    pub base_height: f32,
    /// Live height during transitions and drags.
    pub current_height: f32,
    pub state: BannerState,
    /// Vertical offset assigned by the stack.
    pub stack_position: f32,
}

/// Where a drag release resolves once its snap animation completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReleaseRoute {
    /// Upward flick: straight to Removed, no dismiss choreography.
    FlickRemove,
    /// Pending dismiss honored: proceed through Dismissing.
    Dismiss,
    /// Return to rest.
    Settle,
}

/// What the presenter must do after feeding an event to a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub(crate) enum ControllerAction {
    None,
    /// Terminal state reached; release stack membership and host views.
    Remove,
}

pub(crate) struct BannerController {
    instance: BannerInstance,
    layout: BannerLayout,
    view: BannerView,
    timer: DismissTimer,
    gestures: GestureInterpreter,
    animation: Option<HeightAnimation>,
    /// Timer fired while it could not be honored immediately (presenting or
    /// mid-drag); resolved at the next settle point.
    pending_dismiss: bool,
    release_route: Option<ReleaseRoute>,
    /// Subtitle growth available to the drag (expanded minus collapsed).
    expanded_delta: f32,
    /// Collapsed subtitle height captured at drag begin, restored at release.
    collapsed_subtitle: f32,
    completion: Option<CompletionFn>,
    action: Option<ActionFn>,
    config: EngineConfig,
}

impl BannerController {
    pub(crate) fn new(
        id: BannerId,
        mut announcement: Announcement,
        layout: BannerLayout,
        config: EngineConfig,
        completion: Option<CompletionFn>,
        now: Instant,
    ) -> Self {
        let action = announcement.action.take();
        let view = BannerView::from_announcement(id, &announcement);
        let duration = announcement.duration;
        let base_height = layout.base_height;

        let mut timer = DismissTimer::new();
        timer.schedule(now, duration);
        debug!(id = id.0, base_height, ?duration, "presenting banner");

        Self {
            instance: BannerInstance {
                id,
                announcement,
                base_height,
                current_height: 0.0,
                state: BannerState::Presenting,
                stack_position: 0.0,
            },
            layout,
            view,
            timer,
            gestures: GestureInterpreter::new(config.drag_slop),
            animation: Some(HeightAnimation::new(
                0.0,
                base_height,
                now,
                config.present_duration(),
            )),
            pending_dismiss: false,
            release_route: None,
            expanded_delta: 0.0,
            collapsed_subtitle: 0.0,
            completion,
            action,
            config,
        }
    }

    #[must_use]
    pub(crate) fn id(&self) -> BannerId {
        self.instance.id
    }

    #[must_use]
    pub(crate) fn state(&self) -> BannerState {
        self.instance.state
    }

    #[must_use]
    pub(crate) fn instance(&self) -> &BannerInstance {
        &self.instance
    }

    #[must_use]
    pub(crate) fn layout(&self) -> &BannerLayout {
        &self.layout
    }

    #[must_use]
    pub(crate) fn view(&self) -> &BannerView {
        &self.view
    }

    pub(crate) fn set_stack_position(&mut self, position: f32) {
        self.instance.stack_position = position;
    }

    /// Height this banner contributes to stack prefix sums. A live drag
    /// never displaces later banners; any collapse repositions them
    /// continuously; snapback overshoot never pushes them down.
    #[must_use]
    pub(crate) fn effective_height(&self) -> f32 {
        if self.instance.state == BannerState::Dragging && self.gestures.is_dragging() {
            self.instance.base_height
        } else {
            self.instance.current_height.min(self.instance.base_height)
        }
    }

    /// Advance timers and animations to `now`. Serialized with every other
    /// event for this controller.
    pub(crate) fn tick(&mut self, now: Instant) -> ControllerAction {
        if self.instance.state == BannerState::Removed {
            return ControllerAction::None;
        }
        if self.timer.poll(now) {
            match self.instance.state {
                BannerState::Displayed => {
                    self.begin_collapse(BannerState::AutoDismissing, now);
                }
                BannerState::Presenting | BannerState::Dragging => {
                    // Remembered, not discarded; honored at the next settle.
                    self.pending_dismiss = true;
                }
                _ => {}
            }
        }
        if let Some(animation) = &self.animation {
            self.instance.current_height = animation.value_at(now);
            if animation.is_complete(now) {
                self.animation = None;
                return self.animation_completed(now);
            }
        }
        ControllerAction::None
    }

    /// Feed one raw pointer sample for this banner.
    pub(crate) fn pointer(
        &mut self,
        sample: PointerSample,
        now: Instant,
        metrics: HostMetrics,
        measure: &dyn TextMeasure,
    ) -> ControllerAction {
        if matches!(
            self.instance.state,
            BannerState::AutoDismissing | BannerState::Dismissing | BannerState::Removed
        ) {
            return ControllerAction::None;
        }
        for intent in self.gestures.interpret(sample) {
            match intent {
                GestureIntent::BeginDrag => self.begin_drag(metrics, measure),
                GestureIntent::ChangeDrag(translation) => self.change_drag(translation),
                GestureIntent::EndDrag(translation) => self.end_drag(translation, now),
                GestureIntent::Tap => return self.tap(now),
            }
        }
        ControllerAction::None
    }

    /// External dismiss request; a no-op once a dismissal is already
    /// underway or the banner is gone.
    pub(crate) fn dismiss(&mut self, now: Instant) {
        match self.instance.state {
            BannerState::Presenting | BannerState::Displayed | BannerState::Dragging => {
                self.begin_collapse(BannerState::Dismissing, now);
            }
            _ => {}
        }
    }

    /// Apply a fresh layout after host metrics changed.
    pub(crate) fn relayout(
        &mut self,
        layout: BannerLayout,
        metrics: HostMetrics,
        measure: &dyn TextMeasure,
    ) {
        let base_height = layout.base_height;
        self.layout = layout;
        self.instance.base_height = base_height;
        match self.instance.state {
            BannerState::Displayed => self.instance.current_height = base_height,
            BannerState::Presenting => {
                if let Some(animation) = &mut self.animation {
                    animation.retarget(base_height);
                }
            }
            BannerState::Dragging => {
                self.collapsed_subtitle =
                    layout::collapsed_subtitle_height(&self.instance.announcement, metrics, measure);
                let expanded =
                    layout::expanded_subtitle_height(&self.instance.announcement, metrics, measure);
                self.expanded_delta = (expanded - self.collapsed_subtitle).max(0.0);
                if self.gestures.is_dragging() {
                    self.layout.subtitle_frame.height = expanded;
                } else if self.release_route == Some(ReleaseRoute::Settle) {
                    if let Some(animation) = &mut self.animation {
                        animation.retarget(base_height);
                    }
                }
            }
            _ => {}
        }
    }

    fn animation_completed(&mut self, now: Instant) -> ControllerAction {
        match self.instance.state {
            BannerState::Presenting => {
                if self.pending_dismiss {
                    // Covers zero and shorter-than-presentation durations.
                    self.begin_collapse(BannerState::AutoDismissing, now);
                } else {
                    self.set_state(BannerState::Displayed);
                }
                ControllerAction::None
            }
            BannerState::Dragging => match self.release_route.take() {
                Some(ReleaseRoute::FlickRemove) => self.finish_removal(),
                Some(ReleaseRoute::Dismiss) => {
                    self.begin_collapse(BannerState::Dismissing, now);
                    ControllerAction::None
                }
                Some(ReleaseRoute::Settle) | None => {
                    if self.pending_dismiss {
                        // Timer expired during the snapback.
                        self.begin_collapse(BannerState::AutoDismissing, now);
                    } else {
                        self.set_state(BannerState::Displayed);
                    }
                    ControllerAction::None
                }
            },
            BannerState::AutoDismissing | BannerState::Dismissing => self.finish_removal(),
            _ => ControllerAction::None,
        }
    }

    fn begin_drag(&mut self, metrics: HostMetrics, measure: &dyn TextMeasure) {
        match self.instance.state {
            BannerState::Displayed => {
                self.collapsed_subtitle =
                    layout::collapsed_subtitle_height(&self.instance.announcement, metrics, measure);
                let expanded =
                    layout::expanded_subtitle_height(&self.instance.announcement, metrics, measure);
                self.expanded_delta = (expanded - self.collapsed_subtitle).max(0.0);
                // Reflow the subtitle at full size for the session.
                self.layout.subtitle_frame.height = expanded;
                self.set_state(BannerState::Dragging);
            }
            BannerState::Dragging => {
                // Re-grab during the release snap resumes the session; the
                // pending-dismiss latch survives.
                self.animation = None;
                self.release_route = None;
                self.layout.subtitle_frame.height =
                    self.collapsed_subtitle + self.expanded_delta;
            }
            _ => {}
        }
    }

    fn change_drag(&mut self, translation: f32) {
        if self.instance.state != BannerState::Dragging {
            return;
        }
        let base = self.instance.base_height;
        // 1:1 up to the natural expansion point, heavily damped past it.
        // No lower clamp: an upward drag may push the height negative until
        // release resolves it.
        self.instance.current_height = if translation < self.expanded_delta {
            base + translation
        } else {
            base + self.expanded_delta
                + (translation - self.expanded_delta) / RUBBER_BAND_DIVISOR
        };
    }

    fn end_drag(&mut self, translation: f32, now: Instant) {
        if self.instance.state != BannerState::Dragging {
            return;
        }
        // Subtitle returns to its collapsed cap whichever way this resolves.
        self.layout.subtitle_frame.height = self.collapsed_subtitle;
        let flick = translation < FLICK_DISMISS_THRESHOLD;
        let target = if flick || self.pending_dismiss {
            0.0
        } else {
            self.instance.base_height
        };
        self.release_route = Some(if flick {
            ReleaseRoute::FlickRemove
        } else if self.pending_dismiss {
            ReleaseRoute::Dismiss
        } else {
            ReleaseRoute::Settle
        });
        debug!(
            id = self.instance.id.0,
            translation,
            target,
            "drag released"
        );
        self.animation = Some(HeightAnimation::new(
            self.instance.current_height,
            target,
            now,
            self.config.snap_duration(),
        ));
    }

    fn tap(&mut self, now: Instant) -> ControllerAction {
        if self.instance.state != BannerState::Displayed {
            return ControllerAction::None;
        }
        if let Some(action) = self.action.take() {
            action();
        }
        self.begin_collapse(BannerState::Dismissing, now);
        ControllerAction::None
    }

    fn begin_collapse(&mut self, into: BannerState, now: Instant) {
        self.timer.cancel();
        self.gestures.reset();
        self.release_route = None;
        self.animation = Some(HeightAnimation::new(
            self.instance.current_height,
            0.0,
            now,
            self.config.collapse_duration(),
        ));
        self.set_state(into);
    }

    fn finish_removal(&mut self) -> ControllerAction {
        self.instance.current_height = 0.0;
        self.set_state(BannerState::Removed);
        self.teardown();
        if let Some(completion) = self.completion.take() {
            completion();
        }
        ControllerAction::Remove
    }

    /// Deterministic resource release at the terminal state.
    fn teardown(&mut self) {
        self.timer.cancel();
        self.gestures.reset();
        self.animation = None;
        self.pending_dismiss = false;
        self.release_route = None;
    }

    fn set_state(&mut self, next: BannerState) {
        if self.instance.state != next {
            debug!(
                id = self.instance.id.0,
                from = ?self.instance.state,
                to = ?next,
                "banner state"
            );
            self.instance.state = next;
        }
    }
}
