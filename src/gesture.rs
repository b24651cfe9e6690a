//! Pointer-sample normalization into interaction intents, so at most one of
//! {tap, drag session} can ever be active for a banner.

/// Phase of a raw pointer sample as delivered by the host event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Moved,
    Up,
    /// Host-side interruption (e.g. an incoming call stealing the touch).
    Cancelled,
}

/// One raw pointer sample in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    #[must_use]
    pub const fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self { phase, x, y }
    }
}

/// Normalized interaction intent. Translations are vertical-only, relative
/// to the drag's starting point; horizontal motion is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureIntent {
    BeginDrag,
    ChangeDrag(f32),
    EndDrag(f32),
    Tap,
}

/// Resolves raw samples into intents. A press that travels beyond the slop
/// threshold becomes a drag session and can never resolve to a tap; a press
/// released inside the slop is a tap. No velocity tracking: release decisions
/// use only the final translation.
#[derive(Debug)]
pub struct GestureInterpreter {
    slop: f32,
    origin_y: Option<f32>,
    drag_active: bool,
    last_translation: f32,
}

impl GestureInterpreter {
    #[must_use]
    pub fn new(slop: f32) -> Self {
        Self {
            slop: slop.max(0.0),
            origin_y: None,
            drag_active: false,
            last_translation: 0.0,
        }
    }

    /// Whether a drag session is currently live (finger down, past slop).
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag_active
    }

    /// Drop any in-flight session without emitting intents.
    pub fn reset(&mut self) {
        self.origin_y = None;
        self.drag_active = false;
        self.last_translation = 0.0;
    }

    /// Feed one sample; returns zero, one, or two intents (a drag crossing
    /// the slop emits `BeginDrag` immediately followed by the first
    /// `ChangeDrag`).
    pub fn interpret(&mut self, sample: PointerSample) -> Vec<GestureIntent> {
        match sample.phase {
            PointerPhase::Down => {
                // A second press mid-session restarts tracking from here.
                self.origin_y = Some(sample.y);
                self.drag_active = false;
                self.last_translation = 0.0;
                Vec::new()
            }
            PointerPhase::Moved => {
                let Some(origin_y) = self.origin_y else {
                    return Vec::new();
                };
                let translation = sample.y - origin_y;
                self.last_translation = translation;
                if self.drag_active {
                    vec![GestureIntent::ChangeDrag(translation)]
                } else if translation.abs() > self.slop {
                    self.drag_active = true;
                    vec![
                        GestureIntent::BeginDrag,
                        GestureIntent::ChangeDrag(translation),
                    ]
                } else {
                    Vec::new()
                }
            }
            PointerPhase::Up => {
                let was_down = self.origin_y.is_some();
                let was_dragging = self.drag_active;
                let translation = if was_dragging {
                    sample.y - self.origin_y.unwrap_or(sample.y)
                } else {
                    0.0
                };
                self.reset();
                if was_dragging {
                    vec![GestureIntent::EndDrag(translation)]
                } else if was_down {
                    vec![GestureIntent::Tap]
                } else {
                    Vec::new()
                }
            }
            PointerPhase::Cancelled => {
                let was_dragging = self.drag_active;
                let translation = self.last_translation;
                self.reset();
                if was_dragging {
                    // End the session where it was; an armed tap is dropped.
                    vec![GestureIntent::EndDrag(translation)]
                } else {
                    Vec::new()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOP: f32 = 6.0;

    fn down(y: f32) -> PointerSample {
        PointerSample::new(PointerPhase::Down, 100.0, y)
    }

    fn moved(y: f32) -> PointerSample {
        PointerSample::new(PointerPhase::Moved, 100.0, y)
    }

    fn up(y: f32) -> PointerSample {
        PointerSample::new(PointerPhase::Up, 100.0, y)
    }

    #[test]
    fn press_release_inside_slop_is_a_tap() {
        let mut gestures = GestureInterpreter::new(SLOP);
        assert!(gestures.interpret(down(50.0)).is_empty());
        assert!(gestures.interpret(moved(52.0)).is_empty());
        assert_eq!(gestures.interpret(up(52.0)), vec![GestureIntent::Tap]);
    }

    #[test]
    fn crossing_slop_begins_a_drag_and_forecloses_tap() {
        let mut gestures = GestureInterpreter::new(SLOP);
        gestures.interpret(down(50.0));
        let intents = gestures.interpret(moved(60.0));
        assert_eq!(
            intents,
            vec![GestureIntent::BeginDrag, GestureIntent::ChangeDrag(10.0)]
        );
        assert!(gestures.is_dragging());
        assert_eq!(gestures.interpret(up(60.0)), vec![GestureIntent::EndDrag(10.0)]);
    }

    #[test]
    fn translation_is_vertical_only_and_relative_to_origin() {
        let mut gestures = GestureInterpreter::new(SLOP);
        gestures.interpret(down(100.0));
        // Large horizontal travel, no vertical travel: still inside slop.
        let sideways = gestures.interpret(PointerSample::new(PointerPhase::Moved, 500.0, 100.0));
        assert!(sideways.is_empty());

        gestures.interpret(moved(130.0));
        assert_eq!(
            gestures.interpret(moved(120.0)),
            vec![GestureIntent::ChangeDrag(20.0)]
        );
    }

    #[test]
    fn upward_drag_yields_negative_translation() {
        let mut gestures = GestureInterpreter::new(SLOP);
        gestures.interpret(down(100.0));
        let intents = gestures.interpret(moved(88.0));
        assert_eq!(
            intents,
            vec![GestureIntent::BeginDrag, GestureIntent::ChangeDrag(-12.0)]
        );
        assert_eq!(
            gestures.interpret(up(90.0)),
            vec![GestureIntent::EndDrag(-10.0)]
        );
    }

    #[test]
    fn cancelled_ends_a_live_drag_at_last_translation() {
        let mut gestures = GestureInterpreter::new(SLOP);
        gestures.interpret(down(100.0));
        gestures.interpret(moved(140.0));
        let intents = gestures.interpret(PointerSample::new(PointerPhase::Cancelled, 0.0, 0.0));
        assert_eq!(intents, vec![GestureIntent::EndDrag(40.0)]);
        assert!(!gestures.is_dragging());
    }

    #[test]
    fn cancelled_drops_an_armed_tap_silently() {
        let mut gestures = GestureInterpreter::new(SLOP);
        gestures.interpret(down(100.0));
        let intents = gestures.interpret(PointerSample::new(PointerPhase::Cancelled, 0.0, 0.0));
        assert!(intents.is_empty());
        assert!(gestures.interpret(up(100.0)).is_empty());
    }

    #[test]
    fn moves_without_a_press_are_ignored() {
        let mut gestures = GestureInterpreter::new(SLOP);
        assert!(gestures.interpret(moved(200.0)).is_empty());
        assert!(gestures.interpret(up(200.0)).is_empty());
    }

    #[test]
    fn tap_and_drag_are_mutually_exclusive_per_session() {
        let mut gestures = GestureInterpreter::new(SLOP);
        gestures.interpret(down(10.0));
        gestures.interpret(moved(30.0));
        // Returning to the origin does not re-arm the tap.
        gestures.interpret(moved(10.0));
        assert_eq!(gestures.interpret(up(10.0)), vec![GestureIntent::EndDrag(0.0)]);
    }
}
