//! End-to-end lifecycle tests driving the public presenter API with a
//! synthetic clock.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use proptest::prelude::*;
use rstest::rstest;

use bannerstack::{
    Announcement, BannerState, CompletionFn, EngineConfig, HostMetrics, PointerPhase,
    PointerSample, Presenter, TextGridRenderer,
};

const PRESENT: Duration = Duration::from_millis(350);
const COLLAPSE: Duration = Duration::from_millis(350);
const SNAP: Duration = Duration::from_millis(200);

fn presenter() -> Presenter<TextGridRenderer> {
    Presenter::new(
        TextGridRenderer::new(HostMetrics::default()),
        EngineConfig::default(),
    )
}

fn counting_completion() -> (Arc<AtomicU32>, CompletionFn) {
    let count = Arc::new(AtomicU32::new(0));
    let count_clone = Arc::clone(&count);
    (
        count,
        Box::new(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        }),
    )
}

fn sample(phase: PointerPhase, y: f32) -> PointerSample {
    PointerSample::new(phase, 0.0, y)
}

#[test]
fn two_banner_timeline_matches_reference_scenario() {
    let t0 = Instant::now();
    let mut presenter = presenter();
    let (completions, completion) = counting_completion();

    // Banner A: 4 s duration, no image, subtitle "x".
    let a = presenter.present_with(
        Announcement::new("A", "x").with_duration(Duration::from_secs(4)),
        Some(completion),
        t0,
    );
    presenter.tick(t0 + PRESENT);
    assert_eq!(presenter.state_of(a), Some(BannerState::Displayed));

    // Banner B arrives one second later and lands below A.
    let b = presenter.present(Announcement::new("B", "y"), t0 + Duration::from_secs(1));
    let base_a = presenter.instance_of(a).unwrap().base_height;
    assert_eq!(presenter.position_of(a), Some(0.0));
    assert_eq!(presenter.position_of(b), Some(base_a));
    assert!(presenter.positions_are_prefix_sums());

    // At t = 4 s with no interaction, A starts auto-dismissing.
    presenter.tick(t0 + Duration::from_secs(4));
    assert_eq!(presenter.state_of(a), Some(BannerState::AutoDismissing));
    assert_eq!(completions.load(Ordering::SeqCst), 0);

    // Collapse finishes: A is gone, B shifted to the top, completion fired
    // exactly once.
    presenter.tick(t0 + Duration::from_secs(4) + COLLAPSE);
    assert!(!presenter.is_live(a));
    assert_eq!(presenter.position_of(b), Some(0.0));
    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert!(presenter.positions_are_prefix_sums());

    // Late ticks never re-fire the completion.
    presenter.tick(t0 + Duration::from_secs(10));
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

#[test]
fn removing_the_first_banner_shifts_all_survivors_by_its_height() {
    let t0 = Instant::now();
    let mut presenter = presenter();
    let mut handles = Vec::new();
    let mut now = t0;
    for index in 0..4 {
        handles.push(presenter.present(
            Announcement::new(format!("banner {index}"), "body")
                .with_duration(Duration::from_secs(60)),
            now,
        ));
        now += PRESENT;
        presenter.tick(now);
    }
    let first_base = presenter.instance_of(handles[0]).unwrap().base_height;
    let before: Vec<f32> = handles[1..]
        .iter()
        .map(|handle| presenter.position_of(*handle).unwrap())
        .collect();

    presenter.dismiss(handles[0], now);
    presenter.tick(now + COLLAPSE);
    assert!(!presenter.is_live(handles[0]));

    let after: Vec<f32> = handles[1..]
        .iter()
        .map(|handle| presenter.position_of(*handle).unwrap())
        .collect();
    for (b, a) in before.iter().zip(&after) {
        assert!((b - a - first_base).abs() < 1e-3, "shift must equal removed height");
    }
    // Relative order unchanged.
    for pair in after.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    assert!(presenter.positions_are_prefix_sums());
}

#[test]
fn tap_fires_action_once_and_skips_the_timer() {
    let t0 = Instant::now();
    let mut presenter = presenter();
    let taps = Arc::new(AtomicU32::new(0));
    let taps_clone = Arc::clone(&taps);
    let (completions, completion) = counting_completion();

    let handle = presenter.present_with(
        Announcement::new("Tappable", "body")
            .with_duration(Duration::from_secs(3600))
            .with_action(Box::new(move || {
                taps_clone.fetch_add(1, Ordering::SeqCst);
            })),
        Some(completion),
        t0,
    );
    presenter.tick(t0 + PRESENT);

    let now = t0 + PRESENT;
    presenter.pointer_event(handle, sample(PointerPhase::Down, 30.0), now);
    presenter.pointer_event(handle, sample(PointerPhase::Up, 30.0), now);
    assert_eq!(taps.load(Ordering::SeqCst), 1);
    assert_eq!(presenter.state_of(handle), Some(BannerState::Dismissing));

    presenter.tick(now + COLLAPSE);
    assert!(!presenter.is_live(handle));
    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert_eq!(taps.load(Ordering::SeqCst), 1);
}

/// Release routing: flick beats everything; pending dismiss turns any
/// non-flick release into the dismissal path; otherwise the banner settles.
#[rstest]
#[case(-10.0, false, "removed")]
#[case(-10.0, true, "removed")]
#[case(-5.0, false, "displayed")]
#[case(-4.0, true, "dismissing")]
#[case(20.0, true, "dismissing")]
#[case(20.0, false, "displayed")]
fn drag_release_routes(
    #[case] translation: f32,
    #[case] set_pending: bool,
    #[case] expected: &str,
) {
    let t0 = Instant::now();
    let mut presenter = presenter();
    let (completions, completion) = counting_completion();
    let duration = if set_pending {
        Duration::from_secs(1)
    } else {
        Duration::from_secs(3600)
    };
    let handle = presenter.present_with(
        Announcement::new("Draggable", "body").with_duration(duration),
        Some(completion),
        t0,
    );
    presenter.tick(t0 + PRESENT);

    // Begin the drag with a downward pull past the slop.
    let mut now = t0 + PRESENT;
    presenter.pointer_event(handle, sample(PointerPhase::Down, 100.0), now);
    presenter.pointer_event(handle, sample(PointerPhase::Moved, 110.0), now);
    assert_eq!(presenter.state_of(handle), Some(BannerState::Dragging));

    if set_pending {
        // Let the timer expire mid-drag; it must be remembered, not acted on.
        now = t0 + Duration::from_secs(2);
        presenter.tick(now);
        assert_eq!(presenter.state_of(handle), Some(BannerState::Dragging));
    }

    presenter.pointer_event(handle, sample(PointerPhase::Moved, 100.0 + translation), now);
    presenter.pointer_event(handle, sample(PointerPhase::Up, 100.0 + translation), now);
    presenter.tick(now + SNAP);

    match expected {
        "removed" => {
            assert!(!presenter.is_live(handle));
            assert_eq!(completions.load(Ordering::SeqCst), 1);
        }
        "dismissing" => {
            assert_eq!(presenter.state_of(handle), Some(BannerState::Dismissing));
            assert_eq!(completions.load(Ordering::SeqCst), 0);
            presenter.tick(now + SNAP + COLLAPSE);
            assert!(!presenter.is_live(handle));
            assert_eq!(completions.load(Ordering::SeqCst), 1);
        }
        "displayed" => {
            assert_eq!(presenter.state_of(handle), Some(BannerState::Displayed));
            assert_eq!(completions.load(Ordering::SeqCst), 0);
        }
        other => panic!("unknown expectation {other}"),
    }
}

#[test]
fn duplicate_dismissals_never_double_complete() {
    let t0 = Instant::now();
    let mut presenter = presenter();
    let (completions, completion) = counting_completion();
    let handle = presenter.present_with(
        Announcement::new("A", "x").with_duration(Duration::from_secs(1)),
        Some(completion),
        t0,
    );
    presenter.tick(t0 + PRESENT);

    // User dismisses; the timer then fires during the collapse; the host
    // dismisses again after removal. None of it may panic or re-complete.
    presenter.dismiss(handle, t0 + PRESENT);
    presenter.dismiss(handle, t0 + PRESENT);
    presenter.tick(t0 + PRESENT + COLLAPSE);
    presenter.tick(t0 + Duration::from_secs(2));
    assert!(!presenter.is_live(handle));
    assert_eq!(completions.load(Ordering::SeqCst), 1);

    presenter.dismiss(handle, t0 + Duration::from_secs(5));
    presenter.tick(t0 + Duration::from_secs(5));
    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert_eq!(presenter.banner_count(), 0);
}

#[test]
fn zero_duration_banner_still_completes_exactly_once() {
    let t0 = Instant::now();
    let mut presenter = presenter();
    let (completions, completion) = counting_completion();
    let handle = presenter.present_with(
        Announcement::new("A", "x").with_duration(Duration::ZERO),
        Some(completion),
        t0,
    );

    presenter.tick(t0 + PRESENT);
    assert_eq!(presenter.state_of(handle), Some(BannerState::AutoDismissing));
    presenter.tick(t0 + PRESENT + COLLAPSE);
    assert!(!presenter.is_live(handle));
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever the host throws at the stack, stored positions stay the
    /// running prefix sums of effective heights.
    #[test]
    fn positions_are_always_prefix_sums(
        ops in prop::collection::vec((0u8..4u8, 0u64..700u64), 1..40)
    ) {
        let t0 = Instant::now();
        let mut presenter = presenter();
        let mut handles = Vec::new();
        let mut now = t0;

        for (op, param) in ops {
            now += Duration::from_millis(param);
            match op {
                0 => {
                    let duration = Duration::from_millis(300 + param);
                    handles.push(presenter.present(
                        Announcement::new("T", "subtitle body text").with_duration(duration),
                        now,
                    ));
                }
                1 => {
                    if !handles.is_empty() {
                        let target = handles[(param as usize) % handles.len()];
                        presenter.dismiss(target, now);
                    }
                }
                2 => {
                    if !handles.is_empty() {
                        let target = handles[(param as usize) % handles.len()];
                        let pull = (param % 80) as f32;
                        presenter.pointer_event(target, sample(PointerPhase::Down, 100.0), now);
                        presenter.pointer_event(
                            target,
                            sample(PointerPhase::Moved, 100.0 + pull),
                            now,
                        );
                        presenter.pointer_event(
                            target,
                            sample(PointerPhase::Up, 100.0 + pull),
                            now,
                        );
                    }
                }
                _ => presenter.tick(now),
            }
            presenter.tick(now);
            prop_assert!(presenter.positions_are_prefix_sums());
        }

        // Drain everything; nothing may remain stuck.
        for _ in 0..60 {
            now += Duration::from_millis(200);
            presenter.tick(now);
        }
        prop_assert_eq!(presenter.banner_count(), 0);
        prop_assert!(presenter.positions_are_prefix_sums());
    }
}
