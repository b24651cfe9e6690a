//! Pure banner layout: element frames and resting height from content plus
//! host metrics. Recomputed fresh on every pass; nothing accumulates.

use crate::announcement::{Announcement, FontSpec};
use crate::render::{HostMetrics, TextMeasure};

/// Height of the drag indicator pill.
pub(crate) const INDICATOR_HEIGHT: f32 = 6.0;

/// Width of the drag indicator pill.
pub(crate) const INDICATOR_WIDTH: f32 = 30.0;

/// Square image box edge length when an image is present.
pub(crate) const IMAGE_SIZE: f32 = 27.0;

/// Horizontal inset of the image box, and padding on either side of text.
pub(crate) const IMAGE_OFFSET: f32 = 12.0;

/// Text column x when an image is present.
pub(crate) const TEXT_OFFSET_WITH_IMAGE: f32 = 47.0;

/// Text column x when no image is present.
pub(crate) const TEXT_OFFSET_FLUSH: f32 = 18.0;

/// Fixed chrome height with the status bar visible.
pub(crate) const CHROME_HEIGHT: f32 = 65.0;

/// Fixed chrome height with the status bar hidden.
pub(crate) const CHROME_HEIGHT_STATUS_BAR_HIDDEN: f32 = 55.0;

/// Gap between the title block and the subtitle block.
const TITLE_SUBTITLE_GAP: f32 = 2.5;

/// Indicator clearance above the bottom edge.
const INDICATOR_BOTTOM_GAP: f32 = 5.0;

/// Title lines are capped; overflow never grows the banner.
const TITLE_MAX_LINES: u16 = 2;

/// Subtitle lines while collapsed (resting state).
pub(crate) const SUBTITLE_COLLAPSED_LINES: u16 = 2;

/// Axis-aligned rectangle in host layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Computed element frames plus the banner's resting height.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerLayout {
    /// Resting height: fixed chrome plus the collapsed subtitle block.
    pub base_height: f32,
    pub title_frame: Rect,
    pub subtitle_frame: Rect,
    /// Zero-sized when the announcement carries no image.
    pub image_frame: Rect,
    pub indicator_frame: Rect,
}

#[inline]
fn chrome_height(metrics: HostMetrics) -> f32 {
    if metrics.status_bar_hidden {
        CHROME_HEIGHT_STATUS_BAR_HIDDEN
    } else {
        CHROME_HEIGHT
    }
}

#[inline]
fn text_column_width(metrics: HostMetrics, image_size: f32) -> f32 {
    (metrics.width - image_size - IMAGE_OFFSET * 2.0).max(0.0)
}

/// Compute element frames and resting height for one banner.
///
/// The first banner under a visible status bar gets a slightly larger
/// vertical nudge so its content clears the bar; everything below stacks
/// tighter.
#[must_use]
pub fn compute_layout(
    announcement: &Announcement,
    metrics: HostMetrics,
    first_in_stack: bool,
    measure: &dyn TextMeasure,
) -> BannerLayout {
    let chrome = chrome_height(metrics);
    let nudge = if metrics.status_bar_hidden || !first_in_stack {
        2.5
    } else {
        5.0
    };
    let has_image = announcement.has_image();
    let image_size = if has_image { IMAGE_SIZE } else { 0.0 };
    let text_x = if has_image {
        TEXT_OFFSET_WITH_IMAGE
    } else {
        TEXT_OFFSET_FLUSH
    };
    let text_width = text_column_width(metrics, image_size);

    let title_height = measure.text_height(
        &announcement.title,
        &announcement.title_style,
        text_width,
        Some(TITLE_MAX_LINES),
    );
    let subtitle_height = collapsed_subtitle_height(announcement, metrics, measure);

    let image_frame = Rect::new(
        IMAGE_OFFSET,
        (chrome - image_size) / 2.0 + nudge,
        image_size,
        image_size,
    );

    let title_y = if has_image {
        IMAGE_OFFSET + 3.0
    } else {
        text_x + 5.0
    };
    let mut title_frame = Rect::new(text_x, title_y, text_width, title_height);
    let subtitle_frame = Rect::new(
        text_x,
        title_frame.max_y() + TITLE_SUBTITLE_GAP,
        text_width,
        subtitle_height,
    );
    if announcement.subtitle.is_empty() {
        // No subtitle block: center the title against the image instead of
        // holding it above a block that is not there.
        title_frame.y = image_frame.center_y() - title_height / 2.0;
    }

    let base_height = chrome + subtitle_height;
    let indicator_frame = Rect::new(
        (metrics.width - INDICATOR_WIDTH) / 2.0,
        base_height - INDICATOR_HEIGHT - INDICATOR_BOTTOM_GAP,
        INDICATOR_WIDTH,
        INDICATOR_HEIGHT,
    );

    BannerLayout {
        base_height,
        title_frame,
        subtitle_frame,
        image_frame,
        indicator_frame,
    }
}

/// Subtitle block height at its collapsed two-line cap.
#[must_use]
pub(crate) fn collapsed_subtitle_height(
    announcement: &Announcement,
    metrics: HostMetrics,
    measure: &dyn TextMeasure,
) -> f32 {
    subtitle_height(announcement, metrics, measure, Some(SUBTITLE_COLLAPSED_LINES))
}

/// Subtitle block height with the line cap removed (drag expansion target).
#[must_use]
pub(crate) fn expanded_subtitle_height(
    announcement: &Announcement,
    metrics: HostMetrics,
    measure: &dyn TextMeasure,
) -> f32 {
    subtitle_height(announcement, metrics, measure, None)
}

fn subtitle_height(
    announcement: &Announcement,
    metrics: HostMetrics,
    measure: &dyn TextMeasure,
    max_lines: Option<u16>,
) -> f32 {
    if announcement.subtitle.is_empty() {
        return 0.0;
    }
    let image_size = if announcement.has_image() {
        IMAGE_SIZE
    } else {
        0.0
    };
    measure.text_height(
        &announcement.subtitle,
        &FontSpec::subtitle(),
        text_column_width(metrics, image_size),
        max_lines,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextGridRenderer;

    fn metrics(width: f32, status_bar_hidden: bool) -> HostMetrics {
        HostMetrics {
            width,
            status_bar_hidden,
        }
    }

    fn measurer() -> TextGridRenderer {
        TextGridRenderer::new(metrics(390.0, false))
    }

    #[test]
    fn base_height_is_chrome_plus_subtitle_block() {
        let measure = measurer();
        let announcement = Announcement::new("Hello", "short");
        let layout = compute_layout(&announcement, metrics(390.0, false), true, &measure);
        assert_eq!(
            layout.base_height,
            CHROME_HEIGHT + layout.subtitle_frame.height
        );
        assert!(layout.subtitle_frame.height > 0.0);
    }

    #[test]
    fn hidden_status_bar_uses_shorter_chrome() {
        let measure = measurer();
        let announcement = Announcement::new("Hello", "short");
        let visible = compute_layout(&announcement, metrics(390.0, false), true, &measure);
        let hidden = compute_layout(&announcement, metrics(390.0, true), true, &measure);
        assert_eq!(
            visible.base_height - hidden.base_height,
            CHROME_HEIGHT - CHROME_HEIGHT_STATUS_BAR_HIDDEN
        );
    }

    #[test]
    fn empty_subtitle_contributes_no_height_and_centers_title_on_image() {
        let measure = measurer();
        let announcement =
            Announcement::new("Ping", "").with_image(crate::announcement::ImageHandle::new("a"));
        let layout = compute_layout(&announcement, metrics(390.0, false), true, &measure);
        assert_eq!(layout.base_height, CHROME_HEIGHT);
        assert_eq!(layout.subtitle_frame.height, 0.0);
        let title_center = layout.title_frame.center_y();
        assert!((title_center - layout.image_frame.center_y()).abs() < 0.001);
    }

    #[test]
    fn image_presence_switches_text_inset() {
        let measure = measurer();
        let flush = compute_layout(
            &Announcement::new("T", "s"),
            metrics(390.0, false),
            true,
            &measure,
        );
        assert_eq!(flush.title_frame.x, TEXT_OFFSET_FLUSH);
        assert_eq!(flush.image_frame.width, 0.0);

        let with_image = compute_layout(
            &Announcement::new("T", "s").with_image(crate::announcement::ImageHandle::new("a")),
            metrics(390.0, false),
            true,
            &measure,
        );
        assert_eq!(with_image.title_frame.x, TEXT_OFFSET_WITH_IMAGE);
        assert_eq!(with_image.image_frame.width, IMAGE_SIZE);
        assert!(with_image.title_frame.width < flush.title_frame.width);
    }

    #[test]
    fn subtitle_sits_below_title_with_fixed_gap() {
        let measure = measurer();
        let announcement = Announcement::new("Title", "subtitle text");
        let layout = compute_layout(&announcement, metrics(390.0, false), true, &measure);
        assert_eq!(
            layout.subtitle_frame.y,
            layout.title_frame.max_y() + TITLE_SUBTITLE_GAP
        );
    }

    #[test]
    fn indicator_is_centered_above_bottom_edge() {
        let measure = measurer();
        let announcement = Announcement::new("Title", "subtitle");
        let layout = compute_layout(&announcement, metrics(390.0, false), true, &measure);
        assert_eq!(layout.indicator_frame.width, INDICATOR_WIDTH);
        assert_eq!(
            layout.indicator_frame.x,
            (390.0 - INDICATOR_WIDTH) / 2.0
        );
        assert_eq!(
            layout.indicator_frame.max_y(),
            layout.base_height - INDICATOR_BOTTOM_GAP
        );
    }

    #[test]
    fn expanded_subtitle_height_never_below_collapsed() {
        let measure = measurer();
        let long = "a long subtitle that should wrap across more than two lines when measured \
                    against a narrow column width for expansion purposes";
        let announcement = Announcement::new("Title", long);
        let collapsed = collapsed_subtitle_height(&announcement, metrics(200.0, false), &measure);
        let expanded = expanded_subtitle_height(&announcement, metrics(200.0, false), &measure);
        assert!(expanded >= collapsed);
        assert!(expanded > collapsed, "long text should exceed the 2-line cap");
    }

    #[test]
    fn repeated_layout_passes_are_stable() {
        let measure = measurer();
        let announcement = Announcement::new("Title", "subtitle");
        let first = compute_layout(&announcement, metrics(390.0, false), true, &measure);
        for _ in 0..10 {
            let again = compute_layout(&announcement, metrics(390.0, false), true, &measure);
            assert_eq!(again, first);
        }
    }

    #[test]
    fn later_stack_entries_use_the_tight_nudge() {
        let measure = measurer();
        let announcement =
            Announcement::new("T", "s").with_image(crate::announcement::ImageHandle::new("a"));
        let first = compute_layout(&announcement, metrics(390.0, false), true, &measure);
        let later = compute_layout(&announcement, metrics(390.0, false), false, &measure);
        assert_eq!(first.image_frame.y - later.image_frame.y, 2.5);
    }
}
