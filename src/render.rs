//! Renderer collaborator seam: the engine computes frames, the host draws
//! them. Ships a monospace grid implementation for tests and the demo.

use std::collections::HashMap;

use unicode_width::UnicodeWidthStr;

use crate::announcement::{Announcement, FontSpec, ImageHandle};
use crate::controller::BannerId;
use crate::layout::{BannerLayout, Rect};

/// Host surface facts the layout depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostMetrics {
    /// Usable surface width in layout units.
    pub width: f32,
    pub status_bar_hidden: bool,
}

impl Default for HostMetrics {
    fn default() -> Self {
        Self {
            width: 390.0,
            status_bar_hidden: false,
        }
    }
}

/// Text measurement primitive the host provides; the engine never rasterizes.
pub trait TextMeasure {
    /// Height of `text` laid out at `max_width` in `font`, clamped to
    /// `max_lines` when given. Empty text measures zero.
    fn text_height(
        &self,
        text: &str,
        font: &FontSpec,
        max_width: f32,
        max_lines: Option<u16>,
    ) -> f32;
}

/// Immutable render bundle built once per banner at controller construction
/// and handed to the host to create the view tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerView {
    pub id: BannerId,
    pub title: String,
    pub subtitle: String,
    pub image: Option<ImageHandle>,
    pub title_style: FontSpec,
}

impl BannerView {
    #[must_use]
    pub(crate) fn from_announcement(id: BannerId, announcement: &Announcement) -> Self {
        Self {
            id,
            title: announcement.title.clone(),
            subtitle: announcement.subtitle.clone(),
            image: announcement.image.clone(),
            title_style: announcement.title_style,
        }
    }
}

/// Host-implemented view plumbing. `mount` is called once per banner,
/// `apply` on every frame/height change, `detach` exactly once at removal.
pub trait Renderer: TextMeasure {
    fn metrics(&self) -> HostMetrics;
    fn mount(&mut self, view: &BannerView);
    fn apply(&mut self, id: BannerId, frame: &Rect, layout: &BannerLayout);
    fn detach(&mut self, id: BannerId);
}

#[derive(Debug, Clone, PartialEq)]
struct MountedBanner {
    view: BannerView,
    frame: Rect,
    layout: Option<BannerLayout>,
}

/// Reference renderer that lays text on a monospace grid: every glyph cell is
/// half the font size wide, so measurement is deterministic and portable.
/// Used by the demo binary and the test suites; real hosts supply their own.
#[derive(Debug, Default)]
pub struct TextGridRenderer {
    metrics: HostMetrics,
    mounted: HashMap<BannerId, MountedBanner>,
    detach_count: HashMap<BannerId, u32>,
}

impl TextGridRenderer {
    #[must_use]
    pub fn new(metrics: HostMetrics) -> Self {
        Self {
            metrics,
            mounted: HashMap::new(),
            detach_count: HashMap::new(),
        }
    }

    /// Update host metrics (device rotation); the presenter reflows after.
    pub fn set_metrics(&mut self, metrics: HostMetrics) {
        self.metrics = metrics;
    }

    #[must_use]
    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    #[must_use]
    pub fn is_mounted(&self, id: BannerId) -> bool {
        self.mounted.contains_key(&id)
    }

    /// Last applied outer frame for a mounted banner.
    #[must_use]
    pub fn frame_of(&self, id: BannerId) -> Option<Rect> {
        self.mounted.get(&id).map(|m| m.frame)
    }

    #[must_use]
    pub fn detach_count(&self, id: BannerId) -> u32 {
        self.detach_count.get(&id).copied().unwrap_or(0)
    }

    #[inline]
    fn cell_width(font: &FontSpec) -> f32 {
        (font.size * 0.5).max(1.0)
    }
}

impl TextMeasure for TextGridRenderer {
    fn text_height(
        &self,
        text: &str,
        font: &FontSpec,
        max_width: f32,
        max_lines: Option<u16>,
    ) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let cell = Self::cell_width(font);
        let cols_per_line = ((max_width / cell).floor() as usize).max(1);
        let total_cols = UnicodeWidthStr::width(text).max(1);
        let mut lines = total_cols.div_ceil(cols_per_line);
        if let Some(cap) = max_lines {
            lines = lines.min(cap as usize);
        }
        lines as f32 * font.line_height
    }
}

impl Renderer for TextGridRenderer {
    fn metrics(&self) -> HostMetrics {
        self.metrics
    }

    fn mount(&mut self, view: &BannerView) {
        self.mounted.insert(
            view.id,
            MountedBanner {
                view: view.clone(),
                frame: Rect::default(),
                layout: None,
            },
        );
    }

    fn apply(&mut self, id: BannerId, frame: &Rect, layout: &BannerLayout) {
        if let Some(mounted) = self.mounted.get_mut(&id) {
            mounted.frame = *frame;
            mounted.layout = Some(layout.clone());
        }
    }

    fn detach(&mut self, id: BannerId) {
        self.mounted.remove(&id);
        *self.detach_count.entry(id).or_insert(0) += 1;
    }
}
