//! Banner content model: what a banner says, shows, and does when tapped.

use std::fmt;
use std::time::Duration;

/// Default display duration before a banner auto-dismisses.
pub const DEFAULT_DURATION_MS: u64 = 4_000;

/// Callback invoked when a banner with an action is tapped.
pub type ActionFn = Box<dyn FnOnce() + Send + 'static>;

/// Callback invoked exactly once when a banner fully leaves the stack.
pub type CompletionFn = Box<dyn FnOnce() + Send + 'static>;

/// Opaque handle to a host-provided image asset. The engine never inspects
/// the asset; it only branches on presence for layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle(pub String);

impl ImageHandle {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

/// Font descriptor handed to the host's text measurement. Sizes are in the
/// host's layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub line_height: f32,
}

impl FontSpec {
    #[must_use]
    pub const fn new(size: f32, line_height: f32) -> Self {
        Self { size, line_height }
    }

    /// Default title font.
    #[must_use]
    pub const fn title() -> Self {
        Self::new(15.0, 18.0)
    }

    /// Default subtitle font.
    #[must_use]
    pub const fn subtitle() -> Self {
        Self::new(13.0, 16.0)
    }
}

/// One banner's content. Immutable once handed to the engine.
pub struct Announcement {
    pub title: String,
    pub subtitle: String,
    pub image: Option<ImageHandle>,
    pub title_style: FontSpec,
    pub duration: Duration,
    pub action: Option<ActionFn>,
}

impl Announcement {
    #[must_use]
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            image: None,
            title_style: FontSpec::title(),
            duration: Duration::from_millis(DEFAULT_DURATION_MS),
            action: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: ImageHandle) -> Self {
        self.image = Some(image);
        self
    }

    #[must_use]
    pub fn with_title_style(mut self, style: FontSpec) -> Self {
        self.title_style = style;
        self
    }

    /// A zero duration dismisses the banner as soon as its presentation
    /// animation completes.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: ActionFn) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

impl fmt::Debug for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Announcement")
            .field("title", &self.title)
            .field("subtitle", &self.subtitle)
            .field("image", &self.image)
            .field("title_style", &self.title_style)
            .field("duration", &self.duration)
            .field("action", &self.action.is_some())
            .finish()
    }
}
