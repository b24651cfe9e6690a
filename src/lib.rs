//! Stackable transient notification banners: an ordered stack of
//! concurrently-visible banners, a per-banner lifecycle state machine,
//! timer-vs-gesture interaction, and the layout math behind every height
//! transition. Rendering stays with the host behind the [`render::Renderer`]
//! seam; the engine only computes frames and drives them.

mod animation;
pub mod announcement;
pub mod config;
mod controller;
pub mod gesture;
pub mod layout;
pub mod presenter;
pub mod pump;
pub mod render;
mod stack;
pub mod telemetry;
mod timer;

pub use announcement::{
    ActionFn, Announcement, CompletionFn, FontSpec, ImageHandle, DEFAULT_DURATION_MS,
};
pub use config::EngineConfig;
pub use controller::{BannerId, BannerInstance, BannerState};
pub use gesture::{GestureIntent, GestureInterpreter, PointerPhase, PointerSample};
pub use layout::{compute_layout, BannerLayout, Rect};
pub use presenter::{BannerEvent, BannerHandle, Presenter};
pub use pump::PumpHandle;
pub use render::{BannerView, HostMetrics, Renderer, TextGridRenderer, TextMeasure};
