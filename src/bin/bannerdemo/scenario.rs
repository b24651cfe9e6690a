//! Scripted demo scenarios: timed host events loaded from JSON.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use bannerstack::PointerPhase;

/// A timeline of host events replayed against the engine.
#[derive(Debug, Deserialize)]
pub(crate) struct Scenario {
    pub(crate) events: Vec<TimedEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimedEvent {
    pub(crate) at_ms: u64,
    #[serde(flatten)]
    pub(crate) kind: EventKind,
}

/// Banner indices refer to presentation order within the scenario.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub(crate) enum EventKind {
    Present {
        title: String,
        #[serde(default)]
        subtitle: String,
        #[serde(default)]
        image: Option<String>,
        #[serde(default)]
        duration_ms: Option<u64>,
    },
    Dismiss {
        banner: usize,
    },
    Pointer {
        banner: usize,
        phase: PointerPhaseSpec,
        y: f32,
    },
    Rotate {
        width: f32,
        #[serde(default)]
        status_bar_hidden: bool,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PointerPhaseSpec {
    Down,
    Moved,
    Up,
    Cancelled,
}

impl From<PointerPhaseSpec> for PointerPhase {
    fn from(phase: PointerPhaseSpec) -> Self {
        match phase {
            PointerPhaseSpec::Down => PointerPhase::Down,
            PointerPhaseSpec::Moved => PointerPhase::Moved,
            PointerPhaseSpec::Up => PointerPhase::Up,
            PointerPhaseSpec::Cancelled => PointerPhase::Cancelled,
        }
    }
}

/// Built-in timeline: two overlapping banners, a drag-expand on the first,
/// a rotation, and an image-only third banner.
pub(crate) const DEFAULT_SCENARIO: &str = r#"{
  "events": [
    { "at_ms": 0, "event": "present", "title": "New message",
      "subtitle": "Anna: the deploy is green, shipping the release notes now",
      "image": "avatar-anna", "duration_ms": 4000 },
    { "at_ms": 1000, "event": "present", "title": "Build finished",
      "subtitle": "bannerstack #128 passed in 41s", "duration_ms": 3000 },
    { "at_ms": 1400, "event": "pointer", "banner": 0, "phase": "down", "y": 40 },
    { "at_ms": 1450, "event": "pointer", "banner": 0, "phase": "moved", "y": 70 },
    { "at_ms": 1600, "event": "pointer", "banner": 0, "phase": "moved", "y": 120 },
    { "at_ms": 1800, "event": "pointer", "banner": 0, "phase": "up", "y": 110 },
    { "at_ms": 2600, "event": "rotate", "width": 700, "status_bar_hidden": true },
    { "at_ms": 3000, "event": "present", "title": "Reminder", "subtitle": "",
      "image": "bell", "duration_ms": 2500 }
  ]
}"#;

/// Load a scenario file, or the built-in timeline when no path is given.
/// Events are replayed in `at_ms` order regardless of file order.
pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Scenario> {
    let mut scenario: Scenario = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read scenario {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parse scenario {}", path.display()))?
        }
        None => serde_json::from_str(DEFAULT_SCENARIO).context("parse built-in scenario")?,
    };
    scenario.events.sort_by_key(|event| event.at_ms);
    Ok(scenario)
}
