//! Scripted banner engine demo: replays a timed event scenario against the
//! reference text-grid renderer and prints the stack timeline.

mod scenario;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::{unbounded, Sender};

use bannerstack::{
    Announcement, BannerEvent, BannerHandle, EngineConfig, HostMetrics, ImageHandle,
    PointerSample, Presenter, TextGridRenderer,
};
use scenario::{EventKind, Scenario};

#[derive(Debug, Parser)]
#[command(
    name = "bannerdemo",
    version,
    about = "Replay a scripted banner timeline against the reference renderer"
)]
struct DemoArgs {
    /// Path to a JSON scenario; the built-in timeline runs otherwise.
    #[arg(long, env = "BANNERDEMO_SCENARIO")]
    scenario: Option<PathBuf>,

    /// Host surface width in layout units.
    #[arg(long, default_value_t = 390.0)]
    width: f32,

    /// Start with the status bar hidden.
    #[arg(long)]
    status_bar_hidden: bool,

    /// Simulated clock step per frame.
    #[arg(long, default_value_t = 25)]
    step_ms: u64,

    /// Extra simulated time after the last scripted event before exiting.
    #[arg(long, default_value_t = 6_000)]
    settle_ms: u64,

    /// Write JSON trace telemetry (see BANNERSTACK_TRACE_LOG).
    #[arg(long)]
    logs: bool,
}

fn main() -> Result<()> {
    let args = DemoArgs::parse();
    if args.logs {
        bannerstack::telemetry::init_tracing();
    }
    let scenario = scenario::load(args.scenario.as_deref())?;
    run(&args, scenario);
    Ok(())
}

fn run(args: &DemoArgs, scenario: Scenario) {
    let metrics = HostMetrics {
        width: args.width,
        status_bar_hidden: args.status_bar_hidden,
    };
    let (events_tx, events_rx) = unbounded();
    let (done_tx, done_rx) = unbounded::<usize>();
    let mut presenter =
        Presenter::new(TextGridRenderer::new(metrics), EngineConfig::load()).with_events(events_tx);

    // The timeline runs on a simulated clock; nothing sleeps.
    let start = Instant::now();
    let mut handles: Vec<BannerHandle> = Vec::new();
    let horizon = scenario.events.last().map_or(0, |event| event.at_ms) + args.settle_ms;
    let mut pending = scenario.events.into_iter().peekable();
    let mut last_line = String::new();

    let mut at_ms = 0;
    loop {
        let now = start + Duration::from_millis(at_ms);
        while let Some(event) = pending.next_if(|event| event.at_ms <= at_ms) {
            apply_event(&mut presenter, &mut handles, event.kind, now, &done_tx);
        }
        presenter.tick(now);

        for event in events_rx.try_iter() {
            match event {
                BannerEvent::Presented { id } => {
                    println!("[{at_ms:>6}ms] + banner {} presented", id.0);
                }
                BannerEvent::Removed { id } => {
                    println!("[{at_ms:>6}ms] - banner {} removed", id.0);
                }
            }
        }
        for index in done_rx.try_iter() {
            println!("[{at_ms:>6}ms] * banner {index} completion fired");
        }

        let line = snapshot(&presenter, &handles);
        if line != last_line {
            println!("[{at_ms:>6}ms] {line}");
            last_line = line;
        }

        let scripted_done = pending.peek().is_none();
        if (scripted_done && presenter.banner_count() == 0) || at_ms > horizon {
            break;
        }
        at_ms += args.step_ms.max(1);
    }
}

fn apply_event(
    presenter: &mut Presenter<TextGridRenderer>,
    handles: &mut Vec<BannerHandle>,
    kind: EventKind,
    now: Instant,
    done_tx: &Sender<usize>,
) {
    match kind {
        EventKind::Present {
            title,
            subtitle,
            image,
            duration_ms,
        } => {
            let mut announcement = Announcement::new(title, subtitle);
            if let Some(image) = image {
                announcement = announcement.with_image(ImageHandle::new(image));
            }
            if let Some(ms) = duration_ms {
                announcement = announcement.with_duration(Duration::from_millis(ms));
            }
            let index = handles.len();
            let done_tx = done_tx.clone();
            let handle = presenter.present_with(
                announcement,
                Some(Box::new(move || {
                    let _ = done_tx.send(index);
                })),
                now,
            );
            handles.push(handle);
        }
        EventKind::Dismiss { banner } => {
            if let Some(handle) = handles.get(banner) {
                presenter.dismiss(*handle, now);
            }
        }
        EventKind::Pointer { banner, phase, y } => {
            if let Some(handle) = handles.get(banner) {
                presenter.pointer_event(*handle, PointerSample::new(phase.into(), 0.0, y), now);
            }
        }
        EventKind::Rotate {
            width,
            status_bar_hidden,
        } => {
            presenter.host_metrics_changed(HostMetrics {
                width,
                status_bar_hidden,
            });
        }
    }
}

fn snapshot(presenter: &Presenter<TextGridRenderer>, handles: &[BannerHandle]) -> String {
    let mut parts = Vec::new();
    for (index, handle) in handles.iter().enumerate() {
        if let Some(instance) = presenter.instance_of(*handle) {
            parts.push(format!(
                "#{index} {:?} y={:.1} h={:.1}",
                instance.state, instance.stack_position, instance.current_height
            ));
        }
    }
    if parts.is_empty() {
        "(stack empty)".to_string()
    } else {
        parts.join(" | ")
    }
}
