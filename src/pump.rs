//! Optional single-owner engine thread. Hosts with multiple threads post
//! requests through a channel; the pump serializes them and drives periodic
//! ticks, so the engine itself stays single-threaded.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, unbounded, Receiver, Sender};

use crate::announcement::{Announcement, CompletionFn};
use crate::config::EngineConfig;
use crate::controller::BannerId;
use crate::gesture::PointerSample;
use crate::presenter::{BannerEvent, BannerHandle, IdAllocator, Presenter};
use crate::render::{HostMetrics, Renderer};

/// Idle tick cadence while no requests arrive.
const PUMP_TICK_MS: u64 = 20;

enum PumpRequest {
    Present {
        id: BannerId,
        announcement: Announcement,
        completion: Option<CompletionFn>,
    },
    Dismiss {
        handle: BannerHandle,
    },
    Pointer {
        handle: BannerHandle,
        sample: PointerSample,
    },
    HostMetricsChanged {
        metrics: HostMetrics,
    },
    Shutdown,
}

/// Cloneable, thread-safe entry point to a running pump. Handles pre-allocate
/// banner ids so `present` returns without a round trip to the engine thread.
#[derive(Clone)]
pub struct PumpHandle {
    requests_tx: Sender<PumpRequest>,
    ids: IdAllocator,
}

impl PumpHandle {
    pub fn present(&self, announcement: Announcement) -> BannerHandle {
        self.present_with(announcement, None)
    }

    pub fn present_with(
        &self,
        announcement: Announcement,
        completion: Option<CompletionFn>,
    ) -> BannerHandle {
        let id = self.ids.next();
        let _ = self.requests_tx.send(PumpRequest::Present {
            id,
            announcement,
            completion,
        });
        BannerHandle::from_id(id)
    }

    pub fn dismiss(&self, handle: BannerHandle) {
        let _ = self.requests_tx.send(PumpRequest::Dismiss { handle });
    }

    pub fn pointer_event(&self, handle: BannerHandle, sample: PointerSample) {
        let _ = self
            .requests_tx
            .send(PumpRequest::Pointer { handle, sample });
    }

    pub fn host_metrics_changed(&self, metrics: HostMetrics) {
        let _ = self
            .requests_tx
            .send(PumpRequest::HostMetricsChanged { metrics });
    }

    /// Stop the engine thread. Banners still on screen never fire their
    /// completion callbacks, matching process teardown semantics.
    pub fn shutdown(&self) {
        let _ = self.requests_tx.send(PumpRequest::Shutdown);
    }
}

/// Spawn an engine thread owning `renderer`.
pub fn spawn<R>(renderer: R, config: EngineConfig) -> (PumpHandle, JoinHandle<()>)
where
    R: Renderer + Send + 'static,
{
    spawn_inner(Presenter::new(renderer, config))
}

/// Spawn with a notification channel attached.
pub fn spawn_with_events<R>(
    renderer: R,
    config: EngineConfig,
    events_tx: Sender<BannerEvent>,
) -> (PumpHandle, JoinHandle<()>)
where
    R: Renderer + Send + 'static,
{
    spawn_inner(Presenter::new(renderer, config).with_events(events_tx))
}

fn spawn_inner<R>(presenter: Presenter<R>) -> (PumpHandle, JoinHandle<()>)
where
    R: Renderer + Send + 'static,
{
    let (requests_tx, requests_rx) = unbounded();
    let ids = presenter.ids();
    let join = thread::spawn(move || run_pump(presenter, &requests_rx));
    (PumpHandle { requests_tx, ids }, join)
}

fn run_pump<R: Renderer>(mut presenter: Presenter<R>, requests_rx: &Receiver<PumpRequest>) {
    let tick_interval = Duration::from_millis(PUMP_TICK_MS);
    loop {
        select! {
            recv(requests_rx) -> request => {
                match request {
                    Ok(PumpRequest::Present { id, announcement, completion }) => {
                        let _ = presenter.present_with_id(
                            id,
                            announcement,
                            completion,
                            Instant::now(),
                        );
                    }
                    Ok(PumpRequest::Dismiss { handle }) => {
                        presenter.dismiss(handle, Instant::now());
                    }
                    Ok(PumpRequest::Pointer { handle, sample }) => {
                        presenter.pointer_event(handle, sample, Instant::now());
                    }
                    Ok(PumpRequest::HostMetricsChanged { metrics }) => {
                        presenter.host_metrics_changed(metrics);
                    }
                    // Disconnected handles mean no more work can ever arrive.
                    Ok(PumpRequest::Shutdown) | Err(_) => break,
                }
            }
            default(tick_interval) => {}
        }
        presenter.tick(Instant::now());
    }
}
