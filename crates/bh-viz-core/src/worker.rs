//! Background rendering.
//!
//! The UI thread submits `RenderJob`s over a channel; a single worker thread
//! renders only the most recent job and publishes the finished frame by
//! swapping an `Arc`. Readers therefore always see a complete frame, never one
//! that is half written.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::frame::{FrameBuffer, FrameContext, ViewState};
use crate::params::{ParameterStore, PhysicalParameters};

/// A snapshot of everything needed to render one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderJob {
    pub parameters: PhysicalParameters,
    pub view: ViewState,
}

impl RenderJob {
    pub fn new(store: &ParameterStore, view: &ViewState) -> Self {
        Self {
            parameters: *store.parameters(),
            view: *view,
        }
    }

    pub fn render(&self) -> FrameBuffer {
        let store = ParameterStore::new(self.parameters);
        FrameContext::new(&store, &self.view).render()
    }
}

enum Message {
    Render(RenderJob),
    Shutdown,
}

/// The most recently completed frame
#[derive(Clone)]
pub struct PublishedFrame {
    /// Incremented on every publish, 0 before the first frame
    pub generation: u64,
    pub frame: Arc<FrameBuffer>,
    pub view: ViewState,
}

pub struct RenderWorker {
    sender: Sender<Message>,
    latest: Arc<Mutex<PublishedFrame>>,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    pub fn spawn(view: ViewState) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let latest = Arc::new(Mutex::new(PublishedFrame {
            generation: 0,
            frame: Arc::new(FrameBuffer::new(view.resolution)),
            view,
        }));

        let shared = Arc::clone(&latest);
        let handle = thread::Builder::new()
            .name("bh-render".into())
            .spawn(move || run(receiver, shared))?;

        Ok(Self {
            sender,
            latest,
            handle: Some(handle),
        })
    }

    /// Queues a job. Returns false if the worker thread has gone away.
    pub fn submit(&self, job: RenderJob) -> bool {
        self.sender.send(Message::Render(job)).is_ok()
    }

    pub fn latest(&self) -> PublishedFrame {
        match self.latest.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.latest().generation
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        let _ = self.sender.send(Message::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Render worker panicked");
            }
        }
    }
}

/// Drains whatever is already queued behind `first` and keeps the newest job.
/// `None` means a shutdown was requested.
fn coalesce(first: Message, receiver: &Receiver<Message>) -> Option<RenderJob> {
    let mut job = match first {
        Message::Render(job) => job,
        Message::Shutdown => return None,
    };
    let mut skipped = 0;
    while let Ok(next) = receiver.try_recv() {
        match next {
            Message::Render(newer) => {
                job = newer;
                skipped += 1;
            }
            Message::Shutdown => return None,
        }
    }
    if skipped > 0 {
        log::trace!("Coalesced {} stale render jobs", skipped);
    }
    Some(job)
}

fn run(receiver: Receiver<Message>, latest: Arc<Mutex<PublishedFrame>>) {
    log::debug!("Render worker started");
    while let Ok(message) = receiver.recv() {
        let Some(job) = coalesce(message, &receiver) else {
            break;
        };

        let frame = Arc::new(job.render());
        let mut published = match latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        published.generation += 1;
        published.frame = frame;
        published.view = job.view;
    }
    log::debug!("Render worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::WorldUnits;
    use std::time::{Duration, Instant};

    fn job(mass: f64, angle: f64) -> RenderJob {
        RenderJob {
            parameters: PhysicalParameters {
                mass,
                ..Default::default()
            },
            view: ViewState {
                view_angle: angle,
                resolution: 32,
                units: WorldUnits::SchwarzschildRadii,
                ..Default::default()
            },
        }
    }

    fn wait_for_generation(worker: &RenderWorker, generation: u64) -> PublishedFrame {
        let started = Instant::now();
        loop {
            let published = worker.latest();
            if published.generation >= generation {
                return published;
            }
            assert!(
                started.elapsed() < Duration::from_secs(10),
                "worker never published"
            );
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_coalesce_keeps_newest_job() {
        let (tx, rx) = mpsc::channel();
        tx.send(Message::Render(job(2.0, 10.0))).unwrap();
        tx.send(Message::Render(job(3.0, 20.0))).unwrap();

        let picked = coalesce(Message::Render(job(1.0, 0.0)), &rx).unwrap();
        assert_eq!(picked, job(3.0, 20.0));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_coalesce_stops_on_shutdown() {
        let (tx, rx) = mpsc::channel();
        tx.send(Message::Render(job(2.0, 10.0))).unwrap();
        tx.send(Message::Shutdown).unwrap();
        assert!(coalesce(Message::Render(job(1.0, 0.0)), &rx).is_none());
        assert!(coalesce(Message::Shutdown, &rx).is_none());
    }

    #[test]
    fn test_worker_publishes_complete_frame() {
        let request = job(4.3e6, 90.0);
        let worker = RenderWorker::spawn(request.view).unwrap();
        assert_eq!(worker.generation(), 0);

        assert!(worker.submit(request));
        let published = wait_for_generation(&worker, 1);

        assert_eq!(published.view, request.view);
        assert_eq!(*published.frame, request.render());
        assert_eq!(published.frame.pixels().len(), 32 * 32);
    }

    #[test]
    fn test_worker_ends_on_latest_submission() {
        let worker = RenderWorker::spawn(job(1.0, 0.0).view).unwrap();
        for i in 0..20 {
            worker.submit(job(4.3e6, i as f64));
        }
        let last = job(4.3e6, 19.0);

        let started = Instant::now();
        while worker.latest().view != last.view {
            assert!(started.elapsed() < Duration::from_secs(10));
            thread::sleep(Duration::from_millis(5));
        }
        let published = worker.latest();
        assert!(published.generation >= 1 && published.generation <= 20);
        assert_eq!(*published.frame, last.render());
    }

    #[test]
    fn test_drop_joins_worker() {
        let worker = RenderWorker::spawn(job(1.0, 0.0).view).unwrap();
        worker.submit(job(1.0, 0.0));
        drop(worker);
    }
}
