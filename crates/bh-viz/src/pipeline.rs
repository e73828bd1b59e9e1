//! Chooses between rendering on the UI thread and on the background worker.

use bh_viz_core::{FrameBuffer, FrameRenderer, ParameterStore, RenderJob, RenderWorker, ViewState};
use std::sync::Arc;

/// A finished frame together with the view it was rendered from
pub struct ReadyFrame {
    pub frame: Arc<FrameBuffer>,
    pub view: ViewState,
}

pub enum FramePipeline {
    Inline {
        renderer: FrameRenderer,
        ready: Option<ReadyFrame>,
    },
    Background {
        worker: RenderWorker,
        view: ViewState,
        shown_generation: u64,
    },
}

impl FramePipeline {
    pub fn new(view: ViewState, background: bool) -> Self {
        if background {
            match RenderWorker::spawn(view) {
                Ok(worker) => {
                    return FramePipeline::Background {
                        worker,
                        view,
                        shown_generation: 0,
                    }
                }
                Err(e) => log::warn!("Could not start render thread, rendering inline: {}", e),
            }
        }
        FramePipeline::Inline {
            renderer: FrameRenderer::new(view),
            ready: None,
        }
    }

    pub fn view(&self) -> &ViewState {
        match self {
            FramePipeline::Inline { renderer, .. } => renderer.view(),
            FramePipeline::Background { view, .. } => view,
        }
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        match self {
            FramePipeline::Inline { renderer, .. } => renderer.view_mut(),
            FramePipeline::Background { view, .. } => view,
        }
    }

    /// Render tick: advances the angle unless paused, then renders.
    pub fn tick(&mut self, store: &ParameterStore, advance: bool) {
        match self {
            FramePipeline::Inline { renderer, ready } => {
                let frame = if advance {
                    renderer.tick(store)
                } else {
                    renderer.generate_frame(store)
                };
                *ready = Some(ReadyFrame {
                    frame,
                    view: *renderer.view(),
                });
            }
            FramePipeline::Background { worker, view, .. } => {
                if advance {
                    view.advance();
                }
                if !worker.submit(RenderJob::new(store, view)) {
                    log::error!("Render thread is gone; frames will no longer update");
                }
            }
        }
    }

    /// Re-renders at the current angle after a parameter or view change.
    pub fn refresh(&mut self, store: &ParameterStore) {
        if let FramePipeline::Inline { renderer, ready } = self {
            let frame = renderer.on_parameters_changed(store);
            *ready = Some(ReadyFrame {
                frame,
                view: *renderer.view(),
            });
            return;
        }
        self.tick(store, false);
    }

    /// Newest frame not yet handed out, if any.
    pub fn take_ready(&mut self) -> Option<ReadyFrame> {
        match self {
            FramePipeline::Inline { ready, .. } => ready.take(),
            FramePipeline::Background {
                worker,
                shown_generation,
                ..
            } => {
                let published = worker.latest();
                if published.generation == *shown_generation {
                    return None;
                }
                *shown_generation = published.generation;
                Some(ReadyFrame {
                    frame: published.frame,
                    view: published.view,
                })
            }
        }
    }
}
