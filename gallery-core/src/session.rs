//! Event-driven gallery session
//!
//! Runs a [`Gallery`] as the single logical thread of control: user events
//! arrive on an mpsc channel, and every resulting frame is published on a
//! watch channel for the render layer.
//!
//! The loop keeps accepting events while a fetch or a page join is
//! outstanding:
//! - A newer fetch replaces an outstanding one; the older result is dropped.
//! - Navigating replaces the outstanding page join. Resolutions already
//!   started keep running in the background.
//! - A page-ready signal only clears `loading` if it is for the current page.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::coordinator::{PageJob, PageReady};
use crate::error::{GalleryError, Result};
use crate::gallery::{FetchOutcome, Gallery, GalleryView};

/// Events issued by the render layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryCommand {
    /// Load the items owned by an identity
    Fetch(String),
    /// Go to the next page
    Next,
    /// Go to the previous page
    Prev,
}

/// Spawns gallery sessions.
pub struct GallerySession;

impl GallerySession {
    /// Command queue depth
    const CHANNEL_CAPACITY: usize = 32;

    /// Start the event loop on the current tokio runtime.
    pub fn spawn(gallery: Gallery) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(Self::CHANNEL_CAPACITY);
        let (view_tx, view_rx) = watch::channel(gallery.view());
        let task = tokio::spawn(run(gallery, command_rx, view_tx));

        SessionHandle {
            commands: command_tx,
            views: view_rx,
            task,
        }
    }
}

/// Handle to a running session.
pub struct SessionHandle {
    commands: mpsc::Sender<GalleryCommand>,
    views: watch::Receiver<GalleryView>,
    task: JoinHandle<Gallery>,
}

impl SessionHandle {
    pub async fn send(&self, command: GalleryCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| GalleryError::SessionClosed)
    }

    pub async fn fetch(&self, identity: impl Into<String>) -> Result<()> {
        self.send(GalleryCommand::Fetch(identity.into())).await
    }

    pub async fn next(&self) -> Result<()> {
        self.send(GalleryCommand::Next).await
    }

    pub async fn prev(&self) -> Result<()> {
        self.send(GalleryCommand::Prev).await
    }

    /// Latest published frame.
    pub fn current(&self) -> GalleryView {
        self.views.borrow().clone()
    }

    /// A receiver for published frames.
    pub fn subscribe(&self) -> watch::Receiver<GalleryView> {
        self.views.clone()
    }

    /// Wait for the first frame satisfying `predicate`.
    pub async fn wait_for(&self, predicate: impl FnMut(&GalleryView) -> bool) -> Result<GalleryView> {
        let mut views = self.views.clone();
        let view = views
            .wait_for(predicate)
            .await
            .map_err(|_| GalleryError::SessionClosed)?;
        Ok(view.clone())
    }

    /// Stop accepting commands and return the gallery once the loop exits.
    pub async fn shutdown(self) -> Result<Gallery> {
        drop(self.commands);
        self.task.await.map_err(|_| GalleryError::SessionClosed)
    }
}

async fn run(
    mut gallery: Gallery,
    mut commands: mpsc::Receiver<GalleryCommand>,
    views: watch::Sender<GalleryView>,
) -> Gallery {
    let mut fetch: Option<BoxFuture<'static, FetchOutcome>> = None;
    let mut page: Option<BoxFuture<'static, PageReady>> = None;

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                debug!(?command, "Session command");
                match command {
                    GalleryCommand::Fetch(identity) => {
                        if let Ok(job) = gallery.prepare_fetch(&identity) {
                            if fetch.is_some() {
                                info!(owner = %job.owner(), "Superseding outstanding fetch");
                            }
                            fetch = Some(job.run().boxed());
                        }
                    }
                    GalleryCommand::Next => {
                        if let Some(job) = navigate(&mut gallery, Gallery::next_page) {
                            page = Some(job.run().boxed());
                        }
                    }
                    GalleryCommand::Prev => {
                        if let Some(job) = navigate(&mut gallery, Gallery::previous_page) {
                            page = Some(job.run().boxed());
                        }
                    }
                }
            }
            outcome = poll_slot(&mut fetch), if fetch.is_some() => {
                fetch = None;
                if gallery.install(outcome).is_ok() {
                    page = gallery.page_job().map(|job| job.run().boxed());
                }
            }
            ready = poll_slot(&mut page), if page.is_some() => {
                page = None;
                if !gallery.complete_page(&ready) {
                    debug!(page = ready.page, generation = ready.generation, "Stale page signal");
                }
            }
        }

        let frame = gallery.view();
        views.send_if_modified(|current| {
            if *current == frame {
                false
            } else {
                *current = frame;
                true
            }
        });
    }

    gallery
}

/// Apply a navigation step, returning the new page's job if the page moved.
fn navigate(gallery: &mut Gallery, step: fn(&mut Gallery) -> Result<bool>) -> Option<PageJob> {
    match step(gallery) {
        Ok(true) => gallery.page_job(),
        Ok(false) => {
            debug!("Navigation at boundary ignored");
            None
        }
        Err(e) => {
            warn!(error = %e, "Navigation ignored");
            None
        }
    }
}

/// Await the future in `slot`; never completes for an empty slot.
async fn poll_slot<F>(slot: &mut Option<F>) -> F::Output
where
    F: Future + Unpin,
{
    match slot {
        Some(future) => future.await,
        None => std::future::pending().await,
    }
}
