use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anchorview_types::RectDimensions;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::oneshot;

use crate::catalog::{CatalogError, OverlayCatalog, OverlayImage};
use crate::events::{NodeId, SceneGraph};

const THREAD_NAME: &str = "anchorview-scene";

pub enum SceneCommand {
    /// Decode the overlay directory and reply with the catalog
    LoadCatalog {
        directory: PathBuf,
        extension: String,
        reply: oneshot::Sender<Result<OverlayCatalog, CatalogError>>,
    },
    ApplyGeometry {
        node: NodeId,
        dims: RectDimensions,
        overlay: Arc<OverlayImage>,
    },
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum SceneQueueError {
    #[error("scene worker is no longer running")]
    Closed,

    #[error("scene worker panicked")]
    WorkerPanicked,

    #[error("failed to spawn scene worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Handle to the scene worker thread.
///
/// Dropping the handle asks the worker to stop without waiting for it; use
/// [`SceneQueue::shutdown`] to wait for queued work to drain.
pub struct SceneQueue {
    tx: UnboundedSender<SceneCommand>,
    handle: Option<JoinHandle<()>>,
}

impl SceneQueue {
    /// Move `scene` onto a new worker thread and start processing commands.
    pub fn spawn<G: SceneGraph>(mut scene: G) -> Result<Self, SceneQueueError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<SceneCommand>();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                while let Some(cmd) = rx.blocking_recv() {
                    match cmd {
                        SceneCommand::LoadCatalog {
                            directory,
                            extension,
                            reply,
                        } => {
                            let result = OverlayCatalog::load(&directory, &extension);
                            if reply.send(result).is_err() {
                                tracing::debug!("Catalog requester went away before the reply");
                            }
                        }
                        SceneCommand::ApplyGeometry {
                            node,
                            dims,
                            overlay,
                        } => {
                            scene.apply_geometry(node, dims, &overlay);
                        }
                        SceneCommand::Shutdown => break,
                    }
                }
                tracing::debug!("Scene worker stopped");
            })?;

        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    /// Load the overlay catalog on the worker and wait for the result.
    pub async fn load_catalog(
        &self,
        directory: PathBuf,
        extension: impl Into<String>,
    ) -> Result<Result<OverlayCatalog, CatalogError>, SceneQueueError> {
        let (reply, rx) = oneshot::channel();
        self.send(SceneCommand::LoadCatalog {
            directory,
            extension: extension.into(),
            reply,
        })?;
        rx.await.map_err(|_| SceneQueueError::Closed)
    }

    pub fn apply_geometry(
        &self,
        node: NodeId,
        dims: RectDimensions,
        overlay: Arc<OverlayImage>,
    ) -> Result<(), SceneQueueError> {
        self.send(SceneCommand::ApplyGeometry {
            node,
            dims,
            overlay,
        })
    }

    /// Stop the worker after it has drained every queued command.
    pub fn shutdown(mut self) -> Result<(), SceneQueueError> {
        let _ = self.tx.send(SceneCommand::Shutdown);
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| SceneQueueError::WorkerPanicked),
            None => Ok(()),
        }
    }

    fn send(&self, cmd: SceneCommand) -> Result<(), SceneQueueError> {
        self.tx.send(cmd).map_err(|_| SceneQueueError::Closed)
    }
}

impl Drop for SceneQueue {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.tx.send(SceneCommand::Shutdown);
        }
    }
}
