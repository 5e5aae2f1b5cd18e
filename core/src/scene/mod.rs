//! Scene queue
//!
//! Work that must not run on the signal path (decoding the catalog, touching
//! renderable nodes) is handed to a dedicated worker thread that owns the
//! scene graph. Commands are processed strictly in submission order.

mod queue;

pub use queue::{SceneCommand, SceneQueue, SceneQueueError};
