//! Local persistence: the key-value backend and the typed stores built on it.

pub mod annotations;
pub mod kv;
pub mod session;

pub use annotations::{ANNOTATIONS_KEY, AnnotationStore};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use session::SessionStore;
