//! Per-movie ratings and favorites persisted as one JSON blob under [`ANNOTATIONS_KEY`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::types::{Annotation, MovieId, Rating};

use super::KeyValueStore;

pub const ANNOTATIONS_KEY: &str = "movies_data";

/// Read-modify-write access to the annotation blob.
///
/// Writers are serialized so overlapping updates on different movies never drop each other.
#[derive(Debug)]
pub struct AnnotationStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl AnnotationStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv, write_lock: Mutex::new(()) }
    }

    /// Current annotations; an absent blob is an empty annotation.
    pub fn load(&self) -> StorageResult<Annotation> {
        match self.kv.get(ANNOTATIONS_KEY)? {
            None => Ok(Annotation::default()),
            Some(raw) if raw.trim().is_empty() => Ok(Annotation::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                key: ANNOTATIONS_KEY.to_string(),
                source,
            }),
        }
    }

    /// Apply `rating`, or reset to unrated when it equals the stored value. Returns the result.
    pub fn set_rating(&self, id: MovieId, rating: Rating) -> StorageResult<Rating> {
        self.modify(|annotation| {
            let next = if annotation.rating_of(id) == rating { Rating::UNRATED } else { rating };
            if next.is_rated() {
                annotation.ratings.insert(id, next);
            } else {
                annotation.ratings.remove(&id);
            }
            debug!(target: "store::annotations", movie = %id, rating = next.value(), "rating updated");
            next
        })
    }

    /// Flip the favorite flag for `id`. Returns the new flag.
    pub fn toggle_favorite(&self, id: MovieId) -> StorageResult<bool> {
        self.modify(|annotation| {
            let now_favorite = if annotation.favorites.remove(&id) {
                false
            } else {
                annotation.favorites.insert(id);
                true
            };
            debug!(target: "store::annotations", movie = %id, favorite = now_favorite, "favorite toggled");
            now_favorite
        })
    }

    fn modify<T>(&self, apply: impl FnOnce(&mut Annotation) -> T) -> StorageResult<T> {
        let _guard = self.write_lock.lock();
        let mut annotation = self.load()?;
        let out = apply(&mut annotation);
        let encoded = serde_json::to_string(&annotation).map_err(|source| StorageError::Encode {
            key: ANNOTATIONS_KEY.to_string(),
            source,
        })?;
        self.kv.set(ANNOTATIONS_KEY, &encoded)?;
        Ok(out)
    }
}
