//! Remote catalog access. The engine only sees [`CatalogGateway`]; [`HttpGateway`] talks REST.

mod http;

use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::types::{Movie, MovieDraft, MovieId};

pub use http::{HttpGateway, classify_status};

/// Request/response access to the movie catalog. No retries; every failure is returned.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn fetch_all(&self) -> CatalogResult<Vec<Movie>>;
    async fn fetch_by_id(&self, id: MovieId) -> CatalogResult<Movie>;
    async fn delete(&self, id: MovieId) -> CatalogResult<()>;
    async fn create(&self, draft: &MovieDraft) -> CatalogResult<Movie>;
    async fn update(&self, id: MovieId, draft: &MovieDraft) -> CatalogResult<Movie>;
}
