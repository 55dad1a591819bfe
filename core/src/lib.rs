//! Movie list engine for the catalog client: remote catalog, local annotations and the
//! filtered, sorted, periodically refreshed view the list screen renders.

#![deny(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod host;
pub mod log;
pub mod merge;
pub mod refresh;
pub mod stats;
pub mod store;
pub mod types;
pub mod view;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

pub use error::{CatalogError, StorageError};
pub use form::{FieldError, MovieForm};
pub use merge::merge;
pub use refresh::{
    ListSnapshot, LoadPhase, MovieList, RefreshOutcome, RefreshScheduler, RefreshTrigger,
    SchedulerHandle,
};
pub use types::{
    AnnotatedMovie, Annotation, AuthSession, FilterDescriptor, Movie, MovieDraft, MovieId, Rating,
    SignupRequest, SortKind, User,
};
pub use view::ViewState;

/// Returns the version of the core crate for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
