//! The movie list engine: load cycles, annotation writes and the derived view.
//!
//! [`MovieList`] owns the single source of truth for the list screen. Every load cycle takes a
//! fresh [`Generation`]; a response is applied only while its generation is still the newest
//! and the list is attached to a focused screen. Everything else is discarded, so an older
//! reload finishing late can never overwrite a newer one.

mod scheduler;
mod scroll;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::gateway::CatalogGateway;
use crate::host::{AlertSink, Navigator};
use crate::merge::merge;
use crate::stats::{CycleResult, RefreshStats};
use crate::store::AnnotationStore;
use crate::types::{
    AnnotatedMovie, FilterDescriptor, Generation, Movie, MovieDraft, MovieId, Rating, SortKind,
};
use crate::view::{ViewState, available_genres, available_years};

pub use scheduler::{RefreshScheduler, SchedulerHandle};
pub use scroll::ScrollTracker;

const LOAD_ALERT_TITLE: &str = "Movies can't be loaded";
const DETAIL_ALERT_TITLE: &str = "Movie can't be loaded";
const RATING_ALERT_TITLE: &str = "Rating can't be saved";
const FAVORITE_ALERT_TITLE: &str = "Favorite can't be saved";
const DELETE_ALERT_TITLE: &str = "Movie can't be deleted";
const SAVE_ALERT_TITLE: &str = "Movie can't be saved";
const RETRY_MESSAGE: &str = "Please try again later";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// What caused a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Focus,
    Timer,
    ScrollTop,
    Manual,
}

impl RefreshTrigger {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Timer => "timer",
            Self::ScrollTop => "scroll_top",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Loaded { count: usize },
    Failed { kind: &'static str },
    Unauthorized,
    /// A newer cycle started, or the list was detached, before this one finished.
    Discarded,
    /// The list is detached; no request was issued.
    Skipped,
}

/// Read-only copy of the list state for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot {
    pub phase: LoadPhase,
    pub loading: bool,
    pub movies: Vec<AnnotatedMovie>,
    pub total: usize,
    pub active_filter: Option<FilterDescriptor>,
    pub active_sorter: Option<SortKind>,
}

#[derive(Debug)]
struct ListState {
    view: Option<ViewState>,
    phase: LoadPhase,
    settled: LoadPhase,
    attached: bool,
    generation: u64,
}

impl ListState {
    fn settle(&mut self, phase: LoadPhase) {
        self.phase = phase;
        self.settled = phase;
    }
}

enum Settlement {
    Loaded(usize),
    Redirect,
    Alert(CatalogError),
    Discard,
}

pub struct MovieList {
    gateway: Arc<dyn CatalogGateway>,
    annotations: Arc<AnnotationStore>,
    navigator: Arc<dyn Navigator>,
    alerts: Arc<dyn AlertSink>,
    stats: Arc<RefreshStats>,
    state: Mutex<ListState>,
}

impl fmt::Debug for MovieList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovieList")
            .field("annotations", &self.annotations)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl MovieList {
    /// Create an attached, not yet loaded list.
    pub fn new(
        gateway: Arc<dyn CatalogGateway>,
        annotations: Arc<AnnotationStore>,
        navigator: Arc<dyn Navigator>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            gateway,
            annotations,
            navigator,
            alerts,
            stats: Arc::new(RefreshStats::new()),
            state: Mutex::new(ListState {
                view: None,
                phase: LoadPhase::Idle,
                settled: LoadPhase::Idle,
                attached: true,
                generation: 0,
            }),
        }
    }

    pub fn gateway(&self) -> &Arc<dyn CatalogGateway> {
        &self.gateway
    }

    pub fn stats(&self) -> Arc<RefreshStats> {
        Arc::clone(&self.stats)
    }

    pub fn phase(&self) -> LoadPhase {
        self.state.lock().phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == LoadPhase::Loading
    }

    pub fn is_attached(&self) -> bool {
        self.state.lock().attached
    }

    /// The screen gained focus; cycles may run again.
    pub fn attach(&self) {
        self.state.lock().attached = true;
    }

    /// The screen lost focus: invalidate in-flight cycles and clear the loading flag.
    pub fn detach(&self) {
        let mut state = self.state.lock();
        state.attached = false;
        state.generation += 1;
        if state.phase == LoadPhase::Loading {
            state.phase = state.settled;
        }
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.state.lock();
        let (movies, total, active_filter, active_sorter) = match &state.view {
            Some(view) => (
                view.view_list().to_vec(),
                view.base_list().len(),
                view.active_filter().cloned(),
                view.active_sorter(),
            ),
            None => (Vec::new(), 0, None, None),
        };
        ListSnapshot {
            phase: state.phase,
            loading: state.phase == LoadPhase::Loading,
            movies,
            total,
            active_filter,
            active_sorter,
        }
    }

    /// Run one load cycle: fetch, then merge with the annotations and publish if still current.
    pub async fn reload(&self, trigger: RefreshTrigger) -> RefreshOutcome {
        let Some(cycle) = self.begin_cycle() else {
            debug!(target: "refresh", %trigger, "list detached; reload skipped");
            return RefreshOutcome::Skipped;
        };
        debug!(target: "refresh", %trigger, generation = cycle.as_u64(), "cycle started");
        let started = Instant::now();

        let catalog = self.gateway.fetch_all().await;
        let settlement = self.settle_cycle(cycle, catalog);
        let elapsed = started.elapsed();

        match settlement {
            Settlement::Loaded(count) => {
                self.stats.record_finished(CycleResult::Loaded, elapsed, count);
                info!(target: "refresh", %trigger, count, elapsed_ms = elapsed.as_millis() as u64, "catalog loaded");
                RefreshOutcome::Loaded { count }
            }
            Settlement::Redirect => {
                self.stats.record_finished(CycleResult::Unauthorized, elapsed, 0);
                warn!(target: "refresh", %trigger, "session rejected; redirecting to login");
                self.navigator.redirect_to_login();
                RefreshOutcome::Unauthorized
            }
            Settlement::Alert(err) => {
                self.stats.record_finished(CycleResult::Failed, elapsed, 0);
                warn!(target: "refresh", %trigger, kind = err.kind(), error = %err, "catalog load failed");
                self.alerts.show_alert(LOAD_ALERT_TITLE, RETRY_MESSAGE);
                RefreshOutcome::Failed { kind: err.kind() }
            }
            Settlement::Discard => {
                self.stats.record_finished(CycleResult::Discarded, elapsed, 0);
                debug!(target: "refresh", %trigger, generation = cycle.as_u64(), "stale cycle discarded");
                RefreshOutcome::Discarded
            }
        }
    }

    fn begin_cycle(&self) -> Option<Generation> {
        let mut state = self.state.lock();
        if !state.attached {
            return None;
        }
        state.generation += 1;
        if state.phase != LoadPhase::Loading {
            state.settled = state.phase;
        }
        state.phase = LoadPhase::Loading;
        self.stats.record_started();
        Some(Generation::new(state.generation))
    }

    /// Publish a fetched catalog if `cycle` is still current.
    ///
    /// Annotations are read under the state lock, after the fetch, so a rating or favorite
    /// saved while the request was in flight is part of the published list.
    fn settle_cycle(&self, cycle: Generation, catalog: CatalogResult<Vec<Movie>>) -> Settlement {
        let mut state = self.state.lock();
        if !state.attached || state.generation != cycle.as_u64() {
            return Settlement::Discard;
        }
        let loaded = catalog.and_then(|movies| {
            let annotation = self.annotations.load()?;
            Ok(merge(movies, &annotation))
        });
        match loaded {
            Ok(list) => {
                let count = list.len();
                state.view.get_or_insert_with(ViewState::default).replace_base(list);
                state.settle(LoadPhase::Loaded);
                Settlement::Loaded(count)
            }
            Err(err) if err.is_auth() => {
                state.settle(LoadPhase::Failed);
                Settlement::Redirect
            }
            Err(err) => {
                state.settle(LoadPhase::Failed);
                Settlement::Alert(err)
            }
        }
    }

    fn with_view(&self, op: &str, apply: impl FnOnce(&mut ViewState)) -> bool {
        let mut state = self.state.lock();
        match state.view.as_mut() {
            Some(view) => {
                apply(view);
                debug!(target: "refresh::view", op, shown = view.view_list().len(), "view updated");
                true
            }
            None => {
                debug!(target: "refresh::view", op, "list not loaded; ignored");
                false
            }
        }
    }

    pub fn filter_by_genre(&self, genre: &str) -> bool {
        self.with_view("filter_genre", |view| view.filter_by_genre(genre))
    }

    pub fn filter_by_year(&self, year: i32) -> bool {
        self.with_view("filter_year", |view| view.filter_by_year(year))
    }

    pub fn filter_by_search(&self, query: &str) -> bool {
        self.with_view("filter_search", |view| view.filter_by_search(query))
    }

    pub fn clear_search(&self) -> bool {
        self.with_view("clear_search", ViewState::clear_search)
    }

    pub fn clear_filter(&self) -> bool {
        self.with_view("clear_filter", ViewState::clear_filter)
    }

    pub fn sort_by(&self, kind: SortKind) -> bool {
        self.with_view(kind.as_str(), |view| view.sort_by(kind))
    }

    pub fn clear_sort(&self) -> bool {
        self.with_view("clear_sort", ViewState::clear_sort)
    }

    /// Genres offered by the filter picker, from the loaded base list.
    pub fn genres(&self) -> Vec<String> {
        self.state.lock().view.as_ref().map(|v| available_genres(v.base_list())).unwrap_or_default()
    }

    pub fn years(&self) -> Vec<i32> {
        self.state.lock().view.as_ref().map(|v| available_years(v.base_list())).unwrap_or_default()
    }

    pub fn movie(&self, id: MovieId) -> Option<AnnotatedMovie> {
        self.state.lock().view.as_ref().and_then(|v| v.find(id).cloned())
    }

    /// Persist a rating (toggle semantics), then reflect it in the list.
    ///
    /// On a storage failure the user is alerted and the list is left untouched.
    pub fn rate(&self, id: MovieId, rating: Rating) -> CatalogResult<Rating> {
        match self.annotations.set_rating(id, rating) {
            Ok(stored) => {
                self.with_view("rate", |view| {
                    view.apply_rating(id, stored);
                });
                Ok(stored)
            }
            Err(err) => {
                warn!(target: "refresh", movie = %id, error = %err, "rating not saved");
                self.alerts.show_alert(RATING_ALERT_TITLE, RETRY_MESSAGE);
                Err(err.into())
            }
        }
    }

    /// Persist a favorite toggle, then reflect it in the list.
    pub fn toggle_favorite(&self, id: MovieId) -> CatalogResult<bool> {
        match self.annotations.toggle_favorite(id) {
            Ok(is_favorite) => {
                self.with_view("favorite", |view| {
                    view.apply_favorite(id, is_favorite);
                });
                Ok(is_favorite)
            }
            Err(err) => {
                warn!(target: "refresh", movie = %id, error = %err, "favorite not saved");
                self.alerts.show_alert(FAVORITE_ALERT_TITLE, RETRY_MESSAGE);
                Err(err.into())
            }
        }
    }

    /// Load one movie for the detail screen, annotated with the local data.
    pub async fn movie_detail(&self, id: MovieId) -> CatalogResult<AnnotatedMovie> {
        let result = async {
            let movie = self.gateway.fetch_by_id(id).await?;
            let annotation = self.annotations.load()?;
            Ok::<_, CatalogError>(merge(vec![movie], &annotation))
        }
        .await;
        match result {
            Ok(mut merged) => merged.pop().ok_or_else(|| CatalogError::NotFound {
                resource: format!("movie {id}"),
            }),
            Err(err) => Err(self.report(err, DETAIL_ALERT_TITLE)),
        }
    }

    /// Delete remotely, then drop the movie from the loaded list.
    pub async fn delete_movie(&self, id: MovieId) -> CatalogResult<()> {
        if let Err(err) = self.gateway.delete(id).await {
            return Err(self.report(err, DELETE_ALERT_TITLE));
        }
        self.with_view("delete", |view| {
            view.remove(id);
        });
        info!(target: "refresh", movie = %id, "movie deleted");
        Ok(())
    }

    /// Create a movie remotely, then reload so the list picks it up.
    pub async fn add_movie(&self, draft: &MovieDraft) -> CatalogResult<Movie> {
        let movie = match self.gateway.create(draft).await {
            Ok(movie) => movie,
            Err(err) => return Err(self.report(err, SAVE_ALERT_TITLE)),
        };
        info!(target: "refresh", movie = %movie.id, "movie created");
        self.reload(RefreshTrigger::Manual).await;
        Ok(movie)
    }

    /// Replace a movie's fields remotely, then reload.
    pub async fn update_movie(&self, id: MovieId, draft: &MovieDraft) -> CatalogResult<Movie> {
        let movie = match self.gateway.update(id, draft).await {
            Ok(movie) => movie,
            Err(err) => return Err(self.report(err, SAVE_ALERT_TITLE)),
        };
        info!(target: "refresh", movie = %id, "movie updated");
        self.reload(RefreshTrigger::Manual).await;
        Ok(movie)
    }

    fn report(&self, err: CatalogError, title: &str) -> CatalogError {
        if err.is_auth() {
            self.navigator.redirect_to_login();
        } else {
            warn!(target: "refresh", kind = err.kind(), error = %err, "{title}");
            self.alerts.show_alert(title, RETRY_MESSAGE);
        }
        err
    }
}
