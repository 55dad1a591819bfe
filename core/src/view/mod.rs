//! Filter/sort/search engine deriving the rendered list from the loaded base list.
//!
//! The view is always `sort(filter(base))`: at most one filter and at most one ordering, each
//! computed from the base list so that choosing a new filter replaces the old one instead of
//! narrowing it further.

pub mod collate;
pub mod filter;
pub mod sort;

use serde::Serialize;

use crate::types::{AnnotatedMovie, FilterDescriptor, MovieId, Rating, SortKind};

pub use filter::{
    available_genres, available_years, filter_by_genre, filter_by_search, filter_by_year,
};
pub use sort::{sort_by_favorites, sort_by_rating, sort_by_title};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    base_list: Vec<AnnotatedMovie>,
    view_list: Vec<AnnotatedMovie>,
    active_filter: Option<FilterDescriptor>,
    active_sorter: Option<SortKind>,
}

impl ViewState {
    pub fn new(base_list: Vec<AnnotatedMovie>) -> Self {
        let view_list = base_list.clone();
        Self { base_list, view_list, active_filter: None, active_sorter: None }
    }

    pub fn base_list(&self) -> &[AnnotatedMovie] {
        &self.base_list
    }

    pub fn view_list(&self) -> &[AnnotatedMovie] {
        &self.view_list
    }

    pub fn active_filter(&self) -> Option<&FilterDescriptor> {
        self.active_filter.as_ref()
    }

    pub fn active_sorter(&self) -> Option<SortKind> {
        self.active_sorter
    }

    /// Swap in a freshly loaded base list, keeping the active filter and ordering.
    pub fn replace_base(&mut self, base_list: Vec<AnnotatedMovie>) {
        self.base_list = base_list;
        self.rebuild();
    }

    pub fn filter_by_genre(&mut self, genre: impl Into<String>) {
        self.set_filter(Some(FilterDescriptor::Genre(genre.into())));
    }

    pub fn filter_by_year(&mut self, year: i32) {
        self.set_filter(Some(FilterDescriptor::Year(year)));
    }

    /// A blank query drops the search filter.
    pub fn filter_by_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query.trim().is_empty() {
            self.clear_search();
        } else {
            self.set_filter(Some(FilterDescriptor::Search(query)));
        }
    }

    /// Drop both the filter and the ordering, showing the base list as loaded.
    pub fn clear_filter(&mut self) {
        self.active_filter = None;
        self.active_sorter = None;
        self.rebuild();
    }

    /// Drop the filter only when it is a search.
    pub fn clear_search(&mut self) {
        if matches!(self.active_filter, Some(FilterDescriptor::Search(_))) {
            self.set_filter(None);
        }
    }

    pub fn sort_by(&mut self, kind: SortKind) {
        self.active_sorter = Some(kind);
        self.rebuild();
    }

    /// Drop the ordering; the active filter stays applied.
    pub fn clear_sort(&mut self) {
        self.active_sorter = None;
        self.rebuild();
    }

    /// Reflect a persisted rating change. Returns false when the movie is not loaded.
    pub fn apply_rating(&mut self, id: MovieId, rating: Rating) -> bool {
        self.patch(id, |movie| movie.rating = rating)
    }

    /// Reflect a persisted favorite change. Returns false when the movie is not loaded.
    pub fn apply_favorite(&mut self, id: MovieId, is_favorite: bool) -> bool {
        self.patch(id, |movie| movie.is_favorite = is_favorite)
    }

    /// Drop a movie that no longer exists remotely.
    pub fn remove(&mut self, id: MovieId) -> bool {
        let before = self.base_list.len();
        self.base_list.retain(|m| m.id() != id);
        let removed = self.base_list.len() != before;
        if removed {
            self.rebuild();
        }
        removed
    }

    pub fn find(&self, id: MovieId) -> Option<&AnnotatedMovie> {
        self.base_list.iter().find(|m| m.id() == id)
    }

    fn patch(&mut self, id: MovieId, update: impl FnOnce(&mut AnnotatedMovie)) -> bool {
        let Some(movie) = self.base_list.iter_mut().find(|m| m.id() == id) else {
            return false;
        };
        update(movie);
        self.rebuild();
        true
    }

    fn set_filter(&mut self, filter: Option<FilterDescriptor>) {
        self.active_filter = filter;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let filtered = match &self.active_filter {
            Some(descriptor) => filter::apply(&self.base_list, descriptor),
            None => self.base_list.clone(),
        };
        self.view_list = match self.active_sorter {
            Some(kind) => sort::apply(&filtered, kind),
            None => filtered,
        };
    }
}
