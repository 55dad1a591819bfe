//! Filter predicates over annotated lists, plus the choices offered by the filter picker.

use std::collections::BTreeSet;

use crate::types::{AnnotatedMovie, FilterDescriptor};

pub fn filter_by_genre(list: &[AnnotatedMovie], genre: &str) -> Vec<AnnotatedMovie> {
    list.iter().filter(|m| m.movie.genres().iter().any(|g| g == genre)).cloned().collect()
}

pub fn filter_by_year(list: &[AnnotatedMovie], year: i32) -> Vec<AnnotatedMovie> {
    list.iter().filter(|m| m.movie.year == year).cloned().collect()
}

/// Case-insensitive substring match on the title.
pub fn filter_by_search(query: &str, list: &[AnnotatedMovie]) -> Vec<AnnotatedMovie> {
    let needle = query.to_lowercase();
    list.iter().filter(|m| m.title().to_lowercase().contains(&needle)).cloned().collect()
}

pub fn apply(list: &[AnnotatedMovie], filter: &FilterDescriptor) -> Vec<AnnotatedMovie> {
    match filter {
        FilterDescriptor::Genre(genre) => filter_by_genre(list, genre),
        FilterDescriptor::Year(year) => filter_by_year(list, *year),
        FilterDescriptor::Search(query) => filter_by_search(query, list),
    }
}

/// Distinct genres in alphabetical order.
pub fn available_genres(list: &[AnnotatedMovie]) -> Vec<String> {
    let mut set = BTreeSet::new();
    for movie in list {
        for genre in movie.movie.genres().iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
            set.insert(genre.to_string());
        }
    }
    set.into_iter().collect()
}

/// Distinct release years, newest first.
pub fn available_years(list: &[AnnotatedMovie]) -> Vec<i32> {
    let set: BTreeSet<i32> = list.iter().map(|m| m.movie.year).collect();
    set.into_iter().rev().collect()
}
