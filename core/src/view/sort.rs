//! Stable orderings over annotated lists.

use std::cmp::Reverse;

use crate::types::{AnnotatedMovie, SortKind};

use super::collate::title_cmp;

/// Highest rating first; equal ratings keep their relative order.
pub fn sort_by_rating(list: &[AnnotatedMovie]) -> Vec<AnnotatedMovie> {
    let mut sorted = list.to_vec();
    sorted.sort_by_key(|m| Reverse(m.rating));
    sorted
}

/// Favorites first; the rest keep their relative order.
pub fn sort_by_favorites(list: &[AnnotatedMovie]) -> Vec<AnnotatedMovie> {
    let mut sorted = list.to_vec();
    sorted.sort_by_key(|m| Reverse(m.is_favorite));
    sorted
}

/// Ascending by collated title.
pub fn sort_by_title(list: &[AnnotatedMovie]) -> Vec<AnnotatedMovie> {
    let mut sorted = list.to_vec();
    sorted.sort_by(|a, b| title_cmp(a.title(), b.title()));
    sorted
}

pub fn apply(list: &[AnnotatedMovie], kind: SortKind) -> Vec<AnnotatedMovie> {
    match kind {
        SortKind::Rating => sort_by_rating(list),
        SortKind::Favorites => sort_by_favorites(list),
        SortKind::Title => sort_by_title(list),
    }
}
