//! Widening of catalog entries with the local annotation.

use crate::types::{AnnotatedMovie, Annotation, Movie};

/// Annotate every movie, preserving input order. Annotations for unknown ids are ignored.
pub fn merge(movies: Vec<Movie>, annotation: &Annotation) -> Vec<AnnotatedMovie> {
    movies
        .into_iter()
        .map(|movie| {
            let rating = annotation.rating_of(movie.id);
            let is_favorite = annotation.is_favorite(movie.id);
            AnnotatedMovie::new(movie, rating, is_favorite)
        })
        .collect()
}
