mod common;

use common::{annotated, ids, movie, titles};
use movies_core::types::Annotation;
use movies_core::view::{
    available_genres, available_years, filter_by_genre, filter_by_search, sort_by_favorites,
    sort_by_rating, sort_by_title,
};
use movies_core::{FilterDescriptor, MovieId, Rating, SortKind, ViewState, merge};

fn catalog() -> Vec<movies_core::AnnotatedMovie> {
    let movies = vec![
        movie(1, "Alien", 1979, &["Horror", "Science Fiction"]),
        movie(2, "Heat", 1995, &["Crime"]),
        movie(3, "Arrival", 2016, &["Science Fiction", "Drama"]),
        movie(4, "Se7en", 1995, &["Crime", "Thriller"]),
    ];
    let mut annotation = Annotation::default();
    annotation.ratings.insert(MovieId(2), Rating::new(5).unwrap());
    annotation.ratings.insert(MovieId(3), Rating::new(4).unwrap());
    annotation.favorites.insert(MovieId(4));
    merge(movies, &annotation)
}

#[test]
fn merge_keeps_order_and_ignores_unknown_ids() {
    let movies = vec![movie(10, "B", 2000, &[]), movie(11, "A", 2001, &[])];
    let mut annotation = Annotation::default();
    annotation.ratings.insert(MovieId(11), Rating::new(3).unwrap());
    annotation.ratings.insert(MovieId(99), Rating::new(5).unwrap());
    annotation.favorites.insert(MovieId(98));

    let first = merge(movies.clone(), &annotation);
    let second = merge(movies, &annotation);

    assert_eq!(first, second);
    assert_eq!(ids(&first), vec![10, 11]);
    assert_eq!(first[0].rating, Rating::UNRATED);
    assert!(!first[0].is_favorite);
    assert_eq!(first[1].rating.value(), 3);
}

#[test]
fn new_filter_replaces_previous_one() {
    let mut view = ViewState::new(catalog());

    view.filter_by_genre("Crime");
    assert_eq!(ids(view.view_list()), vec![2, 4]);

    view.filter_by_genre("Science Fiction");
    assert_eq!(ids(view.view_list()), vec![1, 3]);
    assert_eq!(
        view.active_filter(),
        Some(&FilterDescriptor::Genre("Science Fiction".into()))
    );

    view.filter_by_year(1995);
    assert_eq!(ids(view.view_list()), vec![2, 4]);
}

#[test]
fn free_genre_filter_matches_model() {
    let list = catalog();
    let filtered = filter_by_genre(&list, "Crime");
    assert!(filtered.iter().all(|m| m.movie.genres().iter().any(|g| g == "Crime")));
    assert_eq!(filtered.len(), 2);
}

#[test]
fn sorts_are_stable() {
    let list = vec![
        annotated(1, "B", 1, false),
        annotated(2, "A", 2, false),
        annotated(3, "A", 3, false),
    ];
    assert_eq!(ids(&sort_by_title(&list)), vec![2, 3, 1]);

    let ratings = vec![
        annotated(1, "x", 4, false),
        annotated(2, "y", 5, false),
        annotated(3, "z", 4, false),
    ];
    assert_eq!(ids(&sort_by_rating(&ratings)), vec![2, 1, 3]);

    let favorites = vec![
        annotated(1, "x", 0, false),
        annotated(2, "y", 0, true),
        annotated(3, "z", 0, false),
        annotated(4, "w", 0, true),
    ];
    assert_eq!(ids(&sort_by_favorites(&favorites)), vec![2, 4, 1, 3]);
}

#[test]
fn title_sort_is_natural_and_case_insensitive() {
    let list = vec![
        annotated(1, "rocky 10", 0, false),
        annotated(2, "Rocky 2", 0, false),
        annotated(3, "alien", 0, false),
    ];
    assert_eq!(titles(&sort_by_title(&list)), vec!["alien", "Rocky 2", "rocky 10"]);
}

#[test]
fn clear_filter_restores_base_and_drops_sort() {
    let base = catalog();
    let mut view = ViewState::new(base.clone());

    view.filter_by_genre("Crime");
    view.sort_by(SortKind::Rating);
    view.clear_filter();

    assert_eq!(view.view_list(), base.as_slice());
    assert_eq!(view.active_filter(), None);
    assert_eq!(view.active_sorter(), None);
}

#[test]
fn clear_sort_keeps_the_filter() {
    let mut view = ViewState::new(catalog());

    view.filter_by_year(1995);
    view.sort_by(SortKind::Favorites);
    assert_eq!(ids(view.view_list()), vec![4, 2]);

    view.clear_sort();
    assert_eq!(ids(view.view_list()), vec![2, 4]);
    assert_eq!(view.active_filter(), Some(&FilterDescriptor::Year(1995)));
}

#[test]
fn sort_applies_on_top_of_filter() {
    let mut view = ViewState::new(catalog());

    view.sort_by(SortKind::Title);
    view.filter_by_genre("Science Fiction");

    assert_eq!(titles(view.view_list()), vec!["Alien", "Arrival"]);
    assert_eq!(view.active_sorter(), Some(SortKind::Title));
}

#[test]
fn search_round_trip() {
    let list = vec![
        annotated(1, "Alpha", 0, false),
        annotated(2, "Beta", 0, false),
        annotated(3, "Gamma", 0, false),
    ];
    let mut view = ViewState::new(list.clone());

    view.filter_by_search("al");
    assert_eq!(titles(view.view_list()), vec!["Alpha"]);

    view.clear_search();
    assert_eq!(view.view_list(), list.as_slice());
}

#[test]
fn search_is_case_insensitive_and_blank_clears() {
    let list = catalog();
    assert_eq!(ids(&filter_by_search("ALI", &list)), vec![1]);

    let mut view = ViewState::new(list.clone());
    view.filter_by_search("heat");
    assert_eq!(ids(view.view_list()), vec![2]);

    view.filter_by_search("   ");
    assert_eq!(view.active_filter(), None);
    assert_eq!(view.view_list().len(), list.len());
}

#[test]
fn clear_search_leaves_other_filters_alone() {
    let mut view = ViewState::new(catalog());
    view.filter_by_genre("Crime");

    view.clear_search();

    assert_eq!(view.active_filter(), Some(&FilterDescriptor::Genre("Crime".into())));
    assert_eq!(ids(view.view_list()), vec![2, 4]);
}

#[test]
fn replacing_base_reapplies_filter_and_sort() {
    let mut view = ViewState::new(catalog());
    view.filter_by_genre("Crime");
    view.sort_by(SortKind::Title);

    let mut next = catalog();
    next.push(annotated(5, "Collateral", 0, false));
    next[4].movie.genres = Some(vec!["Crime".into()]);
    view.replace_base(next);

    assert_eq!(titles(view.view_list()), vec!["Collateral", "Heat", "Se7en"]);
}

#[test]
fn empty_base_yields_empty_results() {
    let mut view = ViewState::new(Vec::new());

    view.filter_by_genre("Crime");
    assert!(view.view_list().is_empty());
    view.sort_by(SortKind::Rating);
    assert!(view.view_list().is_empty());
    view.filter_by_search("x");
    assert!(view.view_list().is_empty());
    assert!(available_genres(view.base_list()).is_empty());
}

#[test]
fn patches_follow_the_active_ordering() {
    let mut view = ViewState::new(catalog());
    view.sort_by(SortKind::Rating);
    assert_eq!(ids(view.view_list())[0], 2);

    assert!(view.apply_rating(MovieId(1), Rating::new(5).unwrap()));
    assert_eq!(ids(view.view_list())[..2], [1, 2]);
    assert!(!view.apply_favorite(MovieId(42), true));
}

#[test]
fn filter_choices_come_from_base_list() {
    let list = catalog();

    assert_eq!(
        available_genres(&list),
        vec!["Crime", "Drama", "Horror", "Science Fiction", "Thriller"]
    );
    assert_eq!(available_years(&list), vec![2016, 1995, 1979]);
}
