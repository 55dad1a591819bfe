//! Shared data structures exchanged between the gateway, the stores, the engine and the shell.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned to a movie by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl MovieId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog entry as served by `GET /film`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub cast: Option<Vec<String>>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub extract: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub thumbnail_width: u32,
    #[serde(default)]
    pub thumbnail_height: u32,
}

impl Movie {
    pub fn genres(&self) -> &[String] {
        self.genres.as_deref().unwrap_or_default()
    }

    pub fn cast(&self) -> &[String] {
        self.cast.as_deref().unwrap_or_default()
    }
}

/// Field set sent with `POST /film` and `PUT /film/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovieDraft {
    pub title: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub extract: String,
    pub thumbnail: String,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
}

/// Raised when a rating outside `0..=5` is constructed or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating {0} is outside 0..={max}", max = Rating::MAX)]
pub struct RatingOutOfRange(pub u8);

/// Star rating in `0..=5`; zero means unrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;
    pub const UNRATED: Rating = Rating(0);

    pub fn new(value: u8) -> Result<Self, RatingOutOfRange> {
        if value <= Self::MAX { Ok(Self(value)) } else { Err(RatingOutOfRange(value)) }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_rated(self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Locally persisted user annotations, stored as a single blob.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub ratings: BTreeMap<MovieId, Rating>,
    #[serde(default)]
    pub favorites: BTreeSet<MovieId>,
}

impl Annotation {
    pub fn rating_of(&self, id: MovieId) -> Rating {
        self.ratings.get(&id).copied().unwrap_or_default()
    }

    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.favorites.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty() && self.favorites.is_empty()
    }
}

/// A catalog entry widened with the local annotation for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub rating: Rating,
    pub is_favorite: bool,
}

impl AnnotatedMovie {
    pub fn new(movie: Movie, rating: Rating, is_favorite: bool) -> Self {
        Self { movie, rating, is_favorite }
    }

    pub fn id(&self) -> MovieId {
        self.movie.id
    }

    pub fn title(&self) -> &str {
        &self.movie.title
    }
}

/// The single active filter of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FilterDescriptor {
    Genre(String),
    Year(i32),
    Search(String),
}

/// The single active ordering of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    Rating,
    Favorites,
    Title,
}

impl SortKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Favorites => "favorites",
            Self::Title => "title",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rating" | "ratings" => Some(Self::Rating),
            "favorites" | "favourites" | "favorite" => Some(Self::Favorites),
            "title" | "name" => Some(Self::Title),
            _ => None,
        }
    }
}

/// Account record served by `GET /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
}

/// Payload for `POST /signup`, gathered across the two registration steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub age: u32,
}

/// Bearer token and owner returned by login or signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub user_id: u64,
}

/// Token identifying one refresh cycle; newer cycles supersede older ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}
