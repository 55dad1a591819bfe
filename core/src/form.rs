//! Validation of the add/edit movie form into a [`MovieDraft`].

use crate::types::MovieDraft;

/// First field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Raw text of the movie form, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieForm {
    pub title: String,
    pub year: String,
    pub cast: String,
    pub genres: String,
    pub href: String,
    pub extract: String,
    pub thumbnail: String,
    pub thumbnail_width: String,
    pub thumbnail_height: String,
}

impl MovieForm {
    pub fn validate(&self) -> Result<MovieDraft, FieldError> {
        let title = required(&self.title, "title")?;
        let year = required(&self.year, "year")?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::new("year", "invalid year"));
        }
        let href = required(&self.href, "href")?;
        let extract = required(&self.extract, "extract")?;
        let thumbnail = required(&self.thumbnail, "thumbnail")?;
        if !is_url(thumbnail) {
            return Err(FieldError::new("thumbnail", "invalid URL format"));
        }

        Ok(MovieDraft {
            title: title.to_string(),
            year: year.parse().map_err(|_| FieldError::new("year", "invalid year"))?,
            cast: list(&self.cast, "cast")?,
            genres: list(&self.genres, "genres")?,
            href: Some(href.to_string()),
            extract: extract.to_string(),
            thumbnail: thumbnail.to_string(),
            thumbnail_width: dimension(&self.thumbnail_width, "thumbnail_width")?,
            thumbnail_height: dimension(&self.thumbnail_height, "thumbnail_height")?,
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, FieldError> {
    let value = value.trim();
    if value.is_empty() { Err(FieldError::new(field, "is required")) } else { Ok(value) }
}

fn is_url(value: &str) -> bool {
    ["ftp://", "http://", "https://"].iter().any(|scheme| {
        value
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty() && !rest.contains([' ', '"']))
    })
}

fn dimension(value: &str, field: &'static str) -> Result<u32, FieldError> {
    required(value, field)?.parse().map_err(|_| FieldError::new(field, "must be a number"))
}

/// Comma-separated entries; an empty field is an empty list but empty entries are rejected.
fn list(value: &str, field: &'static str) -> Result<Vec<String>, FieldError> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Vec<String> = value.split(',').map(|item| item.trim().to_string()).collect();
    if items.iter().any(String::is_empty) {
        return Err(FieldError::new(field, "contains empty values"));
    }
    Ok(items)
}
