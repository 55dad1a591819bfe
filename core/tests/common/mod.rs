#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use movies_core::error::{CatalogResult, StorageError, StorageResult};
use movies_core::gateway::CatalogGateway;
use movies_core::host::{AlertSink, Navigator};
use movies_core::store::{AnnotationStore, KeyValueStore, MemoryStore};
use movies_core::{AnnotatedMovie, CatalogError, Movie, MovieDraft, MovieId, MovieList, Rating};

pub fn movie(id: u64, title: &str, year: i32, genres: &[&str]) -> Movie {
    Movie {
        id: MovieId(id),
        title: title.to_string(),
        year,
        cast: None,
        genres: Some(genres.iter().map(|g| g.to_string()).collect()),
        href: None,
        extract: format!("About {title}"),
        thumbnail: format!("https://img.example.test/{id}.jpg"),
        thumbnail_width: 200,
        thumbnail_height: 300,
    }
}

pub fn annotated(id: u64, title: &str, rating: u8, is_favorite: bool) -> AnnotatedMovie {
    AnnotatedMovie::new(movie(id, title, 2000, &[]), Rating::new(rating).unwrap(), is_favorite)
}

pub fn ids(list: &[AnnotatedMovie]) -> Vec<u64> {
    list.iter().map(|m| m.id().as_u64()).collect()
}

pub fn titles(list: &[AnnotatedMovie]) -> Vec<String> {
    list.iter().map(|m| m.title().to_string()).collect()
}

/// Scripted catalog response.
#[derive(Debug, Clone)]
pub enum Reply {
    Movies(Vec<Movie>),
    Auth,
    Network,
    Server,
}

impl Reply {
    fn into_result(self) -> CatalogResult<Vec<Movie>> {
        match self {
            Reply::Movies(movies) => Ok(movies),
            Reply::Auth => Err(CatalogError::Auth { status: 401 }),
            Reply::Network => Err(CatalogError::Network("connection refused".into())),
            Reply::Server => Err(CatalogError::Server { status: 500, message: "boom".into() }),
        }
    }

    fn error(&self) -> CatalogError {
        self.clone().into_result().err().expect("only movie replies succeed")
    }
}

/// In-memory catalog whose `fetch_all` replies follow a script.
#[derive(Debug)]
pub struct FakeGateway {
    reply: Mutex<Reply>,
    delays: Mutex<VecDeque<(Duration, Option<Reply>)>>,
    fetches: AtomicUsize,
    deleted: Mutex<Vec<MovieId>>,
}

impl FakeGateway {
    pub fn new(movies: Vec<Movie>) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Reply::Movies(movies)),
            delays: Mutex::new(VecDeque::new()),
            fetches: AtomicUsize::new(0),
            deleted: Mutex::new(Vec::new()),
        })
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock() = reply;
    }

    /// The next `fetch_all` waits `delay` and answers `reply` (or the current default).
    pub fn queue_delayed(&self, delay: Duration, reply: Option<Reply>) {
        self.delays.lock().push_back((delay, reply));
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<MovieId> {
        self.deleted.lock().clone()
    }

    fn current(&self) -> Reply {
        self.reply.lock().clone()
    }
}

#[async_trait]
impl CatalogGateway for FakeGateway {
    async fn fetch_all(&self) -> CatalogResult<Vec<Movie>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let scripted = self.delays.lock().pop_front();
        let reply = match scripted {
            Some((delay, reply)) => {
                let reply = reply.unwrap_or_else(|| self.current());
                tokio::time::sleep(delay).await;
                reply
            }
            None => self.current(),
        };
        reply.into_result()
    }

    async fn fetch_by_id(&self, id: MovieId) -> CatalogResult<Movie> {
        let movies = self.current().into_result()?;
        movies
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::NotFound { resource: format!("movie {id}") })
    }

    async fn delete(&self, id: MovieId) -> CatalogResult<()> {
        self.current().into_result()?;
        self.deleted.lock().push(id);
        Ok(())
    }

    async fn create(&self, draft: &MovieDraft) -> CatalogResult<Movie> {
        let mut reply = self.reply.lock();
        let Reply::Movies(movies) = &mut *reply else {
            return Err(reply.error());
        };
        let next_id = movies.iter().map(|m| m.id.as_u64()).max().unwrap_or(0) + 1;
        let movie = from_draft(MovieId(next_id), draft);
        movies.push(movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: MovieId, draft: &MovieDraft) -> CatalogResult<Movie> {
        let mut reply = self.reply.lock();
        let Reply::Movies(movies) = &mut *reply else {
            return Err(reply.error());
        };
        let slot = movies
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::NotFound { resource: format!("movie {id}") })?;
        *slot = from_draft(id, draft);
        Ok(slot.clone())
    }
}

fn from_draft(id: MovieId, draft: &MovieDraft) -> Movie {
    Movie {
        id,
        title: draft.title.clone(),
        year: draft.year,
        cast: Some(draft.cast.clone()),
        genres: Some(draft.genres.clone()),
        href: draft.href.clone(),
        extract: draft.extract.clone(),
        thumbnail: draft.thumbnail.clone(),
        thumbnail_width: draft.thumbnail_width,
        thumbnail_height: draft.thumbnail_height,
    }
}

/// Records every navigation and alert request.
#[derive(Debug, Default)]
pub struct RecordingHost {
    redirects: AtomicUsize,
    alerts: Mutex<Vec<(String, String)>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }

    pub fn alerts(&self) -> Vec<(String, String)> {
        self.alerts.lock().clone()
    }
}

impl Navigator for RecordingHost {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

impl AlertSink for RecordingHost {
    fn show_alert(&self, title: &str, message: &str) {
        self.alerts.lock().push((title.to_string(), message.to_string()));
    }
}

/// Key-value store that can be switched into failing reads or writes.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock() = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if *self.fail_reads.lock() {
            return Err(StorageError::Io(io::Error::other("read refused")));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if *self.fail_writes.lock() {
            return Err(StorageError::Io(io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key)
    }
}

pub struct Fixture {
    pub gateway: Arc<FakeGateway>,
    pub kv: Arc<FlakyStore>,
    pub host: Arc<RecordingHost>,
    pub list: Arc<MovieList>,
}

pub fn fixture(movies: Vec<Movie>) -> Fixture {
    let gateway = FakeGateway::new(movies);
    let kv = FlakyStore::new();
    let host = RecordingHost::new();
    let annotations = Arc::new(AnnotationStore::new(kv.clone()));
    let list = Arc::new(MovieList::new(gateway.clone(), annotations, host.clone(), host.clone()));
    Fixture { gateway, kv, host, list }
}
