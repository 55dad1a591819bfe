//! Line commands of the terminal shell and their dispatch into the list engine.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use movies_core::gateway::HttpGateway;
use movies_core::{
    AnnotatedMovie, ListSnapshot, MovieForm, MovieId, MovieList, Rating, RefreshScheduler,
    RefreshTrigger, SchedulerHandle, SignupRequest, SortKind,
};
use serde::Serialize;

use crate::hooks::ConsoleHost;

pub const HELP: &str = "\
commands:
  list                      show the current list
  show <id>                 movie details
  rate <id> <0-5>           rate a movie (same value again clears it)
  fav <id>                  toggle favorite
  genre <name> | year <y>   filter the list
  search <text>             filter by title
  clear-search | clear-filter | clear-sort
  sort <rating|favorites|title>
  genres                    genres and years available for filtering
  scroll <offset>           report the list scroll position
  refresh                   reload now
  focus | blur              start or stop background refresh
  login <email> <password>
  signup <email> <password> <firstname> <lastname> <age>
  logout | profile | delete-account
  add <form>                add a movie
  edit <id> <form>          replace a movie's fields
  delete <id>               delete a movie
  stats                     refresh statistics
  quit
form: title | year | thumbnail | width | height | cast | genres | href | extract
      (cast and genres are comma-separated)";

const FORM_FIELDS: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    List,
    Show(MovieId),
    Rate(MovieId, u8),
    Favorite(MovieId),
    Genre(String),
    Year(i32),
    Search(String),
    ClearSearch,
    ClearFilter,
    Sort(SortKind),
    ClearSort,
    Genres,
    Scroll(f64),
    Refresh,
    Focus,
    Blur,
    Login { email: String, password: String },
    Signup(SignupRequest),
    Logout,
    Profile,
    DeleteAccount,
    Add(MovieForm),
    Edit(MovieId, MovieForm),
    Delete(MovieId),
    Stats,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    let Some((head, rest)) = split_head(line) else {
        return Ok(None);
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "list" | "ls" => Command::List,
        "show" => Command::Show(movie_id(&args, 0)?),
        "rate" => {
            let id = movie_id(&args, 0)?;
            let value = arg(&args, 1, "rating")?
                .parse::<u8>()
                .context("rating must be a number between 0 and 5")?;
            Command::Rate(id, value)
        }
        "fav" | "favorite" => Command::Favorite(movie_id(&args, 0)?),
        "genre" => {
            if rest.is_empty() {
                bail!("usage: genre <name>");
            }
            Command::Genre(rest.to_string())
        }
        "year" => Command::Year(arg(&args, 0, "year")?.parse().context("year must be a number")?),
        "search" => Command::Search(rest.to_string()),
        "clear-search" => Command::ClearSearch,
        "clear-filter" => Command::ClearFilter,
        "clear-sort" => Command::ClearSort,
        "sort" => {
            let raw = arg(&args, 0, "sort kind")?;
            Command::Sort(SortKind::from_str(raw).ok_or_else(|| anyhow!("unknown sort `{raw}`"))?)
        }
        "genres" | "years" => Command::Genres,
        "scroll" => {
            Command::Scroll(arg(&args, 0, "offset")?.parse().context("offset must be a number")?)
        }
        "refresh" | "r" => Command::Refresh,
        "focus" => Command::Focus,
        "blur" => Command::Blur,
        "login" => Command::Login {
            email: arg(&args, 0, "email")?.to_string(),
            password: arg(&args, 1, "password")?.to_string(),
        },
        "signup" => Command::Signup(SignupRequest {
            email: arg(&args, 0, "email")?.to_string(),
            password: arg(&args, 1, "password")?.to_string(),
            firstname: arg(&args, 2, "firstname")?.to_string(),
            lastname: arg(&args, 3, "lastname")?.to_string(),
            age: arg(&args, 4, "age")?.parse().context("age must be a number")?,
        }),
        "logout" => Command::Logout,
        "profile" => Command::Profile,
        "delete-account" => Command::DeleteAccount,
        "add" => Command::Add(movie_form(rest)?),
        "edit" => {
            let id = movie_id(&args, 0)?;
            let form = rest.split_once(char::is_whitespace).map_or("", |(_, form)| form);
            Command::Edit(id, movie_form(form)?)
        }
        "delete" | "rm" => Command::Delete(movie_id(&args, 0)?),
        "stats" => Command::Stats,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command `{other}`; type `help`"),
    };
    Ok(Some(command))
}

fn split_head(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() {
        return None;
    }
    Some(match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    })
}

fn arg<'a>(args: &[&'a str], index: usize, name: &str) -> Result<&'a str> {
    args.get(index).copied().ok_or_else(|| anyhow!("missing {name}"))
}

fn movie_id(args: &[&str], index: usize) -> Result<MovieId> {
    let raw = arg(args, index, "movie id")?;
    raw.parse::<u64>().map(MovieId).with_context(|| format!("invalid movie id `{raw}`"))
}

/// `|`-separated fields in the order of the add-movie screen.
fn movie_form(raw: &str) -> Result<MovieForm> {
    let fields: Vec<String> = raw.split('|').map(|field| field.trim().to_string()).collect();
    let Ok(
        [title, year, thumbnail, thumbnail_width, thumbnail_height, cast, genres, href, extract],
    ) = <[String; FORM_FIELDS]>::try_from(fields)
    else {
        bail!("expected {FORM_FIELDS} `|`-separated fields; type `help`");
    };
    Ok(MovieForm {
        title,
        year,
        cast,
        genres,
        href,
        extract,
        thumbnail,
        thumbnail_width,
        thumbnail_height,
    })
}

/// Interactive session state: the list engine plus the refresh loop while focused.
#[derive(Debug)]
pub struct Shell {
    gateway: Arc<HttpGateway>,
    list: Arc<MovieList>,
    host: Arc<ConsoleHost>,
    scheduler: RefreshScheduler,
    handle: Option<SchedulerHandle>,
}

impl Shell {
    pub fn new(
        gateway: Arc<HttpGateway>,
        list: Arc<MovieList>,
        host: Arc<ConsoleHost>,
        scheduler: RefreshScheduler,
    ) -> Self {
        Self { gateway, list, host, scheduler, handle: None }
    }

    /// Start background refresh unless it is already running.
    pub fn focus(&mut self) {
        if self.handle.as_ref().is_some_and(SchedulerHandle::is_running) {
            return;
        }
        // A stopped handle detaches the list on drop, so release it before reattaching.
        self.handle = None;
        self.host.clear_login_required();
        self.handle = Some(self.scheduler.start(Arc::clone(&self.list)));
    }

    pub async fn blur(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.shutdown().await;
        }
    }

    pub async fn execute(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Help | Command::Quit => Ok(HELP.to_string()),
            Command::List => Ok(render_list(&self.list.snapshot())),
            Command::Show(id) => {
                let movie = self.list.movie_detail(id).await?;
                to_json(&movie)
            }
            Command::Rate(id, value) => {
                let rating = Rating::new(value)?;
                let stored = self.list.rate(id, rating)?;
                Ok(format!("movie {id} rated {stored}"))
            }
            Command::Favorite(id) => {
                let favorite = self.list.toggle_favorite(id)?;
                let verb = if favorite { "added to" } else { "removed from" };
                Ok(format!("movie {id} {verb} favorites"))
            }
            Command::Genre(genre) => self.view_op(self.list.filter_by_genre(&genre)),
            Command::Year(year) => self.view_op(self.list.filter_by_year(year)),
            Command::Search(query) => self.view_op(self.list.filter_by_search(&query)),
            Command::ClearSearch => self.view_op(self.list.clear_search()),
            Command::ClearFilter => self.view_op(self.list.clear_filter()),
            Command::Sort(kind) => self.view_op(self.list.sort_by(kind)),
            Command::ClearSort => self.view_op(self.list.clear_sort()),
            Command::Genres => {
                let years: Vec<String> = self.list.years().iter().map(i32::to_string).collect();
                let genres = self.list.genres().join(", ");
                Ok(format!("genres: {genres}\nyears: {}", years.join(", ")))
            }
            Command::Scroll(offset) => {
                let queued = self.handle.as_ref().is_some_and(|h| h.notify_scroll(offset));
                Ok(if queued { "reloading".to_string() } else { String::new() })
            }
            Command::Refresh => self.refresh().await,
            Command::Focus => {
                self.focus();
                Ok("refresh started".to_string())
            }
            Command::Blur => {
                self.blur().await;
                Ok("refresh stopped".to_string())
            }
            Command::Login { email, password } => {
                let session = self.gateway.login(&email, &password).await?;
                self.focus();
                Ok(format!("logged in as user {}", session.user_id))
            }
            Command::Signup(request) => {
                let session = self.gateway.signup(&request).await?;
                self.focus();
                Ok(format!("signed up as user {}", session.user_id))
            }
            Command::Logout => {
                self.blur().await;
                self.gateway.logout()?;
                Ok("logged out".to_string())
            }
            Command::Profile => {
                let id = self.current_user()?;
                let user = self.gateway.get_user(id).await?;
                to_json(&user)
            }
            Command::DeleteAccount => {
                let id = self.current_user()?;
                self.gateway.delete_user(id).await?;
                self.blur().await;
                self.gateway.logout()?;
                Ok(format!("account {id} deleted"))
            }
            Command::Add(form) => {
                let draft = form.validate()?;
                let movie = self.list.add_movie(&draft).await?;
                Ok(format!("movie {} created", movie.id))
            }
            Command::Edit(id, form) => {
                let draft = form.validate()?;
                self.list.update_movie(id, &draft).await?;
                Ok(format!("movie {id} updated"))
            }
            Command::Delete(id) => {
                self.list.delete_movie(id).await?;
                Ok(format!("movie {id} deleted"))
            }
            Command::Stats => to_json(&self.list.stats().snapshot()),
        }
    }

    async fn refresh(&mut self) -> Result<String> {
        match &self.handle {
            Some(handle) if handle.request(RefreshTrigger::Manual) => Ok("reloading".to_string()),
            _ => {
                let outcome = self.list.reload(RefreshTrigger::Manual).await;
                Ok(format!("{outcome:?}"))
            }
        }
    }

    fn view_op(&self, applied: bool) -> Result<String> {
        if !applied {
            bail!("the list has not loaded yet");
        }
        Ok(render_list(&self.list.snapshot()))
    }

    fn current_user(&self) -> Result<u64> {
        self.gateway.session().user_id()?.ok_or_else(|| anyhow!("not logged in"))
    }

    pub async fn shutdown(mut self) {
        self.blur().await;
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("rendering output")
}

pub fn render_list(snapshot: &ListSnapshot) -> String {
    let mut out = String::new();
    let _ = write!(out, "{} of {} movies", snapshot.movies.len(), snapshot.total);
    if let Some(filter) = &snapshot.active_filter {
        let _ = write!(out, " | filter {filter:?}");
    }
    if let Some(sorter) = snapshot.active_sorter {
        let _ = write!(out, " | sorted by {}", sorter.as_str());
    }
    if snapshot.loading {
        out.push_str(" | loading");
    }
    for movie in &snapshot.movies {
        out.push('\n');
        out.push_str(&render_row(movie));
    }
    out
}

fn render_row(movie: &AnnotatedMovie) -> String {
    let stars: String =
        (1..=Rating::MAX).map(|n| if n <= movie.rating.value() { '*' } else { '.' }).collect();
    let heart = if movie.is_favorite { "<3" } else { "  " };
    format!("{:>6}  {stars} {heart}  {} ({})", movie.id(), movie.title(), movie.movie.year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn parses_rating_and_ids() {
        assert_eq!(parse("rate 12 4").unwrap(), Some(Command::Rate(MovieId(12), 4)));
        assert_eq!(parse("FAV 3").unwrap(), Some(Command::Favorite(MovieId(3))));
        assert!(parse("rate x 4").is_err());
        assert!(parse("show").is_err());
    }

    #[test]
    fn keeps_multi_word_arguments() {
        assert_eq!(
            parse("genre Science Fiction").unwrap(),
            Some(Command::Genre("Science Fiction".to_string()))
        );
        assert_eq!(parse("search the  heat").unwrap(), Some(Command::Search("the  heat".into())));
        assert_eq!(parse("search").unwrap(), Some(Command::Search(String::new())));
    }

    #[test]
    fn parses_sort_aliases() {
        assert_eq!(parse("sort title").unwrap(), Some(Command::Sort(SortKind::Title)));
        assert!(parse("sort length").is_err());
    }

    #[test]
    fn parses_signup_fields() {
        let parsed = parse("signup a@b.c secret Ada Lovelace 36").unwrap();
        let Some(Command::Signup(request)) = parsed else {
            panic!("expected signup, got {parsed:?}");
        };
        assert_eq!(request.email, "a@b.c");
        assert_eq!(request.age, 36);
        assert!(parse("signup a@b.c secret Ada").is_err());
    }

    #[test]
    fn parses_movie_forms() {
        let line = "add Heat | 1995 | https://img.test/h.jpg | 220 | 330 | Al Pacino | Crime \
                    | Heat_(1995_film) | A crew of thieves.";
        let Some(Command::Add(form)) = parse(line).unwrap() else {
            panic!("expected add");
        };
        assert_eq!(form.title, "Heat");
        assert_eq!(form.thumbnail_height, "330");
        assert_eq!(form.extract, "A crew of thieves.");
        assert!(form.validate().is_ok());

        let Some(Command::Edit(id, form)) =
            parse("edit 7 T | 2001 | http://i.test/t | 1 | 2 |  |  | t | x").unwrap()
        else {
            panic!("expected edit");
        };
        assert_eq!(id, MovieId(7));
        assert_eq!(form.href, "t");
        assert!(form.cast.is_empty());

        assert!(parse("add Heat | 1995").is_err());
        assert!(parse("edit x T | 2001").is_err());
    }

    #[test]
    fn rejects_unknown_commands() {
        let err = parse("dance").unwrap_err();
        assert!(err.to_string().contains("unknown command"));
    }
}
