//! REST implementation of the catalog gateway and the account endpoints.

use async_trait::async_trait;
use reqwest::{Method, Request, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::store::SessionStore;
use crate::types::{AuthSession, Movie, MovieDraft, MovieId, SignupRequest, User};

use super::CatalogGateway;

const LOGIN_PATH: &str = "login";
const SIGNUP_PATH: &str = "signup";
const FILM_PATH: &str = "film";
const USERS_PATH: &str = "users";

/// Map a response status onto the error taxonomy; `None` for success.
pub fn classify_status(status: StatusCode, resource: &str, body: &str) -> Option<CatalogError> {
    if status.is_success() {
        return None;
    }
    let error = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CatalogError::Auth { status: status.as_u16() }
        }
        StatusCode::NOT_FOUND => CatalogError::NotFound { resource: resource.to_string() },
        other => CatalogError::Server {
            status: other.as_u16(),
            message: summarize_body(body, other),
        },
    };
    Some(error)
}

fn summarize_body(body: &str, status: StatusCode) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status.canonical_reason().unwrap_or("unexpected status").to_string();
    }
    trimmed.chars().take(200).collect()
}

#[derive(Debug, Deserialize)]
struct UserRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    user: Option<UserRef>,
}

impl TokenResponse {
    fn into_session(self) -> CatalogResult<AuthSession> {
        let user_id = self.user.map(|user| user.id).or(self.id).ok_or_else(|| {
            CatalogError::Server {
                status: StatusCode::OK.as_u16(),
                message: "auth response carries no user id".to_string(),
            }
        })?;
        Ok(AuthSession { access_token: self.access_token, user_id })
    }
}

/// REST client for the catalog backend, authenticating with the stored bearer token.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig, session: SessionStore) -> CatalogResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| CatalogError::Network(err.to_string()))?;
        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string(), session })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> CatalogResult<Request> {
        let mut builder = self.client.request(method, self.url(path));
        if path != LOGIN_PATH {
            if let Some(token) = self.session.access_token()? {
                builder = builder.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.build().map_err(|err| CatalogError::Network(err.to_string()))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        resource: &str,
        body: Option<&Value>,
    ) -> CatalogResult<Response> {
        let request = self.build_request(method.clone(), path, body)?;
        let response = self.client.execute(request).await.map_err(|err| {
            warn!(target: "gateway::http", %method, path, error = %err, "request failed");
            CatalogError::Network(err.to_string())
        })?;

        let status = response.status();
        debug!(target: "gateway::http", %method, path, status = status.as_u16(), "response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, resource, &body)
            .unwrap_or_else(|| CatalogError::Server { status: status.as_u16(), message: body }))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> CatalogResult<T> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|err| CatalogError::Network(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| CatalogError::Server {
            status,
            message: format!("invalid response body: {err}"),
        })
    }

    fn encode<T: serde::Serialize>(value: &T) -> CatalogResult<Value> {
        serde_json::to_value(value).map_err(|err| CatalogError::Server {
            status: 0,
            message: format!("failed to encode request body: {err}"),
        })
    }

    /// `POST /login`; stores the returned session.
    pub async fn login(&self, email: &str, password: &str) -> CatalogResult<AuthSession> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self.send(Method::POST, LOGIN_PATH, "login", Some(&body)).await?;
        let session = Self::decode::<TokenResponse>(response).await?.into_session()?;
        self.session.save(&session)?;
        info!(target: "gateway::http", user = session.user_id, "logged in");
        Ok(session)
    }

    /// `POST /signup` with the fields collected by both registration steps; stores the session.
    pub async fn signup(&self, request: &SignupRequest) -> CatalogResult<AuthSession> {
        let body = Self::encode(request)?;
        let response = self.send(Method::POST, SIGNUP_PATH, "signup", Some(&body)).await?;
        let session = Self::decode::<TokenResponse>(response).await?.into_session()?;
        self.session.save(&session)?;
        info!(target: "gateway::http", user = session.user_id, "signed up");
        Ok(session)
    }

    pub fn logout(&self) -> CatalogResult<()> {
        self.session.clear()?;
        info!(target: "gateway::http", "logged out");
        Ok(())
    }

    pub async fn get_user(&self, id: u64) -> CatalogResult<User> {
        let path = format!("{USERS_PATH}/{id}");
        let response = self.send(Method::GET, &path, &format!("user {id}"), None).await?;
        Self::decode(response).await
    }

    pub async fn delete_user(&self, id: u64) -> CatalogResult<()> {
        let path = format!("{USERS_PATH}/{id}");
        self.send(Method::DELETE, &path, &format!("user {id}"), None).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    async fn fetch_all(&self) -> CatalogResult<Vec<Movie>> {
        let response = self.send(Method::GET, FILM_PATH, "catalog", None).await?;
        let movies: Vec<Movie> = Self::decode(response).await?;
        debug!(target: "gateway::http", count = movies.len(), "catalog fetched");
        Ok(movies)
    }

    async fn fetch_by_id(&self, id: MovieId) -> CatalogResult<Movie> {
        let path = format!("{FILM_PATH}/{id}");
        let response = self.send(Method::GET, &path, &format!("movie {id}"), None).await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: MovieId) -> CatalogResult<()> {
        let path = format!("{FILM_PATH}/{id}");
        self.send(Method::DELETE, &path, &format!("movie {id}"), None).await?;
        info!(target: "gateway::http", movie = %id, "movie deleted");
        Ok(())
    }

    async fn create(&self, draft: &MovieDraft) -> CatalogResult<Movie> {
        let body = Self::encode(draft)?;
        let response = self.send(Method::POST, FILM_PATH, "catalog", Some(&body)).await?;
        Self::decode(response).await
    }

    async fn update(&self, id: MovieId, draft: &MovieDraft) -> CatalogResult<Movie> {
        let path = format!("{FILM_PATH}/{id}");
        let body = Self::encode(draft)?;
        let response = self.send(Method::PUT, &path, &format!("movie {id}"), Some(&body)).await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    fn gateway_with_token(token: Option<&str>) -> HttpGateway {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        if let Some(token) = token {
            session.save(&AuthSession { access_token: token.to_string(), user_id: 1 }).unwrap();
        }
        let config =
            ClientConfig { base_url: "http://localhost:3030/".into(), ..ClientConfig::default() };
        HttpGateway::new(&config, session).unwrap()
    }

    #[test]
    fn statuses_map_onto_taxonomy() {
        assert!(classify_status(StatusCode::OK, "catalog", "").is_none());
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "catalog", ""),
            Some(CatalogError::Auth { status: 401 })
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "catalog", ""),
            Some(CatalogError::Auth { status: 403 })
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "movie 4", ""),
            Some(CatalogError::NotFound { resource }) if resource == "movie 4"
        ));
        match classify_status(StatusCode::BAD_GATEWAY, "catalog", "") {
            Some(CatalogError::Server { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn bearer_token_is_attached_except_for_login() {
        let gateway = gateway_with_token(Some("secret"));

        let film = gateway.build_request(Method::GET, FILM_PATH, None).unwrap();
        assert_eq!(film.url().as_str(), "http://localhost:3030/film");
        assert_eq!(film.headers()["authorization"], "Bearer secret");

        let login = gateway.build_request(Method::POST, LOGIN_PATH, None).unwrap();
        assert!(login.headers().get("authorization").is_none());
    }

    #[test]
    fn requests_without_session_are_anonymous() {
        let gateway = gateway_with_token(None);
        let request = gateway.build_request(Method::GET, "film/3", None).unwrap();
        assert!(request.headers().get("authorization").is_none());
        assert_eq!(request.url().path(), "/film/3");
    }

    #[test]
    fn token_responses_accept_login_and_signup_shapes() {
        let login: TokenResponse =
            serde_json::from_str(r#"{"accessToken":"a","user":{"id":5,"email":"x@y"}}"#).unwrap();
        assert_eq!(login.into_session().unwrap().user_id, 5);

        let signup: TokenResponse = serde_json::from_str(r#"{"accessToken":"b","id":9}"#).unwrap();
        assert_eq!(signup.into_session().unwrap().user_id, 9);

        let broken: TokenResponse = serde_json::from_str(r#"{"accessToken":"c"}"#).unwrap();
        assert!(broken.into_session().is_err());
    }
}
