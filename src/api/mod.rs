use crate::config::EnvConfig;
use crate::models::{Bookmark, NewBookmark, User};
use crate::storage::{clear_session_storage, load_session_from_storage};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Error, Clone, Debug)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum OAuthProvider {
    #[default]
    Google,
}

/// Everything the app needs from the managed backend.
///
/// Futures are not `Send`: the app runs on the browser's single thread.
pub(crate) trait BookmarkBackend {
    async fn current_user(&self) -> ApiResult<Option<User>>;

    /// Navigates the browser away; only returns on failure to start the redirect.
    async fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &str)
        -> ApiResult<()>;

    async fn sign_out(&self) -> ApiResult<()>;

    /// Newest first.
    async fn list_bookmarks(&self, user_id: &str) -> ApiResult<Vec<Bookmark>>;

    async fn insert_bookmark(&self, record: &NewBookmark) -> ApiResult<Bookmark>;

    async fn delete_bookmark(&self, id: &str) -> ApiResult<()>;
}

/// REST client for the hosted auth + table API.
#[derive(Clone, Debug)]
pub(crate) struct SupabaseClient {
    pub(crate) base_url: String,
    pub(crate) anon_key: String,
    pub(crate) token: Option<String>,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            token: None,
        }
    }

    pub fn load_from_storage(cfg: &EnvConfig) -> Self {
        let mut client = Self::new(cfg.supabase_url.clone(), cfg.supabase_anon_key.clone());
        client.token = load_session_from_storage().map(|s| s.access_token);
        client
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn logout(&mut self) {
        self.token = None;
        clear_session_storage();
    }

    fn auth_header(&self) -> String {
        // The anon key doubles as a bearer token for unauthenticated calls.
        format!("Bearer {}", self.token.as_deref().unwrap_or(&self.anon_key))
    }

    fn with_auth_headers(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.anon_key)
            .header("Authorization", self.auth_header())
    }

    pub(crate) fn authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> String {
        format!(
            "{}/auth/v1/authorize?provider={}&redirect_to={}",
            self.base_url,
            provider,
            urlencoding::encode(redirect_to)
        )
    }

    pub(crate) fn list_url(&self, user_id: &str) -> String {
        format!(
            "{}/rest/v1/bookmarks?select=*&user_id=eq.{}&order=created_at.desc",
            self.base_url,
            urlencoding::encode(user_id)
        )
    }

    pub(crate) fn insert_url(&self) -> String {
        format!("{}/rest/v1/bookmarks", self.base_url)
    }

    pub(crate) fn delete_url(&self, id: &str) -> String {
        format!(
            "{}/rest/v1/bookmarks?id=eq.{}",
            self.base_url,
            urlencoding::encode(id)
        )
    }

    async fn send(req: reqwest::RequestBuilder, ctx: &str) -> ApiResult<reqwest::Response> {
        let res = req.send().await.map_err(ApiError::network)?;

        let status = res.status();
        if status.is_success() {
            Ok(res)
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(ApiError::unauthorized())
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, ctx))
        }
    }

    /// Table API responses with `Prefer: return=representation` are arrays.
    pub(crate) fn first_row(rows: Vec<Bookmark>) -> ApiResult<Bookmark> {
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::parse("insert succeeded but returned no row"))
    }
}

impl BookmarkBackend for SupabaseClient {
    async fn current_user(&self) -> ApiResult<Option<User>> {
        if self.token.is_none() {
            return Ok(None);
        }

        let req = self.with_auth_headers(
            reqwest::Client::new().get(format!("{}/auth/v1/user", self.base_url)),
        );
        match Self::send(req, "Get user failed").await {
            Ok(res) => res.json::<User>().await.map(Some).map_err(ApiError::parse),
            Err(e) if e.kind == ApiErrorKind::Unauthorized => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> ApiResult<()> {
        let href = self.authorize_url(provider, redirect_to);
        let Some(window) = web_sys::window() else {
            return Err(ApiError::parse("no window"));
        };
        window.location().set_href(&href).map_err(|e| ApiError {
            kind: ApiErrorKind::Network,
            message: format!("{e:?}"),
        })
    }

    async fn sign_out(&self) -> ApiResult<()> {
        if self.token.is_none() {
            return Ok(());
        }

        let req = self.with_auth_headers(
            reqwest::Client::new().post(format!("{}/auth/v1/logout", self.base_url)),
        );
        Self::send(req, "Sign out failed").await.map(|_| ())
    }

    async fn list_bookmarks(&self, user_id: &str) -> ApiResult<Vec<Bookmark>> {
        let req = self.with_auth_headers(reqwest::Client::new().get(self.list_url(user_id)));
        let res = Self::send(req, "List bookmarks failed").await?;
        res.json().await.map_err(ApiError::parse)
    }

    async fn insert_bookmark(&self, record: &NewBookmark) -> ApiResult<Bookmark> {
        let req = self
            .with_auth_headers(reqwest::Client::new().post(self.insert_url()))
            .header("Prefer", "return=representation")
            .json(record);
        let res = Self::send(req, "Insert bookmark failed").await?;
        let rows: Vec<Bookmark> = res.json().await.map_err(ApiError::parse)?;
        Self::first_row(rows)
    }

    async fn delete_bookmark(&self, id: &str) -> ApiResult<()> {
        let req = self.with_auth_headers(reqwest::Client::new().delete(self.delete_url(id)));
        Self::send(req, "Delete bookmark failed").await.map(|_| ())
    }
}
