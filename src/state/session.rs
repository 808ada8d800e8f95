use crate::api::{ApiResult, BookmarkBackend, OAuthProvider};
use crate::models::User;

pub(crate) const AUTH_CALLBACK_PATH: &str = "/auth/callback";

/// Nothing here is persisted across entries: every entry starts at
/// `Resolving` and asks the backend again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum SessionState {
    #[default]
    Resolving,
    Authenticated(User),
    Unauthenticated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    /// Answer to the "who is signed in" lookup made on entry.
    Resolved(Option<User>),
    SignedOut,
    Reenter,
}

impl SessionState {
    /// Events that make no sense in the current state leave it unchanged.
    pub fn transition(self, event: SessionEvent) -> Self {
        match (self, event) {
            (_, SessionEvent::Reenter) => Self::Resolving,
            (Self::Resolving, SessionEvent::Resolved(Some(user))) => Self::Authenticated(user),
            (Self::Resolving, SessionEvent::Resolved(None)) => Self::Unauthenticated,
            (Self::Authenticated(_), SessionEvent::SignedOut) => Self::Unauthenticated,
            (state, _) => state,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self, Self::Resolving)
    }

    /// The gate sends these visitors to the sign-in page.
    pub fn needs_sign_in(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}

/// Looks up the current user. Lookup errors count as "not signed in".
pub(crate) async fn resolve_session<B: BookmarkBackend>(backend: &B) -> SessionState {
    let user = match backend.current_user().await {
        Ok(user) => user,
        Err(e) => {
            log::warn!("session lookup failed: {e}");
            None
        }
    };
    SessionState::Resolving.transition(SessionEvent::Resolved(user))
}

pub(crate) fn callback_url(origin: &str) -> String {
    format!("{}{AUTH_CALLBACK_PATH}", origin.trim_end_matches('/'))
}

pub(crate) async fn sign_in<B: BookmarkBackend>(
    backend: &B,
    provider: OAuthProvider,
    origin: &str,
) -> ApiResult<()> {
    backend
        .sign_in_with_oauth(provider, &callback_url(origin))
        .await
}

/// Ends the session. A failed backend call still signs the tab out locally.
pub(crate) async fn sign_out<B: BookmarkBackend>(backend: &B, state: SessionState) -> SessionState {
    if let Err(e) = backend.sign_out().await {
        log::warn!("sign out failed on the backend: {e}");
    }
    state.transition(SessionEvent::SignedOut)
}
