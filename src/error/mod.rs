use crate::api::{ApiError, ApiErrorKind};
use thiserror::Error;

/// Everything a flow can report to the view layer.
///
/// Backend errors are converted into one of these at the flow boundary; the
/// `Display` text is what the user sees.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FlowError {
    #[error("Both title and URL are required.")]
    Validation,

    #[error("You must be logged in.")]
    Unauthenticated,

    #[error("Failed to add bookmark. Please try again.")]
    InsertFailed(String),

    #[error("Failed to delete bookmark. Please try again.")]
    DeleteFailed(String),

    #[error("Failed to load bookmarks. Please refresh.")]
    LoadFailed(String),

    /// Cross-tab transport missing; callers fall back to single-tab mode.
    #[error("cross-tab sync unavailable: {0}")]
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    ChannelUnavailable(String),
}

impl FlowError {
    pub(crate) fn insert(e: ApiError) -> Self {
        match e.kind {
            ApiErrorKind::Unauthorized => Self::Unauthenticated,
            _ => Self::InsertFailed(e.message),
        }
    }

    pub(crate) fn delete(e: ApiError) -> Self {
        match e.kind {
            ApiErrorKind::Unauthorized => Self::Unauthenticated,
            _ => Self::DeleteFailed(e.message),
        }
    }

    pub(crate) fn load(e: ApiError) -> Self {
        Self::LoadFailed(e.message)
    }

    /// Backend detail, when there is one (logged, never shown).
    pub(crate) fn detail(&self) -> Option<&str> {
        match self {
            Self::InsertFailed(d)
            | Self::DeleteFailed(d)
            | Self::LoadFailed(d)
            | Self::ChannelUnavailable(d) => Some(d.as_str()),
            Self::Validation | Self::Unauthenticated => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(kind: ApiErrorKind) -> ApiError {
        ApiError {
            kind,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(FlowError::Validation.to_string(), "Both title and URL are required.");
        assert_eq!(
            FlowError::InsertFailed("500".to_string()).to_string(),
            "Failed to add bookmark. Please try again."
        );
        assert_eq!(
            FlowError::LoadFailed("x".to_string()).to_string(),
            "Failed to load bookmarks. Please refresh."
        );
    }

    #[test]
    fn test_unauthorized_backend_errors_map_to_unauthenticated() {
        assert_eq!(
            FlowError::insert(api_error(ApiErrorKind::Unauthorized)),
            FlowError::Unauthenticated
        );
        assert_eq!(
            FlowError::delete(api_error(ApiErrorKind::Unauthorized)),
            FlowError::Unauthenticated
        );
    }

    #[test]
    fn test_other_backend_errors_keep_detail() {
        let e = FlowError::delete(api_error(ApiErrorKind::Network));
        assert_eq!(e, FlowError::DeleteFailed("boom".to_string()));
        assert_eq!(e.detail(), Some("boom"));
        assert!(FlowError::Validation.detail().is_none());
    }
}
