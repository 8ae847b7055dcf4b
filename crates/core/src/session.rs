//! Session identity as seen by the rest of the system.
//!
//! The auth provider owns sessions. Everything else receives a [`SessionContext`] explicitly
//! (resolved per request from a bearer token) and only reads it.

use crate::constants::{ANONYMOUS_AUTHOR, FALLBACK_AVATAR_BASE};
use quill_types::{DisplayName, EmailAddress};
use serde::Serialize;

/// Opaque session token handed out on sign-in and sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Wrap a token received from a client. Blank input yields `None`.
    pub fn from_client(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (!raw.is_empty()).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A registered reader's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub email: EmailAddress,
    pub display_name: Option<DisplayName>,
    pub avatar_url: Option<String>,
}

/// Read-only projection of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionIdentity {
    pub authenticated: bool,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
}

impl SessionIdentity {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            display_name: None,
            avatar: None,
            email: None,
        }
    }
}

/// Session scope passed to consumers that need to know who is acting.
#[derive(Debug, Clone)]
pub struct SessionContext {
    token: Option<SessionToken>,
    profile: Option<Profile>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self {
            token: None,
            profile: None,
        }
    }

    pub fn authenticated(token: SessionToken, profile: Profile) -> Self {
        Self {
            token: Some(token),
            profile: Some(profile),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn identity(&self) -> SessionIdentity {
        match &self.profile {
            None => SessionIdentity::anonymous(),
            Some(profile) => SessionIdentity {
                authenticated: true,
                display_name: profile.display_name.as_ref().map(|n| n.to_string()),
                avatar: Some(self.author_avatar()),
                email: Some(profile.email.to_string()),
            },
        }
    }

    /// Name to attribute comments to.
    pub fn author_name(&self) -> String {
        self.profile
            .as_ref()
            .and_then(|p| p.display_name.as_ref())
            .map(|n| n.to_string())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string())
    }

    /// The profile avatar, or a generated one seeded with the display name (or email).
    pub fn author_avatar(&self) -> String {
        let Some(profile) = &self.profile else {
            return fallback_avatar(ANONYMOUS_AUTHOR);
        };
        if let Some(url) = &profile.avatar_url {
            return url.clone();
        }
        match &profile.display_name {
            Some(name) => fallback_avatar(name.as_str()),
            None => fallback_avatar(profile.email.as_str()),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Generated avatar URL for `seed`.
pub fn fallback_avatar(seed: &str) -> String {
    format!("{FALLBACK_AVATAR_BASE}{}", urlencoding::encode(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: Option<&str>, avatar: Option<&str>) -> Profile {
        Profile {
            email: EmailAddress::parse("reader@example.com").unwrap(),
            display_name: name.map(|n| DisplayName::new(n).unwrap()),
            avatar_url: avatar.map(str::to_string),
        }
    }

    #[test]
    fn anonymous_session_projection() {
        let session = SessionContext::anonymous();
        assert!(!session.is_authenticated());
        assert_eq!(session.identity(), SessionIdentity::anonymous());
        assert_eq!(session.author_name(), "Anonymous");
    }

    #[test]
    fn authenticated_session_projection() {
        let session =
            SessionContext::authenticated(SessionToken::generate(), profile(Some("Ada L"), None));
        let identity = session.identity();
        assert!(identity.authenticated);
        assert_eq!(identity.display_name.as_deref(), Some("Ada L"));
        assert_eq!(identity.email.as_deref(), Some("reader@example.com"));
        assert_eq!(
            identity.avatar.as_deref(),
            Some("https://api.dicebear.com/7.x/avataaars/svg?seed=Ada%20L")
        );
    }

    #[test]
    fn avatar_prefers_profile_then_name_then_email() {
        let with_avatar = SessionContext::authenticated(
            SessionToken::generate(),
            profile(Some("Ada"), Some("https://example.com/ada.png")),
        );
        assert_eq!(with_avatar.author_avatar(), "https://example.com/ada.png");

        let no_name = SessionContext::authenticated(SessionToken::generate(), profile(None, None));
        assert_eq!(no_name.author_name(), "Anonymous");
        assert!(no_name.author_avatar().ends_with("seed=reader%40example.com"));
    }

    #[test]
    fn blank_client_token_is_ignored() {
        assert!(SessionToken::from_client("   ").is_none());
        assert_eq!(
            SessionToken::from_client(" abc ").unwrap().as_str(),
            "abc"
        );
    }
}
