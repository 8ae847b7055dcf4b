//! Email/password authentication.
//!
//! [`AuthProvider`] is the seam to whatever owns accounts and sessions. Callers validate form
//! input locally with [`SignInForm`] / [`SignUpForm`] first, so malformed input never reaches the
//! provider. [`InMemoryAuthProvider`] keeps accounts for the lifetime of the process.

use crate::constants::SESSION_TTL;
use crate::session::{Profile, SessionContext, SessionToken};
use crate::{QuillError, QuillResult};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use quill_types::{DisplayName, EmailAddress, Password};
use rand::RngCore;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use std::time::Duration;
use tokio::time::Instant;

/// Per-field validation messages for the sign-in / sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = [&self.display_name, &self.email, &self.password]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        f.write_str(&messages.join(". "))
    }
}

/// Validated sign-in input.
#[derive(Debug, Clone)]
pub struct SignInForm {
    pub email: EmailAddress,
    pub password: Password,
}

impl SignInForm {
    /// # Errors
    /// Returns `QuillError::InvalidForm` listing every field that failed.
    pub fn parse(email: &str, password: &str) -> QuillResult<Self> {
        let mut errors = FormErrors::default();
        let email = EmailAddress::parse(email)
            .map_err(|e| errors.email = Some(e.to_string()))
            .ok();
        let password = Password::new(password)
            .map_err(|e| errors.password = Some(e.to_string()))
            .ok();

        match (email, password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(QuillError::InvalidForm(errors)),
        }
    }
}

/// Validated sign-up input.
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub email: EmailAddress,
    pub password: Password,
    pub display_name: DisplayName,
}

impl SignUpForm {
    /// # Errors
    /// Returns `QuillError::InvalidForm` listing every field that failed.
    pub fn parse(email: &str, password: &str, display_name: &str) -> QuillResult<Self> {
        let mut errors = FormErrors::default();
        let email = EmailAddress::parse(email)
            .map_err(|e| errors.email = Some(e.to_string()))
            .ok();
        let password = Password::new(password)
            .map_err(|e| errors.password = Some(e.to_string()))
            .ok();
        let display_name = DisplayName::new(display_name)
            .map_err(|e| errors.display_name = Some(e.to_string()))
            .ok();

        match (email, password, display_name) {
            (Some(email), Some(password), Some(display_name)) => Ok(Self {
                email,
                password,
                display_name,
            }),
            _ => Err(QuillError::InvalidForm(errors)),
        }
    }
}

/// Owner of accounts and sessions.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// # Errors
    /// `QuillError::InvalidCredentials` for an unknown email or wrong password.
    async fn sign_in(&self, form: &SignInForm) -> QuillResult<SessionContext>;

    /// Registers and signs the new reader in.
    ///
    /// # Errors
    /// `QuillError::AlreadyRegistered` if the email is taken.
    async fn sign_up(&self, form: &SignUpForm) -> QuillResult<SessionContext>;

    /// Ends the session. Unknown tokens are ignored.
    async fn sign_out(&self, token: &SessionToken) -> QuillResult<()>;

    /// The session for `token`, or the anonymous session if there is none.
    async fn session(&self, token: &SessionToken) -> QuillResult<SessionContext>;
}

#[derive(Debug, Clone)]
struct Account {
    profile: Profile,
    password_hash: String,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    profile: Profile,
    issued_at: Instant,
}

/// Process-lifetime auth provider with Argon2-hashed passwords.
///
/// Sessions expire `session_ttl` after they are issued.
#[derive(Debug)]
pub struct InMemoryAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<SessionToken, SessionEntry>>,
    session_ttl: Duration,
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        Self::with_session_ttl(SESSION_TTL)
    }
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_ttl(session_ttl: Duration) -> Self {
        Self {
            accounts: RwLock::default(),
            sessions: RwLock::default(),
            session_ttl,
        }
    }

    /// Issue a token for `profile`, dropping any sessions that have already expired.
    fn open_session(&self, profile: Profile) -> QuillResult<SessionContext> {
        let token = SessionToken::generate();
        let mut sessions = self.sessions.write().map_err(|_| QuillError::LockPoisoned)?;

        let before = sessions.len();
        sessions.retain(|_, entry| entry.issued_at.elapsed() < self.session_ttl);
        if sessions.len() < before {
            tracing::debug!(expired = before - sessions.len(), "expired sessions dropped");
        }

        sessions.insert(
            token.clone(),
            SessionEntry {
                profile: profile.clone(),
                issued_at: Instant::now(),
            },
        );
        Ok(SessionContext::authenticated(token, profile))
    }

    #[cfg(test)]
    fn active_sessions(&self) -> QuillResult<usize> {
        Ok(self
            .sessions
            .read()
            .map_err(|_| QuillError::LockPoisoned)?
            .len())
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, form: &SignInForm) -> QuillResult<SessionContext> {
        let account = self
            .accounts
            .read()
            .map_err(|_| QuillError::LockPoisoned)?
            .get(&form.email.normalised())
            .cloned();

        let Some(account) = account else {
            tracing::info!("sign-in rejected: unknown account");
            return Err(QuillError::InvalidCredentials);
        };
        if !verify_password(form.password.clone(), account.password_hash).await? {
            tracing::info!("sign-in rejected: wrong password");
            return Err(QuillError::InvalidCredentials);
        }

        tracing::info!(email = %account.profile.email, "signed in");
        self.open_session(account.profile)
    }

    async fn sign_up(&self, form: &SignUpForm) -> QuillResult<SessionContext> {
        let key = form.email.normalised();
        let password_hash = hash_password(form.password.clone()).await?;
        let profile = Profile {
            email: form.email.clone(),
            display_name: Some(form.display_name.clone()),
            avatar_url: None,
        };

        {
            let mut accounts = self.accounts.write().map_err(|_| QuillError::LockPoisoned)?;
            if accounts.contains_key(&key) {
                tracing::info!("sign-up rejected: email already registered");
                return Err(QuillError::AlreadyRegistered);
            }
            accounts.insert(
                key,
                Account {
                    profile: profile.clone(),
                    password_hash,
                },
            );
        }

        tracing::info!(email = %profile.email, "account created");
        self.open_session(profile)
    }

    async fn sign_out(&self, token: &SessionToken) -> QuillResult<()> {
        let removed = self
            .sessions
            .write()
            .map_err(|_| QuillError::LockPoisoned)?
            .remove(token);
        if removed.is_some() {
            tracing::info!("signed out");
        }
        Ok(())
    }

    async fn session(&self, token: &SessionToken) -> QuillResult<SessionContext> {
        let mut sessions = self.sessions.write().map_err(|_| QuillError::LockPoisoned)?;
        let entry = sessions
            .get(token)
            .map(|entry| (entry.issued_at.elapsed() < self.session_ttl, entry.profile.clone()));

        Ok(match entry {
            Some((true, profile)) => SessionContext::authenticated(token.clone(), profile),
            Some((false, _)) => {
                sessions.remove(token);
                tracing::info!("session expired");
                SessionContext::anonymous()
            }
            None => SessionContext::anonymous(),
        })
    }
}

/// Hash on the blocking pool; Argon2 holds a thread for tens of milliseconds.
async fn hash_password(password: Password) -> QuillResult<String> {
    tokio::task::spawn_blocking(move || hash_password_blocking(&password))
        .await
        .map_err(|e| QuillError::PasswordHash(e.to_string()))?
}

async fn verify_password(password: Password, stored: String) -> QuillResult<bool> {
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &stored))
        .await
        .map_err(|e| QuillError::PasswordHash(e.to_string()))?
}

fn hash_password_blocking(password: &Password) -> QuillResult<String> {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt =
        SaltString::encode_b64(&salt).map_err(|e| QuillError::PasswordHash(e.to_string()))?;
    Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| QuillError::PasswordHash(e.to_string()))
}

fn verify_password_blocking(password: &Password, stored: &str) -> QuillResult<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| QuillError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.expose().as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up_form(email: &str) -> SignUpForm {
        SignUpForm::parse(email, "correct horse", "Ada Lovelace").expect("valid form")
    }

    #[test]
    fn sign_in_form_collects_field_errors() {
        let err = SignInForm::parse("not-an-email", "123").expect_err("invalid form");
        let QuillError::InvalidForm(errors) = err else {
            panic!("expected InvalidForm, got {err:?}");
        };
        assert_eq!(
            errors.email.as_deref(),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            errors.password.as_deref(),
            Some("Password must be at least 6 characters")
        );
        assert!(errors.display_name.is_none());
    }

    #[test]
    fn sign_up_form_checks_display_name() {
        let err = SignUpForm::parse("ada@example.com", "secret1", "A").expect_err("short name");
        let QuillError::InvalidForm(errors) = err else {
            panic!("expected InvalidForm, got {err:?}");
        };
        assert_eq!(
            errors.display_name.as_deref(),
            Some("Display name must be at least 2 characters")
        );
        assert!(errors.email.is_none() && errors.password.is_none());
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let provider = InMemoryAuthProvider::new();
        let session = provider
            .sign_up(&sign_up_form("ada@example.com"))
            .await
            .expect("sign up should succeed");
        assert!(session.is_authenticated());
        assert_eq!(session.author_name(), "Ada Lovelace");

        let form = SignInForm::parse("ADA@example.com", "correct horse").unwrap();
        let again = provider.sign_in(&form).await.expect("sign in should succeed");
        assert!(again.is_authenticated());
        assert_ne!(session.token(), again.token());
        assert_eq!(provider.active_sessions().unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let provider = InMemoryAuthProvider::new();
        provider.sign_up(&sign_up_form("ada@example.com")).await.unwrap();
        let err = provider
            .sign_up(&sign_up_form("Ada@Example.com"))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, QuillError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_account_look_the_same() {
        let provider = InMemoryAuthProvider::new();
        provider.sign_up(&sign_up_form("ada@example.com")).await.unwrap();

        let wrong = SignInForm::parse("ada@example.com", "wrong password").unwrap();
        let unknown = SignInForm::parse("bob@example.com", "correct horse").unwrap();
        for form in [wrong, unknown] {
            let err = provider.sign_in(&form).await.expect_err("rejected");
            assert!(matches!(err, QuillError::InvalidCredentials));
            assert_eq!(err.to_string(), "Invalid email or password. Please try again.");
        }
    }

    #[tokio::test]
    async fn sign_out_clears_the_session() {
        let provider = InMemoryAuthProvider::new();
        let session = provider.sign_up(&sign_up_form("ada@example.com")).await.unwrap();
        let token = session.token().cloned().expect("token issued");

        assert!(provider.session(&token).await.unwrap().is_authenticated());
        provider.sign_out(&token).await.unwrap();
        assert!(!provider.session(&token).await.unwrap().is_authenticated());

        // Signing out twice is harmless.
        provider.sign_out(&token).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_expire_after_their_lifetime() {
        let provider = InMemoryAuthProvider::with_session_ttl(Duration::from_secs(60));
        let session = provider.sign_up(&sign_up_form("ada@example.com")).await.unwrap();
        let token = session.token().cloned().expect("token issued");

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(provider.session(&token).await.unwrap().is_authenticated());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!provider.session(&token).await.unwrap().is_authenticated());
        assert_eq!(provider.active_sessions().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_sessions_are_dropped_on_next_sign_in() {
        let provider = InMemoryAuthProvider::with_session_ttl(Duration::from_secs(60));
        provider.sign_up(&sign_up_form("ada@example.com")).await.unwrap();
        provider.sign_up(&sign_up_form("bob@example.com")).await.unwrap();
        assert_eq!(provider.active_sessions().unwrap(), 2);

        tokio::time::advance(Duration::from_secs(61)).await;
        let form = SignInForm::parse("ada@example.com", "correct horse").unwrap();
        provider.sign_in(&form).await.unwrap();
        assert_eq!(provider.active_sessions().unwrap(), 1);
    }

    #[test]
    fn argon2_hash_verifies_only_the_original_password() {
        let password = Password::new("correct horse").unwrap();
        let hash = hash_password_blocking(&password).unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password_blocking(&password, &hash).unwrap());
        let other = Password::new("battery staple").unwrap();
        assert!(!verify_password_blocking(&other, &hash).unwrap());
    }
}
