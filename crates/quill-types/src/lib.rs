//! Validated text types shared across Quill crates.
//!
//! Each type checks its invariant once, at construction, so that the rest of the code can pass
//! values around without re-validating them. The error messages are written to be shown to a
//! reader as-is.

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input is not a plausible email address
    #[error("Please enter a valid email address")]
    InvalidEmail,
    /// The password is shorter than [`Password::MIN_LEN`]
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    /// The display name is shorter than [`DisplayName::MIN_LEN`]
    #[error("Display name must be at least {min} characters")]
    DisplayNameTooShort { min: usize },
    /// The display name is longer than [`DisplayName::MAX_LEN`]
    #[error("Display name must be less than {max} characters")]
    DisplayNameTooLong { max: usize },
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// An email address that passed a shape check.
///
/// The check is deliberately loose: one `@`, a non-empty local part, and a dotted domain with no
/// empty labels. Whitespace anywhere is rejected. Surrounding whitespace is trimmed first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub const MAX_LEN: usize = 255;

    /// Parses and validates an email address.
    ///
    /// # Errors
    ///
    /// Returns `TextError::InvalidEmail` if the input does not look like an address.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() || trimmed.len() > Self::MAX_LEN {
            return Err(TextError::InvalidEmail);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TextError::InvalidEmail);
        }

        let (local, domain) = trimmed.split_once('@').ok_or(TextError::InvalidEmail)?;
        if local.is_empty() || domain.contains('@') {
            return Err(TextError::InvalidEmail);
        }

        let mut labels = domain.split('.');
        let has_dot = domain.contains('.');
        if !has_dot || labels.any(str::is_empty) {
            return Err(TextError::InvalidEmail);
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used as a lookup key for accounts.
    pub fn normalised(&self) -> String {
        self.0.to_lowercase()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A reader's public display name, 2 to 50 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub const MIN_LEN: usize = 2;
    pub const MAX_LEN: usize = 50;

    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        let len = trimmed.chars().count();
        if len < Self::MIN_LEN {
            return Err(TextError::DisplayNameTooShort { min: Self::MIN_LEN });
        }
        if len > Self::MAX_LEN {
            return Err(TextError::DisplayNameTooLong { max: Self::MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A plaintext password awaiting hashing or verification.
///
/// Not trimmed: leading and trailing spaces are part of the secret. `Debug` never prints the
/// value.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub const MIN_LEN: usize = 6;

    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        if input.chars().count() < Self::MIN_LEN {
            return Err(TextError::PasswordTooShort { min: Self::MIN_LEN });
        }
        Ok(Self(input))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        assert_eq!(NonEmptyText::new("  hello ").unwrap().as_str(), "hello");
        assert_eq!(NonEmptyText::new(" \n\t "), Err(TextError::Empty));
    }

    #[test]
    fn email_accepts_plain_address() {
        let email = EmailAddress::parse(" Reader@Example.com ").unwrap();
        assert_eq!(email.as_str(), "Reader@Example.com");
        assert_eq!(email.normalised(), "reader@example.com");
    }

    #[test]
    fn email_rejects_malformed_input() {
        for bad in [
            "",
            "   ",
            "no-at-sign",
            "@example.com",
            "reader@",
            "reader@localhost",
            "reader@example..com",
            "re ader@example.com",
            "a@b@example.com",
        ] {
            assert_eq!(
                EmailAddress::parse(bad),
                Err(TextError::InvalidEmail),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn display_name_bounds() {
        assert_eq!(
            DisplayName::new(" a "),
            Err(TextError::DisplayNameTooShort { min: 2 })
        );
        assert_eq!(DisplayName::new(" Al ").unwrap().as_str(), "Al");
        assert!(DisplayName::new("x".repeat(50)).is_ok());
        assert_eq!(
            DisplayName::new("x".repeat(51)),
            Err(TextError::DisplayNameTooLong { max: 50 })
        );
    }

    #[test]
    fn password_bounds_and_redaction() {
        assert_eq!(
            Password::new("12345").unwrap_err(),
            TextError::PasswordTooShort { min: 6 }
        );
        assert!(Password::new("x".repeat(500)).is_ok());
        let password = Password::new("hunter22").unwrap();
        assert_eq!(password.expose(), "hunter22");
        assert!(!format!("{password:?}").contains("hunter22"));
    }
}
