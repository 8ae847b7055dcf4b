use crate::auth::FormErrors;

/// Errors raised by Quill core services.
///
/// The messages of the user-facing variants are shown to readers verbatim by the API layer.
#[derive(Debug, thiserror::Error)]
pub enum QuillError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    InvalidForm(FormErrors),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),
    #[error("Please write a comment")]
    EmptyComment,
    #[error("Comment must be at most {max} characters")]
    CommentTooLong { max: usize },
    #[error("Please sign in to comment")]
    Unauthenticated,

    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,
    #[error("This email is already registered. Try logging in instead.")]
    AlreadyRegistered,
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("failed to read content file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("invalid content fixture: {0}")]
    InvalidFixture(String),

    #[error("failed to hash password: {0}")]
    PasswordHash(String),
    #[error("shared state lock poisoned")]
    LockPoisoned,
}

pub type QuillResult<T> = std::result::Result<T, QuillError>;
