use thiserror::Error;

/// Errors raised while building a locale profile.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("unknown locale tag: {0}")]
    UnknownTag(String),

    #[error("decimal and group separator must differ (both {0:?})")]
    SeparatorClash(char),

    #[error("invalid separator {0:?}: digits, signs and quotes are not allowed")]
    InvalidSeparator(char),
}

pub type Result<T> = std::result::Result<T, LocaleError>;
