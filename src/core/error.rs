use thiserror::Error;

/// Crate-wide error type.
///
/// Statement failures are non-fatal: the session prints them and returns to
/// the menu. Input-transport failures terminate the menu loop; the gateway
/// connection is still closed exactly once by `main`.
#[derive(Error, Debug)]
pub enum HotelError {
    #[error("Unable to connect to database: {0}")]
    Connect(String),
    #[error("{0}")]
    Sql(String),
    #[error("Unexpected result shape: {0}")]
    MissingField(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(String),
    #[error("input stream closed")]
    InputClosed,
}

impl HotelError {
    /// True for errors that must terminate the menu loop rather than be
    /// printed and recovered from.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Connect(_) | Self::Io(_) | Self::Readline(_) | Self::InputClosed
        )
    }
}

impl From<postgres::Error> for HotelError {
    fn from(err: postgres::Error) -> Self {
        Self::Sql(err.to_string())
    }
}
