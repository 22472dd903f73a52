use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn reservation(size: u64, source: std::io::Error) -> Error {
        Error(ErrorKind::Reservation { size, source }.into())
    }

    pub fn exhausted(requested: u64, remaining: u64) -> Error {
        Error(
            ErrorKind::Exhausted {
                requested,
                remaining,
            }
            .into(),
        )
    }

    /// Returns `true` if this error reports an OS-level reservation failure.
    pub fn is_reservation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Reservation { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("failed to reserve {size} bytes from the OS: {source}")]
    Reservation {
        size: u64,
        source: std::io::Error,
    },

    #[error("region exhausted: requested {requested} bytes, {remaining} remaining")]
    Exhausted { requested: u64, remaining: u64 },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
