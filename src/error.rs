use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no movie atom before end of stream")]
    MovieNotFound,

    #[error("compressed movie atom, unsupported")]
    CompressedMovie,

    #[error("expected movie-header atom, found `{0}`")]
    ExpectedMovieHeader(String),

    #[error("malformed atom: {0}")]
    MalformedAtom(String),

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
}
