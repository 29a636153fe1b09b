use snafu::prelude::*;

use crate::router::RouterError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to lock mutex: poisoned"))]
    LockPoisoned,

    #[snafu(display("Terminal error: {source}"))]
    TerminalError { source: std::io::Error },

    #[snafu(display("Router configuration error: {source}"))]
    RouterConfig { source: RouterError },
}

impl From<RouterError> for Error {
    fn from(source: RouterError) -> Self {
        Error::RouterConfig { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
