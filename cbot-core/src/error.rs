use thiserror::Error;

#[derive(Error, Debug)]
pub enum CbotError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Sender error: {0}")]
    Sender(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CbotError>;

/// Failure raised by a command handler. The two arms drive the executor's
/// "visible vs. silent" branching: `UserFacing` text is sent back verbatim
/// as a reply to the triggering message, `Internal` is logged and counted
/// but never shown to the user.
#[derive(Error, Debug)]
pub enum HandlerFailure {
    #[error("{0}")]
    UserFacing(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl HandlerFailure {
    /// Expected business-rule failure whose message is shown to the user.
    pub fn user(message: impl Into<String>) -> Self {
        HandlerFailure::UserFacing(message.into())
    }
}
