pub type LedfxResult<T> = Result<T, LedfxError>;

#[derive(thiserror::Error, Debug)]
pub enum LedfxError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("transport not connected: {0}")]
    NotConnected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LedfxError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn not_connected(msg: impl Into<String>) -> Self {
        Self::NotConnected(msg.into())
    }
}
