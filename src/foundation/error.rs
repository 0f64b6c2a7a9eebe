pub type AspectFitResult<T> = Result<T, AspectFitError>;

#[derive(thiserror::Error, Debug)]
pub enum AspectFitError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AspectFitError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
