use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrandScopeError {
    #[error("Search error: {0}")]
    Search(String),

    #[error("Collection error: {0}")]
    Collection(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
