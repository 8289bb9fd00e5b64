pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::Config;
pub use error::BrandScopeError;
pub use events::ProgressEvent;
pub use types::*;
