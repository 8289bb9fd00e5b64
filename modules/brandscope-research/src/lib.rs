pub mod collector;
pub mod editor;
pub mod notifier;
pub mod pipeline;
pub mod references;
pub mod searcher;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use pipeline::Pipeline;
pub use state::ResearchState;
