//! Data module - source loading and the merge pipeline

mod columns;
mod loader;
mod merged;
mod processor;

pub use loader::DataLoader;
pub use merged::{MergedTable, SuburbCrime};
pub use processor::ProcessorError;
