// Service exports
pub mod registry;

pub use registry::{load_classifier, LoadError, ModelRegistry};
