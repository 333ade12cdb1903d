// Adapters layer: concrete implementations of the domain ports.

pub mod form;

pub use form::{MemoryDocument, MemoryForm};
