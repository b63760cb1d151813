//! Persistence layer: repository ports plus their implementations

pub mod memory;
pub mod ports;
#[cfg(feature = "database")]
pub mod postgres;

pub use memory::MemoryStore;
