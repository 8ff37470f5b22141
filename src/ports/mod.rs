//! Ports (trait boundaries) for external collaborators.
//!
//! The learning core owns these traits; storage and presentation concerns are
//! adapters that implement them.

pub mod observer;
pub mod repository;

pub use observer::{Control, Observer};
pub use repository::ValueTableRepository;
