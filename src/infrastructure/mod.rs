//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements the store boundary trait and wires up services.

pub mod di;
pub mod error;
pub mod store;
pub mod traits;

pub use di::ServiceContainer;
pub use error::{InfraError, InfraResult};
pub use store::{JsonWikiStore, WikiDataset};
pub use traits::{Picker, SelectionItem, SkimPicker, WikiStore};
