//! Application layer: services and use cases
//!
//! This layer orchestrates the navigation engine over the store boundary
//! trait and owns session lifecycle.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{
    ItemQueryService, LevellingQueryService, MonsterQueryService, Session, SessionId,
    SessionService, WikiController, WikiNode, WikiPayload, WikiSeed, WikiTree,
    DEFAULT_PAGE_SIZE, DEFAULT_RESULT_LIMIT,
};
