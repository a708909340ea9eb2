//! Domain layer: the navigation engine and wiki record types
//!
//! This layer is independent of external concerns (no I/O, no CLI, no
//! config loading). Store reads only enter through the [`ChildSource`]
//! seam.

pub mod controller;
pub mod display;
pub mod entities;
pub mod error;
pub mod tree;

pub use controller::Controller;
pub use display::{
    pager_actions, Action, ActionRenderer, Content, ContentRenderer, DisplayStrategy, SelectMenu,
    SelectOption,
};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use tree::{ChildSource, EnterHook, Node, NodeId, NodeKind, NodeSeed, PageTree, Selector};
