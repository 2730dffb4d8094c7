//! Core types for streamparams.

pub mod assistant;
pub mod generation;
pub mod message;
pub mod provider;
pub mod tool;
pub mod value;

pub use assistant::*;
pub use generation::*;
pub use message::*;
pub use provider::*;
pub use tool::*;
pub use value::*;
