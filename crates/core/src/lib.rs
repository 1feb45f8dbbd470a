//! Support card evaluation engine. Keep this crate free of IO and platform concerns.

pub mod card;
pub mod condition;
pub mod config;
pub mod effects;
pub mod error;
pub mod evaluate;
pub mod events;
pub mod hints;
pub mod levels;

pub use card::*;
pub use condition::*;
pub use config::*;
pub use effects::*;
pub use error::*;
pub use evaluate::*;
pub use events::*;
pub use hints::*;
pub use levels::*;
