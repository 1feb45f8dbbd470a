//! Catalog rows and event pages in, card snapshots out.

pub mod catalog;
pub mod events;
pub mod load;
pub mod schema;

pub use catalog::*;
pub use events::*;
pub use load::*;
pub use schema::*;
