//! Domain models for the epitriage core.

mod decision;
mod disease;
mod schema;
mod submission;

pub use decision::*;
pub use disease::*;
pub use schema::*;
pub use submission::*;
