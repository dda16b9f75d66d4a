//! Database module for optional PostgreSQL persistence of warnings.

mod pool;
mod schema;

pub use pool::DatabasePool;
pub use schema::*;
