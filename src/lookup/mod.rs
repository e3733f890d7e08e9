//! Lookup Module
//!
//! Routes parsed requests to their table and answers them cache-first.

mod dispatcher;
mod table;

pub use dispatcher::Dispatcher;
pub use table::{Table, TableTtls};
