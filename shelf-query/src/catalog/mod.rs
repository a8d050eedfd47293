//! Catalog record types
//!
//! The books, authors and categories served by the catalog, each with its
//! field registry and duplicate-check whitelist. Wire names are camelCase,
//! storage columns snake_case.

mod author;
mod book;
mod category;

pub use author::Author;
pub use book::Book;
pub use category::Category;
