//! Filter, sort and paging builders
//!
//! Each builder takes raw caller input, validates it through the record's
//! [`FieldRegistry`](crate::fields::FieldRegistry), and contributes one part of
//! a [`QueryPlan`].

mod direction;
mod filter;
mod plan;
mod sort;
mod window;

pub use direction::SortDirection;
pub use filter::{build_filter, Predicate};
pub use plan::{DupeProbe, QueryPlan, Scope};
pub use sort::{build_sort, SortSpec};
pub use window::{PageMeta, Window};
