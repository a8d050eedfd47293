pub mod dupe;
pub mod fields;
pub mod list;
