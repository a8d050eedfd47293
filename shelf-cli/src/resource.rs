use clap::ValueEnum;
use std::fmt;

/// Catalog record types the CLI can page over
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Books,
    Authors,
    Categories,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Books => write!(f, "books"),
            Self::Authors => write!(f, "authors"),
            Self::Categories => write!(f, "categories"),
        }
    }
}
