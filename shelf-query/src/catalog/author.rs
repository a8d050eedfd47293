use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::fields::{FieldKind, FieldRegistry, Record};

/// A book author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub background: Option<String>,
    /// Number of books credited to the author, when the listing computes it
    #[serde(default)]
    pub total_books: Option<i64>,
}

static AUTHOR_FIELDS: LazyLock<FieldRegistry<Author>> = LazyLock::new(|| {
    FieldRegistry::keyed("Author", "id", FieldKind::Integer, |a: &Author| a.id.into())
        .field("name", FieldKind::Text, |a| a.name.as_str().into())
        .field("background", FieldKind::Text, |a| a.background.as_deref().into())
        .field("totalBooks", FieldKind::Integer, |a| a.total_books.into())
        .stored_as("total_books")
        .dupe_checked("name")
        .dupe_checked("background")
        .build()
});

impl Record for Author {
    fn registry() -> &'static FieldRegistry<Self> {
        &AUTHOR_FIELDS
    }
}
