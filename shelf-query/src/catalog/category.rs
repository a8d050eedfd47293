use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::fields::{FieldKind, FieldRegistry, Record};

/// A book category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub label: String,
    #[serde(default)]
    pub total_books: Option<i64>,
}

static CATEGORY_FIELDS: LazyLock<FieldRegistry<Category>> = LazyLock::new(|| {
    FieldRegistry::keyed("Category", "id", FieldKind::Integer, |c: &Category| c.id.into())
        .field("label", FieldKind::Text, |c| c.label.as_str().into())
        .field("totalBooks", FieldKind::Integer, |c| c.total_books.into())
        .stored_as("total_books")
        .dupe_checked("label")
        .build()
});

impl Record for Category {
    fn registry() -> &'static FieldRegistry<Self> {
        &CATEGORY_FIELDS
    }
}
