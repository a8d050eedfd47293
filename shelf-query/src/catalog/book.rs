use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::fields::{FieldKind, FieldRegistry, Record};

/// A book listing
///
/// `author_name` and `category_label` are denormalised from the related
/// author and category when the listing is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub description: String,
    pub edition: i32,
    pub isbn13: String,
    pub image_url: String,
    pub price: f64,
    pub author_id: i64,
    #[serde(default)]
    pub author_name: Option<String>,
    pub category_id: i64,
    #[serde(default)]
    pub category_label: Option<String>,
}

static BOOK_FIELDS: LazyLock<FieldRegistry<Book>> = LazyLock::new(|| {
    FieldRegistry::keyed("Book", "id", FieldKind::Integer, |b: &Book| b.id.into())
        .field("title", FieldKind::Text, |b| b.title.as_str().into())
        .field("subtitle", FieldKind::Text, |b| b.subtitle.as_deref().into())
        .field("description", FieldKind::Text, |b| b.description.as_str().into())
        .field("edition", FieldKind::Integer, |b| b.edition.into())
        .field("isbn13", FieldKind::Text, |b| b.isbn13.as_str().into())
        .field("imageUrl", FieldKind::Text, |b| b.image_url.as_str().into())
        .stored_as("image_url")
        .field("price", FieldKind::Float, |b| b.price.into())
        .field("authorId", FieldKind::Integer, |b| b.author_id.into())
        .stored_as("author_id")
        .field("authorName", FieldKind::Text, |b| b.author_name.as_deref().into())
        .stored_as("author_name")
        .field("categoryId", FieldKind::Integer, |b| b.category_id.into())
        .stored_as("category_id")
        .field("categoryLabel", FieldKind::Text, |b| b.category_label.as_deref().into())
        .stored_as("category_label")
        .dupe_checked("title")
        .dupe_checked("isbn13")
        .identity("title")
        .identity("subtitle")
        .identity("edition")
        .identity("isbn13")
        .identity("authorId")
        .identity("categoryId")
        .build()
});

impl Record for Book {
    fn registry() -> &'static FieldRegistry<Self> {
        &BOOK_FIELDS
    }
}

#[cfg(test)]
impl Book {
    pub(crate) fn sample(id: i64) -> Self {
        Self {
            id,
            title: format!("Book {id}"),
            subtitle: None,
            description: format!("Description of book {id}"),
            edition: 1,
            isbn13: format!("978{id:010}"),
            image_url: format!("/img/books/{id}.jpg"),
            price: 10.0 + id as f64,
            author_id: 1,
            author_name: Some("J.R.R. Tolkien".to_string()),
            category_id: 1,
            category_label: Some("Fantasy".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldValue, MatchStrategy};

    #[test]
    fn test_camel_case_wire_names() {
        let json = serde_json::to_value(Book::sample(7)).unwrap();
        assert_eq!(json["imageUrl"], "/img/books/7.jpg");
        assert_eq!(json["authorName"], "J.R.R. Tolkien");
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn test_storage_names_are_snake_case() {
        let registry = Book::registry();
        for (wire, storage) in [
            ("imageUrl", "image_url"),
            ("authorId", "author_id"),
            ("categoryLabel", "category_label"),
            ("isbn13", "isbn13"),
        ] {
            assert_eq!(registry.validate(wire).unwrap().storage_name(), storage);
        }
    }

    #[test]
    fn test_price_is_scalar_equals() {
        let column = Book::registry().validate("PRICE").unwrap();
        assert_eq!(column.kind(), FieldKind::Float);
        assert_eq!(column.strategy(), MatchStrategy::Equals);
        assert_eq!(column.read(&Book::sample(2)), FieldValue::Float(12.0));
    }

    #[test]
    fn test_dupe_whitelist() {
        let registry = Book::registry();
        assert!(registry.validate_dupe_field("title").is_ok());
        assert!(registry.validate_dupe_field("ISBN13").is_ok());
        assert!(registry.validate_dupe_field("price").is_err());
        assert!(registry.validate_dupe_field("subtitle").is_err());
    }

    #[test]
    fn test_identity_fields() {
        let names: Vec<&str> = Book::registry().identity_columns().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["title", "subtitle", "edition", "isbn13", "authorId", "categoryId"]
        );
    }
}
