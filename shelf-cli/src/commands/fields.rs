use anyhow::Result;
use colored::Colorize;

use shelf_query::catalog::{Author, Book, Category};
use shelf_query::fields::Record;

use crate::resource::Resource;

pub fn execute(resource: Resource) -> Result<()> {
    println!(
        "{:<16} {:<9} {:<10} {:<16} {:<10} {}",
        "COLUMN".bold(),
        "KIND".bold(),
        "FILTER".bold(),
        "STORAGE".bold(),
        "DUPE CHECK".bold(),
        "IDENTITY".bold()
    );
    for line in describe(resource) {
        println!("{}", line);
    }
    Ok(())
}

fn describe(resource: Resource) -> Vec<String> {
    match resource {
        Resource::Books => describe_record::<Book>(),
        Resource::Authors => describe_record::<Author>(),
        Resource::Categories => describe_record::<Category>(),
    }
}

fn describe_record<T: Record>() -> Vec<String> {
    let registry = T::registry();
    let key = registry.key();
    registry
        .columns()
        .map(|column| {
            let name = if column == key {
                format!("{} (key)", column.name())
            } else {
                column.name().to_string()
            };
            format!(
                "{:<16} {:<9} {:<10} {:<16} {:<10} {}",
                name,
                column.kind().to_string(),
                column.strategy().to_string(),
                column.storage_name(),
                yes_no(column.is_dupe_checked()),
                yes_no(column.is_identity())
            )
        })
        .collect()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_categories() {
        let lines = describe(Resource::Categories);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id (key)"));
        assert!(lines[1].starts_with("label"));
        assert!(lines[1].contains("contains"));
        assert!(lines[1].contains(" yes "));
        assert!(lines[1].ends_with("no"));
        assert!(lines[2].contains("total_books"));
    }

    #[test]
    fn test_describe_books_lists_every_column() {
        assert_eq!(describe(Resource::Books).len(), 12);
    }

    #[test]
    fn test_describe_books_marks_identity() {
        let lines = describe(Resource::Books);
        let identity: Vec<&str> = lines
            .iter()
            .filter(|line| line.ends_with("yes"))
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(
            identity,
            vec!["title", "subtitle", "edition", "isbn13", "authorId", "categoryId"]
        );
    }
}
