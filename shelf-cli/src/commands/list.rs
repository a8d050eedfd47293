use anyhow::{bail, Result};
use clap::Args;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

use shelf_query::catalog::{Author, Book, Category};
use shelf_query::config::Config;
use shelf_query::fields::Record;
use shelf_query::result::{ListRequest, Pager};
use shelf_query::source::InMemorySource;

use crate::dataset;
use crate::resource::Resource;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Record type
    #[arg(value_enum)]
    pub resource: Resource,

    /// JSON dataset file
    #[arg(long, value_name = "FILE")]
    pub data: PathBuf,

    /// Zero-based page index
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub page_index: i64,

    /// Records per page (defaults to paging.default_page_size)
    #[arg(long, allow_negative_numbers = true)]
    pub page_size: Option<i64>,

    /// Column to sort on (defaults to the record key)
    #[arg(long)]
    pub sort_column: Option<String>,

    /// "desc" for descending; anything else is ascending
    #[arg(long)]
    pub sort_order: Option<String>,

    /// Column to filter on
    #[arg(long)]
    pub filter_column: Option<String>,

    /// Text to match in the filter column
    #[arg(long)]
    pub filter_query: Option<String>,

    /// Only books by this author
    #[arg(long, conflicts_with = "category_id")]
    pub author_id: Option<i64>,

    /// Only books in this category
    #[arg(long)]
    pub category_id: Option<i64>,
}

impl ListArgs {
    fn request(&self) -> ListRequest {
        ListRequest {
            page_index: self.page_index,
            page_size: self.page_size,
            sort_column: self.sort_column.clone(),
            sort_order: self.sort_order.clone(),
            filter_column: self.filter_column.clone(),
            filter_query: self.filter_query.clone(),
        }
    }

    /// Parent column and key the listing is nested under
    fn scope(&self) -> Option<(&'static str, i64)> {
        match (self.author_id, self.category_id) {
            (Some(id), _) => Some(("authorId", id)),
            (None, Some(id)) => Some(("categoryId", id)),
            (None, None) => None,
        }
    }
}

pub async fn execute(args: ListArgs, config: &Config) -> Result<()> {
    let output = render(&args, config).await?;
    println!("{}", output);
    Ok(())
}

/// Run the list request and render the page as pretty JSON
async fn render(args: &ListArgs, config: &Config) -> Result<String> {
    let pager = Pager::new(config.paging);
    let request = args.request();

    let scope = args.scope();
    if scope.is_some() && args.resource != Resource::Books {
        bail!("--author-id and --category-id only apply to books");
    }

    match args.resource {
        Resource::Books => page_from_file::<Book>(&pager, &args.data, &request, scope).await,
        Resource::Authors => page_from_file::<Author>(&pager, &args.data, &request, None).await,
        Resource::Categories => {
            page_from_file::<Category>(&pager, &args.data, &request, None).await
        }
    }
}

async fn page_from_file<T>(
    pager: &Pager,
    path: &Path,
    request: &ListRequest,
    scope: Option<(&str, i64)>,
) -> Result<String>
where
    T: Record + Clone + Serialize + DeserializeOwned,
{
    let source = InMemorySource::new(dataset::load::<T>(path)?);
    let page = match scope {
        Some((column, id)) => pager.page_scoped(&source, request, column, id).await?,
        None => pager.page(&source, request).await?,
    };
    Ok(serde_json::to_string_pretty(&page)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn books_file() -> tempfile::NamedTempFile {
        let books: Vec<serde_json::Value> = (1..=25)
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "title": format!("Book {id}"),
                    "description": "",
                    "edition": 1,
                    "isbn13": format!("978{id:010}"),
                    "imageUrl": "",
                    "price": 5.0 + id as f64,
                    "authorId": id % 3,
                    "categoryId": id % 2,
                    "authorName": if id % 3 == 0 { "J.R.R. Tolkien" } else { "Ursula K. Le Guin" },
                })
            })
            .collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&books).unwrap().as_bytes())
            .unwrap();
        file
    }

    fn args(resource: Resource, data: &Path) -> ListArgs {
        ListArgs {
            resource,
            data: data.to_path_buf(),
            page_index: 0,
            page_size: None,
            sort_column: None,
            sort_order: None,
            filter_column: None,
            filter_query: None,
            author_id: None,
            category_id: None,
        }
    }

    async fn render_json(args: &ListArgs) -> serde_json::Value {
        let output = render(args, &Config::default()).await.unwrap();
        serde_json::from_str(&output).unwrap()
    }

    #[tokio::test]
    async fn test_last_page() {
        let file = books_file();
        let mut args = args(Resource::Books, file.path());
        args.page_index = 2;
        let page = render_json(&args).await;
        assert_eq!(page["data"].as_array().unwrap().len(), 5);
        assert_eq!(page["totalPages"], 3);
        assert_eq!(page["hasNextPage"], false);
        assert_eq!(page["hasPreviousPage"], true);
    }

    #[tokio::test]
    async fn test_filter_and_sort() {
        let file = books_file();
        let mut args = args(Resource::Books, file.path());
        args.filter_column = Some("authorName".to_string());
        args.filter_query = Some("tolkien".to_string());
        args.sort_column = Some("price".to_string());
        args.sort_order = Some("desc".to_string());
        let page = render_json(&args).await;
        assert_eq!(page["totalCount"], 8);
        assert_eq!(page["data"][0]["id"], 24);
    }

    #[tokio::test]
    async fn test_scoped_by_author() {
        let file = books_file();
        let mut args = args(Resource::Books, file.path());
        args.author_id = Some(0);
        args.page_size = Some(100);
        let page = render_json(&args).await;
        assert_eq!(page["totalCount"], 8);
        assert!(page["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|b| b["authorId"] == 0));
    }

    #[tokio::test]
    async fn test_scope_and_filter_together() {
        let file = books_file();
        let mut args = args(Resource::Books, file.path());
        args.author_id = Some(0);
        args.filter_column = Some("title".to_string());
        args.filter_query = Some("2".to_string());
        args.page_size = Some(2);
        let page = render_json(&args).await;
        // ids divisible by 3 whose title contains "2": 12, 21, 24
        assert_eq!(page["totalCount"], 3);
        assert_eq!(page["totalPages"], 2);
        assert_eq!(page["data"][0]["id"], 12);
        assert_eq!(page["data"][1]["id"], 21);
    }

    #[tokio::test]
    async fn test_scoped_by_category() {
        let file = books_file();
        let mut args = args(Resource::Books, file.path());
        args.category_id = Some(1);
        let page = render_json(&args).await;
        // odd ids 1..=25
        assert_eq!(page["totalCount"], 13);
    }

    #[tokio::test]
    async fn test_scope_rejected_for_authors() {
        let file = books_file();
        let mut args = args(Resource::Authors, file.path());
        args.category_id = Some(1);
        let err = render(&args, &Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("only apply to books"));
    }

    #[tokio::test]
    async fn test_unknown_column_surfaces_engine_error() {
        let file = books_file();
        let mut args = args(Resource::Books, file.path());
        args.sort_column = Some("doesNotExist".to_string());
        let err = render(&args, &Config::default()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<shelf_query::Error>(),
            Some(shelf_query::Error::InvalidColumn { .. })
        ));
    }
}
