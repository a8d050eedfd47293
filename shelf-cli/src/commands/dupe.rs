use anyhow::Result;
use clap::Args;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

use shelf_query::catalog::{Author, Book, Category};
use shelf_query::fields::{FieldValue, Record};
use shelf_query::result::Pager;
use shelf_query::source::InMemorySource;

use crate::dataset;
use crate::resource::Resource;

#[derive(Debug, Args)]
pub struct DupeArgs {
    /// Record type
    #[arg(value_enum)]
    pub resource: Resource,

    /// JSON dataset file
    #[arg(long, value_name = "FILE")]
    pub data: PathBuf,

    /// Key of the record being edited, which is never its own duplicate
    #[arg(long)]
    pub id: Option<i64>,

    /// Field to check (must be on the resource's duplicate-check list)
    #[arg(long)]
    pub field: String,

    /// Value to look for, matched exactly
    #[arg(long)]
    pub value: String,
}

pub async fn execute(args: DupeArgs) -> Result<()> {
    let duplicate = check(&args).await?;
    println!("{}", duplicate);
    Ok(())
}

async fn check(args: &DupeArgs) -> Result<bool> {
    match args.resource {
        Resource::Books => check_file::<Book>(args).await,
        Resource::Authors => check_file::<Author>(args).await,
        Resource::Categories => check_file::<Category>(args).await,
    }
}

async fn check_file<T>(args: &DupeArgs) -> Result<bool>
where
    T: Record + Clone + DeserializeOwned,
{
    let source = InMemorySource::new(dataset::load::<T>(&args.data)?);
    let duplicate = Pager::default()
        .is_dupe_field::<T, _>(
            &source,
            args.id.map(FieldValue::from),
            &args.field,
            &args.value,
        )
        .await?;
    Ok(duplicate)
}
