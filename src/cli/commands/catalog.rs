//! ffcs catalog - Summarize or list the loaded catalog

use clap::Args;
use itertools::Itertools;
use serde::Serialize;

use crate::app::AppContext;
use crate::catalog::{Catalog, Item};
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;
use crate::utils::truncate_string;

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// List items in catalog order
    #[arg(long)]
    pub list: bool,

    /// Maximum number of items to list
    #[arg(long, default_value = "50")]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub source: Option<String>,
    pub fingerprint: String,
    pub items: usize,
    pub embedding_backend: String,
    pub embedding_dims: usize,
    pub attributes: Vec<String>,
    pub departments: Vec<String>,
    pub tags: Vec<TagCount>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub items: usize,
}

#[derive(Serialize)]
struct CatalogListing<'a> {
    summary: CatalogSummary,
    items: Vec<ListedItem<'a>>,
}

#[derive(Serialize)]
struct ListedItem<'a> {
    index: usize,
    #[serde(flatten)]
    item: &'a Item,
}

pub fn run(ctx: &AppContext, args: &CatalogArgs) -> Result<()> {
    let engine = ctx.engine()?;
    let catalog = engine.catalog();
    let summary = summarize(catalog, engine.embedder().name(), engine.embeddings().dims());

    if ctx.robot() {
        if args.list {
            let items = catalog
                .iter()
                .take(args.limit)
                .map(|(index, item)| ListedItem { index, item })
                .collect();
            return emit_robot(&robot_ok(CatalogListing { summary, items }));
        }
        return emit_robot(&robot_ok(summary));
    }

    let mut layout = HumanLayout::new();
    layout.title("Catalog");
    layout
        .kv("Source", summary.source.as_deref().unwrap_or("<memory>"))
        .kv("Fingerprint", &truncate_string(&summary.fingerprint, 16))
        .kv("Items", &summary.items.to_string())
        .kv(
            "Embeddings",
            &format!("{} ({} dims)", summary.embedding_backend, summary.embedding_dims),
        )
        .kv("Attributes", &summary.attributes.join(", "));
    layout.blank().section("Departments");
    for department in &summary.departments {
        layout.bullet(department);
    }
    layout.blank().section("Tags");
    for tag in &summary.tags {
        layout.bullet(&format!("{} ({})", tag.tag, tag.items));
    }

    if args.list {
        layout.blank().section("Items");
        for (index, item) in catalog.iter().take(args.limit) {
            layout.push_line(format!(
                "{index:>4}  {}  {}  {:.1}  [{}]",
                item.name,
                item.department,
                item.quality_score,
                item.tags_display()
            ));
        }
    }

    emit_human(layout);
    Ok(())
}

/// Catalog overview; tags are ordered by frequency, then alphabetically.
#[must_use]
pub fn summarize(catalog: &Catalog, backend: &str, dims: usize) -> CatalogSummary {
    let tags = catalog
        .iter()
        .flat_map(|(_, item)| item.tags.iter().map(|tag| crate::utils::fold(tag)).unique())
        .counts()
        .into_iter()
        .map(|(tag, items)| TagCount { tag, items })
        .sorted_by(|a, b| b.items.cmp(&a.items).then_with(|| a.tag.cmp(&b.tag)))
        .collect();

    CatalogSummary {
        source: catalog.source().map(|path| path.display().to_string()),
        fingerprint: catalog.fingerprint().to_string(),
        items: catalog.len(),
        embedding_backend: backend.to_string(),
        embedding_dims: dims,
        attributes: catalog.attribute_names().to_vec(),
        departments: catalog.departments(),
        tags,
    }
}
