//! List site content

use anyhow::Result;
use std::io::{self, Write};

use crate::Quill;

/// What `list` prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ListKind {
    #[value(alias = "posts")]
    Post,
    #[value(alias = "categories")]
    Category,
    #[value(alias = "tags")]
    Tag,
    #[value(alias = "routes")]
    Route,
}

/// List site content by type
pub fn run(quill: &Quill, kind: ListKind) -> Result<()> {
    let stdout = io::stdout();
    write(quill, kind, &mut stdout.lock())
}

fn write(quill: &Quill, kind: ListKind, out: &mut impl Write) -> Result<()> {
    let index = quill.query().index()?;

    match kind {
        ListKind::Post => {
            let posts = index.sorted_by_date_desc();
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                writeln!(out, "  {} - {} [{}]", post.date, post.title, post.id)?;
            }
        }
        ListKind::Category => {
            writeln!(out, "Categories ({}):", index.categories().len())?;
            for (label, ids) in index.categories() {
                writeln!(out, "  {} ({})", label, ids.len())?;
            }
        }
        ListKind::Tag => {
            writeln!(out, "Tags ({}):", index.tags().len())?;
            for (label, ids) in index.tags() {
                writeln!(out, "  {} ({})", label, ids.len())?;
            }
        }
        ListKind::Route => {
            let config = &quill.config;
            let routes: Vec<String> = std::iter::once("/".to_string())
                .chain(index.ids().iter().map(|id| route(&config.post_dir, id)))
                .chain(
                    index
                        .category_labels()
                        .iter()
                        .map(|label| route(&config.category_dir, label)),
                )
                .chain(
                    index
                        .tag_labels()
                        .iter()
                        .map(|label| route(&config.tag_dir, label)),
                )
                .collect();
            writeln!(out, "Routes ({}):", routes.len())?;
            for route in routes {
                writeln!(out, "  {}", route)?;
            }
        }
    }

    Ok(())
}

fn route(dir: &str, id: &str) -> String {
    format!("/{}/{}", dir.trim_matches('/'), id)
}
