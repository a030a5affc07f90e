//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::PostStore;
use crate::helpers::format_date;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, json: bool) -> Result<()> {
    let report = blog.load_posts()?;
    let output = if json {
        render_json(&report.store, content_type)?
    } else {
        render(&report.store, content_type, &blog.config.date_format)?
    };
    print!("{}", output);

    if !report.is_clean() {
        tracing::warn!(
            "{} file(s) were left out, run `postroll check` for details",
            report.errors.len()
        );
    }

    Ok(())
}

/// Plain text listing
pub fn render(store: &PostStore, content_type: &str, date_format: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            writeln!(out, "Posts ({}):", store.len())?;
            for post in store {
                writeln!(
                    out,
                    "  {} - {} [{}]",
                    format_date(&post.date, date_format),
                    post.title,
                    post.slug
                )?;
            }
        }
        "tag" | "tags" => {
            let tags = store.tags();
            writeln!(out, "Tags ({}):", tags.len())?;
            for (tag, count) in tags {
                writeln!(out, "  {} ({})", tag, count)?;
            }
        }
        "category" | "categories" => {
            let categories = store.categories();
            writeln!(out, "Categories ({}):", categories.len())?;
            for (category, count) in categories {
                writeln!(out, "  {} ({})", category, count)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category",
                content_type
            );
        }
    }

    Ok(out)
}

/// JSON listing for scripting
pub fn render_json(store: &PostStore, content_type: &str) -> Result<String> {
    let value = match content_type {
        "post" | "posts" => serde_json::to_value(store.posts())?,
        "tag" | "tags" => serde_json::to_value(store.tags())?,
        "category" | "categories" => serde_json::to_value(store.categories())?,
        _ => anyhow::bail!(
            "Unknown type: {}. Available: post, tag, category",
            content_type
        ),
    };
    Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
}
