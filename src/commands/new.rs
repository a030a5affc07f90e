//! Create a new post

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Create a new post file under the posts directory and return its path
pub fn create_post(
    blog: &Blog,
    title: &str,
    categories: &[String],
    now: DateTime<FixedOffset>,
) -> Result<PathBuf> {
    fs::create_dir_all(&blog.posts_dir)?;

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title `{}` does not produce a usable file name", title);
    }

    let filename = blog
        .config
        .new_post_name
        .replace(":title", &slug)
        .replace(":year", &now.format("%Y").to_string())
        .replace(":month", &now.format("%m").to_string())
        .replace(":day", &now.format("%d").to_string())
        .replace(":i_month", &now.format("%-m").to_string())
        .replace(":i_day", &now.format("%-d").to_string());

    let file_path = blog.posts_dir.join(&filename);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, scaffold(blog, title, categories, &now)?)?;
    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}

/// Front-matter scaffold for a fresh post
fn scaffold(
    blog: &Blog,
    title: &str,
    categories: &[String],
    now: &DateTime<FixedOffset>,
) -> Result<String> {
    // serde_yaml takes care of quoting titles with `:` or `#` in them
    let title = serde_yaml::to_string(title)?;
    // each entry is serialized so `:` or `,` inside a category stays literal
    let categories = if categories.is_empty() {
        String::new()
    } else {
        format!("\n{}", serde_yaml::to_string(categories)?.trim_end())
    };

    Ok(format!(
        "---\nlayout: {}\ntitle: {}date: {}\ncomments: true\ncategories:{}\n---\n\n{}\n",
        blog.config.default_layout,
        title,
        now.format("%Y-%m-%d %H:%M:%S %z"),
        categories,
        blog.config.excerpt_separator,
    ))
}

/// Run the new command with the current time in the site timezone
pub fn run(blog: &Blog, title: &str, categories: &[String]) -> Result<PathBuf> {
    let tz = blog.config.tz()?;
    let now = Utc::now().with_timezone(&tz);
    let now = now.with_timezone(&now.offset().fix());
    create_post(blog, title, categories, now)
}
