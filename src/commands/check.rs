//! Validate every post and report all problems at once

use anyhow::Result;

use crate::content::LoadReport;
use crate::Blog;

/// Load all posts and fail if any of them was rejected
pub fn run(blog: &Blog) -> Result<()> {
    let report = blog.load_posts()?;
    print!("{}", render(&report));

    if !report.is_clean() {
        anyhow::bail!("{} problem(s) found", report.errors.len());
    }
    Ok(())
}

/// Human readable report: one line per problem, then a summary
pub fn render(report: &LoadReport) -> String {
    let mut out = String::new();
    for error in &report.errors {
        let kind = if error.is_parse_error() {
            "parse"
        } else if error.is_duplicate_slug() {
            "duplicate"
        } else {
            "invalid"
        };
        out.push_str(&format!("[{}] {}\n", kind, error));
    }
    out.push_str(&report.summary());
    out.push('\n');
    out
}
