//! Markdown preview rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::Post;
use crate::config::HighlightConfig;

/// Renders post markdown to HTML
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    pub fn new(highlight: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: highlight.theme.clone(),
            line_numbers: highlight.line_number,
        }
    }

    /// Render the excerpt or the full post; the marker line never reaches the output
    pub fn render_post(&self, post: &Post, excerpt_only: bool) -> Result<String> {
        match (&post.more, excerpt_only) {
            (Some(more), false) => self.render(&format!("{}\n{}", post.excerpt, more)),
            _ => self.render(&post.excerpt),
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // front-matter has already been stripped, so no metadata block option
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION;

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code = String::new();

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    let highlighted = self.highlight_code(&code, code_lang.take().as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Text(text) if in_code_block => code.push_str(&text),
                event => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(html) if self.line_numbers => add_line_numbers(&html, lang),
            Some(html) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang, html
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            ),
        }
    }
}

/// Wrap highlighted code in a gutter table
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        lang,
        gutter,
        lines.join("\n")
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{PostParser, RawPost};

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new(&HighlightConfig::default())
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = renderer().render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let html = renderer()
            .render("```ruby\nputs one.plus(two)\n```")
            .unwrap();
        assert!(html.contains("highlight ruby"));
        assert!(html.contains("line-number"));
    }

    #[test]
    fn test_render_code_block_without_line_numbers() {
        let highlight = HighlightConfig {
            line_number: false,
            ..Default::default()
        };
        let html = MarkdownRenderer::new(&highlight)
            .render("```\nplain\n```")
            .unwrap();
        assert!(html.contains(r#"<code class="language-text">"#));
    }

    #[test]
    fn test_render_post_excerpt_and_full() {
        let parser = PostParser::new(&SiteConfig::default()).unwrap();
        let post = parser
            .parse(&RawPost::new(
                "p.md",
                "---\ntitle: T\ndate: 2020-01-01\n---\nTeaser text\n<!-- more -->\nHidden text\n",
            ))
            .unwrap();

        let excerpt = renderer().render_post(&post, true).unwrap();
        assert!(excerpt.contains("Teaser text"));
        assert!(!excerpt.contains("Hidden text"));

        let full = renderer().render_post(&post, false).unwrap();
        assert!(full.contains("Teaser text"));
        assert!(full.contains("Hidden text"));
        assert!(!full.contains("more"));
    }
}
