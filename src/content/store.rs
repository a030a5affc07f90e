//! Ordered, immutable collection of posts

use std::collections::HashMap;

use super::Post;
use crate::error::{LoadError, PostError};

/// Posts sorted newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    /// Build a store from parsed posts.
    ///
    /// Every post whose slug is shared with another post is left out and
    /// reported; no single claimant is preferred. The rest are ordered by
    /// date descending, then title, then slug.
    pub fn build(posts: Vec<Post>) -> (Self, Vec<LoadError>) {
        let mut indices_by_slug: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, post) in posts.iter().enumerate() {
            indices_by_slug.entry(post.slug.as_str()).or_default().push(i);
        }

        let mut errors = Vec::new();
        let mut duplicated = vec![false; posts.len()];
        for (i, post) in posts.iter().enumerate() {
            let indices = &indices_by_slug[post.slug.as_str()];
            if indices.len() > 1 {
                duplicated[i] = true;
                let others = indices
                    .iter()
                    .filter(|&&j| j != i)
                    .map(|&j| posts[j].source.clone())
                    .collect();
                errors.push(LoadError::new(
                    post.source.clone(),
                    PostError::DuplicateSlug {
                        slug: post.slug.clone(),
                        others,
                    },
                ));
            }
        }

        let mut posts: Vec<Post> = posts
            .into_iter()
            .zip(duplicated)
            .filter(|(_, dup)| !dup)
            .map(|(post, _)| post)
            .collect();

        posts.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.slug.cmp(&b.slug))
        });

        (Self { posts }, errors)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Look up a post by slug
    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// The newer neighbour of `post`
    pub fn prev(&self, post: &Post) -> Option<&Post> {
        let pos = self.position(post)?;
        if pos > 0 {
            self.posts.get(pos - 1)
        } else {
            None
        }
    }

    /// The older neighbour of `post`
    pub fn next(&self, post: &Post) -> Option<&Post> {
        let pos = self.position(post)?;
        self.posts.get(pos + 1)
    }

    fn position(&self, post: &Post) -> Option<usize> {
        self.posts.iter().position(|p| p.slug == post.slug)
    }

    /// Posts carrying `tag`, newest first
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts.iter().filter(move |p| p.has_tag(tag))
    }

    /// Posts filed under `category`, newest first
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts.iter().filter(move |p| p.in_category(category))
    }

    /// Tag names with post counts, most used first
    pub fn tags(&self) -> Vec<(String, usize)> {
        count_terms(self.posts.iter().flat_map(|p| p.tags.iter()))
    }

    /// Category names with post counts, most used first
    pub fn categories(&self) -> Vec<(String, usize)> {
        count_terms(self.posts.iter().flat_map(|p| p.categories.iter()))
    }
}

impl<'a> IntoIterator for &'a PostStore {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

fn count_terms<'a>(terms: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for term in terms {
        *counts.entry(term.as_str()).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(term, count)| (term.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_date_string;
    use chrono_tz::Tz;
    use indexmap::IndexMap;
    use std::path::PathBuf;

    fn post(slug: &str, title: &str, date: &str, source: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: title.to_string(),
            date: parse_date_string(date, Tz::UTC).unwrap(),
            updated: None,
            layout: "post".to_string(),
            comments: true,
            published: true,
            categories: Vec::new(),
            tags: Vec::new(),
            body: "Body".to_string(),
            excerpt: "Body".to_string(),
            more: None,
            source: PathBuf::from(source),
            path: format!("/{}/", slug),
            extra: IndexMap::new(),
        }
    }

    fn slugs(store: &PostStore) -> Vec<&str> {
        store.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_orders_newest_first() {
        let (store, errors) = PostStore::build(vec![
            post("old", "Old", "2012-01-01", "old.md"),
            post("new", "New", "2020-06-01", "new.md"),
            post("mid", "Mid", "2015-03-04", "mid.md"),
        ]);
        assert!(errors.is_empty());
        assert_eq!(slugs(&store), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_same_date_orders_by_title() {
        let (store, _) = PostStore::build(vec![
            post("b", "Beta", "2020-01-01", "b.md"),
            post("a", "Alpha", "2020-01-01", "a.md"),
        ]);
        assert_eq!(slugs(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_slugs_are_all_reported_and_excluded() {
        let (store, errors) = PostStore::build(vec![
            post("hello", "Hello", "2020-01-01", "2020-01-01-hello.md"),
            post("other", "Other", "2020-01-02", "other.md"),
            post("hello", "Hello Again", "2021-01-01", "2021-01-01-hello.md"),
        ]);

        assert_eq!(slugs(&store), vec!["other"]);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.is_duplicate_slug()));

        match &errors[0].error {
            PostError::DuplicateSlug { slug, others } => {
                assert_eq!(slug, "hello");
                assert_eq!(others, &vec![PathBuf::from("2021-01-01-hello.md")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_slug_from_same_source_names_the_other_copy() {
        let (store, errors) = PostStore::build(vec![
            post("hello", "Hello", "2020-01-01", "hello.md"),
            post("hello", "Hello", "2020-01-01", "hello.md"),
        ]);

        assert!(store.is_empty());
        assert_eq!(errors.len(), 2);
        for error in &errors {
            match &error.error {
                PostError::DuplicateSlug { others, .. } => {
                    assert_eq!(others, &vec![PathBuf::from("hello.md")]);
                }
                other => panic!("unexpected error: {other}"),
            }
            assert!(error.to_string().ends_with("is also used by hello.md"));
        }
    }

    #[test]
    fn test_get_and_neighbours() {
        let (store, _) = PostStore::build(vec![
            post("first", "First", "2010-01-01", "first.md"),
            post("second", "Second", "2011-01-01", "second.md"),
            post("third", "Third", "2012-01-01", "third.md"),
        ]);

        let second = store.get("second").unwrap();
        assert_eq!(store.prev(second).unwrap().slug, "third");
        assert_eq!(store.next(second).unwrap().slug, "first");

        let third = store.get("third").unwrap();
        assert!(store.prev(third).is_none());
        assert!(store.next(store.get("first").unwrap()).is_none());
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_tag_and_category_counts() {
        let mut a = post("a", "A", "2020-01-01", "a.md");
        a.tags = vec!["ruby".into(), "rails".into()];
        a.categories = vec!["code".into()];
        let mut b = post("b", "B", "2020-01-02", "b.md");
        b.tags = vec!["ruby".into(), "js".into()];
        b.categories = vec!["code".into()];

        let (store, _) = PostStore::build(vec![a, b]);

        assert_eq!(
            store.tags(),
            vec![
                ("ruby".to_string(), 2),
                ("js".to_string(), 1),
                ("rails".to_string(), 1)
            ]
        );
        assert_eq!(store.categories(), vec![("code".to_string(), 2)]);

        let ruby: Vec<_> = store.with_tag("ruby").map(|p| p.slug.as_str()).collect();
        assert_eq!(ruby, vec!["b", "a"]);
        assert_eq!(store.in_category("code").count(), 2);
        assert_eq!(store.with_tag("rails").count(), 1);
    }

    #[test]
    fn test_empty_store() {
        let (store, errors) = PostStore::build(Vec::new());
        assert!(store.is_empty());
        assert!(errors.is_empty());
        assert!(store.tags().is_empty());
    }
}
