use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::macros::nutype_string;

/// A news article published on the firm's CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub slug: ArticleSlug,
    pub title: String,
    pub excerpt: String,
    /// Only present when the article was fetched individually.
    pub body_html: Option<String>,
    pub feature_image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub reading_time_minutes: Option<u32>,
    pub authors: Vec<ArticleAuthor>,
    pub tags: Vec<ArticleTag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleAuthor {
    pub name: String,
    pub profile_image_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleTag {
    pub name: String,
    pub slug: String,
}

nutype_string!(ArticleSlug(validate(
    len_char_max = 191,
    regex = ARTICLE_SLUG_REGEX
)));

pub static ARTICLE_SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

/// One page of articles together with the pagination info reported by the
/// CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
    pub total: u32,
    pub next: Option<u32>,
    pub prev: Option<u32>,
}

impl Pagination {
    /// Pagination info for a response that did not report any.
    pub fn single(page: u32, limit: u32, count: u32) -> Self {
        Self {
            page,
            limit,
            pages: page,
            total: count,
            next: None,
            prev: page.checked_sub(1).filter(|&prev| prev > 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs() {
        for (slug, valid) in [
            ("welcome", true),
            ("new-employment-act-2024", true),
            ("2024", true),
            ("", false),
            ("Welcome", false),
            ("double--hyphen", false),
            ("-leading", false),
            ("trailing-", false),
            ("../admin", false),
            ("with space", false),
        ] {
            assert_eq!(ArticleSlug::try_new(slug).is_ok(), valid, "{slug:?}");
        }
    }

    #[test]
    fn single_page_pagination() {
        assert_eq!(
            Pagination::single(1, 6, 4),
            Pagination {
                page: 1,
                limit: 6,
                pages: 1,
                total: 4,
                next: None,
                prev: None,
            }
        );
        assert_eq!(Pagination::single(3, 6, 2).prev, Some(2));
    }
}
