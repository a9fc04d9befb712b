use serde::{Deserialize, Serialize};

use super::{Article, DEFAULT_PAGE_SIZE, Term};

/// Filters and paging for the article list. Unset filters match everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ArticleQuery {
    pub fn matches(&self, article: &Article) -> bool {
        if let Some(category) = non_blank(&self.category) {
            if !article.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(tag) = non_blank(&self.tag) {
            if !article.has_tag_like(tag) {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            if !article.matches_text(search) {
                return false;
            }
        }
        if let Some(featured) = self.featured {
            if article.featured != featured {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl TermQuery {
    pub fn matches(&self, term: &Term) -> bool {
        if let Some(category) = non_blank(&self.category) {
            if !term.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            if !term.name.to_lowercase().contains(&needle)
                && !term.definition.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
}

/// Slice already-ordered `items`. Page 0 is treated as 1; the size is
/// clamped to `1..=max_page_size`. Pages past the end are empty.
pub fn paginate<T>(
    items: Vec<T>,
    page: Option<usize>,
    page_size: Option<usize>,
    max_page_size: usize,
) -> Page<T> {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, max_page_size.max(1));
    let total = items.len();
    let start = (page - 1).saturating_mul(page_size);

    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();
    let has_more = start.saturating_add(items.len()) < total;
    Page {
        items,
        total,
        page,
        page_size,
        has_more,
    }
}
