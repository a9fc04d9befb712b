use log::debug;

use super::query::{ArticleQuery, Page, TermQuery, paginate};
use super::seed::{sample_articles, sample_terms};
use super::{Article, Term};
use crate::error::{DemoError, DemoResult};

/// In-memory article and glossary content.
#[derive(Debug)]
pub struct ArticleStore {
    articles: Vec<Article>,
    terms: Vec<Term>,
    max_page_size: usize,
}

impl ArticleStore {
    pub fn new(articles: Vec<Article>, terms: Vec<Term>, max_page_size: usize) -> Self {
        Self {
            articles,
            terms,
            max_page_size,
        }
    }

    pub fn seeded(max_page_size: usize) -> Self {
        Self::new(sample_articles(), sample_terms(), max_page_size)
    }

    /// Filtered articles, newest first.
    pub fn page(&self, query: &ArticleQuery) -> Page<Article> {
        let mut matched: Vec<Article> = self
            .articles
            .iter()
            .filter(|a| query.matches(a))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        paginate(matched, query.page, query.page_size, self.max_page_size)
    }

    fn read(&mut self, pred: impl Fn(&Article) -> bool, what: String) -> DemoResult<Article> {
        let article = self
            .articles
            .iter_mut()
            .find(|a| pred(&**a))
            .ok_or(DemoError::NotFound(what))?;
        article.view_count += 1;
        debug!(
            "ARTICLE - read id={} views={}",
            article.id, article.view_count
        );
        Ok(article.clone())
    }

    /// Fetch by id, counting the read.
    pub fn get_by_id(&mut self, id: u64) -> DemoResult<Article> {
        self.read(|a| a.id == id, format!("article {id}"))
    }

    /// Fetch by slug, counting the read.
    pub fn get_by_slug(&mut self, slug: &str) -> DemoResult<Article> {
        self.read(|a| a.slug == slug, format!("article '{slug}'"))
    }

    /// Glossary terms in name order.
    pub fn term_page(&self, query: &TermQuery) -> Page<Term> {
        let mut matched: Vec<Term> = self
            .terms
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        paginate(matched, query.page, query.page_size, self.max_page_size)
    }
}
