pub mod model;
pub mod query;
pub mod seed;
pub mod store;

pub use model::{Article, Term};
pub use query::{ArticleQuery, TermQuery};
pub use store::ArticleStore;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Upper clamp for requested page sizes.
pub const DEFAULT_PAGE_SIZE_MAX: usize = 50;
