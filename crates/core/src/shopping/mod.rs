pub mod error;
pub mod filter;
pub mod naver;

use crate::domain::product::CandidateProduct;
use error::ShoppingError;

#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
    pub phrase: String,
    pub limit: usize,
    /// Title substrings to drop on top of the client's common blacklist.
    pub exclude: &'a [&'a str],
}

#[async_trait::async_trait]
pub trait ShoppingSearch: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn search(
        &self,
        query: &SearchQuery<'_>,
    ) -> Result<Vec<CandidateProduct>, ShoppingError>;
}
