use crate::domain::part::PartCategory;
use crate::domain::product::CandidateProduct;
use crate::domain::recommendation::RecommendResponse;
use crate::llm::error::LlmError;
use crate::llm::{json, GenerateInput, RecommendationGenerator};
use crate::shopping::{SearchQuery, ShoppingSearch};
use std::sync::Arc;

pub const CANDIDATES_PER_PART: usize = 4;

/// Candidates gathered for one category, always non-empty.
#[derive(Debug, Clone)]
pub struct PartCandidates {
    pub part: PartCategory,
    pub products: Vec<CandidateProduct>,
    pub is_fallback: bool,
}

#[derive(Clone)]
pub struct RecommendService {
    shopping: Arc<dyn ShoppingSearch>,
    llm: Arc<dyn RecommendationGenerator>,
}

impl RecommendService {
    pub fn new(shopping: Arc<dyn ShoppingSearch>, llm: Arc<dyn RecommendationGenerator>) -> Self {
        Self { shopping, llm }
    }

    /// Searches every category in order. Shopping failures never abort the request; the
    /// category falls back to its hardcoded placeholder instead.
    pub async fn collect_candidates(&self, prompt: &str) -> Vec<PartCandidates> {
        let mut out = Vec::with_capacity(PartCategory::ALL.len());
        for part in PartCategory::ALL {
            out.push(self.collect_part(part, prompt).await);
        }
        out
    }

    async fn collect_part(&self, part: PartCategory, prompt: &str) -> PartCandidates {
        let phrases = [
            format!("{} {}", part.search_term(), prompt.trim()),
            part.search_term().to_string(),
        ];

        for (attempt, phrase) in phrases.into_iter().enumerate() {
            let query = SearchQuery {
                phrase,
                limit: CANDIDATES_PER_PART,
                exclude: part.excluded_keywords(),
            };

            match self.shopping.search(&query).await {
                Ok(products) if !products.is_empty() => {
                    return PartCandidates {
                        part,
                        products: products.iter().map(|p| p.tagged(part)).collect(),
                        is_fallback: false,
                    };
                }
                Ok(_) => {
                    tracing::info!(
                        part = part.label(),
                        attempt = attempt + 1,
                        phrase = %query.phrase,
                        "shopping search returned no candidates"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        part = part.label(),
                        provider = self.shopping.provider_name(),
                        error = %err,
                        "shopping search failed; using fallback product"
                    );
                    break;
                }
            }
        }

        PartCandidates {
            part,
            products: vec![CandidateProduct::fallback(part)],
            is_fallback: true,
        }
    }

    pub async fn recommend(&self, prompt: &str) -> Result<RecommendResponse, LlmError> {
        let candidates = self.collect_candidates(prompt).await;
        let fallbacks = candidates.iter().filter(|c| c.is_fallback).count();
        let product_block = build_product_block(&candidates);

        tracing::info!(
            parts = candidates.len(),
            fallbacks,
            "candidate collection finished"
        );

        let input = GenerateInput {
            user_prompt: prompt.trim().to_string(),
            product_block,
        };

        // Not retried, unlike the shopping search.
        let text = self
            .llm
            .generate_recommendation(input)
            .await
            .inspect_err(|err| {
                tracing::warn!(
                    provider = ?self.llm.provider(),
                    stage = err.stage(),
                    error = %err,
                    "recommendation generation failed"
                );
            })?;

        let recommendation = json::classify(&text);
        let missing = recommendation.missing_parts();
        if !missing.is_empty() {
            let missing: Vec<_> = missing.iter().map(|c| c.label()).collect();
            tracing::warn!(?missing, "recommendation does not cover every part");
        }

        let products = candidates.into_iter().flat_map(|c| c.products).collect();

        Ok(RecommendResponse {
            recommendation: recommendation.into_payload(),
            products,
        })
    }
}

/// Numbered candidate lines grouped under a header per category, separated by blank lines.
pub fn build_product_block(candidates: &[PartCandidates]) -> String {
    candidates
        .iter()
        .map(|c| {
            let mut block = format!("[{} 후보]", c.part.label());
            for (idx, product) in c.products.iter().enumerate() {
                block.push('\n');
                block.push_str(&product.block_line(idx + 1));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
