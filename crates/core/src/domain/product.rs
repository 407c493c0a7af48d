use crate::domain::part::PartCategory;
use serde::{Deserialize, Serialize};

pub const SHOPPING_SEARCH_URL: &str = "https://search.shopping.naver.com/search/all";

/// Price text for products whose price is not known (fallback placeholders only).
pub const PRICE_UNKNOWN: &str = "정보 없음";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub name: String,
    pub price: String,
    pub link: String,
    pub mall: Option<String>,
    pub category: Option<String>,
    pub part: Option<String>,
    pub required: bool,
}

impl CandidateProduct {
    /// Hardcoded stand-in for a category whose search came back empty or failed.
    pub fn fallback(part: PartCategory) -> Self {
        let name = part.fallback_product_name();
        Self {
            name: name.to_string(),
            price: PRICE_UNKNOWN.to_string(),
            link: search_link(name),
            mall: None,
            category: None,
            part: Some(part.label().to_string()),
            required: true,
        }
    }

    pub fn tagged(&self, part: PartCategory) -> Self {
        Self {
            part: Some(part.label().to_string()),
            required: true,
            ..self.clone()
        }
    }

    /// One numbered line of the prompt block.
    pub fn block_line(&self, idx: usize) -> String {
        match self.mall.as_deref().filter(|m| !m.trim().is_empty()) {
            Some(mall) => format!(
                "{idx}. {} ({mall}) - {} (링크: {})",
                self.name, self.price, self.link
            ),
            None => format!("{idx}. {} - {} (링크: {})", self.name, self.price, self.link),
        }
    }
}

/// Generic search-results URL for a product name, independent of the raw affiliate link.
pub fn search_link(name: &str) -> String {
    match reqwest::Url::parse_with_params(SHOPPING_SEARCH_URL, &[("query", name.trim())]) {
        Ok(url) => url.to_string(),
        Err(_) => SHOPPING_SEARCH_URL.to_string(),
    }
}

/// Formats a KRW amount with thousands separators, e.g. `1234500` -> `1,234,500원`.
pub fn format_price_krw(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('원');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_prices_with_separators() {
        assert_eq!(format_price_krw(1_234_500), "1,234,500원");
        assert_eq!(format_price_krw(999), "999원");
        assert_eq!(format_price_krw(1000), "1,000원");
        assert_eq!(format_price_krw(0), "0원");
    }

    #[test]
    fn search_link_escapes_product_name() {
        let link = search_link("삼성전자 DDR4 16GB & more");
        assert!(link.starts_with("https://search.shopping.naver.com/search/all?query="));
        assert!(!link.contains(' '));
        assert!(!link.contains("& more"));
    }

    #[test]
    fn fallback_is_required_and_priced_unknown() {
        let p = CandidateProduct::fallback(PartCategory::Gpu);
        assert_eq!(p.name, "NVIDIA GeForce RTX 3060");
        assert_eq!(p.price, PRICE_UNKNOWN);
        assert_eq!(p.part.as_deref(), Some("그래픽카드"));
        assert!(p.required);
        assert_eq!(p.link, search_link("NVIDIA GeForce RTX 3060"));
    }

    #[test]
    fn block_line_omits_missing_mall() {
        let mut p = CandidateProduct::fallback(PartCategory::Cpu);
        assert_eq!(
            p.block_line(1),
            format!("1. AMD 라이젠 5 5600X - 정보 없음 (링크: {})", p.link)
        );

        p.mall = Some("컴퓨존".to_string());
        p.price = format_price_krw(189_000);
        assert_eq!(
            p.block_line(2),
            format!("2. AMD 라이젠 5 5600X (컴퓨존) - 189,000원 (링크: {})", p.link)
        );
    }
}
