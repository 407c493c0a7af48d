use crate::config::Settings;
use crate::domain::product::{format_price_krw, search_link, CandidateProduct};
use crate::shopping::error::ShoppingError;
use crate::shopping::filter::{is_blacklisted, strip_markup};
use crate::shopping::{SearchQuery, ShoppingSearch};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://openapi.naver.com";
const SEARCH_PATH: &str = "/v1/search/shop.json";
const DEFAULT_SORT: &str = "sim";
const DEFAULT_MIN_PRICE: u64 = 10_000;
const TIMEOUT_SECS: u64 = 10;

// Upper bound the search API accepts for `display`.
const MAX_DISPLAY: usize = 100;

#[derive(Debug, Clone)]
pub struct NaverShoppingClient {
    http: reqwest::Client,
    base_url: String,
    settings: Settings,
    sort: String,
    min_price: u64,
}

impl NaverShoppingClient {
    /// Builds the client even without credentials; searches then fail with a config error.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url =
            std::env::var("NAVER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let sort = std::env::var("NAVER_SORT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SORT.to_string());
        let min_price = std::env::var("NAVER_MIN_PRICE")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MIN_PRICE);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .context("failed to build Naver shopping http client")?;

        Ok(Self {
            http,
            base_url,
            settings: settings.clone(),
            sort,
            min_price,
        })
    }

    fn headers(&self) -> Result<HeaderMap, ShoppingError> {
        let (id, secret) = self
            .settings
            .require_naver_credentials()
            .map_err(|e| ShoppingError::Config(format!("{e:#}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Naver-Client-Id",
            HeaderValue::from_str(id)
                .map_err(|e| ShoppingError::Config(format!("invalid NAVER_CLIENT_ID: {e}")))?,
        );
        headers.insert(
            "X-Naver-Client-Secret",
            HeaderValue::from_str(secret)
                .map_err(|e| ShoppingError::Config(format!("invalid NAVER_CLIENT_SECRET: {e}")))?,
        );
        Ok(headers)
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SEARCH_PATH)
    }
}

#[async_trait::async_trait]
impl ShoppingSearch for NaverShoppingClient {
    fn provider_name(&self) -> &'static str {
        "naver_shopping"
    }

    async fn search(
        &self,
        query: &SearchQuery<'_>,
    ) -> Result<Vec<CandidateProduct>, ShoppingError> {
        let headers = self.headers()?;

        // Over-fetch so filtering still leaves `limit` results.
        let display = query.limit.saturating_mul(2).clamp(1, MAX_DISPLAY).to_string();

        let res = self
            .http
            .get(self.url())
            .headers(headers)
            .query(&[
                ("query", query.phrase.as_str()),
                ("display", display.as_str()),
                ("sort", self.sort.as_str()),
            ])
            .send()
            .await
            .map_err(ShoppingError::Transport)?;

        let status = res.status();
        let text = res.text().await.map_err(ShoppingError::Transport)?;
        if !status.is_success() {
            return Err(ShoppingError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed = serde_json::from_str::<ShopSearchResponse>(&text)
            .map_err(|e| ShoppingError::Decode(e.to_string()))?;

        let products = filter_items(parsed.items, query, self.min_price);
        tracing::debug!(
            phrase = %query.phrase,
            limit = query.limit,
            kept = products.len(),
            "naver shopping search"
        );
        Ok(products)
    }
}

/// Cleans, filters and truncates raw search items into candidates.
pub fn filter_items(
    items: Vec<ShopItem>,
    query: &SearchQuery<'_>,
    min_price: u64,
) -> Vec<CandidateProduct> {
    items
        .into_iter()
        .filter_map(|item| {
            let name = strip_markup(&item.title);
            if name.is_empty() || is_blacklisted(&name, query.exclude) {
                return None;
            }

            let price = parse_price(&item.lprice).filter(|p| *p >= min_price)?;

            let category = [
                &item.category1,
                &item.category2,
                &item.category3,
                &item.category4,
            ]
            .into_iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(">");

            Some(CandidateProduct {
                link: search_link(&name),
                price: format_price_krw(price),
                mall: Some(item.mall_name.trim().to_string()).filter(|m| !m.is_empty()),
                category: Some(category).filter(|c| !c.is_empty()),
                part: None,
                required: true,
                name,
            })
        })
        .take(query.limit)
        .collect()
}

// The API documents `lprice` as a string, but tolerate a bare number too.
fn parse_price(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().replace(',', "").parse::<u64>().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopSearchResponse {
    #[serde(default)]
    pub items: Vec<ShopItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lprice: Value,
    #[serde(default)]
    pub mall_name: String,
    #[serde(default)]
    pub category1: String,
    #[serde(default)]
    pub category2: String,
    #[serde(default)]
    pub category3: String,
    #[serde(default)]
    pub category4: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::part::PartCategory;
    use crate::test_support::CannedServer;
    use serde_json::json;

    fn items(v: Value) -> Vec<ShopItem> {
        serde_json::from_value::<ShopSearchResponse>(v).unwrap().items
    }

    fn query(limit: usize, exclude: &'static [&'static str]) -> SearchQuery<'static> {
        SearchQuery {
            phrase: "데스크탑 CPU".to_string(),
            limit,
            exclude,
        }
    }

    #[test]
    fn parses_and_cleans_search_items() {
        let raw = items(json!({
            "total": 1,
            "items": [{
                "title": "AMD <b>라이젠</b> 5 5600X",
                "link": "https://smartstore.naver.com/main/products/1?NaPm=ct%3Dabc",
                "lprice": "1234500",
                "hprice": "",
                "mallName": "컴퓨존",
                "productId": "1",
                "category1": "디지털/가전",
                "category2": "PC부품",
                "category3": "CPU",
                "category4": ""
            }]
        }));

        let out = filter_items(raw, &query(4, &[]), 10_000);
        assert_eq!(out.len(), 1);
        let p = &out[0];
        assert_eq!(p.name, "AMD 라이젠 5 5600X");
        assert_eq!(p.price, "1,234,500원");
        assert_eq!(p.mall.as_deref(), Some("컴퓨존"));
        assert_eq!(p.category.as_deref(), Some("디지털/가전>PC부품>CPU"));
        assert_eq!(p.link, search_link("AMD 라이젠 5 5600X"));
        assert!(!p.link.contains("smartstore"));
    }

    #[test]
    fn drops_blacklisted_and_cheap_items_then_truncates() {
        let raw = items(json!({
            "items": [
                {"title": "라이젠 5600X <b>중고</b>", "lprice": "90000"},
                {"title": "DEEPCOOL AK400 CPU 쿨러", "lprice": "35000"},
                {"title": "CPU 서멀구리스", "lprice": 4000},
                {"title": "인텔 코어 i5-12400F", "lprice": 150000},
                {"title": "AMD 라이젠 7 5700X3D", "lprice": "280000"},
                {"title": "인텔 코어 i3-12100F", "lprice": "98000"},
                {"title": "가격 없음 CPU"}
            ]
        }));

        let out = filter_items(raw, &query(2, &["쿨러", "cooler"]), 10_000);
        let names: Vec<_> = out.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["인텔 코어 i5-12400F", "AMD 라이젠 7 5700X3D"]);
    }

    #[test]
    fn missing_items_key_is_empty() {
        assert!(items(json!({"total": 0})).is_empty());
    }

    fn client(base_url: &str, settings: Settings) -> NaverShoppingClient {
        NaverShoppingClient {
            http: reqwest::Client::builder().no_proxy().build().unwrap(),
            base_url: base_url.to_string(),
            settings,
            sort: DEFAULT_SORT.to_string(),
            min_price: DEFAULT_MIN_PRICE,
        }
    }

    fn credentials() -> Settings {
        Settings {
            naver_client_id: Some("id-123".to_string()),
            naver_client_secret: Some("secret-456".to_string()),
            ..Default::default()
        }
    }

    fn ssd_query() -> SearchQuery<'static> {
        SearchQuery {
            phrase: "SSD".to_string(),
            limit: 4,
            exclude: &[],
        }
    }

    #[test]
    fn search_without_credentials_is_a_config_error() {
        let settings = Settings {
            naver_client_id: Some("id-123".to_string()),
            ..Default::default()
        };
        let err = client(DEFAULT_BASE_URL, settings).headers().unwrap_err();
        assert!(
            matches!(err, ShoppingError::Config(ref d) if d.contains("NAVER_CLIENT_SECRET is required"))
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_http_error_with_body() {
        let server = CannedServer::start(429, r#"{"errorMessage":"limit"}"#).await;
        let err = client(&server.base_url, credentials())
            .search(&ssd_query())
            .await
            .unwrap_err();

        match err {
            ShoppingError::Http { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, r#"{"errorMessage":"limit"}"#);
            }
            other => panic!("expected HTTP error, got {other}"),
        }

        let request = server.received().await.to_lowercase();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("get /v1/search/shop.json?"));
        assert!(request_line.contains("query=ssd"));
        assert!(request_line.contains("display=8"));
        assert!(request_line.contains("sort=sim"));
        assert!(request.contains("x-naver-client-id: id-123"));
        assert!(request.contains("x-naver-client-secret: secret-456"));
    }

    #[tokio::test]
    async fn successful_search_is_filtered_and_truncated() {
        let body = json!({
            "items": [
                {"title": "<b>SSD</b> 중고 1TB", "lprice": "50000"},
                {"title": "삼성전자 990 PRO <b>SSD</b> 1TB", "lprice": "159000", "mallName": "컴퓨존"},
                {"title": "SSD 방열판", "lprice": "12000"},
                {"title": "WD Blue SN580 <b>SSD</b> 500GB", "lprice": "62000"}
            ]
        })
        .to_string();
        let server = CannedServer::start(200, &body).await;

        let query = SearchQuery {
            phrase: "SSD".to_string(),
            limit: 1,
            exclude: PartCategory::Ssd.excluded_keywords(),
        };
        let out = client(&server.base_url, credentials())
            .search(&query)
            .await
            .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "삼성전자 990 PRO SSD 1TB");
        assert_eq!(out[0].price, "159,000원");
        assert!(server.received().await.contains("display=2"));
    }

    #[tokio::test]
    async fn undecodable_body_is_a_decode_error() {
        let server = CannedServer::start(200, "<html>maintenance</html>").await;
        let err = client(&server.base_url, credentials())
            .search(&ssd_query())
            .await
            .unwrap_err();
        assert!(matches!(err, ShoppingError::Decode(_)));
    }
}
