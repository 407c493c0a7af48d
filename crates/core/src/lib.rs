pub mod domain;
pub mod llm;
pub mod recommend;
pub mod shopping;

#[cfg(test)]
mod test_support;

pub mod config {
    use anyhow::Context;

    const DEFAULT_PORT: u16 = 8000;

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub naver_client_id: Option<String>,
        pub naver_client_secret: Option<String>,
        pub openai_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub port: u16,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let port = match std::env::var("PORT") {
                Ok(s) => s
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a valid port number (got {s:?})"))?,
                Err(_) => DEFAULT_PORT,
            };

            Ok(Self {
                naver_client_id: non_empty_var("NAVER_CLIENT_ID"),
                naver_client_secret: non_empty_var("NAVER_CLIENT_SECRET"),
                openai_api_key: non_empty_var("OPENAI_API_KEY"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                port,
            })
        }

        pub fn require_naver_credentials(&self) -> anyhow::Result<(&str, &str)> {
            let id = self
                .naver_client_id
                .as_deref()
                .context("NAVER_CLIENT_ID is required")?;
            let secret = self
                .naver_client_secret
                .as_deref()
                .context("NAVER_CLIENT_SECRET is required")?;
            Ok((id, secret))
        }

        pub fn require_openai_api_key(&self) -> anyhow::Result<&str> {
            self.openai_api_key
                .as_deref()
                .context("OPENAI_API_KEY is required")
        }

        /// Names of the required secrets that are not configured.
        ///
        /// The server still starts without them; calls fail at request time instead.
        pub fn missing_secrets(&self) -> Vec<&'static str> {
            let mut out = Vec::new();
            if self.naver_client_id.is_none() {
                out.push("NAVER_CLIENT_ID");
            }
            if self.naver_client_secret.is_none() {
                out.push("NAVER_CLIENT_SECRET");
            }
            if self.openai_api_key.is_none() {
                out.push("OPENAI_API_KEY");
            }
            out
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

}
