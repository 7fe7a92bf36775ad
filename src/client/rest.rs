//! # Materials Project REST 客户端
//!
//! 同步（阻塞）查询 `/materials/thermo/` 端点，展开每个文档的 `entries`。
//! 失败不重试，直接返回错误。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `reqwest` (blocking)

use super::{parse_entry_document, EntrySource};
use crate::error::{MpCompatError, Result};
use crate::models::{Composition, ComputedEntry};

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info};

/// 默认 API 地址
pub const DEFAULT_ENDPOINT: &str = "https://api.materialsproject.org";

/// 请求超时
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Materials Project REST 客户端
pub struct MpRestClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl MpRestClient {
    /// 创建客户端；缺少 API key 时返回配置错误
    pub fn new(api_key: Option<String>, endpoint: Option<String>) -> Result<Self> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                MpCompatError::ConfigError(
                    "No Materials Project API key. Pass --api-key or set MP_API_KEY.".to_string(),
                )
            })?;

        let endpoint = endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .user_agent(concat!("mpcompat/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        debug!("REST client configured for {}", endpoint);
        Ok(MpRestClient {
            endpoint,
            api_key,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// thermo 端点 URL
    pub fn thermo_url(&self) -> String {
        format!("{}/materials/thermo/", self.endpoint)
    }

    /// 查询参数
    fn query_params(formula: &str) -> Vec<(&'static str, String)> {
        vec![
            ("formula", formula.to_string()),
            ("_fields", "entries".to_string()),
        ]
    }
}

impl EntrySource for MpRestClient {
    fn get_entries(&self, formula: &str) -> Result<Vec<ComputedEntry>> {
        // 先在本地校验化学式
        Composition::from_formula(formula)?;

        let url = self.thermo_url();
        info!("GET {} formula={}", url, formula);

        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .query(&Self::query_params(formula))
            .send()?
            .error_for_status()?;

        let body = response.text()?;
        let entries = parse_entry_document(&body, &url)?;
        debug!("Received {} entries for {}", entries.len(), formula);
        Ok(entries)
    }

    fn describe(&self) -> String {
        format!("Materials Project API ({})", self.endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(
            MpRestClient::new(None, None),
            Err(MpCompatError::ConfigError(_))
        ));
        assert!(matches!(
            MpRestClient::new(Some("   ".to_string()), None),
            Err(MpCompatError::ConfigError(_))
        ));
    }

    #[test]
    fn test_endpoint_and_url() {
        let client = MpRestClient::new(Some("key".to_string()), None).unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(
            client.thermo_url(),
            "https://api.materialsproject.org/materials/thermo/"
        );

        let custom =
            MpRestClient::new(Some("key".to_string()), Some("http://localhost:8000/".to_string()))
                .unwrap();
        assert_eq!(custom.thermo_url(), "http://localhost:8000/materials/thermo/");
    }

    #[test]
    fn test_query_params() {
        let params = MpRestClient::query_params("LiFePO4");
        assert_eq!(params[0], ("formula", "LiFePO4".to_string()));
        assert_eq!(params[1], ("_fields", "entries".to_string()));
    }

    #[test]
    fn test_invalid_formula_fails_before_request() {
        let client =
            MpRestClient::new(Some("key".to_string()), Some("http://127.0.0.1:9".to_string()))
                .unwrap();
        assert!(matches!(
            client.get_entries("Qq2O"),
            Err(MpCompatError::UnknownElement(_))
        ));
    }
}
