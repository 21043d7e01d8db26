use thiserror::Error;

pub const MISSING_CREDENTIAL_GUIDANCE: &str = "Please provide your CoinMarketCap API key.";
pub const UPSTREAM_GUIDANCE: &str = "Failed to fetch data. Please check your API key and try again.";

/// 远程行情接口调用失败的原因
///
/// `Upstream`、`Timeout`、`Transport` 同属上游失败，向用户展示相同的提示。
/// 响应成功但缺少某个币种的条目不属于错误，由各接口的返回值表达。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("missing API credential")]
    MissingCredential,

    #[error("API credential contains characters not allowed in an HTTP header")]
    InvalidCredential,

    #[error("upstream responded with HTTP {status}")]
    Upstream { status: u16 },

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("unexpected upstream payload: {0}")]
    Decode(String),
}

impl FetchError {
    /// 页面上展示给用户的提示
    pub fn guidance(&self) -> &'static str {
        match self {
            FetchError::MissingCredential => MISSING_CREDENTIAL_GUIDANCE,
            FetchError::InvalidCredential
            | FetchError::Upstream { .. }
            | FetchError::Timeout
            | FetchError::Transport(_) => UPSTREAM_GUIDANCE,
            FetchError::Decode(_) => "The pricing API returned data in an unexpected format.",
        }
    }

    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            FetchError::Upstream { .. } | FetchError::Timeout | FetchError::Transport(_)
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Upstream { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Decode(e.without_url().to_string())
        } else if let Some(status) = e.status() {
            FetchError::Upstream {
                status: status.as_u16(),
            }
        } else {
            FetchError::Transport(e.without_url().to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_family_shares_guidance() {
        assert_eq!(FetchError::Upstream { status: 401 }.guidance(), UPSTREAM_GUIDANCE);
        assert_eq!(FetchError::Timeout.guidance(), UPSTREAM_GUIDANCE);
        assert_eq!(FetchError::Transport("refused".into()).guidance(), UPSTREAM_GUIDANCE);
        assert_eq!(FetchError::MissingCredential.guidance(), MISSING_CREDENTIAL_GUIDANCE);
    }

    #[test]
    fn test_status_only_for_http_failures() {
        assert_eq!(FetchError::Upstream { status: 429 }.status(), Some(429));
        assert_eq!(FetchError::Timeout.status(), None);
        assert!(FetchError::Timeout.is_upstream());
        assert!(!FetchError::MissingCredential.is_upstream());
    }
}
