mod safe_browsing;

pub use safe_browsing::SafeBrowsingChecker;

use crate::record::Trusted;

/// Reputation verdict for a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustVerdict {
    Trusted,
    NotTrusted,
}

impl From<TrustVerdict> for Trusted {
    fn from(verdict: TrustVerdict) -> Self {
        match verdict {
            TrustVerdict::Trusted => Trusted::Yes,
            TrustVerdict::NotTrusted => Trusted::No,
        }
    }
}

/// Looks up whether a URL is known to be malicious
#[async_trait::async_trait]
pub trait TrustChecker: Send + Sync {
    async fn check_trust(&self, url: &str) -> Result<TrustVerdict, TrustError>;
}

/// Trust lookup errors. The pipeline records these as `Trusted::Unknown`.
#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    #[error("Network error: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Quota exceeded")]
    RateLimited,

    #[error("API error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_maps_to_yes_no() {
        assert_eq!(Trusted::from(TrustVerdict::Trusted), Trusted::Yes);
        assert_eq!(Trusted::from(TrustVerdict::NotTrusted), Trusted::No);
    }
}
