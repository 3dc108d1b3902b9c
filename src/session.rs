//! Short-lived session used to authorise the push channel.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::transport::{ApiRequest, Target, Transport};

const LOGIN_PATH: &str = "login";

/// Session cookies returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    cookies: BTreeMap<String, String>,
}

impl Session {
    /// Log in with the transport's token and keep the cookies the service sets.
    pub async fn login(transport: &Transport) -> Result<Self> {
        let response = transport
            .request(ApiRequest::post(LOGIN_PATH).target(Target::Admin))
            .await?;
        tracing::debug!(cookies = response.cookies.len(), "Logged in");
        Self::from_cookies(response.cookies)
    }

    /// Build a session from already obtained cookies.
    pub fn from_cookies(cookies: BTreeMap<String, String>) -> Result<Self> {
        if cookies.is_empty() {
            return Err(Error::Transport {
                message: "login succeeded but returned no session cookie".to_string(),
            });
        }
        Ok(Self { cookies })
    }

    /// Value for a `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header() {
        let cookies = BTreeMap::from([
            ("session".to_string(), "abc".to_string()),
            ("csrf".to_string(), "xyz".to_string()),
        ]);
        let session = Session::from_cookies(cookies).unwrap();
        assert_eq!(session.cookie_header(), "csrf=xyz; session=abc");
    }

    #[test]
    fn test_empty_cookies_rejected() {
        assert!(matches!(
            Session::from_cookies(BTreeMap::new()),
            Err(Error::Transport { .. })
        ));
    }
}
