use std::fmt;

use authapi_clock::DurationSecs;
use serde::{Deserialize, Serialize};

use crate::{dto::TokenResponse, AccessToken, AccessTokenRef};

/// A bearer token as issued by the AuthApi, along with its remaining lifetime
///
/// Tokens are immutable and intentionally not `Clone`. They are handed out as
/// `Arc<AuthToken>`, so two handles refer to the same token only when they
/// point at the same allocation.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
    content: AccessToken,
    lifetime: DurationSecs,
}

impl AuthToken {
    /// Constructs a token from its bearer content and remaining lifetime
    pub fn new(content: impl Into<String>, lifetime: DurationSecs) -> Self {
        Self {
            content: AccessToken::new(content.into()),
            lifetime,
        }
    }

    /// Gets the bearer content of the token
    #[inline]
    pub fn content(&self) -> &AccessTokenRef {
        &self.content
    }

    /// Gets the lifetime the token had remaining when it was issued
    #[inline]
    pub fn lifetime(&self) -> DurationSecs {
        self.lifetime
    }

    /// Renders the value for an `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.content.as_str())
    }
}

impl From<TokenResponse> for AuthToken {
    fn from(resp: TokenResponse) -> Self {
        Self {
            content: resp.access_token,
            lifetime: resp.expires_in,
        }
    }
}

/// Hides the content unless alternate formatting (`{:#}`) is requested
impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&*self.content, f)
    }
}
