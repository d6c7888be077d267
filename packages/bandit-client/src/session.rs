//! Request-bound operations that keep visitor identity and pending rewards
//! continuous across requests through cookies.
//!
//! Per visitor the cookies move through:
//! 1. no identity -> identified (visitor cookie issued on first suggestion)
//! 2. identified -> reward pending (reward cookie issued when a suggestion
//!    carries a reward token)
//! 3. reward pending -> identified (reward cookie cleared after a successful
//!    reward post)
//!
//! Cookies are only produced on the success path. A failed call yields no
//! [`CookieJarUpdate`], leaving the browser's cookies as they were so a pending
//! reward survives for a later retry.

use axum::http::HeaderMap;
use tracing::debug;

use crate::client::BanditClient;
use crate::cookie::CookieJarUpdate;
use crate::error::{BanditError, Result};
use crate::types::{Reward, Suggestion};

/// The result of a request-bound operation plus the cookies to set.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome<T> {
    pub value: T,
    pub cookies: CookieJarUpdate,
}

impl<T> SessionOutcome<T> {
    pub fn new(value: T, cookies: CookieJarUpdate) -> Self {
        Self { value, cookies }
    }

    pub fn into_parts(self) -> (T, CookieJarUpdate) {
        (self.value, self.cookies)
    }
}

impl BanditClient {
    /// Fetch a suggestion for the visitor behind `headers`.
    ///
    /// Reuses the visitor cookie when present, otherwise generates an id and
    /// issues the cookie. A reward token on the suggestion is issued as the
    /// reward cookie.
    pub async fn suggest_for_request(
        &self,
        headers: &HeaderMap,
    ) -> Result<SessionOutcome<Suggestion>> {
        let mut cookies = CookieJarUpdate::new();

        let user = match self.user_cookie.read(headers) {
            Some(user) => user,
            None => {
                let user = self.generate_user_id()?;
                debug!(cookie = self.user_cookie.name(), "Issuing new visitor id");
                cookies.push(self.user_cookie.materialize(&user));
                user
            }
        };

        let suggestion = self.fetch_suggestion(&user).await?;

        if let Some(token) = suggestion.reward_token.as_deref() {
            cookies.push(self.reward_cookie.materialize(token));
        }

        Ok(SessionOutcome::new(suggestion, cookies))
    }

    /// Post the reward pending in the visitor's reward cookie, then clear it.
    pub async fn reward_for_request(&self, headers: &HeaderMap) -> Result<SessionOutcome<()>> {
        let token = self
            .reward_cookie
            .read(headers)
            .ok_or(BanditError::NoRewardCookie)?;

        self.post_reward(&Reward::new(token)).await?;

        debug!(cookie = self.reward_cookie.name(), "Reward accepted, clearing cookie");
        let mut cookies = CookieJarUpdate::new();
        cookies.push(self.reward_cookie.expired());

        Ok(SessionOutcome::new((), cookies))
    }
}
