use std::sync::Arc;

use chrono::Duration;
use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::cookie::ExpiringCookie;
use crate::error::{BanditError, Result, ServiceError};
use crate::traits::{IdentifierGenerator, TimeSource, UuidV4Generator};
use crate::types::{Reward, Suggestion};

pub const DEFAULT_BASE_URL: &str = "https://bandits.incisive.ly/v1";

/// Name of the cookie carrying the visitor id.
pub const USER_COOKIE_NAME: &str = "iyV";

/// Prefix of the per-lab cookie carrying a pending reward token.
pub const REWARD_COOKIE_PREFIX: &str = "iyR-";

/// Approximately three years.
const DEFAULT_COOKIE_LIFETIME_HOURS: i64 = 26297;

/// Client for one (account, lab) pair of the bandit service.
///
/// Cheap to clone and safe to share across request handlers: everything is
/// fixed at construction and each call keeps its state local.
#[derive(Clone)]
pub struct BanditClient {
    http_client: reqwest::Client,
    id_generator: Arc<dyn IdentifierGenerator>,
    account_id: i64,
    lab_id: String,
    base_url: String,
    pub(crate) user_cookie: ExpiringCookie,
    pub(crate) reward_cookie: ExpiringCookie,
}

impl BanditClient {
    pub fn new(account_id: i64, lab_id: impl Into<String>) -> Self {
        let lab_id = lab_id.into();
        let lifetime = Duration::hours(DEFAULT_COOKIE_LIFETIME_HOURS);

        Self {
            http_client: reqwest::Client::new(),
            id_generator: Arc::new(UuidV4Generator),
            account_id,
            user_cookie: ExpiringCookie::new(USER_COOKIE_NAME, lifetime),
            reward_cookie: ExpiringCookie::new(format!("{REWARD_COOKIE_PREFIX}{lab_id}"), lifetime),
            lab_id,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at another deployment of the service (or a test double).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the domain on both the visitor and the reward cookie.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        self.user_cookie = self.user_cookie.with_domain(domain.clone());
        self.reward_cookie = self.reward_cookie.with_domain(domain);
        self
    }

    /// Replace the HTTP transport, e.g. to set timeouts or a proxy.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.user_cookie = self.user_cookie.with_clock(clock.clone());
        self.reward_cookie = self.reward_cookie.with_clock(clock);
        self
    }

    pub fn with_id_generator(mut self, generator: Arc<dyn IdentifierGenerator>) -> Self {
        self.id_generator = generator;
        self
    }

    pub fn account_id(&self) -> i64 {
        self.account_id
    }

    pub fn lab_id(&self) -> &str {
        &self.lab_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn suggestion_url(&self) -> String {
        format!(
            "{}/accounts/{}/labs/{}/suggest",
            self.base_url, self.account_id, self.lab_id
        )
    }

    pub fn reward_url(&self) -> String {
        format!("{}/reward", self.base_url)
    }

    pub fn user_cookie(&self) -> &ExpiringCookie {
        &self.user_cookie
    }

    pub fn reward_cookie(&self) -> &ExpiringCookie {
        &self.reward_cookie
    }

    pub(crate) fn generate_user_id(&self) -> Result<String> {
        self.id_generator.generate()
    }

    /// Fetch a variant suggestion for `user`.
    pub async fn fetch_suggestion(&self, user: &str) -> Result<Suggestion> {
        if user.is_empty() {
            return Err(BanditError::EmptyUserId);
        }

        let url = Url::parse_with_params(&self.suggestion_url(), &[("user", user)])?;
        debug!(url = %url, "Requesting suggestion");

        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "Suggestion response received");

        if status == StatusCode::NOT_FOUND {
            return Err(BanditError::ResourceNotFound {
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        if status != StatusCode::OK {
            return Err(service_error(&body));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// Report a reward for a previously suggested variant.
    pub async fn post_reward(&self, reward: &Reward) -> Result<()> {
        if reward.token.is_empty() {
            return Err(BanditError::EmptyRewardToken);
        }

        let url = self.reward_url();
        debug!(url = %url, "Posting reward");

        let response = self
            .http_client
            .post(&url)
            .form(&[("token", reward.token.as_str())])
            .send()
            .await?;
        let status = response.status();
        debug!(status = status.as_u16(), "Reward response received");

        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let body = response.bytes().await?;
        Err(service_error(&body))
    }
}

/// Decode a `{message, code}` body; a malformed body is itself the error.
fn service_error(body: &[u8]) -> BanditError {
    match serde_json::from_slice::<ServiceError>(body) {
        Ok(e) => BanditError::Service(e),
        Err(e) => BanditError::Decode(e),
    }
}
