//! Client for the incisive.ly bandit service.
//!
//! Fetches a variant suggestion for a visitor and later reports a reward for
//! it. Visitor identity and the pending reward token travel between the two
//! calls in cookies, so a suggestion served on one request can be rewarded on
//! another.
//!
//! # Example
//!
//! ```rust,ignore
//! use bandit_client::BanditClient;
//!
//! let client = BanditClient::new(1234, "homepage").with_domain(".example.com");
//!
//! // In the handler serving the experiment:
//! let outcome = client.suggest_for_request(request.headers()).await?;
//! outcome.cookies.apply_to(response.headers_mut())?;
//! render(outcome.value.variant_code);
//!
//! // In the handler recording the conversion:
//! let outcome = client.reward_for_request(request.headers()).await?;
//! outcome.cookies.apply_to(response.headers_mut())?;
//! ```
//!
//! # Modules
//!
//! - [`client`] - Remote calls and client construction
//! - [`session`] - Cookie-bound suggest and reward operations
//! - [`cookie`] - Expiring cookies and `Set-Cookie` rendering
//! - [`traits`] - Injectable clock and id generator
//! - [`testing`] - Deterministic implementations for tests

pub mod client;
pub mod config;
pub mod cookie;
pub mod error;
pub mod session;
pub mod testing;
pub mod traits;
pub mod types;

pub use client::{BanditClient, DEFAULT_BASE_URL, REWARD_COOKIE_PREFIX, USER_COOKIE_NAME};
pub use config::ClientConfig;
pub use cookie::{read_cookie, CookieJarUpdate, ExpiringCookie, OutboundCookie};
pub use error::{BanditError, Result, ServiceError};
pub use session::SessionOutcome;
pub use traits::{IdentifierGenerator, SystemClock, TimeSource, UuidV4Generator};
pub use types::{NullableString, Reward, Suggestion};
