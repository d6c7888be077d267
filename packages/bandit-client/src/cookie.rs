//! Cookies read from inbound requests and written to outbound responses.
//!
//! The client never touches a response directly. Operations return a
//! [`CookieJarUpdate`] which the HTTP layer applies, either with
//! [`CookieJarUpdate::apply_to`] or by returning it from an axum handler.

use std::fmt;
use std::sync::Arc;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponseParts, ResponseParts};
use chrono::{DateTime, Duration, Utc};

use crate::error::{BanditError, Result};
use crate::traits::{SystemClock, TimeSource};

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A named cookie whose expiry is computed from a clock at issuance time.
#[derive(Clone)]
pub struct ExpiringCookie {
    name: String,
    domain: Option<String>,
    lifetime: Duration,
    clock: Arc<dyn TimeSource>,
}

impl ExpiringCookie {
    pub fn new(name: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            name: name.into(),
            domain: None,
            lifetime,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue the cookie with `value`, expiring `lifetime` after the clock's now.
    ///
    /// Bytes that cannot appear in a cookie value are dropped, so the result
    /// always renders as a valid header.
    pub fn materialize(&self, value: &str) -> OutboundCookie {
        OutboundCookie {
            name: self.name.clone(),
            value: sanitize_value(value),
            domain: self.domain.clone(),
            expires: self.clock.now() + self.lifetime,
        }
    }

    /// A deletion for this cookie: empty value, expiry one second after the epoch.
    pub fn expired(&self) -> OutboundCookie {
        OutboundCookie {
            name: self.name.clone(),
            value: String::new(),
            domain: self.domain.clone(),
            expires: DateTime::<Utc>::default() + Duration::seconds(1),
        }
    }

    /// The value of this cookie on an inbound request, if present.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        read_cookie(headers, &self.name)
    }
}

impl fmt::Debug for ExpiringCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringCookie")
            .field("name", &self.name)
            .field("domain", &self.domain)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

/// A cookie to set on the outbound response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub expires: DateTime<Utc>,
}

impl OutboundCookie {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    pub fn to_header_value(&self) -> Result<HeaderValue> {
        HeaderValue::from_str(&self.to_string()).map_err(|_| BanditError::InvalidCookie {
            name: self.name.clone(),
        })
    }
}

/// Renders the `Set-Cookie` header value.
impl fmt::Display for OutboundCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.contains([' ', ',']) {
            write!(f, "{}=\"{}\"", self.name, self.value)?;
        } else {
            write!(f, "{}={}", self.name, self.value)?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={}", domain.strip_prefix('.').unwrap_or(domain))?;
        }
        write!(f, "; Expires={}", self.expires.format(EXPIRES_FORMAT))
    }
}

/// Cookies an operation wants set on the outbound response, in issue order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJarUpdate {
    cookies: Vec<OutboundCookie>,
}

impl CookieJarUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cookie: OutboundCookie) {
        self.cookies.push(cookie);
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutboundCookie> {
        self.cookies.iter()
    }

    pub fn get(&self, name: &str) -> Option<&OutboundCookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Append one `Set-Cookie` header per cookie.
    pub fn apply_to(&self, headers: &mut HeaderMap) -> Result<()> {
        for cookie in &self.cookies {
            headers.append(SET_COOKIE, cookie.to_header_value()?);
        }
        Ok(())
    }
}

impl IntoIterator for CookieJarUpdate {
    type Item = OutboundCookie;
    type IntoIter = std::vec::IntoIter<OutboundCookie>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.into_iter()
    }
}

impl IntoResponseParts for CookieJarUpdate {
    type Error = (StatusCode, String);

    fn into_response_parts(
        self,
        mut res: ResponseParts,
    ) -> std::result::Result<ResponseParts, Self::Error> {
        self.apply_to(res.headers_mut())
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
        Ok(res)
    }
}

/// Keep printable ASCII except `"`, `;` and `\`. Space and comma survive and
/// are quoted when rendered.
fn sanitize_value(value: &str) -> String {
    value
        .chars()
        .filter(|&c| matches!(c, ' '..='~') && !matches!(c, '"' | ';' | '\\'))
        .collect()
}

/// Find a cookie by name across all `Cookie` request headers. First match wins.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
                .to_string()
        })
}
