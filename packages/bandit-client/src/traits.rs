// Capability traits injected into the client.
//
// The defaults talk to the real world (wall clock, random UUIDs); tests swap
// in the fixed implementations from `crate::testing`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;

// =============================================================================
// Time Source
// =============================================================================

pub trait TimeSource: Send + Sync {
    /// Current instant, used to compute cookie expiry at issuance time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// Identifier Generator
// =============================================================================

pub trait IdentifierGenerator: Send + Sync {
    /// Produce a fresh visitor id for a request that carries none
    fn generate(&self) -> Result<String>;
}

/// Random UUID v4 visitor ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdentifierGenerator for UuidV4Generator {
    fn generate(&self) -> Result<String> {
        Ok(Uuid::new_v4().to_string())
    }
}
