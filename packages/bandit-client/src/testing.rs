//! Testing utilities.
//!
//! Deterministic stand-ins for the client's injected capabilities, useful for
//! testing applications that embed the client without depending on wall time
//! or random ids.

use chrono::{DateTime, Utc};

use crate::error::{BanditError, Result};
use crate::traits::{IdentifierGenerator, TimeSource};

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl TimeSource for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Always hands out the same visitor id.
#[derive(Debug, Clone)]
pub struct FixedIdentifier(pub String);

impl FixedIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl IdentifierGenerator for FixedIdentifier {
    fn generate(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Fails every generation with the given reason.
#[derive(Debug, Clone)]
pub struct FailingIdentifier(pub String);

impl IdentifierGenerator for FailingIdentifier {
    fn generate(&self) -> Result<String> {
        Err(BanditError::IdGeneration(self.0.clone()))
    }
}
