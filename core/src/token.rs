//! Client token generation for idempotent mutating calls.

use std::fmt::Debug;

use uuid::Uuid;

/// Produces the `clientToken` attached to create, update and delete requests.
///
/// Every call must return a fresh, non-empty value so a retried request can be
/// told apart from a new one on the server.
pub trait ClientTokenGenerator: Debug + Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator: one random UUID v4 per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokenGenerator;

impl ClientTokenGenerator for UuidTokenGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
