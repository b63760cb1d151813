use async_trait::async_trait;

use crate::error::Result;
use inkpress_model::Verification;

#[async_trait]
pub trait VerificationsRepository: Send + Sync {
    async fn insert_verification(&self, verification: &Verification) -> Result<()>;

    /// Redeem the verification matching (identifier, value).
    ///
    /// The row is removed whether or not it can be redeemed; a token is
    /// consumed at most once. Returns `None` when no matching, unexpired
    /// token exists.
    async fn consume_verification(
        &self,
        identifier: &str,
        value: &str,
    ) -> Result<Option<Verification>>;
}
