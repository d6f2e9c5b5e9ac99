use crate::configuration::ClaimSettings;
use crate::domain::ClaimCode;

/// The row inserted into the legacy owners table. Seeded rows always start
/// out unclaimed.
#[derive(Debug, serde::Serialize)]
pub struct NewClaimRecord<'a> {
    pub code: &'a str,
    pub order_id: &'a str,
    pub stripe_session_id: &'a str,
    pub is_claimed: bool,
    pub art_slug: &'a str,
}

impl<'a> NewClaimRecord<'a> {
    pub fn unclaimed(code: &'a ClaimCode, claim: &'a ClaimSettings) -> Self {
        Self {
            code: code.as_ref(),
            order_id: &claim.order_id,
            stripe_session_id: &claim.stripe_session_id,
            is_claimed: false,
            art_slug: &claim.art_slug,
        }
    }
}
