mod claim_code;
mod claim_record;

pub use claim_code::ClaimCode;
pub use claim_record::NewClaimRecord;
