use commons::AuctionId;
use concordium_std::*;

use crate::auction::{AuctionPhase, AuctionTerms};

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct CreateAuctionParams {
    /// Asset contract. Account addresses are rejected.
    pub asset: Address,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct UpdateLiveAuctionsParams {
    pub asset: Address,
    /// Number of live index entries to examine.
    pub loop_count: u32,
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct BidQueryParams {
    pub auction: AuctionId,
    pub bidder: AccountAddress,
}

#[derive(Debug, Clone, SchemaType, Serialize, PartialEq, Eq)]
pub struct AuctionDetails {
    pub asset: ContractAddress,
    pub beneficiary: AccountAddress,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

impl From<&AuctionTerms> for AuctionDetails {
    fn from(terms: &AuctionTerms) -> Self {
        Self {
            asset: terms.asset,
            beneficiary: terms.beneficiary,
            starts_at: terms.starts_at,
            ends_at: terms.ends_at,
        }
    }
}

/// Full auction record as seen at the current slot time.
#[derive(Debug, Clone, SchemaType, Serialize, PartialEq, Eq)]
pub struct AuctionView {
    pub details: AuctionDetails,
    pub phase: AuctionPhase,
    pub highest_bid: Amount,
    pub highest_bidder: Option<AccountAddress>,
    pub bid_count: u32,
    pub claimed: bool,
    pub reclaimed: bool,
    pub proceeds_collected: bool,
    pub paused: bool,
}
