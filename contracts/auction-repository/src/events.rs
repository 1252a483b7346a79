use commons::{
    AuctionId, ASSET_RECLAIMED_TAG, AUCTION_CREATED_TAG, BID_CLAIMED_TAG, BID_TAG,
    BID_WITHDRAWN_TAG, LIVE_AUCTIONS_UPDATED_TAG, OWNERSHIP_TRANSFERRED_TAG, PAUSED_TAG,
    PROCEEDS_COLLECTED_TAG, UNPAUSED_TAG,
};
use concordium_std::*;

use crate::auction::AuctionTerms;

/// Auction creation event data.
#[derive(Debug, Serial)]
pub struct AuctionCreatedEvent<'a> {
    pub auction: AuctionId,
    /// Asset contract address, beneficiary and bidding window.
    pub terms: &'a AuctionTerms,
}

/// Bid and bid withdrawal event data.
#[derive(Debug, Serial)]
pub struct BidEvent<'a> {
    pub auction: AuctionId,
    /// Bidder account address.
    pub bidder: &'a AccountAddress,
    /// Bid amount.
    pub amount: Amount,
}

/// Custody handover event data.
#[derive(Debug, Serial)]
pub struct CustodyEvent<'a> {
    pub auction: AuctionId,
    /// Account that received the asset.
    pub account: &'a AccountAddress,
}

/// Proceeds payout event data.
#[derive(Debug, Serial)]
pub struct ProceedsEvent<'a> {
    pub auction: AuctionId,
    pub beneficiary: &'a AccountAddress,
    pub amount: Amount,
}

/// Live index pruning event data.
#[derive(Debug, Serial)]
pub struct LiveAuctionsUpdatedEvent<'a> {
    pub asset: &'a ContractAddress,
    /// Number of entries removed from the live index.
    pub removed: u32,
}

#[derive(Debug, Serial)]
pub struct OwnershipTransferredEvent<'a> {
    pub previous_owner: &'a Address,
    pub new_owner: &'a Address,
}

/// Pause switch event data. `auction` is empty for the repository switch.
#[derive(Debug, Serial)]
pub struct PauseEvent<'a> {
    pub auction: Option<AuctionId>,
    pub account: &'a Address,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug)]
pub enum RepositoryEvents<'a> {
    AuctionCreated(AuctionCreatedEvent<'a>),
    Bid(BidEvent<'a>),
    BidWithdrawn(BidEvent<'a>),
    BidClaimed(CustodyEvent<'a>),
    AssetReclaimed(CustodyEvent<'a>),
    ProceedsCollected(ProceedsEvent<'a>),
    LiveAuctionsUpdated(LiveAuctionsUpdatedEvent<'a>),
    OwnershipTransferred(OwnershipTransferredEvent<'a>),
    Paused(PauseEvent<'a>),
    Unpaused(PauseEvent<'a>),
}

impl<'a> RepositoryEvents<'a> {
    pub fn auction_created(auction: AuctionId, terms: &'a AuctionTerms) -> Self {
        Self::AuctionCreated(AuctionCreatedEvent { auction, terms })
    }

    pub fn bid(auction: AuctionId, bidder: &'a AccountAddress, amount: Amount) -> Self {
        Self::Bid(BidEvent {
            auction,
            bidder,
            amount,
        })
    }

    pub fn bid_withdrawn(auction: AuctionId, bidder: &'a AccountAddress, amount: Amount) -> Self {
        Self::BidWithdrawn(BidEvent {
            auction,
            bidder,
            amount,
        })
    }

    pub fn bid_claimed(auction: AuctionId, account: &'a AccountAddress) -> Self {
        Self::BidClaimed(CustodyEvent { auction, account })
    }

    pub fn asset_reclaimed(auction: AuctionId, account: &'a AccountAddress) -> Self {
        Self::AssetReclaimed(CustodyEvent { auction, account })
    }

    pub fn proceeds_collected(
        auction: AuctionId,
        beneficiary: &'a AccountAddress,
        amount: Amount,
    ) -> Self {
        Self::ProceedsCollected(ProceedsEvent {
            auction,
            beneficiary,
            amount,
        })
    }

    pub fn live_auctions_updated(asset: &'a ContractAddress, removed: u32) -> Self {
        Self::LiveAuctionsUpdated(LiveAuctionsUpdatedEvent { asset, removed })
    }

    pub fn ownership_transferred(previous_owner: &'a Address, new_owner: &'a Address) -> Self {
        Self::OwnershipTransferred(OwnershipTransferredEvent {
            previous_owner,
            new_owner,
        })
    }

    pub fn paused(auction: Option<AuctionId>, account: &'a Address) -> Self {
        Self::Paused(PauseEvent { auction, account })
    }

    pub fn unpaused(auction: Option<AuctionId>, account: &'a Address) -> Self {
        Self::Unpaused(PauseEvent { auction, account })
    }
}

impl<'a> Serial for RepositoryEvents<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            RepositoryEvents::AuctionCreated(event) => {
                out.write_u8(AUCTION_CREATED_TAG)?;
                event.serial(out)
            }
            RepositoryEvents::Bid(event) => {
                out.write_u8(BID_TAG)?;
                event.serial(out)
            }
            RepositoryEvents::BidWithdrawn(event) => {
                out.write_u8(BID_WITHDRAWN_TAG)?;
                event.serial(out)
            }
            RepositoryEvents::BidClaimed(event) => {
                out.write_u8(BID_CLAIMED_TAG)?;
                event.serial(out)
            }
            RepositoryEvents::AssetReclaimed(event) => {
                out.write_u8(ASSET_RECLAIMED_TAG)?;
                event.serial(out)
            }
            RepositoryEvents::ProceedsCollected(event) => {
                out.write_u8(PROCEEDS_COLLECTED_TAG)?;
                event.serial(out)
            }
            RepositoryEvents::LiveAuctionsUpdated(event) => {
                out.write_u8(LIVE_AUCTIONS_UPDATED_TAG)?;
                event.serial(out)
            }
            RepositoryEvents::OwnershipTransferred(event) => {
                out.write_u8(OWNERSHIP_TRANSFERRED_TAG)?;
                event.serial(out)
            }
            RepositoryEvents::Paused(event) => {
                out.write_u8(PAUSED_TAG)?;
                event.serial(out)
            }
            RepositoryEvents::Unpaused(event) => {
                out.write_u8(UNPAUSED_TAG)?;
                event.serial(out)
            }
        }
    }
}
