/// Tag for the AuctionCreated event.
pub const AUCTION_CREATED_TAG: u8 = u8::MAX;

/// Tag for the Bid event.
pub const BID_TAG: u8 = u8::MAX - 1;

/// Tag for the BidWithdrawn event.
pub const BID_WITHDRAWN_TAG: u8 = u8::MAX - 2;

/// Tag for the BidClaimed event.
pub const BID_CLAIMED_TAG: u8 = u8::MAX - 3;

/// Tag for the AssetReclaimed event.
pub const ASSET_RECLAIMED_TAG: u8 = u8::MAX - 4;

/// Tag for the ProceedsCollected event.
pub const PROCEEDS_COLLECTED_TAG: u8 = u8::MAX - 5;

/// Tag for the LiveAuctionsUpdated event.
pub const LIVE_AUCTIONS_UPDATED_TAG: u8 = u8::MAX - 6;

/// Tag for the OwnershipTransferred event.
pub const OWNERSHIP_TRANSFERRED_TAG: u8 = u8::MAX - 7;

/// Tag for the Paused event.
pub const PAUSED_TAG: u8 = u8::MAX - 8;

/// Tag for the Unpaused event.
pub const UNPAUSED_TAG: u8 = u8::MAX - 9;

/// Asset entrypoint returning the current owner `Address`.
pub const ASSET_OWNER_ENTRYPOINT: &str = "owner";

/// Asset entrypoint handing ownership to the `Address` passed as parameter.
pub const ASSET_TRANSFER_OWNERSHIP_ENTRYPOINT: &str = "transferOwnership";
