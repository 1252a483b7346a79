use commons::{AccessControl, ContractResult, CustomContractError};
use concordium_std::{collections::BTreeMap, *};

/// Upper bound on distinct bidders of one auction.
pub const MAX_BIDS: usize = u16::MAX as usize;

/// Lifecycle phase of an auction, derived from the slot time and the terminal
/// flags. Never stored.
#[derive(Debug, Clone, Copy, Serialize, SchemaType, PartialEq, Eq)]
pub enum AuctionPhase {
    /// Bidding window has not opened yet.
    Pending,
    /// Bids are accepted.
    Active,
    /// Window is closed and neither a claim nor a reclaim happened yet.
    EndedUnclaimed,
    /// Highest bidder took custody of the asset.
    Claimed,
    /// Original owner took the asset back.
    Reclaimed,
}

/// Values fixed by the one-time initialization.
#[derive(Debug, Clone, Serialize, SchemaType, PartialEq, Eq)]
pub struct AuctionTerms {
    /// Asset contract the auction holds custody of.
    pub asset: ContractAddress,
    /// Original owner of the asset. Receives the proceeds, or the asset back if
    /// nobody bid.
    pub beneficiary: AccountAddress,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

#[derive(Debug, Clone, Copy, Serialize, SchemaType, PartialEq, Eq)]
pub struct BidRecord {
    pub amount: Amount,
    /// Set once the escrowed amount was paid back to the bidder.
    pub withdrawn: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Auction {
    /// Repository that created the auction. Only it may initialize.
    repository: ContractAddress,
    /// Owner is the repository.
    access: AccessControl,
    terms: Option<AuctionTerms>,
    highest_bid: Amount,
    highest_bidder: Option<AccountAddress>,
    /// One entry per bidder, kept for escrow bookkeeping.
    #[concordium(size_length = 2)]
    bids: BTreeMap<AccountAddress, BidRecord>,
    claimed: bool,
    reclaimed: bool,
    proceeds_collected: bool,
}

impl Auction {
    pub fn new(repository: ContractAddress) -> Self {
        Self {
            repository,
            access: AccessControl::new(Address::Contract(repository)),
            terms: None,
            highest_bid: Amount::zero(),
            highest_bidder: None,
            bids: BTreeMap::new(),
            claimed: false,
            reclaimed: false,
            proceeds_collected: false,
        }
    }

    /// Sets the immutable terms. Allowed exactly once, and only for the
    /// creating repository.
    pub fn initialize(
        &mut self,
        caller: &Address,
        terms: AuctionTerms,
    ) -> ContractResult<()> {
        ensure!(
            self.terms.is_none(),
            CustomContractError::AlreadyInitialized
        );
        ensure_eq!(
            caller,
            &Address::Contract(self.repository),
            CustomContractError::NotRepository
        );
        ensure!(
            terms.starts_at < terms.ends_at,
            CustomContractError::EndsAtBeforeStart
        );

        self.terms = Some(terms);
        Ok(())
    }

    pub fn terms(&self) -> ContractResult<&AuctionTerms> {
        self.terms
            .as_ref()
            .ok_or(CustomContractError::NotInitialized)
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn highest_bid(&self) -> Amount {
        self.highest_bid
    }

    pub fn highest_bidder(&self) -> Option<AccountAddress> {
        self.highest_bidder
    }

    pub fn bid_of(&self, bidder: &AccountAddress) -> Option<BidRecord> {
        self.bids.get(bidder).copied()
    }

    pub fn bid_count(&self) -> u32 {
        self.bids.len() as u32
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    pub fn is_reclaimed(&self) -> bool {
        self.reclaimed
    }

    pub fn proceeds_collected(&self) -> bool {
        self.proceeds_collected
    }

    pub fn phase(&self, now: Timestamp) -> ContractResult<AuctionPhase> {
        let terms = self.terms()?;

        let phase = if self.claimed {
            AuctionPhase::Claimed
        } else if self.reclaimed {
            AuctionPhase::Reclaimed
        } else if now < terms.starts_at {
            AuctionPhase::Pending
        } else if now < terms.ends_at {
            AuctionPhase::Active
        } else {
            AuctionPhase::EndedUnclaimed
        };

        Ok(phase)
    }

    /// Records a bid and makes it the leading one. Returns the previous leader,
    /// whose bid stays in escrow until they withdraw it.
    pub fn place_bid(
        &mut self,
        bidder: AccountAddress,
        amount: Amount,
        now: Timestamp,
    ) -> ContractResult<Option<AccountAddress>> {
        self.access.ensure_not_paused()?;

        match self.phase(now)? {
            AuctionPhase::Pending => bail!(CustomContractError::AuctionNotStarted),
            AuctionPhase::Active => (),
            _ => bail!(CustomContractError::AuctionEnded),
        }

        // A bidder gets a single bid per auction, raising included
        ensure!(
            !self.bids.contains_key(&bidder),
            CustomContractError::AlreadyBid
        );
        ensure!(amount > self.highest_bid, CustomContractError::BidTooLow);
        // Ledger length is serialized as a u16
        ensure!(
            self.bids.len() < MAX_BIDS,
            CustomContractError::TooManyBids
        );

        self.bids.insert(
            bidder,
            BidRecord {
                amount,
                withdrawn: false,
            },
        );
        self.highest_bid = amount;

        Ok(self.highest_bidder.replace(bidder))
    }

    /// Marks the escrowed bid of `caller` as withdrawn and returns the amount
    /// owed. The caller must pay it out in the same transaction.
    pub fn withdraw_bid(
        &mut self,
        caller: &AccountAddress,
        now: Timestamp,
    ) -> ContractResult<Amount> {
        self.access.ensure_not_paused()?;
        self.ensure_ended(now)?;

        ensure!(
            self.highest_bidder.as_ref() != Some(caller),
            CustomContractError::HighestBidderCannotWithdraw
        );

        let record = self
            .bids
            .get_mut(caller)
            .filter(|record| !record.withdrawn)
            .ok_or(CustomContractError::NoBidToWithdraw)?;
        record.withdrawn = true;

        Ok(record.amount)
    }

    /// Returns the asset that has to be handed to the highest bidder.
    pub fn claim_possession(
        &mut self,
        caller: &AccountAddress,
        now: Timestamp,
    ) -> ContractResult<ContractAddress> {
        self.access.ensure_not_paused()?;
        self.ensure_ended(now)?;

        ensure!(
            self.highest_bidder.as_ref() == Some(caller),
            CustomContractError::NotHighestBidder
        );
        ensure!(!self.claimed, CustomContractError::AlreadyClaimed);

        self.claimed = true;
        Ok(self.terms()?.asset)
    }

    /// Returns the asset that has to be handed back to the original owner.
    pub fn reclaim_asset(
        &mut self,
        caller: &AccountAddress,
        now: Timestamp,
    ) -> ContractResult<ContractAddress> {
        self.access.ensure_not_paused()?;
        self.ensure_ended(now)?;

        let asset = self.ensure_beneficiary(caller)?;
        ensure!(
            self.highest_bidder.is_none(),
            CustomContractError::BidPlacedCannotReclaim
        );
        ensure!(!self.reclaimed, CustomContractError::AlreadyReclaimed);

        self.reclaimed = true;
        Ok(asset)
    }

    /// Returns the winning bid owed to the beneficiary.
    pub fn collect_proceeds(
        &mut self,
        caller: &AccountAddress,
        now: Timestamp,
    ) -> ContractResult<Amount> {
        self.access.ensure_not_paused()?;
        self.ensure_ended(now)?;

        self.ensure_beneficiary(caller)?;
        ensure!(
            self.highest_bidder.is_some(),
            CustomContractError::NoProceeds
        );
        ensure!(
            !self.proceeds_collected,
            CustomContractError::ProceedsAlreadyCollected
        );

        self.proceeds_collected = true;
        Ok(self.highest_bid)
    }

    pub fn pause(&mut self, sender: &Address) -> ContractResult<()> {
        self.access.pause(sender)
    }

    pub fn unpause(&mut self, sender: &Address) -> ContractResult<()> {
        self.access.unpause(sender)
    }

    fn ensure_ended(&self, now: Timestamp) -> ContractResult<()> {
        ensure!(
            now >= self.terms()?.ends_at,
            CustomContractError::AuctionNotEnded
        );
        Ok(())
    }

    fn ensure_beneficiary(
        &self,
        caller: &AccountAddress,
    ) -> ContractResult<ContractAddress> {
        let terms = self.terms()?;
        ensure_eq!(
            caller,
            &terms.beneficiary,
            CustomContractError::NotOriginalOwner
        );
        Ok(terms.asset)
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    const REPOSITORY: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const ASSET: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };

    const SELLER: AccountAddress = AccountAddress([1; 32]);
    const BIDDER_1: AccountAddress = AccountAddress([16; 32]);
    const BIDDER_2: AccountAddress = AccountAddress([17; 32]);
    const BIDDER_3: AccountAddress = AccountAddress([18; 32]);

    const STARTS_AT: u64 = 1_000_000;
    const ENDS_AT: u64 = 2_000_000;

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(millis)
    }

    fn default_terms() -> AuctionTerms {
        AuctionTerms {
            asset: ASSET,
            beneficiary: SELLER,
            starts_at: at(STARTS_AT),
            ends_at: at(ENDS_AT),
        }
    }

    fn default_auction() -> Auction {
        let mut auction = Auction::new(REPOSITORY);
        auction
            .initialize(&Address::Contract(REPOSITORY), default_terms())
            .expect_report("Failed to initialize auction");
        auction
    }

    #[concordium_test]
    fn test_initialize_once() {
        let mut auction = Auction::new(REPOSITORY);
        claim_eq!(auction.terms(), Err(CustomContractError::NotInitialized));
        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_ccd(1), at(STARTS_AT)),
            Err(CustomContractError::NotInitialized)
        );

        claim_eq!(
            auction.initialize(&Address::Account(SELLER), default_terms()),
            Err(CustomContractError::NotRepository)
        );
        claim_eq!(
            auction.initialize(
                &Address::Contract(REPOSITORY),
                AuctionTerms {
                    ends_at: at(STARTS_AT),
                    ..default_terms()
                }
            ),
            Err(CustomContractError::EndsAtBeforeStart)
        );
        claim_eq!(
            auction.initialize(&Address::Contract(REPOSITORY), default_terms()),
            Ok(())
        );
        claim_eq!(auction.terms(), Ok(&default_terms()));
        claim_eq!(
            auction.initialize(&Address::Contract(REPOSITORY), default_terms()),
            Err(CustomContractError::AlreadyInitialized)
        );
        claim_eq!(
            auction.access().owner(),
            Address::Contract(REPOSITORY)
        );
    }

    #[concordium_test]
    fn test_phase() {
        let auction = default_auction();

        claim_eq!(auction.phase(at(STARTS_AT - 1)), Ok(AuctionPhase::Pending));
        claim_eq!(auction.phase(at(STARTS_AT)), Ok(AuctionPhase::Active));
        claim_eq!(auction.phase(at(ENDS_AT - 1)), Ok(AuctionPhase::Active));
        claim_eq!(
            auction.phase(at(ENDS_AT)),
            Ok(AuctionPhase::EndedUnclaimed)
        );

        let mut claimed = default_auction();
        claim_eq!(
            claimed.place_bid(BIDDER_1, Amount::from_ccd(1), at(STARTS_AT)),
            Ok(None)
        );
        claim_eq!(claimed.claim_possession(&BIDDER_1, at(ENDS_AT)), Ok(ASSET));
        claim_eq!(claimed.phase(at(ENDS_AT)), Ok(AuctionPhase::Claimed));

        let mut reclaimed = default_auction();
        claim_eq!(reclaimed.reclaim_asset(&SELLER, at(ENDS_AT)), Ok(ASSET));
        claim_eq!(reclaimed.phase(at(ENDS_AT)), Ok(AuctionPhase::Reclaimed));
    }

    #[concordium_test]
    fn test_place_bid_window() {
        let mut auction = default_auction();

        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_ccd(1), at(STARTS_AT - 1)),
            Err(CustomContractError::AuctionNotStarted)
        );
        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_ccd(1), at(ENDS_AT)),
            Err(CustomContractError::AuctionEnded)
        );
        claim_eq!(auction.bid_count(), 0);
    }

    #[concordium_test]
    fn test_place_bid_monotonic() {
        let mut auction = default_auction();
        let now = at(STARTS_AT + 1);

        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::zero(), now),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_micro_ccd(100), now),
            Ok(None)
        );
        claim_eq!(
            auction.place_bid(BIDDER_2, Amount::from_micro_ccd(100), now),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(
            auction.place_bid(BIDDER_2, Amount::from_micro_ccd(101), now),
            Ok(Some(BIDDER_1))
        );
        claim_eq!(
            auction.place_bid(BIDDER_3, Amount::from_micro_ccd(99), now),
            Err(CustomContractError::BidTooLow)
        );

        claim_eq!(auction.highest_bid(), Amount::from_micro_ccd(101));
        claim_eq!(auction.highest_bidder(), Some(BIDDER_2));
        claim_eq!(
            auction.bid_of(&BIDDER_1),
            Some(BidRecord {
                amount: Amount::from_micro_ccd(100),
                withdrawn: false,
            })
        );
        claim_eq!(auction.bid_of(&BIDDER_3), None);
    }

    #[concordium_test]
    fn test_place_bid_once_per_bidder() {
        let mut auction = default_auction();
        let now = at(STARTS_AT);

        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_ccd(1), now),
            Ok(None)
        );
        claim_eq!(
            auction.place_bid(BIDDER_2, Amount::from_ccd(2), now),
            Ok(Some(BIDDER_1))
        );
        // Raising a previous bid is rejected as well
        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_ccd(3), now),
            Err(CustomContractError::AlreadyBid)
        );
        claim_eq!(
            auction.place_bid(BIDDER_2, Amount::from_ccd(3), now),
            Err(CustomContractError::AlreadyBid)
        );
    }

    #[concordium_test]
    fn test_place_bid_ledger_full() {
        let mut auction = default_auction();
        let now = at(STARTS_AT);

        for n in 0..MAX_BIDS as u64 {
            let mut bytes = [0u8; 32];
            bytes[..8].copy_from_slice(&n.to_le_bytes());
            claim!(auction
                .place_bid(AccountAddress(bytes), Amount::from_micro_ccd(n + 1), now)
                .is_ok());
        }
        claim_eq!(auction.bid_count(), MAX_BIDS as u32);
        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_ccd(1_000), now),
            Err(CustomContractError::TooManyBids)
        );

        // A full ledger still fits the u16 length prefix
        let bytes = to_bytes(&auction);
        claim_eq!(from_bytes::<Auction>(&bytes).ok(), Some(auction));
    }

    #[concordium_test]
    fn test_withdraw_bid() {
        let mut auction = default_auction();
        let now = at(STARTS_AT);

        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_micro_ccd(100), now),
            Ok(None)
        );
        claim_eq!(
            auction.place_bid(BIDDER_2, Amount::from_micro_ccd(101), now),
            Ok(Some(BIDDER_1))
        );

        claim_eq!(
            auction.withdraw_bid(&BIDDER_1, at(ENDS_AT - 1)),
            Err(CustomContractError::AuctionNotEnded)
        );
        claim_eq!(
            auction.withdraw_bid(&BIDDER_2, at(ENDS_AT)),
            Err(CustomContractError::HighestBidderCannotWithdraw)
        );
        claim_eq!(
            auction.withdraw_bid(&BIDDER_3, at(ENDS_AT)),
            Err(CustomContractError::NoBidToWithdraw)
        );
        claim_eq!(
            auction.withdraw_bid(&BIDDER_1, at(ENDS_AT)),
            Ok(Amount::from_micro_ccd(100))
        );
        claim_eq!(
            auction.withdraw_bid(&BIDDER_1, at(ENDS_AT + 1)),
            Err(CustomContractError::NoBidToWithdraw)
        );
        claim!(auction.bid_of(&BIDDER_1).map_or(false, |bid| bid.withdrawn));
    }

    #[concordium_test]
    fn test_claim_possession() {
        let mut auction = default_auction();

        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_ccd(1), at(STARTS_AT)),
            Ok(None)
        );
        claim_eq!(
            auction.claim_possession(&BIDDER_1, at(ENDS_AT - 1)),
            Err(CustomContractError::AuctionNotEnded)
        );
        claim_eq!(
            auction.claim_possession(&BIDDER_2, at(ENDS_AT)),
            Err(CustomContractError::NotHighestBidder)
        );
        claim_eq!(
            auction.claim_possession(&SELLER, at(ENDS_AT)),
            Err(CustomContractError::NotHighestBidder)
        );
        claim_eq!(auction.claim_possession(&BIDDER_1, at(ENDS_AT)), Ok(ASSET));
        claim!(auction.is_claimed());
        claim_eq!(
            auction.claim_possession(&BIDDER_1, at(ENDS_AT + 1)),
            Err(CustomContractError::AlreadyClaimed)
        );
        claim_eq!(
            auction.reclaim_asset(&SELLER, at(ENDS_AT)),
            Err(CustomContractError::BidPlacedCannotReclaim)
        );
    }

    #[concordium_test]
    fn test_reclaim_asset() {
        let mut auction = default_auction();

        claim_eq!(
            auction.reclaim_asset(&SELLER, at(ENDS_AT - 1)),
            Err(CustomContractError::AuctionNotEnded)
        );
        claim_eq!(
            auction.reclaim_asset(&BIDDER_1, at(ENDS_AT)),
            Err(CustomContractError::NotOriginalOwner)
        );
        claim_eq!(auction.reclaim_asset(&SELLER, at(ENDS_AT)), Ok(ASSET));
        claim!(auction.is_reclaimed());
        claim_eq!(
            auction.reclaim_asset(&SELLER, at(ENDS_AT)),
            Err(CustomContractError::AlreadyReclaimed)
        );
        claim_eq!(
            auction.collect_proceeds(&SELLER, at(ENDS_AT)),
            Err(CustomContractError::NoProceeds)
        );
    }

    #[concordium_test]
    fn test_reclaim_after_bid() {
        let mut auction = default_auction();

        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_ccd(1), at(STARTS_AT)),
            Ok(None)
        );
        claim_eq!(
            auction.reclaim_asset(&SELLER, at(ENDS_AT)),
            Err(CustomContractError::BidPlacedCannotReclaim)
        );
        claim!(!auction.is_reclaimed());
    }

    #[concordium_test]
    fn test_collect_proceeds() {
        let mut auction = default_auction();

        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_ccd(5), at(STARTS_AT)),
            Ok(None)
        );
        claim_eq!(
            auction.collect_proceeds(&SELLER, at(ENDS_AT - 1)),
            Err(CustomContractError::AuctionNotEnded)
        );
        claim_eq!(
            auction.collect_proceeds(&BIDDER_1, at(ENDS_AT)),
            Err(CustomContractError::NotOriginalOwner)
        );
        claim_eq!(
            auction.collect_proceeds(&SELLER, at(ENDS_AT)),
            Ok(Amount::from_ccd(5))
        );
        claim!(auction.proceeds_collected());
        claim_eq!(
            auction.collect_proceeds(&SELLER, at(ENDS_AT)),
            Err(CustomContractError::ProceedsAlreadyCollected)
        );
    }

    #[concordium_test]
    fn test_pause_blocks_mutations() {
        let mut auction = default_auction();
        let repository = Address::Contract(REPOSITORY);

        claim_eq!(
            auction.place_bid(BIDDER_1, Amount::from_ccd(1), at(STARTS_AT)),
            Ok(None)
        );
        claim_eq!(
            auction.place_bid(BIDDER_2, Amount::from_ccd(2), at(STARTS_AT)),
            Ok(Some(BIDDER_1))
        );

        claim_eq!(
            auction.pause(&Address::Account(SELLER)),
            Err(CustomContractError::NotOwner)
        );
        claim_eq!(auction.pause(&repository), Ok(()));
        claim!(auction.access().is_paused());

        claim_eq!(
            auction.place_bid(BIDDER_3, Amount::from_ccd(3), at(STARTS_AT)),
            Err(CustomContractError::Paused)
        );
        claim_eq!(
            auction.withdraw_bid(&BIDDER_1, at(ENDS_AT)),
            Err(CustomContractError::Paused)
        );
        claim_eq!(
            auction.claim_possession(&BIDDER_2, at(ENDS_AT)),
            Err(CustomContractError::Paused)
        );
        claim_eq!(
            auction.reclaim_asset(&SELLER, at(ENDS_AT)),
            Err(CustomContractError::Paused)
        );
        claim_eq!(
            auction.collect_proceeds(&SELLER, at(ENDS_AT)),
            Err(CustomContractError::Paused)
        );

        claim_eq!(auction.unpause(&repository), Ok(()));
        claim_eq!(
            auction.withdraw_bid(&BIDDER_1, at(ENDS_AT)),
            Ok(Amount::from_ccd(1))
        );
        claim_eq!(auction.claim_possession(&BIDDER_2, at(ENDS_AT)), Ok(ASSET));
    }
}
