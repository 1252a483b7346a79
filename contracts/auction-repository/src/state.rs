use commons::{AccessControl, AuctionId, ContractResult, CustomContractError};
use concordium_std::*;

use crate::auction::{Auction, AuctionTerms, BidRecord};
use crate::external::{AuctionDetails, AuctionView};

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Repository owner and pause switch.
    pub access: AccessControl,
    /// Identifier handed to the next created auction.
    next_auction_id: AuctionId,
    /// Every auction ever created.
    auctions: StateMap<AuctionId, Auction, S>,
    /// Per asset, append only.
    all_auctions: StateMap<ContractAddress, Vec<AuctionId>, S>,
    /// Per asset, pruned by `update_live_auctions`. Order is not kept.
    live_auctions: StateMap<ContractAddress, Vec<AuctionId>, S>,
}

impl<S: HasStateApi> State<S> {
    /// Create a new state with no auctions.
    pub fn new(state_builder: &mut StateBuilder<S>, owner: Address) -> Self {
        State {
            access: AccessControl::new(owner),
            next_auction_id: 0,
            auctions: state_builder.new_map(),
            all_auctions: state_builder.new_map(),
            live_auctions: state_builder.new_map(),
        }
    }

    /// Validates the window and the live index, then stores a new auction
    /// initialized by `repository` and indexes it under its asset.
    ///
    /// Asset ownership must be checked by the caller.
    pub fn create_auction(
        &mut self,
        repository: ContractAddress,
        terms: AuctionTerms,
        slot_time: Timestamp,
    ) -> ContractResult<AuctionId> {
        ensure!(
            terms.starts_at >= slot_time,
            CustomContractError::StartsAtInPast
        );
        ensure!(
            terms.ends_at > terms.starts_at,
            CustomContractError::EndsAtBeforeStart
        );
        ensure!(
            self.live_auctions(&terms.asset).is_empty(),
            CustomContractError::DuplicateAuction
        );

        let asset = terms.asset;
        let mut auction = Auction::new(repository);
        auction.initialize(&Address::Contract(repository), terms)?;

        let id = self.next_auction_id;
        self.next_auction_id += 1;
        self.auctions.insert(id, auction);

        self.all_auctions
            .entry(asset)
            .or_insert_with(Vec::new)
            .push(id);
        self.live_auctions
            .entry(asset)
            .or_insert_with(Vec::new)
            .push(id);

        Ok(id)
    }

    /// Examines `loop_count` entries of the live index of `asset` and removes
    /// the ones whose bidding window has closed. Removal swaps the last entry
    /// into the freed slot, which is then examined next. Returns the number of
    /// removed entries.
    pub fn update_live_auctions(
        &mut self,
        asset: &ContractAddress,
        loop_count: u32,
        slot_time: Timestamp,
    ) -> ContractResult<u32> {
        let mut live = self.live_auctions(asset);
        ensure!(
            loop_count as usize <= live.len(),
            CustomContractError::LoopCountExceedsLength
        );

        let mut index = 0;
        let mut removed = 0;
        for _ in 0..loop_count {
            // Removals shrink the list below the number of remaining steps
            if index >= live.len() {
                break;
            }

            let ends_at = self
                .auctions
                .get(&live[index])
                .ok_or(CustomContractError::AuctionNotContract)?
                .terms()?
                .ends_at;
            if slot_time >= ends_at {
                live.swap_remove(index);
                removed += 1;
            } else {
                index += 1;
            }
        }

        if removed > 0 {
            self.live_auctions.insert(*asset, live);
        }

        Ok(removed)
    }

    pub fn all_auctions(&self, asset: &ContractAddress) -> Vec<AuctionId> {
        self.all_auctions
            .get(asset)
            .map(|ids| ids.to_vec())
            .unwrap_or_default()
    }

    pub fn live_auctions(&self, asset: &ContractAddress) -> Vec<AuctionId> {
        self.live_auctions
            .get(asset)
            .map(|ids| ids.to_vec())
            .unwrap_or_default()
    }

    pub fn auction(&self, id: AuctionId) -> ContractResult<Auction> {
        self.auctions
            .get(&id)
            .map(|auction| Auction::clone(&auction))
            .ok_or(CustomContractError::AuctionNotContract)
    }

    pub fn fetch_auction(&self, id: AuctionId) -> ContractResult<AuctionDetails> {
        Ok(self.auction(id)?.terms()?.into())
    }

    pub fn view_auction(
        &self,
        id: AuctionId,
        slot_time: Timestamp,
    ) -> ContractResult<AuctionView> {
        let auction = self.auction(id)?;

        Ok(AuctionView {
            details: auction.terms()?.into(),
            phase: auction.phase(slot_time)?,
            highest_bid: auction.highest_bid(),
            highest_bidder: auction.highest_bidder(),
            bid_count: auction.bid_count(),
            claimed: auction.is_claimed(),
            reclaimed: auction.is_reclaimed(),
            proceeds_collected: auction.proceeds_collected(),
            paused: auction.access().is_paused(),
        })
    }

    pub fn bid_of(
        &self,
        id: AuctionId,
        bidder: &AccountAddress,
    ) -> ContractResult<Option<BidRecord>> {
        Ok(self.auction(id)?.bid_of(bidder))
    }

    /// Applies `f` to the stored auction. On error the rejected call discards
    /// any change.
    pub fn update_auction<R>(
        &mut self,
        id: AuctionId,
        f: impl FnOnce(&mut Auction) -> ContractResult<R>,
    ) -> ContractResult<R> {
        let mut auction = self
            .auctions
            .get_mut(&id)
            .ok_or(CustomContractError::AuctionNotContract)?;
        f(&mut *auction)
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([1; 32]);
    const SELLER: AccountAddress = AccountAddress([2; 32]);
    const BIDDER: AccountAddress = AccountAddress([16; 32]);

    const REPOSITORY: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const ASSET_1: ContractAddress = ContractAddress {
        index: 16,
        subindex: 0,
    };
    const ASSET_2: ContractAddress = ContractAddress {
        index: 17,
        subindex: 0,
    };

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(millis)
    }

    fn terms(asset: ContractAddress, starts_at: u64, ends_at: u64) -> AuctionTerms {
        AuctionTerms {
            asset,
            beneficiary: SELLER,
            starts_at: at(starts_at),
            ends_at: at(ends_at),
        }
    }

    fn default_state() -> State<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        State::new(&mut state_builder, Address::Account(OWNER))
    }

    /// Asset entries are appended to the live index directly so that several
    /// live auctions of one asset can be pruned in one go.
    fn state_with_live_auctions(ends: &[u64]) -> State<TestStateApi> {
        let mut state = default_state();
        let mut ids = Vec::new();
        for ends_at in ends {
            let mut auction = Auction::new(REPOSITORY);
            auction
                .initialize(&Address::Contract(REPOSITORY), terms(ASSET_1, 0, *ends_at))
                .expect_report("Failed to initialize auction");
            let id = state.next_auction_id;
            state.next_auction_id += 1;
            state.auctions.insert(id, auction);
            ids.push(id);
        }
        state.all_auctions.insert(ASSET_1, ids.clone());
        state.live_auctions.insert(ASSET_1, ids);
        state
    }

    #[concordium_test]
    fn test_create_auction() {
        let mut state = default_state();

        let id = state.create_auction(REPOSITORY, terms(ASSET_1, 100, 200), at(100));
        claim_eq!(id, Ok(0));
        claim_eq!(state.all_auctions(&ASSET_1), vec![0]);
        claim_eq!(state.live_auctions(&ASSET_1), vec![0]);
        claim_eq!(state.all_auctions(&ASSET_2), Vec::<AuctionId>::new());
        claim_eq!(
            state.fetch_auction(0),
            Ok(AuctionDetails {
                asset: ASSET_1,
                beneficiary: SELLER,
                starts_at: at(100),
                ends_at: at(200),
            })
        );

        let auction = state
            .auction(0)
            .expect_report("Auction should have been stored");
        claim_eq!(auction.access().owner(), Address::Contract(REPOSITORY));
        claim!(auction.terms().is_ok());

        let id = state.create_auction(REPOSITORY, terms(ASSET_2, 150, 300), at(100));
        claim_eq!(id, Ok(1));
        claim_eq!(state.all_auctions(&ASSET_2), vec![1]);
    }

    #[concordium_test]
    fn test_create_auction_window() {
        let mut state = default_state();

        claim_eq!(
            state.create_auction(REPOSITORY, terms(ASSET_1, 99, 200), at(100)),
            Err(CustomContractError::StartsAtInPast)
        );
        claim_eq!(
            state.create_auction(REPOSITORY, terms(ASSET_1, 200, 200), at(100)),
            Err(CustomContractError::EndsAtBeforeStart)
        );
        claim_eq!(
            state.create_auction(REPOSITORY, terms(ASSET_1, 200, 150), at(100)),
            Err(CustomContractError::EndsAtBeforeStart)
        );
        claim_eq!(state.all_auctions(&ASSET_1), Vec::<AuctionId>::new());
        claim_eq!(
            state.fetch_auction(0),
            Err(CustomContractError::AuctionNotContract)
        );
    }

    #[concordium_test]
    fn test_create_auction_duplicate() {
        let mut state = default_state();

        claim_eq!(
            state.create_auction(REPOSITORY, terms(ASSET_1, 100, 200), at(100)),
            Ok(0)
        );
        claim_eq!(
            state.create_auction(REPOSITORY, terms(ASSET_1, 300, 400), at(250)),
            Err(CustomContractError::DuplicateAuction)
        );

        // Relisting is possible once the expired entry was pruned
        claim_eq!(state.update_live_auctions(&ASSET_1, 1, at(250)), Ok(1));
        claim_eq!(
            state.create_auction(REPOSITORY, terms(ASSET_1, 300, 400), at(250)),
            Ok(1)
        );
        claim_eq!(state.all_auctions(&ASSET_1), vec![0, 1]);
        claim_eq!(state.live_auctions(&ASSET_1), vec![1]);
    }

    #[concordium_test]
    fn test_update_live_auctions_loop_count() {
        let mut state = default_state();

        claim_eq!(
            state.update_live_auctions(&ASSET_1, 1, at(0)),
            Err(CustomContractError::LoopCountExceedsLength)
        );
        claim_eq!(state.update_live_auctions(&ASSET_1, 0, at(0)), Ok(0));

        let mut state = state_with_live_auctions(&[100, 200]);
        claim_eq!(
            state.update_live_auctions(&ASSET_1, 3, at(1000)),
            Err(CustomContractError::LoopCountExceedsLength)
        );
        claim_eq!(state.live_auctions(&ASSET_1), vec![0, 1]);
    }

    #[concordium_test]
    fn test_update_live_auctions_keeps_running() {
        let mut state = state_with_live_auctions(&[100, 200, 300]);

        claim_eq!(state.update_live_auctions(&ASSET_1, 3, at(99)), Ok(0));
        claim_eq!(state.live_auctions(&ASSET_1), vec![0, 1, 2]);
    }

    #[concordium_test]
    fn test_update_live_auctions_swap_and_pop() {
        // Auctions 0 and 2 have ended, 1 and 3 are running
        let mut state = state_with_live_auctions(&[100, 500, 100, 500]);

        // Examines only the first entry: 0 is removed and 3 takes its slot
        claim_eq!(state.update_live_auctions(&ASSET_1, 1, at(200)), Ok(1));
        claim_eq!(state.live_auctions(&ASSET_1), vec![3, 1, 2]);

        // Examines 3, 1 and 2, removing 2
        claim_eq!(state.update_live_auctions(&ASSET_1, 3, at(200)), Ok(1));
        claim_eq!(state.live_auctions(&ASSET_1), vec![3, 1]);

        // History is untouched
        claim_eq!(state.all_auctions(&ASSET_1), vec![0, 1, 2, 3]);
    }

    #[concordium_test]
    fn test_update_live_auctions_all_ended() {
        let mut state = state_with_live_auctions(&[100, 200, 300]);

        claim_eq!(state.update_live_auctions(&ASSET_1, 3, at(300)), Ok(3));
        claim_eq!(state.live_auctions(&ASSET_1), Vec::<AuctionId>::new());
        claim_eq!(state.all_auctions(&ASSET_1), vec![0, 1, 2]);
    }

    #[concordium_test]
    fn test_update_auction() {
        let mut state = default_state();
        claim_eq!(
            state.create_auction(REPOSITORY, terms(ASSET_1, 100, 200), at(100)),
            Ok(0)
        );

        let result = state.update_auction(0, |auction| {
            auction.place_bid(BIDDER, Amount::from_ccd(1), at(150))
        });
        claim_eq!(result, Ok(None));
        claim_eq!(
            state.bid_of(0, &BIDDER),
            Ok(Some(BidRecord {
                amount: Amount::from_ccd(1),
                withdrawn: false,
            }))
        );

        let view = state
            .view_auction(0, at(150))
            .expect_report("Auction should be viewable");
        claim_eq!(view.highest_bid, Amount::from_ccd(1));
        claim_eq!(view.highest_bidder, Some(BIDDER));
        claim_eq!(view.bid_count, 1);

        claim_eq!(
            state.update_auction(7, |auction| {
                auction.pause(&Address::Contract(REPOSITORY))
            }),
            Err(CustomContractError::AuctionNotContract)
        );
        claim_eq!(
            state.bid_of(7, &BIDDER),
            Err(CustomContractError::AuctionNotContract)
        );
    }
}
