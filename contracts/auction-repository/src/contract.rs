use commons::{
    custody_call_error, custody_read_error, AuctionId, ContractResult, CustomContractError,
    HostAssetCustodyExt,
};
use concordium_std::*;

use crate::auction::{AuctionTerms, BidRecord};
use crate::events::*;
use crate::external::*;
use crate::state::State;

/// Initialize the repository with the init origin as owner and no auctions.
#[init(contract = "AuctionRepository")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    Ok(State::new(
        state_builder,
        Address::Account(ctx.init_origin()),
    ))
}

/// Create an auction for an asset owned by the sender and take custody of it.
///
///  It rejects if:
///  - Fails to parse `CreateAuctionParams` parameters.
///  - The repository is paused.
///  - The asset is not a contract exposing `owner` and `transferOwnership`.
///  - Sender is not the current asset owner, or is not an account.
///  - The bidding window starts in the past or ends before it starts.
///  - The asset still has an entry in its live index.
#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "createAuction",
    parameter = "CreateAuctionParams",
    return_value = "AuctionId",
    enable_logger
)]
fn contract_create_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<AuctionId> {
    let params = CreateAuctionParams::deserial(&mut ctx.parameter_cursor())?;
    host.state().access.ensure_not_paused()?;

    let asset = asset_contract(&params.asset)?;
    let owner = host.asset_owner(&asset).map_err(custody_read_error)?;
    ensure_eq!(
        owner,
        ctx.sender(),
        CustomContractError::NotAssetOwner.into()
    );
    let beneficiary = sender_account(ctx)?;

    let terms = AuctionTerms {
        asset,
        beneficiary,
        starts_at: params.starts_at,
        ends_at: params.ends_at,
    };
    let repository = ctx.self_address();
    let id = host.state_mut().create_auction(
        repository,
        terms.clone(),
        ctx.metadata().slot_time(),
    )?;

    // Custody is held by the repository on behalf of the auction
    host.asset_transfer_ownership(&asset, &Address::Contract(repository))
        .map_err(custody_call_error)?;

    logger.log(&RepositoryEvents::auction_created(id, &terms))?;

    Ok(id)
}

/// Prune up to `loop_count` entries with a closed bidding window from the live
/// index of an asset.
///
///  It rejects if:
///  - Sender is not the repository owner.
///  - The repository is paused.
///  - The asset is an account address.
///  - `loop_count` exceeds the length of the live index.
#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "updateLiveAuctions",
    parameter = "UpdateLiveAuctionsParams",
    enable_logger
)]
fn contract_update_live_auctions<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let params = UpdateLiveAuctionsParams::deserial(&mut ctx.parameter_cursor())?;
    host.state().access.ensure_owner(&ctx.sender())?;
    host.state().access.ensure_not_paused()?;

    let asset = asset_contract(&params.asset)?;
    let removed = host.state_mut().update_live_auctions(
        &asset,
        params.loop_count,
        ctx.metadata().slot_time(),
    )?;

    logger.log(&RepositoryEvents::live_auctions_updated(&asset, removed))?;

    Ok(())
}

#[receive(
    contract = "AuctionRepository",
    name = "getAllAuctions",
    parameter = "Address",
    return_value = "Vec<AuctionId>"
)]
fn contract_get_all_auctions<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<AuctionId>> {
    let asset = Address::deserial(&mut ctx.parameter_cursor())?;
    let asset = asset_contract(&asset)?;
    Ok(host.state().all_auctions(&asset))
}

#[receive(
    contract = "AuctionRepository",
    name = "getLiveAuctions",
    parameter = "Address",
    return_value = "Vec<AuctionId>"
)]
fn contract_get_live_auctions<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<AuctionId>> {
    let asset = Address::deserial(&mut ctx.parameter_cursor())?;
    let asset = asset_contract(&asset)?;
    Ok(host.state().live_auctions(&asset))
}

#[receive(
    contract = "AuctionRepository",
    name = "fetchAuction",
    parameter = "AuctionId",
    return_value = "AuctionDetails"
)]
fn contract_fetch_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<AuctionDetails> {
    let id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().fetch_auction(id)?)
}

/// Bid the attached CCD. The outbid leader keeps the bid in escrow and
/// withdraws it after the auction ends.
#[receive(
    mutable,
    payable,
    contract = "AuctionRepository",
    name = "bid",
    parameter = "AuctionId",
    enable_logger
)]
fn contract_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    let bidder = sender_account(ctx)?;
    let slot_time = ctx.metadata().slot_time();

    host.state_mut()
        .update_auction(id, |auction| auction.place_bid(bidder, amount, slot_time))?;

    logger.log(&RepositoryEvents::bid(id, &bidder, amount))?;

    Ok(())
}

#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "withdrawBid",
    parameter = "AuctionId",
    enable_logger
)]
fn contract_withdraw_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    let bidder = sender_account(ctx)?;
    let slot_time = ctx.metadata().slot_time();

    // Bid is marked withdrawn before paying out
    let amount = host
        .state_mut()
        .update_auction(id, |auction| auction.withdraw_bid(&bidder, slot_time))?;
    host.invoke_transfer(&bidder, amount)
        .map_err(CustomContractError::from)?;

    logger.log(&RepositoryEvents::bid_withdrawn(id, &bidder, amount))?;

    Ok(())
}

#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "claimPossession",
    parameter = "AuctionId",
    enable_logger
)]
fn contract_claim_possession<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    let claimant = sender_account(ctx)?;
    let slot_time = ctx.metadata().slot_time();

    let asset = host
        .state_mut()
        .update_auction(id, |auction| auction.claim_possession(&claimant, slot_time))?;
    host.asset_transfer_ownership(&asset, &Address::Account(claimant))
        .map_err(custody_call_error)?;

    logger.log(&RepositoryEvents::bid_claimed(id, &claimant))?;

    Ok(())
}

#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "reclaimAsset",
    parameter = "AuctionId",
    enable_logger
)]
fn contract_reclaim_asset<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    let owner = sender_account(ctx)?;
    let slot_time = ctx.metadata().slot_time();

    let asset = host
        .state_mut()
        .update_auction(id, |auction| auction.reclaim_asset(&owner, slot_time))?;
    host.asset_transfer_ownership(&asset, &Address::Account(owner))
        .map_err(custody_call_error)?;

    logger.log(&RepositoryEvents::asset_reclaimed(id, &owner))?;

    Ok(())
}

/// Pay the winning bid out to the beneficiary.
#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "collectProceeds",
    parameter = "AuctionId",
    enable_logger
)]
fn contract_collect_proceeds<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    let beneficiary = sender_account(ctx)?;
    let slot_time = ctx.metadata().slot_time();

    let amount = host
        .state_mut()
        .update_auction(id, |auction| auction.collect_proceeds(&beneficiary, slot_time))?;
    host.invoke_transfer(&beneficiary, amount)
        .map_err(CustomContractError::from)?;

    logger.log(&RepositoryEvents::proceeds_collected(
        id,
        &beneficiary,
        amount,
    ))?;

    Ok(())
}

#[receive(
    contract = "AuctionRepository",
    name = "viewAuction",
    parameter = "AuctionId",
    return_value = "AuctionView"
)]
fn contract_view_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<AuctionView> {
    let id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().view_auction(id, ctx.metadata().slot_time())?)
}

#[receive(
    contract = "AuctionRepository",
    name = "viewBid",
    parameter = "BidQueryParams",
    return_value = "Option<BidRecord>"
)]
fn contract_view_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Option<BidRecord>> {
    let params = BidQueryParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().bid_of(params.auction, &params.bidder)?)
}

#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "transferOwnership",
    parameter = "Address",
    enable_logger
)]
fn contract_transfer_ownership<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let new_owner = Address::deserial(&mut ctx.parameter_cursor())?;
    let previous_owner = host
        .state_mut()
        .access
        .transfer_ownership(&ctx.sender(), new_owner)?;

    logger.log(&RepositoryEvents::ownership_transferred(
        &previous_owner,
        &new_owner,
    ))?;

    Ok(())
}

/// Pause auction creation and live index pruning.
#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "pause",
    enable_logger
)]
fn contract_pause<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let sender = ctx.sender();
    host.state_mut().access.pause(&sender)?;
    logger.log(&RepositoryEvents::paused(None, &sender))?;
    Ok(())
}

#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "unpause",
    enable_logger
)]
fn contract_unpause<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let sender = ctx.sender();
    host.state_mut().access.unpause(&sender)?;
    logger.log(&RepositoryEvents::unpaused(None, &sender))?;
    Ok(())
}

/// Pause bidding, withdrawals, claims and payouts of a single auction.
///
///  It rejects if:
///  - Sender is not the repository owner.
///  - The auction does not exist or is already paused.
#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "pauseAuction",
    parameter = "AuctionId",
    enable_logger
)]
fn contract_pause_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();
    host.state().access.ensure_owner(&sender)?;

    // Auctions are owned by the repository itself
    let repository = Address::Contract(ctx.self_address());
    host.state_mut()
        .update_auction(id, |auction| auction.pause(&repository))?;

    logger.log(&RepositoryEvents::paused(Some(id), &sender))?;

    Ok(())
}

#[receive(
    mutable,
    contract = "AuctionRepository",
    name = "unpauseAuction",
    parameter = "AuctionId",
    enable_logger
)]
fn contract_unpause_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let id = AuctionId::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();
    host.state().access.ensure_owner(&sender)?;

    let repository = Address::Contract(ctx.self_address());
    host.state_mut()
        .update_auction(id, |auction| auction.unpause(&repository))?;

    logger.log(&RepositoryEvents::unpaused(Some(id), &sender))?;

    Ok(())
}

#[receive(contract = "AuctionRepository", name = "viewOwner", return_value = "Address")]
fn contract_view_owner<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Address> {
    Ok(host.state().access.owner())
}

#[receive(contract = "AuctionRepository", name = "viewPaused", return_value = "bool")]
fn contract_view_paused<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<bool> {
    Ok(host.state().access.is_paused())
}

fn asset_contract(asset: &Address) -> ContractResult<ContractAddress> {
    match asset {
        Address::Contract(contract) => Ok(*contract),
        Address::Account(_) => Err(CustomContractError::AssetNotContract),
    }
}

fn sender_account(ctx: &impl HasReceiveContext) -> ContractResult<AccountAddress> {
    match ctx.sender() {
        Address::Account(account) => Ok(account),
        Address::Contract(_) => Err(CustomContractError::OnlyAccountAddress),
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::auction::AuctionPhase;
    use commons::test::*;
    use commons::{ASSET_OWNER_ENTRYPOINT, ASSET_TRANSFER_OWNERSHIP_ENTRYPOINT};
    use concordium_std::test_infrastructure::*;

    const ONE_DAY: u64 = 86_400_000;
    const THREE_WEEKS: u64 = 1_814_400_000;

    const REPOSITORY: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const ASSET: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const OTHER_CONTRACT: ContractAddress = ContractAddress {
        index: 3,
        subindex: 0,
    };

    const OWNER: AccountAddress = AccountAddress([1; 32]);
    const SELLER: AccountAddress = AccountAddress([2; 32]);

    const BIDDER_1: AccountAddress = AccountAddress([16; 32]);
    const BIDDER_2: AccountAddress = AccountAddress([17; 32]);
    const BIDDER_3: AccountAddress = AccountAddress([18; 32]);

    /// Serialized `AuctionId` of the first created auction.
    static FIRST_AUCTION: [u8; 8] = [0; 8];

    fn test_slot_time() -> Timestamp {
        Timestamp::from_timestamp_millis(ONE_DAY * 365)
    }

    fn later(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(test_slot_time().timestamp_millis() + millis)
    }

    fn default_host() -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        // owner is initialized to `ctx.origin()`
        ctx.set_init_origin(OWNER);
        let mut state_builder = TestStateBuilder::new();

        let state = contract_init(&ctx, &mut state_builder)
            .expect_report("Failed during init_AuctionRepository");

        TestHost::new(state, state_builder)
    }

    fn receive_ctx<'a>(
        sender: Address,
        parameter: &'a [u8],
        slot_time: Timestamp,
    ) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender)
            .set_self_address(REPOSITORY)
            .set_parameter(parameter)
            .set_metadata_slot_time(slot_time);
        if let Address::Account(invoker) = sender {
            ctx.set_invoker(invoker);
        }
        ctx
    }

    fn setup_asset(host: &mut TestHost<State<TestStateApi>>, owner: AccountAddress) -> MockAsset {
        let asset = MockAsset::new(Address::Account(owner));
        host.setup_mock_entrypoint(
            ASSET,
            OwnedEntrypointName::new_unchecked(String::from(ASSET_OWNER_ENTRYPOINT)),
            asset.owner_mock(),
        );
        host.setup_mock_entrypoint(
            ASSET,
            OwnedEntrypointName::new_unchecked(String::from(ASSET_TRANSFER_OWNERSHIP_ENTRYPOINT)),
            asset.transfer_ownership_mock(),
        );
        asset
    }

    fn default_params() -> CreateAuctionParams {
        CreateAuctionParams {
            asset: Address::Contract(ASSET),
            starts_at: later(ONE_DAY),
            ends_at: later(ONE_DAY + THREE_WEEKS),
        }
    }

    fn create_auction(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
        params: &CreateAuctionParams,
    ) -> (ReceiveResult<AuctionId>, TestLogger) {
        let bytes = to_bytes(params);
        let ctx = receive_ctx(Address::Account(sender), &bytes, test_slot_time());
        let mut logger = TestLogger::init();
        let result = contract_create_auction(&ctx, host, &mut logger);
        (result, logger)
    }

    fn place_bid(
        host: &mut TestHost<State<TestStateApi>>,
        bidder: AccountAddress,
        amount: Amount,
        slot_time: Timestamp,
    ) -> (ReceiveResult<()>, TestLogger) {
        let ctx = receive_ctx(Address::Account(bidder), &FIRST_AUCTION, slot_time);
        let mut logger = TestLogger::init();
        let result = contract_bid(&ctx, host, amount, &mut logger);
        (result, logger)
    }

    /// Calls one of the `AuctionId` entrypoints that only need a sender and a
    /// slot time.
    fn call_auction<F>(
        host: &mut TestHost<State<TestStateApi>>,
        entrypoint: F,
        sender: AccountAddress,
        slot_time: Timestamp,
    ) -> (ReceiveResult<()>, TestLogger)
    where
        F: Fn(
            &TestReceiveContext<'static>,
            &mut TestHost<State<TestStateApi>>,
            &mut TestLogger,
        ) -> ReceiveResult<()>,
    {
        let ctx = receive_ctx(Address::Account(sender), &FIRST_AUCTION, slot_time);
        let mut logger = TestLogger::init();
        let result = entrypoint(&ctx, host, &mut logger);
        (result, logger)
    }

    fn view_auction(host: &TestHost<State<TestStateApi>>, slot_time: Timestamp) -> AuctionView {
        let ctx = receive_ctx(Address::Account(OWNER), &FIRST_AUCTION, slot_time);
        contract_view_auction(&ctx, host).expect_report("Failed to view auction")
    }

    #[concordium_test]
    fn test_init() {
        let host = default_host();
        let ctx = receive_ctx(Address::Account(BIDDER_1), &[], test_slot_time());

        claim_eq!(
            contract_view_owner(&ctx, &host),
            Ok(Address::Account(OWNER))
        );
        claim_eq!(contract_view_paused(&ctx, &host), Ok(false));
    }

    #[concordium_test]
    fn test_create_auction() {
        let mut host = default_host();
        let asset = setup_asset(&mut host, SELLER);
        let params = default_params();

        let (result, logger) = create_auction(&mut host, SELLER, &params);

        claim_eq!(result, Ok(0));
        // Custody moved to the repository
        claim_eq!(asset.owner(), Address::Contract(REPOSITORY));
        claim_eq!(host.state().all_auctions(&ASSET), vec![0]);
        claim_eq!(host.state().live_auctions(&ASSET), vec![0]);

        let terms = AuctionTerms {
            asset: ASSET,
            beneficiary: SELLER,
            starts_at: params.starts_at,
            ends_at: params.ends_at,
        };
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(
            logger.logs[0],
            to_bytes(&RepositoryEvents::auction_created(0, &terms))
        );

        let bytes = to_bytes(&0u64);
        let ctx = receive_ctx(Address::Account(BIDDER_1), &bytes, test_slot_time());
        claim_eq!(
            contract_fetch_auction(&ctx, &host),
            Ok(AuctionDetails {
                asset: ASSET,
                beneficiary: SELLER,
                starts_at: params.starts_at,
                ends_at: params.ends_at,
            })
        );

        let view = view_auction(&host, test_slot_time());
        claim_eq!(view.phase, AuctionPhase::Pending);
        claim_eq!(view.highest_bid, Amount::zero());
        claim_eq!(view.highest_bidder, None);
    }

    #[concordium_test]
    fn test_create_auction_not_asset_owner() {
        let mut host = default_host();
        let asset = setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, BIDDER_1, &default_params());

        claim_eq!(result, Err(CustomContractError::NotAssetOwner.into()));
        claim_eq!(asset.owner(), Address::Account(SELLER));
        claim_eq!(host.state().all_auctions(&ASSET), Vec::<AuctionId>::new());
    }

    #[concordium_test]
    fn test_create_auction_twice() {
        let mut host = default_host();
        setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        // The repository owns the asset now
        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Err(CustomContractError::NotAssetOwner.into()));
    }

    #[concordium_test]
    fn test_create_auction_asset_not_contract() {
        let mut host = default_host();

        let params = CreateAuctionParams {
            asset: Address::Account(SELLER),
            ..default_params()
        };
        let (result, _) = create_auction(&mut host, SELLER, &params);
        claim_eq!(result, Err(CustomContractError::AssetNotContract.into()));

        host.setup_mock_entrypoint(
            OTHER_CONTRACT,
            OwnedEntrypointName::new_unchecked(String::from(ASSET_OWNER_ENTRYPOINT)),
            missing_entrypoint_mock(),
        );
        let params = CreateAuctionParams {
            asset: Address::Contract(OTHER_CONTRACT),
            ..default_params()
        };
        let (result, _) = create_auction(&mut host, SELLER, &params);
        claim_eq!(result, Err(CustomContractError::AssetNotContract.into()));
    }

    #[concordium_test]
    fn test_create_auction_transfer_rejected() {
        let mut host = default_host();
        host.setup_mock_entrypoint(
            ASSET,
            OwnedEntrypointName::new_unchecked(String::from(ASSET_OWNER_ENTRYPOINT)),
            parse_and_ok_mock::<(), _>(Address::Account(SELLER)),
        );
        // Asset refuses to hand over custody
        host.setup_mock_entrypoint(
            ASSET,
            OwnedEntrypointName::new_unchecked(String::from(ASSET_TRANSFER_OWNERSHIP_ENTRYPOINT)),
            parse_and_check_mock::<Address, _>(|_new_owner| false, ()),
        );

        let (result, logger) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Err(CustomContractError::InvokeContractError.into()));
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_create_auction_window() {
        let mut host = default_host();
        let asset = setup_asset(&mut host, SELLER);

        let params = CreateAuctionParams {
            starts_at: Timestamp::from_timestamp_millis(test_slot_time().timestamp_millis() - 1),
            ..default_params()
        };
        let (result, _) = create_auction(&mut host, SELLER, &params);
        claim_eq!(result, Err(CustomContractError::StartsAtInPast.into()));

        let params = CreateAuctionParams {
            ends_at: later(ONE_DAY),
            ..default_params()
        };
        let (result, _) = create_auction(&mut host, SELLER, &params);
        claim_eq!(result, Err(CustomContractError::EndsAtBeforeStart.into()));

        claim_eq!(asset.owner(), Address::Account(SELLER));

        // Starting right now is allowed
        let params = CreateAuctionParams {
            starts_at: test_slot_time(),
            ..default_params()
        };
        let (result, _) = create_auction(&mut host, SELLER, &params);
        claim_eq!(result, Ok(0));
    }

    #[concordium_test]
    fn test_create_auction_paused() {
        let mut host = default_host();
        setup_asset(&mut host, SELLER);

        let ctx = receive_ctx(Address::Account(SELLER), &[], test_slot_time());
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_pause(&ctx, &mut host, &mut logger),
            Err(CustomContractError::NotOwner.into())
        );

        let ctx = receive_ctx(Address::Account(OWNER), &[], test_slot_time());
        claim_eq!(contract_pause(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&RepositoryEvents::paused(
                None,
                &Address::Account(OWNER)
            ))]
        );
        claim_eq!(
            contract_pause(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AlreadyPaused.into())
        );
        claim_eq!(contract_view_paused(&ctx, &host), Ok(true));

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Err(CustomContractError::Paused.into()));

        claim_eq!(contract_unpause(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(
            contract_unpause(&ctx, &mut host, &mut logger),
            Err(CustomContractError::NotPaused.into())
        );

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));
    }

    #[concordium_test]
    fn test_update_live_auctions() {
        let mut host = default_host();
        setup_asset(&mut host, SELLER);
        let mut logger = TestLogger::init();

        let params = UpdateLiveAuctionsParams {
            asset: Address::Account(SELLER),
            loop_count: 1,
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(Address::Account(OWNER), &bytes, test_slot_time());
        claim_eq!(
            contract_update_live_auctions(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AssetNotContract.into())
        );

        let params = UpdateLiveAuctionsParams {
            asset: Address::Contract(ASSET),
            loop_count: 1,
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(Address::Account(OWNER), &bytes, test_slot_time());
        claim_eq!(
            contract_update_live_auctions(&ctx, &mut host, &mut logger),
            Err(CustomContractError::LoopCountExceedsLength.into())
        );

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        // Still running, nothing is pruned
        claim_eq!(
            contract_update_live_auctions(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(host.state().live_auctions(&ASSET), vec![0]);

        let ctx = receive_ctx(
            Address::Account(OWNER),
            &bytes,
            later(ONE_DAY + THREE_WEEKS),
        );
        claim_eq!(
            contract_update_live_auctions(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&RepositoryEvents::live_auctions_updated(&ASSET, 0)),
                to_bytes(&RepositoryEvents::live_auctions_updated(&ASSET, 1)),
            ]
        );

        let bytes = to_bytes(&Address::Contract(ASSET));
        let ctx = receive_ctx(Address::Account(BIDDER_1), &bytes, test_slot_time());
        claim_eq!(
            contract_get_live_auctions(&ctx, &host),
            Ok(Vec::<AuctionId>::new())
        );
        claim_eq!(contract_get_all_auctions(&ctx, &host), Ok(vec![0]));

        let bytes = to_bytes(&Address::Account(SELLER));
        let ctx = receive_ctx(Address::Account(BIDDER_1), &bytes, test_slot_time());
        claim_eq!(
            contract_get_all_auctions(&ctx, &host),
            Err(CustomContractError::AssetNotContract.into())
        );
        claim_eq!(
            contract_get_live_auctions(&ctx, &host),
            Err(CustomContractError::AssetNotContract.into())
        );
    }

    #[concordium_test]
    fn test_update_live_auctions_not_owner() {
        let mut host = default_host();
        setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        let params = UpdateLiveAuctionsParams {
            asset: Address::Contract(ASSET),
            loop_count: 1,
        };
        let bytes = to_bytes(&params);
        let ended = later(ONE_DAY + THREE_WEEKS);
        let mut logger = TestLogger::init();

        for sender in [
            Address::Account(SELLER),
            Address::Account(BIDDER_1),
            Address::Contract(OTHER_CONTRACT),
        ] {
            let ctx = receive_ctx(sender, &bytes, ended);
            claim_eq!(
                contract_update_live_auctions(&ctx, &mut host, &mut logger),
                Err(CustomContractError::NotOwner.into())
            );
        }
        claim_eq!(host.state().live_auctions(&ASSET), vec![0]);
        claim!(logger.logs.is_empty());

        let ctx = receive_ctx(Address::Account(OWNER), &bytes, ended);
        claim_eq!(
            contract_update_live_auctions(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(host.state().live_auctions(&ASSET), Vec::<AuctionId>::new());
    }

    #[concordium_test]
    fn test_update_live_auctions_paused() {
        let mut host = default_host();
        setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        let ended = later(ONE_DAY + THREE_WEEKS);
        let ctx = receive_ctx(Address::Account(OWNER), &[], ended);
        let mut logger = TestLogger::init();
        claim_eq!(contract_pause(&ctx, &mut host, &mut logger), Ok(()));

        let params = UpdateLiveAuctionsParams {
            asset: Address::Contract(ASSET),
            loop_count: 1,
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(Address::Account(OWNER), &bytes, ended);
        claim_eq!(
            contract_update_live_auctions(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Paused.into())
        );
        claim_eq!(host.state().live_auctions(&ASSET), vec![0]);

        let ctx = receive_ctx(Address::Account(OWNER), &[], ended);
        claim_eq!(contract_unpause(&ctx, &mut host, &mut logger), Ok(()));

        let ctx = receive_ctx(Address::Account(OWNER), &bytes, ended);
        claim_eq!(
            contract_update_live_auctions(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(host.state().live_auctions(&ASSET), Vec::<AuctionId>::new());
    }

    #[concordium_test]
    fn test_auction_end_to_end() {
        let mut host = default_host();
        let asset = setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        let bid_1 = Amount::from_micro_ccd(100);
        let bid_2 = Amount::from_micro_ccd(101);

        // Before the window opens
        let (result, _) = place_bid(&mut host, BIDDER_1, bid_1, test_slot_time());
        claim_eq!(result, Err(CustomContractError::AuctionNotStarted.into()));

        let (result, logger) = place_bid(&mut host, BIDDER_1, bid_1, later(ONE_DAY + 1));
        claim_eq!(result, Ok(()));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&RepositoryEvents::bid(0, &BIDDER_1, bid_1))]
        );

        let (result, _) = place_bid(
            &mut host,
            BIDDER_3,
            Amount::from_micro_ccd(99),
            later(ONE_DAY + 2),
        );
        claim_eq!(result, Err(CustomContractError::BidTooLow.into()));

        let (result, _) = place_bid(&mut host, BIDDER_2, bid_2, later(ONE_DAY + 3));
        claim_eq!(result, Ok(()));
        host.set_self_balance(bid_1 + bid_2);

        let view = view_auction(&host, later(ONE_DAY + 3));
        claim_eq!(view.phase, AuctionPhase::Active);
        claim_eq!(view.highest_bid, bid_2);
        claim_eq!(view.highest_bidder, Some(BIDDER_2));

        // Outbid funds stay in escrow until the auction ends
        let (result, _) = call_auction(
            &mut host,
            contract_withdraw_bid,
            BIDDER_1,
            later(ONE_DAY + 4),
        );
        claim_eq!(result, Err(CustomContractError::AuctionNotEnded.into()));

        let ended = later(ONE_DAY + THREE_WEEKS + 1);

        let (result, logger) = call_auction(&mut host, contract_withdraw_bid, BIDDER_1, ended);
        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&BIDDER_1, bid_1));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&RepositoryEvents::bid_withdrawn(0, &BIDDER_1, bid_1))]
        );

        let (result, _) = call_auction(&mut host, contract_withdraw_bid, BIDDER_1, ended);
        claim_eq!(result, Err(CustomContractError::NoBidToWithdraw.into()));
        let (result, _) = call_auction(&mut host, contract_withdraw_bid, BIDDER_2, ended);
        claim_eq!(
            result,
            Err(CustomContractError::HighestBidderCannotWithdraw.into())
        );

        let (result, _) = call_auction(&mut host, contract_claim_possession, BIDDER_1, ended);
        claim_eq!(result, Err(CustomContractError::NotHighestBidder.into()));

        let (result, logger) =
            call_auction(&mut host, contract_claim_possession, BIDDER_2, ended);
        claim_eq!(result, Ok(()));
        claim_eq!(asset.owner(), Address::Account(BIDDER_2));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&RepositoryEvents::bid_claimed(0, &BIDDER_2))]
        );

        let (result, _) = call_auction(&mut host, contract_claim_possession, BIDDER_2, ended);
        claim_eq!(result, Err(CustomContractError::AlreadyClaimed.into()));

        let (result, _) = call_auction(&mut host, contract_reclaim_asset, SELLER, ended);
        claim_eq!(
            result,
            Err(CustomContractError::BidPlacedCannotReclaim.into())
        );

        let (result, logger) = call_auction(&mut host, contract_collect_proceeds, SELLER, ended);
        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&SELLER, bid_2));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&RepositoryEvents::proceeds_collected(
                0, &SELLER, bid_2
            ))]
        );

        let (result, _) = call_auction(&mut host, contract_collect_proceeds, SELLER, ended);
        claim_eq!(
            result,
            Err(CustomContractError::ProceedsAlreadyCollected.into())
        );

        let view = view_auction(&host, ended);
        claim_eq!(view.phase, AuctionPhase::Claimed);
        claim!(view.claimed);
        claim!(view.proceeds_collected);
    }

    #[concordium_test]
    fn test_withdraw_bid_after_claim() {
        let mut host = default_host();
        let asset = setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        let bid_1 = Amount::from_micro_ccd(100);
        let bid_2 = Amount::from_micro_ccd(101);
        let (result, _) = place_bid(&mut host, BIDDER_1, bid_1, later(ONE_DAY));
        claim_eq!(result, Ok(()));
        let (result, _) = place_bid(&mut host, BIDDER_2, bid_2, later(ONE_DAY));
        claim_eq!(result, Ok(()));
        host.set_self_balance(bid_1 + bid_2);

        let ended = later(ONE_DAY + THREE_WEEKS);
        let (result, _) = call_auction(&mut host, contract_claim_possession, BIDDER_2, ended);
        claim_eq!(result, Ok(()));
        claim_eq!(asset.owner(), Address::Account(BIDDER_2));
        claim_eq!(view_auction(&host, ended).phase, AuctionPhase::Claimed);

        // Escrow stays withdrawable once the asset changed hands
        let (result, logger) = call_auction(&mut host, contract_withdraw_bid, BIDDER_1, ended);
        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&BIDDER_1, bid_1));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&RepositoryEvents::bid_withdrawn(0, &BIDDER_1, bid_1))]
        );

        let bytes = to_bytes(&BidQueryParams {
            auction: 0,
            bidder: BIDDER_1,
        });
        let ctx = receive_ctx(Address::Account(BIDDER_1), &bytes, ended);
        claim_eq!(
            contract_view_bid(&ctx, &host),
            Ok(Some(BidRecord {
                amount: bid_1,
                withdrawn: true,
            }))
        );
    }

    #[concordium_test]
    fn test_reclaim_asset() {
        let mut host = default_host();
        let asset = setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        let (result, _) = call_auction(
            &mut host,
            contract_reclaim_asset,
            SELLER,
            later(ONE_DAY + THREE_WEEKS - 1),
        );
        claim_eq!(result, Err(CustomContractError::AuctionNotEnded.into()));

        let ended = later(ONE_DAY + THREE_WEEKS);

        let (result, _) = call_auction(&mut host, contract_reclaim_asset, BIDDER_1, ended);
        claim_eq!(result, Err(CustomContractError::NotOriginalOwner.into()));

        let (result, logger) = call_auction(&mut host, contract_reclaim_asset, SELLER, ended);
        claim_eq!(result, Ok(()));
        claim_eq!(asset.owner(), Address::Account(SELLER));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&RepositoryEvents::asset_reclaimed(0, &SELLER))]
        );

        let (result, _) = call_auction(&mut host, contract_reclaim_asset, SELLER, ended);
        claim_eq!(result, Err(CustomContractError::AlreadyReclaimed.into()));

        let (result, _) = call_auction(&mut host, contract_collect_proceeds, SELLER, ended);
        claim_eq!(result, Err(CustomContractError::NoProceeds.into()));

        // Relisting needs the expired live entry pruned first
        let params = UpdateLiveAuctionsParams {
            asset: Address::Contract(ASSET),
            loop_count: 1,
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(Address::Account(OWNER), &bytes, ended);
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_update_live_auctions(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(host.state().live_auctions(&ASSET), Vec::<AuctionId>::new());

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(1));
        claim_eq!(host.state().all_auctions(&ASSET), vec![0, 1]);
    }

    #[concordium_test]
    fn test_duplicate_auction() {
        let mut host = default_host();
        let asset = setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        let ended = later(ONE_DAY + THREE_WEEKS);
        let (result, _) = call_auction(&mut host, contract_reclaim_asset, SELLER, ended);
        claim_eq!(result, Ok(()));
        claim_eq!(asset.owner(), Address::Account(SELLER));

        // Owner again, but the old auction is still in the live index
        let params = CreateAuctionParams {
            asset: Address::Contract(ASSET),
            starts_at: ended,
            ends_at: later(2 * (ONE_DAY + THREE_WEEKS)),
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(Address::Account(SELLER), &bytes, ended);
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_create_auction(&ctx, &mut host, &mut logger),
            Err(CustomContractError::DuplicateAuction.into())
        );
    }

    #[concordium_test]
    fn test_only_accounts_bid() {
        let mut host = default_host();
        setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        let bytes = to_bytes(&0u64);
        let ctx = receive_ctx(
            Address::Contract(OTHER_CONTRACT),
            &bytes,
            later(ONE_DAY),
        );
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_bid(&ctx, &mut host, Amount::from_ccd(1), &mut logger),
            Err(CustomContractError::OnlyAccountAddress.into())
        );

        let bytes = to_bytes(&7u64);
        let ctx = receive_ctx(Address::Account(BIDDER_1), &bytes, later(ONE_DAY));
        claim_eq!(
            contract_bid(&ctx, &mut host, Amount::from_ccd(1), &mut logger),
            Err(CustomContractError::AuctionNotContract.into())
        );
        claim_eq!(
            contract_fetch_auction(&ctx, &host),
            Err(CustomContractError::AuctionNotContract.into())
        );
    }

    #[concordium_test]
    fn test_already_bid() {
        let mut host = default_host();
        setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        let (result, _) = place_bid(&mut host, BIDDER_1, Amount::from_ccd(1), later(ONE_DAY));
        claim_eq!(result, Ok(()));
        let (result, _) = place_bid(&mut host, BIDDER_2, Amount::from_ccd(2), later(ONE_DAY));
        claim_eq!(result, Ok(()));
        let (result, _) = place_bid(&mut host, BIDDER_1, Amount::from_ccd(5), later(ONE_DAY));
        claim_eq!(result, Err(CustomContractError::AlreadyBid.into()));

        let params = BidQueryParams {
            auction: 0,
            bidder: BIDDER_1,
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(Address::Account(BIDDER_1), &bytes, later(ONE_DAY));
        claim_eq!(
            contract_view_bid(&ctx, &host),
            Ok(Some(BidRecord {
                amount: Amount::from_ccd(1),
                withdrawn: false,
            }))
        );
    }

    #[concordium_test]
    fn test_pause_auction() {
        let mut host = default_host();
        setup_asset(&mut host, SELLER);

        let (result, _) = create_auction(&mut host, SELLER, &default_params());
        claim_eq!(result, Ok(0));

        let (result, _) = call_auction(&mut host, contract_pause_auction, SELLER, later(ONE_DAY));
        claim_eq!(result, Err(CustomContractError::NotOwner.into()));

        let (result, logger) =
            call_auction(&mut host, contract_pause_auction, OWNER, later(ONE_DAY));
        claim_eq!(result, Ok(()));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&RepositoryEvents::paused(
                Some(0),
                &Address::Account(OWNER)
            ))]
        );
        claim!(view_auction(&host, later(ONE_DAY)).paused);

        let (result, _) = place_bid(&mut host, BIDDER_1, Amount::from_ccd(1), later(ONE_DAY));
        claim_eq!(result, Err(CustomContractError::Paused.into()));

        let (result, _) = call_auction(&mut host, contract_pause_auction, OWNER, later(ONE_DAY));
        claim_eq!(result, Err(CustomContractError::AlreadyPaused.into()));

        let (result, _) =
            call_auction(&mut host, contract_unpause_auction, OWNER, later(ONE_DAY));
        claim_eq!(result, Ok(()));

        let (result, _) = place_bid(&mut host, BIDDER_1, Amount::from_ccd(1), later(ONE_DAY));
        claim_eq!(result, Ok(()));
    }

    #[concordium_test]
    fn test_transfer_ownership() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        let bytes = to_bytes(&Address::Account(BIDDER_1));
        let ctx = receive_ctx(Address::Account(BIDDER_1), &bytes, test_slot_time());
        claim_eq!(
            contract_transfer_ownership(&ctx, &mut host, &mut logger),
            Err(CustomContractError::NotOwner.into())
        );

        let ctx = receive_ctx(Address::Account(OWNER), &bytes, test_slot_time());
        claim_eq!(
            contract_transfer_ownership(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(
            logger.logs,
            vec![to_bytes(&RepositoryEvents::ownership_transferred(
                &Address::Account(OWNER),
                &Address::Account(BIDDER_1)
            ))]
        );
        claim_eq!(
            contract_view_owner(&ctx, &host),
            Ok(Address::Account(BIDDER_1))
        );

        // The previous owner lost its rights
        claim_eq!(
            contract_pause(&ctx, &mut host, &mut logger),
            Err(CustomContractError::NotOwner.into())
        );
    }
}
