use super::*;

/// The custom errors the auction contracts can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Clone, Copy, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Failed to invoke a contract (Error code: -4).
    InvokeContractError,
    /// Failed to invoke a transfer (Error code: -5).
    InvokeTransferError,
    /// Only account addresses can hold bids and proceeds (Error code: -6).
    OnlyAccountAddress,
    /// Attempt to use an auction that was never initialized (Error code: -7).
    NotInitialized,
    /// Sender is not the owner of the contract (Error code: -8).
    NotOwner,
    /// Auction initialization attempted by someone other than the creating
    /// repository (Error code: -9).
    NotRepository,
    /// Sender does not own the asset (Error code: -10).
    NotAssetOwner,
    /// Sender is not the party that put the asset up for auction
    /// (Error code: -11).
    NotOriginalOwner,
    /// Sender is not the highest bidder (Error code: -12).
    NotHighestBidder,
    /// Auction was already initialized (Error code: -13).
    AlreadyInitialized,
    /// Asset was already claimed by the highest bidder (Error code: -14).
    AlreadyClaimed,
    /// Asset was already reclaimed by the original owner (Error code: -15).
    AlreadyReclaimed,
    /// Bidder has already placed a bid in this auction (Error code: -16).
    AlreadyBid,
    /// Pause requested while already paused (Error code: -17).
    AlreadyPaused,
    /// Unpause requested while not paused (Error code: -18).
    NotPaused,
    /// Winning bid was already paid out to the beneficiary (Error code: -19).
    ProceedsAlreadyCollected,
    /// Bidding window has not opened yet (Error code: -20).
    AuctionNotStarted,
    /// Bidding window is closed (Error code: -21).
    AuctionEnded,
    /// Auction end time has not been reached yet (Error code: -22).
    AuctionNotEnded,
    /// Requested start lies before the current slot time (Error code: -23).
    StartsAtInPast,
    /// Requested end is not after the requested start (Error code: -24).
    EndsAtBeforeStart,
    /// Bid does not exceed the highest bid (Error code: -25).
    BidTooLow,
    /// Asset still has an entry in the live index (Error code: -26).
    DuplicateAuction,
    /// The leading bid stays in escrow until claimed (Error code: -27).
    HighestBidderCannotWithdraw,
    /// Asset cannot be reclaimed once a bid exists (Error code: -28).
    BidPlacedCannotReclaim,
    /// Sender has no bid left to withdraw (Error code: -29).
    NoBidToWithdraw,
    /// No bid was placed, so there is nothing to pay out (Error code: -30).
    NoProceeds,
    /// Asset is not a contract exposing the custody interface
    /// (Error code: -31).
    AssetNotContract,
    /// Auction id does not refer to a known auction (Error code: -32).
    AuctionNotContract,
    /// Requested more entries than the live index holds (Error code: -33).
    LoopCountExceedsLength,
    /// Contract or auction is paused (Error code: -34).
    Paused,
    /// Auction bid ledger is full (Error code: -35).
    TooManyBids,
}

/// Coarse grouping of [`CustomContractError`] for callers that only care about
/// the kind of failure.
#[derive(Serialize, Debug, PartialEq, Eq, Clone, Copy, SchemaType)]
pub enum ErrorKind {
    AccessDenied,
    LifecycleViolation,
    TimingViolation,
    ValueViolation,
    StateConflict,
    InputValidation,
    Paused,
    /// Parameter parsing, logging and host invocation failures.
    Platform,
}

impl CustomContractError {
    pub fn kind(&self) -> ErrorKind {
        use CustomContractError::*;

        match self {
            ParseParams | LogFull | LogMalformed | InvokeContractError | InvokeTransferError => {
                ErrorKind::Platform
            }
            NotOwner | NotRepository | NotAssetOwner | NotOriginalOwner | NotHighestBidder => {
                ErrorKind::AccessDenied
            }
            NotInitialized | AlreadyInitialized | AlreadyClaimed | AlreadyReclaimed
            | AlreadyBid | AlreadyPaused | NotPaused | ProceedsAlreadyCollected => {
                ErrorKind::LifecycleViolation
            }
            AuctionNotStarted | AuctionEnded | AuctionNotEnded | StartsAtInPast
            | EndsAtBeforeStart => ErrorKind::TimingViolation,
            BidTooLow => ErrorKind::ValueViolation,
            DuplicateAuction | HighestBidderCannotWithdraw | BidPlacedCannotReclaim
            | NoBidToWithdraw | NoProceeds | TooManyBids => ErrorKind::StateConflict,
            OnlyAccountAddress | AssetNotContract | AuctionNotContract
            | LoopCountExceedsLength => ErrorKind::InputValidation,
            Paused => ErrorKind::Paused,
        }
    }

    /// Human readable reason, suitable for client side error reporting.
    pub fn reason(&self) -> &'static str {
        use CustomContractError::*;

        match self {
            ParseParams => "Failed to parse parameter",
            LogFull => "Event log is full",
            LogMalformed => "Event log is malformed",
            InvokeContractError => "Contract invocation failed",
            InvokeTransferError => "CCD transfer failed",
            OnlyAccountAddress => "Only account addresses are allowed",
            NotInitialized => "Auction not initialized",
            NotOwner => "Ownable: caller is not the owner",
            NotRepository => "Only the repository can initialize",
            NotAssetOwner => "Only asset owner can create auction",
            NotOriginalOwner => "Only the original owner is allowed",
            NotHighestBidder => "Only the highest bidder is allowed",
            AlreadyInitialized => "Auction already initialized",
            AlreadyClaimed => "Asset already claimed",
            AlreadyReclaimed => "Asset already reclaimed",
            AlreadyBid => "Bidder already placed a bid",
            AlreadyPaused => "Pausable: paused",
            NotPaused => "Pausable: not paused",
            ProceedsAlreadyCollected => "Proceeds already collected",
            AuctionNotStarted => "Auction not started",
            AuctionEnded => "Auction ended",
            AuctionNotEnded => "Auction not ended",
            StartsAtInPast => "startsAt < now",
            EndsAtBeforeStart => "endsAt < startsAt",
            BidTooLow => "Bid too low",
            DuplicateAuction => "Auction already live for asset",
            HighestBidderCannotWithdraw => "Highest bidder cannot withdraw",
            BidPlacedCannotReclaim => "Bid placed, cannot reclaim",
            NoBidToWithdraw => "No bid to withdraw",
            NoProceeds => "No bid placed",
            AssetNotContract => "Asset not a contract",
            AuctionNotContract => "Auction not a contract",
            LoopCountExceedsLength => "loopCount > liveAuctions.length",
            TooManyBids => "Too many bids for auction",
            Paused => "Pausable: paused",
        }
    }
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(_cce: CallContractError<T>) -> Self {
        Self::InvokeContractError
    }
}

/// Mapping errors related to transfer invocations to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}

#[derive(Debug)]
pub enum ContractReadError<R> {
    Call(CallContractError<R>),
    Compatibility,
    Parse,
}

/// Failure of a call into an asset contract. A missing instance or a missing
/// custody entrypoint means the address is not a usable asset.
pub fn custody_call_error<R>(error: CallContractError<R>) -> CustomContractError {
    match error {
        CallContractError::MissingContract | CallContractError::MissingEntrypoint => {
            CustomContractError::AssetNotContract
        }
        _ => CustomContractError::InvokeContractError,
    }
}

/// Failure of a read-only call into an asset contract.
pub fn custody_read_error<R>(error: ContractReadError<R>) -> CustomContractError {
    match error {
        ContractReadError::Call(e) => custody_call_error(e),
        ContractReadError::Compatibility | ContractReadError::Parse => {
            CustomContractError::AssetNotContract
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_error_kinds() {
        claim_eq!(CustomContractError::NotOwner.kind(), ErrorKind::AccessDenied);
        claim_eq!(
            CustomContractError::AlreadyBid.kind(),
            ErrorKind::LifecycleViolation
        );
        claim_eq!(
            CustomContractError::StartsAtInPast.kind(),
            ErrorKind::TimingViolation
        );
        claim_eq!(CustomContractError::BidTooLow.kind(), ErrorKind::ValueViolation);
        claim_eq!(
            CustomContractError::NoBidToWithdraw.kind(),
            ErrorKind::StateConflict
        );
        claim_eq!(
            CustomContractError::LoopCountExceedsLength.kind(),
            ErrorKind::InputValidation
        );
        claim_eq!(CustomContractError::Paused.kind(), ErrorKind::Paused);
        claim_eq!(CustomContractError::ParseParams.kind(), ErrorKind::Platform);
    }

    #[concordium_test]
    fn test_error_reasons() {
        claim_eq!(
            CustomContractError::NotOwner.reason(),
            "Ownable: caller is not the owner"
        );
        claim_eq!(
            CustomContractError::LoopCountExceedsLength.reason(),
            "loopCount > liveAuctions.length"
        );
        claim_eq!(CustomContractError::BidTooLow.reason(), "Bid too low");
        claim_eq!(
            CustomContractError::TooManyBids.reason(),
            "Too many bids for auction"
        );
    }

    #[concordium_test]
    fn test_custody_call_error() {
        claim_eq!(
            custody_call_error::<()>(CallContractError::MissingContract),
            CustomContractError::AssetNotContract
        );
        claim_eq!(
            custody_call_error::<()>(CallContractError::MissingEntrypoint),
            CustomContractError::AssetNotContract
        );
        claim_eq!(
            custody_call_error::<()>(CallContractError::Trap),
            CustomContractError::InvokeContractError
        );
        claim_eq!(
            custody_read_error::<()>(ContractReadError::Parse),
            CustomContractError::AssetNotContract
        );
    }
}
