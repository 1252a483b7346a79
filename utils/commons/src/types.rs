use super::*;

pub type ContractResult<A> = Result<A, CustomContractError>;

/// Position of an auction in the repository arena. Ids are handed out in
/// creation order and never reused.
pub type AuctionId = u64;
