//! It exposes the auction repository: one contract instance that creates and
//! indexes per-asset auctions, takes custody of the auctioned assets, escrows
//! bids and prunes expired auctions from the live index in bounded steps.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod auction;
mod contract;
mod events;
pub mod external;
pub mod state;
