//! It exposes the building blocks shared by the auction contracts: access
//! control, asset custody calls, errors, event tags and test helpers.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{access_control::*, asset::*, constants::*, errors::*, types::*};
use concordium_std::*;

pub mod test;

mod access_control;
mod asset;
mod constants;
mod errors;
mod types;
