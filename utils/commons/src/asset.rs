use concordium_std::*;

use crate::{ContractReadError, ASSET_OWNER_ENTRYPOINT, ASSET_TRANSFER_OWNERSHIP_ENTRYPOINT};

/// Calls into an auctionable asset: any contract exposing an `owner` view
/// returning an [`Address`] and a `transferOwnership` entrypoint taking the new
/// owner.
pub trait HostAssetCustodyExt<S>: HasHost<S> {
    fn asset_owner(
        &self,
        asset: &ContractAddress,
    ) -> Result<Address, ContractReadError<Self::ReturnValueType>> {
        let mut result = self
            .invoke_contract_read_only(
                asset,
                &(),
                EntrypointName::new_unchecked(ASSET_OWNER_ENTRYPOINT),
                Amount::zero(),
            )
            .map_err(ContractReadError::Call)?
            .ok_or(ContractReadError::Compatibility)?;

        Address::deserial(&mut result).map_err(|_| ContractReadError::Parse)
    }

    fn asset_transfer_ownership(
        &mut self,
        asset: &ContractAddress,
        new_owner: &Address,
    ) -> Result<(), CallContractError<Self::ReturnValueType>> {
        self.invoke_contract(
            asset,
            new_owner,
            EntrypointName::new_unchecked(ASSET_TRANSFER_OWNERSHIP_ENTRYPOINT),
            Amount::zero(),
        )?;
        Ok(())
    }
}

impl<S, H: HasHost<S>> HostAssetCustodyExt<S> for H {}
