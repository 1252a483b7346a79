use crate::{ContractResult, CustomContractError};
use concordium_std::*;

/// Single owner plus a pause switch. Shared by the repository and by every
/// auction it hosts.
#[derive(Debug, Clone, Serialize, SchemaType, PartialEq, Eq)]
pub struct AccessControl {
    owner: Address,
    paused: bool,
}

impl AccessControl {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            paused: false,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn ensure_owner(&self, sender: &Address) -> ContractResult<()> {
        ensure_eq!(sender, &self.owner, CustomContractError::NotOwner);
        Ok(())
    }

    pub fn ensure_not_paused(&self) -> ContractResult<()> {
        ensure!(!self.paused, CustomContractError::Paused);
        Ok(())
    }

    pub fn pause(&mut self, sender: &Address) -> ContractResult<()> {
        self.ensure_owner(sender)?;
        ensure!(!self.paused, CustomContractError::AlreadyPaused);
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, sender: &Address) -> ContractResult<()> {
        self.ensure_owner(sender)?;
        ensure!(self.paused, CustomContractError::NotPaused);
        self.paused = false;
        Ok(())
    }

    /// Hands ownership over to `new_owner` and returns the previous owner.
    pub fn transfer_ownership(
        &mut self,
        sender: &Address,
        new_owner: Address,
    ) -> ContractResult<Address> {
        self.ensure_owner(sender)?;
        Ok(core::mem::replace(&mut self.owner, new_owner))
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    const OWNER_ACCOUNT: AccountAddress = AccountAddress([1; 32]);
    const OWNER_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const USER: AccountAddress = AccountAddress([16; 32]);

    #[concordium_test]
    fn test_owner_checks() {
        let access = AccessControl::new(Address::Contract(OWNER_CONTRACT));

        claim_eq!(access.owner(), Address::Contract(OWNER_CONTRACT));
        claim!(access
            .ensure_owner(&Address::Contract(OWNER_CONTRACT))
            .is_ok());
        claim_eq!(
            access.ensure_owner(&Address::Account(OWNER_ACCOUNT)),
            Err(CustomContractError::NotOwner)
        );
    }

    #[concordium_test]
    fn test_pause_unpause() {
        let owner = Address::Account(OWNER_ACCOUNT);
        let mut access = AccessControl::new(owner);

        claim!(!access.is_paused());
        claim!(access.ensure_not_paused().is_ok());
        claim_eq!(
            access.unpause(&owner),
            Err(CustomContractError::NotPaused)
        );

        claim_eq!(
            access.pause(&Address::Account(USER)),
            Err(CustomContractError::NotOwner)
        );
        claim!(access.pause(&owner).is_ok());
        claim!(access.is_paused());
        claim_eq!(access.ensure_not_paused(), Err(CustomContractError::Paused));
        claim_eq!(access.pause(&owner), Err(CustomContractError::AlreadyPaused));

        claim_eq!(
            access.unpause(&Address::Account(USER)),
            Err(CustomContractError::NotOwner)
        );
        claim!(access.unpause(&owner).is_ok());
        claim!(!access.is_paused());
    }

    #[concordium_test]
    fn test_transfer_ownership() {
        let owner = Address::Account(OWNER_ACCOUNT);
        let user = Address::Account(USER);
        let mut access = AccessControl::new(owner);

        claim_eq!(
            access.transfer_ownership(&user, user),
            Err(CustomContractError::NotOwner)
        );
        claim_eq!(access.transfer_ownership(&owner, user), Ok(owner));
        claim_eq!(access.owner(), user);
        claim_eq!(
            access.pause(&owner),
            Err(CustomContractError::NotOwner)
        );
        claim!(access.pause(&user).is_ok());
    }
}
