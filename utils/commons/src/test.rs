//! Mock entrypoints for `TestHost` based tests of dependent contracts.

#[cfg(feature = "std")]
pub use inner::*;

#[cfg(feature = "std")]
mod inner {
    use concordium_std::test_infrastructure::MockFn;
    use concordium_std::*;
    use std::{cell::Cell, rc::Rc};

    /// Mock that parses its parameter as `D` and returns `return_value` when
    /// `check` accepts it. A parse failure or a rejected check traps.
    pub fn parse_and_check_mock<D: Deserial, S>(
        check: impl Fn(&D) -> bool + 'static,
        return_value: impl Clone + Serial + 'static,
    ) -> MockFn<S> {
        MockFn::new(move |parameter, _, _, _state| {
            match D::deserial(&mut Cursor::new(parameter)) {
                Ok(value) if check(&value) => Ok((false, Some(return_value.clone()))),
                _ => Err(CallContractError::Trap),
            }
        })
    }

    pub fn parse_and_ok_mock<D: Deserial, S>(
        return_value: impl Clone + Serial + 'static,
    ) -> MockFn<S> {
        parse_and_check_mock::<D, S>(|_| true, return_value)
    }

    /// Mock of an address that has no such entrypoint.
    pub fn missing_entrypoint_mock<S>() -> MockFn<S> {
        MockFn::new(|_parameter, _, _, _state| {
            Err::<(bool, Option<()>), _>(CallContractError::MissingEntrypoint)
        })
    }

    /// Asset contract whose ownership lives in a shared cell, so that an
    /// `owner` view observes a preceding `transferOwnership` call.
    #[derive(Clone)]
    pub struct MockAsset {
        owner: Rc<Cell<Address>>,
    }

    impl MockAsset {
        pub fn new(owner: Address) -> Self {
            Self {
                owner: Rc::new(Cell::new(owner)),
            }
        }

        pub fn owner(&self) -> Address {
            self.owner.get()
        }

        pub fn owner_mock<S>(&self) -> MockFn<S> {
            let owner = Rc::clone(&self.owner);
            MockFn::new(move |parameter, _, _, _state| {
                <()>::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
                Ok((false, Some(owner.get())))
            })
        }

        pub fn transfer_ownership_mock<S>(&self) -> MockFn<S> {
            let owner = Rc::clone(&self.owner);
            MockFn::new(move |parameter, _, _, _state| {
                let new_owner = Address::deserial(&mut Cursor::new(parameter))
                    .map_err(|_| CallContractError::Trap)?;
                owner.set(new_owner);
                Ok((false, Some(())))
            })
        }
    }
}
