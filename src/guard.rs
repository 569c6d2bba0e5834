use soroban_sdk::Env;

use crate::errors::DividendsError;
use crate::storage;

/// Held across an outbound native transfer. The lock flag is cleared on drop;
/// a second acquisition within the same invocation fails with `Reentrant`.
pub struct TransferGuard<'a> {
    env: &'a Env,
}

impl<'a> TransferGuard<'a> {
    pub fn acquire(env: &'a Env) -> Result<Self, DividendsError> {
        if storage::is_transfer_locked(env) {
            return Err(DividendsError::Reentrant);
        }
        storage::set_transfer_lock(env);
        Ok(Self { env })
    }
}

impl Drop for TransferGuard<'_> {
    fn drop(&mut self) {
        storage::clear_transfer_lock(self.env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DividendsContract;

    #[test]
    fn nested_acquire_is_rejected_until_release() {
        let env = Env::default();
        let contract_id = env.register_contract(None, DividendsContract);

        env.as_contract(&contract_id, || {
            let guard = TransferGuard::acquire(&env).unwrap();
            assert!(matches!(
                TransferGuard::acquire(&env),
                Err(DividendsError::Reentrant)
            ));
            drop(guard);
            assert!(!storage::is_transfer_locked(&env));
            assert!(TransferGuard::acquire(&env).is_ok());
        });
    }
}
