use crate::account_actor::AccountError;
use crate::model::{Account, AccountId, Role};
use serde::{Deserialize, Serialize};

/// The authenticated account, passed explicitly to every role operation.
///
/// A `Session` is a capability: holding one is what authorizes a client call, and
/// clients only check its role. [`QuickBiteSystem::logout`] forgets the session to
/// resume after a restart but cannot revoke values already handed out; callers drop
/// their copy to log out.
///
/// [`QuickBiteSystem::logout`]: crate::lifecycle::QuickBiteSystem::logout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub account_id: AccountId,
    pub role: Role,
    pub name: String,
}

impl Session {
    pub fn for_account(account: &Account) -> Self {
        Self {
            account_id: account.id,
            role: account.role(),
            name: account.name.clone(),
        }
    }

    /// Fails with `RoleMismatch` unless the session has `role`.
    pub fn require(&self, role: Role) -> Result<(), AccountError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AccountError::RoleMismatch {
                expected: role,
                actual: self.role,
            })
        }
    }
}
