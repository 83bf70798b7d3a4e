//! Capability grants for the privileged ledger entry points.
//!
//! One administrator address (the external policy collaborator) is the only
//! caller allowed to grant or revoke capabilities. Minting, burning other
//! holders' tokens, rebasing and snapshotting each check a grant here.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tally_types::Address;

use crate::error::LedgerError;

/// A capability that gates one family of ledger operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Minter,
    Burner,
    Rebaser,
    Snapshotter,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Minter, Role::Burner, Role::Rebaser, Role::Snapshotter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Minter => "minter",
            Role::Burner => "burner",
            Role::Rebaser => "rebaser",
            Role::Snapshotter => "snapshotter",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessControl {
    admin: Address,
    grants: HashMap<Role, BTreeSet<Address>>,
}

impl AccessControl {
    pub fn new(admin: Address) -> Result<Self, LedgerError> {
        if admin.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        Ok(Self {
            admin,
            grants: HashMap::new(),
        })
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|holders| holders.contains(account))
    }

    pub fn require(&self, role: Role, caller: &Address) -> Result<(), LedgerError> {
        if self.has_role(role, caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: *caller,
                role: role.as_str(),
            })
        }
    }

    pub fn require_admin(&self, caller: &Address) -> Result<(), LedgerError> {
        if *caller == self.admin {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: *caller,
                role: "admin",
            })
        }
    }

    /// Grant or revoke `role` for `account`. Returns whether anything changed.
    pub fn set_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: Address,
        granted: bool,
    ) -> Result<bool, LedgerError> {
        self.require_admin(caller)?;
        let holders = self.grants.entry(role).or_default();
        let changed = if granted {
            holders.insert(account)
        } else {
            holders.remove(&account)
        };
        Ok(changed)
    }

    pub fn transfer_admin(&mut self, caller: &Address, new_admin: Address) -> Result<(), LedgerError> {
        self.require_admin(caller)?;
        if new_admin.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        self.admin = new_admin;
        Ok(())
    }

    /// All current holders of `role`, in address order.
    pub fn holders(&self, role: Role) -> impl Iterator<Item = &Address> {
        self.grants.get(&role).into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    #[test]
    fn zero_admin_rejected() {
        assert_eq!(AccessControl::new(Address::ZERO).unwrap_err(), LedgerError::ZeroAddress);
    }

    #[test]
    fn admin_grants_and_revokes() {
        let mut ac = AccessControl::new(addr(1)).unwrap();
        assert!(!ac.has_role(Role::Minter, &addr(2)));

        assert!(ac.set_role(&addr(1), Role::Minter, addr(2), true).unwrap());
        assert!(ac.has_role(Role::Minter, &addr(2)));
        assert!(!ac.has_role(Role::Burner, &addr(2)));
        assert!(ac.require(Role::Minter, &addr(2)).is_ok());

        // Granting twice is a no-op.
        assert!(!ac.set_role(&addr(1), Role::Minter, addr(2), true).unwrap());

        assert!(ac.set_role(&addr(1), Role::Minter, addr(2), false).unwrap());
        assert!(!ac.has_role(Role::Minter, &addr(2)));
    }

    #[test]
    fn non_admin_cannot_grant() {
        let mut ac = AccessControl::new(addr(1)).unwrap();
        let err = ac.set_role(&addr(2), Role::Rebaser, addr(2), true).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Unauthorized {
                caller: addr(2),
                role: "admin"
            }
        );
        assert!(!ac.has_role(Role::Rebaser, &addr(2)));
    }

    #[test]
    fn require_reports_missing_role() {
        let ac = AccessControl::new(addr(1)).unwrap();
        let err = ac.require(Role::Snapshotter, &addr(1)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Unauthorized {
                caller: addr(1),
                role: "snapshotter"
            }
        );
    }

    #[test]
    fn admin_can_be_handed_over() {
        let mut ac = AccessControl::new(addr(1)).unwrap();
        ac.transfer_admin(&addr(1), addr(9)).unwrap();
        assert_eq!(ac.admin(), addr(9));
        assert!(ac.require_admin(&addr(1)).is_err());
        assert!(ac.transfer_admin(&addr(9), Address::ZERO).is_err());
    }

    #[test]
    fn holders_are_listed_in_order() {
        let mut ac = AccessControl::new(addr(1)).unwrap();
        ac.set_role(&addr(1), Role::Burner, addr(5), true).unwrap();
        ac.set_role(&addr(1), Role::Burner, addr(3), true).unwrap();
        let holders: Vec<_> = ac.holders(Role::Burner).copied().collect();
        assert_eq!(holders, vec![addr(3), addr(5)]);
        assert_eq!(ac.holders(Role::Minter).count(), 0);
    }
}
