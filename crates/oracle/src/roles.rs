use std::{
    borrow::Borrow,
    collections::{BTreeSet, HashMap},
};

use alloy_primitives::Address;

use crate::{OracleError, OracleResult};

/// The key of a Role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleKey {
    name: String,
}

impl RoleKey {
    /// Controller. Required to set and clear prices and to manage signers.
    pub const CONTROLLER: &'static str = "CONTROLLER";

    /// Role Admin.
    pub const ROLE_ADMIN: &'static str = "ROLE_ADMIN";

    /// Get the name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Borrow<str> for RoleKey {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl<'a> From<&'a str> for RoleKey {
    fn from(value: &'a str) -> Self {
        Self {
            name: value.to_owned(),
        }
    }
}

/// Role registry.
pub trait RoleStore {
    /// Returns whether `account` holds `role`.
    fn has_role(&self, account: &Address, role: &str) -> bool;
}

/// Role registry kept in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRoleStore {
    members: HashMap<Address, BTreeSet<RoleKey>>,
}

impl InMemoryRoleStore {
    /// Grant `role` to `account`. Returns `false` if it was already granted.
    pub fn grant_role(&mut self, account: &Address, role: &str) -> bool {
        self.members
            .entry(*account)
            .or_default()
            .insert(RoleKey::from(role))
    }

    /// Revoke `role` from `account`. Returns `false` if it was not granted.
    pub fn revoke_role(&mut self, account: &Address, role: &str) -> bool {
        let Some(roles) = self.members.get_mut(account) else {
            return false;
        };
        let revoked = roles.remove(role);
        if roles.is_empty() {
            self.members.remove(account);
        }
        revoked
    }
}

impl RoleStore for InMemoryRoleStore {
    fn has_role(&self, account: &Address, role: &str) -> bool {
        self.members
            .get(account)
            .is_some_and(|roles| roles.contains(role))
    }
}

/// Proof that an account holds the [`CONTROLLER`](RoleKey::CONTROLLER) role.
///
/// Mutating oracle operations take a reference to it.
#[derive(Debug)]
pub struct Controller {
    account: Address,
}

impl Controller {
    /// Check that `caller` is a controller.
    pub fn authorize<R>(roles: &R, caller: &Address) -> OracleResult<Self>
    where
        R: RoleStore + ?Sized,
    {
        if !roles.has_role(caller, RoleKey::CONTROLLER) {
            tracing::warn!(%caller, "unauthorized caller");
            return Err(OracleError::Unauthorized(*caller, RoleKey::CONTROLLER));
        }
        Ok(Self { account: *caller })
    }

    /// The authorized account.
    pub fn account(&self) -> &Address {
        &self.account
    }
}
