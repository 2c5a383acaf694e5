//! Administrator authorisation.

use duck_types::{AccountId, TypesError};
use std::collections::BTreeSet;

use crate::error::LedgerError;

/// Static allow-list of privileged identities, resolved once at startup and
/// injected into the ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminPolicy {
    admins: BTreeSet<AccountId>,
}

impl AdminPolicy {
    pub fn new(admins: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }

    /// Build from raw identifiers, e.g. a config file's `admins` list.
    pub fn from_ids<I, S>(ids: I) -> Result<Self, TypesError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let admins = ids
            .into_iter()
            .map(AccountId::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { admins })
    }

    pub fn is_privileged(&self, id: &AccountId) -> bool {
        self.admins.contains(id)
    }

    pub(crate) fn ensure(&self, id: &AccountId) -> Result<(), LedgerError> {
        if self.is_privileged(id) {
            Ok(())
        } else {
            Err(LedgerError::NotPrivileged(id.clone()))
        }
    }

    pub fn len(&self) -> usize {
        self.admins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }
}
