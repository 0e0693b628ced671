//! Ledger store: a thin adapter over `UserDataStore`, namespaced under
//! subject `"cashflow"` with the portfolio name as key.

use std::sync::Arc;

use chrono::Utc;

use crate::store::UserDataStore;

use super::model::CashFlowLedger;

const SUBJECT: &str = "cashflow";

pub struct LedgerStore {
    store: Arc<dyn UserDataStore>,
}

impl LedgerStore {
    pub fn new(store: Arc<dyn UserDataStore>) -> Self {
        Self { store }
    }

    /// Loads the ledger for (user, portfolio), synthesizing an empty
    /// default ledger if none exists yet. The synthesized value is never
    /// persisted — only a subsequent mutation persists it.
    pub async fn get(&self, user_id: &str, portfolio_name: &str) -> Result<CashFlowLedger, crate::error::CashFlowError> {
        let raw = self
            .store
            .get(user_id, SUBJECT, portfolio_name)
            .await
            .map_err(|e| crate::error::CashFlowError::storage(portfolio_name, e.to_string()))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| crate::error::CashFlowError::storage(portfolio_name, format!("decoding ledger: {e}"))),
            None => Ok(CashFlowLedger::new_default(portfolio_name)),
        }
    }

    /// Persists `ledger`: increments version, stamps `updated_at` (and
    /// `created_at` if unset), re-serializes, writes.
    pub async fn save(&self, user_id: &str, ledger: &mut CashFlowLedger) -> Result<(), crate::error::CashFlowError> {
        let now = Utc::now();
        ledger.version += 1;
        ledger.updated_at = now;
        if ledger.created_at.timestamp() == 0 {
            ledger.created_at = now;
        }

        let json = serde_json::to_string(ledger)
            .map_err(|e| crate::error::CashFlowError::storage(&ledger.portfolio_name, format!("encoding ledger: {e}")))?;

        self.store
            .put(user_id, SUBJECT, &ledger.portfolio_name, &json)
            .await
            .map_err(|e| crate::error::CashFlowError::storage(&ledger.portfolio_name, e.to_string()))
    }
}
