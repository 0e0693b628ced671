//! Cash-flow service: ledger mutations.
//!
//! Validation-then-mutate-then-persist throughout: validate input and
//! name the offending field on failure, auto-create related rows,
//! mutate in memory, persist, return the updated view.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::error::CashFlowError;
use crate::store::UserDataStore;

use super::ids::generate_unique_id;
use super::model::{CashFlowLedger, CashTransaction, TransactionCategory};
use super::store::LedgerStore;

const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_NOTES_LEN: usize = 1000;
const MAX_ACCOUNT_NAME_LEN: usize = 100;

/// Input for `add_transaction` / one candidate of `set_transactions`.
/// Raw, unvalidated, as received at the boundary.
#[derive(Debug, Clone, Default)]
pub struct NewTransactionInput {
    pub account: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub description: String,
    pub notes: String,
}

/// Merge-semantics input for `update_transaction`. A field is "provided"
/// only if it is non-zero/non-empty for its type.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub account: String,
    pub category: String,
    pub date: Option<DateTime<Utc>>,
    pub amount: f64,
    pub description: String,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct NewTransferInput {
    pub from_account: String,
    pub to_account: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    pub account_type: Option<String>,
    pub is_transactional: Option<bool>,
}

struct Validated {
    account: String,
    category: TransactionCategory,
    date: DateTime<Utc>,
    amount: f64,
    description: String,
    notes: String,
}

fn field(prefix: &str, index: Option<usize>, name: &str) -> String {
    match index {
        Some(i) => format!("{prefix}[{i}].{name}"),
        None => format!("{prefix}.{name}"),
    }
}

fn validate_account_name(raw: &str, f: String) -> Result<String, CashFlowError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CashFlowError::validation(f, "account is required"));
    }
    if trimmed.chars().count() > MAX_ACCOUNT_NAME_LEN {
        return Err(CashFlowError::validation(f, "account name too long"));
    }
    Ok(trimmed.to_string())
}

fn validate_category(raw: &str, f: String) -> Result<TransactionCategory, CashFlowError> {
    TransactionCategory::parse(raw.trim()).ok_or_else(|| {
        CashFlowError::validation(f, format!("invalid category '{raw}'"))
    })
}

fn validate_date(date: DateTime<Utc>, f: String) -> Result<DateTime<Utc>, CashFlowError> {
    if date.timestamp() == 0 {
        return Err(CashFlowError::validation(f, "date is required"));
    }
    if date > Utc::now() + Duration::hours(24) {
        return Err(CashFlowError::validation(f, "date is more than 24h in the future"));
    }
    Ok(date)
}

fn validate_amount(amount: f64, f: String) -> Result<f64, CashFlowError> {
    if !amount.is_finite() {
        return Err(CashFlowError::validation(f, "amount must be finite"));
    }
    if amount == 0.0 {
        return Err(CashFlowError::validation(f, "amount must be non-zero"));
    }
    if amount.abs() >= super::model::MAX_AMOUNT {
        return Err(CashFlowError::validation(f, "amount out of range"));
    }
    Ok(amount)
}

fn validate_description(raw: &str, f: String) -> Result<String, CashFlowError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CashFlowError::validation(f, "description is required"));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CashFlowError::validation(f, "description too long"));
    }
    Ok(trimmed.to_string())
}

fn validate_notes(raw: &str, f: String) -> Result<String, CashFlowError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > MAX_NOTES_LEN {
        return Err(CashFlowError::validation(f, "notes too long"));
    }
    Ok(trimmed.to_string())
}

fn validate_new_transaction(input: &NewTransactionInput, index: Option<usize>) -> Result<Validated, CashFlowError> {
    let prefix = if index.is_some() { "transactions" } else { "transaction" };
    Ok(Validated {
        account: validate_account_name(&input.account, field(prefix, index, "account"))?,
        category: validate_category(&input.category, field(prefix, index, "category"))?,
        date: validate_date(input.date, field(prefix, index, "date"))?,
        amount: validate_amount(input.amount, field(prefix, index, "amount"))?,
        description: validate_description(&input.description, field(prefix, index, "description"))?,
        notes: validate_notes(&input.notes, field(prefix, index, "notes"))?,
    })
}

pub struct CashFlowService {
    store: LedgerStore,
}

impl CashFlowService {
    pub fn new(store: Arc<dyn UserDataStore>) -> Self {
        Self {
            store: LedgerStore::new(store),
        }
    }

    fn existing_ids(ledger: &CashFlowLedger) -> HashSet<&str> {
        ledger.transactions.iter().map(|t| t.id.as_str()).collect()
    }

    pub async fn get_ledger(&self, user_id: &str, portfolio: &str) -> Result<CashFlowLedger, CashFlowError> {
        self.store.get(user_id, portfolio).await
    }

    pub async fn add_transaction(
        &self,
        user_id: &str,
        portfolio: &str,
        input: NewTransactionInput,
    ) -> Result<CashFlowLedger, CashFlowError> {
        let validated = validate_new_transaction(&input, None)?;

        let mut ledger = self.store.get(user_id, portfolio).await?;
        ledger.ensure_account(&validated.account);

        let now = Utc::now();
        let id = {
            let existing = Self::existing_ids(&ledger);
            generate_unique_id(&existing)
        };

        ledger.transactions.push(CashTransaction {
            id,
            account: validated.account,
            category: validated.category,
            date: validated.date,
            amount: validated.amount,
            description: validated.description,
            notes: validated.notes,
            linked_id: String::new(),
            created_at: now,
            updated_at: now,
            direction: None,
        });
        ledger.sort_transactions();

        self.store.save(user_id, &mut ledger).await?;
        Ok(ledger)
    }

    pub async fn add_transfer(
        &self,
        user_id: &str,
        portfolio: &str,
        input: NewTransferInput,
    ) -> Result<CashFlowLedger, CashFlowError> {
        let from = validate_account_name(&input.from_account, "transfer.from_account".into())?;
        let to = validate_account_name(&input.to_account, "transfer.to_account".into())?;
        if from == to {
            return Err(CashFlowError::validation(
                "transfer.to_account",
                "from_account and to_account must be distinct",
            ));
        }
        let amount = validate_amount(input.amount, "transfer.amount".into())?;
        if amount <= 0.0 {
            return Err(CashFlowError::validation("transfer.amount", "amount must be positive"));
        }
        let date = validate_date(input.date, "transfer.date".into())?;
        let description = validate_description(&input.description, "transfer.description".into())?;

        let mut ledger = self.store.get(user_id, portfolio).await?;
        ledger.ensure_account(&from);
        ledger.ensure_account(&to);

        let now = Utc::now();
        let (from_id, to_id) = {
            let existing = Self::existing_ids(&ledger);
            let a = generate_unique_id(&existing);
            let mut existing_with_a = existing;
            existing_with_a.insert(a.as_str());
            let b = generate_unique_id(&existing_with_a);
            (a, b)
        };

        let from_tx = CashTransaction {
            id: from_id.clone(),
            account: from,
            category: TransactionCategory::Transfer,
            date,
            amount: -amount,
            description: description.clone(),
            notes: String::new(),
            linked_id: to_id.clone(),
            created_at: now,
            updated_at: now,
            direction: None,
        };
        let to_tx = CashTransaction {
            id: to_id,
            account: to,
            category: TransactionCategory::Transfer,
            date,
            amount,
            description,
            notes: String::new(),
            linked_id: from_id,
            created_at: now,
            updated_at: now,
            direction: None,
        };

        ledger.transactions.push(from_tx);
        ledger.transactions.push(to_tx);
        ledger.sort_transactions();

        self.store.save(user_id, &mut ledger).await?;
        Ok(ledger)
    }

    pub async fn update_transaction(
        &self,
        user_id: &str,
        portfolio: &str,
        id: &str,
        input: UpdateTransactionInput,
    ) -> Result<CashFlowLedger, CashFlowError> {
        let mut ledger = self.store.get(user_id, portfolio).await?;

        let idx = ledger
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CashFlowError::not_found(format!("transaction {id}")))?;

        let mut date_changed = false;

        if !input.account.trim().is_empty() {
            let account = validate_account_name(&input.account, "transaction.account".into())?;
            ledger.ensure_account(&account);
            ledger.transactions[idx].account = account;
        }
        if !input.category.trim().is_empty() {
            ledger.transactions[idx].category =
                validate_category(&input.category, "transaction.category".into())?;
        }
        if let Some(date) = input.date {
            if date.timestamp() != 0 {
                ledger.transactions[idx].date = validate_date(date, "transaction.date".into())?;
                date_changed = true;
            }
        }
        if input.amount != 0.0 {
            ledger.transactions[idx].amount = validate_amount(input.amount, "transaction.amount".into())?;
        }
        if !input.description.trim().is_empty() {
            ledger.transactions[idx].description =
                validate_description(&input.description, "transaction.description".into())?;
        }
        if !input.notes.trim().is_empty() {
            ledger.transactions[idx].notes = validate_notes(&input.notes, "transaction.notes".into())?;
        }

        ledger.transactions[idx].updated_at = Utc::now();

        if date_changed {
            ledger.sort_transactions();
        }

        self.store.save(user_id, &mut ledger).await?;
        Ok(ledger)
    }

    pub async fn remove_transaction(
        &self,
        user_id: &str,
        portfolio: &str,
        id: &str,
    ) -> Result<CashFlowLedger, CashFlowError> {
        let mut ledger = self.store.get(user_id, portfolio).await?;

        let idx = ledger
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CashFlowError::not_found(format!("transaction {id}")))?;

        let linked_id = ledger.transactions[idx].linked_id.clone();
        ledger.transactions.remove(idx);

        if !linked_id.is_empty() {
            ledger.transactions.retain(|t| t.id != linked_id);
        }

        self.store.save(user_id, &mut ledger).await?;
        Ok(ledger)
    }

    /// Bulk replace: all-or-nothing. Validates every candidate before
    /// touching the persisted ledger.
    pub async fn set_transactions(
        &self,
        user_id: &str,
        portfolio: &str,
        candidates: Vec<NewTransactionInput>,
        notes: Option<String>,
    ) -> Result<CashFlowLedger, CashFlowError> {
        let mut validated = Vec::with_capacity(candidates.len());
        for (i, candidate) in candidates.iter().enumerate() {
            validated.push(validate_new_transaction(candidate, Some(i))?);
        }

        let mut ledger = self.store.get(user_id, portfolio).await?;

        let now = Utc::now();
        let mut used_ids: HashSet<String> = HashSet::new();
        let mut new_transactions = Vec::with_capacity(validated.len());

        for v in validated {
            ledger.ensure_account(&v.account);
            let id = {
                let refs: HashSet<&str> = used_ids.iter().map(|s| s.as_str()).collect();
                generate_unique_id(&refs)
            };
            used_ids.insert(id.clone());
            new_transactions.push(CashTransaction {
                id,
                account: v.account,
                category: v.category,
                date: v.date,
                amount: v.amount,
                description: v.description,
                notes: v.notes,
                linked_id: String::new(),
                created_at: now,
                updated_at: now,
                direction: None,
            });
        }

        new_transactions.sort_by_key(|t| t.date);
        ledger.transactions = new_transactions;

        if let Some(notes) = notes {
            if !notes.trim().is_empty() {
                ledger.notes = validate_notes(&notes, "notes".into())?;
            }
        }

        self.store.save(user_id, &mut ledger).await?;
        Ok(ledger)
    }

    /// Clears transactions and resets accounts to the single default
    /// Trading account. Preserves notes. Idempotent.
    pub async fn clear_ledger(&self, user_id: &str, portfolio: &str) -> Result<CashFlowLedger, CashFlowError> {
        let mut ledger = self.store.get(user_id, portfolio).await?;
        ledger.transactions.clear();
        ledger.accounts = vec![super::model::CashAccount::default_trading()];
        self.store.save(user_id, &mut ledger).await?;
        Ok(ledger)
    }

    pub async fn update_account(
        &self,
        user_id: &str,
        portfolio: &str,
        name: &str,
        input: UpdateAccountInput,
    ) -> Result<CashFlowLedger, CashFlowError> {
        let mut ledger = self.store.get(user_id, portfolio).await?;

        {
            let account = ledger
                .find_account_mut(name)
                .ok_or_else(|| CashFlowError::not_found(format!("account {name}")))?;

            if let Some(account_type) = &input.account_type {
                account.account_type = super::model::AccountType::parse(account_type).ok_or_else(|| {
                    CashFlowError::validation("account.type", format!("invalid account type '{account_type}'"))
                })?;
            }
            if let Some(is_transactional) = input.is_transactional {
                account.is_transactional = is_transactional;
            }
        }

        self.store.save(user_id, &mut ledger).await?;
        Ok(ledger)
    }
}
