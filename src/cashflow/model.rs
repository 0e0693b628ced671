//! Data model: `CashAccount`, `CashTransaction`, `CashFlowLedger`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCOUNT_NAME: &str = "Trading";
pub const DEFAULT_CURRENCY: &str = "AUD";
pub const MAX_AMOUNT: f64 = 1e15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Trading,
    Accumulate,
    TermDeposit,
    Offset,
    Other,
}

impl AccountType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trading" => Some(AccountType::Trading),
            "accumulate" => Some(AccountType::Accumulate),
            "term_deposit" => Some(AccountType::TermDeposit),
            "offset" => Some(AccountType::Offset),
            "other" => Some(AccountType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    Contribution,
    Dividend,
    Transfer,
    Fee,
    Other,
}

impl TransactionCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contribution" => Some(TransactionCategory::Contribution),
            "dividend" => Some(TransactionCategory::Dividend),
            "transfer" => Some(TransactionCategory::Transfer),
            "fee" => Some(TransactionCategory::Fee),
            "other" => Some(TransactionCategory::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAccount {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub is_transactional: bool,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl CashAccount {
    pub fn default_trading() -> Self {
        CashAccount {
            name: DEFAULT_ACCOUNT_NAME.to_string(),
            account_type: AccountType::Trading,
            currency: DEFAULT_CURRENCY.to_string(),
            is_transactional: true,
        }
    }

    /// Auto-created accounts are non-transactional type "other".
    pub fn auto_created(name: &str) -> Self {
        CashAccount {
            name: name.to_string(),
            account_type: AccountType::Other,
            currency: DEFAULT_CURRENCY.to_string(),
            is_transactional: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashTransaction {
    pub id: String,
    pub account: String,
    pub category: TransactionCategory,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub linked_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Legacy pre-signed-amount documents carried `direction: credit|debit`
    /// alongside an always-positive amount. Accepted and discarded on
    /// read, without migration — legacy debits need operator re-entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowLedger {
    pub portfolio_name: String,
    pub version: u64,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    pub accounts: Vec<CashAccount>,
    pub transactions: Vec<CashTransaction>,
}

impl CashFlowLedger {
    /// A freshly synthesized ledger, as produced on first read. Not persisted.
    pub fn new_default(portfolio_name: &str) -> Self {
        let now = Utc::now();
        CashFlowLedger {
            portfolio_name: portfolio_name.to_string(),
            version: 0,
            notes: String::new(),
            created_at: now,
            updated_at: now,
            accounts: vec![CashAccount::default_trading()],
            transactions: Vec::new(),
        }
    }

    pub fn find_account(&self, name: &str) -> Option<&CashAccount> {
        self.accounts.iter().find(|a| a.name == name)
    }

    pub fn find_account_mut(&mut self, name: &str) -> Option<&mut CashAccount> {
        self.accounts.iter_mut().find(|a| a.name == name)
    }

    /// Appends a new non-transactional "other" account if `name` isn't known yet.
    pub fn ensure_account(&mut self, name: &str) {
        if self.find_account(name).is_none() {
            self.accounts.push(CashAccount::auto_created(name));
        }
    }

    pub fn sort_transactions(&mut self) {
        self.transactions.sort_by_key(|t| t.date);
    }

    pub fn balance(&self, account: &str) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.account == account)
            .map(|t| t.amount)
            .sum()
    }

    pub fn total_balance(&self) -> f64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}
