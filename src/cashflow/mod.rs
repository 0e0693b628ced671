pub mod ids;
pub mod model;
pub mod service;
pub mod store;

pub use model::{AccountType, CashAccount, CashFlowLedger, CashTransaction, TransactionCategory, DEFAULT_ACCOUNT_NAME};
pub use service::{CashFlowService, NewTransactionInput, NewTransferInput, UpdateAccountInput, UpdateTransactionInput};
