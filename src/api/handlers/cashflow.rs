//! Cash-flow ledger CRUD handlers.
//!
//! Local to our own storage — gated on [`RequireUserId`] only, not the
//! Navexa credential, since no upstream call is made.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::cashflow::{CashFlowLedger, NewTransactionInput, NewTransferInput, UpdateAccountInput, UpdateTransactionInput};
use crate::context::RequireUserId;
use crate::error::CashFlowError;

use crate::api::state::AppState;

#[derive(Deserialize)]
pub struct NewTransactionRequest {
    pub account: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

impl From<NewTransactionRequest> for NewTransactionInput {
    fn from(r: NewTransactionRequest) -> Self {
        NewTransactionInput {
            account: r.account,
            category: r.category,
            date: r.date,
            amount: r.amount,
            description: r.description,
            notes: r.notes,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct UpdateTransactionRequest {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

impl From<UpdateTransactionRequest> for UpdateTransactionInput {
    fn from(r: UpdateTransactionRequest) -> Self {
        UpdateTransactionInput {
            account: r.account,
            category: r.category,
            date: r.date,
            amount: r.amount,
            description: r.description,
            notes: r.notes,
        }
    }
}

#[derive(Deserialize)]
pub struct NewTransferRequest {
    pub from_account: String,
    pub to_account: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub description: String,
}

impl From<NewTransferRequest> for NewTransferInput {
    fn from(r: NewTransferRequest) -> Self {
        NewTransferInput {
            from_account: r.from_account,
            to_account: r.to_account,
            amount: r.amount,
            date: r.date,
            description: r.description,
        }
    }
}

#[derive(Deserialize)]
pub struct SetTransactionsRequest {
    pub transactions: Vec<NewTransactionRequest>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub is_transactional: Option<bool>,
}

impl From<UpdateAccountRequest> for UpdateAccountInput {
    fn from(r: UpdateAccountRequest) -> Self {
        UpdateAccountInput {
            account_type: r.account_type,
            is_transactional: r.is_transactional,
        }
    }
}

pub async fn get_ledger(
    RequireUserId(user_id): RequireUserId,
    State(state): State<AppState>,
    Path(portfolio): Path<String>,
) -> Result<Json<CashFlowLedger>, CashFlowError> {
    let ledger = state.cashflow.get_ledger(&user_id, &portfolio).await?;
    Ok(Json(ledger))
}

pub async fn add_transaction(
    RequireUserId(user_id): RequireUserId,
    State(state): State<AppState>,
    Path(portfolio): Path<String>,
    Json(req): Json<NewTransactionRequest>,
) -> Result<Json<CashFlowLedger>, CashFlowError> {
    let ledger = state.cashflow.add_transaction(&user_id, &portfolio, req.into()).await?;
    Ok(Json(ledger))
}

pub async fn update_transaction(
    RequireUserId(user_id): RequireUserId,
    State(state): State<AppState>,
    Path((portfolio, id)): Path<(String, String)>,
    Json(req): Json<UpdateTransactionRequest>,
) -> Result<Json<CashFlowLedger>, CashFlowError> {
    let ledger = state.cashflow.update_transaction(&user_id, &portfolio, &id, req.into()).await?;
    Ok(Json(ledger))
}

pub async fn remove_transaction(
    RequireUserId(user_id): RequireUserId,
    State(state): State<AppState>,
    Path((portfolio, id)): Path<(String, String)>,
) -> Result<Json<CashFlowLedger>, CashFlowError> {
    let ledger = state.cashflow.remove_transaction(&user_id, &portfolio, &id).await?;
    Ok(Json(ledger))
}

pub async fn add_transfer(
    RequireUserId(user_id): RequireUserId,
    State(state): State<AppState>,
    Path(portfolio): Path<String>,
    Json(req): Json<NewTransferRequest>,
) -> Result<Json<CashFlowLedger>, CashFlowError> {
    let ledger = state.cashflow.add_transfer(&user_id, &portfolio, req.into()).await?;
    Ok(Json(ledger))
}

pub async fn set_transactions(
    RequireUserId(user_id): RequireUserId,
    State(state): State<AppState>,
    Path(portfolio): Path<String>,
    Json(req): Json<SetTransactionsRequest>,
) -> Result<Json<CashFlowLedger>, CashFlowError> {
    let candidates = req.transactions.into_iter().map(Into::into).collect();
    let ledger = state.cashflow.set_transactions(&user_id, &portfolio, candidates, req.notes).await?;
    Ok(Json(ledger))
}

pub async fn clear_ledger(
    RequireUserId(user_id): RequireUserId,
    State(state): State<AppState>,
    Path(portfolio): Path<String>,
) -> Result<Json<CashFlowLedger>, CashFlowError> {
    let ledger = state.cashflow.clear_ledger(&user_id, &portfolio).await?;
    Ok(Json(ledger))
}

pub async fn update_account(
    RequireUserId(user_id): RequireUserId,
    State(state): State<AppState>,
    Path((portfolio, name)): Path<(String, String)>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<Json<CashFlowLedger>, CashFlowError> {
    let ledger = state.cashflow.update_account(&user_id, &portfolio, &name, req.into()).await?;
    Ok(Json(ledger))
}
