use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::ClientSession;

use crate::{
    error::{Result, ServiceError},
    models::{Investor, Movement, MovementKind},
    AppState,
};

use super::user_store;

/// Signed change a ledger event applies to the cash balance. Purchases and
/// sales carry a positive amount; a purchase decreases the balance, a sale
/// increases it, an adjustment passes its delta through unchanged.
pub fn balance_delta(kind: MovementKind, amount: f64) -> f64 {
    match kind {
        MovementKind::Purchase => -amount,
        MovementKind::Sale => amount,
        MovementKind::Adjustment => amount,
    }
}

fn validate_quantity(quantity: i64) -> Result<()> {
    if quantity <= 0 {
        return Err(ServiceError::validation("quantity must be a positive integer"));
    }
    Ok(())
}

fn validate_reference(reference: &str) -> Result<()> {
    if reference.trim().is_empty() {
        return Err(ServiceError::validation("missing reference"));
    }
    Ok(())
}

async fn require_investor(state: &AppState, username: &str) -> Result<Investor> {
    user_store::find_investor_by_username(state, username)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Books a market buy: prices the symbol, decreases the balance and appends
/// a PURCHASE movement. The balance may go negative — funds checks belong
/// to the order-approval workflow, not the ledger. Returns the new balance.
///
/// Not idempotent: on an ambiguous failure the caller must check before
/// retrying, a blind retry books the purchase twice.
pub async fn record_purchase(
    state: &AppState,
    username: &str,
    symbol: &str,
    quantity: i64,
) -> Result<f64> {
    validate_quantity(quantity)?;
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ServiceError::validation("missing symbol"));
    }

    let investor = require_investor(state, username).await?;
    let quote = state.quotes.quote(&symbol).await?;
    let amount = quote.current * quantity as f64;

    apply(state, &investor, MovementKind::Purchase, &symbol, amount).await
}

/// Books a market sell; symmetric to `record_purchase`, balance increases.
pub async fn record_sale(
    state: &AppState,
    username: &str,
    symbol: &str,
    quantity: i64,
) -> Result<f64> {
    validate_quantity(quantity)?;
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ServiceError::validation("missing symbol"));
    }

    let investor = require_investor(state, username).await?;
    let quote = state.quotes.quote(&symbol).await?;
    let amount = quote.current * quantity as f64;

    apply(state, &investor, MovementKind::Sale, &symbol, amount).await
}

/// Applies a signed balance correction (deposit, fee, manual fix) under a
/// free-text reference.
pub async fn record_adjustment(
    state: &AppState,
    username: &str,
    reference: &str,
    delta: f64,
) -> Result<f64> {
    validate_reference(reference)?;

    let investor = require_investor(state, username).await?;
    apply(state, &investor, MovementKind::Adjustment, reference.trim(), delta).await
}

/// Movements of one investor, oldest first. A plain read — callers can
/// repeat it freely.
pub async fn list_movements(state: &AppState, username: &str) -> Result<Vec<Movement>> {
    let investor = require_investor(state, username).await?;

    let movements = state.db.collection::<Movement>("movements");
    let find_opts = FindOptions::builder().sort(doc! { "created_at": 1 }).build();

    let mut cursor = movements
        .find(doc! { "investor_id": investor.id }, find_opts)
        .await?;

    let mut out: Vec<Movement> = vec![];
    while let Some(res) = cursor.next().await {
        out.push(res?);
    }
    Ok(out)
}

// The balance change is a single `$inc` (atomic per document, so concurrent
// events on one investor cannot lose updates) and the movement insert runs
// in the same transaction: either both persist or neither.
async fn apply(
    state: &AppState,
    investor: &Investor,
    kind: MovementKind,
    symbol: &str,
    amount: f64,
) -> Result<f64> {
    let delta = balance_delta(kind, amount);
    let now = Utc::now().timestamp();

    let movement = Movement {
        id: ObjectId::new(),
        investor_id: investor.id,
        kind,
        symbol: symbol.to_string(),
        amount,
        created_at: now,
    };

    let mut session = state.client.start_session(None).await?;
    session.start_transaction(None).await?;

    match write_pair(state, &mut session, investor.id, delta, now, &movement).await {
        Ok(new_balance) => {
            session.commit_transaction().await?;
            Ok(new_balance)
        }
        Err(e) => {
            let _ = session.abort_transaction().await;
            Err(e)
        }
    }
}

async fn write_pair(
    state: &AppState,
    session: &mut ClientSession,
    investor_id: ObjectId,
    delta: f64,
    now: i64,
    movement: &Movement,
) -> Result<f64> {
    let investors = state.db.collection::<Investor>("investors");
    let movements = state.db.collection::<Movement>("movements");

    let opts = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();

    let updated = investors
        .find_one_and_update_with_session(
            doc! { "_id": investor_id },
            doc! { "$inc": { "balance": delta }, "$set": { "updated_at": now } },
            opts,
            session,
        )
        .await?
        .ok_or(ServiceError::NotFound)?;

    movements
        .insert_one_with_session(movement, None, session)
        .await?;

    Ok(updated.balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_decreases_sale_increases() {
        assert_eq!(balance_delta(MovementKind::Purchase, 50.0), -50.0);
        assert_eq!(balance_delta(MovementKind::Sale, 50.0), 50.0);
    }

    #[test]
    fn adjustment_keeps_its_sign() {
        assert_eq!(balance_delta(MovementKind::Adjustment, 1.0), 1.0);
        assert_eq!(balance_delta(MovementKind::Adjustment, -25.5), -25.5);
    }

    #[test]
    fn purchase_may_overdraw() {
        // buying 10 @ 5.0 from a zero balance lands at -50.0, no guard
        let balance = 0.0 + balance_delta(MovementKind::Purchase, 5.0 * 10.0);
        assert_eq!(balance, -50.0);
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(matches!(
            validate_quantity(0),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            validate_quantity(-5),
            Err(ServiceError::Validation(_))
        ));
    }
}
