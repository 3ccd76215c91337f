use crate::domain::bank::BankId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A candidate route produced by discovery, ranked before any concrete amount
/// is known. `fixed_fees` sums only the fixed fee components along the path;
/// percentage components need an amount and are priced by
/// [`RouteDetail`](RouteDetail) instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCandidate {
    /// Ordered bank ids, source first, destination last.
    pub path: Vec<BankId>,
    pub hops: usize,
    pub fixed_fees: Decimal,
    pub duration_minutes: i64,
}

/// Priced breakdown of a single hop for a concrete amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDetail {
    pub from: BankId,
    pub to: BankId,
    pub transfer_fee: Decimal,
    pub arrival_fee: Decimal,
    pub total_step_fee: Decimal,
    pub expected_duration: String,
    pub duration_minutes: i64,
}

/// Full fee and duration breakdown of a route for a concrete amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDetail {
    pub steps: Vec<StepDetail>,
    pub total_fees: Decimal,
    pub total_duration_minutes: i64,
    /// Initial amount minus total fees.
    pub net_amount: Decimal,
}

/// A quoted route as returned to callers of `plan_routes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteQuote {
    pub path: Vec<BankId>,
    pub hops: usize,
    #[serde(flatten)]
    pub detail: RouteDetail,
}
