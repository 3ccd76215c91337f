use crate::domain::bank::BankId;
use crate::domain::route::RouteDetail;
use crate::error::{Result, TransferError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a transfer task.
///
/// `pending → processing → completed`, with `cancelled` reachable from
/// `pending` or `processing`. Completed and cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored status of a single step: funds not yet sent, or sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Sent,
}

/// Display-level state of a step, derived from the stored fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepRenderState {
    Pending,
    Sent,
    ArrivalConfirmed,
}

/// Execution record of one hop: route\[i\] → route\[i+1\].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub from: BankId,
    pub to: BankId,
    /// Estimated arrival amount. Set at creation from the cumulative fee
    /// schedule, then recomputed from the previous hop's confirmed amount when
    /// the step is sent.
    pub expected_amount: Decimal,
    /// Operator-confirmed arrival amount; `None` until confirmed.
    pub actual_amount: Option<Decimal>,
    pub transfer_fee: Decimal,
    pub arrival_fee: Decimal,
    pub total_step_fee: Decimal,
    pub expected_duration: String,
    pub status: StepStatus,
    pub arrival_confirmed: bool,
    #[serde(default)]
    pub amount_mismatch_reason: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Step {
    /// Pure derivation of the display state from the stored flags.
    pub fn render_state(&self) -> StepRenderState {
        if self.arrival_confirmed {
            StepRenderState::ArrivalConfirmed
        } else {
            match self.status {
                StepStatus::Pending => StepRenderState::Pending,
                StepStatus::Sent => StepRenderState::Sent,
            }
        }
    }
}

/// A tracked multi-hop transfer.
///
/// The task exclusively owns its step array; one in-flight mutating operation
/// per task id is assumed (see the concurrency note on `TransferService`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferTask {
    pub id: Uuid,
    pub currency: String,
    /// Initial amount debited from the source bank.
    pub amount: Decimal,
    pub from_bank: BankId,
    pub to_bank: BankId,
    /// Ordered bank ids, source first, destination last; `steps.len() + 1`.
    pub route: Vec<BankId>,
    /// Index into `steps` of the hop currently being executed.
    pub current_step: usize,
    pub status: TaskStatus,
    pub steps: Vec<Step>,
    pub total_fees: Decimal,
    pub net_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub cancellation_reason: String,
}

impl TransferTask {
    /// Builds a pending task for a priced route.
    ///
    /// Step i's expected amount is the initial amount minus the cumulative
    /// step fees through step i: each hop's estimate already reflects every
    /// fee deducted up to and including that hop.
    pub fn new(
        currency: &str,
        amount: Decimal,
        from_bank: BankId,
        to_bank: BankId,
        route: Vec<BankId>,
        detail: &RouteDetail,
    ) -> Self {
        let now = Utc::now();
        let mut cumulative_fees = Decimal::ZERO;
        let steps = detail
            .steps
            .iter()
            .map(|sd| {
                cumulative_fees += sd.total_step_fee;
                Step {
                    from: sd.from,
                    to: sd.to,
                    expected_amount: amount - cumulative_fees,
                    actual_amount: None,
                    transfer_fee: sd.transfer_fee,
                    arrival_fee: sd.arrival_fee,
                    total_step_fee: sd.total_step_fee,
                    expected_duration: sd.expected_duration.clone(),
                    status: StepStatus::Pending,
                    arrival_confirmed: false,
                    amount_mismatch_reason: String::new(),
                    sent_at: None,
                    confirmed_at: None,
                }
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            currency: currency.to_string(),
            amount,
            from_bank,
            to_bank,
            route,
            current_step: 0,
            status: TaskStatus::Pending,
            steps,
            total_fees: detail.total_fees,
            net_amount: detail.net_amount,
            created_at: now,
            updated_at: now,
            cancellation_reason: String::new(),
        }
    }

    /// Starts the transfer: debits the source and marks the first hop sent.
    pub fn start(&mut self) -> Result<()> {
        if self.status != TaskStatus::Pending {
            return Err(TransferError::InvalidStateTransition(format!(
                "cannot start a {} task",
                self.status
            )));
        }
        let now = Utc::now();
        let step = self.steps.get_mut(0).ok_or_else(|| {
            TransferError::InvalidStateTransition("task has no steps".to_string())
        })?;
        step.status = StepStatus::Sent;
        step.sent_at = Some(now);
        self.status = TaskStatus::Processing;
        self.updated_at = now;
        Ok(())
    }

    /// Records the operator-confirmed arrival for the current hop.
    ///
    /// The actual amount may differ from the expected one; `reason` is stored
    /// verbatim alongside it. Confirming the last hop completes the task;
    /// otherwise the task stays processing until `send_next_step` is called.
    pub fn confirm_arrival(&mut self, actual_amount: Decimal, reason: &str) -> Result<()> {
        if self.status != TaskStatus::Processing {
            return Err(TransferError::InvalidStateTransition(format!(
                "cannot confirm arrival on a {} task",
                self.status
            )));
        }
        let now = Utc::now();
        let last = self.steps.len().saturating_sub(1);
        let index = self.current_step;
        let step = self.steps.get_mut(index).ok_or_else(|| {
            TransferError::InvalidStateTransition(format!("no step at index {index}"))
        })?;
        step.actual_amount = Some(actual_amount);
        step.arrival_confirmed = true;
        step.amount_mismatch_reason = reason.to_string();
        step.confirmed_at = Some(now);
        if index == last {
            self.status = TaskStatus::Completed;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Advances to the next hop and marks it sent.
    ///
    /// The new hop's expected amount is recomputed from real funds: the
    /// previous hop's confirmed amount minus the new hop's own fee, replacing
    /// the static estimate made at creation time.
    pub fn send_next_step(&mut self) -> Result<()> {
        if self.status != TaskStatus::Processing {
            return Err(TransferError::InvalidStateTransition(format!(
                "cannot send the next step of a {} task",
                self.status
            )));
        }
        if self.current_step + 1 >= self.steps.len() {
            return Err(TransferError::InvalidStateTransition(
                "already at the final step".to_string(),
            ));
        }
        let current = &self.steps[self.current_step];
        if !current.arrival_confirmed {
            return Err(TransferError::InvalidStateTransition(
                "funds have not arrived at the current step".to_string(),
            ));
        }
        let confirmed_amount = current.actual_amount.ok_or_else(|| {
            TransferError::InvalidStateTransition(
                "current step has no confirmed amount".to_string(),
            )
        })?;

        let now = Utc::now();
        self.current_step += 1;
        let next = &mut self.steps[self.current_step];
        next.expected_amount = confirmed_amount - next.total_step_fee;
        next.status = StepStatus::Sent;
        next.sent_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Cancels the task, recording the reason. Refused once terminal.
    pub fn cancel(&mut self, reason: &str) -> Result<()> {
        if self.status.is_terminal() {
            return Err(TransferError::InvalidStateTransition(format!(
                "cannot cancel a {} task",
                self.status
            )));
        }
        self.status = TaskStatus::Cancelled;
        self.cancellation_reason = reason.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }
}
