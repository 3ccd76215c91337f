use crate::application::planner::{DEFAULT_MAX_HOPS, EXTENDED_MAX_HOPS, RoutePlanner};
use crate::domain::bank::{BankGraph, BankId};
use crate::domain::ports::TaskStoreBox;
use crate::domain::route::RouteQuote;
use crate::domain::task::{TaskStatus, TransferTask};
use crate::error::{Result, TransferError};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Orchestrates route planning and the transfer task lifecycle.
///
/// Every mutating operation is one load → validate → mutate → persist cycle
/// against the task store. At most one in-flight mutating operation per task
/// id is assumed; concurrent writers to the same task are last-writer-wins.
pub struct TransferService {
    graph: Arc<BankGraph>,
    planner: RoutePlanner,
    store: TaskStoreBox,
}

impl TransferService {
    pub fn new(graph: Arc<BankGraph>, store: TaskStoreBox) -> Self {
        let planner = RoutePlanner::new(graph.clone());
        Self {
            graph,
            planner,
            store,
        }
    }

    fn validate_request(
        &self,
        currency: &str,
        amount: Decimal,
        from: BankId,
        to: BankId,
    ) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }
        if from == to {
            return Err(TransferError::SameBank);
        }
        let from_bank = self.graph.bank(from)?;
        let to_bank = self.graph.bank(to)?;
        if !from_bank.supports_currency(currency) {
            return Err(TransferError::UnsupportedCurrency {
                bank: from_bank.name.clone(),
                currency: currency.to_string(),
            });
        }
        if !to_bank.supports_currency(currency) {
            return Err(TransferError::UnsupportedCurrency {
                bank: to_bank.name.clone(),
                currency: currency.to_string(),
            });
        }
        Ok(())
    }

    /// Quotes the candidate routes for a transfer, ranked best-first.
    pub fn plan_routes(
        &self,
        currency: &str,
        amount: Decimal,
        from: BankId,
        to: BankId,
    ) -> Result<Vec<RouteQuote>> {
        self.validate_request(currency, amount, from, to)?;
        self.planner
            .find_routes(from, to, DEFAULT_MAX_HOPS)
            .into_iter()
            .map(|candidate| {
                let detail = self.planner.calculate_route_details(&candidate.path, amount)?;
                Ok(RouteQuote {
                    path: candidate.path,
                    hops: candidate.hops,
                    detail,
                })
            })
            .collect()
    }

    /// Creates a pending task. Without an explicit route the top-ranked
    /// candidate at the extended search depth is chosen.
    pub async fn create_task(
        &self,
        currency: &str,
        amount: Decimal,
        from: BankId,
        to: BankId,
        route: Option<Vec<BankId>>,
    ) -> Result<TransferTask> {
        self.validate_request(currency, amount, from, to)?;

        let route = match route {
            Some(route) => {
                if route.len() < 2 {
                    return Err(TransferError::InvalidRoute(
                        "route must span at least one hop".to_string(),
                    ));
                }
                if route.first() != Some(&from) || route.last() != Some(&to) {
                    return Err(TransferError::InvalidRoute(
                        "route must start at the source bank and end at the destination bank"
                            .to_string(),
                    ));
                }
                route
            }
            None => self
                .planner
                .find_routes(from, to, EXTENDED_MAX_HOPS)
                .into_iter()
                .next()
                .map(|candidate| candidate.path)
                .ok_or(TransferError::NoRouteAvailable { from, to })?,
        };

        let detail = self.planner.calculate_route_details(&route, amount)?;
        let task = TransferTask::new(currency, amount, from, to, route, &detail);
        info!(task_id = %task.id, from, to, hops = task.steps.len(), "transfer task created");
        self.store.put(task.clone()).await?;
        Ok(task)
    }

    pub async fn get_task(&self, id: Uuid) -> Result<TransferTask> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| TransferError::TaskNotFound(id.to_string()))
    }

    pub async fn list_tasks(&self) -> Result<Vec<TransferTask>> {
        self.store.list().await
    }

    /// Tasks still in flight: pending or processing.
    pub async fn list_open_tasks(&self) -> Result<Vec<TransferTask>> {
        let mut tasks = self.store.list().await?;
        tasks.retain(|t| matches!(t.status, TaskStatus::Pending | TaskStatus::Processing));
        Ok(tasks)
    }

    /// Removes a stored task record. Operator capability only.
    pub async fn delete_task(&self, id: Uuid) -> Result<bool> {
        self.store.delete(id).await
    }

    /// Starts the transfer: debits the source bank and sends the first hop.
    pub async fn start_transfer(&self, id: Uuid) -> Result<TransferTask> {
        let mut task = self.get_task(id).await?;
        task.start()?;
        // Simulated banking-network side effect.
        info!(
            task_id = %task.id,
            bank = task.from_bank,
            amount = %task.amount,
            currency = %task.currency,
            "debiting source account"
        );
        self.store.put(task.clone()).await?;
        Ok(task)
    }

    /// Confirms that funds arrived for the current hop.
    pub async fn confirm_arrival(
        &self,
        id: Uuid,
        actual_amount: Decimal,
        reason: &str,
    ) -> Result<TransferTask> {
        let mut task = self.get_task(id).await?;
        task.confirm_arrival(actual_amount, reason)?;
        info!(
            task_id = %task.id,
            step = task.current_step,
            actual = %actual_amount,
            status = %task.status,
            "arrival confirmed"
        );
        self.store.put(task.clone()).await?;
        Ok(task)
    }

    /// Sends funds for the next hop of a processing task.
    pub async fn send_next_step(&self, id: Uuid) -> Result<TransferTask> {
        let mut task = self.get_task(id).await?;
        task.send_next_step()?;
        let step = &task.steps[task.current_step];
        // Simulated banking-network side effect.
        info!(
            task_id = %task.id,
            from = step.from,
            to = step.to,
            expected = %step.expected_amount,
            "sending funds for next hop"
        );
        self.store.put(task.clone()).await?;
        Ok(task)
    }

    /// Cancels a pending or processing task and refunds the source.
    pub async fn cancel_task(&self, id: Uuid, reason: &str) -> Result<TransferTask> {
        let mut task = self.get_task(id).await?;
        task.cancel(reason)?;
        // Simulated banking-network side effect.
        info!(
            task_id = %task.id,
            bank = task.from_bank,
            amount = %task.amount,
            currency = %task.currency,
            "refunding source account"
        );
        self.store.put(task.clone()).await?;
        Ok(task)
    }
}
