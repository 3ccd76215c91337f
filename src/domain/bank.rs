use crate::error::{Result, TransferError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical bank identifier, used everywhere a bank is referenced.
pub type BankId = u32;

/// A two-part fee: a fixed component plus a percentage of the transfer amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub fixed: Decimal,
    pub percentage: Decimal,
}

impl FeeSchedule {
    pub fn new(fixed: Decimal, percentage: Decimal) -> Self {
        Self { fixed, percentage }
    }

    /// Fee due for transferring `amount` over the channel.
    pub fn amount_due(&self, amount: Decimal) -> Decimal {
        self.fixed + amount * self.percentage
    }
}

/// A directed, fee-bearing transfer path from one bank to another.
///
/// Channel existence is directional: a channel A→B does not imply B→A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Target bank identifier.
    pub to: BankId,
    pub transfer_fee: FeeSchedule,
    pub arrival_fee: FeeSchedule,
    /// Free-text duration descriptor, e.g. `实时`, `immediate` or `2-4小时`.
    pub expected_duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    pub id: BankId,
    pub name: String,
    pub currencies: Vec<String>,
    /// Outbound channels only.
    pub channels: Vec<Channel>,
}

impl Bank {
    pub fn supports_currency(&self, currency: &str) -> bool {
        self.currencies.iter().any(|c| c == currency)
    }
}

/// The static directed graph of banks and channels.
///
/// Built once at startup and shared read-only; no mutation is exposed.
#[derive(Debug, Clone)]
pub struct BankGraph {
    banks: HashMap<BankId, Bank>,
}

impl BankGraph {
    /// Builds the graph, enforcing its structural invariants: bank ids are
    /// unique and every channel target resolves to an existing bank.
    pub fn new(banks: Vec<Bank>) -> Result<Self> {
        let mut map = HashMap::with_capacity(banks.len());
        for bank in banks {
            if let Some(previous) = map.insert(bank.id, bank) {
                return Err(TransferError::Config(format!(
                    "duplicate bank id {} ({})",
                    previous.id, previous.name
                )));
            }
        }
        for bank in map.values() {
            for channel in &bank.channels {
                if !map.contains_key(&channel.to) {
                    return Err(TransferError::Config(format!(
                        "bank {} ({}) has a channel to unknown bank {}",
                        bank.id, bank.name, channel.to
                    )));
                }
            }
        }
        Ok(Self { banks: map })
    }

    pub fn get(&self, id: BankId) -> Option<&Bank> {
        self.banks.get(&id)
    }

    /// Canonical lookup, failing with `BankNotFound`.
    pub fn bank(&self, id: BankId) -> Result<&Bank> {
        self.banks.get(&id).ok_or(TransferError::BankNotFound(id))
    }

    /// The channel from `from` to `to`, failing with `MissingChannel` when the
    /// edge does not exist.
    pub fn channel(&self, from: BankId, to: BankId) -> Result<&Channel> {
        self.bank(from)?
            .channels
            .iter()
            .find(|c| c.to == to)
            .ok_or(TransferError::MissingChannel { from, to })
    }

    pub fn banks(&self) -> impl Iterator<Item = &Bank> {
        self.banks.values()
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }
}
