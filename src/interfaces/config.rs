use crate::domain::bank::{Bank, BankGraph, BankId, Channel, FeeSchedule};
use crate::error::{Result, TransferError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One bank entry in the configuration document. The document is a JSON map
/// keyed by bank name; unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BankEntry {
    id: BankId,
    name: String,
    #[serde(default)]
    currencies: Vec<String>,
    #[serde(default)]
    reachable_banks: Vec<ChannelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelEntry {
    id: BankId,
    #[serde(default)]
    bank_name: String,
    transfer_fee: FeeEntry,
    arrival_fee: FeeEntry,
    expected_duration: String,
}

#[derive(Debug, Deserialize)]
struct FeeEntry {
    fixed: Decimal,
    percentage: Decimal,
}

impl From<FeeEntry> for FeeSchedule {
    fn from(fee: FeeEntry) -> Self {
        FeeSchedule::new(fee.fixed, fee.percentage)
    }
}

/// Reads a bank-network configuration document from any `Read` source.
pub struct BankConfigReader<R: Read> {
    source: R,
}

impl<R: Read> BankConfigReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Parses and validates the document into a [`BankGraph`].
    ///
    /// Beyond the structural checks `BankGraph::new` enforces, this verifies
    /// that each entry's name matches its key and that channel target names
    /// are consistent with the target bank's own entry.
    pub fn read(self) -> Result<BankGraph> {
        let entries: HashMap<String, BankEntry> = serde_json::from_reader(self.source)?;

        for (key, entry) in &entries {
            if entry.name != *key {
                return Err(TransferError::Config(format!(
                    "bank entry {key:?} declares mismatched name {:?}",
                    entry.name
                )));
            }
            for channel in &entry.reachable_banks {
                if channel.bank_name.is_empty() {
                    continue;
                }
                let target = entries.values().find(|e| e.id == channel.id);
                match target {
                    Some(target) if target.name != channel.bank_name => {
                        return Err(TransferError::Config(format!(
                            "channel {} -> {} names {:?}, expected {:?}",
                            entry.id, channel.id, channel.bank_name, target.name
                        )));
                    }
                    _ => {}
                }
            }
        }

        let banks = entries
            .into_values()
            .map(|entry| Bank {
                id: entry.id,
                name: entry.name,
                currencies: entry.currencies,
                channels: entry
                    .reachable_banks
                    .into_iter()
                    .map(|c| Channel {
                        to: c.id,
                        transfer_fee: c.transfer_fee.into(),
                        arrival_fee: c.arrival_fee.into(),
                        expected_duration: c.expected_duration,
                    })
                    .collect(),
            })
            .collect();

        BankGraph::new(banks)
    }
}

/// Loads the bank graph from a configuration file.
pub fn load_banks<P: AsRef<Path>>(path: P) -> Result<BankGraph> {
    let file = File::open(path)?;
    BankConfigReader::new(file).read()
}
