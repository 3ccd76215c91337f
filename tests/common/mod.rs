use hoptrack::domain::bank::{Bank, BankGraph, Channel, FeeSchedule};
use rust_decimal_macros::dec;
use std::path::{Path, PathBuf};

/// The test network:
///
/// ```text
/// 1 ──实时──▶ 2 ──2-4小时──▶ 3
/// │                          ▲
/// └────1-2小时───────────────┘   (direct 1→3, higher fixed fee)
/// 2 ──immediate──▶ 4
/// 5 (isolated)
/// ```
pub fn sample_graph() -> BankGraph {
    BankGraph::new(vec![
        Bank {
            id: 1,
            name: "Alpha Bank".to_string(),
            currencies: vec!["USD".to_string(), "EUR".to_string()],
            channels: vec![
                Channel {
                    to: 2,
                    transfer_fee: FeeSchedule::new(dec!(10), dec!(0.001)),
                    arrival_fee: FeeSchedule::new(dec!(5), dec!(0.0005)),
                    expected_duration: "实时".to_string(),
                },
                Channel {
                    to: 3,
                    transfer_fee: FeeSchedule::new(dec!(50), dec!(0.002)),
                    arrival_fee: FeeSchedule::new(dec!(5), dec!(0.0005)),
                    expected_duration: "1-2小时".to_string(),
                },
            ],
        },
        Bank {
            id: 2,
            name: "Beta Bank".to_string(),
            currencies: vec!["USD".to_string()],
            channels: vec![
                Channel {
                    to: 3,
                    transfer_fee: FeeSchedule::new(dec!(20), dec!(0.002)),
                    arrival_fee: FeeSchedule::new(dec!(0), dec!(0.001)),
                    expected_duration: "2-4小时".to_string(),
                },
                Channel {
                    to: 4,
                    transfer_fee: FeeSchedule::new(dec!(30), dec!(0.001)),
                    arrival_fee: FeeSchedule::new(dec!(5), dec!(0)),
                    expected_duration: "immediate".to_string(),
                },
            ],
        },
        Bank {
            id: 3,
            name: "Gamma Clearing".to_string(),
            currencies: vec!["USD".to_string(), "EUR".to_string()],
            channels: vec![],
        },
        Bank {
            id: 4,
            name: "Delta Trust".to_string(),
            currencies: vec!["USD".to_string()],
            channels: vec![],
        },
        Bank {
            id: 5,
            name: "Omega Bank".to_string(),
            currencies: vec!["USD".to_string()],
            channels: vec![],
        },
    ])
    .expect("sample graph is valid")
}

/// Writes the equivalent network as a configuration file for CLI tests.
pub fn write_banks_config(dir: &Path) -> PathBuf {
    let doc = r#"{
        "Alpha Bank": {
            "id": 1,
            "name": "Alpha Bank",
            "currencies": ["USD", "EUR"],
            "reachableBanks": [
                {
                    "id": 2,
                    "bankName": "Beta Bank",
                    "transferFee": { "fixed": "10", "percentage": "0.001" },
                    "arrivalFee": { "fixed": "5", "percentage": "0.0005" },
                    "expectedDuration": "实时"
                },
                {
                    "id": 3,
                    "bankName": "Gamma Clearing",
                    "transferFee": { "fixed": "50", "percentage": "0.002" },
                    "arrivalFee": { "fixed": "5", "percentage": "0.0005" },
                    "expectedDuration": "1-2小时"
                }
            ]
        },
        "Beta Bank": {
            "id": 2,
            "name": "Beta Bank",
            "currencies": ["USD"],
            "reachableBanks": [
                {
                    "id": 3,
                    "bankName": "Gamma Clearing",
                    "transferFee": { "fixed": "20", "percentage": "0.002" },
                    "arrivalFee": { "fixed": "0", "percentage": "0.001" },
                    "expectedDuration": "2-4小时"
                }
            ]
        },
        "Gamma Clearing": {
            "id": 3,
            "name": "Gamma Clearing",
            "currencies": ["USD", "EUR"],
            "reachableBanks": []
        }
    }"#;
    let path = dir.join("banks.json");
    std::fs::write(&path, doc).expect("write banks config");
    path
}
