//! ブロックエクスプローラーの取引一覧（txlist）

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ingest::{value_to_string, value_to_u128, value_to_u64};
use crate::units::{format_units, TOKEN_DECIMALS};

/// 1件の取引
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerTx {
    pub hash: String,
    pub block_number: u64,
    pub gas_used: u64,
    /// UNIX秒
    pub timestamp: u64,
    pub from: String,
    pub to: String,
    pub value: u128,
    pub is_error: bool,
}

impl ExplorerTx {
    pub const UNKNOWN_SENDER: &'static str = "Unknown";
    pub const CONTRACT_CREATION: &'static str = "Contract Creation";

    /// ETH表示
    pub fn value_eth(&self) -> String {
        format_units(self.value, TOKEN_DECIMALS)
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_error {
            "Failed"
        } else {
            "Success"
        }
    }
}

fn text_or(value: &Value, fallback: &str) -> String {
    let text = value_to_string(value);
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

/// 1件の取引を取り込む
pub fn transaction(value: &Value) -> ExplorerTx {
    ExplorerTx {
        hash: value_to_string(&value["hash"]),
        block_number: value_to_u64(&value["blockNumber"]),
        gas_used: value_to_u64(&value["gasUsed"]),
        timestamp: value_to_u64(&value["timeStamp"]),
        from: text_or(&value["from"], ExplorerTx::UNKNOWN_SENDER),
        to: text_or(&value["to"], ExplorerTx::CONTRACT_CREATION),
        value: value_to_u128(&value["value"]),
        is_error: value_to_string(&value["isError"]) == "1",
    }
}

/// `{"result": [...]}` 形式のレスポンスを取り込む（resultが配列でなければ空）
pub fn transactions(response: &Value) -> Vec<ExplorerTx> {
    match response.get("result").and_then(Value::as_array) {
        Some(items) => items.iter().filter(|tx| tx.is_object()).map(transaction).collect(),
        None => {
            log::warn!("Explorer response has no result list");
            Vec::new()
        }
    }
}

/// 集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxStats {
    pub total_transactions: usize,
    pub total_gas_used: u128,
    pub failed: usize,
}

impl TxStats {
    pub fn from_transactions(txs: &[ExplorerTx]) -> Self {
        Self {
            total_transactions: txs.len(),
            total_gas_used: txs.iter().map(|tx| tx.gas_used as u128).sum(),
            failed: txs.iter().filter(|tx| tx.is_error).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transactions_with_defaults() {
        let response = json!({
            "status": "1",
            "result": [
                {
                    "hash": "0xaaa",
                    "blockNumber": "1200",
                    "gasUsed": "21000",
                    "timeStamp": "1700000000",
                    "from": "0x01",
                    "to": "0x02",
                    "value": "1500000000000000000",
                    "isError": "0"
                },
                { "hash": "0xbbb", "isError": "1", "to": "" },
                "garbage"
            ]
        });

        let txs = transactions(&response);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].block_number, 1200);
        assert_eq!(txs[0].value_eth(), "1.5");
        assert_eq!(txs[0].status_label(), "Success");

        assert_eq!(txs[1].from, "Unknown");
        assert_eq!(txs[1].to, "Contract Creation");
        assert_eq!(txs[1].gas_used, 0);
        assert_eq!(txs[1].value_eth(), "0.0");
        assert!(txs[1].is_error);
    }

    #[test]
    fn test_missing_result() {
        assert!(transactions(&json!({ "message": "rate limited" })).is_empty());
        assert!(transactions(&json!({ "result": "Max rate limit reached" })).is_empty());
    }

    #[test]
    fn test_stats() {
        let txs = vec![
            ExplorerTx { gas_used: 21000, ..Default::default() },
            ExplorerTx { gas_used: 50000, is_error: true, ..Default::default() },
        ];
        let stats = TxStats::from_transactions(&txs);
        assert_eq!(stats.total_transactions, 2);
        assert_eq!(stats.total_gas_used, 71000);
        assert_eq!(stats.failed, 1);
        assert_eq!(TxStats::from_transactions(&[]), TxStats::default());
    }
}
