pub mod bridge;
pub mod mock;

use async_trait::async_trait;
use serde::{Serialize, Serializer};

use crate::drafts::EventDraft;
use crate::error::{CoreError, Result};
use crate::explorer::ExplorerTx;
use crate::types::{Address, EventDetail, EventRecord, StakePosition, TxResult};

/// コントラクト読み取りtrait
///
/// チェーンSDKへの依存はこの裏に隠す
/// WASM環境ではシングルスレッドのため、Send + Sync要件なし
#[async_trait(?Send)]
pub trait ContractReader {
    /// ファクトリーの全イベント
    async fn read_events(&self) -> Result<Vec<EventRecord>>;

    /// 指定アカウントが作成したイベント
    async fn read_user_events(&self, owner: &Address) -> Result<Vec<EventRecord>>;

    /// イベント詳細
    async fn read_event_detail(&self, event: &Address) -> Result<EventDetail>;

    /// ステーキング状況と残高
    async fn read_stake_position(&self, account: &Address) -> Result<StakePosition>;

    /// エクスプローラーの取引一覧
    async fn read_transactions(&self, url: &str) -> Result<Vec<ExplorerTx>>;
}

/// トランザクション送信trait（ウォレット）
#[async_trait(?Send)]
pub trait ContractWriter {
    /// 接続中のアカウント
    async fn account(&self) -> Result<Option<Address>>;

    /// 送信して承認まで待つ
    async fn submit(&self, call: &ContractCall) -> Result<TxResult>;
}

fn decimal<S: Serializer>(value: &u128, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    // JSの数値に収まらないため10進文字列で渡す
    serializer.serialize_str(&value.to_string())
}

/// 書き込み系のコントラクト呼び出し
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ContractCall {
    DeployEvent(EventDraft),
    AddTier {
        event: Address,
        name: String,
        #[serde(serialize_with = "decimal")]
        amount: u128,
    },
    RemoveTier {
        event: Address,
        index: usize,
    },
    Fund {
        event: Address,
        tier_index: usize,
        #[serde(serialize_with = "decimal")]
        value: u128,
    },
    ApproveStake {
        #[serde(serialize_with = "decimal")]
        amount: u128,
    },
    Stake {
        #[serde(serialize_with = "decimal")]
        amount: u128,
    },
    Withdraw {
        #[serde(serialize_with = "decimal")]
        amount: u128,
    },
    ClaimRewards,
    ClaimTokens {
        to: Address,
        quantity: u64,
    },
    /// 記念品NFTを1枚発行（ERC-721 claimTo）
    ClaimSouvenir {
        contract: Address,
        to: Address,
    },
}

impl ContractCall {
    /// メソッド名（ログ用）
    pub fn method(&self) -> &'static str {
        match self {
            ContractCall::DeployEvent(_) => "deployEvent",
            ContractCall::AddTier { .. } => "addTier",
            ContractCall::RemoveTier { .. } => "removeTier",
            ContractCall::Fund { .. } => "fund",
            ContractCall::ApproveStake { .. } => "approveStake",
            ContractCall::Stake { .. } => "stake",
            ContractCall::Withdraw { .. } => "withdraw",
            ContractCall::ClaimRewards => "claimRewards",
            ContractCall::ClaimTokens { .. } => "claimTokens",
            ContractCall::ClaimSouvenir { .. } => "claimSouvenir",
        }
    }

    /// 送信中の通知文
    pub fn pending_message(&self) -> &'static str {
        match self {
            ContractCall::DeployEvent(_) => "Deploying event...",
            ContractCall::AddTier { .. } => "Add tier pending...",
            ContractCall::RemoveTier { .. } => "Removing tier in progress...",
            ContractCall::Fund { .. } => "Transaction processing...",
            ContractCall::ApproveStake { .. } => "Approval pending...",
            ContractCall::Stake { .. } => "Stake pending...",
            ContractCall::Withdraw { .. } => "Withdraw pending...",
            ContractCall::ClaimRewards => "Claiming rewards...",
            ContractCall::ClaimTokens { .. } => "Claiming tokens...",
            ContractCall::ClaimSouvenir { .. } => "Transaction pending...",
        }
    }

    /// 成功時の通知文
    pub fn success_message(&self, result: &TxResult) -> String {
        match self {
            ContractCall::DeployEvent(_) => match &result.contract_address {
                Some(address) => format!("Contract deployed successfully! Address: {}", address),
                None => "Contract deployed successfully!".to_string(),
            },
            ContractCall::AddTier { .. } => "Tier added successfully!".to_string(),
            ContractCall::RemoveTier { .. } => "Removed successfully!".to_string(),
            ContractCall::Fund { .. } => "Funded successfully!".to_string(),
            ContractCall::ApproveStake { .. } => "Approved! You can now stake.".to_string(),
            ContractCall::Stake { .. } => "Staked successfully!".to_string(),
            ContractCall::Withdraw { .. } => "Withdrawn successfully!".to_string(),
            ContractCall::ClaimRewards => "Rewards claimed!".to_string(),
            ContractCall::ClaimTokens { .. } => "Tokens claimed!".to_string(),
            ContractCall::ClaimSouvenir { .. } => "NFT claimed successfully!".to_string(),
        }
    }

    /// 送信後にイベント一覧の再取得が必要か
    pub fn changes_events(&self) -> bool {
        matches!(
            self,
            ContractCall::DeployEvent(_)
                | ContractCall::AddTier { .. }
                | ContractCall::RemoveTier { .. }
                | ContractCall::Fund { .. }
        )
    }

    /// 送信前の検証
    pub fn validate(&self) -> Result<()> {
        match self {
            ContractCall::DeployEvent(draft) => draft.validate(),
            ContractCall::AddTier { name, .. } if name.trim().is_empty() => {
                Err(CoreError::InvalidInput("Tier name must not be empty".to_string()))
            }
            ContractCall::ClaimSouvenir { contract, to } if contract.is_empty() || to.is_empty() => {
                Err(CoreError::InvalidInput("Please connect your wallet to claim.".to_string()))
            }
            ContractCall::ApproveStake { amount }
            | ContractCall::Stake { amount }
            | ContractCall::Withdraw { amount }
                if *amount == 0 =>
            {
                Err(CoreError::InvalidInput(format!("{} amount must be positive", self.method())))
            }
            _ => Ok(()),
        }
    }

    /// 対象イベント（あれば）
    pub fn event(&self) -> Option<&Address> {
        match self {
            ContractCall::AddTier { event, .. }
            | ContractCall::RemoveTier { event, .. }
            | ContractCall::Fund { event, .. } => Some(event),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_serialization() {
        let call = ContractCall::Fund {
            event: Address::from_raw("0xabc"),
            tier_index: 2,
            value: 200_000_000_000_000_000_000,
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["method"], "fund");
        assert_eq!(json["event"], "0xabc");
        assert_eq!(json["tierIndex"], 2);
        assert_eq!(json["value"], "200000000000000000000");

        let json = serde_json::to_value(ContractCall::ClaimRewards).unwrap();
        assert_eq!(json, serde_json::json!({ "method": "claimRewards" }));
    }

    #[test]
    fn test_claim_souvenir_call() {
        let call = ContractCall::ClaimSouvenir {
            contract: Address::from_raw("0x79dc3441FB8d05BeA4Edf372C0BF1c36be4ae8C8"),
            to: Address::from_raw("0xaa"),
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["method"], "claimSouvenir");
        assert_eq!(json["contract"], "0x79dc3441FB8d05BeA4Edf372C0BF1c36be4ae8C8");
        assert_eq!(json["to"], "0xaa");
        assert_eq!(call.pending_message(), "Transaction pending...");
        assert!(call.validate().is_ok());
        assert!(!call.changes_events());

        let unconnected = ContractCall::ClaimSouvenir {
            contract: Address::from_raw("0x79dc3441FB8d05BeA4Edf372C0BF1c36be4ae8C8"),
            to: Address::default(),
        };
        assert!(unconnected.validate().is_err());
    }

    #[test]
    fn test_deploy_event_is_flattened() {
        let mut draft = EventDraft::new();
        draft.set_title("Shelter");
        let json = serde_json::to_value(ContractCall::DeployEvent(draft)).unwrap();
        assert_eq!(json["method"], "deployEvent");
        assert_eq!(json["title"], "Shelter");
        assert_eq!(json["target"], 1);
    }

    #[test]
    fn test_messages() {
        let call = ContractCall::DeployEvent(EventDraft::new());
        assert_eq!(call.method(), "deployEvent");
        let result = TxResult {
            tx_hash: "0x01".to_string(),
            contract_address: Some(Address::from_raw("0xbeef")),
        };
        assert_eq!(
            call.success_message(&result),
            "Contract deployed successfully! Address: 0xbeef"
        );
        assert!(call.changes_events());
        assert!(!ContractCall::ClaimRewards.changes_events());
        assert_eq!(ContractCall::ClaimRewards.event(), None);
    }

    #[test]
    fn test_validate() {
        assert!(ContractCall::DeployEvent(EventDraft::new()).validate().is_err());
        assert!(ContractCall::Stake { amount: 0 }.validate().is_err());
        assert!(ContractCall::Stake { amount: 1 }.validate().is_ok());
        let blank = ContractCall::AddTier {
            event: Address::from_raw("0x01"),
            name: "  ".to_string(),
            amount: 5,
        };
        assert!(blank.validate().is_err());
        assert!(ContractCall::ClaimRewards.validate().is_ok());
    }
}
