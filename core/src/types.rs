use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// コントラクトアドレス（0x + 40桁hex）
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// 厳密にパース（ユーザー入力・設定値用）
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| CoreError::InvalidInput(format!("Address must start with 0x: {}", value)))?;

        if body.len() != 40 {
            return Err(CoreError::InvalidInput(format!("Address must be 20 bytes: {}", value)));
        }
        hex::decode(body)
            .map_err(|e| CoreError::InvalidInput(format!("Invalid address {}: {}", value, e)))?;

        Ok(Self(format!("0x{}", body)))
    }

    /// 検証せずに包む（取り込み境界で使用）
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 大文字小文字を無視して比較
    pub fn same_as(&self, other: &Address) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// 表示用に短縮（0x1234…abcd）
    pub fn short(&self) -> String {
        if self.0.len() <= 12 || !self.0.is_ascii() {
            return self.0.clone();
        }
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// イベントのカテゴリー（固定6種）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    NonProfit,
    AnimalCharities,
    UnderprivilegedGroup,
    PolyU,
    Eie,
    Comp,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::NonProfit,
        Category::AnimalCharities,
        Category::UnderprivilegedGroup,
        Category::PolyU,
        Category::Eie,
        Category::Comp,
    ];

    /// 未知のIDに対する表示名
    pub const UNKNOWN_NAME: &'static str = "Unknown";

    pub fn id(&self) -> u8 {
        match self {
            Category::NonProfit => 0,
            Category::AnimalCharities => 1,
            Category::UnderprivilegedGroup => 2,
            Category::PolyU => 3,
            Category::Eie => 4,
            Category::Comp => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::NonProfit => "NonProfit",
            Category::AnimalCharities => "AnimalCharities",
            Category::UnderprivilegedGroup => "UnderprivilegedGroup",
            Category::PolyU => "PolyU",
            Category::Eie => "EIE",
            Category::Comp => "COMP",
        }
    }

    pub fn from_id(id: u8) -> Option<Category> {
        Self::ALL.iter().copied().find(|c| c.id() == id)
    }

    /// IDから表示名（未知のIDは "Unknown"）
    pub fn display_name(id: u8) -> &'static str {
        Self::from_id(id).map(|c| c.name()).unwrap_or(Self::UNKNOWN_NAME)
    }
}

/// 一覧表示用のイベントレコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub address: Address,
    pub owner: Address,
    pub title: String,
    pub creation_timestamp: u64,
    pub image_url: String,
    pub category: u8,
}

impl EventRecord {
    pub fn category(&self) -> Option<Category> {
        Category::from_id(self.category)
    }

    pub fn category_name(&self) -> &'static str {
        Category::display_name(self.category)
    }
}

/// イベントの状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventState {
    Active,
    Successful,
    Failed,
    #[default]
    Unknown,
}

impl EventState {
    pub fn from_id(id: u64) -> Self {
        match id {
            0 => EventState::Active,
            1 => EventState::Successful,
            2 => EventState::Failed,
            _ => EventState::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventState::Active => "Active",
            EventState::Successful => "Successful",
            EventState::Failed => "Failed",
            EventState::Unknown => "Unknown",
        }
    }
}

/// 支援ティア
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    /// wei単位の金額
    pub amount: u128,
    pub backers: u64,
}

/// イベント詳細
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetail {
    pub address: Address,
    pub title: String,
    pub narratives: String,
    pub category: u8,
    pub image_url: String,
    pub balance: u128,
    pub target: u128,
    /// 締切（UNIX秒）
    pub deadline: u64,
    pub owner: Address,
    pub state: EventState,
    pub tiers: Vec<Tier>,
}

impl EventDetail {
    /// 達成率（0〜100）
    pub fn progress_percent(&self) -> f64 {
        if self.balance == 0 || self.target == 0 {
            return 0.0;
        }
        let percentage = self.balance as f64 / self.target as f64 * 100.0;
        percentage.min(100.0)
    }

    pub fn deadline_passed(&self, now: u64) -> bool {
        self.deadline < now
    }

    pub fn is_owner(&self, account: &Address) -> bool {
        !account.is_empty() && self.owner.same_as(account)
    }

    pub fn total_backers(&self) -> u64 {
        self.tiers.iter().map(|t| t.backers).sum()
    }

    pub fn category_name(&self) -> &'static str {
        Category::display_name(self.category)
    }
}

/// ステーキング状況
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePosition {
    pub staked: u128,
    pub unclaimed_rewards: u128,
    pub stake_token_balance: u128,
    pub reward_token_balance: u128,
}

/// トランザクション送信結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    pub tx_hash: String,
    /// デプロイ時に生成されたコントラクトアドレス
    pub contract_address: Option<Address>,
}
