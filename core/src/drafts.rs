//! 作成フォームの入力値（文字数・数値の範囲をクランプする）

use serde::{Serialize, Serializer};

use crate::error::{CoreError, Result};
use crate::types::Category;

pub const MAX_EVENT_TITLE_LENGTH: usize = 60;
pub const MAX_EVENT_NARRATIVES_LENGTH: usize = 1200;
pub const MAX_TARGET: u64 = 100_000_000;
pub const MAX_DURATION_DAYS: u32 = 1000;

pub const MAX_TIER_NAME_LENGTH: usize = 75;
pub const MIN_TIER_AMOUNT: u128 = 1;
pub const MAX_TIER_AMOUNT: u128 = 1_000_000;

/// 文字単位で切り詰め（UTF-8の途中で切らない）
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

fn parse_integer(text: &str) -> Option<i128> {
    text.trim().parse::<i128>().ok()
}

fn category_id<S: Serializer>(category: &Category, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u8(category.id())
}

/// イベント作成フォーム（送信時はファクトリーの引数名で直列化）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    title: String,
    narratives: String,
    image_url: String,
    target: u64,
    #[serde(rename = "durationInDays")]
    duration_days: u32,
    #[serde(serialize_with = "category_id")]
    category: Category,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            narratives: String::new(),
            image_url: String::new(),
            target: 1,
            duration_days: 1,
            category: Category::NonProfit,
        }
    }
}

impl EventDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn narratives(&self) -> &str {
        &self.narratives
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_title(&mut self, value: &str) {
        self.title = truncate_chars(value, MAX_EVENT_TITLE_LENGTH);
    }

    pub fn set_narratives(&mut self, value: &str) {
        self.narratives = truncate_chars(value, MAX_EVENT_NARRATIVES_LENGTH);
    }

    pub fn set_image_url(&mut self, value: &str) {
        self.image_url = value.trim().to_string();
    }

    pub fn set_target(&mut self, value: i128) {
        self.target = value.clamp(1, MAX_TARGET as i128) as u64;
    }

    pub fn set_duration_days(&mut self, value: i128) {
        self.duration_days = value.clamp(1, MAX_DURATION_DAYS as i128) as u32;
    }

    /// テキスト入力から（数値でなければ1）
    pub fn set_target_text(&mut self, text: &str) {
        self.set_target(parse_integer(text).unwrap_or(1));
    }

    pub fn set_duration_text(&mut self, text: &str) {
        self.set_duration_days(parse_integer(text).unwrap_or(1));
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    /// 送信前の検証
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.narratives.trim().is_empty() || self.image_url.is_empty() {
            return Err(CoreError::InvalidInput(
                "Please fill in all the required fields with valid values.".to_string(),
            ));
        }
        Ok(())
    }
}

/// ティア作成フォーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierDraft {
    name: String,
    amount: u128,
}

impl Default for TierDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            amount: MIN_TIER_AMOUNT,
        }
    }
}

impl TierDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> u128 {
        self.amount
    }

    pub fn set_name(&mut self, value: &str) {
        self.name = truncate_chars(value, MAX_TIER_NAME_LENGTH);
    }

    pub fn set_amount(&mut self, value: i128) {
        self.amount = value.clamp(MIN_TIER_AMOUNT as i128, MAX_TIER_AMOUNT as i128) as u128;
    }

    pub fn set_amount_text(&mut self, text: &str) {
        self.set_amount(parse_integer(text).unwrap_or(MIN_TIER_AMOUNT as i128));
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("Tier name must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_truncated_by_chars() {
        let mut draft = EventDraft::new();
        draft.set_title(&"寄".repeat(80));
        assert_eq!(draft.title().chars().count(), MAX_EVENT_TITLE_LENGTH);

        draft.set_narratives(&"a".repeat(1500));
        assert_eq!(draft.narratives().len(), MAX_EVENT_NARRATIVES_LENGTH);
    }

    #[test]
    fn test_numeric_fields_are_clamped() {
        let mut draft = EventDraft::new();
        draft.set_target(0);
        assert_eq!(draft.target(), 1);
        draft.set_target(500_000_000);
        assert_eq!(draft.target(), MAX_TARGET);
        draft.set_target_text("abc");
        assert_eq!(draft.target(), 1);
        draft.set_duration_text("30");
        assert_eq!(draft.duration_days(), 30);
        draft.set_duration_days(-4);
        assert_eq!(draft.duration_days(), 1);
        draft.set_duration_days(5000);
        assert_eq!(draft.duration_days(), MAX_DURATION_DAYS);
    }

    #[test]
    fn test_event_draft_validate() {
        let mut draft = EventDraft::new();
        assert!(draft.validate().is_err());

        draft.set_title("Clean the harbour");
        draft.set_narratives("Volunteers and bags");
        assert!(draft.validate().is_err());

        draft.set_image_url("https://example.com/harbour.png");
        draft.set_category(Category::Eie);
        assert!(draft.validate().is_ok());
        assert_eq!(draft.category(), Category::Eie);
    }

    #[test]
    fn test_tier_draft() {
        let mut tier = TierDraft::new();
        assert!(tier.validate().is_err());
        assert_eq!(tier.amount(), 1);

        tier.set_name(&"x".repeat(100));
        assert_eq!(tier.name().len(), MAX_TIER_NAME_LENGTH);

        tier.set_amount_text("2000000");
        assert_eq!(tier.amount(), MAX_TIER_AMOUNT);
        tier.set_amount_text("");
        assert_eq!(tier.amount(), MIN_TIER_AMOUNT);
        tier.set_amount_text(" 250 ");
        assert_eq!(tier.amount(), 250);
        assert!(tier.validate().is_ok());
    }

    #[test]
    fn test_event_draft_serializes_factory_arguments() {
        let mut draft = EventDraft::new();
        draft.set_title("Robotics club");
        draft.set_category(Category::Comp);
        draft.set_duration_days(14);

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["title"], "Robotics club");
        assert_eq!(json["durationInDays"], 14);
        assert_eq!(json["category"], 5);
        assert_eq!(json["imageUrl"], "");
    }
}
