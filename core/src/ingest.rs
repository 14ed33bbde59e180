//! 取り込み境界: 型の緩いJSONを検証済みの型に変換する
//!
//! 欠損・不正な値はエラーにせずデフォルト（空文字・0）に寄せる。

use serde_json::Value;

use crate::types::{Address, EventDetail, EventRecord, EventState, StakePosition, Tier};

/// 数値として読む（JSON数値・10進文字列どちらも可、不正値は0）
pub fn value_to_u128(value: &Value) -> u128 {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                v as u128
            } else {
                n.as_f64().map(float_to_u128).unwrap_or(0)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<u128>() {
                v
            } else if let Some(hex_digits) = s.strip_prefix("0x") {
                u128::from_str_radix(hex_digits, 16).unwrap_or(0)
            } else {
                s.parse::<f64>().map(float_to_u128).unwrap_or(0)
            }
        }
        Value::Bool(b) => *b as u128,
        _ => 0,
    }
}

pub fn value_to_u64(value: &Value) -> u64 {
    u64::try_from(value_to_u128(value)).unwrap_or(u64::MAX)
}

fn float_to_u128(f: f64) -> u128 {
    if f.is_finite() && f > 0.0 {
        f.trunc() as u128
    } else {
        0
    }
}

/// 文字列として読む（null・欠損は空文字）
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

static NULL: Value = Value::Null;

/// 候補キーのうち最初に存在するもの
fn field<'a>(object: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter()
        .find_map(|k| object.get(*k).filter(|v| !v.is_null()))
        .unwrap_or(&NULL)
}

/// カテゴリーID（非負整数以外・範囲外は未知カテゴリー `u8::MAX`）
fn category_id(value: &Value) -> u8 {
    let id = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral_f64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| s.parse::<f64>().ok().and_then(integral_f64))
        }
        _ => None,
    };
    id.and_then(|id| u8::try_from(id).ok()).unwrap_or(u8::MAX)
}

fn integral_f64(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then(|| f as u64)
}

/// 1件のイベントレコード
pub fn event_record(value: &Value) -> EventRecord {
    EventRecord {
        address: Address::from_raw(value_to_string(field(value, &["eventAddress", "address"]))),
        owner: Address::from_raw(value_to_string(field(value, &["owner"]))),
        title: value_to_string(field(value, &["title"])),
        creation_timestamp: value_to_u64(field(value, &["creationTime", "creationTimestamp"])),
        image_url: value_to_string(field(value, &["imageUrl", "image_url"])),
        category: category_id(field(value, &["category"])),
    }
}

/// イベント一覧（配列以外は空、オブジェクト以外の要素はスキップ）
pub fn event_records(value: &Value) -> Vec<EventRecord> {
    let Some(items) = value.as_array() else {
        log::warn!("Event list is not an array, ignoring");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            if item.is_object() {
                Some(event_record(item))
            } else {
                log::warn!("Skipping malformed event entry: {}", item);
                None
            }
        })
        .collect()
}

fn tier(value: &Value) -> Tier {
    Tier {
        name: value_to_string(field(value, &["name", "title"])),
        amount: value_to_u128(field(value, &["amount"])),
        backers: value_to_u64(field(value, &["backers", "donors"])),
    }
}

/// イベント詳細
pub fn event_detail(address: &Address, value: &Value) -> EventDetail {
    let tiers = field(value, &["tiers"])
        .as_array()
        .map(|items| items.iter().filter(|t| t.is_object()).map(tier).collect())
        .unwrap_or_default();

    EventDetail {
        address: address.clone(),
        title: value_to_string(field(value, &["title"])),
        narratives: value_to_string(field(value, &["narratives"])),
        category: category_id(field(value, &["category"])),
        image_url: value_to_string(field(value, &["imageUrl", "image_url"])),
        balance: value_to_u128(field(value, &["balance"])),
        target: value_to_u128(field(value, &["target"])),
        deadline: value_to_u64(field(value, &["deadline"])),
        owner: Address::from_raw(value_to_string(field(value, &["owner"]))),
        state: match field(value, &["state"]) {
            Value::Null => EventState::Unknown,
            v => EventState::from_id(value_to_u64(v)),
        },
        tiers,
    }
}

/// ステーキング状況（stakeInfoは [staked, rewards] の配列）
pub fn stake_position(value: &Value) -> StakePosition {
    let stake_info = field(value, &["stakeInfo"]);
    let (staked, unclaimed_rewards) = match stake_info.as_array() {
        Some(pair) => (
            pair.first().map(value_to_u128).unwrap_or(0),
            pair.get(1).map(value_to_u128).unwrap_or(0),
        ),
        None => (
            value_to_u128(field(value, &["staked"])),
            value_to_u128(field(value, &["unclaimedRewards"])),
        ),
    };

    StakePosition {
        staked,
        unclaimed_rewards,
        stake_token_balance: value_to_u128(field(value, &["stakeTokenBalance"])),
        reward_token_balance: value_to_u128(field(value, &["rewardTokenBalance"])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::matches_category;
    use crate::types::Category;
    use serde_json::json;

    #[test]
    fn test_numbers_from_strings_and_floats() {
        assert_eq!(value_to_u128(&json!("1700000000")), 1_700_000_000);
        assert_eq!(value_to_u128(&json!(42)), 42);
        assert_eq!(value_to_u128(&json!(12.9)), 12);
        assert_eq!(value_to_u128(&json!(-5)), 0);
        assert_eq!(value_to_u128(&json!("0x10")), 16);
        assert_eq!(value_to_u128(&json!("NaN")), 0);
        assert_eq!(value_to_u128(&json!("inf")), 0);
        assert_eq!(value_to_u128(&json!("abc")), 0);
        assert_eq!(value_to_u128(&Value::Null), 0);
        assert_eq!(value_to_u128(&json!("1000000000000000000000")), 1_000_000_000_000_000_000_000);
    }

    #[test]
    fn test_event_record_from_contract_tuple() {
        let record = event_record(&json!({
            "eventAddress": "0x00000000000000000000000000000000000000aa",
            "owner": "0x00000000000000000000000000000000000000bb",
            "title": "Feed the strays",
            "creationTime": "1700000123",
            "imageUrl": "https://example.com/cat.png",
            "category": 1
        }));
        assert_eq!(record.address.as_str(), "0x00000000000000000000000000000000000000aa");
        assert_eq!(record.title, "Feed the strays");
        assert_eq!(record.creation_timestamp, 1_700_000_123);
        assert_eq!(record.category_name(), "AnimalCharities");
    }

    #[test]
    fn test_event_record_defaults_missing_fields() {
        let record = event_record(&json!({ "title": null, "category": 300 }));
        assert_eq!(record, EventRecord { category: u8::MAX, ..Default::default() });
        assert_eq!(record.category_name(), "Unknown");
    }

    #[test]
    fn test_invalid_category_ids_are_unknown() {
        for category in [json!(-1), json!("abc"), json!(2.5), json!("-3"), json!(true), Value::Null] {
            let record = event_record(&json!({ "category": category.clone() }));
            assert_eq!(record.category, u8::MAX, "category {}", category);
            assert_eq!(record.category_name(), "Unknown");
            assert!(!matches_category(&record, Some(Category::NonProfit)));
        }

        assert_eq!(event_record(&json!({ "category": "4" })).category, 4);
        assert_eq!(event_record(&json!({ "category": 2.0 })).category, 2);
        assert_eq!(event_record(&json!({})).category, u8::MAX);
    }

    #[test]
    fn test_event_records_skips_non_objects() {
        let records = event_records(&json!([{ "title": "a" }, 5, null, { "title": "b" }]));
        assert_eq!(records.len(), 2);
        assert!(event_records(&json!({ "title": "a" })).is_empty());
    }

    #[test]
    fn test_event_detail() {
        let address = Address::from_raw("0x01");
        let detail = event_detail(
            &address,
            &json!({
                "title": "Library",
                "balance": "250",
                "target": "1000",
                "deadline": 1800000000u64,
                "state": 1,
                "tiers": [
                    { "title": "Bronze", "amount": "10", "donors": "4" },
                    { "name": "Gold", "amount": 100, "backers": 1 },
                    "junk"
                ]
            }),
        );
        assert_eq!(detail.address, address);
        assert_eq!(detail.state, EventState::Successful);
        assert_eq!(detail.tiers.len(), 2);
        assert_eq!(detail.tiers[0].backers, 4);
        assert_eq!(detail.tiers[1].name, "Gold");
        assert_eq!(detail.progress_percent(), 25.0);

        let empty = event_detail(&address, &json!({}));
        assert_eq!(empty.state, EventState::Unknown);
        assert!(empty.tiers.is_empty());
    }

    #[test]
    fn test_stake_position() {
        let position = stake_position(&json!({
            "stakeInfo": ["5000000000000000000", "250000000000000000"],
            "stakeTokenBalance": "100000000000000000000"
        }));
        assert_eq!(position.staked, 5_000_000_000_000_000_000);
        assert_eq!(position.unclaimed_rewards, 250_000_000_000_000_000);
        assert_eq!(position.stake_token_balance, 100_000_000_000_000_000_000);
        assert_eq!(position.reward_token_balance, 0);
    }
}
