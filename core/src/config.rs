use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::listing::DEFAULT_PAGE_SIZE;
use crate::souvenir::{default_souvenirs, Souvenir};
use crate::theme::PreferenceStore;
use crate::types::Address;

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chain: String,
    pub factory_address: String,
    pub stake_token_address: String,
    pub reward_token_address: String,
    pub staking_address: String,
    /// トランザクション画面で表示するコントラクト
    pub explorer_contract_address: String,
    pub explorer_api: String,
    pub page_size: usize,
    /// テストトークン受け取り量
    pub faucet_quantity: u64,
    /// 記念品NFTのカルーセル
    pub souvenirs: Vec<Souvenir>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain: "base-sepolia".to_string(),
            factory_address: "0x6a0c1933863b7326b831108ae8a346fbca998247".to_string(),
            stake_token_address: "0x1F281d5989c9c843A73E586CC467D49302DEFAC0".to_string(),
            reward_token_address: "0x744Df9F6C8968Adb652FBc2b34ec1C95eBC62eC6".to_string(),
            staking_address: "0xB26FDC09DbD2eBCe7E04b81520cabAB39E0B4c0b".to_string(),
            explorer_contract_address: "0x773e7C88B93955b14AbceB1A05918888C22d555D".to_string(),
            explorer_api: "https://base-sepolia.blockscout.com/api".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            faucet_quantity: 100,
            souvenirs: default_souvenirs(),
        }
    }
}

impl AppConfig {
    const STORAGE_KEY: &'static str = "app_config";

    /// ストアの上書き設定を読み込み（不正ならデフォルト）
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring stored config: {}", e);
                Self::default()
            }
        }
    }

    /// JSONからパースして検証
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, store: &dyn PreferenceStore) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(CoreError::InvalidInput("page_size must be positive".to_string()));
        }
        for address in [
            &self.factory_address,
            &self.stake_token_address,
            &self.reward_token_address,
            &self.staking_address,
            &self.explorer_contract_address,
        ] {
            Address::parse(address)?;
        }
        for souvenir in &self.souvenirs {
            Address::parse(&souvenir.contract)?;
        }
        if self.explorer_api.is_empty() {
            return Err(CoreError::InvalidInput("explorer_api must not be empty".to_string()));
        }
        Ok(())
    }

    fn explorer_base(&self) -> &str {
        let base = self.explorer_api.trim_end_matches('/');
        base.strip_suffix("/api").unwrap_or(base)
    }

    /// エクスプローラーのアドレスページ
    pub fn address_url(&self, address: &Address) -> String {
        format!("{}/address/{}", self.explorer_base(), address)
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_base(), tx_hash)
    }

    /// 取引一覧APIのURL
    pub fn transactions_url(&self) -> String {
        format!(
            "{}?module=account&action=txlist&address={}",
            self.explorer_api, self.explorer_contract_address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::MemoryPreferenceStore;

    #[test]
    fn test_default_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 12);
        assert!(config.transactions_url().ends_with("address=0x773e7C88B93955b14AbceB1A05918888C22d555D"));
        assert_eq!(
            config.address_url(&Address::from_raw("0x01")),
            "https://base-sepolia.blockscout.com/address/0x01"
        );
        assert_eq!(config.tx_url("0xff"), "https://base-sepolia.blockscout.com/tx/0xff");
        assert_eq!(config.souvenirs.len(), 5);
    }

    #[test]
    fn test_souvenirs_can_be_overridden() {
        let config = AppConfig::from_json(
            r#"{"souvenirs": [{"title": "Pin", "imageUrl": "/pin.png", "description": "", "contract": "0x79dc3441FB8d05BeA4Edf372C0BF1c36be4ae8C8"}]}"#,
        )
        .unwrap();
        assert_eq!(config.souvenirs.len(), 1);
        assert_eq!(config.souvenirs[0].title, "Pin");

        let bad = r#"{"souvenirs": [{"title": "Pin", "imageUrl": "", "description": "", "contract": "0x12"}]}"#;
        assert!(AppConfig::from_json(bad).is_err());
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_json(r#"{"page_size": 24, "chain": "base"}"#).unwrap();
        assert_eq!(config.page_size, 24);
        assert_eq!(config.chain, "base");
        assert_eq!(config.factory_address, AppConfig::default().factory_address);
    }

    #[test]
    fn test_invalid_override_falls_back() {
        let store = MemoryPreferenceStore::new();
        store.set("app_config", r#"{"page_size": 0}"#).unwrap();
        assert_eq!(AppConfig::load(&store), AppConfig::default());

        store.set("app_config", "not json").unwrap();
        assert_eq!(AppConfig::load(&store), AppConfig::default());

        store.set("app_config", r#"{"staking_address": "0x12"}"#).unwrap();
        assert_eq!(AppConfig::load(&store), AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryPreferenceStore::new();
        let config = AppConfig { page_size: 6, ..Default::default() };
        config.save(&store).unwrap();
        assert_eq!(AppConfig::load(&store), config);
    }
}
