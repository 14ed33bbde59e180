//! テーマ設定（ダーク/ライト）
//!
//! 永続化は `PreferenceStore` の裏に隠す。ブラウザでは localStorage、
//! テストではメモリ上のストアを使う。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// キー・バリュー型の設定ストア
/// WASM環境ではシングルスレッドのため、Send + Sync要件なし
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// localStorage実装
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPreferenceStore;

impl LocalPreferenceStore {
    fn storage() -> Result<web_sys::Storage> {
        let window = web_sys::window().ok_or_else(|| CoreError::Other("No window".to_string()))?;
        window
            .local_storage()?
            .ok_or_else(|| CoreError::StorageError("localStorage is not available".to_string()))
    }
}

impl PreferenceStore for LocalPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::storage()?.set_item(key, value)?;
        Ok(())
    }
}

/// テスト用のメモリ実装
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 表示モード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// "dark" 以外はすべてLight
    pub fn parse(value: &str) -> Self {
        if value == "dark" {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == ThemeMode::Dark
    }
}

/// 購読ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(ThemeMode)>;

/// テーマ設定サービス
pub struct ThemePreference {
    store: Rc<dyn PreferenceStore>,
    mode: ThemeMode,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl ThemePreference {
    pub const STORAGE_KEY: &'static str = "theme";

    /// ストアから読み込み
    pub fn load(store: Rc<dyn PreferenceStore>) -> Self {
        let mode = store
            .get(Self::STORAGE_KEY)
            .map(|v| ThemeMode::parse(&v))
            .unwrap_or_default();

        Self {
            store,
            mode,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> ThemeMode {
        self.mode
    }

    /// モードを設定して購読者に通知してから保存する
    ///
    /// 保存に失敗してもモードは切り替わったまま（エラーだけ返す）。
    pub fn set(&mut self, mode: ThemeMode) -> Result<()> {
        if mode != self.mode {
            self.mode = mode;
            log::info!("Theme changed to {}", mode.as_str());
            for (_, listener) in &self.listeners {
                listener(mode);
            }
        }

        self.store.set(Self::STORAGE_KEY, mode.as_str()).map_err(|e| {
            log::warn!("Failed to persist theme: {}", e);
            e
        })
    }

    pub fn toggle(&mut self) -> Result<ThemeMode> {
        let mode = self.mode.toggled();
        self.set(mode)?;
        Ok(mode)
    }

    pub fn subscribe(&mut self, listener: impl Fn(ThemeMode) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// 購読解除（存在しなければfalse）
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_defaults_to_light() {
        let theme = ThemePreference::load(Rc::new(MemoryPreferenceStore::new()));
        assert_eq!(theme.get(), ThemeMode::Light);
    }

    #[test]
    fn test_loads_stored_mode() {
        let store = MemoryPreferenceStore::new();
        store.set("theme", "dark").unwrap();
        let theme = ThemePreference::load(Rc::new(store.clone()));
        assert!(theme.get().is_dark());

        store.set("theme", "sepia").unwrap();
        let theme = ThemePreference::load(Rc::new(store));
        assert_eq!(theme.get(), ThemeMode::Light);
    }

    #[test]
    fn test_set_persists_and_notifies() {
        let store = MemoryPreferenceStore::new();
        let mut theme = ThemePreference::load(Rc::new(store.clone()));

        let calls = Rc::new(Cell::new(0));
        let last = Rc::new(Cell::new(ThemeMode::Light));
        let id = {
            let calls = calls.clone();
            let last = last.clone();
            theme.subscribe(move |mode| {
                calls.set(calls.get() + 1);
                last.set(mode);
            })
        };

        assert_eq!(theme.toggle().unwrap(), ThemeMode::Dark);
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        assert_eq!(calls.get(), 1);
        assert_eq!(last.get(), ThemeMode::Dark);

        // 同じ値では通知しない
        theme.set(ThemeMode::Dark).unwrap();
        assert_eq!(calls.get(), 1);

        assert!(theme.unsubscribe(id));
        assert!(!theme.unsubscribe(id));
        theme.set(ThemeMode::Light).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(store.get("theme").as_deref(), Some("light"));
    }

    /// 書き込みできないストア（localStorageがブロックされた状態）
    struct BlockedStore;

    impl PreferenceStore for BlockedStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(CoreError::StorageError("localStorage is blocked".to_string()))
        }
    }

    #[test]
    fn test_toggle_still_applies_when_store_fails() {
        let mut theme = ThemePreference::load(Rc::new(BlockedStore));
        let notified = Rc::new(Cell::new(None));
        {
            let notified = notified.clone();
            theme.subscribe(move |mode| notified.set(Some(mode)));
        }

        assert!(theme.toggle().is_err());
        assert_eq!(theme.get(), ThemeMode::Dark);
        assert_eq!(notified.get(), Some(ThemeMode::Dark));

        assert!(theme.toggle().is_err());
        assert_eq!(theme.get(), ThemeMode::Light);
    }
}
