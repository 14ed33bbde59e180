pub mod types;
pub mod listing;
pub mod ingest;
pub mod theme;
pub mod config;
pub mod units;
pub mod drafts;
pub mod staking;
pub mod souvenir;
pub mod contract;
pub mod tracker;
pub mod explorer;
pub mod error;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

pub use error::{CoreError, Result};

use crate::config::AppConfig;
use crate::contract::bridge::JsContractBridge;
use crate::contract::{ContractCall, ContractReader, ContractWriter};
use crate::explorer::ExplorerTx;
use crate::listing::{compute_view_ranked, BackerCounts, ListQueryState, ListView};
use crate::theme::{LocalPreferenceStore, PreferenceStore, SubscriptionId, ThemeMode, ThemePreference};
use crate::tracker::{Notification, TxTracker};
use crate::types::{Address, EventDetail, EventRecord, StakePosition, TxResult};

/// CoreHandle: UIから使用されるメインAPI
///
/// 全メソッドが `&self` を取るので `Rc<CoreHandle>` を複数の非同期タスクで共有できる。
/// 内部状態の借用は各文の中だけで、awaitをまたいで保持しない。
pub struct CoreHandle {
    reader: Rc<dyn ContractReader>,
    writer: Rc<dyn ContractWriter>,
    tracker: RefCell<TxTracker>,
    theme: RefCell<ThemePreference>,
    config: AppConfig,
    events: RefCell<Vec<EventRecord>>,
    user_events: RefCell<Vec<EventRecord>>,
    backers: RefCell<BackerCounts>,
}

impl CoreHandle {
    /// 初期化
    pub fn new(
        reader: Rc<dyn ContractReader>,
        writer: Rc<dyn ContractWriter>,
        store: Rc<dyn PreferenceStore>,
    ) -> Self {
        let config = AppConfig::load(store.as_ref());
        let theme = ThemePreference::load(store);

        Self {
            reader,
            writer,
            tracker: RefCell::new(TxTracker::new()),
            theme: RefCell::new(theme),
            config,
            events: RefCell::new(Vec::new()),
            user_events: RefCell::new(Vec::new()),
            backers: RefCell::new(BackerCounts::new()),
        }
    }

    /// ブラウザ環境（window.donty + localStorage）で初期化
    pub fn in_browser() -> Result<Self> {
        if !JsContractBridge::is_available() {
            return Err(CoreError::ContractError("window.donty is not injected".to_string()));
        }
        let bridge = Rc::new(JsContractBridge);
        Ok(Self::new(bridge.clone(), bridge, Rc::new(LocalPreferenceStore)))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme.borrow().get()
    }

    pub fn set_theme(&self, mode: ThemeMode) -> Result<()> {
        self.theme.borrow_mut().set(mode)
    }

    pub fn toggle_theme(&self) -> Result<ThemeMode> {
        self.theme.borrow_mut().toggle()
    }

    /// テーマ変更の購読（リスナーからCoreHandleのテーマを再度操作しないこと）
    pub fn subscribe_theme(&self, listener: impl Fn(ThemeMode) + 'static) -> SubscriptionId {
        self.theme.borrow_mut().subscribe(listener)
    }

    pub fn unsubscribe_theme(&self, id: SubscriptionId) -> bool {
        self.theme.borrow_mut().unsubscribe(id)
    }

    pub fn tracker(&self) -> Ref<'_, TxTracker> {
        self.tracker.borrow()
    }

    /// 接続中のアカウント
    pub async fn account(&self) -> Result<Option<Address>> {
        self.writer.account().await
    }

    /// 全イベントを再取得（失敗時は前回の一覧を残す）
    pub async fn refresh_events(&self) -> Result<usize> {
        let events = self.reader.read_events().await.map_err(|e| {
            log::error!("Failed to read events: {}", e);
            e
        })?;
        let count = events.len();
        *self.events.borrow_mut() = events;
        log::info!("Loaded {} events", count);
        Ok(count)
    }

    /// 指定アカウントのイベントを再取得
    pub async fn refresh_user_events(&self, owner: &Address) -> Result<usize> {
        let events = self.reader.read_user_events(owner).await.map_err(|e| {
            log::error!("Failed to read events of {}: {}", owner, e);
            e
        })?;
        let count = events.len();
        *self.user_events.borrow_mut() = events;
        Ok(count)
    }

    pub fn events(&self) -> Ref<'_, Vec<EventRecord>> {
        self.events.borrow()
    }

    pub fn user_events(&self) -> Ref<'_, Vec<EventRecord>> {
        self.user_events.borrow()
    }

    pub fn backers(&self) -> Ref<'_, BackerCounts> {
        self.backers.borrow()
    }

    /// 一覧ページを計算（Topは支援者数順）
    pub fn view(&self, state: &ListQueryState) -> ListView {
        compute_view_ranked(&self.events.borrow(), state, &*self.backers.borrow())
    }

    /// ダッシュボード用
    pub fn user_view(&self, state: &ListQueryState) -> ListView {
        compute_view_ranked(&self.user_events.borrow(), state, &*self.backers.borrow())
    }

    /// イベント詳細を取得（支援者数も更新）
    pub async fn load_event_detail(&self, event: &Address) -> Result<EventDetail> {
        let detail = self.reader.read_event_detail(event).await?;
        self.backers.borrow_mut().set(event, detail.total_backers());
        Ok(detail)
    }

    /// 一覧に表示中のイベントの支援者数をまとめて取得（失敗したものはスキップ）
    pub async fn load_backer_counts(&self) -> usize {
        let addresses: Vec<Address> = self.events.borrow().iter().map(|e| e.address.clone()).collect();
        let mut loaded = 0;
        for address in addresses {
            match self.load_event_detail(&address).await {
                Ok(_) => loaded += 1,
                Err(e) => log::warn!("Skipping backers of {}: {}", address, e),
            }
        }
        loaded
    }

    pub async fn load_stake_position(&self, account: &Address) -> Result<StakePosition> {
        self.reader.read_stake_position(account).await
    }

    /// 設定のコントラクトの取引一覧
    pub async fn load_transactions(&self) -> Result<Vec<ExplorerTx>> {
        self.reader.read_transactions(&self.config.transactions_url()).await
    }

    /// 検証して送信、結果を通知キューに積む
    pub async fn submit(&self, call: ContractCall, now: u64) -> Result<TxResult> {
        call.validate()?;

        let req_id = self.tracker.borrow_mut().begin(&call, now);
        let result = match self.writer.submit(&call).await {
            Ok(result) => result,
            Err(e) => {
                let message = match &e {
                    CoreError::Rejected(reason) | CoreError::ContractError(reason) => reason.clone(),
                    other => other.to_string(),
                };
                self.tracker.borrow_mut().fail(&req_id, &message);
                return Err(e);
            }
        };
        self.tracker.borrow_mut().confirm(&req_id, &call, &result);

        if call.changes_events() {
            if let Some(event) = call.event() {
                if let Err(e) = self.load_event_detail(event).await {
                    log::warn!("Failed to reload {}: {}", event, e);
                }
            } else if let Err(e) = self.refresh_events().await {
                log::warn!("Failed to reload events: {}", e);
            }
        }

        Ok(result)
    }

    /// 通知をポーリング
    pub fn poll_notifications(&self, max: usize) -> Vec<Notification> {
        self.tracker.borrow_mut().poll(max)
    }
}
