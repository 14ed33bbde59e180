use eframe::egui;
use std::cell::RefCell;
use std::rc::Rc;

use donty_core::contract::ContractCall;
use donty_core::listing::{ListQueryState, SortOption};
use donty_core::theme::ThemeMode;
use donty_core::types::{Address, TxResult};
use donty_core::CoreHandle;

use crate::create_event::{CreateEventAction, CreateEventDialog};
use crate::event_detail::{DetailAction, DetailSlot, EventDetailView};
use crate::event_list::EventList;
use crate::souvenir::SouvenirView;
use crate::stake::StakeView;
use crate::toasts::Toasts;
use crate::transactions::TransactionsView;

/// 画面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    /// イベント一覧
    Events,
    /// 自分が作成したイベント
    Dashboard,
    Event,
    Stake,
    Souvenir,
    Transactions,
}

type SuccessHandler = Box<dyn FnOnce(&TxResult)>;

fn egui_theme(mode: ThemeMode) -> egui::Theme {
    match mode {
        ThemeMode::Light => egui::Theme::Light,
        ThemeMode::Dark => egui::Theme::Dark,
    }
}

/// 現在時刻（UNIX秒）
fn now_seconds() -> u64 {
    (js_sys::Date::now() / 1000.0) as u64
}

/// 詳細を読み込んでスロットに入れる
fn spawn_detail_load(core: Rc<CoreHandle>, address: Address, slot: DetailSlot) {
    wasm_bindgen_futures::spawn_local(async move {
        let result = core.load_event_detail(&address).await.map_err(|e| e.to_string());
        *slot.borrow_mut() = Some(result);
    });
}

/// メインアプリケーション
pub struct DontyApp {
    page: Page,

    // Core（非同期タスクと共有、内部の借用はawaitをまたがない）
    core: Option<Rc<CoreHandle>>,
    account: Rc<RefCell<Option<Address>>>,

    events: EventList,
    dashboard: EventList,
    detail: Option<EventDetailView>,
    create_dialog: Option<CreateEventDialog>,
    stake: StakeView,
    souvenir: SouvenirView,
    transactions: TransactionsView,
    toasts: Toasts,
    error_message: Option<String>,
}

impl DontyApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let (core, error_message) = match CoreHandle::in_browser() {
            Ok(core) => {
                cc.egui_ctx.set_theme(egui_theme(core.theme_mode()));
                let ctx = cc.egui_ctx.clone();
                core.subscribe_theme(move |mode| ctx.set_theme(egui_theme(mode)));
                (Some(Rc::new(core)), None)
            }
            Err(e) => {
                log::error!("Failed to initialize core: {}", e);
                (None, Some(e.to_string()))
            }
        };

        let page_size = core.as_ref().map(|c| c.config().page_size).unwrap_or(12);

        let app = Self {
            page: Page::Events,
            core,
            account: Rc::new(RefCell::new(None)),
            events: EventList::new(SortOption::Trending, page_size),
            dashboard: EventList::new(SortOption::Newest, page_size),
            detail: None,
            create_dialog: None,
            stake: StakeView::new(),
            souvenir: SouvenirView::new(),
            transactions: TransactionsView::new(),
            toasts: Toasts::new(),
            error_message,
        };
        app.load_initial();
        app
    }

    /// アカウントとイベント一覧を読み込み（非同期）
    fn load_initial(&self) {
        let Some(core) = self.core.clone() else {
            return;
        };
        let account_ref = self.account.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match core.account().await {
                Ok(account) => *account_ref.borrow_mut() = account,
                Err(e) => log::warn!("No wallet account: {}", e),
            }
            if core.refresh_events().await.is_ok() {
                let loaded = core.load_backer_counts().await;
                log::info!("Loaded backers for {} events", loaded);
            }
        });
    }

    fn open_page(&mut self, page: Page) {
        self.page = page;
        match page {
            Page::Dashboard => self.load_dashboard(),
            Page::Stake => self.load_stake_position(),
            Page::Transactions => {
                if self.transactions.needs_load() {
                    self.load_transactions();
                }
            }
            Page::Events | Page::Event | Page::Souvenir => {}
        }
    }

    fn open_event(&mut self, address: Address) {
        let view = EventDetailView::new(address);
        if let Some(core) = self.core.clone() {
            spawn_detail_load(core, view.address().clone(), view.slot());
        }
        self.detail = Some(view);
        self.page = Page::Event;
    }

    fn load_dashboard(&self) {
        let (Some(core), Some(account)) = (self.core.clone(), self.account.borrow().clone()) else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = core.refresh_user_events(&account).await {
                log::error!("Failed to load dashboard: {}", e);
            }
        });
    }

    fn load_stake_position(&self) {
        let (Some(core), Some(account)) = (self.core.clone(), self.account.borrow().clone()) else {
            return;
        };
        let slot = self.stake.position_slot();
        wasm_bindgen_futures::spawn_local(async move {
            match core.load_stake_position(&account).await {
                Ok(position) => *slot.borrow_mut() = Some(position),
                Err(e) => log::error!("Failed to load stake position: {}", e),
            }
        });
    }

    fn load_transactions(&self) {
        let Some(core) = self.core.clone() else {
            return;
        };
        let slot = self.transactions.slot();
        wasm_bindgen_futures::spawn_local(async move {
            let result = core.load_transactions().await.map_err(|e| e.to_string());
            *slot.borrow_mut() = Some(result);
        });
    }

    /// トランザクション送信（結果は通知キュー経由でトースト表示）
    fn submit(&mut self, call: ContractCall, on_success: Option<SuccessHandler>) {
        let Some(core) = self.core.clone() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match core.submit(call, now_seconds()).await {
                Ok(result) => {
                    if let Some(handler) = on_success {
                        handler(&result);
                    }
                }
                Err(e) => log::error!("Transaction failed: {}", e),
            }
        });
    }

    /// 通知をトーストに移す
    fn poll_notifications(&mut self, now: f64) {
        if let Some(core) = &self.core {
            for notification in core.poll_notifications(10) {
                self.toasts.push(notification, now);
            }
        }
    }

    fn toggle_theme(&mut self, now: f64) {
        let Some(core) = &self.core else {
            return;
        };
        // 保存に失敗しても表示は切り替わる
        if let Err(e) = core.toggle_theme() {
            log::error!("Failed to save theme: {}", e);
            self.toasts.error("Theme could not be saved in this browser.", now);
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context, now: f64) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                crate::emoji_label::emoji_heading(ui, "💝 Donty");
                ui.separator();

                let mut page = self.page;
                ui.selectable_value(&mut page, Page::Events, "Events");
                if self.account.borrow().is_some() {
                    ui.selectable_value(&mut page, Page::Dashboard, "Dashboard");
                }
                ui.selectable_value(&mut page, Page::Stake, "Stake");
                ui.selectable_value(&mut page, Page::Souvenir, "Souvenir");
                ui.selectable_value(&mut page, Page::Transactions, "Transactions");
                if page != self.page {
                    self.open_page(page);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let icon = if ui.ctx().theme() == egui::Theme::Dark { "☀" } else { "🌙" };
                    if ui.button(icon).on_hover_text("Toggle theme").clicked() {
                        self.toggle_theme(now);
                    }
                    match self.account.borrow().as_ref() {
                        Some(account) => {
                            ui.monospace(account.short());
                        }
                        None => {
                            ui.weak("Wallet not connected");
                        }
                    }
                });
            });
        });
    }

    fn show_list(&mut self, ui: &mut egui::Ui, dashboard: bool) {
        let core = self.core.clone();
        let compute = |state: &ListQueryState| {
            core.as_ref()
                .map(|c| if dashboard { c.user_view(state) } else { c.view(state) })
        };

        let opened = if dashboard {
            ui.horizontal(|ui| {
                crate::emoji_label::emoji_heading(ui, "📋 Dashboard");
                if ui.button("➕ Create Event").clicked() {
                    self.create_dialog = Some(CreateEventDialog::new());
                }
            });
            self.dashboard.show(ui, &compute)
        } else {
            self.events.show(ui, &compute)
        };

        if let Some(address) = opened {
            self.open_event(address);
        }
    }

    fn show_detail(&mut self, ui: &mut egui::Ui) {
        let account = self.account.borrow().clone();
        let core = self.core.clone();
        let Some(detail) = self.detail.as_mut() else {
            self.page = Page::Events;
            return;
        };

        let address_url = |address: &Address| {
            core.as_ref()
                .map(|c| c.config().address_url(address))
                .unwrap_or_default()
        };
        let action = detail.show(ui, account.as_ref(), &address_url, now_seconds());
        let event = detail.address().clone();
        let slot = detail.slot();

        let call = match action {
            None => return,
            Some(DetailAction::Back) => {
                self.detail = None;
                self.page = Page::Events;
                return;
            }
            Some(DetailAction::Fund { tier_index, value }) => ContractCall::Fund { event, tier_index, value },
            Some(DetailAction::RemoveTier(index)) => ContractCall::RemoveTier { event, index },
            Some(DetailAction::AddTier(draft)) => ContractCall::AddTier {
                event,
                name: draft.name().to_string(),
                amount: draft.amount(),
            },
        };

        // 成功したら詳細を読み直す
        let reload_address = call.event().cloned();
        self.submit(
            call,
            Some(Box::new(move |_| {
                if let (Some(core), Some(address)) = (core, reload_address) {
                    *slot.borrow_mut() = None;
                    spawn_detail_load(core, address, slot);
                }
            })),
        );
    }

    fn show_stake(&mut self, ui: &mut egui::Ui) {
        let account = self.account.borrow().clone();
        let faucet_quantity = self
            .core
            .as_ref()
            .map(|c| c.config().faucet_quantity)
            .unwrap_or(100);

        let Some(call) = self.stake.show(ui, account.as_ref(), faucet_quantity) else {
            return;
        };

        let is_approval = matches!(call, ContractCall::ApproveStake { .. });
        let approved = self.stake.approved_flag();
        let core = self.core.clone();
        let slot = self.stake.position_slot();

        self.submit(
            call,
            Some(Box::new(move |_| {
                if is_approval {
                    approved.set(true);
                }
                // 残高を読み直す
                let (Some(core), Some(account)) = (core, account) else {
                    return;
                };
                wasm_bindgen_futures::spawn_local(async move {
                    if let Ok(position) = core.load_stake_position(&account).await {
                        *slot.borrow_mut() = Some(position);
                    }
                });
            })),
        );
    }

    fn show_souvenir(&mut self, ui: &mut egui::Ui) {
        let account = self.account.borrow().clone();
        let Some(core) = self.core.clone() else {
            return;
        };
        if let Some(call) = self.souvenir.show(ui, &core.config().souvenirs, account.as_ref()) {
            self.submit(call, None);
        }
    }

    fn show_create_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.create_dialog.as_mut() else {
            return;
        };
        match dialog.show(ctx) {
            Some(CreateEventAction::Cancel) => self.create_dialog = None,
            Some(CreateEventAction::Submit(draft)) => {
                self.create_dialog = None;
                let dashboard_reload = self.account.borrow().clone();
                let core = self.core.clone();
                self.submit(
                    ContractCall::DeployEvent(draft),
                    Some(Box::new(move |_| {
                        let (Some(core), Some(account)) = (core, dashboard_reload) else {
                            return;
                        };
                        wasm_bindgen_futures::spawn_local(async move {
                            if let Err(e) = core.refresh_user_events(&account).await {
                                log::warn!("Failed to reload dashboard: {}", e);
                            }
                        });
                    })),
                );
            }
            None => {}
        }
    }
}

impl eframe::App for DontyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        self.poll_notifications(now);

        self.show_top_bar(ctx, now);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.error_message {
                ui.colored_label(egui::Color32::from_rgb(239, 68, 68), error);
                ui.label("Open this page from a wallet-enabled browser to load events.");
                return;
            }

            match self.page {
                Page::Events => self.show_list(ui, false),
                Page::Dashboard => self.show_list(ui, true),
                Page::Event => self.show_detail(ui),
                Page::Stake => self.show_stake(ui),
                Page::Souvenir => self.show_souvenir(ui),
                Page::Transactions => {
                    let core = self.core.clone();
                    let tx_url = |hash: &str| core.as_ref().map(|c| c.config().tx_url(hash)).unwrap_or_default();
                    self.transactions.show(ui, &tx_url);
                }
            }
        });

        self.show_create_dialog(ctx);
        self.toasts.show(ctx);

        // 非同期タスクの結果を反映するため定期的に再描画
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
