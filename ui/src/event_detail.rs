use std::cell::RefCell;
use std::rc::Rc;

use donty_core::drafts::{TierDraft, MAX_TIER_AMOUNT, MIN_TIER_AMOUNT};
use donty_core::types::{Address, EventDetail, Tier};

use crate::emoji_label::{emoji_heading, emoji_label, info_box};

/// 読み込み結果（非同期タスクが書き込む）
pub type DetailSlot = Rc<RefCell<Option<Result<EventDetail, String>>>>;

/// 詳細画面からの操作
pub enum DetailAction {
    Back,
    Fund { tier_index: usize, value: u128 },
    RemoveTier(usize),
    AddTier(TierDraft),
}

/// イベント詳細画面
pub struct EventDetailView {
    address: Address,
    slot: DetailSlot,
    is_editing: bool,
    show_add_tier: bool,
    tier_draft: TierDraft,
    tier_name_input: String,
    tier_amount_input: String,
}

impl EventDetailView {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            slot: Rc::new(RefCell::new(None)),
            is_editing: false,
            show_add_tier: false,
            tier_draft: TierDraft::new(),
            tier_name_input: String::new(),
            tier_amount_input: MIN_TIER_AMOUNT.to_string(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn slot(&self) -> DetailSlot {
        self.slot.clone()
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        account: Option<&Address>,
        address_url: &dyn Fn(&Address) -> String,
        now: u64,
    ) -> Option<DetailAction> {
        let mut action = None;

        if ui.button("⬅ Back").clicked() {
            action = Some(DetailAction::Back);
        }

        let loaded = self.slot.borrow().clone();
        let detail = match loaded {
            None => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading event details...");
                });
                return action;
            }
            Some(Err(e)) => {
                ui.colored_label(egui::Color32::from_rgb(239, 68, 68), format!("Failed to load event: {}", e));
                return action;
            }
            Some(Ok(detail)) => detail,
        };

        let is_owner = account.map(|a| detail.is_owner(a)).unwrap_or(false);

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            ui.horizontal(|ui| {
                let title = if detail.title.is_empty() { "No Title" } else { detail.title.as_str() };
                emoji_heading(ui, title);
                if is_owner {
                    if self.is_editing {
                        ui.label(format!("Status: {}", detail.state.label()));
                    }
                    let label = if self.is_editing { "Done" } else { "Edit" };
                    if ui.button(label).clicked() {
                        self.is_editing = !self.is_editing;
                    }
                }
            });

            if !detail.image_url.is_empty() {
                ui.add(
                    egui::Image::new(detail.image_url.as_str())
                        .max_height(360.0)
                        .maintain_aspect_ratio(true),
                );
            }

            ui.horizontal_wrapped(|ui| {
                info_box(ui, "🎯 Target", format!("${}", detail.target));
                info_box(ui, "💰 Balance", format!("${}", detail.balance));
                info_box(ui, "📅 Deadline", format_deadline(detail.deadline));
            });
            ui.horizontal_wrapped(|ui| {
                info_box(ui, "🏷️ Category", detail.category_name());
                info_box(ui, "⚙️ State", detail.state.label());
                ui.group(|ui| {
                    ui.vertical(|ui| {
                        emoji_label(ui, egui::RichText::new("👤 Owner").strong());
                        if detail.owner.is_empty() {
                            ui.label("N/A");
                        } else {
                            ui.hyperlink_to(detail.owner.short(), address_url(&detail.owner));
                        }
                    });
                });
                ui.group(|ui| {
                    ui.vertical(|ui| {
                        emoji_label(ui, egui::RichText::new("🔗 About Contract").strong());
                        ui.hyperlink_to("View on BlockScout", address_url(&self.address));
                    });
                });
            });

            ui.group(|ui| {
                emoji_label(ui, egui::RichText::new("📊 Funding Progress").strong());
                let percent = detail.progress_percent();
                ui.add(egui::ProgressBar::new((percent / 100.0) as f32));
                ui.label(format!("{:.0}% funded", percent));
            });

            ui.group(|ui| {
                emoji_label(ui, egui::RichText::new("📝 Narratives").strong());
                if detail.narratives.is_empty() {
                    ui.label("No details provided");
                } else {
                    ui.label(&detail.narratives);
                }
            });

            ui.add_space(10.0);
            emoji_heading(ui, "🎁 Tiers");
            let can_fund = !detail.deadline_passed(now);
            ui.horizontal_wrapped(|ui| {
                if detail.tiers.is_empty() {
                    ui.label("No tiers available");
                }
                for (index, tier) in detail.tiers.iter().enumerate() {
                    if let Some(a) = tier_card(ui, tier, index, self.is_editing, can_fund) {
                        action = Some(a);
                    }
                }
                if self.is_editing && ui.button("➕ Add Tier").clicked() {
                    self.show_add_tier = true;
                }
            });
        });

        if self.show_add_tier {
            if let Some(draft) = self.show_add_tier_dialog(ui.ctx()) {
                action = Some(DetailAction::AddTier(draft));
            }
        }

        action
    }

    fn show_add_tier_dialog(&mut self, ctx: &egui::Context) -> Option<TierDraft> {
        let mut submitted = None;

        egui::Window::new("Create a Funding Tier")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Tier Name");
                if ui.text_edit_singleline(&mut self.tier_name_input).changed() {
                    self.tier_draft.set_name(&self.tier_name_input);
                    self.tier_name_input = self.tier_draft.name().to_string();
                }

                ui.label(format!("Tier Cost ({} to {})", MIN_TIER_AMOUNT, MAX_TIER_AMOUNT));
                if ui.text_edit_singleline(&mut self.tier_amount_input).lost_focus() {
                    self.tier_draft.set_amount_text(&self.tier_amount_input);
                    self.tier_amount_input = self.tier_draft.amount().to_string();
                }

                ui.horizontal(|ui| {
                    if ui.button("Close").clicked() {
                        self.show_add_tier = false;
                    }
                    if ui.button("Add Tier").clicked() {
                        self.tier_draft.set_amount_text(&self.tier_amount_input);
                        if self.tier_draft.validate().is_ok() {
                            submitted = Some(self.tier_draft.clone());
                            self.show_add_tier = false;
                            self.tier_draft = TierDraft::new();
                            self.tier_name_input.clear();
                            self.tier_amount_input = MIN_TIER_AMOUNT.to_string();
                        }
                    }
                });
            });

        submitted
    }
}

fn tier_card(ui: &mut egui::Ui, tier: &Tier, index: usize, is_editing: bool, can_fund: bool) -> Option<DetailAction> {
    let mut action = None;
    ui.group(|ui| {
        ui.set_width(220.0);
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.strong(&tier.name);
                ui.strong(format!("${}", tier.amount));
            });
            ui.small(format!("Total Backers: {}", tier.backers));
            ui.horizontal(|ui| {
                if ui.add_enabled(can_fund, egui::Button::new("Select")).clicked() {
                    action = Some(DetailAction::Fund {
                        tier_index: index,
                        value: tier.amount,
                    });
                }
                if is_editing && ui.button("Remove").clicked() {
                    action = Some(DetailAction::RemoveTier(index));
                }
            });
        });
    });
    action
}

/// 締切をローカル時刻で表示
fn format_deadline(deadline: u64) -> String {
    if deadline == 0 {
        return "N/A".to_string();
    }
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(deadline as f64 * 1000.0));
    String::from(date.to_locale_string("en-US", &wasm_bindgen::JsValue::UNDEFINED))
}
