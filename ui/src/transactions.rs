use std::cell::RefCell;
use std::rc::Rc;

use donty_core::explorer::{ExplorerTx, TxStats};
use donty_core::listing::paginate;
use egui_extras::{Column, TableBuilder};

use crate::emoji_label::info_box;

const ROWS_PER_PAGE: usize = 10;

pub type TransactionsSlot = Rc<RefCell<Option<Result<Vec<ExplorerTx>, String>>>>;

/// 取引一覧画面
pub struct TransactionsView {
    slot: TransactionsSlot,
    page: usize,
}

impl TransactionsView {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
            page: 1,
        }
    }

    pub fn slot(&self) -> TransactionsSlot {
        self.slot.clone()
    }

    /// 未取得なら true
    pub fn needs_load(&self) -> bool {
        self.slot.borrow().is_none()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, tx_url: &dyn Fn(&str) -> String) {
        crate::emoji_label::emoji_heading(ui, "Transactions");

        let slot = self.slot.borrow();
        let transactions = match slot.as_ref() {
            None => {
                ui.spinner();
                return;
            }
            Some(Err(e)) => {
                ui.colored_label(egui::Color32::from_rgb(239, 68, 68), format!("Error fetching data: {}", e));
                return;
            }
            Some(Ok(transactions)) => transactions,
        };

        let stats = TxStats::from_transactions(transactions);
        ui.horizontal_wrapped(|ui| {
            info_box(ui, "Total Transactions", stats.total_transactions.to_string());
            info_box(ui, "Total Gas Used", stats.total_gas_used.to_string());
            info_box(ui, "Failed", stats.failed.to_string());
        });

        let page = paginate(transactions, self.page, ROWS_PER_PAGE);

        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::remainder())
            .column(Column::auto())
            .column(Column::auto())
            .header(24.0, |mut header| {
                for title in ["Txn Hash", "Status", "Block", "From → To", "Value (ETH)", "Timestamp"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for tx in page.items {
                    body.row(22.0, |mut row| {
                        row.col(|ui| {
                            ui.hyperlink_to(short_hash(&tx.hash), tx_url(&tx.hash));
                        });
                        row.col(|ui| {
                            let color = if tx.is_error {
                                egui::Color32::from_rgb(239, 68, 68)
                            } else {
                                egui::Color32::from_rgb(34, 197, 94)
                            };
                            ui.colored_label(color, tx.status_label());
                        });
                        row.col(|ui| {
                            ui.label(tx.block_number.to_string());
                        });
                        row.col(|ui| {
                            ui.label(format!("{} → {}", short_hash(&tx.from), short_hash(&tx.to)));
                        });
                        row.col(|ui| {
                            ui.label(tx.value_eth());
                        });
                        row.col(|ui| {
                            ui.label(format_timestamp(tx.timestamp));
                        });
                    });
                }
            });

        let current = page.current_page;
        let total = page.total_pages;
        drop(slot);

        ui.horizontal(|ui| {
            if ui.add_enabled(current > 1, egui::Button::new("Previous")).clicked() {
                self.page = current - 1;
            }
            ui.label(format!("Page {} of {}", current, total));
            if ui.add_enabled(current < total, egui::Button::new("Next")).clicked() {
                self.page = current + 1;
            }
        });
    }
}

fn short_hash(value: &str) -> String {
    if value.len() <= 12 || !value.is_ascii() {
        return value.to_string();
    }
    format!("{}…{}", &value[..6], &value[value.len() - 4..])
}

fn format_timestamp(seconds: u64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(seconds as f64 * 1000.0));
    String::from(date.to_locale_string("en-US", &wasm_bindgen::JsValue::UNDEFINED))
}
