use donty_core::listing::{ListQueryState, ListView, SortOption};
use donty_core::types::{Address, Category, EventRecord};

const CARD_WIDTH: f32 = 260.0;
const IMAGE_HEIGHT: f32 = 150.0;

/// イベント一覧（検索・カテゴリー・ソート・ページ送り）
///
/// メイン一覧とダッシュボードで共用する
pub struct EventList {
    state: ListQueryState,
    search_input: String,
    /// Coreがないフレームでは前回の結果を表示
    last_view: Option<ListView>,
}

impl EventList {
    pub fn new(sort_option: SortOption, page_size: usize) -> Self {
        Self {
            state: ListQueryState::new(sort_option).with_page_size(page_size),
            search_input: String::new(),
            last_view: None,
        }
    }

    /// 一覧を表示し、開かれたイベントを返す
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        compute: &dyn Fn(&ListQueryState) -> Option<ListView>,
    ) -> Option<Address> {
        self.show_controls(ui);
        ui.separator();

        if let Some(view) = compute(&self.state) {
            self.last_view = Some(view);
        }
        let Some(view) = self.last_view.clone() else {
            ui.spinner();
            return None;
        };

        let opened = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height(ui.available_height() - 48.0)
            .show(ui, |ui| self.show_cards(ui, &view))
            .inner;

        ui.separator();
        self.show_pagination(ui, &view);
        opened
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search_input)
                    .hint_text("Search events by title or category...")
                    .desired_width(320.0),
            );
            if response.changed() {
                self.state.set_search(self.search_input.clone());
            }

            let mut sort_option = self.state.sort_option();
            egui::ComboBox::from_id_salt("sort_option")
                .selected_text(sort_option.menu_label())
                .show_ui(ui, |ui| {
                    for option in SortOption::MENU {
                        ui.selectable_value(&mut sort_option, option, option.menu_label());
                    }
                });
            if sort_option != self.state.sort_option() {
                self.state.set_sort(sort_option);
            }
        });

        ui.horizontal_wrapped(|ui| {
            if ui.selectable_label(self.state.is_showing_all(), "All").clicked() {
                self.state.show_all();
            }
            for category in Category::ALL {
                let selected = self.state.selected_category() == Some(category);
                if ui.selectable_label(selected, category.name()).clicked() {
                    self.state.select_category(Some(category));
                }
            }
        });
    }

    fn show_cards(&self, ui: &mut egui::Ui, view: &ListView) -> Option<Address> {
        if view.page_items.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No events found.");
            });
            return None;
        }

        let mut opened = None;
        ui.horizontal_wrapped(|ui| {
            for record in &view.page_items {
                if event_card(ui, record) {
                    opened = Some(record.address.clone());
                }
            }
        });
        opened
    }

    fn show_pagination(&mut self, ui: &mut egui::Ui, view: &ListView) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.state.has_previous(view.total_pages), egui::Button::new("Previous"))
                .clicked()
            {
                self.state.previous_page(view.total_pages);
            }
            ui.label(format!("Page {} of {}", view.current_page, view.total_pages));
            if ui
                .add_enabled(self.state.has_next(view.total_pages), egui::Button::new("Next"))
                .clicked()
            {
                self.state.next_page(view.total_pages);
            }
            ui.weak(format!("{} events", view.total_items));
        });
    }
}

/// 1件のカード（クリックでtrue）
fn event_card(ui: &mut egui::Ui, record: &EventRecord) -> bool {
    let mut clicked = false;
    ui.group(|ui| {
        ui.set_width(CARD_WIDTH);
        ui.vertical(|ui| {
            if !record.image_url.is_empty() {
                ui.add(
                    egui::Image::new(record.image_url.as_str())
                        .fit_to_exact_size(egui::vec2(CARD_WIDTH, IMAGE_HEIGHT))
                        .corner_radius(6.0),
                );
            }
            ui.add(egui::Label::new(egui::RichText::new(&record.title).strong()).truncate());
            ui.horizontal(|ui| {
                ui.small(record.category_name());
                ui.small(record.owner.short());
            });
            if ui.button("View Event").clicked() {
                clicked = true;
            }
        });
    });
    clicked
}
