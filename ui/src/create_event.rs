use donty_core::drafts::{EventDraft, MAX_EVENT_NARRATIVES_LENGTH, MAX_EVENT_TITLE_LENGTH};
use donty_core::types::Category;

/// ダイアログの結果
pub enum CreateEventAction {
    Submit(EventDraft),
    Cancel,
}

/// イベント作成ダイアログ
pub struct CreateEventDialog {
    draft: EventDraft,
    title_input: String,
    narratives_input: String,
    image_url_input: String,
    target_input: String,
    duration_input: String,
    error: Option<String>,
}

impl CreateEventDialog {
    pub fn new() -> Self {
        let draft = EventDraft::new();
        Self {
            target_input: draft.target().to_string(),
            duration_input: draft.duration_days().to_string(),
            draft,
            title_input: String::new(),
            narratives_input: String::new(),
            image_url_input: String::new(),
            error: None,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<CreateEventAction> {
        let mut action = None;

        egui::Window::new("Create an Event")
            .collapsible(false)
            .resizable(false)
            .default_width(480.0)
            .show(ctx, |ui| {
                ui.label(format!("Title ({}/{})", self.title_input.chars().count(), MAX_EVENT_TITLE_LENGTH));
                if ui.text_edit_singleline(&mut self.title_input).changed() {
                    self.draft.set_title(&self.title_input);
                    self.title_input = self.draft.title().to_string();
                }

                ui.label(format!(
                    "Narratives ({}/{})",
                    self.narratives_input.chars().count(),
                    MAX_EVENT_NARRATIVES_LENGTH
                ));
                if ui.text_edit_multiline(&mut self.narratives_input).changed() {
                    self.draft.set_narratives(&self.narratives_input);
                    self.narratives_input = self.draft.narratives().to_string();
                }

                ui.label("Image URL");
                if ui.text_edit_singleline(&mut self.image_url_input).changed() {
                    self.draft.set_image_url(&self.image_url_input);
                }

                ui.horizontal(|ui| {
                    ui.label("Target");
                    let response = ui.add(egui::TextEdit::singleline(&mut self.target_input).desired_width(120.0));
                    if response.lost_focus() {
                        self.draft.set_target_text(&self.target_input);
                        self.target_input = self.draft.target().to_string();
                    }

                    ui.label("Duration (days)");
                    let response = ui.add(egui::TextEdit::singleline(&mut self.duration_input).desired_width(80.0));
                    if response.lost_focus() {
                        self.draft.set_duration_text(&self.duration_input);
                        self.duration_input = self.draft.duration_days().to_string();
                    }
                });

                let mut category = self.draft.category();
                egui::ComboBox::from_label("Category")
                    .selected_text(category.name())
                    .show_ui(ui, |ui| {
                        for option in Category::ALL {
                            ui.selectable_value(&mut category, option, option.name());
                        }
                    });
                self.draft.set_category(category);

                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::from_rgb(239, 68, 68), error);
                }

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        action = Some(CreateEventAction::Cancel);
                    }
                    if ui.button("Create Event").clicked() {
                        // フォーカス中の数値入力も反映
                        self.draft.set_target_text(&self.target_input);
                        self.draft.set_duration_text(&self.duration_input);
                        match self.draft.validate() {
                            Ok(()) => action = Some(CreateEventAction::Submit(self.draft.clone())),
                            Err(e) => self.error = Some(e.to_string()),
                        }
                    }
                });
            });

        action
    }
}
