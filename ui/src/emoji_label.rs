use egui_twemoji::EmojiLabel;

/// カラー絵文字をサポートするラベルを表示
pub fn emoji_label(ui: &mut egui::Ui, text: impl Into<egui::RichText>) {
    EmojiLabel::new(text.into()).show(ui);
}

/// カラー絵文字をサポートするヘッダーを表示
pub fn emoji_heading(ui: &mut egui::Ui, text: impl Into<String>) {
    let rich_text = egui::RichText::new(text.into()).heading();
    EmojiLabel::new(rich_text).show(ui);
}

/// 見出し + 値の情報ボックス（🎯 Target など）
pub fn info_box(ui: &mut egui::Ui, title: &str, value: impl Into<String>) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            emoji_label(ui, egui::RichText::new(title).strong());
            ui.label(value.into());
        });
    });
}
