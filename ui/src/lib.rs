mod app;
mod create_event;
mod emoji_label;
mod event_detail;
mod event_list;
mod souvenir;
mod stake;
mod toasts;
mod transactions;

pub use app::DontyApp;

use wasm_bindgen::prelude::*;

/// WASM初期化とパニックフック設定
#[wasm_bindgen(start)]
pub fn start() {
    // パニック時にコンソールにスタックトレースを表示
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
    }

    log::info!("Donty WASM initialized");
}

/// Webアプリケーションのエントリーポイント
#[wasm_bindgen]
pub async fn start_app(canvas_id: String) -> Result<(), JsValue> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;

    let canvas = document
        .get_element_by_id(&canvas_id)
        .ok_or("Canvas not found")?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;

    let web_options = eframe::WebOptions::default();

    eframe::WebRunner::new()
        .start(
            canvas,
            web_options,
            Box::new(|cc| {
                // イベント画像をURLから読み込む
                egui_extras::install_image_loaders(&cc.egui_ctx);

                // ダーク/ライト両方のスタイルに適用
                cc.egui_ctx.all_styles_mut(|style| {
                    style.text_styles = [
                        (egui::TextStyle::Heading, egui::FontId::new(28.0, egui::FontFamily::Proportional)),
                        (egui::TextStyle::Body, egui::FontId::new(18.0, egui::FontFamily::Proportional)),
                        (egui::TextStyle::Button, egui::FontId::new(18.0, egui::FontFamily::Proportional)),
                        (egui::TextStyle::Small, egui::FontId::new(14.0, egui::FontFamily::Proportional)),
                        (egui::TextStyle::Monospace, egui::FontId::new(16.0, egui::FontFamily::Monospace)),
                    ].into();
                    style.spacing.item_spacing = egui::vec2(10.0, 10.0);
                    style.spacing.button_padding = egui::vec2(14.0, 6.0);
                });

                Ok(Box::new(DontyApp::new(cc)))
            }),
        )
        .await?;

    Ok(())
}
