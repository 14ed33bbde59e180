use donty_core::contract::ContractCall;
use donty_core::souvenir::{Carousel, Souvenir};
use donty_core::types::Address;

use crate::emoji_label::emoji_heading;

const CARD_WIDTH: f32 = 380.0;
const IMAGE_SIZE: f32 = 250.0;

/// 記念品NFTのカルーセル
pub struct SouvenirView {
    carousel: Carousel,
    error: Option<String>,
}

impl SouvenirView {
    pub fn new() -> Self {
        Self {
            carousel: Carousel::new(),
            error: None,
        }
    }

    /// 「Claim NFT」で送信する呼び出しを返す
    pub fn show(&mut self, ui: &mut egui::Ui, souvenirs: &[Souvenir], account: Option<&Address>) -> Option<ContractCall> {
        let Some(souvenir) = self.carousel.current(souvenirs) else {
            ui.label("No souvenirs available.");
            return None;
        };

        let mut call = None;
        ui.vertical_centered(|ui| {
            ui.horizontal(|ui| {
                if ui.button("⬅").clicked() {
                    self.carousel.previous(souvenirs.len());
                    self.error = None;
                }

                ui.group(|ui| {
                    ui.set_width(CARD_WIDTH);
                    ui.vertical_centered(|ui| {
                        emoji_heading(ui, souvenir.title.as_str());
                        if !souvenir.image_url.is_empty() {
                            ui.add(
                                egui::Image::new(souvenir.image_url.as_str())
                                    .fit_to_exact_size(egui::vec2(IMAGE_SIZE, IMAGE_SIZE))
                                    .maintain_aspect_ratio(true),
                            );
                        }
                        ui.label(&souvenir.description);
                        ui.add_space(8.0);

                        if ui.button("Claim NFT").clicked() {
                            match souvenir.claim_tx(account) {
                                Ok(c) => {
                                    self.error = None;
                                    call = Some(c);
                                }
                                Err(e) => self.error = Some(e.to_string()),
                            }
                        }
                        if let Some(error) = &self.error {
                            ui.colored_label(egui::Color32::from_rgb(239, 68, 68), error);
                        }
                    });
                });

                if ui.button("➡").clicked() {
                    self.carousel.next(souvenirs.len());
                    self.error = None;
                }
            });

            ui.weak(format!(
                "{} / {}",
                self.carousel.index(souvenirs.len()) + 1,
                souvenirs.len()
            ));
        });
        call
    }
}
