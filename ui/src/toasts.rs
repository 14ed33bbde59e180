use donty_core::tracker::{Notification, NotificationLevel};

/// 表示時間（秒）
const TOAST_SECONDS: f64 = 4.0;
const MAX_VISIBLE: usize = 5;

struct Toast {
    level: NotificationLevel,
    message: String,
    expires_at: f64,
}

/// 右下に積むトースト通知
#[derive(Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification, now: f64) {
        self.add(notification.level, notification.message, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: f64) {
        self.add(NotificationLevel::Error, message.into(), now);
    }

    fn add(&mut self, level: NotificationLevel, message: String, now: f64) {
        self.items.push(Toast {
            level,
            message,
            expires_at: now + TOAST_SECONDS,
        });
        if self.items.len() > MAX_VISIBLE {
            self.items.remove(0);
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        self.items.retain(|t| t.expires_at > now);
        if self.items.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &self.items {
                    let (color, icon) = match toast.level {
                        NotificationLevel::Warning => (egui::Color32::from_rgb(234, 179, 8), "⏳"),
                        NotificationLevel::Success => (egui::Color32::from_rgb(34, 197, 94), "✅"),
                        NotificationLevel::Error => (egui::Color32::from_rgb(239, 68, 68), "❌"),
                    };
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(2.0, color))
                        .show(ui, |ui| {
                            ui.set_max_width(360.0);
                            crate::emoji_label::emoji_label(ui, format!("{} {}", icon, toast.message));
                        });
                }
            });

        // 期限切れで消すために再描画
        ctx.request_repaint_after(std::time::Duration::from_millis(500));
    }
}
