use std::cell::{Cell, RefCell};
use std::rc::Rc;

use donty_core::contract::ContractCall;
use donty_core::staking::{StakeForm, StakingStep};
use donty_core::types::{Address, StakePosition};
use donty_core::units::{format_integer, format_two_decimals, TOKEN_DECIMALS};
use donty_core::Result;

use crate::emoji_label::{emoji_heading, emoji_label, info_box};

pub type PositionSlot = Rc<RefCell<Option<StakePosition>>>;

/// ステーキング画面
pub struct StakeView {
    form: StakeForm,
    stake_input: String,
    withdraw_input: String,
    position: PositionSlot,
    /// approveの承認通知（非同期タスクが立てる）
    approved: Rc<Cell<bool>>,
    error: Option<String>,
}

impl StakeView {
    pub fn new() -> Self {
        Self {
            form: StakeForm::new(),
            stake_input: String::new(),
            withdraw_input: String::new(),
            position: Rc::new(RefCell::new(None)),
            approved: Rc::new(Cell::new(false)),
            error: None,
        }
    }

    pub fn position_slot(&self) -> PositionSlot {
        self.position.clone()
    }

    pub fn approved_flag(&self) -> Rc<Cell<bool>> {
        self.approved.clone()
    }

    /// 送信する呼び出しを返す
    pub fn show(&mut self, ui: &mut egui::Ui, account: Option<&Address>, faucet_quantity: u64) -> Option<ContractCall> {
        let Some(account) = account else {
            ui.centered_and_justified(|ui| {
                ui.heading("Please connect your wallet to access staking features.");
            });
            return None;
        };

        if self.approved.replace(false) {
            self.form.mark_approved();
        }

        let position = *self.position.borrow();
        let Some(position) = position else {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading balances...");
            });
            return None;
        };

        let mut call = None;

        emoji_heading(ui, "💰 Balances");
        ui.horizontal_wrapped(|ui| {
            info_box(ui, "Stake Token", format_integer(position.stake_token_balance, TOKEN_DECIMALS));
            info_box(ui, "Reward Token", format_two_decimals(position.reward_token_balance, TOKEN_DECIMALS));
            info_box(ui, "Balance Staked", format_integer(position.staked, TOKEN_DECIMALS));
            info_box(ui, "Reward Balance", format_two_decimals(position.unclaimed_rewards, TOKEN_DECIMALS));
        });

        if ui.button(format!("🚰 Claim {} test tokens", faucet_quantity)).clicked() {
            call = Some(self.form.claim_tokens_tx(account, faucet_quantity));
        }

        ui.separator();
        emoji_heading(ui, "🔒 Stake & Rewards");

        ui.group(|ui| {
            emoji_label(ui, egui::RichText::new("Stake").strong());
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.stake_input)
                        .hint_text(self.form.stake_amount())
                        .desired_width(140.0),
                );
                if response.lost_focus() {
                    self.form.set_stake_input(&self.stake_input, &position);
                    self.stake_input = self.form.stake_amount().to_string();
                }

                match self.form.step() {
                    StakingStep::Init => {
                        if ui.button("Set Approval").clicked() {
                            call = self.take(self.form.approve_tx());
                        }
                    }
                    StakingStep::Approved => {
                        if ui.button("Stake").clicked() {
                            call = self.take(self.form.stake_tx());
                        }
                    }
                }
            });
        });

        ui.group(|ui| {
            emoji_label(ui, egui::RichText::new("Withdraw").strong());
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.withdraw_input)
                        .hint_text(self.form.withdraw_amount())
                        .desired_width(140.0),
                );
                if response.lost_focus() {
                    self.form.set_withdraw_input(&self.withdraw_input, &position);
                    self.withdraw_input = self.form.withdraw_amount().to_string();
                }
                if ui.button("Withdraw").clicked() {
                    call = self.take(self.form.withdraw_tx(&position));
                }
            });
        });

        if ui.button("🎁 Claim Rewards").clicked() {
            call = Some(self.form.claim_rewards_tx());
        }

        if let Some(error) = &self.error {
            ui.colored_label(egui::Color32::from_rgb(239, 68, 68), error);
        }

        if matches!(call, Some(ContractCall::Stake { .. })) {
            self.form.reset();
            self.stake_input.clear();
        }
        call
    }

    fn take(&mut self, result: Result<ContractCall>) -> Option<ContractCall> {
        match result {
            Ok(call) => {
                self.error = None;
                Some(call)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}
