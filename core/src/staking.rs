//! ステーキング画面の入力と呼び出し組み立て

use crate::contract::ContractCall;
use crate::error::{CoreError, Result};
use crate::types::{Address, StakePosition};
use crate::units::{clamp, parse_units, to_float, TOKEN_DECIMALS};

/// 先頭の数値部分だけ読む（"12abc" → 12、読めなければNone）
fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            c if c.is_ascii_digit() => {}
            _ => break,
        }
        end = i + c.len_utf8();
    }
    text[..end].parse::<f64>().ok()
}

/// approve → stake の二段階
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StakingStep {
    #[default]
    Init,
    Approved,
}

/// ステーキングフォーム
#[derive(Debug, Clone, PartialEq)]
pub struct StakeForm {
    stake_amount: String,
    withdraw_amount: String,
    step: StakingStep,
}

impl Default for StakeForm {
    fn default() -> Self {
        Self {
            stake_amount: "0".to_string(),
            withdraw_amount: "0".to_string(),
            step: StakingStep::Init,
        }
    }
}

impl StakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stake_amount(&self) -> &str {
        &self.stake_amount
    }

    pub fn withdraw_amount(&self) -> &str {
        &self.withdraw_amount
    }

    pub fn step(&self) -> StakingStep {
        self.step
    }

    /// ステーク量の入力（1〜残高にクランプ、数値でなければ1）
    pub fn set_stake_input(&mut self, text: &str, position: &StakePosition) {
        let input = parse_leading_float(text).unwrap_or(1.0);
        let balance = to_float(position.stake_token_balance, TOKEN_DECIMALS);
        self.stake_amount = clamp(input, 1.0, balance).to_string();
    }

    /// 引き出し量の入力（1〜ステーク済み量、未ステークなら"0"固定）
    pub fn set_withdraw_input(&mut self, text: &str, position: &StakePosition) {
        let staked = to_float(position.staked, TOKEN_DECIMALS);
        if staked <= 0.0 {
            self.withdraw_amount = "0".to_string();
            return;
        }
        let input = parse_leading_float(text).unwrap_or(1.0);
        self.withdraw_amount = clamp(input, 1.0, staked).to_string();
    }

    fn stake_wei(&self) -> Result<u128> {
        let parsed = parse_leading_float(&self.stake_amount).unwrap_or(0.0);
        if parsed <= 0.0 {
            return Err(CoreError::InvalidInput("Please enter a valid stake amount.".to_string()));
        }
        parse_units(&self.stake_amount, TOKEN_DECIMALS)
    }

    pub fn approve_tx(&self) -> Result<ContractCall> {
        Ok(ContractCall::ApproveStake { amount: self.stake_wei()? })
    }

    pub fn stake_tx(&self) -> Result<ContractCall> {
        Ok(ContractCall::Stake { amount: self.stake_wei()? })
    }

    pub fn withdraw_tx(&self, position: &StakePosition) -> Result<ContractCall> {
        if position.staked == 0 {
            return Err(CoreError::InvalidInput(
                "You have 0 tokens staked, cannot withdraw.".to_string(),
            ));
        }
        let parsed = parse_leading_float(&self.withdraw_amount).unwrap_or(0.0);
        if parsed <= 0.0 {
            return Err(CoreError::InvalidInput("Please enter a valid withdraw amount.".to_string()));
        }
        Ok(ContractCall::Withdraw {
            amount: parse_units(&self.withdraw_amount, TOKEN_DECIMALS)?,
        })
    }

    pub fn claim_rewards_tx(&self) -> ContractCall {
        ContractCall::ClaimRewards
    }

    /// テストトークンの受け取り
    pub fn claim_tokens_tx(&self, to: &Address, quantity: u64) -> ContractCall {
        ContractCall::ClaimTokens {
            to: to.clone(),
            quantity,
        }
    }

    /// approve承認後
    pub fn mark_approved(&mut self) {
        self.step = StakingStep::Approved;
    }

    /// stake完了後は最初から
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETHER: u128 = 1_000_000_000_000_000_000;

    fn position(balance: u128, staked: u128) -> StakePosition {
        StakePosition {
            staked,
            stake_token_balance: balance,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("12abc"), Some(12.0));
        assert_eq!(parse_leading_float(" 2.5"), Some(2.5));
        assert_eq!(parse_leading_float("1.2.3"), Some(1.2));
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn test_stake_input_is_clamped_to_balance() {
        let mut form = StakeForm::new();
        let pos = position(100 * ETHER, 0);

        form.set_stake_input("250", &pos);
        assert_eq!(form.stake_amount(), "100");
        form.set_stake_input("0.2", &pos);
        assert_eq!(form.stake_amount(), "1");
        form.set_stake_input("", &pos);
        assert_eq!(form.stake_amount(), "1");
        form.set_stake_input("42.5", &pos);
        assert_eq!(form.stake_amount(), "42.5");

        assert_eq!(
            form.stake_tx().unwrap(),
            ContractCall::Stake { amount: 42 * ETHER + ETHER / 2 }
        );
        assert_eq!(
            form.approve_tx().unwrap(),
            ContractCall::ApproveStake { amount: 42 * ETHER + ETHER / 2 }
        );
    }

    #[test]
    fn test_stake_with_empty_balance_is_rejected() {
        let mut form = StakeForm::new();
        assert!(form.stake_tx().is_err());

        form.set_stake_input("5", &position(0, 0));
        assert_eq!(form.stake_amount(), "0");
        let err = form.approve_tx().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Please enter a valid stake amount.");
    }

    #[test]
    fn test_withdraw_input() {
        let mut form = StakeForm::new();

        form.set_withdraw_input("3", &position(0, 0));
        assert_eq!(form.withdraw_amount(), "0");
        let err = form.withdraw_tx(&position(0, 0)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: You have 0 tokens staked, cannot withdraw.");

        let pos = position(0, 5 * ETHER);
        form.set_withdraw_input("9", &pos);
        assert_eq!(form.withdraw_amount(), "5");
        assert_eq!(form.withdraw_tx(&pos).unwrap(), ContractCall::Withdraw { amount: 5 * ETHER });
    }

    #[test]
    fn test_steps_and_simple_calls() {
        let mut form = StakeForm::new();
        assert_eq!(form.step(), StakingStep::Init);
        form.mark_approved();
        assert_eq!(form.step(), StakingStep::Approved);
        form.reset();
        assert_eq!(form, StakeForm::new());

        let to = Address::from_raw("0x01");
        assert_eq!(
            form.claim_tokens_tx(&to, 100),
            ContractCall::ClaimTokens { to, quantity: 100 }
        );
        assert_eq!(form.claim_rewards_tx(), ContractCall::ClaimRewards);
    }
}
