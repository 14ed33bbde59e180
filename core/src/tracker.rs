use std::collections::VecDeque;

use crate::contract::ContractCall;
use crate::types::TxResult;

/// 保持する履歴の上限
const MAX_HISTORY: usize = 50;

/// 送信状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

/// 追跡中のトランザクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedTx {
    pub req_id: String,
    pub method: &'static str,
    pub status: TxStatus,
    pub tx_hash: Option<String>,
    pub error: Option<String>,
    pub submitted_at: u64,
}

/// 通知レベル（トーストの色）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Warning,
    Success,
    Error,
}

/// UIに表示する通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub req_id: String,
    pub level: NotificationLevel,
    pub message: String,
}

/// トランザクション追跡
///
/// 状態遷移のたびに通知をキューに積み、UIがpollで取り出す
#[derive(Debug, Default)]
pub struct TxTracker {
    history: VecDeque<TrackedTx>,
    notifications: VecDeque<Notification>,
    next_id: u64,
}

impl TxTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信開始（Pending）
    pub fn begin(&mut self, call: &ContractCall, now: u64) -> String {
        self.next_id += 1;
        let req_id = format!("req_{}_{}", now, self.next_id);

        self.history.push_back(TrackedTx {
            req_id: req_id.clone(),
            method: call.method(),
            status: TxStatus::Pending,
            tx_hash: None,
            error: None,
            submitted_at: now,
        });
        while self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }

        self.notify(&req_id, NotificationLevel::Warning, call.pending_message().to_string());
        req_id
    }

    /// 承認済み（Confirmed）
    pub fn confirm(&mut self, req_id: &str, call: &ContractCall, result: &TxResult) {
        if !self.transition(req_id, TxStatus::Confirmed) {
            return;
        }
        if let Some(tx) = self.find_mut(req_id) {
            tx.tx_hash = Some(result.tx_hash.clone());
        }
        log::info!("{} confirmed: {}", call.method(), result.tx_hash);
        self.notify(req_id, NotificationLevel::Success, call.success_message(result));
    }

    /// 失敗（Failed）
    pub fn fail(&mut self, req_id: &str, message: &str) {
        if !self.transition(req_id, TxStatus::Failed) {
            return;
        }
        if let Some(tx) = self.find_mut(req_id) {
            tx.error = Some(message.to_string());
        }
        log::warn!("Transaction {} failed: {}", req_id, message);
        self.notify(req_id, NotificationLevel::Error, format!("Error: {}", message));
    }

    /// Pendingからのみ遷移できる
    fn transition(&mut self, req_id: &str, status: TxStatus) -> bool {
        match self.find_mut(req_id) {
            Some(tx) if tx.status == TxStatus::Pending => {
                tx.status = status;
                true
            }
            Some(_) => {
                log::warn!("Transaction {} already settled", req_id);
                false
            }
            None => false,
        }
    }

    fn find_mut(&mut self, req_id: &str) -> Option<&mut TrackedTx> {
        self.history.iter_mut().find(|tx| tx.req_id == req_id)
    }

    fn notify(&mut self, req_id: &str, level: NotificationLevel, message: String) {
        self.notifications.push_back(Notification {
            req_id: req_id.to_string(),
            level,
            message,
        });
    }

    pub fn get(&self, req_id: &str) -> Option<&TrackedTx> {
        self.history.iter().find(|tx| tx.req_id == req_id)
    }

    pub fn pending_count(&self) -> usize {
        self.history.iter().filter(|tx| tx.status == TxStatus::Pending).count()
    }

    /// 新しい順の履歴
    pub fn history(&self) -> impl Iterator<Item = &TrackedTx> {
        self.history.iter().rev()
    }

    /// 通知を最大max件取り出す
    pub fn poll(&mut self, max: usize) -> Vec<Notification> {
        let n = max.min(self.notifications.len());
        self.notifications.drain(..n).collect()
    }

    /// 通知をすべて取り出す
    pub fn drain(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;

    fn fund() -> ContractCall {
        ContractCall::Fund {
            event: Address::from_raw("0x01"),
            tier_index: 0,
            value: 1,
        }
    }

    #[test]
    fn test_pending_then_confirmed() {
        let mut tracker = TxTracker::new();
        let call = fund();
        let req_id = tracker.begin(&call, 1_700_000_000);
        assert_eq!(tracker.pending_count(), 1);

        tracker.confirm(
            &req_id,
            &call,
            &TxResult { tx_hash: "0xabc".to_string(), contract_address: None },
        );
        let tx = tracker.get(&req_id).unwrap();
        assert_eq!(tx.status, TxStatus::Confirmed);
        assert_eq!(tx.tx_hash.as_deref(), Some("0xabc"));
        assert_eq!(tracker.pending_count(), 0);

        let notes = tracker.drain();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].level, NotificationLevel::Warning);
        assert_eq!(notes[0].message, "Transaction processing...");
        assert_eq!(notes[1].level, NotificationLevel::Success);
        assert_eq!(notes[1].message, "Funded successfully!");
    }

    #[test]
    fn test_failed_is_final() {
        let mut tracker = TxTracker::new();
        let call = fund();
        let req_id = tracker.begin(&call, 0);

        tracker.fail(&req_id, "insufficient funds");
        tracker.confirm(
            &req_id,
            &call,
            &TxResult { tx_hash: "0x1".to_string(), contract_address: None },
        );

        let tx = tracker.get(&req_id).unwrap();
        assert_eq!(tx.status, TxStatus::Failed);
        assert_eq!(tx.error.as_deref(), Some("insufficient funds"));

        let notes = tracker.drain();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1].level, NotificationLevel::Error);
        assert_eq!(notes[1].message, "Error: insufficient funds");
    }

    #[test]
    fn test_poll_limits_and_history_order() {
        let mut tracker = TxTracker::new();
        let first = tracker.begin(&ContractCall::ClaimRewards, 1);
        let second = tracker.begin(&ContractCall::ClaimRewards, 2);
        assert_ne!(first, second);

        assert_eq!(tracker.poll(1).len(), 1);
        assert_eq!(tracker.poll(10).len(), 1);
        assert!(tracker.poll(10).is_empty());

        let ids: Vec<_> = tracker.history().map(|tx| tx.req_id.clone()).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut tracker = TxTracker::new();
        for i in 0..(MAX_HISTORY as u64 + 5) {
            tracker.begin(&ContractCall::ClaimRewards, i);
        }
        assert_eq!(tracker.history().count(), MAX_HISTORY);
    }
}
