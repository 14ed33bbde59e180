use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ContractCall, ContractReader, ContractWriter};
use crate::error::{CoreError, Result};
use crate::explorer::ExplorerTx;
use crate::types::{Address, EventDetail, EventRecord, StakePosition, Tier, TxResult};

#[derive(Default)]
struct MockState {
    events: Vec<EventRecord>,
    details: HashMap<String, EventDetail>,
    positions: HashMap<String, StakePosition>,
    transactions: Vec<ExplorerTx>,
    account: Option<Address>,
    submitted: Vec<ContractCall>,
    reject_reason: Option<String>,
    read_failure: Option<String>,
}

/// テスト用のモックコントラクト（読み書き両方）
#[derive(Clone, Default)]
pub struct MockContract {
    state: Arc<Mutex<MockState>>,
}

fn key(address: &Address) -> String {
    address.as_str().to_ascii_lowercase()
}

impl MockContract {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_events(self, events: Vec<EventRecord>) -> Self {
        self.state().events = events;
        self
    }

    pub fn with_account(self, account: Address) -> Self {
        self.state().account = Some(account);
        self
    }

    pub fn set_events(&self, events: Vec<EventRecord>) {
        self.state().events = events;
    }

    pub fn insert_detail(&self, detail: EventDetail) {
        self.state().details.insert(key(&detail.address), detail);
    }

    pub fn set_stake_position(&self, account: &Address, position: StakePosition) {
        self.state().positions.insert(key(account), position);
    }

    pub fn set_transactions(&self, transactions: Vec<ExplorerTx>) {
        self.state().transactions = transactions;
    }

    /// 以降の送信をウォレットが拒否したことにする（Noneで解除）
    pub fn reject_with(&self, reason: Option<&str>) {
        self.state().reject_reason = reason.map(str::to_string);
    }

    /// 以降の読み取りを失敗させる（Noneで解除）
    pub fn fail_reads_with(&self, reason: Option<&str>) {
        self.state().read_failure = reason.map(str::to_string);
    }

    /// 受理された呼び出し
    pub fn submitted(&self) -> Vec<ContractCall> {
        self.state().submitted.clone()
    }

    fn check_reads(&self) -> Result<()> {
        match &self.state().read_failure {
            Some(reason) => Err(CoreError::ContractError(reason.clone())),
            None => Ok(()),
        }
    }

    /// 受理した呼び出しを状態に反映
    fn apply(state: &mut MockState, call: &ContractCall) -> Option<Address> {
        match call {
            ContractCall::DeployEvent(draft) => {
                let address = Address::from_raw(format!("0x{:040x}", state.events.len() + 1));
                let creation_timestamp = state
                    .events
                    .iter()
                    .map(|e| e.creation_timestamp)
                    .max()
                    .unwrap_or(0)
                    + 1;
                let owner = state.account.clone().unwrap_or_default();

                state.events.push(EventRecord {
                    address: address.clone(),
                    owner: owner.clone(),
                    title: draft.title().to_string(),
                    creation_timestamp,
                    image_url: draft.image_url().to_string(),
                    category: draft.category().id(),
                });
                state.details.insert(
                    key(&address),
                    EventDetail {
                        address: address.clone(),
                        title: draft.title().to_string(),
                        narratives: draft.narratives().to_string(),
                        category: draft.category().id(),
                        image_url: draft.image_url().to_string(),
                        target: draft.target() as u128,
                        owner,
                        ..Default::default()
                    },
                );
                Some(address)
            }
            ContractCall::AddTier { event, name, amount } => {
                if let Some(detail) = state.details.get_mut(&key(event)) {
                    detail.tiers.push(Tier {
                        name: name.clone(),
                        amount: *amount,
                        backers: 0,
                    });
                }
                None
            }
            ContractCall::RemoveTier { event, index } => {
                if let Some(detail) = state.details.get_mut(&key(event)) {
                    if *index < detail.tiers.len() {
                        detail.tiers.remove(*index);
                    }
                }
                None
            }
            ContractCall::Fund { event, tier_index, value } => {
                if let Some(detail) = state.details.get_mut(&key(event)) {
                    if let Some(tier) = detail.tiers.get_mut(*tier_index) {
                        tier.backers += 1;
                        detail.balance += *value;
                    }
                }
                None
            }
            _ => None,
        }
    }
}

#[async_trait(?Send)]
impl ContractReader for MockContract {
    async fn read_events(&self) -> Result<Vec<EventRecord>> {
        self.check_reads()?;
        Ok(self.state().events.clone())
    }

    async fn read_user_events(&self, owner: &Address) -> Result<Vec<EventRecord>> {
        self.check_reads()?;
        Ok(self
            .state()
            .events
            .iter()
            .filter(|e| e.owner.same_as(owner))
            .cloned()
            .collect())
    }

    async fn read_event_detail(&self, event: &Address) -> Result<EventDetail> {
        self.check_reads()?;
        self.state()
            .details
            .get(&key(event))
            .cloned()
            .ok_or_else(|| CoreError::ContractError(format!("No event at {}", event)))
    }

    async fn read_stake_position(&self, account: &Address) -> Result<StakePosition> {
        self.check_reads()?;
        Ok(self.state().positions.get(&key(account)).copied().unwrap_or_default())
    }

    async fn read_transactions(&self, _url: &str) -> Result<Vec<ExplorerTx>> {
        self.check_reads()?;
        Ok(self.state().transactions.clone())
    }
}

#[async_trait(?Send)]
impl ContractWriter for MockContract {
    async fn account(&self) -> Result<Option<Address>> {
        Ok(self.state().account.clone())
    }

    async fn submit(&self, call: &ContractCall) -> Result<TxResult> {
        let mut state = self.state();
        if let Some(reason) = &state.reject_reason {
            return Err(CoreError::Rejected(reason.clone()));
        }

        let contract_address = Self::apply(&mut state, call);
        state.submitted.push(call.clone());

        Ok(TxResult {
            tx_hash: format!("0x{:064x}", state.submitted.len()),
            contract_address,
        })
    }
}
