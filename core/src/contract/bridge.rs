use async_trait::async_trait;
use js_sys::{Object, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{ContractCall, ContractReader, ContractWriter};
use crate::error::{CoreError, Result};
use crate::explorer::{self, ExplorerTx};
use crate::ingest;
use crate::types::{Address, EventDetail, EventRecord, StakePosition, TxResult};

/// ページ側が注入するSDKブリッジ（window.donty）
///
/// 各メソッドはPromiseを返す。戻り値はJSON互換の値として受け取り、
/// ingestで検証済みの型に変換する。
pub struct JsContractBridge;

impl JsContractBridge {
    const GLOBAL: &'static str = "donty";

    /// ブリッジが利用可能か
    pub fn is_available() -> bool {
        if let Some(window) = web_sys::window() {
            if let Ok(bridge) = Reflect::get(&window, &JsValue::from_str(Self::GLOBAL)) {
                return !bridge.is_undefined();
            }
        }
        false
    }

    fn get_bridge() -> Result<Object> {
        let window = web_sys::window().ok_or_else(|| CoreError::Other("No window object".to_string()))?;
        let bridge = Reflect::get(&window, &JsValue::from_str(Self::GLOBAL))?;

        if bridge.is_undefined() {
            return Err(CoreError::ContractError("window.donty is undefined".to_string()));
        }

        Ok(bridge.into())
    }

    async fn call_method(&self, method: &str, args: &[JsValue]) -> Result<JsValue> {
        let bridge = Self::get_bridge()?;
        let func = Reflect::get(&bridge, &JsValue::from_str(method))?;
        if !func.is_function() {
            return Err(CoreError::ContractError(format!("window.donty.{} is not a function", method)));
        }
        let func = func.unchecked_ref::<js_sys::Function>();

        let promise = match args.len() {
            0 => func.call0(&bridge)?,
            1 => func.call1(&bridge, &args[0])?,
            2 => func.call2(&bridge, &args[0], &args[1])?,
            _ => return Err(CoreError::Other("Too many arguments".to_string())),
        };

        let result = JsFuture::from(js_sys::Promise::resolve(&promise)).await?;
        Ok(result)
    }

    /// 呼び出してJSON値として受け取る
    async fn call_json(&self, method: &str, args: &[JsValue]) -> Result<Value> {
        let result = self.call_method(method, args).await?;
        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        Ok(serde_wasm_bindgen::from_value(result)?)
    }
}

#[async_trait(?Send)]
impl ContractReader for JsContractBridge {
    async fn read_events(&self) -> Result<Vec<EventRecord>> {
        let value = self.call_json("readEvents", &[]).await?;
        Ok(ingest::event_records(&value))
    }

    async fn read_user_events(&self, owner: &Address) -> Result<Vec<EventRecord>> {
        let value = self
            .call_json("readUserEvents", &[JsValue::from_str(owner.as_str())])
            .await?;
        Ok(ingest::event_records(&value))
    }

    async fn read_event_detail(&self, event: &Address) -> Result<EventDetail> {
        let value = self
            .call_json("readEventDetail", &[JsValue::from_str(event.as_str())])
            .await?;
        if !value.is_object() {
            return Err(CoreError::ContractError(format!("No event at {}", event)));
        }
        Ok(ingest::event_detail(event, &value))
    }

    async fn read_stake_position(&self, account: &Address) -> Result<StakePosition> {
        let value = self
            .call_json("readStakePosition", &[JsValue::from_str(account.as_str())])
            .await?;
        Ok(ingest::stake_position(&value))
    }

    async fn read_transactions(&self, url: &str) -> Result<Vec<ExplorerTx>> {
        let value = self.call_json("readTransactions", &[JsValue::from_str(url)]).await?;
        Ok(explorer::transactions(&value))
    }
}

#[async_trait(?Send)]
impl ContractWriter for JsContractBridge {
    async fn account(&self) -> Result<Option<Address>> {
        let value = self.call_json("account", &[]).await?;
        Ok(value
            .as_str()
            .filter(|s| !s.is_empty())
            .map(Address::from_raw))
    }

    async fn submit(&self, call: &ContractCall) -> Result<TxResult> {
        let payload = call.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?;

        log::info!("Submitting {}", call.method());
        let value = match self.call_json("submit", &[payload]).await {
            Ok(value) => value,
            Err(CoreError::JsError(message)) => return Err(CoreError::Rejected(message)),
            Err(e) => return Err(e),
        };

        let tx_hash = ingest::value_to_string(&value["transactionHash"]);
        if tx_hash.is_empty() {
            return Err(CoreError::ContractError("Receipt has no transaction hash".to_string()));
        }
        let contract_address = Some(ingest::value_to_string(&value["contractAddress"]))
            .filter(|s| !s.is_empty())
            .map(Address::from_raw);

        Ok(TxResult { tx_hash, contract_address })
    }
}
