// ブラウザ上でのE2Eテスト
// eGuiはcanvasベースなので、画面ではなくwindow.dontyブリッジとlocalStorageを経由して確認する

use donty_core::contract::bridge::JsContractBridge;
use donty_core::contract::{ContractCall, ContractReader, ContractWriter};
use donty_core::theme::{LocalPreferenceStore, ThemeMode, ThemePreference};
use donty_core::CoreHandle;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const OWNER: &str = "0x00000000000000000000000000000000000000aa";

/// スタブのブリッジをwindow.dontyに注入
fn install_stub_bridge() {
    let source = format!(
        r#"
        window.donty = {{
            account: () => "{owner}",
            readEvents: async () => [
                {{ eventAddress: "0x01", owner: "{owner}", title: "Beach Cleanup", imageUrl: "",
                   category: "3", creationTime: "10" }},
                {{ eventAddress: "0x02", owner: "{owner}", title: "Library Drive", imageUrl: "",
                   category: "0", creationTime: "20" }},
            ],
            submit: async (call) => {{
                if (call.method === "fund") throw "User rejected the request.";
                return {{ transactionHash: "0xabc", contractAddress: call.method === "deployEvent" ? "0x03" : null }};
            }},
        }};
        "#,
        owner = OWNER
    );
    js_sys::eval(&source).unwrap();
}

fn remove_stub_bridge() {
    let window = web_sys::window().unwrap();
    js_sys::Reflect::delete_property(&window, &JsValue::from_str("donty")).unwrap();
}

#[wasm_bindgen_test]
fn test_bridge_detection() {
    remove_stub_bridge();
    assert!(!JsContractBridge::is_available());
    assert!(CoreHandle::in_browser().is_err());

    install_stub_bridge();
    assert!(JsContractBridge::is_available());
    assert!(CoreHandle::in_browser().is_ok());
}

#[wasm_bindgen_test]
async fn test_account_and_events_through_bridge() {
    install_stub_bridge();
    let bridge = JsContractBridge;

    let account = bridge.account().await.unwrap();
    assert_eq!(account.map(|a| a.as_str().to_string()), Some(OWNER.to_string()));

    let events = bridge.read_events().await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "Beach Cleanup");
}

#[wasm_bindgen_test]
async fn test_rejected_submit_is_reported() {
    install_stub_bridge();
    let core = CoreHandle::in_browser().unwrap();
    core.refresh_events().await.unwrap();

    let event = core.events()[0].address.clone();
    let call = ContractCall::Fund {
        event,
        tier_index: 0,
        value: 10,
    };
    assert!(core.submit(call, 1_700_000_000).await.is_err());

    let notifications = core.poll_notifications(10);
    let last = notifications.last().unwrap();
    assert_eq!(last.message, "Error: User rejected the request.");
}

#[wasm_bindgen_test]
fn test_theme_persists_in_local_storage() {
    let mut theme = ThemePreference::load(Rc::new(LocalPreferenceStore));
    theme.set(ThemeMode::Dark).unwrap();

    let reloaded = ThemePreference::load(Rc::new(LocalPreferenceStore));
    assert_eq!(reloaded.get(), ThemeMode::Dark);

    theme.set(ThemeMode::Light).unwrap();
}

#[wasm_bindgen_test]
async fn test_souvenir_claim_reaches_bridge() {
    install_stub_bridge();
    let core = CoreHandle::in_browser().unwrap();
    let account = core.account().await.unwrap();

    let call = core.config().souvenirs[0].claim_tx(account.as_ref()).unwrap();
    core.submit(call, 1_700_000_000).await.unwrap();

    let notifications = core.poll_notifications(10);
    assert_eq!(notifications.last().unwrap().message, "NFT claimed successfully!");
}
