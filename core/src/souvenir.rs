//! 記念品NFT（ERC-721）の一覧とカルーセル

use serde::{Deserialize, Serialize};

use crate::contract::ContractCall;
use crate::error::{CoreError, Result};
use crate::types::Address;

/// 記念品1種類
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Souvenir {
    pub title: String,
    pub image_url: String,
    pub description: String,
    /// NFTコントラクト
    pub contract: String,
}

impl Souvenir {
    fn new(title: &str, image_url: &str, description: &str, contract: &str) -> Self {
        Self {
            title: title.to_string(),
            image_url: image_url.to_string(),
            description: description.to_string(),
            contract: contract.to_string(),
        }
    }

    /// 接続中のアカウントに1枚発行する呼び出し
    pub fn claim_tx(&self, to: Option<&Address>) -> Result<ContractCall> {
        let to = to
            .filter(|a| !a.is_empty())
            .ok_or_else(|| CoreError::InvalidInput("Please connect your wallet to claim.".to_string()))?;
        Ok(ContractCall::ClaimSouvenir {
            contract: Address::parse(&self.contract)?,
            to: to.clone(),
        })
    }
}

/// 既定の記念品
pub fn default_souvenirs() -> Vec<Souvenir> {
    vec![
        Souvenir::new(
            "SlowLo",
            "/slowlo.png",
            "Meet SlowLo !",
            "0x79dc3441FB8d05BeA4Edf372C0BF1c36be4ae8C8",
        ),
        Souvenir::new(
            "Floppy",
            "/floppy.png",
            "Hop into hope with Floppy!",
            "0x93c8EF9F13C2c00223c51Eca6fC91A77b1174E6c",
        ),
        Souvenir::new(
            "Original Rose",
            "/BG_webpage_.png",
            "Timeless essence of Donty, the Original Rose.",
            "0xe1Fd326E6325e923F3C6278d9cF82665CB6735B6",
        ),
        Souvenir::new(
            "Colur Rose",
            "/colur_webpage_v3.png",
            "Brighten your day with Color Rose!",
            "0xe89c861642e1Bf24121840234880e89fE28DeefC",
        ),
        Souvenir::new(
            "Dark Rose",
            "/bg_colur_webpage_v3.png",
            "Embrace the mystery of Dark Rose!",
            "0xa13492E9aC4d4Bed1742aB69AdCE56455961f10b",
        ),
    ]
}

/// 両端で折り返すカルーセルの位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
}

impl Carousel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 件数に収めた位置（件数0なら0）
    pub fn index(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.index % len
        }
    }

    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index(len) + 1) % len;
        }
    }

    pub fn previous(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index(len) + len - 1) % len;
        }
    }

    pub fn current<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.index(items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carousel_wraps_both_ways() {
        let items = default_souvenirs();
        let mut carousel = Carousel::new();
        assert_eq!(carousel.current(&items).unwrap().title, "SlowLo");

        carousel.previous(items.len());
        assert_eq!(carousel.index(items.len()), 4);
        assert_eq!(carousel.current(&items).unwrap().title, "Dark Rose");

        carousel.next(items.len());
        assert_eq!(carousel.index(items.len()), 0);

        for _ in 0..7 {
            carousel.next(items.len());
        }
        assert_eq!(carousel.index(items.len()), 2);
    }

    #[test]
    fn test_carousel_follows_shrinking_list() {
        let mut carousel = Carousel::new();
        for _ in 0..4 {
            carousel.next(5);
        }
        assert_eq!(carousel.index(3), 1);
        carousel.previous(3);
        assert_eq!(carousel.index(3), 0);

        let empty: Vec<Souvenir> = Vec::new();
        carousel.next(0);
        carousel.previous(0);
        assert_eq!(carousel.index(0), 0);
        assert!(carousel.current(&empty).is_none());
    }

    #[test]
    fn test_claim_requires_account() {
        let souvenir = &default_souvenirs()[1];
        assert!(matches!(souvenir.claim_tx(None), Err(CoreError::InvalidInput(_))));

        let account = Address::from_raw("0x00000000000000000000000000000000000000aa");
        let call = souvenir.claim_tx(Some(&account)).unwrap();
        assert_eq!(
            call,
            ContractCall::ClaimSouvenir {
                contract: Address::from_raw("0x93c8EF9F13C2c00223c51Eca6fC91A77b1174E6c"),
                to: account,
            }
        );
    }

    #[test]
    fn test_claim_rejects_bad_contract() {
        let souvenir = Souvenir::new("Broken", "", "", "not-an-address");
        let account = Address::from_raw("0x00000000000000000000000000000000000000aa");
        assert!(souvenir.claim_tx(Some(&account)).is_err());
    }
}
