//! CLOB `/book` response.
//!
//! Example payload:
//! ```json
//! {"market":"0x...","asset_id":"123...","bids":[{"price":"0.48","size":"30"}],
//!  "asks":[{"price":"0.52","size":"25"}],"tick_size":"0.01","min_order_size":"5"}
//! ```

use serde::Deserialize;

use crate::domain::{book::Book, book::PriceLevel, id::TokenId};

#[derive(Debug, Deserialize)]
pub struct BookResponse {
    pub asset_id: String,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub bids: Vec<BookLevel>,
    #[serde(default)]
    pub asks: Vec<BookLevel>,
    #[serde(default)]
    pub tick_size: Option<String>,
    #[serde(default)]
    pub min_order_size: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Price level as received from the API (strings, not decimals).
#[derive(Debug, Clone, Deserialize)]
pub struct BookLevel {
    pub price: String,
    pub size: String,
}

impl BookResponse {
    /// Convert the response to a domain [`Book`].
    ///
    /// Levels that do not parse as decimals are dropped. A missing or
    /// malformed tick size leaves the book's default in place.
    #[must_use]
    pub fn to_book(&self) -> Book {
        let book = Book::with_levels(
            TokenId::from(self.asset_id.clone()),
            Self::parse_levels(&self.bids),
            Self::parse_levels(&self.asks),
        );

        match self.tick_size.as_deref().and_then(|t| t.parse().ok()) {
            Some(tick) => book.with_tick_size(tick),
            None => book,
        }
    }

    fn parse_levels(levels: &[BookLevel]) -> Vec<PriceLevel> {
        levels
            .iter()
            .filter_map(|pl| {
                Some(PriceLevel::new(
                    pl.price.parse().ok()?,
                    pl.size.parse().ok()?,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_and_sorts_levels() {
        let json = r#"{
            "market": "0xabc",
            "asset_id": "71321045679252212594626385532706912750332728571942532289631379312455583992563",
            "bids": [{"price": "0.40", "size": "100"}, {"price": "0.42", "size": "50"}],
            "asks": [{"price": "0.47", "size": "20"}, {"price": "0.45", "size": "10"}],
            "tick_size": "0.001",
            "min_order_size": "5"
        }"#;

        let book = serde_json::from_str::<BookResponse>(json).unwrap().to_book();

        assert_eq!(book.best_ask().unwrap().price(), dec!(0.45));
        assert_eq!(book.best_bid().unwrap().price(), dec!(0.42));
        assert_eq!(book.tick_size(), dec!(0.001));
    }

    #[test]
    fn unparseable_levels_are_dropped() {
        let json = r#"{
            "asset_id": "1",
            "asks": [{"price": "abc", "size": "10"}, {"price": "0.5", "size": "3"}]
        }"#;

        let book = serde_json::from_str::<BookResponse>(json).unwrap().to_book();

        assert_eq!(book.asks().len(), 1);
        assert_eq!(book.tick_size(), crate::domain::book::DEFAULT_TICK_SIZE);
        assert!(book.bids().is_empty());
    }
}
