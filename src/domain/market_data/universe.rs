//! Tokens tracked by the market view.

use super::value_objects::Symbol;
use derive_more::Display;
use strum::{EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum TokenCategory {
    #[display(fmt = "RWA")]
    #[strum(serialize = "RWA")]
    Rwa,
    #[display(fmt = "Oracle")]
    #[strum(serialize = "Oracle")]
    Oracle,
    #[display(fmt = "L1")]
    #[strum(serialize = "L1")]
    L1,
    #[display(fmt = "L2")]
    #[strum(serialize = "L2")]
    L2,
    #[display(fmt = "DeFi")]
    #[strum(serialize = "DeFi")]
    DeFi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: &'static str,
    pub name: &'static str,
    pub category: TokenCategory,
    /// Brand color used for the token avatar
    pub color: &'static str,
}

impl Token {
    const fn new(
        symbol: &'static str,
        name: &'static str,
        category: TokenCategory,
        color: &'static str,
    ) -> Self {
        Self { symbol, name, category, color }
    }

    pub fn symbol(&self) -> Symbol {
        Symbol::from(self.symbol)
    }

    /// Two-letter avatar text
    pub fn initials(&self) -> &'static str {
        let end = self.symbol.char_indices().nth(2).map_or(self.symbol.len(), |(i, _)| i);
        &self.symbol[..end]
    }
}

pub const TOKEN_UNIVERSE: [Token; 16] = [
    Token::new("ONDO", "Ondo Finance", TokenCategory::Rwa, "#4F6EF7"),
    Token::new("POLYX", "Polymesh", TokenCategory::Rwa, "#9B59B6"),
    Token::new("SYRUP", "Maple Finance", TokenCategory::Rwa, "#E67E22"),
    Token::new("OPEN", "OpenTrade", TokenCategory::Rwa, "#2DD4A0"),
    Token::new("ACX", "Across Protocol", TokenCategory::Rwa, "#6FCF97"),
    Token::new("LINK", "Chainlink", TokenCategory::Oracle, "#2A5ADA"),
    Token::new("PYTH", "Pyth Network", TokenCategory::Oracle, "#E6007A"),
    Token::new("BTC", "Bitcoin", TokenCategory::L1, "#F7931A"),
    Token::new("ETH", "Ethereum", TokenCategory::L1, "#627EEA"),
    Token::new("SOL", "Solana", TokenCategory::L1, "#9945FF"),
    Token::new("AVAX", "Avalanche", TokenCategory::L1, "#E84142"),
    Token::new("ARB", "Arbitrum", TokenCategory::L2, "#28A0F0"),
    Token::new("OP", "Optimism", TokenCategory::L2, "#FF0420"),
    Token::new("AAVE", "Aave", TokenCategory::DeFi, "#B6509E"),
    Token::new("UNI", "Uniswap", TokenCategory::DeFi, "#FF007A"),
    Token::new("MKR", "Maker", TokenCategory::DeFi, "#1AAB9B"),
];

/// Tokens in `category`, or all of them for `None`, in universe order.
pub fn tokens_in(category: Option<TokenCategory>) -> impl Iterator<Item = &'static Token> {
    TOKEN_UNIVERSE.iter().filter(move |t| category.map_or(true, |c| t.category == c))
}

pub fn find_token(symbol: &str) -> Option<&'static Token> {
    TOKEN_UNIVERSE.iter().find(|t| t.symbol.eq_ignore_ascii_case(symbol))
}

/// Comma-joined symbol list for the prices endpoint.
pub fn universe_query() -> String {
    TOKEN_UNIVERSE.iter().map(|t| t.symbol).collect::<Vec<_>>().join(",")
}
