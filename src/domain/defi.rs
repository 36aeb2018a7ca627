use serde::{Deserialize, Serialize};

/// Total value locked for one protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolTvl {
    pub name: String,
    pub tvl: f64,
    pub change_1d: Option<f64>,
    pub change_7d: Option<f64>,
    pub category: Option<String>,
    pub chains: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefiOverview {
    pub total_tvl_usd: f64,
    /// Server-formatted headline, kept verbatim when present
    pub total_tvl_formatted: Option<String>,
    pub top_protocols: Vec<ProtocolTvl>,
}

impl DefiOverview {
    pub fn top(&self, n: usize) -> &[ProtocolTvl] {
        &self.top_protocols[..n.min(self.top_protocols.len())]
    }
}
