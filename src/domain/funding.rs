//! Venture funding rounds and the aggregates shown on the intelligence view.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::EnumIter;

/// Rolling window used for the headline funding stats
pub const STATS_WINDOW_SECS: u64 = 90 * 86_400;

/// Substrings that mark a round as real-world-asset related
pub const RWA_KEYWORDS: [&str; 18] = [
    "rwa",
    "real world asset",
    "tokeniz",
    "treasury",
    "bond",
    "credit",
    "lending",
    "ondo",
    "maple",
    "centrifuge",
    "goldfinch",
    "backed",
    "matrixdock",
    "superstate",
    "securitize",
    "polymesh",
    "chainlink",
    "oracle",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundingRound {
    pub name: String,
    pub category: Option<String>,
    pub category_group: Option<String>,
    pub sector: Option<String>,
    pub round: Option<String>,
    /// Raise size in millions of USD
    pub amount_musd: Option<f64>,
    /// Unix seconds
    pub date: Option<u64>,
    pub lead_investors: Vec<String>,
    pub other_investors: Vec<String>,
    pub chains: Vec<String>,
}

impl FundingRound {
    pub fn is_rwa_related(&self) -> bool {
        let text = format!(
            "{} {} {}",
            self.name,
            self.sector.as_deref().unwrap_or(""),
            self.category.as_deref().unwrap_or("")
        )
        .to_lowercase();
        RWA_KEYWORDS.iter().any(|kw| text.contains(kw))
    }

    /// Whether the round closed within `window_secs` before `now`.
    pub fn is_within(&self, now: u64, window_secs: u64) -> bool {
        self.date.is_some_and(|date| date > 0 && now.saturating_sub(date) < window_secs)
    }

    pub fn investors(&self) -> impl Iterator<Item = &String> {
        self.lead_investors.iter().chain(self.other_investors.iter())
    }
}

/// Newest first; undated rounds sink to the bottom.
pub fn sort_by_date_desc(rounds: &mut [FundingRound]) {
    rounds.sort_by(|a, b| b.date.unwrap_or(0).cmp(&a.date.unwrap_or(0)));
}

/// Filter chips on the funding table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter)]
pub enum FundingFilter {
    #[default]
    #[display(fmt = "All")]
    All,
    #[display(fmt = "RWA")]
    Rwa,
    #[display(fmt = "DeFi")]
    DeFi,
    #[display(fmt = "AI")]
    Ai,
    #[display(fmt = "Infrastructure")]
    Infrastructure,
}

impl FundingFilter {
    pub fn matches(&self, round: &FundingRound) -> bool {
        match self {
            FundingFilter::All => true,
            FundingFilter::Rwa => round.is_rwa_related(),
            other => {
                let needle = other.to_string().to_lowercase();
                [&round.category, &round.category_group]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Headline numbers over the trailing stats window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundingStats {
    pub total_deals: usize,
    pub total_amount_musd: f64,
    pub rwa_deals: usize,
    pub rwa_amount_musd: f64,
    /// Most active investor and its deal count; ties keep the first one seen
    pub top_investor: Option<(String, usize)>,
}

impl FundingStats {
    pub fn compute(rounds: &[FundingRound], now: u64) -> Self {
        let recent: Vec<&FundingRound> =
            rounds.iter().filter(|r| r.is_within(now, STATS_WINDOW_SECS)).collect();
        let amount = |r: &&FundingRound| r.amount_musd.unwrap_or(0.0);

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for investor in recent.iter().flat_map(|r| r.investors()) {
            let count = counts.entry(investor.clone()).or_insert_with(|| {
                order.push(investor.clone());
                0
            });
            *count += 1;
        }
        let mut top_investor: Option<(String, usize)> = None;
        for name in order {
            let count = counts[&name];
            if top_investor.as_ref().map_or(true, |(_, best)| count > *best) {
                top_investor = Some((name, count));
            }
        }

        let rwa: Vec<&&FundingRound> = recent.iter().filter(|r| r.is_rwa_related()).collect();
        Self {
            total_deals: recent.len(),
            total_amount_musd: recent.iter().map(amount).sum(),
            rwa_deals: rwa.len(),
            rwa_amount_musd: rwa.iter().map(|r| amount(*r)).sum(),
            top_investor,
        }
    }
}
