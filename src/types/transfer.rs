use super::market::Exchange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tokens that show up in the large transfer feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Token {
    Btc,
    Eth,
    Sol,
    Bnb,
    Ada,
    Dot,
}

impl Token {
    pub const ALL: [Token; 6] = [
        Token::Btc,
        Token::Eth,
        Token::Sol,
        Token::Bnb,
        Token::Ada,
        Token::Dot,
    ];

    /// Approximate USD price used to value a transfer.
    pub fn reference_price(&self) -> f64 {
        match self {
            Token::Btc => 104_906.0,
            Token::Eth => 2_526.0,
            Token::Sol => 145.0,
            Token::Bnb => 692.0,
            Token::Ada => 1.23,
            Token::Dot => 7.89,
        }
    }

    /// Inclusive range of token units a whale typically moves.
    pub fn amount_range(&self) -> (u64, u64) {
        match self {
            Token::Btc => (50, 2_000),
            Token::Eth => (200, 5_000),
            Token::Sol | Token::Bnb => (500, 10_000),
            Token::Ada | Token::Dot => (1_000, 50_000),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Btc => write!(f, "BTC"),
            Token::Eth => write!(f, "ETH"),
            Token::Sol => write!(f, "SOL"),
            Token::Bnb => write!(f, "BNB"),
            Token::Ada => write!(f, "ADA"),
            Token::Dot => write!(f, "DOT"),
        }
    }
}

/// What the whale did with the tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferKind {
    Buy,
    Sell,
    Transfer,
}

impl TransferKind {
    pub const ALL: [TransferKind; 3] = [TransferKind::Buy, TransferKind::Sell, TransferKind::Transfer];

    /// Past-tense verb used in alert sentences.
    pub fn past_tense(&self) -> &'static str {
        match self {
            TransferKind::Buy => "bought",
            TransferKind::Sell => "sold",
            TransferKind::Transfer => "transferred",
        }
    }
}

impl std::fmt::Display for TransferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferKind::Buy => write!(f, "Buy"),
            TransferKind::Sell => write!(f, "Sell"),
            TransferKind::Transfer => write!(f, "Transfer"),
        }
    }
}

/// Expected market impact of a transfer, by size in token units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn from_amount(amount: u64) -> Self {
        if amount > 5_000 {
            ImpactLevel::High
        } else if amount > 1_000 {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImpactLevel::Low => write!(f, "Low Impact"),
            ImpactLevel::Medium => write!(f, "Medium Impact"),
            ImpactLevel::High => write!(f, "High Impact"),
        }
    }
}

/// A single large on-chain style transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhaleTransfer {
    pub time: DateTime<Utc>,
    pub kind: TransferKind,
    pub token: Token,
    /// Amount in token units
    pub amount: u64,
    /// USD value
    pub value_usd: f64,
    /// USD value formatted for display ("$1.2M")
    pub value_label: String,
    pub impact: ImpactLevel,
    pub exchange: Exchange,
    /// Shortened wallet address
    pub wallet: String,
    /// Shortened transaction hash
    pub hash: String,
}

/// Market-wide whale sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Bullish => write!(f, "Bullish"),
            Sentiment::Bearish => write!(f, "Bearish"),
            Sentiment::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Headline 24h statistics for the transfer feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStats {
    pub total_transactions_24h: u32,
    pub total_volume_24h: String,
    pub largest_transaction: String,
    pub most_active_token: Token,
    pub whale_sentiment: Sentiment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_thresholds() {
        assert_eq!(ImpactLevel::from_amount(500), ImpactLevel::Low);
        assert_eq!(ImpactLevel::from_amount(1_000), ImpactLevel::Low);
        assert_eq!(ImpactLevel::from_amount(1_001), ImpactLevel::Medium);
        assert_eq!(ImpactLevel::from_amount(5_000), ImpactLevel::Medium);
        assert_eq!(ImpactLevel::from_amount(5_001), ImpactLevel::High);
    }

    #[test]
    fn test_token_amount_ranges() {
        for token in Token::ALL {
            let (lo, hi) = token.amount_range();
            assert!(lo < hi);
        }
        assert_eq!(Token::Btc.amount_range(), (50, 2_000));
    }
}
