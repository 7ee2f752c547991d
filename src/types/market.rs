use serde::{Deserialize, Serialize};

/// Tracked perpetual trading pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Symbol {
    BtcUsdt,
    EthUsdt,
    SolUsdt,
    AdaUsdt,
    BnbUsdt,
    DotUsdt,
    MaticUsdt,
    LinkUsdt,
}

impl Symbol {
    /// Every tracked pair, majors first.
    pub const ALL: [Symbol; 8] = [
        Symbol::BtcUsdt,
        Symbol::EthUsdt,
        Symbol::SolUsdt,
        Symbol::AdaUsdt,
        Symbol::BnbUsdt,
        Symbol::DotUsdt,
        Symbol::MaticUsdt,
        Symbol::LinkUsdt,
    ];

    /// Pairs with a long/short ratio feed.
    pub const RATIO_TRACKED: [Symbol; 6] = [
        Symbol::BtcUsdt,
        Symbol::EthUsdt,
        Symbol::SolUsdt,
        Symbol::AdaUsdt,
        Symbol::BnbUsdt,
        Symbol::DotUsdt,
    ];

    /// Reference price in USD used to anchor simulated prices.
    pub fn base_price(&self) -> f64 {
        match self {
            Symbol::BtcUsdt => 104_000.0,
            Symbol::EthUsdt => 2_500.0,
            Symbol::SolUsdt => 145.0,
            Symbol::AdaUsdt => 1.2,
            Symbol::BnbUsdt => 690.0,
            Symbol::DotUsdt => 7.8,
            Symbol::MaticUsdt => 0.85,
            Symbol::LinkUsdt => 15.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::BtcUsdt => "BTCUSDT",
            Symbol::EthUsdt => "ETHUSDT",
            Symbol::SolUsdt => "SOLUSDT",
            Symbol::AdaUsdt => "ADAUSDT",
            Symbol::BnbUsdt => "BNBUSDT",
            Symbol::DotUsdt => "DOTUSDT",
            Symbol::MaticUsdt => "MATICUSDT",
            Symbol::LinkUsdt => "LINKUSDT",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Venue a simulated position or trade is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    Binance,
    Bybit,
    #[serde(rename = "OKX")]
    Okx,
    Bitget,
    Coinbase,
    Kraken,
    Huobi,
}

impl Exchange {
    /// Derivatives venues used for open positions.
    pub const POSITION_VENUES: [Exchange; 4] = [
        Exchange::Binance,
        Exchange::Bybit,
        Exchange::Okx,
        Exchange::Bitget,
    ];

    /// Venues used for closed trades.
    pub const TRADE_VENUES: [Exchange; 4] = [
        Exchange::Binance,
        Exchange::Coinbase,
        Exchange::Kraken,
        Exchange::Bybit,
    ];

    /// Venues seen in large transfers.
    pub const TRANSFER_VENUES: [Exchange; 6] = [
        Exchange::Binance,
        Exchange::Coinbase,
        Exchange::Kraken,
        Exchange::Okx,
        Exchange::Bybit,
        Exchange::Huobi,
    ];
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exchange::Binance => write!(f, "Binance"),
            Exchange::Bybit => write!(f, "Bybit"),
            Exchange::Okx => write!(f, "OKX"),
            Exchange::Bitget => write!(f, "Bitget"),
            Exchange::Coinbase => write!(f, "Coinbase"),
            Exchange::Kraken => write!(f, "Kraken"),
            Exchange::Huobi => write!(f, "Huobi"),
        }
    }
}

/// Position side (long or short).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Long,
    Short,
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionSide::Long => write!(f, "LONG"),
            PositionSide::Short => write!(f, "SHORT"),
        }
    }
}

/// Direction of a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::Buy => write!(f, "BUY"),
            TradeType::Sell => write!(f, "SELL"),
        }
    }
}
