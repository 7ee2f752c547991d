//! Whale transfer feed
//!
//! Single large buys, sells and wallet transfers for the live ticker, plus
//! headline 24h statistics and alert sentences.

use crate::types::{
    Exchange, ImpactLevel, Sentiment, Token, TransferKind, TransferStats, WhaleTransfer,
};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Transfers are stamped within this many seconds before `now`.
pub const TRANSFER_WINDOW_SECS: i64 = 5 * 60;

const SENTIMENTS: [Sentiment; 3] = [Sentiment::Bullish, Sentiment::Bearish, Sentiment::Neutral];
const ACTIVE_TOKENS: [Token; 3] = [Token::Btc, Token::Eth, Token::Sol];

fn random_hex<R: Rng + ?Sized>(rng: &mut R, bytes: usize) -> String {
    let raw: Vec<u8> = (0..bytes).map(|_| rng.gen()).collect();
    hex::encode(raw)
}

/// Shortened wallet address in the style of the token's chain.
pub fn wallet_address<R: Rng + ?Sized>(rng: &mut R, token: Token) -> String {
    match token {
        Token::Btc => format!("bc1{}...{}", random_hex(rng, 15), random_hex(rng, 4)),
        Token::Sol => format!("{}...{}", random_hex(rng, 6), random_hex(rng, 4)),
        _ => format!("0x{}...{}", random_hex(rng, 4), random_hex(rng, 4)),
    }
}

/// Compact USD label: "$1.2M", "$850.0K", "$420.50".
pub fn format_usd_compact(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${:.2}", value)
    }
}

/// Generate one whale transfer.
pub fn generate_transfer<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> WhaleTransfer {
    let token = *Token::ALL.choose(rng).unwrap_or(&Token::Btc);
    let kind = *TransferKind::ALL.choose(rng).unwrap_or(&TransferKind::Transfer);
    let exchange = *Exchange::TRANSFER_VENUES.choose(rng).unwrap_or(&Exchange::Binance);

    let (lo, hi) = token.amount_range();
    let amount = rng.gen_range(lo..=hi);
    let value_usd = amount as f64 * token.reference_price();

    let wallet = wallet_address(rng, token);
    let hash = format!("0x{}...{}", random_hex(rng, 8), random_hex(rng, 4));
    let time = now - Duration::seconds(rng.gen_range(0..=TRANSFER_WINDOW_SECS));

    let transfer = WhaleTransfer {
        time,
        kind,
        token,
        amount,
        value_usd,
        value_label: format_usd_compact(value_usd),
        impact: ImpactLevel::from_amount(amount),
        exchange,
        wallet,
        hash,
    };

    debug!(
        "Generated whale transfer: {} {} for {}",
        transfer.token, transfer.kind, transfer.value_label
    );
    transfer
}

/// Generate `count` transfers, newest first.
pub fn generate_transfers<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    count: usize,
) -> Vec<WhaleTransfer> {
    let mut transfers: Vec<WhaleTransfer> = (0..count).map(|_| generate_transfer(rng, now)).collect();
    transfers.sort_by(|a, b| b.time.cmp(&a.time));
    transfers
}

/// Headline 24h figures for the transfer panel.
pub fn transfer_statistics<R: Rng + ?Sized>(rng: &mut R) -> TransferStats {
    TransferStats {
        total_transactions_24h: rng.gen_range(150..=300),
        total_volume_24h: format!("${}M", rng.gen_range(500..=1_200)),
        largest_transaction: format!("${}M BTC", rng.gen_range(50..=200)),
        most_active_token: *ACTIVE_TOKENS.choose(rng).unwrap_or(&Token::Btc),
        whale_sentiment: *SENTIMENTS.choose(rng).unwrap_or(&Sentiment::Neutral),
    }
}

/// One of several alert sentences describing a transfer.
pub fn transfer_alert<R: Rng + ?Sized>(rng: &mut R, transfer: &WhaleTransfer) -> String {
    let kind = transfer.kind.to_string().to_lowercase();
    match rng.gen_range(0..3) {
        0 => format!(
            "WHALE ALERT: Large {} detected! {} {} ({}) on {}",
            kind, transfer.amount, transfer.token, transfer.value_label, transfer.exchange
        ),
        1 => format!(
            "Big Move: {} {} worth {} just {} on {}",
            transfer.amount,
            transfer.token,
            transfer.value_label,
            transfer.kind.past_tense(),
            transfer.exchange
        ),
        _ => format!(
            "Whale Activity: {} {} {} transaction spotted on {}",
            transfer.value_label, transfer.token, kind, transfer.exchange
        ),
    }
}

/// Transfers spread over the last `hours` hours, 1 to k per hour with k in [5, 15].
pub fn transfer_history<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    hours: u32,
) -> Vec<WhaleTransfer> {
    let per_hour_max: u32 = rng.gen_range(5..=15);
    let mut history = Vec::new();

    for hour in 0..hours {
        for _ in 0..rng.gen_range(1..=per_hour_max) {
            let mut transfer = generate_transfer(rng, now);
            transfer.time = now
                - Duration::hours(hour as i64)
                - Duration::minutes(rng.gen_range(0..=59));
            history.push(transfer);
        }
    }

    debug!("Generated {} historical transfers over {}h", history.len(), hours);
    history
}
