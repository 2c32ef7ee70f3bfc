use std::collections::HashMap;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Status, Trade};

pub const SYMBOLS: &[(&str, f64)] = &[
    ("BTCUSDT", 42_000.0),
    ("ETHUSDT", 2_300.0),
    ("SOLUSDT", 95.0),
    ("BNBUSDT", 310.0),
    ("XRPUSDT", 0.62),
];

const STARTING_BALANCE: f64 = 1_000.0;
const STOP_VOL_MULTIPLIER: f64 = 2.0;
const TRADE_SPACING_SECS: i64 = 90;

/// Seeded source of plausible bot activity for demos and benchmarks.
pub struct TradeGenerator {
    rng: StdRng,
    prices: HashMap<&'static str, f64>,
    volatility: HashMap<&'static str, f64>,
}

impl TradeGenerator {
    pub fn new(seed: u64) -> Self {
        let prices = SYMBOLS.iter().map(|(sym, base)| (*sym, *base)).collect();
        let volatility = SYMBOLS.iter().map(|(sym, _)| (*sym, 0.01)).collect();
        Self { rng: StdRng::seed_from_u64(seed), prices, volatility }
    }

    /// `count` trades in execution order, the last one at `end`.
    pub fn generate_trades(&mut self, count: usize, end: DateTime<Utc>) -> Vec<Trade> {
        let first = end - Duration::seconds(TRADE_SPACING_SECS * count.saturating_sub(1) as i64);
        (0..count)
            .map(|i| {
                let ts = first + Duration::seconds(TRADE_SPACING_SECS * i as i64);
                self.next_trade(ts)
            })
            .collect()
    }

    fn next_trade(&mut self, ts: DateTime<Utc>) -> Trade {
        let (sym, _) = SYMBOLS[self.rng.gen_range(0..SYMBOLS.len())];

        let price = self.prices.get(sym).copied().unwrap_or(1.0);
        let ret: f64 = self.rng.gen_range(-0.01..0.01);
        let next_price = price * (1.0 + ret);
        self.prices.insert(sym, next_price);

        // EWMA of absolute returns
        let prev_vol = self.volatility.get(sym).copied().unwrap_or(0.01);
        let vol = 0.9 * prev_vol + 0.1 * ret.abs();
        self.volatility.insert(sym, vol);

        let buy = self.rng.gen_bool(0.5);
        let stop_distance = next_price * vol * STOP_VOL_MULTIPLIER;
        let stop_price = if buy { next_price - stop_distance } else { next_price + stop_distance };
        let notional: f64 = self.rng.gen_range(20.0..150.0);

        Trade {
            time: ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            pair: sym.to_string(),
            price: round_to(next_price, 4),
            size: round_to(notional / next_price, 6),
            volatility: vol,
            action: if buy { "buy" } else { "sell" }.to_string(),
            stop_price: round_to(stop_price, 4),
        }
    }

    /// A status snapshot consistent with `trades`: open positions are buys
    /// not yet matched by a sell on the same pair.
    pub fn status_for(&mut self, trades: &[Trade]) -> Status {
        let mut open: HashMap<&str, i64> = HashMap::new();
        for t in trades {
            let entry = open.entry(t.pair.as_str()).or_insert(0);
            if t.is_buy() {
                *entry += 1;
            } else if *entry > 0 {
                *entry -= 1;
            }
        }
        let open_trades: i64 = open.values().sum();
        let daily_pnl = round_to(self.rng.gen_range(-60.0..90.0), 2);

        Status {
            balance: Some(round_to(STARTING_BALANCE + daily_pnl, 2)),
            open_trades: Some(open_trades as f64),
            daily_pnl: Some(daily_pnl),
            running: Some(true),
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
