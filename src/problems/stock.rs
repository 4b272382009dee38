//! Best Time to Buy and Sell Stock: track the cheapest day so far.
//!
//! On equal prices the earlier buying day is kept.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::recorder::{check_len, check_values};
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInput {
    pub prices: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockState {
    pub prices: Vec<i64>,
    pub day: Option<usize>,
    pub min_day: usize,
    pub profit: Option<i64>,
    pub best: i64,
    /// (buy day, sell day)
    pub best_days: Option<(usize, usize)>,
}

pub struct BestTimeToBuySell;

impl Problem for BestTimeToBuySell {
    type Input = StockInput;
    type State = StockState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "best_time_to_buy_sell",
            title: "Best Time to Buy and Sell Stock",
            technique: Technique::SlidingWindow,
            base_interval: Duration::from_millis(800),
            limits: "at most 20 non-negative prices",
        }
    }

    fn validate(input: &StockInput) -> StepwiseResult<()> {
        check_len("prices", input.prices.len(), MAX_LEN)?;
        check_values("prices", &input.prices)?;
        if input.prices.iter().any(|p| *p < 0) {
            return Err(StepwiseError::invalid("prices must be non-negative"));
        }
        Ok(())
    }

    fn record(input: &StockInput, rec: &mut Recorder<StockState>) -> StepwiseResult<()> {
        let prices = &input.prices;
        let mut state = StockState {
            prices: prices.clone(),
            day: None,
            min_day: 0,
            profit: None,
            best: 0,
            best_days: None,
        };

        if prices.len() < 2 {
            return rec.record(
                StepKind::Empty,
                "Fewer than two days of prices: there is no way to buy and then sell, profit is 0",
                state,
            );
        }

        rec.record(
            StepKind::Start,
            format!("Day 0 costs {}; it is the cheapest day so far", prices[0]),
            state.clone(),
        )?;

        for (day, &price) in prices.iter().enumerate().skip(1) {
            state.day = Some(day);
            let buy = prices[state.min_day];
            let profit = price - buy;
            state.profit = Some(profit);
            let improved = profit > state.best;
            if improved {
                state.best = profit;
                state.best_days = Some((state.min_day, day));
            }
            rec.record(
                StepKind::Checking,
                format!(
                    "Day {day}: selling at {price} after buying at {buy} (day {}) earns {profit}{}",
                    state.min_day,
                    if improved { ", a new best" } else { "" }
                ),
                state.clone(),
            )?;

            if price < buy {
                state.min_day = day;
                rec.record(
                    StepKind::Moving,
                    format!("{price} is a new low; later sales should buy on day {day} instead"),
                    state.clone(),
                )?;
            }
        }

        state.day = None;
        state.profit = None;
        let summary = match state.best_days {
            Some((b, s)) => format!(
                "Best profit is {}: buy on day {b} at {}, sell on day {s} at {}",
                state.best, prices[b], prices[s]
            ),
            None => "Prices never rise after a purchase; the best profit is 0".to_string(),
        };
        rec.record(StepKind::Done, summary, state)
    }

    fn sample_input() -> StockInput {
        StockInput {
            prices: vec![7, 1, 5, 3, 6, 4],
        }
    }

    fn random_input(rng: &mut InputRng) -> StockInput {
        let len = rng.range_usize(2, 12);
        StockInput {
            prices: rng.vec_i64(len, 1, 20),
        }
    }
}
