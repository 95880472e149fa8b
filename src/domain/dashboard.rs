//! The dashboard: live parameters, the session cache and the views built
//! from them.
//!
//! Every setter validates the changed parameters, persists them through the
//! parameter port and only then adopts them, so a rejected change leaves the
//! stored and in-memory state untouched.

use crate::domain::charts::{gain_chart, market_chart, stock_charts, Chart, StockChartOptions};
use crate::domain::error::FinstreamError;
use crate::domain::gain::{aggregate_gains, GainCurve};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::params::{
    parse_symbol_list, validate_parameters, HistoryWindow, MarketWindow, Parameters, ViewWindow,
    DAILY_HISTORY, SECTION_SYMBOLS,
};
use crate::domain::screening::{screen, ScreeningResult, Thresholds};
use crate::domain::session::Session;
use crate::domain::snapshot::{merge_all, SnapshotTable, FIELD_PREVIOUS_CLOSE};
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::parameter_port::ParameterPort;
use std::collections::HashMap;

pub struct Dashboard<'a> {
    session: Session<'a>,
    store: &'a dyn ParameterPort,
    params: Parameters,
}

impl<'a> Dashboard<'a> {
    /// Loads (or first-run defaults and persists) the parameters.
    pub fn open(
        provider: &'a dyn MarketDataPort,
        store: &'a dyn ParameterPort,
    ) -> Result<Self, FinstreamError> {
        let params = store.load()?;
        validate_parameters(&params)?;
        Ok(Self {
            session: Session::new(provider),
            store,
            params,
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Drops every cached provider result.
    pub fn refresh(&mut self) {
        self.session.invalidate();
    }

    /// Merges quotes with indicators over [`DAILY_HISTORY`]. A quote outage
    /// only strips the quote fields; a history outage fails the table.
    pub fn snapshot_table(&mut self) -> Result<SnapshotTable, FinstreamError> {
        let portfolio = &self.params.portfolio;
        let quotes = match self.session.quotes(portfolio) {
            Ok(quotes) => quotes.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "quote snapshot unavailable, records will lack quote fields");
                HashMap::new()
            }
        };
        let (period, interval) = DAILY_HISTORY;
        let histories = self.session.history(portfolio, period, interval)?;
        Ok(merge_all(portfolio, &quotes, histories))
    }

    pub fn screening(&self, table: &SnapshotTable) -> ScreeningResult {
        screen(table, &self.params.thresholds)
    }

    /// Benchmark curves followed by the equal-weight portfolio curve over the
    /// gain window. Benchmarks without history are skipped; a portfolio
    /// member without history is an error.
    pub fn gain_curves(&mut self) -> Result<Vec<GainCurve>, FinstreamError> {
        let (period, interval) = self.params.gain_period.history();

        let benchmarks: Vec<PriceSeries> = {
            let fetched = self
                .session
                .history(&self.params.benchmark, period, interval)?;
            self.params
                .benchmark
                .iter()
                .filter_map(|symbol| match fetched.get(symbol) {
                    Some(series) if !series.is_empty() => Some(series.clone()),
                    _ => {
                        tracing::warn!(symbol = %symbol, "benchmark has no history, skipped");
                        None
                    }
                })
                .collect()
        };

        let fetched = self
            .session
            .history(&self.params.portfolio, period, interval)?;
        let mut portfolio = Vec::with_capacity(self.params.portfolio.len());
        for symbol in &self.params.portfolio {
            match fetched.get(symbol) {
                Some(series) if !series.is_empty() => portfolio.push(series),
                _ => {
                    return Err(FinstreamError::NoData {
                        symbol: symbol.clone(),
                    })
                }
            }
        }

        let shortest = benchmarks
            .iter()
            .chain(portfolio.iter().copied())
            .map(PriceSeries::len)
            .min()
            .unwrap_or(0);
        let num_points = self.params.gain_period.num_points(shortest);
        tracing::debug!(num_points, shortest, period = %self.params.gain_period, "gain window");

        let benchmark_refs: Vec<&PriceSeries> = benchmarks.iter().collect();
        Ok(aggregate_gains(&benchmark_refs, &portfolio, num_points)?)
    }

    pub fn gain_chart(&mut self) -> Result<Chart, FinstreamError> {
        Ok(gain_chart(&self.gain_curves()?))
    }

    /// Charts for the selected stock over the selected stock window.
    pub fn stock_charts(&mut self, options: StockChartOptions) -> Result<Vec<Chart>, FinstreamError> {
        let (period, interval) = self.params.stock_period.history();
        let ticker = &self.params.stock_ticker;
        let histories = self
            .session
            .history(&self.params.portfolio, period, interval)?;
        let series = histories
            .get(ticker)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FinstreamError::NoData {
                symbol: ticker.clone(),
            })?;
        let num_points = self.params.stock_period.num_points(series.len());
        Ok(stock_charts(
            series,
            num_points,
            &self.params.thresholds,
            options,
        ))
    }

    /// One chart per market symbol. Missing history or previous close
    /// degrades that chart only.
    pub fn market_charts(&mut self) -> Result<Vec<Chart>, FinstreamError> {
        let market = &self.params.market;
        let prev_closes: HashMap<String, f64> = match self.session.quotes(market) {
            Ok(quotes) => quotes
                .iter()
                .filter_map(|(symbol, q)| q.get(FIELD_PREVIOUS_CLOSE).map(|v| (symbol.clone(), v)))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "market quotes unavailable, charts drawn without previous close");
                HashMap::new()
            }
        };

        let window = self.params.market_period;
        let (period, interval) = window.history();
        let histories = self.session.history(market, period, interval)?;

        Ok(market
            .iter()
            .map(|symbol| {
                let series = histories.get(symbol).filter(|s| !s.is_empty());
                let num_points = series.map_or(0, |s| window.num_points(s.len()));
                market_chart(symbol, series, num_points, prev_closes.get(symbol).copied())
            })
            .collect())
    }

    /// Replaces the portfolio from whitespace/comma separated input. Returns
    /// whether anything changed.
    pub fn set_portfolio(&mut self, input: &str) -> Result<bool, FinstreamError> {
        let symbols = parse_symbol_list(input)
            .map_err(|e| FinstreamError::invalid(SECTION_SYMBOLS, "portfolio", e.to_string()))?;
        if symbols == self.params.portfolio {
            return Ok(false);
        }

        let mut next = self.params.clone();
        if !symbols.contains(&next.stock_ticker) {
            next.stock_ticker = symbols[0].clone();
            tracing::info!(stock_ticker = %next.stock_ticker, "stock ticker reset to first portfolio symbol");
        }
        next.portfolio = symbols;
        self.apply(next)?;
        self.session.invalidate();
        Ok(true)
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) -> Result<(), FinstreamError> {
        let mut next = self.params.clone();
        next.thresholds = thresholds;
        self.apply(next)
    }

    pub fn set_gain_period(&mut self, period: HistoryWindow) -> Result<(), FinstreamError> {
        let mut next = self.params.clone();
        next.gain_period = period;
        self.apply(next)
    }

    pub fn set_market_period(&mut self, period: MarketWindow) -> Result<(), FinstreamError> {
        let mut next = self.params.clone();
        next.market_period = period;
        self.apply(next)
    }

    pub fn set_stock_view(
        &mut self,
        ticker: Option<&str>,
        period: Option<HistoryWindow>,
    ) -> Result<(), FinstreamError> {
        let mut next = self.params.clone();
        if let Some(ticker) = ticker {
            next.stock_ticker = ticker.trim().to_uppercase();
        }
        if let Some(period) = period {
            next.stock_period = period;
        }
        self.apply(next)
    }

    fn apply(&mut self, next: Parameters) -> Result<(), FinstreamError> {
        if next == self.params {
            return Ok(());
        }
        validate_parameters(&next)?;
        self.store.save(&next)?;
        tracing::info!("parameters saved");
        self.params = next;
        Ok(())
    }
}
