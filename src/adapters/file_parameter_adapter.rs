//! INI file parameter store.
//!
//! Layout:
//!
//! ```ini
//! [symbols]
//! portfolio = SPY, QQQ
//! market = NQ=F, ES=F, YM=F, KRW=X
//! benchmark = SPY
//!
//! [thresholds]
//! rsi_low = 30
//! rsi_high = 70
//! cci_low = -100
//! cci_high = 100
//!
//! [views]
//! market_period = 6H
//! gain_period = 1M
//! stock_period = 1M
//! stock_ticker = SPY
//! ```
//!
//! Every key is required. A missing file means first run; anything else
//! that cannot be read back into [`Parameters`] is an error.

use crate::domain::error::FinstreamError;
use crate::domain::params::{
    format_symbol_list, parse_symbol_list, Parameters, SECTION_SYMBOLS, SECTION_THRESHOLDS,
    SECTION_VIEWS,
};
use crate::domain::screening::Thresholds;
use crate::ports::parameter_port::ParameterPort;
use configparser::ini::Ini;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct FileParameterAdapter {
    path: PathBuf,
}

impl FileParameterAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses an INI document; `origin` names it in error messages.
    pub fn from_string(content: &str, origin: &str) -> Result<Parameters, FinstreamError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| FinstreamError::ConfigParse {
                file: origin.to_string(),
                reason,
            })?;

        let thresholds = Thresholds {
            rsi_low: get_float(&config, SECTION_THRESHOLDS, "rsi_low")?,
            rsi_high: get_float(&config, SECTION_THRESHOLDS, "rsi_high")?,
            cci_low: get_float(&config, SECTION_THRESHOLDS, "cci_low")?,
            cci_high: get_float(&config, SECTION_THRESHOLDS, "cci_high")?,
        };

        Ok(Parameters {
            portfolio: get_symbols(&config, "portfolio")?,
            market: get_symbols(&config, "market")?,
            benchmark: get_symbols(&config, "benchmark")?,
            thresholds,
            market_period: get_parsed(&config, SECTION_VIEWS, "market_period")?,
            gain_period: get_parsed(&config, SECTION_VIEWS, "gain_period")?,
            stock_period: get_parsed(&config, SECTION_VIEWS, "stock_period")?,
            stock_ticker: get_required(&config, SECTION_VIEWS, "stock_ticker")?
                .trim()
                .to_uppercase(),
        })
    }

    pub fn to_ini_string(params: &Parameters) -> String {
        let mut config = Ini::new();
        let t = &params.thresholds;
        let entries: [(&str, &str, String); 11] = [
            (SECTION_SYMBOLS, "portfolio", format_symbol_list(&params.portfolio)),
            (SECTION_SYMBOLS, "market", format_symbol_list(&params.market)),
            (SECTION_SYMBOLS, "benchmark", format_symbol_list(&params.benchmark)),
            (SECTION_THRESHOLDS, "rsi_low", t.rsi_low.to_string()),
            (SECTION_THRESHOLDS, "rsi_high", t.rsi_high.to_string()),
            (SECTION_THRESHOLDS, "cci_low", t.cci_low.to_string()),
            (SECTION_THRESHOLDS, "cci_high", t.cci_high.to_string()),
            (SECTION_VIEWS, "market_period", params.market_period.to_string()),
            (SECTION_VIEWS, "gain_period", params.gain_period.to_string()),
            (SECTION_VIEWS, "stock_period", params.stock_period.to_string()),
            (SECTION_VIEWS, "stock_ticker", params.stock_ticker.clone()),
        ];
        for (section, key, value) in entries {
            config.set(section, key, Some(value));
        }
        config.writes()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn get_required(config: &Ini, section: &str, key: &str) -> Result<String, FinstreamError> {
    config
        .get(section, key)
        .ok_or_else(|| FinstreamError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn get_float(config: &Ini, section: &str, key: &str) -> Result<f64, FinstreamError> {
    match config.getfloat(section, key) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(FinstreamError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
        Err(reason) => Err(FinstreamError::invalid(section, key, reason)),
    }
}

fn get_symbols(config: &Ini, key: &str) -> Result<Vec<String>, FinstreamError> {
    let raw = get_required(config, SECTION_SYMBOLS, key)?;
    parse_symbol_list(&raw).map_err(|e| FinstreamError::invalid(SECTION_SYMBOLS, key, e.to_string()))
}

fn get_parsed<T>(config: &Ini, section: &str, key: &str) -> Result<T, FinstreamError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_required(config, section, key)?
        .parse()
        .map_err(|e: T::Err| FinstreamError::invalid(section, key, e.to_string()))
}

impl ParameterPort for FileParameterAdapter {
    fn read(&self) -> Result<Option<Parameters>, FinstreamError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "parameter file not found");
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Self::from_string(&content, &self.path.display().to_string()).map(Some)
    }

    fn write(&self, params: &Parameters) -> Result<(), FinstreamError> {
        let tmp = self.temp_path();
        fs::write(&tmp, Self::to_ini_string(params))?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "parameters written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::params::{HistoryWindow, MarketWindow};
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[symbols]
portfolio = aapl, MSFT NVDA
market = NQ=F, KRW=X
benchmark = SPY, QQQ

[thresholds]
rsi_low = 25
rsi_high = 75.5
cci_low = -150
cci_high = 150

[views]
market_period = 1D
gain_period = 3M
stock_period = 1Y
stock_ticker = msft
"#;

    #[test]
    fn parses_every_key() {
        let params = FileParameterAdapter::from_string(SAMPLE, "sample").unwrap();

        assert_eq!(params.portfolio, vec!["AAPL", "MSFT", "NVDA"]);
        assert_eq!(params.market, vec!["NQ=F", "KRW=X"]);
        assert_eq!(params.benchmark, vec!["SPY", "QQQ"]);
        assert_eq!(params.thresholds.rsi_high, 75.5);
        assert_eq!(params.thresholds.cci_low, -150.0);
        assert_eq!(params.market_period, MarketWindow::OneDay);
        assert_eq!(params.gain_period, HistoryWindow::ThreeMonths);
        assert_eq!(params.stock_period, HistoryWindow::OneYear);
        assert_eq!(params.stock_ticker, "MSFT");
    }

    #[test]
    fn missing_key_is_fatal() {
        let content = SAMPLE.replace("gain_period = 3M\n", "");
        let err = FileParameterAdapter::from_string(&content, "sample").unwrap_err();
        assert!(matches!(
            err,
            FinstreamError::ConfigMissing { ref key, .. } if key == "gain_period"
        ));
    }

    #[test]
    fn bad_values_are_fatal() {
        let content = SAMPLE.replace("rsi_low = 25", "rsi_low = low");
        assert!(matches!(
            FileParameterAdapter::from_string(&content, "sample"),
            Err(FinstreamError::ConfigInvalid { ref key, .. }) if key == "rsi_low"
        ));

        let content = SAMPLE.replace("market_period = 1D", "market_period = 2W");
        assert!(matches!(
            FileParameterAdapter::from_string(&content, "sample"),
            Err(FinstreamError::ConfigInvalid { ref key, .. }) if key == "market_period"
        ));

        let content = SAMPLE.replace("benchmark = SPY, QQQ", "benchmark = SPY, SPY");
        assert!(matches!(
            FileParameterAdapter::from_string(&content, "sample"),
            Err(FinstreamError::ConfigInvalid { ref key, .. }) if key == "benchmark"
        ));
    }

    #[test]
    fn ini_string_round_trips() {
        let params = FileParameterAdapter::from_string(SAMPLE, "sample").unwrap();
        let text = FileParameterAdapter::to_ini_string(&params);
        assert_eq!(FileParameterAdapter::from_string(&text, "written").unwrap(), params);
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let adapter = FileParameterAdapter::new(dir.path().join("param.ini"));
        assert_eq!(adapter.read().unwrap(), None);
    }

    #[test]
    fn load_writes_defaults_on_first_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("param.ini");
        let adapter = FileParameterAdapter::new(&path);

        let params = adapter.load().unwrap();
        assert_eq!(params, Parameters::default());
        assert!(path.exists());
        assert!(!adapter.temp_path().exists());
        assert_eq!(adapter.read().unwrap(), Some(Parameters::default()));
    }

    #[test]
    fn save_replaces_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("param.ini");
        fs::write(&path, SAMPLE).unwrap();
        let adapter = FileParameterAdapter::new(&path);

        let mut params = adapter.load().unwrap();
        params.portfolio = vec!["TSLA".to_string()];
        params.stock_ticker = "TSLA".to_string();
        adapter.save(&params).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("AAPL"));
        assert_eq!(adapter.load().unwrap(), params);
    }

    #[test]
    fn malformed_file_is_not_defaulted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("param.ini");
        fs::write(&path, "[symbols]\nportfolio = SPY\n").unwrap();
        let adapter = FileParameterAdapter::new(&path);

        assert!(adapter.load().is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[symbols]\nportfolio = SPY\n");
    }
}
