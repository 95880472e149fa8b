//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvMarketDataAdapter;
use crate::adapters::file_parameter_adapter::FileParameterAdapter;
use crate::adapters::html_report::HtmlRenderer;
use crate::adapters::terminal_renderer::TerminalRenderer;
use crate::domain::charts::StockChartOptions;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::FinstreamError;
use crate::domain::params::{
    format_symbol_list, validate_parameters, HistoryWindow, MarketWindow, DEFAULT_PARAMS_PATH,
};
use crate::domain::screening::Thresholds;
use crate::ports::parameter_port::ParameterPort;
use crate::ports::render_port::RenderPort;

#[derive(Parser, Debug)]
#[command(name = "finstream", about = "Market snapshot, screening and gain dashboard")]
pub struct Cli {
    /// Parameter file (created with defaults when missing)
    #[arg(long, global = true, default_value = DEFAULT_PARAMS_PATH)]
    pub params: PathBuf,
    /// Directory holding history CSVs and quotes.csv
    #[arg(long, global = true, default_value = "data")]
    pub data: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Snapshot table, gain chart and screening tables for the portfolio
    Portfolio {
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Price and indicator charts for one portfolio symbol
    Stock {
        #[arg(short, long)]
        ticker: Option<String>,
        #[arg(short, long)]
        period: Option<HistoryWindow>,
        #[arg(long)]
        bollinger: bool,
        #[arg(long)]
        ma20: bool,
        #[arg(long)]
        ma60: bool,
        #[arg(long)]
        ma120: bool,
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Intraday charts for the market symbols
    Market {
        #[arg(short, long)]
        period: Option<MarketWindow>,
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Accumulated gain of the benchmarks and the portfolio
    Gain {
        #[arg(short, long)]
        period: Option<HistoryWindow>,
    },
    /// Replace the portfolio symbol list
    SetPortfolio {
        #[arg(required = true)]
        tickers: Vec<String>,
    },
    /// Change screening thresholds; omitted values are kept
    SetThresholds {
        #[arg(long, allow_negative_numbers = true)]
        rsi_low: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        rsi_high: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        cci_low: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        cci_high: Option<f64>,
    },
    /// Print the stored parameters
    Params,
    /// Check the parameter file without changing it
    Validate,
}

pub fn run(cli: Cli) -> ExitCode {
    let provider = CsvMarketDataAdapter::new(cli.data.clone());
    let store = FileParameterAdapter::new(cli.params.clone());

    let result = match cli.command {
        Command::Portfolio { html } => open(&provider, &store)
            .and_then(|mut d| with_renderer(html, "Portfolio", |r| run_portfolio(&mut d, r))),
        Command::Stock {
            ticker,
            period,
            bollinger,
            ma20,
            ma60,
            ma120,
            html,
        } => {
            let options = StockChartOptions {
                bollinger,
                ma20,
                ma60,
                ma120,
            };
            open(&provider, &store).and_then(|mut d| {
                if ticker.is_some() || period.is_some() {
                    d.set_stock_view(ticker.as_deref(), period)?;
                }
                let title = format!("{} ({})", d.params().stock_ticker, d.params().stock_period);
                with_renderer(html, &title, |r| run_stock(&mut d, options, r))
            })
        }
        Command::Market { period, html } => open(&provider, &store).and_then(|mut d| {
            if let Some(period) = period {
                d.set_market_period(period)?;
            }
            with_renderer(html, "Market", |r| run_market(&mut d, r))
        }),
        Command::Gain { period } => open(&provider, &store).and_then(|mut d| {
            if let Some(period) = period {
                d.set_gain_period(period)?;
            }
            with_renderer(None, "Gain", |r| r.render_chart(&d.gain_chart()?))
        }),
        Command::SetPortfolio { tickers } => run_set_portfolio(&provider, &store, &tickers),
        Command::SetThresholds {
            rsi_low,
            rsi_high,
            cci_low,
            cci_high,
        } => open(&provider, &store).and_then(|mut d| {
            let current = d.params().thresholds;
            let next = Thresholds {
                rsi_low: rsi_low.unwrap_or(current.rsi_low),
                rsi_high: rsi_high.unwrap_or(current.rsi_high),
                cci_low: cci_low.unwrap_or(current.cci_low),
                cci_high: cci_high.unwrap_or(current.cci_high),
            };
            d.set_thresholds(next)?;
            eprintln!(
                "Thresholds: {} / {}",
                next.oversold_caption(),
                next.overbought_caption()
            );
            Ok(())
        }),
        Command::Params => store.load().map(|params| println!("{}", params)),
        Command::Validate => run_validate(&store),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn open<'a>(
    provider: &'a CsvMarketDataAdapter,
    store: &'a FileParameterAdapter,
) -> Result<Dashboard<'a>, FinstreamError> {
    eprintln!("Loading parameters from {}", store.path().display());
    Dashboard::open(provider, store)
}

/// Runs `body` against an HTML renderer when `html` is given, else stdout,
/// then finishes the renderer.
fn with_renderer(
    html: Option<PathBuf>,
    title: &str,
    body: impl FnOnce(&mut dyn RenderPort) -> Result<(), FinstreamError>,
) -> Result<(), FinstreamError> {
    match html {
        Some(path) => {
            let mut renderer = HtmlRenderer::new(&path, title);
            body(&mut renderer)?;
            renderer.finish()?;
            eprintln!("Wrote {}", path.display());
            Ok(())
        }
        None => {
            let mut renderer = TerminalRenderer::new(io::stdout().lock());
            body(&mut renderer)?;
            renderer.finish()
        }
    }
}

pub fn run_portfolio(dashboard: &mut Dashboard<'_>, renderer: &mut dyn RenderPort) -> Result<(), FinstreamError> {
    let table = dashboard.snapshot_table()?;
    renderer.render_table("Snapshot", &table.sorted_by_rsi())?;
    for outcome in table.degraded() {
        let reasons: Vec<String> = outcome.failures().iter().map(|f| f.to_string()).collect();
        renderer.render_note(&format!("{}: {}", outcome.record().symbol, reasons.join("; ")))?;
    }

    match dashboard.gain_chart() {
        Ok(chart) => renderer.render_chart(&chart)?,
        Err(e) => {
            tracing::warn!(error = %e, "gain chart unavailable");
            renderer.render_note(&format!("Accumulated Gain (%): {e}"))?;
        }
    }

    let screening = dashboard.screening(&table);
    let thresholds = dashboard.params().thresholds;
    renderer.render_table(
        &format!("Oversold ({})", thresholds.oversold_caption()),
        &screening.oversold_by_rsi(),
    )?;
    renderer.render_table(
        &format!("Overbought ({})", thresholds.overbought_caption()),
        &screening.overbought_by_rsi(),
    )?;
    Ok(())
}

pub fn run_stock(
    dashboard: &mut Dashboard<'_>,
    options: StockChartOptions,
    renderer: &mut dyn RenderPort,
) -> Result<(), FinstreamError> {
    for chart in dashboard.stock_charts(options)? {
        renderer.render_chart(&chart)?;
    }
    Ok(())
}

pub fn run_market(dashboard: &mut Dashboard<'_>, renderer: &mut dyn RenderPort) -> Result<(), FinstreamError> {
    for chart in dashboard.market_charts()? {
        renderer.render_chart(&chart)?;
    }
    Ok(())
}

fn run_set_portfolio(
    provider: &CsvMarketDataAdapter,
    store: &FileParameterAdapter,
    tickers: &[String],
) -> Result<(), FinstreamError> {
    let mut dashboard = open(provider, store)?;
    if dashboard.set_portfolio(&tickers.join(" "))? {
        eprintln!(
            "Portfolio: {} (stock ticker {})",
            format_symbol_list(&dashboard.params().portfolio),
            dashboard.params().stock_ticker
        );
    } else {
        eprintln!("Portfolio unchanged");
    }
    Ok(())
}

fn run_validate(store: &FileParameterAdapter) -> Result<(), FinstreamError> {
    match store.read()? {
        Some(params) => {
            validate_parameters(&params)?;
            eprintln!("{} is valid", store.path().display());
        }
        None => eprintln!(
            "{} not found; defaults will be written on first use",
            store.path().display()
        ),
    }
    Ok(())
}
