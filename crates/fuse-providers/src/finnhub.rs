//! Finnhub research provider.
//!
//! Backs the research endpoint: the `signals` report fans out eight
//! concurrent sub-calls against Finnhub for one ticker and shapes them into
//! a single document. Shaping is pure and separately testable.

use crate::transport::{excerpt, read_body, request_failure};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use fuse_core::{GatewayError, ProviderFailure, ProviderResult};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Finnhub provider configuration
#[derive(Debug, Clone)]
pub struct FinnhubConfig {
    /// API key; `None` leaves the provider unconfigured
    pub api_key: Option<SecretString>,
    /// API base URL, overridable for tests
    pub base_url: String,
    /// Per-sub-call deadline
    pub timeout: Duration,
}

impl FinnhubConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self {
            api_key,
            base_url: "https://finnhub.io/api/v1".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-sub-call deadline
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Finnhub API client
pub struct FinnhubClient {
    config: FinnhubConfig,
    client: Client,
}

impl FinnhubClient {
    /// Create the client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: FinnhubConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Whether an API key is available
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> ProviderResult<T> {
        let Some(api_key) = &self.config.api_key else {
            return Err(ProviderFailure::upstream(None, "no credential configured"));
        };

        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("token", api_key.expose_secret().as_str())])
            .send()
            .await
            .map_err(|e| request_failure(e, self.config.timeout))?;

        let (status, body) = read_body(response).await?;
        if !status.is_success() {
            return Err(ProviderFailure::upstream(
                Some(status.as_u16().to_string()),
                excerpt(&body),
            ));
        }
        serde_json::from_str(&body).map_err(|e| ProviderFailure::parse(format!("invalid JSON: {e}")))
    }

    /// Build the full signals report for one ticker.
    ///
    /// Eight sub-calls run concurrently; any sub-call failure fails the
    /// report (the document is meaningless with holes in it).
    pub async fn signals(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> ProviderResult<SignalsReport> {
        let sym = symbol.to_uppercase();
        let from = (now - ChronoDuration::days(30)).format("%Y-%m-%d").to_string();
        let to = now.format("%Y-%m-%d").to_string();

        debug!(provider = "finnhub", symbol = %sym, "building signals report");

        let sym_q = [("symbol", sym.as_str())];
        let news_q = [("symbol", sym.as_str()), ("from", from.as_str()), ("to", to.as_str())];
        let surprise_q = [("symbol", sym.as_str()), ("limit", "4")];
        let (profile, quote, recs, targets, news, earnings, surprises, insider) = tokio::join!(
            self.get::<CompanyProfile>("/stock/profile2", &sym_q),
            self.get::<FinnhubQuote>("/quote", &sym_q),
            self.get::<Vec<Recommendation>>("/stock/recommendation", &sym_q),
            self.get::<PriceTarget>("/stock/price-target", &sym_q),
            self.get::<Vec<NewsItem>>("/company-news", &news_q),
            self.get::<EarningsCalendar>("/calendar/earnings", &sym_q),
            self.get::<Vec<Surprise>>("/stock/earnings", &surprise_q),
            self.get::<InsiderTransactions>("/stock/insider-transactions", &sym_q),
        );

        Ok(shape_signals(
            &sym, now, &profile?, &quote?, &recs?, &targets?, &news?, &earnings?, &surprises?,
            &insider?,
        ))
    }

    /// Analyst price targets plus the latest recommendation split
    pub async fn targets(&self, symbol: &str) -> ProviderResult<TargetsReport> {
        let sym = symbol.to_uppercase();
        let sym_q = [("symbol", sym.as_str())];
        let (targets, recs, quote) = tokio::join!(
            self.get::<PriceTarget>("/stock/price-target", &sym_q),
            self.get::<Vec<Recommendation>>("/stock/recommendation", &sym_q),
            self.get::<FinnhubQuote>("/quote", &sym_q),
        );
        Ok(TargetsReport {
            targets: targets?,
            rec: recs?.into_iter().next(),
            price: quote?.c,
        })
    }

    /// Earnings surprise history plus the upcoming calendar
    pub async fn earnings(&self, symbol: &str) -> ProviderResult<EarningsReport> {
        let sym = symbol.to_uppercase();
        let surprise_q = [("symbol", sym.as_str()), ("limit", "8")];
        let cal_q = [("symbol", sym.as_str())];
        let (surprises, calendar) = tokio::join!(
            self.get::<Vec<Surprise>>("/stock/earnings", &surprise_q),
            self.get::<EarningsCalendar>("/calendar/earnings", &cal_q),
        );
        Ok(EarningsReport {
            surprises: surprises?,
            calendar: calendar?,
        })
    }
}

// Finnhub payload models

/// Company profile subset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Company name
    #[serde(default)]
    pub name: String,
    /// Industry classification
    #[serde(default, rename = "finnhubIndustry")]
    pub finnhub_industry: String,
}

/// Real-time quote subset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinnhubQuote {
    /// Current price
    #[serde(default)]
    pub c: f64,
    /// Absolute change
    #[serde(default)]
    pub d: Option<f64>,
    /// Percent change
    #[serde(default)]
    pub dp: Option<f64>,
}

/// One month's analyst recommendation split
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendation {
    /// Buy count
    #[serde(default)]
    pub buy: i64,
    /// Hold count
    #[serde(default)]
    pub hold: i64,
    /// Sell count
    #[serde(default)]
    pub sell: i64,
    /// Strong-buy count
    #[serde(default, rename = "strongBuy")]
    pub strong_buy: i64,
    /// Strong-sell count
    #[serde(default, rename = "strongSell")]
    pub strong_sell: i64,
    /// Reporting period
    #[serde(default)]
    pub period: String,
}

/// Analyst price-target aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceTarget {
    /// Mean target
    #[serde(default, rename = "targetMean")]
    pub target_mean: Option<f64>,
    /// High target
    #[serde(default, rename = "targetHigh")]
    pub target_high: Option<f64>,
    /// Low target
    #[serde(default, rename = "targetLow")]
    pub target_low: Option<f64>,
}

/// One company news item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline text
    #[serde(default)]
    pub headline: String,
    /// Publishing source
    #[serde(default)]
    pub source: String,
    /// Publication time, unix seconds
    #[serde(default)]
    pub datetime: i64,
    /// Sentiment score when supplied
    #[serde(default)]
    pub sentiment: Option<f64>,
    /// Article URL
    #[serde(default)]
    pub url: String,
}

/// Upcoming earnings calendar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EarningsCalendar {
    /// Scheduled events, soonest first
    #[serde(default, rename = "earningsCalendar")]
    pub earnings_calendar: Vec<EarningsEvent>,
}

/// One scheduled earnings event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EarningsEvent {
    /// Event date, YYYY-MM-DD
    #[serde(default)]
    pub date: String,
}

/// One historical earnings surprise
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Surprise {
    /// Reporting period
    #[serde(default)]
    pub period: String,
    /// Absolute surprise
    #[serde(default)]
    pub surprise: Option<f64>,
    /// Surprise percentage
    #[serde(default, rename = "surprisePercent")]
    pub surprise_percent: Option<f64>,
    /// Actual EPS
    #[serde(default)]
    pub actual: Option<f64>,
    /// Estimated EPS
    #[serde(default)]
    pub estimate: Option<f64>,
}

/// Insider transaction listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsiderTransactions {
    /// Transactions, newest first
    #[serde(default)]
    pub data: Vec<InsiderTx>,
}

/// One insider transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsiderTx {
    /// Insider name
    #[serde(default)]
    pub name: String,
    /// Transaction code (P = purchase, S = sale)
    #[serde(default, rename = "transactionType")]
    pub transaction_type: String,
    /// Share count
    #[serde(default)]
    pub share: f64,
    /// Transaction value
    #[serde(default)]
    pub value: Option<f64>,
    /// Transaction date
    #[serde(default, rename = "transactionDate")]
    pub transaction_date: String,
}

// Shaped reports

/// Full per-ticker signals document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalsReport {
    /// Ticker symbol
    pub ticker: String,
    /// Company name
    pub company: String,
    /// Industry classification
    pub industry: String,
    /// Current price
    pub price: f64,
    /// Absolute change
    pub change: f64,
    /// Percent change
    pub pct: f64,
    /// Composite sentiment score, capped at 95
    pub score: u32,
    /// Bullish / Neutral / Bearish
    pub direction: String,
    /// Bullish analyst percentage
    pub bull: i64,
    /// Neutral analyst percentage
    pub neut: i64,
    /// Bearish analyst percentage
    pub bear: i64,
    /// Days until the next earnings event, when in the future
    pub earnings_days: Option<i64>,
    /// Next earnings date
    pub next_earnings_date: Option<String>,
    /// Mean analyst price target, rounded
    #[serde(rename = "analystPT")]
    pub analyst_pt: Option<i64>,
    /// High target, rounded
    pub pt_high: Option<i64>,
    /// Low target, rounded
    pub pt_low: Option<i64>,
    /// Upside to the mean target, percent with one decimal
    pub pt_upside: Option<String>,
    /// Total analysts in the latest split
    pub total_analysts: i64,
    /// Buy + strong-buy count
    pub rec_buy: i64,
    /// Hold count
    pub rec_hold: i64,
    /// Sell + strong-sell count
    pub rec_sell: i64,
    /// Recent headlines with coarse sentiment
    pub headlines: Vec<Headline>,
    /// Recent surprise history
    pub hist_moves: Vec<HistMove>,
    /// Mean absolute surprise percentage, one decimal
    pub avg_surprise_pct: Option<String>,
    /// Insider purchase count in the recent window
    pub insider_buys: usize,
    /// Insider sale count in the recent window
    pub insider_sells: usize,
    /// Bullish / Neutral / Bearish insider read
    pub insider_signal: String,
    /// Most recent insider transactions
    pub insider_tx: Vec<InsiderSummary>,
}

/// One shaped headline
#[derive(Debug, Clone, Serialize)]
pub struct Headline {
    /// Headline text
    pub text: String,
    /// Publishing source
    pub source: String,
    /// Relative age ("3h ago")
    pub time: String,
    /// bullish / neutral / bearish
    pub sentiment: String,
    /// Article URL
    pub url: String,
}

/// One shaped surprise entry
#[derive(Debug, Clone, Serialize)]
pub struct HistMove {
    /// Reporting period
    pub quarter: String,
    /// Absolute surprise
    pub surprise: f64,
    /// Surprise percentage
    #[serde(rename = "surprisePct")]
    pub surprise_pct: f64,
    /// Actual EPS
    pub actual: f64,
    /// Estimated EPS
    pub estimate: f64,
}

/// One shaped insider transaction
#[derive(Debug, Clone, Serialize)]
pub struct InsiderSummary {
    /// Insider name, "Unknown" when absent
    pub name: String,
    /// Transaction code
    #[serde(rename = "type")]
    pub kind: String,
    /// Share count
    pub shares: f64,
    /// Transaction value
    pub value: f64,
    /// Transaction date
    pub date: String,
}

/// Price-target report
#[derive(Debug, Clone, Serialize)]
pub struct TargetsReport {
    /// Raw target aggregate
    pub targets: PriceTarget,
    /// Latest recommendation split, when available
    pub rec: Option<Recommendation>,
    /// Current price
    pub price: f64,
}

/// Earnings report
#[derive(Debug, Clone, Serialize)]
pub struct EarningsReport {
    /// Surprise history
    pub surprises: Vec<Surprise>,
    /// Upcoming calendar
    pub calendar: EarningsCalendar,
}

/// Relative age of a unix timestamp
fn time_ago(unix_seconds: i64, now: DateTime<Utc>) -> String {
    let diff = (now.timestamp() - unix_seconds).max(0);
    let hours = diff / 3600;
    let days = diff / 86_400;
    if hours < 1 {
        "just now".to_string()
    } else if hours < 24 {
        format!("{hours}h ago")
    } else {
        format!("{days}d ago")
    }
}

fn sentiment_bucket(score: f64) -> &'static str {
    if score > 0.1 {
        "bullish"
    } else if score < -0.1 {
        "bearish"
    } else {
        "neutral"
    }
}

/// Treat zero-valued targets as absent, the way the upstream reports them
fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

#[allow(clippy::too_many_arguments)]
fn shape_signals(
    sym: &str,
    now: DateTime<Utc>,
    profile: &CompanyProfile,
    quote: &FinnhubQuote,
    recs: &[Recommendation],
    targets: &PriceTarget,
    news: &[NewsItem],
    earnings: &EarningsCalendar,
    surprises: &[Surprise],
    insider: &InsiderTransactions,
) -> SignalsReport {
    let latest_rec = recs.first();
    let total = latest_rec
        .map(|r| r.buy + r.strong_buy + r.hold + r.sell + r.strong_sell)
        .unwrap_or(1)
        .max(1);
    let bull = latest_rec
        .map(|r| ((r.buy + r.strong_buy) as f64 / total as f64 * 100.0).round() as i64)
        .unwrap_or(50);
    let bear = latest_rec
        .map(|r| ((r.sell + r.strong_sell) as f64 / total as f64 * 100.0).round() as i64)
        .unwrap_or(20);
    let neut = (100 - bull - bear).max(0);
    let score = ((bull as f64).mul_add(0.65, neut as f64 * 0.25).round() as u32).min(95);
    let direction = if score >= 60 {
        "Bullish"
    } else if score >= 40 {
        "Neutral"
    } else {
        "Bearish"
    };

    let price = quote.c;
    let pt_mean = non_zero(targets.target_mean);
    let pt_upside = match pt_mean {
        Some(mean) if price > 0.0 => Some(format!("{:.1}", (mean - price) / price * 100.0)),
        _ => None,
    };

    let headlines = news
        .iter()
        .take(5)
        .map(|n| Headline {
            text: n.headline.clone(),
            source: n.source.clone(),
            time: time_ago(n.datetime, now),
            sentiment: sentiment_bucket(n.sentiment.unwrap_or(0.0)).to_string(),
            url: n.url.clone(),
        })
        .collect();

    let next_earnings = earnings.earnings_calendar.first();
    let earnings_days = next_earnings
        .and_then(|e| NaiveDate::parse_from_str(&e.date, "%Y-%m-%d").ok())
        .map(|date| (date - now.date_naive()).num_days())
        .filter(|days| *days > 0);

    let hist_moves: Vec<HistMove> = surprises
        .iter()
        .take(4)
        .map(|s| HistMove {
            quarter: s.period.clone(),
            surprise: s.surprise.unwrap_or(0.0),
            surprise_pct: s.surprise_percent.unwrap_or(0.0),
            actual: s.actual.unwrap_or(0.0),
            estimate: s.estimate.unwrap_or(0.0),
        })
        .collect();
    let avg_surprise_pct = if hist_moves.is_empty() {
        None
    } else {
        let mean = hist_moves.iter().map(|m| m.surprise_pct.abs()).sum::<f64>()
            / hist_moves.len() as f64;
        Some(format!("{mean:.1}"))
    };

    let insider_data: Vec<&InsiderTx> = insider.data.iter().take(10).collect();
    let insider_buys = insider_data
        .iter()
        .filter(|t| t.transaction_type.contains('P'))
        .count();
    let insider_sells = insider_data
        .iter()
        .filter(|t| t.transaction_type.contains('S'))
        .count();
    let insider_signal = if insider_buys > insider_sells {
        "Bullish"
    } else if insider_buys < insider_sells {
        "Bearish"
    } else {
        "Neutral"
    };
    let insider_tx = insider_data
        .iter()
        .take(4)
        .map(|t| InsiderSummary {
            name: if t.name.is_empty() {
                "Unknown".to_string()
            } else {
                t.name.clone()
            },
            kind: t.transaction_type.clone(),
            shares: t.share,
            value: t.value.unwrap_or(0.0),
            date: t.transaction_date.clone(),
        })
        .collect();

    SignalsReport {
        ticker: sym.to_string(),
        company: if profile.name.is_empty() {
            sym.to_string()
        } else {
            profile.name.clone()
        },
        industry: profile.finnhub_industry.clone(),
        price,
        change: quote.d.unwrap_or(0.0),
        pct: quote.dp.unwrap_or(0.0),
        score,
        direction: direction.to_string(),
        bull,
        neut,
        bear,
        earnings_days,
        next_earnings_date: next_earnings.map(|e| e.date.clone()),
        analyst_pt: pt_mean.map(|v| v.round() as i64),
        pt_high: non_zero(targets.target_high).map(|v| v.round() as i64),
        pt_low: non_zero(targets.target_low).map(|v| v.round() as i64),
        pt_upside,
        total_analysts: total,
        rec_buy: latest_rec.map(|r| r.buy + r.strong_buy).unwrap_or(0),
        rec_hold: latest_rec.map(|r| r.hold).unwrap_or(0),
        rec_sell: latest_rec.map(|r| r.sell + r.strong_sell).unwrap_or(0),
        headlines,
        hist_moves,
        avg_surprise_pct,
        insider_buys,
        insider_sells,
        insider_signal: insider_signal.to_string(),
        insider_tx,
    }
}
