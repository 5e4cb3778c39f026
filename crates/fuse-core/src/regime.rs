//! Deterministic macro-regime scoring.
//!
//! Pure derivation from a snapshot of macro indicators to a 0–100 regime
//! score with a factor breakdown and strategy guidance. Fetching the
//! indicators is the caller's concern; this module never touches the
//! network.

use crate::quote::pct_change;
use serde::{Deserialize, Serialize};

/// Direction of federal-funds-rate movement across recent releases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateTrend {
    /// Policy rate moving up
    Rising,
    /// Policy rate moving down
    Falling,
    /// No meaningful movement
    Stable,
}

impl RateTrend {
    /// Classify the trend from the latest rate and the rate two releases
    /// back. Movement within ±0.1 points is treated as stable.
    #[must_use]
    pub fn from_rates(current: f64, previous: f64) -> Self {
        if current > previous + 0.1 {
            Self::Rising
        } else if current < previous - 0.1 {
            Self::Falling
        } else {
            Self::Stable
        }
    }
}

impl std::fmt::Display for RateTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rising => write!(f, "Rising"),
            Self::Falling => write!(f, "Falling"),
            Self::Stable => write!(f, "Stable"),
        }
    }
}

/// Macro indicator snapshot feeding the regime score
#[derive(Debug, Clone, PartialEq)]
pub struct MacroIndicators {
    /// Latest federal funds rate, percent
    pub fed_funds_rate: f64,
    /// Rate-movement classification
    pub rate_trend: RateTrend,
    /// 10Y minus 2Y treasury spread, percentage points
    pub yield_spread: f64,
    /// Year-over-year CPI change, percent
    pub cpi_yoy: f64,
    /// Unemployment rate, percent
    pub unemployment: f64,
    /// CBOE volatility index level
    pub vix: f64,
}

impl MacroIndicators {
    /// Year-over-year CPI change from two index levels, zero-guarded
    #[must_use]
    pub fn cpi_yoy_from_levels(current: f64, year_ago: f64) -> f64 {
        pct_change(current, year_ago)
    }
}

/// One scored factor in the regime breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeFactor {
    /// Factor name
    #[serde(rename = "n")]
    pub name: String,
    /// Rendered indicator value
    #[serde(rename = "v")]
    pub value: String,
    /// Stance: bullish, neutral, caution, or bearish
    #[serde(rename = "s")]
    pub stance: String,
    /// One-line interpretation
    pub note: String,
}

/// Full regime assessment returned by the macro endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeAssessment {
    /// Regime name
    pub regime: String,
    /// Short display label
    pub label: String,
    /// Display color hint
    pub color: String,
    /// One-paragraph summary
    pub summary: String,
    /// Composite score, 0–100
    pub score: u32,
    /// Scored factor breakdown
    pub factors: Vec<RegimeFactor>,
    /// Rate environment, rendered
    pub rate_env: String,
    /// Inflation environment, rendered
    pub inflation_env: String,
    /// VIX level, rendered
    pub vix_level: String,
    /// Yield-curve state, rendered
    pub yield_curve: String,
    /// Unemployment rate, rendered
    pub unemployment: String,
    /// Coarse risk-appetite bucket
    pub risk_appetite: String,
    /// Strategies favored in this regime
    pub favor_strategies: Vec<String>,
    /// Strategies to avoid in this regime
    pub avoid_strategies: Vec<String>,
    /// Factor notes flattened for display
    pub drivers: Vec<String>,
}

/// Score the indicator snapshot into a regime assessment.
///
/// Weights: VIX 0–30, yield curve 0–25, CPI 0–25, Fed policy 0–20.
#[must_use]
pub fn assess(ind: &MacroIndicators) -> RegimeAssessment {
    let mut score = 0u32;
    let mut factors = Vec::with_capacity(4);

    // VIX
    let vix = ind.vix;
    let (points, stance, note) = if vix < 15.0 {
        (30, "bullish", "Low volatility, risk appetite high")
    } else if vix < 20.0 {
        (20, "neutral", "Normal volatility, stable conditions")
    } else if vix < 28.0 {
        (8, "caution", "Elevated volatility, reduce size")
    } else {
        (0, "bearish", "High volatility, risk-off conditions")
    };
    score += points;
    factors.push(factor("VIX", format!("{vix:.1}"), stance, note));

    // Yield curve 10Y-2Y
    let spread = ind.yield_spread;
    let (points, stance, note) = if spread > 0.5 {
        (25, "bullish", "Normal curve, expansion expected")
    } else if spread > 0.0 {
        (14, "neutral", "Flat curve, growth slowing")
    } else {
        (0, "bearish", "Inverted curve, recession risk elevated")
    };
    score += points;
    let spread_value = if spread > 0.5 {
        format!("+{spread:.2}%")
    } else {
        format!("{spread:.2}%")
    };
    factors.push(factor("10Y-2Y Spread", spread_value, stance, note));

    // CPI year-over-year
    let cpi = ind.cpi_yoy;
    let (points, stance, note) = if cpi < 2.5 {
        (25, "bullish", "Inflation controlled, Fed has flexibility")
    } else if cpi < 3.5 {
        (16, "neutral", "Inflation moderating, watch trend")
    } else if cpi < 5.0 {
        (6, "caution", "Above target, Fed likely hawkish")
    } else {
        (0, "bearish", "High inflation, aggressive tightening risk")
    };
    score += points;
    factors.push(factor("CPI YoY", format!("{cpi:.1}%"), stance, note));

    // Fed policy
    let rate = ind.fed_funds_rate;
    let (points, stance, note) = match ind.rate_trend {
        RateTrend::Falling => (20, "bullish", "Fed cutting, accommodative conditions"),
        RateTrend::Stable => (12, "neutral", "Fed on hold, data-dependent"),
        RateTrend::Rising => (0, "bearish", "Fed hiking, tightening financial conditions"),
    };
    score += points;
    factors.push(factor("Fed Policy", format!("{rate:.2}%"), stance, note));

    let (regime, label, color, summary, favor, avoid) = regime_band(score);

    let vix_bucket = if vix < 15.0 {
        "Low"
    } else if vix < 20.0 {
        "Normal"
    } else if vix < 28.0 {
        "Elevated"
    } else {
        "High"
    };

    let risk_appetite = if score >= 75 {
        "High"
    } else if score >= 55 {
        "Moderate"
    } else if score >= 35 {
        "Low"
    } else {
        "Very Low"
    };

    let drivers = factors
        .iter()
        .map(|f| format!("{}: {}", f.name, f.note))
        .collect();

    RegimeAssessment {
        regime: regime.to_string(),
        label: label.to_string(),
        color: color.to_string(),
        summary: summary.to_string(),
        score,
        factors,
        rate_env: format!("{rate:.2}% ({})", ind.rate_trend),
        inflation_env: format!("{cpi:.1}% YoY"),
        vix_level: format!("{vix:.1} ({vix_bucket})"),
        yield_curve: format!(
            "{}{spread:.2}% ({})",
            if spread >= 0.0 { "+" } else { "" },
            if spread >= 0.0 { "Normal" } else { "Inverted" }
        ),
        unemployment: format!("{:.1}%", ind.unemployment),
        risk_appetite: risk_appetite.to_string(),
        favor_strategies: favor.iter().map(ToString::to_string).collect(),
        avoid_strategies: avoid.iter().map(ToString::to_string).collect(),
        drivers,
    }
}

fn factor(name: &str, value: String, stance: &str, note: &str) -> RegimeFactor {
    RegimeFactor {
        name: name.to_string(),
        value,
        stance: stance.to_string(),
        note: note.to_string(),
    }
}

type Band = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
);

fn regime_band(score: u32) -> Band {
    if score >= 82 {
        (
            "Risk-On Growth",
            "RISK-ON",
            "green",
            "Strong bullish macro: low volatility, healthy yield curve, inflation controlled, Fed accommodative.",
            &[
                "Long calls on growth stocks",
                "Bull call spreads",
                "Momentum longs",
                "Tech and discretionary",
            ],
            &[
                "Long volatility plays",
                "Defensive-only positioning",
                "Short duration bonds",
            ],
        )
    } else if score >= 62 {
        (
            "Cautious Bullish",
            "NEUTRAL+",
            "green",
            "Generally positive conditions with some headwinds. Selective bullish positioning appropriate.",
            &[
                "Defined risk spreads",
                "Quality value stocks",
                "Covered calls for income",
            ],
            &["Naked short puts on high beta", "Max leverage positions"],
        )
    } else if score >= 42 {
        (
            "Mixed / Transitional",
            "NEUTRAL",
            "yellow",
            "Conflicting macro signals. Reduce size, favor hedged positions, avoid large directional bets.",
            &["Iron condors", "Calendar spreads", "Cash-heavy positioning"],
            &["Large directional bets", "Short volatility", "High leverage"],
        )
    } else if score >= 20 {
        (
            "Risk-Off / Defensive",
            "RISK-OFF",
            "red",
            "Bearish macro environment. Capital preservation priority. Multiple warning signals active.",
            &[
                "Long puts as portfolio hedges",
                "Defensive sectors",
                "Short duration bonds",
                "Cash",
            ],
            &[
                "Long calls on growth",
                "Short volatility strategies",
                "Momentum longs",
            ],
        )
    } else {
        (
            "Bear / Recession Risk",
            "BEARISH",
            "red",
            "Maximum macro stress. Recession indicators flashing. Extreme caution, minimal exposure.",
            &[
                "Long VIX calls",
                "Put spreads on indices",
                "Gold",
                "Maximum cash",
            ],
            &[
                "Long equity exposure",
                "Any short volatility",
                "Cyclical sectors",
            ],
        )
    }
}
