//! Application state: executors and clients built once from the
//! configuration snapshot.

use fuse_config::GatewayConfig;
use fuse_core::{CompletionBackend, GatewayError, QuoteSource};
use fuse_providers::{
    AlpacaConfig, AlpacaSource, AnthropicBackend, AnthropicConfig, FearGreedClient,
    FearGreedConfig, FinnhubClient, FinnhubConfig, FredClient, FredConfig, GoogleBackend,
    GoogleConfig, OpenAiBackend, OpenAiConfig, YahooConfig, YahooSource,
};
use fuse_resilience::{FallbackChain, QuoteFanOut};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration snapshot
    pub config: Arc<GatewayConfig>,
    /// Completion fallback chain (priority order)
    pub completions: Arc<FallbackChain>,
    /// Quote fan-out (precedence order)
    pub quotes: Arc<QuoteFanOut>,
    /// Finnhub research client
    pub finnhub: Arc<FinnhubClient>,
    /// FRED macro client
    pub fred: Arc<FredClient>,
    /// Fear & Greed client
    pub feargreed: Arc<FearGreedClient>,
}

impl AppState {
    /// Start building state from a configuration snapshot
    #[must_use]
    pub fn builder(config: GatewayConfig) -> AppStateBuilder {
        AppStateBuilder::new(config)
    }

    /// Build state with every provider at its default endpoint.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be created.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        Self::builder(config).build()
    }
}

/// Builder allowing per-provider configuration overrides (tests point the
/// adapters at mock servers this way)
pub struct AppStateBuilder {
    config: GatewayConfig,
    anthropic: Option<AnthropicConfig>,
    openai: Option<OpenAiConfig>,
    google: Option<GoogleConfig>,
    alpaca: Option<AlpacaConfig>,
    yahoo: Option<YahooConfig>,
    finnhub: Option<FinnhubConfig>,
    fred: Option<FredConfig>,
    feargreed: Option<FearGreedConfig>,
}

impl AppStateBuilder {
    /// Create a builder from a configuration snapshot
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            anthropic: None,
            openai: None,
            google: None,
            alpaca: None,
            yahoo: None,
            finnhub: None,
            fred: None,
            feargreed: None,
        }
    }

    /// Override the Anthropic backend configuration
    #[must_use]
    pub fn anthropic(mut self, config: AnthropicConfig) -> Self {
        self.anthropic = Some(config);
        self
    }

    /// Override the OpenAI backend configuration
    #[must_use]
    pub fn openai(mut self, config: OpenAiConfig) -> Self {
        self.openai = Some(config);
        self
    }

    /// Override the Google backend configuration
    #[must_use]
    pub fn google(mut self, config: GoogleConfig) -> Self {
        self.google = Some(config);
        self
    }

    /// Override the Alpaca source configuration
    #[must_use]
    pub fn alpaca(mut self, config: AlpacaConfig) -> Self {
        self.alpaca = Some(config);
        self
    }

    /// Override the Yahoo source configuration
    #[must_use]
    pub fn yahoo(mut self, config: YahooConfig) -> Self {
        self.yahoo = Some(config);
        self
    }

    /// Override the Finnhub client configuration
    #[must_use]
    pub fn finnhub(mut self, config: FinnhubConfig) -> Self {
        self.finnhub = Some(config);
        self
    }

    /// Override the FRED client configuration
    #[must_use]
    pub fn fred(mut self, config: FredConfig) -> Self {
        self.fred = Some(config);
        self
    }

    /// Override the Fear & Greed client configuration
    #[must_use]
    pub fn feargreed(mut self, config: FearGreedConfig) -> Self {
        self.feargreed = Some(config);
        self
    }

    /// Build the application state.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be created.
    pub fn build(self) -> Result<AppState, GatewayError> {
        let credentials = &self.config.credentials;
        let timeouts = &self.config.timeouts;

        let anthropic = self.anthropic.unwrap_or_else(|| {
            AnthropicConfig::new(credentials.anthropic.clone()).with_timeout(timeouts.completion)
        });
        let openai = self.openai.unwrap_or_else(|| {
            OpenAiConfig::new(credentials.openai.clone()).with_timeout(timeouts.completion)
        });
        let google = self.google.unwrap_or_else(|| {
            GoogleConfig::new(credentials.google.clone()).with_timeout(timeouts.completion)
        });

        // Chain priority: Anthropic, then OpenAI, then Google
        let backends: Vec<Arc<dyn CompletionBackend>> = vec![
            Arc::new(AnthropicBackend::new(anthropic)?),
            Arc::new(OpenAiBackend::new(openai)?),
            Arc::new(GoogleBackend::new(google)?),
        ];
        let completions = FallbackChain::new(backends);

        let alpaca = self.alpaca.unwrap_or_else(|| {
            AlpacaConfig::new(
                credentials.alpaca_key.clone(),
                credentials.alpaca_secret.clone(),
            )
            .with_timeout(timeouts.quote)
        });
        let yahoo = self
            .yahoo
            .unwrap_or_else(|| YahooConfig::new().with_timeout(timeouts.quote));

        // Merge precedence: Alpaca's real-time feed ahead of Yahoo
        let sources: Vec<Arc<dyn QuoteSource>> = vec![
            Arc::new(AlpacaSource::new(alpaca)?),
            Arc::new(YahooSource::new(yahoo)?),
        ];
        let quotes = QuoteFanOut::new(sources);

        let finnhub = self.finnhub.unwrap_or_else(|| {
            FinnhubConfig::new(credentials.finnhub.clone()).with_timeout(timeouts.research)
        });
        let fred = self.fred.unwrap_or_else(|| {
            FredConfig::new(credentials.fred.clone()).with_timeout(timeouts.research)
        });
        let feargreed = self
            .feargreed
            .unwrap_or_else(|| FearGreedConfig::new().with_timeout(timeouts.research));

        Ok(AppState {
            config: Arc::new(self.config),
            completions: Arc::new(completions),
            quotes: Arc::new(quotes),
            finnhub: Arc::new(FinnhubClient::new(finnhub)?),
            fred: Arc::new(FredClient::new(fred)?),
            feargreed: Arc::new(FearGreedClient::new(feargreed)?),
        })
    }
}
