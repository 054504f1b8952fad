//! Configuration constants, the database selector, and client options.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Identification engine endpoint returning XML results.
pub const BOLD_IDS_URL: &str = "https://v4.boldsystems.org/index.php/Ids_xml";

/// User agent string identifying this client.
pub const USER_AGENT: &str = concat!("bold-identify/", env!("CARGO_PKG_VERSION"));

/// Media type the identification engine must declare.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// BOLD identification database selector.
///
/// Unknown values are kept in [`Database::Other`] and forwarded unchanged;
/// the remote service decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Database {
    /// Every COI barcode record on BOLD with a minimum sequence length of 500bp.
    #[default]
    Cox1,
    /// Every COI barcode record with a species level identification.
    Cox1Species,
    /// All published COI records from BOLD and GenBank with species level
    /// identifications.
    Cox1SpeciesPublic,
    /// Barcode records with a minimum length of 640bp.
    Cox1L604bp,
    /// Any other selector string.
    Other(String),
}

impl Database {
    /// The selectors the identification engine documents.
    pub const KNOWN: [Database; 4] = [
        Database::Cox1,
        Database::Cox1Species,
        Database::Cox1SpeciesPublic,
        Database::Cox1L604bp,
    ];

    /// Get the value sent as the `db` query parameter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cox1 => "COX1",
            Self::Cox1Species => "COX1_SPECIES",
            Self::Cox1SpeciesPublic => "COX1_SPECIES_PUBLIC",
            Self::Cox1L604bp => "COX1_L604bp",
            Self::Other(value) => value,
        }
    }

    /// Whether this is one of the documented selectors.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl FromStr for Database {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "COX1" => Self::Cox1,
            "COX1_SPECIES" => Self::Cox1Species,
            "COX1_SPECIES_PUBLIC" => Self::Cox1SpeciesPublic,
            "COX1_L604bp" => Self::Cox1L604bp,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for Database {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(db) => db,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for the identification client.
///
/// Everything except `raw_response` is handed to the HTTP layer.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Whole-request timeout. `None` waits as long as the engine needs;
    /// searches of long sequences against the full COX1 library can take
    /// minutes.
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub proxy: Option<String>,
    /// Log connection-level reads and writes at TRACE level.
    pub verbose: bool,
    /// Return the validated response without parsing it.
    pub raw_response: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientOptions {
    /// Create an options builder with the defaults filled in.
    pub fn builder() -> ClientOptionsBuilder {
        ClientOptionsBuilder {
            base_url: BOLD_IDS_URL.into(),
            timeout: None,
            user_agent: USER_AGENT.into(),
            proxy: None,
            verbose: false,
            raw_response: false,
        }
    }
}

/// Builder for [`ClientOptions`].
pub struct ClientOptionsBuilder {
    base_url: String,
    timeout: Option<Duration>,
    user_agent: String,
    proxy: Option<String>,
    verbose: bool,
    raw_response: bool,
}

impl ClientOptionsBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(timeout_secs));
        self
    }

    /// Set or clear the request timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn raw_response(mut self, raw_response: bool) -> Self {
        self.raw_response = raw_response;
        self
    }

    pub fn build(self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url,
            timeout: self.timeout,
            user_agent: self.user_agent,
            proxy: self.proxy,
            verbose: self.verbose,
            raw_response: self.raw_response,
        }
    }
}
