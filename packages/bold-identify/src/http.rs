//! HTTP client wrapper for the BOLD identification engine.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::{ClientOptions, XML_CONTENT_TYPE};
use crate::error::{IdentifyError, Result};
use crate::types::{Query, RawResponse};

/// Create a configured HTTP client.
///
/// # Arguments
/// * `options` - Timeout, user agent, proxy and logging settings
///
/// # Returns
/// A `reqwest::blocking::Client` built from the options.
pub fn create_client(options: &ClientOptions) -> Result<Client> {
    // The blocking client defaults to 30 s; `None` here removes the limit.
    let mut builder = Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .connection_verbose(options.verbose);

    if let Some(proxy) = &options.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
    }

    Ok(builder.build()?)
}

/// Send one identification request and validate the response.
///
/// No retries are attempted: transport errors, non-success statuses and
/// non-XML responses are returned to the caller immediately.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `base_url` - Identification endpoint
/// * `query` - Sequence and database selector
///
/// # Returns
/// The response body and headers of interest
pub fn fetch(client: &Client, base_url: &str, query: &Query) -> Result<RawResponse> {
    tracing::debug!(
        sequence_len = query.sequence.len(),
        db = %query.db,
        "Sending identification request"
    );

    let response = client.get(request_url(base_url, query)?).send()?;

    let status = response.status();
    let url = response.url().to_string();
    if !status.is_success() {
        return Err(IdentifyError::Status {
            status: status.as_u16(),
            url,
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    if !is_xml_content_type(content_type.as_deref()) {
        return Err(IdentifyError::ContentType {
            found: content_type,
        });
    }

    let body = response.text()?;
    tracing::debug!(status = %status, bytes = body.len(), "Received identification response");

    Ok(RawResponse {
        status: status.as_u16(),
        url,
        content_type,
        body,
    })
}

/// Build the request URL for a query.
///
/// # Examples
/// ```
/// use bold_identify::config::Database;
/// use bold_identify::http::request_url;
/// use bold_identify::types::Query;
///
/// let url = request_url("https://example.org/Ids_xml", &Query::new("ACGT", Database::Cox1)).unwrap();
/// assert_eq!(url.as_str(), "https://example.org/Ids_xml?sequence=ACGT&db=COX1");
/// ```
pub fn request_url(base_url: &str, query: &Query) -> Result<Url> {
    Ok(Url::parse_with_params(base_url, query.params())?)
}

/// Check whether a `Content-Type` header value declares `text/xml`.
///
/// Parameters such as `charset` are ignored.
///
/// # Examples
/// ```
/// use bold_identify::http::is_xml_content_type;
///
/// assert!(is_xml_content_type(Some("text/xml")));
/// assert!(is_xml_content_type(Some("text/xml; charset=UTF-8")));
/// assert!(!is_xml_content_type(Some("text/html")));
/// assert!(!is_xml_content_type(None));
/// ```
pub fn is_xml_content_type(value: Option<&str>) -> bool {
    value
        .and_then(|v| v.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(XML_CONTENT_TYPE))
}
