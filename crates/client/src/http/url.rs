//! Feed endpoint normalization.

/// Error type for feed URL normalization failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("empty feed URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("feed URL has no host")]
    MissingHost,

    #[error("invalid feed URL: {0}")]
    InvalidUrl(String),
}

/// Normalize a user-supplied feed endpoint.
///
/// Input is trimmed and a bare host gets `https://`. Only http and https are
/// accepted. The fragment is dropped since it never reaches the server; the
/// query string is kept as given.
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let candidate = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = url::Url::parse(&candidate).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    parsed.set_fragment(None);

    Ok(parsed)
}
