use std::time::Duration;

use reqwest::{
    Client, Method,
    header::{HeaderName, HeaderValue},
    redirect,
};

use crate::args::{DEFAULT_USER_AGENT, HttpMethod, LoadArgs};
use crate::error::HttpError;

use super::template::has_placeholder;

const DEFAULT_REDIRECT_LIMIT: usize = 10;

/// Transport settings shared by every virtual user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub expected_status: u16,
    pub no_ua: bool,
    pub redirect_limit: usize,
}

impl HttpSettings {
    #[must_use]
    pub const fn from_args(args: &LoadArgs) -> Self {
        Self {
            timeout: args.timeout,
            connect_timeout: args.connect_timeout,
            expected_status: args.status,
            no_ua: args.no_ua,
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
        }
    }
}

/// Builds the client all dispatches share.
///
/// # Errors
///
/// Returns [`HttpError::BuildClientFailed`] when reqwest rejects the
/// configuration (for example, no TLS backend).
pub fn build_client(settings: &HttpSettings) -> Result<Client, HttpError> {
    let mut client_builder = Client::builder()
        .timeout(settings.timeout)
        .connect_timeout(settings.connect_timeout);

    if !settings.no_ua {
        client_builder = client_builder.user_agent(DEFAULT_USER_AGENT);
    }

    if settings.redirect_limit == 0 {
        client_builder = client_builder.redirect(redirect::Policy::none());
    } else {
        client_builder = client_builder.redirect(redirect::Policy::limited(settings.redirect_limit));
    }

    client_builder
        .build()
        .map_err(|err| HttpError::BuildClientFailed { source: err })
}

/// Checks header names, and values that carry no placeholders, before the
/// run starts. Templated values are checked again after each render.
///
/// # Errors
///
/// Returns an [`HttpError`] naming the first invalid header.
pub fn validate_headers(headers: &[(String, String)]) -> Result<(), HttpError> {
    for (key, value) in headers {
        HeaderName::from_bytes(key.as_bytes()).map_err(|err| HttpError::InvalidHeaderName {
            header: key.clone(),
            source: err,
        })?;
        if has_placeholder(value) {
            continue;
        }
        HeaderValue::from_str(value).map_err(|err| HttpError::InvalidHeaderValue {
            header: key.clone(),
            source: err,
        })?;
    }
    Ok(())
}
