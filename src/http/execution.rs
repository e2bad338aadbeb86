use futures_util::StreamExt;
use reqwest::{Client, Request};

use crate::error::DispatchError;

/// Executes a request and reads the whole body so the connection can be
/// reused. Returns the status code.
pub(super) async fn execute_request(
    client: &Client,
    request: Request,
) -> Result<u16, reqwest::Error> {
    let response = client.execute(request).await?;
    let status = response.status().as_u16();
    drain_response_body(response).await?;
    Ok(status)
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

pub(super) fn classify_error(err: &reqwest::Error) -> DispatchError {
    if err.is_timeout() {
        DispatchError::Timeout
    } else if err.is_connect() {
        DispatchError::Connect {
            message: err.to_string(),
        }
    } else if err.is_builder() {
        DispatchError::BuildRequest {
            message: err.to_string(),
        }
    } else {
        DispatchError::Transport {
            message: err.to_string(),
        }
    }
}

pub(super) const fn check_status(status: u16, expected: u16) -> Result<u16, DispatchError> {
    if status == expected {
        Ok(status)
    } else {
        Err(DispatchError::UnexpectedStatus { status, expected })
    }
}
