use async_trait::async_trait;
use reqwest::{
    Client, Method, Request,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use tracing::debug;

use crate::engine::{DispatchContext, DispatchResult, Dispatcher, RequestTarget};
use crate::error::DispatchError;

use super::execution::{check_status, classify_error, execute_request};
use super::template::{TemplateVars, has_placeholder, render_template};

/// Sends each attempt through a shared reqwest client and maps the response
/// onto a [`DispatchResult`].
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
    expected_status: u16,
}

impl HttpDispatcher {
    #[must_use]
    pub const fn new(client: Client, expected_status: u16) -> Self {
        Self {
            client,
            expected_status,
        }
    }

    /// Renders placeholders and assembles the request for one attempt.
    fn build_request(
        &self,
        target: &RequestTarget,
        context: DispatchContext,
    ) -> Result<Request, DispatchError> {
        let vars = TemplateVars {
            user: context.user_id,
            iteration: context.iteration,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        };
        let mut rng = rand::thread_rng();
        let mut render = |value: &str| {
            if has_placeholder(value) {
                render_template(value, &vars, &mut rng)
            } else {
                value.to_owned()
            }
        };

        let url = render(&target.url);
        let mut headers = HeaderMap::with_capacity(target.headers.len());
        for (key, value) in &target.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
                DispatchError::BuildRequest {
                    message: format!("header '{}': {}", key, err),
                }
            })?;
            let value = HeaderValue::from_str(&render(value)).map_err(|err| {
                DispatchError::BuildRequest {
                    message: format!("header '{}': {}", key, err),
                }
            })?;
            headers.append(name, value);
        }

        let mut builder = self
            .client
            .request(Method::from(target.method), url)
            .headers(headers);
        if !target.body.is_empty() {
            builder = builder.body(render(&target.body));
        }
        builder.build().map_err(|err| DispatchError::BuildRequest {
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn send(&self, target: &RequestTarget, context: DispatchContext) -> DispatchResult {
        let request = self.build_request(target, context)?;
        match execute_request(&self.client, request).await {
            Ok(status) => check_status(status, self.expected_status),
            Err(err) => {
                debug!(
                    user = context.user_id,
                    iteration = context.iteration,
                    "Request failed: {}",
                    err
                );
                Err(classify_error(&err))
            }
        }
    }
}
