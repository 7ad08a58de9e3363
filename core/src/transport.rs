//! `Transport` implementation backed by ureq.

use ureq::Agent;

use crate::config::ClientConfig;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Blocking HTTPS transport built on a shared `ureq::Agent`.
///
/// The agent pools connections and is cheap to clone, so one transport can
/// serve concurrent callers.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    user_agent: String,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        // Status codes are interpreted by the client from the JSON envelope,
        // so ureq must hand 4xx/5xx back as responses.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = match request.method {
            HttpMethod::Get => {
                let mut builder = self
                    .agent
                    .get(&request.url)
                    .header("user-agent", &self.user_agent);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.call()?
            }
            HttpMethod::Post => {
                let mut builder = self
                    .agent
                    .post(&request.url)
                    .header("user-agent", &self.user_agent);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes())?,
                    None => builder.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
