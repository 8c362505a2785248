use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::{PagerDutyError, Result};
use crate::types::{Event, EventResponse};

/// PagerDuty Events API v2 enqueue endpoint
pub const DEFAULT_EVENTS_URL: &str = "https://events.pagerduty.com/v2/enqueue";

/// Client for submitting events to the PagerDuty Events API v2
///
/// Each [`submit`](Self::submit) performs exactly one POST. Nothing is
/// retried, queued or cached.
///
/// # Example
///
/// ```rust,no_run
/// use pagerduty_events::{Event, PagerDutyClient, Payload, Severity};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PagerDutyClient::new(Duration::from_secs(10))?;
///
///     let event = Event::trigger(
///         "R0UT1NGK3Y",
///         Payload::new("Queue backlog above 10k", "worker-3", Severity::Warning),
///     );
///
///     let ack = client.submit(event).await?;
///     println!("incident dedup key: {}", ack.dedup_key);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct PagerDutyClient {
    client: ClientWithMiddleware,
    endpoint: Url,
}

impl PagerDutyClient {
    /// Create a new client targeting the public PagerDuty endpoint
    ///
    /// # Arguments
    ///
    /// * `timeout` - Request timeout duration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PagerDutyError::BuildHttpClient)?;

        let client = ClientBuilder::new(client).build();

        Ok(Self {
            client,
            endpoint: default_endpoint(),
        })
    }

    /// Create a new client with a custom reqwest middleware client
    ///
    /// This allows you to add custom middleware (logging, TLS settings, etc.)
    /// and point the client at a different endpoint.
    pub fn with_client(client: ClientWithMiddleware, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Send events to a different endpoint
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Submit a trigger, acknowledge or resolve event
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The event cannot be serialized (no request is sent)
    /// - The HTTP request fails or times out
    /// - PagerDuty responds with any status other than `202 Accepted`
    /// - The `202` response body is not a JSON object
    #[instrument(
        name = "PagerDutyClient::submit",
        skip_all,
        fields(event_action = %event.event_action)
    )]
    pub async fn submit(&self, event: Event) -> Result<EventResponse> {
        let body = serde_json::to_vec(&event).map_err(PagerDutyError::Serialize)?;

        debug!(url = %self.endpoint, "Submitting event to PagerDuty");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(PagerDutyError::Request)?;

        let status = response.status();

        if status != StatusCode::ACCEPTED {
            // An unreadable body still yields the status
            let message = response.text().await.ok();
            return Err(PagerDutyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| PagerDutyError::Request(err.into()))?;

        // Fields are optional, but the body has to be an object
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_slice(&bytes).map_err(PagerDutyError::Decode)?;
        let ack: EventResponse = serde_json::from_value(serde_json::Value::Object(object))
            .map_err(PagerDutyError::Decode)?;

        debug!(dedup_key = %ack.dedup_key, "Event accepted");
        Ok(ack)
    }

    /// Get the events endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_EVENTS_URL).expect("Valid default endpoint")
}
