//! # PagerDuty Events
//!
//! A Rust client library for the [PagerDuty Events API v2](https://developer.pagerduty.com/docs/events-api-v2/overview/).
//!
//! ## Features
//!
//! - Trigger, acknowledge and resolve incidents with a single HTTP call
//! - Builder pattern for constructing events and payloads
//! - Unset optional fields are left out of the request body
//! - Arbitrary JSON custom details passed through unchanged
//!
//! The client never retries. Use [`PagerDutyError::is_retryable`] to decide
//! whether to submit again.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pagerduty_events::{Event, Image, Link, PagerDutyClient, Payload, Severity};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PagerDutyClient::new(Duration::from_secs(10))?;
//!
//!     let payload = Payload::new("Memory usage above 90%", "api-1.prod", Severity::Critical)
//!         .with_component("api")
//!         .with_custom_details(serde_json::json!({ "used_mb": 7400, "limit_mb": 8192 }));
//!
//!     let event = Event::trigger("R0UT1NGK3Y", payload)
//!         .with_link(Link::new("https://grafana.example.com/d/api", "Dashboard"))
//!         .with_image(Image::new("https://grafana.example.com/render/mem.png"));
//!
//!     let ack = client.submit(event).await?;
//!
//!     client.submit(Event::resolve("R0UT1NGK3Y", &ack.dedup_key)).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod errors;
mod types;

pub use client::{PagerDutyClient, DEFAULT_EVENTS_URL};
pub use errors::{PagerDutyError, Result};
pub use types::{Action, Event, EventResponse, Image, Link, Payload, Severity};
