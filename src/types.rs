use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Effect of an event on the incident it belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Trigger,
    Acknowledge,
    Resolve,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Trigger => write!(f, "trigger"),
            Action::Acknowledge => write!(f, "acknowledge"),
            Action::Resolve => write!(f, "resolve"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "trigger" => Ok(Action::Trigger),
            "acknowledge" => Ok(Action::Acknowledge),
            "resolve" => Ok(Action::Resolve),
            other => Err(format!("unknown event action: {other}")),
        }
    }
}

/// Perceived severity of the condition a trigger event describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().unwrap_or_default().is_empty()
}

/// Link shown alongside the incident
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

impl Link {
    pub fn new(href: &str, text: &str) -> Self {
        Self {
            href: href.to_string(),
            text: text.to_string(),
        }
    }
}

/// Image shown alongside the incident, optionally clickable
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub src: String,

    #[serde(default, skip_serializing_if = "is_blank")]
    pub href: Option<String>,

    #[serde(default, skip_serializing_if = "is_blank")]
    pub alt: Option<String>,
}

impl Image {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
            href: None,
            alt: None,
        }
    }

    /// Make the image a link
    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    /// Set alternative text
    pub fn with_alt(mut self, alt: &str) -> Self {
        self.alt = Some(alt.to_string());
        self
    }
}

/// Descriptive body of a trigger event
///
/// # Example
///
/// ```rust
/// use pagerduty_events::{Payload, Severity};
///
/// let payload = Payload::new("Disk almost full on db-1", "db-1.prod", Severity::Warning)
///     .with_component("postgres")
///     .with_group("storage")
///     .with_custom_details(serde_json::json!({ "free_bytes": 1024 }));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payload {
    /// Short human-readable description, used as the incident title
    pub summary: String,

    /// Unique location of the affected system, usually a hostname
    pub source: String,

    pub severity: Severity,

    /// When the condition was detected, sent as ISO-8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Part of the source that is responsible for the event
    #[serde(default, skip_serializing_if = "is_blank")]
    pub component: Option<String>,

    /// Logical grouping of components
    #[serde(default, skip_serializing_if = "is_blank")]
    pub group: Option<String>,

    /// Class or type of the event
    #[serde(default, skip_serializing_if = "is_blank")]
    pub class: Option<String>,

    /// Arbitrary caller data, passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_details: Option<serde_json::Value>,
}

impl Payload {
    pub fn new(summary: &str, source: &str, severity: Severity) -> Self {
        Self {
            summary: summary.to_string(),
            source: source.to_string(),
            severity,
            timestamp: None,
            component: None,
            group: None,
            class: None,
            custom_details: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_component(mut self, component: &str) -> Self {
        self.component = Some(component.to_string());
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    /// Attach free-form structured data
    ///
    /// Any JSON shape is accepted and sent unchanged.
    pub fn with_custom_details(mut self, details: serde_json::Value) -> Self {
        self.custom_details = Some(details);
        self
    }
}

/// PagerDuty Events API v2 event
///
/// Events sharing a dedup key belong to the same incident. Trigger events may
/// leave it unset, in which case PagerDuty generates one and returns it in the
/// [`EventResponse`]. Acknowledge and resolve events must carry it.
///
/// The event is not validated locally; PagerDuty rejects malformed events.
///
/// See: <https://developer.pagerduty.com/docs/events-api-v2/trigger-events/>
///
/// # Example
///
/// ```rust
/// use pagerduty_events::{Event, Link, Payload, Severity};
///
/// let event = Event::trigger(
///     "R0UT1NGK3Y",
///     Payload::new("API latency above 2s", "api-1.prod", Severity::Critical),
/// )
/// .with_dedup_key("api-latency")
/// .with_link(Link::new("https://grafana.example.com/d/api", "Dashboard"))
/// .with_client("monitoring")
/// .with_client_url("https://monitoring.example.com");
///
/// let resolve = Event::resolve("R0UT1NGK3Y", "api-latency");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Integration key of the receiving service
    pub routing_key: String,

    pub event_action: Action,

    #[serde(default, skip_serializing_if = "is_blank")]
    pub dedup_key: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    /// Name of the monitoring client that sent the event
    #[serde(default, skip_serializing_if = "is_blank")]
    pub client: Option<String>,

    /// Link back to the monitoring client
    #[serde(default, skip_serializing_if = "is_blank")]
    pub client_url: Option<String>,

    /// Only meaningful for trigger events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl Event {
    /// Create an event with only the routing key and action set
    pub fn new(routing_key: &str, event_action: Action) -> Self {
        Self {
            routing_key: routing_key.to_string(),
            event_action,
            dedup_key: None,
            images: Vec::new(),
            links: Vec::new(),
            client: None,
            client_url: None,
            payload: None,
        }
    }

    /// Open (or re-trigger) an incident
    pub fn trigger(routing_key: &str, payload: Payload) -> Self {
        Self::new(routing_key, Action::Trigger).with_payload(payload)
    }

    /// Acknowledge the incident identified by `dedup_key`
    pub fn acknowledge(routing_key: &str, dedup_key: &str) -> Self {
        Self::new(routing_key, Action::Acknowledge).with_dedup_key(dedup_key)
    }

    /// Resolve the incident identified by `dedup_key`
    pub fn resolve(routing_key: &str, dedup_key: &str) -> Self {
        Self::new(routing_key, Action::Resolve).with_dedup_key(dedup_key)
    }

    pub fn with_dedup_key(mut self, dedup_key: &str) -> Self {
        self.dedup_key = Some(dedup_key.to_string());
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }

    /// Attribute the event to a monitoring client
    pub fn with_client(mut self, name: &str) -> Self {
        self.client = Some(name.to_string());
        self
    }

    /// Link back to the monitoring client
    pub fn with_client_url(mut self, url: &str) -> Self {
        self.client_url = Some(url.to_string());
        self
    }
}

/// Acknowledgment returned by PagerDuty for an accepted event
///
/// Only the shape is checked: any field may be missing, and an action the
/// crate does not know decodes as `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventResponse {
    #[serde(default)]
    pub routing_key: String,

    /// Incident key, generated by PagerDuty when the event carried none
    #[serde(default)]
    pub dedup_key: String,

    #[serde(
        default,
        deserialize_with = "lenient_action",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_action: Option<Action>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn lenient_action<'de, D>(deserializer: D) -> std::result::Result<Option<Action>, D::Error>
where
    D: Deserializer<'de>,
{
    let action = Option::<String>::deserialize(deserializer)?;
    Ok(action.and_then(|action| action.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn full_event() -> Event {
        let payload = Payload::new("Disk full", "db-1.prod", Severity::Error)
            .with_timestamp(Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap())
            .with_component("postgres")
            .with_group("storage")
            .with_class("disk")
            .with_custom_details(json!({
                "free_bytes": 0,
                "mounts": ["/", "/var"],
                "nested": { "ok": false, "ratio": 0.99, "none": null }
            }));

        Event::trigger("R0UT1NG", payload)
            .with_dedup_key("disk-db-1")
            .with_link(Link::new("https://grafana.example.com", "Grafana"))
            .with_image(
                Image::new("https://img.example.com/chart.png")
                    .with_href("https://grafana.example.com/chart")
                    .with_alt("Disk usage"),
            )
            .with_client("monitor")
            .with_client_url("https://monitor.example.com")
    }

    #[test]
    fn test_full_event_round_trip() {
        let event = full_event();

        let json = serde_json::to_string(&event).unwrap();
        let decoded: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, event);
    }

    #[test]
    fn test_full_event_wire_format() {
        let value = serde_json::to_value(full_event()).unwrap();

        assert_eq!(value["routing_key"], "R0UT1NG");
        assert_eq!(value["event_action"], "trigger");
        assert_eq!(value["dedup_key"], "disk-db-1");
        assert_eq!(value["client"], "monitor");
        assert_eq!(value["client_url"], "https://monitor.example.com");
        assert_eq!(value["links"][0]["href"], "https://grafana.example.com");
        assert_eq!(value["links"][0]["text"], "Grafana");
        assert_eq!(value["images"][0]["alt"], "Disk usage");

        let payload = &value["payload"];
        assert_eq!(payload["summary"], "Disk full");
        assert_eq!(payload["source"], "db-1.prod");
        assert_eq!(payload["severity"], "error");
        assert_eq!(payload["timestamp"], "2026-10-16T08:30:00Z");
        assert_eq!(payload["class"], "disk");
        assert_eq!(payload["custom_details"]["mounts"], json!(["/", "/var"]));
        assert_eq!(payload["custom_details"]["nested"]["none"], Value::Null);
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let value = serde_json::to_value(Event::new("R0UT1NG", Action::Trigger)).unwrap();

        let object = value.as_object().unwrap();
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["event_action", "routing_key"]);
    }

    #[test]
    fn test_empty_strings_are_omitted() {
        let mut event = Event::new("R0UT1NG", Action::Trigger)
            .with_dedup_key("")
            .with_client("")
            .with_client_url("")
            .with_image(Image::new("https://img.example.com/a.png").with_alt(""));
        event.payload = Some(Payload::new("s", "src", Severity::Info).with_component(""));

        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("dedup_key").is_none());
        assert!(value.get("client").is_none());
        assert!(value.get("client_url").is_none());
        assert!(value.get("links").is_none());
        assert!(value["images"][0].get("alt").is_none());
        assert!(value["images"][0].get("href").is_none());

        let payload = value["payload"].as_object().unwrap();
        assert_eq!(payload.len(), 3);
        assert!(!payload.contains_key("component"));
        assert!(!payload.contains_key("custom_details"));
    }

    #[test]
    fn test_resolve_event() {
        let event = Event::resolve("R0UT1NG", "disk-db-1");
        let json = serde_json::to_string(&event).unwrap();

        assert_eq!(
            json,
            r#"{"routing_key":"R0UT1NG","event_action":"resolve","dedup_key":"disk-db-1"}"#
        );
    }

    #[test]
    fn test_acknowledge_event() {
        let event = Event::acknowledge("R0UT1NG", "disk-db-1");
        assert_eq!(event.event_action, Action::Acknowledge);
        assert_eq!(event.dedup_key.as_deref(), Some("disk-db-1"));
        assert!(event.payload.is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::Trigger.to_string(), "trigger");
        assert_eq!(Action::Acknowledge.to_string(), "acknowledge");
        assert_eq!(Action::Resolve.to_string(), "resolve");
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Info.to_string(), "info");
    }

    #[test]
    fn test_response_decoding() {
        let response: EventResponse = serde_json::from_str(
            r#"{"routing_key":"R","dedup_key":"D","event_action":"acknowledge"}"#,
        )
        .unwrap();

        assert_eq!(response.routing_key, "R");
        assert_eq!(response.dedup_key, "D");
        assert_eq!(response.event_action, Some(Action::Acknowledge));
    }

    #[test]
    fn test_response_decoding_is_lenient() {
        let response: EventResponse = serde_json::from_str(
            r#"{"status":"success","message":"Event processed","dedup_key":"D"}"#,
        )
        .unwrap();

        assert_eq!(response.routing_key, "");
        assert_eq!(response.dedup_key, "D");
        assert_eq!(response.event_action, None);
        assert_eq!(response.status.as_deref(), Some("success"));
        assert_eq!(response.message.as_deref(), Some("Event processed"));

        let response: EventResponse = serde_json::from_str(r#"{"event_action":"escalate"}"#).unwrap();
        assert_eq!(response.event_action, None);

        let response: EventResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, EventResponse::default());
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("trigger".parse::<Action>(), Ok(Action::Trigger));
        assert_eq!("acknowledge".parse::<Action>(), Ok(Action::Acknowledge));
        assert_eq!("resolve".parse::<Action>(), Ok(Action::Resolve));
        assert!("Trigger".parse::<Action>().is_err());
    }

    #[test]
    fn test_client_name_without_url() {
        let value = serde_json::to_value(Event::resolve("R", "D").with_client("monitor")).unwrap();
        assert_eq!(value["client"], "monitor");
        assert!(value.get("client_url").is_none());
    }
}
