//! Feed data model.
//!
//! Wire-format DTOs for the SPOT public feed JSON envelope and the
//! immutable [`PositionReport`] domain type the rest of the engine works
//! with. Raw messages are converted once at the fetch boundary; after
//! that, reports are never mutated.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

/// Fixed timestamp format used by the feed (e.g. `2025-12-12T21:36:42+0000`).
pub const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Display fallback when a report date is unknown.
pub const DATE_UNAVAILABLE: &str = "Date not available";

/// Display fallback when a report time is unknown.
pub const TIME_UNAVAILABLE: &str = "Time not available";

/// Outermost feed envelope: `{"response": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEnvelope {
    pub response: FeedResponse,
}

/// Response body: either a message page or an error report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    #[serde(default)]
    pub feed_message_response: Option<FeedMessagePage>,
    #[serde(default)]
    pub errors: Option<ApiErrors>,
}

/// One page of feed messages with pagination counters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMessagePage {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub activity_count: i64,
    #[serde(default)]
    pub messages: Option<FeedMessages>,
}

/// Wrapper around the message list (`"messages": {"message": [...]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct FeedMessages {
    #[serde(default)]
    pub message: Vec<RawMessage>,
}

/// Error wrapper (`"errors": {"error": {...}}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrors {
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// One API error, e.g. code `E-0195` when a feed has no messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub description: String,
}

/// One raw feed message exactly as the API delivers it.
///
/// Every field is optional on the wire; missing fields take their
/// defaults so a partial message never fails the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub messenger_id: String,
    #[serde(default)]
    pub messenger_name: String,
    #[serde(default)]
    pub unix_time: i64,
    #[serde(default)]
    pub message_type: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub model_id: String,
    #[serde(default)]
    pub show_custom_msg: String,
    #[serde(default)]
    pub date_time: String,
    #[serde(default)]
    pub battery_state: String,
    #[serde(default)]
    pub hidden: i64,
    #[serde(default)]
    pub altitude: i64,
    #[serde(default)]
    pub message_content: Option<String>,
}

/// An immutable position report for one asset.
///
/// The timestamp is parsed once from the feed-supplied string; a missing
/// or unparsable timestamp is `None` and sorts as infinitely old
/// everywhere the reducer orders reports. Auxiliary fields (battery,
/// altitude, message type) are carried through uninterpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    /// Feed-assigned report id.
    pub id: i64,
    /// Stable messenger hardware id.
    pub messenger_id: String,
    /// Owning asset's display name (e.g. `BUOY_A1`).
    pub messenger_name: String,
    /// Parsed report timestamp; `None` when missing or unparsable.
    pub timestamp: Option<DateTime<Utc>>,
    /// Raw epoch seconds as delivered by the feed.
    pub unix_time: i64,
    /// Latitude in degrees as delivered by the feed.
    pub latitude: f64,
    /// Longitude in degrees as delivered by the feed.
    pub longitude: f64,
    /// Message type (e.g. `STOP`, `CUSTOM`).
    pub message_type: String,
    /// Battery state (e.g. `GOOD`, `LOW`).
    pub battery_state: String,
    /// Altitude in meters as delivered by the feed.
    pub altitude: i64,
    /// Optional custom message content.
    pub message_content: Option<String>,
}

impl PositionReport {
    /// Convert a raw wire message into a domain report, parsing the
    /// timestamp string once.
    pub fn from_raw(raw: RawMessage) -> Self {
        let timestamp = parse_feed_timestamp(&raw.date_time);
        Self {
            id: raw.id,
            messenger_id: raw.messenger_id,
            messenger_name: raw.messenger_name,
            timestamp,
            unix_time: raw.unix_time,
            latitude: raw.latitude,
            longitude: raw.longitude,
            message_type: raw.message_type,
            battery_state: raw.battery_state,
            altitude: raw.altitude,
            message_content: raw.message_content,
        }
    }

    /// Short display name: the portion of the messenger name after the
    /// last `_`, or the whole name when it has none.
    pub fn display_name(&self) -> &str {
        short_display_name(&self.messenger_name)
    }

    /// The report's position, when its coordinates are in valid range.
    pub fn position(&self) -> Option<crate::geo::GeoPoint> {
        crate::geo::GeoPoint::new(self.latitude, self.longitude).ok()
    }

    /// Whole minutes elapsed from the report timestamp to `now`.
    ///
    /// `None` when the timestamp is unknown.
    pub fn age_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        self.timestamp.map(|t| (now - t).num_minutes())
    }

    /// Report date formatted for display (e.g. `Dec 12, 2025`) in the
    /// given timezone.
    pub fn formatted_date(&self, tz: Tz) -> String {
        match self.timestamp {
            Some(t) => t.with_timezone(&tz).format("%b %d, %Y").to_string(),
            None => DATE_UNAVAILABLE.to_string(),
        }
    }

    /// Report time formatted for display (e.g. `21:36 GMT`) in the
    /// given timezone.
    pub fn formatted_time(&self, tz: Tz) -> String {
        match self.timestamp {
            Some(t) => format!("{} GMT", t.with_timezone(&tz).format("%H:%M")),
            None => TIME_UNAVAILABLE.to_string(),
        }
    }
}

/// Short display name for an asset: the portion after the last `_`,
/// or the whole name when it has none.
pub fn short_display_name(messenger_name: &str) -> &str {
    messenger_name.rsplit('_').next().unwrap_or(messenger_name)
}

/// Parse a feed timestamp string into UTC.
///
/// Blank or malformed strings yield `None`; the caller treats that as
/// an unknown timestamp, never an error.
pub fn parse_feed_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DateTime::parse_from_str(trimmed, FEED_TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report_with_timestamp(raw: &str) -> PositionReport {
        PositionReport::from_raw(RawMessage {
            id: 1,
            messenger_name: "BUOY_A1".to_string(),
            date_time: raw.to_string(),
            latitude: 5.2,
            longitude: -0.5,
            ..Default::default()
        })
    }

    mod timestamp_parsing {
        use super::*;

        #[test]
        fn test_parse_valid_timestamp() {
            let parsed = parse_feed_timestamp("2025-12-12T21:36:42+0000");
            let expected = Utc.with_ymd_and_hms(2025, 12, 12, 21, 36, 42).unwrap();
            assert_eq!(parsed, Some(expected));
        }

        #[test]
        fn test_parse_nonzero_offset_converts_to_utc() {
            let parsed = parse_feed_timestamp("2025-12-12T22:36:42+0100");
            let expected = Utc.with_ymd_and_hms(2025, 12, 12, 21, 36, 42).unwrap();
            assert_eq!(parsed, Some(expected));
        }

        #[test]
        fn test_parse_blank_is_none() {
            assert_eq!(parse_feed_timestamp(""), None);
            assert_eq!(parse_feed_timestamp("   "), None);
        }

        #[test]
        fn test_parse_malformed_is_none() {
            assert_eq!(parse_feed_timestamp("not a date"), None);
            assert_eq!(parse_feed_timestamp("2025-12-12"), None);
            assert_eq!(parse_feed_timestamp("2025-13-40T99:99:99+0000"), None);
        }
    }

    mod position_report {
        use super::*;

        #[test]
        fn test_from_raw_parses_timestamp_and_carries_fields() {
            let raw = RawMessage {
                id: 42,
                messenger_id: "0-1234567".to_string(),
                messenger_name: "BUOY_A1".to_string(),
                unix_time: 1765575402,
                message_type: "STOP".to_string(),
                latitude: 5.2,
                longitude: -0.5,
                date_time: "2025-12-12T21:36:42+0000".to_string(),
                battery_state: "GOOD".to_string(),
                altitude: 12,
                ..Default::default()
            };

            let report = PositionReport::from_raw(raw);
            assert_eq!(report.id, 42);
            assert!(report.timestamp.is_some());
            assert_eq!(report.battery_state, "GOOD");
            assert_eq!(report.altitude, 12);
            assert_eq!(report.message_content, None);
        }

        #[test]
        fn test_from_raw_unparsable_timestamp_is_unknown() {
            let report = report_with_timestamp("garbage");
            assert_eq!(report.timestamp, None);
        }

        #[test]
        fn test_display_name_strips_prefix() {
            let mut report = report_with_timestamp("");
            assert_eq!(report.display_name(), "A1");

            report.messenger_name = "FF_BUOY_7".to_string();
            assert_eq!(report.display_name(), "7");

            report.messenger_name = "PLAIN".to_string();
            assert_eq!(report.display_name(), "PLAIN");

            report.messenger_name = String::new();
            assert_eq!(report.display_name(), "");
        }

        #[test]
        fn test_position_rejects_out_of_range_coordinates() {
            let mut report = report_with_timestamp("");
            assert!(report.position().is_some());

            report.latitude = 91.0;
            assert!(report.position().is_none());
        }

        #[test]
        fn test_age_minutes() {
            let report = report_with_timestamp("2025-12-12T21:36:42+0000");
            let now = Utc.with_ymd_and_hms(2025, 12, 12, 21, 52, 0).unwrap();
            assert_eq!(report.age_minutes(now), Some(15));

            let unknown = report_with_timestamp("");
            assert_eq!(unknown.age_minutes(now), None);
        }

        #[test]
        fn test_age_minutes_future_report_is_negative() {
            let report = report_with_timestamp("2025-12-12T21:36:42+0000");
            let now = Utc.with_ymd_and_hms(2025, 12, 12, 21, 30, 0).unwrap();
            assert_eq!(report.age_minutes(now), Some(-6));
        }

        #[test]
        fn test_formatted_date_and_time() {
            let report = report_with_timestamp("2025-12-12T21:36:42+0000");
            let tz = chrono_tz::Africa::Accra;
            assert_eq!(report.formatted_date(tz), "Dec 12, 2025");
            assert_eq!(report.formatted_time(tz), "21:36 GMT");
        }

        #[test]
        fn test_formatted_date_and_time_fallbacks() {
            let report = report_with_timestamp("");
            let tz = chrono_tz::Africa::Accra;
            assert_eq!(report.formatted_date(tz), "Date not available");
            assert_eq!(report.formatted_time(tz), "Time not available");
        }
    }

    mod envelope_decoding {
        use super::*;

        const PAGE_JSON: &str = r#"{
            "response": {
                "feedMessageResponse": {
                    "count": 2,
                    "totalCount": 2,
                    "activityCount": 0,
                    "feed": {
                        "id": "abc123",
                        "name": "Fleet",
                        "daysRange": 7
                    },
                    "messages": {
                        "message": [
                            {
                                "id": 101,
                                "messengerId": "0-1111111",
                                "messengerName": "BUOY_A1",
                                "unixTime": 1765575402,
                                "messageType": "STOP",
                                "latitude": 5.2,
                                "longitude": -0.5,
                                "modelId": "SPOT4",
                                "showCustomMsg": "Y",
                                "dateTime": "2025-12-12T21:36:42+0000",
                                "batteryState": "GOOD",
                                "hidden": 0,
                                "altitude": 0
                            },
                            {
                                "id": 102,
                                "messengerName": "BUOY_B2",
                                "latitude": 5.3,
                                "longitude": -0.6,
                                "dateTime": "2025-12-12T21:40:00+0000"
                            }
                        ]
                    }
                }
            }
        }"#;

        const ERROR_JSON: &str = r#"{
            "response": {
                "errors": {
                    "error": {
                        "code": "E-0195",
                        "text": "No Messages to display",
                        "description": "No displayable messages found for feed"
                    }
                }
            }
        }"#;

        #[test]
        fn test_decode_message_page() {
            let envelope: FeedEnvelope =
                serde_json::from_str(PAGE_JSON).expect("Page JSON should decode");
            let page = envelope
                .response
                .feed_message_response
                .expect("Page should be present");

            assert_eq!(page.count, 2);
            assert_eq!(page.total_count, 2);
            let messages = page.messages.expect("Messages should be present").message;
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0].messenger_name, "BUOY_A1");
            assert_eq!(messages[0].battery_state, "GOOD");
            // Second message omits most fields; defaults fill in
            assert_eq!(messages[1].battery_state, "");
            assert_eq!(messages[1].unix_time, 0);
        }

        #[test]
        fn test_decode_error_envelope() {
            let envelope: FeedEnvelope =
                serde_json::from_str(ERROR_JSON).expect("Error JSON should decode");
            assert!(envelope.response.feed_message_response.is_none());
            let error = envelope
                .response
                .errors
                .expect("Errors should be present")
                .error
                .expect("Error should be present");
            assert_eq!(error.code, "E-0195");
        }

        #[test]
        fn test_decode_tolerates_unknown_fields() {
            let json = r#"{
                "response": {
                    "feedMessageResponse": {
                        "count": 0,
                        "totalCount": 0,
                        "activityCount": 0,
                        "brandNewField": {"nested": true}
                    }
                }
            }"#;
            let envelope: FeedEnvelope =
                serde_json::from_str(json).expect("Unknown fields should be ignored");
            let page = envelope.response.feed_message_response.unwrap();
            assert_eq!(page.count, 0);
            assert!(page.messages.is_none());
        }
    }
}
