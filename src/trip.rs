use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A taxi trip event as published to the hub.
///
/// Serializes as `{"ContentData": {...}}` with the trip fields in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TripEvent {
    #[serde(rename = "ContentData")]
    pub content_data: TripDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TripDetails {
    #[serde(rename = "vendorID")]
    pub vendor_id: String,

    /// Kept as a JSON number so integer distances stay integers on the wire.
    pub trip_distance: Number,

    pub passenger_count: u32,

    /// Payment code, string encoded (`"1"`, `"2"`, ...).
    pub payment_type: String,
}

impl TripEvent {
    pub fn new(
        vendor_id: impl Into<String>,
        trip_distance: impl Into<Number>,
        passenger_count: u32,
        payment_type: impl Into<String>,
    ) -> Self {
        Self {
            content_data: TripDetails {
                vendor_id: vendor_id.into(),
                trip_distance: trip_distance.into(),
                passenger_count,
                payment_type: payment_type.into(),
            },
        }
    }

    /// The built-in smoke test record.
    pub fn sample() -> Self {
        Self::new("SAI", 5u64, 2, "1")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sample_matches_wire_shape() {
        let value = serde_json::to_value(TripEvent::sample()).unwrap();

        assert_eq!(
            value,
            json!({
                "ContentData": {
                    "vendorID": "SAI",
                    "tripDistance": 5,
                    "passengerCount": 2,
                    "paymentType": "1"
                }
            })
        );
    }

    #[test]
    fn float_distance_is_kept() {
        let event: TripEvent = serde_json::from_str(
            r#"{"ContentData":{"vendorID":"CMT","tripDistance":3.25,"passengerCount":1,"paymentType":"2"}}"#,
        )
        .unwrap();

        assert_eq!(event.content_data.trip_distance.as_f64(), Some(3.25));
        assert!(event.content_data.trip_distance.as_u64().is_none());
    }

    #[test]
    fn negative_passenger_count_is_rejected() {
        let result = serde_json::from_str::<TripEvent>(
            r#"{"ContentData":{"vendorID":"SAI","tripDistance":1,"passengerCount":-1,"paymentType":"1"}}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn missing_field_is_rejected() {
        let result = serde_json::from_str::<TripEvent>(
            r#"{"ContentData":{"vendorID":"SAI","tripDistance":1,"paymentType":"1"}}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        let result = serde_json::from_str::<TripEvent>(
            r#"{"ContentData":{"vendorID":"SAI","tripDistance":5,"passengerCount":2,"paymentType":"1"},"EventId":"x"}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn unknown_trip_field_is_rejected() {
        let result = serde_json::from_str::<TripEvent>(
            r#"{"ContentData":{"vendorID":"SAI","tripDistance":5,"passengerCount":2,"paymentType":"1","fareAmount":12.5}}"#,
        );

        assert!(result.is_err());
    }
}
