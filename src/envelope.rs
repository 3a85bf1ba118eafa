use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Uniform JSON body returned by every `/users` endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
}

impl Envelope<()> {
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            data: None,
            distance: None,
        }
    }

    pub fn distance(message: impl Into<String>, distance: String) -> Self {
        Self {
            distance: Some(distance),
            ..Self::message(StatusCode::OK, message)
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
            distance: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_value(Envelope::message(StatusCode::OK, "done")).unwrap();
        assert_eq!(json, serde_json::json!({ "status_code": 200, "message": "done" }));
    }

    #[test]
    fn distance_envelope_has_no_data() {
        let json =
            serde_json::to_value(Envelope::distance("calculated", "1.00 km".into())).unwrap();
        assert_eq!(json["distance"], "1.00 km");
        assert!(json.get("data").is_none());
    }
}
