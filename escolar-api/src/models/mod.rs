use serde::Serialize;

pub mod academic;
pub mod catalog;
pub mod user;

/// The response envelope every endpoint speaks:
/// `{ success, message?, data? }` (plus `errors` on validation failures,
/// rendered by the error type).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn message_data(message: &str, data: T) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.to_owned()),
            data: Some(data),
        }
    }
}

pub fn ok_message(message: &str) -> ApiResponse<()> {
    ApiResponse {
        success: true,
        message: Some(message.to_owned()),
        data: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_absent_fields() {
        let body = serde_json::to_value(ok_message("Login exitoso")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": true, "message": "Login exitoso" })
        );

        let body = serde_json::to_value(ApiResponse::data(vec![1, 2, 3])).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": true, "data": [1, 2, 3] })
        );
    }
}
