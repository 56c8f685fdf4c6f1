//! Error type to HTTP response mapping

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use bellespot_gateway::GatewayError;
    use bellespot_gateway::utils::error::ErrorResponse;

    async fn response_body(error: GatewayError) -> (StatusCode, ErrorResponse) {
        let response = error.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    // ==================== Status Code Tests ====================

    #[test]
    fn test_status_codes() {
        let cases = [
            (GatewayError::auth("Invalid credentials"), StatusCode::UNAUTHORIZED),
            (GatewayError::invalid_token("bad"), StatusCode::UNAUTHORIZED),
            (GatewayError::forbidden("no"), StatusCode::FORBIDDEN),
            (GatewayError::not_found("gone"), StatusCode::NOT_FOUND),
            (GatewayError::conflict("dup"), StatusCode::CONFLICT),
            (GatewayError::bad_request("bad"), StatusCode::BAD_REQUEST),
            (GatewayError::validation("Weak Password"), StatusCode::BAD_REQUEST),
            (GatewayError::storage("down"), StatusCode::INTERNAL_SERVER_ERROR),
            (GatewayError::config("broken"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{}", error);
        }
    }

    // ==================== Response Body Tests ====================

    #[actix_web::test]
    async fn test_client_errors_keep_their_message() {
        let (status, body) = response_body(GatewayError::validation("Invalid Email")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.message, "Invalid Email");
        assert_eq!(body.error.as_deref(), Some("Invalid Email"));
    }

    #[actix_web::test]
    async fn test_infrastructure_details_stay_private() {
        let (_, body) =
            response_body(GatewayError::storage("connection refused to 10.0.0.5:6379")).await;
        assert_eq!(body.message, "Storage operation failed");

        let (_, body) = response_body(GatewayError::config("missing JWT_SECRET")).await;
        assert_eq!(body.message, "An internal error occurred");

        let (_, body) = response_body(GatewayError::invalid_token("base64 decode")).await;
        assert_eq!(body.message, "Invalid token");
    }

    #[test]
    fn test_display_keeps_details_for_logs() {
        let error = GatewayError::storage("connection refused");
        assert_eq!(error.to_string(), "Storage error: connection refused");
    }
}
