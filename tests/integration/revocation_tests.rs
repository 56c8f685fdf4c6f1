//! Logout revocation and blocklist expiry

#[cfg(test)]
mod tests {
    use crate::common::{ReadOnlyStore, TestGateway, UserFactory};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use bellespot_gateway::server::HttpServer;
    use bellespot_gateway::utils::Clock;
    use bellespot_gateway::utils::error::ErrorResponse;
    use serde_json::json;
    use std::sync::Arc;

    // ==================== Logout Tests ====================

    #[actix_web::test]
    async fn test_logout_blocks_token_until_expiry() {
        let gateway = TestGateway::new();
        let memory = gateway.memory.clone().unwrap();
        let (_, token) = gateway.signed_in(UserFactory::user()).await;
        let claims = gateway.state.jwt.decode_unverified(&token).unwrap();
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .cookie(Cookie::new("token", token.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let revocation = &gateway.state.revocation;
        let key = revocation.key(&token);
        assert!(revocation.is_revoked(&token).await.unwrap());
        assert_eq!(
            memory.ttl(&key),
            Some(claims.exp - gateway.clock.now_unix())
        );

        let req = test::TestRequest::get()
            .uri("/auth/check")
            .cookie(Cookie::new("token", token.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"success": false, "message": "Invalid token"}));

        // One second before expiry the entry is still there
        gateway.clock.set(claims.exp - 1);
        assert!(revocation.is_revoked(&token).await.unwrap());

        gateway.clock.set(claims.exp + 1);
        assert!(!revocation.is_revoked(&token).await.unwrap());
        assert_eq!(memory.ttl(&key), None);
        assert!(memory.is_empty());
    }

    #[actix_web::test]
    async fn test_logout_with_bearer_header() {
        let gateway = TestGateway::new();
        let (_, token) = gateway.signed_in(UserFactory::service_provider()).await;
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .insert_header(("authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cleared = resp
            .response()
            .cookies()
            .find(|c| c.name() == "token")
            .unwrap();
        assert_eq!(cleared.value(), "");
        assert!(gateway.state.revocation.is_revoked(&token).await.unwrap());
    }

    #[actix_web::test]
    async fn test_second_logout_is_rejected_by_guard() {
        let gateway = TestGateway::new();
        let (_, token) = gateway.signed_in(UserFactory::user()).await;
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let logout = || {
            test::TestRequest::post()
                .uri("/auth/logout")
                .cookie(Cookie::new("token", token.clone()))
                .to_request()
        };

        assert_eq!(test::call_service(&app, logout()).await.status(), StatusCode::OK);

        let resp = test::call_service(&app, logout()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "Invalid token");
    }

    #[actix_web::test]
    async fn test_revocation_is_per_token() {
        let gateway = TestGateway::new();
        let (_, revoked) = gateway.signed_in(UserFactory::user()).await;
        let (_, other) = gateway.signed_in(UserFactory::user()).await;
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .cookie(Cookie::new("token", revoked))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/auth/check")
            .cookie(Cookie::new("token", other))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_logout_reports_store_write_failure() {
        let gateway = TestGateway::with_store(Arc::new(ReadOnlyStore));
        let (_, token) = gateway.signed_in(UserFactory::user()).await;
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .cookie(Cookie::new("token", token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(!body.success);
        assert_eq!(body.message, "Logout failed: Storage operation failed");
    }

    // ==================== Blocklist Tests ====================

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let gateway = TestGateway::new();
        let memory = gateway.memory.clone().unwrap();
        let revocation = &gateway.state.revocation;
        let now = gateway.clock.now_unix();

        revocation.revoke("abc.def.ghi", now + 600).await.unwrap();
        revocation.revoke("abc.def.ghi", now + 600).await.unwrap();

        assert!(revocation.is_revoked("abc.def.ghi").await.unwrap());
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.ttl(&revocation.key("abc.def.ghi")), Some(600));
    }

    #[tokio::test]
    async fn test_already_expired_token_leaves_nothing_behind() {
        let gateway = TestGateway::new();
        let memory = gateway.memory.clone().unwrap();
        let revocation = &gateway.state.revocation;
        let now = gateway.clock.now_unix();

        revocation.revoke("abc.def.ghi", now - 1).await.unwrap();
        assert!(!revocation.is_revoked("abc.def.ghi").await.unwrap());
        assert!(memory.is_empty());
    }
}
