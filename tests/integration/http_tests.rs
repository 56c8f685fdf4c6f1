//! Guard and endpoint behaviour over the full gateway app

#[cfg(test)]
mod tests {
    use crate::common::fixtures::TEST_SECRET;
    use crate::common::{FailingStore, TestGateway, UserFactory};
    use actix_web::cookie::{Cookie, SameSite};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use bellespot_gateway::auth::{JwtHandler, UserRecord};
    use bellespot_gateway::config::models::auth::AuthConfig;
    use bellespot_gateway::server::HttpServer;
    use serde_json::json;
    use std::sync::Arc;

    fn foreign_token(user: &UserRecord) -> String {
        let config = AuthConfig {
            jwt_secret: format!("{}-but-not-ours", TEST_SECRET),
            ..AuthConfig::default()
        };
        JwtHandler::new(&config).create_token(user).unwrap()
    }

    // ==================== Guard Failure Tests ====================

    #[actix_web::test]
    async fn test_guard_fails_closed_when_store_is_down() {
        let gateway = TestGateway::with_store(Arc::new(FailingStore::new()));
        let (_, token) = gateway.signed_in(UserFactory::user()).await;
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let req = test::TestRequest::get()
            .uri("/auth/check")
            .cookie(Cookie::new("token", token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        // The limiter admitted the request, the guard refused it
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get("x-ratelimit-limit").is_none());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"success": false, "message": "Invalid token"}));
    }

    #[actix_web::test]
    async fn test_revoked_and_forged_tokens_get_identical_responses() {
        let gateway = TestGateway::new();
        let (user, token) = gateway.signed_in(UserFactory::user()).await;
        let forged = foreign_token(&user);
        gateway
            .state
            .revocation
            .revoke(&token, gateway.state.jwt.decode_unverified(&token).unwrap().exp)
            .await
            .unwrap();
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let mut bodies = Vec::new();
        for presented in [token, forged, "not-a-jwt".to_string()] {
            let req = test::TestRequest::get()
                .uri("/auth/check")
                .cookie(Cookie::new("token", presented))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            bodies.push(test::read_body(resp).await);
        }

        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1], bodies[2]);
    }

    #[actix_web::test]
    async fn test_token_of_deleted_account() {
        let gateway = TestGateway::new();
        let (_, token) = gateway.signed_in(UserFactory::user()).await;
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let check = |token: String| {
            test::TestRequest::get()
                .uri("/auth/check")
                .cookie(Cookie::new("token", token))
                .to_request()
        };

        let resp = test::call_service(&app, check(token.clone())).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let stranger = UserRecord {
            id: "no-such-user".to_string(),
            first_name: "Ghost".to_string(),
            email_id: "ghost@example.com".to_string(),
            password_hash: String::new(),
            role: bellespot_gateway::auth::Role::User,
            profile_photo: None,
            cart: Vec::new(),
            created_at: chrono::Utc::now(),
        };
        let orphan = gateway.state.jwt.create_token(&stranger).unwrap();
        let resp = test::call_service(&app, check(orphan)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"success": false, "message": "User Doesn't Exist"})
        );
    }

    // ==================== Session Tests ====================

    #[actix_web::test]
    async fn test_login_cookie_attributes() {
        let gateway = TestGateway::new();
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "firstName": "Meera",
                "emailId": "Meera@Example.com",
                "password": "Str0ng!Pass"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"emailId": "meera@example.com", "password": "Str0ng!Pass"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == "token")
            .unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age().map(|age| age.whole_seconds()),
            Some(gateway.state.jwt.expiration() as i64)
        );

        let token = cookie.value().to_string();
        let req = test::TestRequest::get()
            .uri("/auth/check")
            .cookie(Cookie::new("token", token))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["firstName"], "Meera");
        assert_eq!(body["user"]["role"], "user");
    }

    #[actix_web::test]
    async fn test_service_provider_registration_role() {
        let gateway = TestGateway::new();
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let req = test::TestRequest::post()
            .uri("/auth/service/register")
            .set_json(json!({
                "firstName": "Salon",
                "emailId": "owner@example.com",
                "password": "Str0ng!Pass"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["role"], "serviceProvider");
    }

    // ==================== Health Tests ====================

    #[actix_web::test]
    async fn test_health_degraded_when_store_is_down() {
        let gateway = TestGateway::with_store(Arc::new(FailingStore::new()));
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["store"]["backend"], "failing");
        assert_eq!(body["store"]["healthy"], false);
    }
}
