//! Sliding-window rate limiting through the HTTP surface

#[cfg(test)]
mod tests {
    use crate::common::fixtures::test_config;
    use crate::common::{FailingStore, MalformedStore, TestGateway};
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use bellespot_gateway::KeyValueStore;
    use bellespot_gateway::server::HttpServer;
    use bellespot_gateway::server::middleware::{RateLimitMiddleware, RateLimitedBody};
    use bellespot_gateway::utils::Clock;
    use std::net::SocketAddr;
    use std::sync::Arc;

    async fn offers() -> HttpResponse {
        HttpResponse::Ok().body("offers")
    }

    fn peer(addr: &str) -> SocketAddr {
        addr.parse().unwrap()
    }

    fn header<B>(resp: &ServiceResponse<B>, name: &str) -> Option<String> {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    macro_rules! limited_app {
        ($gateway:expr) => {
            test::init_service(
                App::new()
                    .app_data($gateway.state.clone())
                    .wrap(RateLimitMiddleware::new($gateway.state.limiter.clone()))
                    .route("/shop/offers", web::get().to(offers))
                    .route("/shop/list", web::get().to(offers)),
            )
            .await
        };
    }

    // ==================== Admission Tests ====================

    #[actix_web::test]
    async fn test_sixty_requests_then_rejection() {
        let gateway = TestGateway::new();
        let start = gateway.clock.now_unix();
        let app = limited_app!(gateway);

        for i in 0..60u64 {
            gateway.clock.set(start + 10 * i as i64);
            let req = test::TestRequest::get()
                .uri("/shop/offers")
                .peer_addr(peer("1.2.3.4:40000"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "request {} rejected", i);
            assert_eq!(header(&resp, "x-ratelimit-limit").as_deref(), Some("60"));
            let remaining = (59 - i).to_string();
            assert_eq!(
                header(&resp, "x-ratelimit-remaining").as_deref(),
                Some(remaining.as_str())
            );
            assert_eq!(header(&resp, "x-ratelimit-reset").as_deref(), Some("3600"));
        }

        gateway.clock.set(start + 600);
        let req = test::TestRequest::get()
            .uri("/shop/offers")
            .peer_addr(peer("1.2.3.4:40000"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(header(&resp, "x-ratelimit-remaining").as_deref(), Some("0"));
        assert_eq!(header(&resp, "x-ratelimit-reset").as_deref(), Some("3000"));
        assert_eq!(header(&resp, "retry-after").as_deref(), Some("3000"));

        let body: RateLimitedBody = test::read_body_json(resp).await;
        assert!(!body.success);
        assert_eq!(body.error, "Too many requests. Please try again later.");
        assert_eq!(body.retry_after, 3000);
    }

    #[actix_web::test]
    async fn test_window_slides_past_oldest_request() {
        let gateway = TestGateway::with_limit(3600, 2);
        let start = gateway.clock.now_unix();
        let app = limited_app!(gateway);

        let get = || {
            test::TestRequest::get()
                .uri("/shop/offers")
                .peer_addr(peer("1.2.3.4:40000"))
                .to_request()
        };

        assert!(test::call_service(&app, get()).await.status().is_success());
        gateway.clock.set(start + 10);
        assert!(test::call_service(&app, get()).await.status().is_success());
        gateway.clock.set(start + 20);
        assert_eq!(
            test::call_service(&app, get()).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );

        // The request at `start` leaves the window, the one at `start + 10` stays
        gateway.clock.set(start + 3600);
        let resp = test::call_service(&app, get()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "x-ratelimit-remaining").as_deref(), Some("0"));

        let resp = test::call_service(&app, get()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(header(&resp, "retry-after").as_deref(), Some("10"));
    }

    #[actix_web::test]
    async fn test_rejections_do_not_extend_the_lockout() {
        let gateway = TestGateway::with_limit(60, 1);
        let start = gateway.clock.now_unix();
        let app = limited_app!(gateway);

        let get = || {
            test::TestRequest::get()
                .uri("/shop/offers")
                .peer_addr(peer("1.2.3.4:40000"))
                .to_request()
        };

        assert!(test::call_service(&app, get()).await.status().is_success());
        for offset in 1..30 {
            gateway.clock.set(start + offset);
            assert_eq!(
                test::call_service(&app, get()).await.status(),
                StatusCode::TOO_MANY_REQUESTS
            );
        }

        gateway.clock.set(start + 60);
        assert!(test::call_service(&app, get()).await.status().is_success());
    }

    // ==================== Partitioning Tests ====================

    #[actix_web::test]
    async fn test_clients_and_routes_have_separate_windows() {
        let gateway = TestGateway::with_limit(3600, 1);
        let app = limited_app!(gateway);

        let req = test::TestRequest::get()
            .uri("/shop/offers")
            .peer_addr(peer("1.2.3.4:40000"))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::get()
            .uri("/shop/offers")
            .peer_addr(peer("1.2.3.4:40001"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );

        let req = test::TestRequest::get()
            .uri("/shop/offers")
            .peer_addr(peer("5.6.7.8:40000"))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::get()
            .uri("/shop/list")
            .peer_addr(peer("1.2.3.4:40000"))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }

    #[actix_web::test]
    async fn test_forwarded_client_behind_trusted_proxy() {
        let mut config = test_config(3600, 60);
        config.gateway.rate_limit.trusted_proxy_hops = 1;
        let gateway = TestGateway::from_config(config);
        let app = limited_app!(gateway);

        let req = test::TestRequest::get()
            .uri("/shop/offers")
            .peer_addr(peer("10.0.0.1:443"))
            .insert_header(("x-forwarded-for", "1.2.3.4"))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let forwarded = gateway.state.limiter.window_key("1.2.3.4", "/shop/offers");
        let proxy = gateway.state.limiter.window_key("10.0.0.1", "/shop/offers");
        assert_eq!(gateway.store.zcard(&forwarded).await.unwrap(), 1);
        assert_eq!(gateway.store.zcard(&proxy).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_forwarded_header_ignored_without_trusted_proxies() {
        let gateway = TestGateway::with_limit(3600, 1);
        let app = limited_app!(gateway);

        // Rotating a spoofed header does not buy a fresh window
        for spoofed in ["9.9.9.1", "9.9.9.2"] {
            let req = test::TestRequest::get()
                .uri("/shop/offers")
                .peer_addr(peer("1.2.3.4:40000"))
                .insert_header(("x-forwarded-for", spoofed))
                .to_request();
            let resp = test::call_service(&app, req).await;
            if spoofed == "9.9.9.1" {
                assert_eq!(resp.status(), StatusCode::OK);
            } else {
                assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
            }
        }
    }

    // ==================== Concurrency Tests ====================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_burst_admits_exactly_the_limit() {
        let gateway = TestGateway::with_limit(3600, 10);
        let limiter = gateway.state.limiter.clone();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter
                        .check_and_record("1.2.3.4", "/shop/offers", "GET")
                        .await
                        .allowed
                })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 10);

        let key = limiter.window_key("1.2.3.4", "/shop/offers");
        assert_eq!(gateway.store.zcard(&key).await.unwrap(), 10);
    }

    // ==================== Fail-Open Tests ====================

    #[actix_web::test]
    async fn test_unreachable_store_admits_without_headers() {
        let store = Arc::new(FailingStore::new());
        let gateway = TestGateway::with_store(store.clone());
        let app = limited_app!(gateway);

        for _ in 0..100 {
            let req = test::TestRequest::get()
                .uri("/shop/offers")
                .peer_addr(peer("1.2.3.4:40000"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert!(header(&resp, "x-ratelimit-limit").as_deref().is_none());
            assert!(header(&resp, "x-ratelimit-remaining").as_deref().is_none());
            assert!(header(&resp, "x-ratelimit-reset").as_deref().is_none());
        }
        assert_eq!(store.calls(), 100);
    }

    #[actix_web::test]
    async fn test_malformed_store_reply_admits() {
        let gateway = TestGateway::with_store(Arc::new(MalformedStore));
        let app = limited_app!(gateway);

        let req = test::TestRequest::get()
            .uri("/shop/offers")
            .peer_addr(peer("1.2.3.4:40000"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(header(&resp, "x-ratelimit-remaining").as_deref().is_none());
    }

    // ==================== Full App Tests ====================

    #[actix_web::test]
    async fn test_gateway_app_limits_auth_routes() {
        let gateway = TestGateway::with_limit(3600, 2);
        let app = test::init_service(HttpServer::create_app(gateway.state.clone())).await;

        for expected in [StatusCode::BAD_REQUEST, StatusCode::BAD_REQUEST] {
            let req = test::TestRequest::post()
                .uri("/auth/login")
                .peer_addr(peer("1.2.3.4:40000"))
                .set_json(serde_json::json!({}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), expected);
        }

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(peer("1.2.3.4:40000"))
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(header(&resp, "server").as_deref(), Some("Bellespot-Gateway"));
    }
}
