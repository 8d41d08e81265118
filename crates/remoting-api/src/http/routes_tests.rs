    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use remoting_core::{RequestContext, RequestStream, ResponseSink, ServiceManager};
    use remoting_protocols::{RpcResponse, ServiceError};
    use tower::ServiceExt;

    use crate::state::AccessGuard;

    #[derive(Clone)]
    struct Calculator {
        user: Option<String>,
    }

    impl Calculator {
        async fn add(self, a: i32, b: i32) -> Result<i32, ServiceError> {
            Ok(a + b)
        }

        async fn user(self) -> Result<Option<String>, ServiceError> {
            Ok(self.user)
        }

        async fn divide(self, a: i32, b: i32) -> Result<i32, ServiceError> {
            if b == 0 {
                return Err(ServiceError::expected("DivisionByZero", "cannot divide by zero"));
            }
            Ok(a / b)
        }
    }

    fn calculator() -> ServiceManager<Calculator> {
        let mut manager = ServiceManager::new("Calculator", |ctx: &RequestContext| Calculator {
            user: ctx.header("x-user").map(str::to_string),
        });
        manager
            .bind(HttpMethod::Post, Some("add"), |c: Calculator, a: i32, b: i32| c.add(a, b))
            .unwrap();
        manager
            .bind(HttpMethod::Get, Some("user"), |c: Calculator| c.user())
            .unwrap();
        manager
            .bind(HttpMethod::Put, Some("user"), |c: Calculator| c.user())
            .unwrap();
        manager
            .bind(HttpMethod::Post, Some("divide"), |c: Calculator, a: i32, b: i32| c.divide(a, b))
            .unwrap();
        manager
            .bind_stream(
                Some("feed"),
                |_c: Calculator, _rq: RequestStream<String>, _rs: ResponseSink<String>| async {},
            )
            .unwrap();
        manager
    }

    fn create_test_router() -> Router {
        let state = Arc::new(RemoteState::new(calculator().into_registries()));
        apply_routes(Router::new(), state)
    }

    /// Only callers presenting an `X-User` header get through.
    fn create_guarded_router() -> Router {
        let guard: AccessGuard = Arc::new(|ctx: &RequestContext| ctx.header("x-user").is_some());
        let state = Arc::new(RemoteState::new(calculator().into_registries()).with_guard(Some(guard)));
        apply_routes(Router::new(), state)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_scenario() {
        let app = create_test_router();
        let response = app
            .oneshot(post("/rpc/add", r#"{"id":7,"method":"/rpc/add","params":["3","4"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"id":7,"result":"7","error":null}"#);
    }

    #[tokio::test]
    async fn test_arity_mismatch_scenario() {
        let app = create_test_router();
        let response = app
            .oneshot(post("/rpc/add", r#"{"id":7,"method":"/rpc/add","params":["3"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            r#"{"id":7,"result":null,"error":"Invalid parameters"}"#
        );
    }

    #[tokio::test]
    async fn test_business_error_is_reported() {
        let app = create_test_router();
        let response = app
            .oneshot(post("/rpc/divide", r#"{"id":2,"method":"/rpc/divide","params":["1","0"]}"#))
            .await
            .unwrap();

        let envelope: RpcResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(envelope.id, 2);
        assert_eq!(envelope.error.as_deref(), Some("cannot divide by zero"));
        assert_eq!(envelope.exception_type.as_deref(), Some("DivisionByZero"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let app = create_test_router();
        let response = app.oneshot(post("/rpc/add", "{oops")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let envelope: RpcResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(envelope.id, 0);
        assert!(envelope.error.is_some());
    }

    #[tokio::test]
    async fn test_get_with_id_and_headers() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rpc/user?id=11")
                    .header("X-User", "ada")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            r#"{"id":11,"result":"\"ada\"","error":null}"#
        );
    }

    #[tokio::test]
    async fn test_get_without_id() {
        let app = create_test_router();
        let response = app
            .oneshot(Request::builder().uri("/rpc/user").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_second_method_on_same_path() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/rpc/user")
                    .body(Body::from(r#"{"id":4,"method":"/rpc/user","params":[]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"id":4,"result":"null","error":null}"#);
    }

    #[tokio::test]
    async fn test_unbound_method_not_allowed() {
        let app = create_test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/rpc/add")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let app = create_test_router();
        let response = app
            .oneshot(post("/rpc/missing", r#"{"id":1,"method":"","params":[]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_query_gets_envelope() {
        let app = create_test_router();
        let response = app
            .oneshot(Request::builder().uri("/rpc/user?id=%ZZ").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let envelope: RpcResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(envelope.id, 0);
        assert_eq!(envelope.exception_type.as_deref(), Some("MalformedRequest"));
    }

    #[tokio::test]
    async fn test_guard_admits_caller() {
        let app = create_guarded_router();
        let mut request = post("/rpc/add", r#"{"id":7,"method":"/rpc/add","params":["3","4"]}"#);
        request.headers_mut().insert("x-user", "ada".parse().unwrap());
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"id":7,"result":"7","error":null}"#);
    }

    #[tokio::test]
    async fn test_guard_refuses_call() {
        let app = create_guarded_router();
        let response = app
            .oneshot(post("/rpc/add", r#"{"id":7,"method":"/rpc/add","params":["3","4"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let envelope: RpcResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(envelope.id, 0);
        assert_eq!(envelope.error.as_deref(), Some("Access denied"));
        assert_eq!(envelope.exception_type.as_deref(), Some("AccessDenied"));
    }

    #[tokio::test]
    async fn test_guard_refuses_upgrade() {
        let app = create_guarded_router();
        let response = app
            .oneshot(Request::builder().uri("/rpcws/feed").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let envelope: RpcResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(envelope.exception_type.as_deref(), Some("AccessDenied"));
    }

    #[tokio::test]
    async fn test_guard_admits_upgrade_request() {
        let app = create_guarded_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rpcws/feed")
                    .header("X-User", "ada")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Past the guard; the plain GET then fails the upgrade handshake.
        assert_ne!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.status().is_client_error());
    }
