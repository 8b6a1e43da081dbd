//! Submission tests against an in-process order endpoint

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use order_entry::{
    OrderClient, OrderClientConfig, OrderForm, OrderSubmitter, SubmitError, submit_form,
};
use serde_json::Value;
use tokio::net::TcpListener;
use types::ids::{CompanyCode, UserId};
use types::order::Side;

#[derive(Clone)]
struct FakeServer {
    received: Arc<Mutex<Vec<Value>>>,
    reply: StatusCode,
}

async fn record_order(
    State(server): State<FakeServer>,
    Json(body): Json<Value>,
) -> (StatusCode, &'static str) {
    server.received.lock().unwrap().push(body);
    if server.reply.is_success() {
        (server.reply, "")
    } else {
        (server.reply, "insufficient balance")
    }
}

/// Start a fake order service and return its base URL.
async fn spawn_server(reply: StatusCode) -> (String, Arc<Mutex<Vec<Value>>>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/v1/orders", post(record_order))
        .with_state(FakeServer {
            received: received.clone(),
            reply,
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), received)
}

fn client(base_url: String) -> OrderClient {
    OrderClient::new(OrderClientConfig {
        base_url,
        timeout: Duration::from_secs(2),
    })
    .unwrap()
}

#[tokio::test]
async fn test_limit_order_is_posted() {
    let (base_url, received) = spawn_server(StatusCode::OK).await;
    let client = client(base_url);

    let form = OrderForm::limit(Side::Buy, 58300, 10);
    let request = submit_form(&client, CompanyCode::from("005930"), UserId::new(1), &form)
        .await
        .unwrap();
    assert!(!request.is_market());

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        serde_json::json!({
            "companyCode": "005930",
            "type": "BUY",
            "quantity": 10,
            "price": 58300,
            "userId": 1
        })
    );
}

#[tokio::test]
async fn test_market_order_posts_zero_price() {
    let (base_url, received) = spawn_server(StatusCode::CREATED).await;
    let client = client(base_url);

    let form = OrderForm::market(Side::Sell, 5);
    submit_form(&client, CompanyCode::from("005930"), UserId::new(2), &form)
        .await
        .unwrap();

    let bodies = received.lock().unwrap();
    assert_eq!(bodies[0]["price"], 0);
    assert_eq!(bodies[0]["type"], "SELL");
}

#[tokio::test]
async fn test_rejection_surfaces_status_and_body() {
    let (base_url, received) = spawn_server(StatusCode::BAD_REQUEST).await;
    let client = client(base_url);

    let form = OrderForm::limit(Side::Buy, 100, 1);
    let err = submit_form(&client, CompanyCode::from("005930"), UserId::new(1), &form)
        .await
        .unwrap_err();

    match err {
        SubmitError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "insufficient balance");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(!SubmitError::Rejected { status: 400, body: String::new() }.is_retryable());
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_form_never_reaches_server() {
    let (base_url, received) = spawn_server(StatusCode::OK).await;
    let client = client(base_url);

    let form = OrderForm::limit(Side::Sell, 0, 3);
    let err = submit_form(&client, CompanyCode::from("005930"), UserId::new(1), &form)
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Order(_)));
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{addr}"));
    let request = order_entry::OrderRequest::from_form(
        CompanyCode::from("005930"),
        UserId::new(1),
        &OrderForm::market(Side::Buy, 1),
    )
    .unwrap();

    let err = client.submit(&request).await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(_)));
    assert!(err.is_retryable());
}
