//! M-Pesa client against a mocked Daraja API.

use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticketing::config::MpesaConfig;
use ticketing::errors::AppError;
use ticketing::services::mpesa::MpesaClient;

fn config(base_url: &str) -> MpesaConfig {
    MpesaConfig {
        base_url: base_url.to_string(),
        consumer_key: "consumer-key".to_string(),
        consumer_secret: "consumer-secret".to_string(),
        shortcode: "174379".to_string(),
        passkey: "passkey".to_string(),
        callback_url: "https://ticketing.example.com/mpesa/callback".to_string(),
    }
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/oauth/v1/generate"))
        .and(query_param("grant_type", "client_credentials"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "sandbox-token",
            "expires_in": "3599"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetches_access_token_with_basic_auth() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let client = MpesaClient::new(config(&server.uri())).unwrap();
    let token = client.access_token().await.unwrap();

    assert_eq!(token, "sandbox-token");
}

#[tokio::test]
async fn stk_push_sends_normalized_request() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let payment_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/mpesa/stkpush/v1/processrequest"))
        .and(header("authorization", "Bearer sandbox-token"))
        .and(body_partial_json(json!({
            "BusinessShortCode": "174379",
            "TransactionType": "CustomerPayBillOnline",
            "Amount": 1501,
            "PartyA": "254712345678",
            "PartyB": "174379",
            "PhoneNumber": "254712345678",
            "CallBackURL": format!("https://ticketing.example.com/mpesa/callback?payment_id={payment_id}"),
            "AccountReference": "EventBooking",
            "TransactionDesc": "Ticket Payment"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MerchantRequestID": "29115-34620561-1",
            "CheckoutRequestID": "ws_CO_191220191020363925",
            "ResponseCode": "0",
            "CustomerMessage": "Success. Request accepted for processing"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MpesaClient::new(config(&server.uri())).unwrap();
    let data = client
        .stk_push("0712 345 678", Decimal::new(150050, 2), payment_id)
        .await
        .unwrap();

    assert_eq!(data["ResponseCode"], "0");
}

#[tokio::test]
async fn gateway_rejection_is_upstream_error() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/mpesa/stkpush/v1/processrequest"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "errorCode": "500.001.1001",
            "errorMessage": "Unable to lock subscriber"
        })))
        .mount(&server)
        .await;

    let client = MpesaClient::new(config(&server.uri())).unwrap();
    let err = client
        .stk_push("0712345678", Decimal::new(100, 0), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Upstream(_)));
}

#[tokio::test]
async fn token_failure_stops_before_push() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oauth/v1/generate"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mpesa/stkpush/v1/processrequest"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = MpesaClient::new(config(&server.uri())).unwrap();
    let err = client
        .stk_push("0712345678", Decimal::new(100, 0), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Upstream(_)));
}

#[tokio::test]
async fn invalid_phone_is_rejected_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = MpesaClient::new(config(&server.uri())).unwrap();
    let err = client
        .stk_push("12345", Decimal::new(100, 0), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}
