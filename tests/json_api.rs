// JSON API client against an in-process mock provider
mod common;

use common::Reply;
use reqwest::Method;
use smartpost::{
    Client, ClientConfig, Country, Error, ErrorCode, LabelFormat, ParcelApi, PlaceKind,
    Recipient, ShipmentDestination, ShipmentOrder, ShipmentSource, TerminalType, Weight,
};
use tokio_test::{assert_err, assert_ok};

const PLACES: &str = r#"{"places": {"item": [{
    "place_id": "123", "name": "Tallinn Kristiine", "city": "Tallinn",
    "address": "Endla 45", "country": "EE", "postalcode": "10615",
    "routingcode": "101", "availability": "E-P 8:00-22:00", "description": "",
    "type": "apt", "lat": "59.1", "lng": "24.7", "group_id": "4",
    "group_name": "Tallinn", "group_sort": "1",
    "created_date": "2020-01-01 10:00:00", "updated_date": "2023-05-04 08:30:00"
}]}}"#;

fn client_for(base_url: &str) -> Client {
    Client::with_config("test-api-key", ClientConfig::default().with_base_url(base_url)).unwrap()
}

fn order() -> ShipmentOrder {
    ShipmentOrder::new(
        ShipmentSource::new(Country::Ee),
        Recipient::new("Mari Maasikas", "+3725555555"),
        ShipmentDestination::Terminal {
            place_id: "123".to_string(),
            country: Country::Ee,
        },
    )
}

#[tokio::test]
async fn places_are_decoded_and_authenticated() {
    let server = common::start(Reply::json(200, PLACES)).await;
    let client = client_for(&server.base_url);

    let places = client.ee_terminals().await.unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].place_id, "123");
    assert_eq!(places[0].lat, 59.1);
    assert_eq!(places[0].kind, PlaceKind::Apt);

    let request = server.only_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/api/ext/v1/places");
    assert_eq!(request.query_values("country"), ["EE"]);
    assert_eq!(request.query_values("type"), ["APT"]);
    assert!(request.query_values("filter").is_empty());
    assert_eq!(request.header("authorization"), Some("test-api-key"));
    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn convenience_listings_send_their_filters() {
    let server = common::start(Reply::json(200, r#"{"places": {"item": []}}"#)).await;
    let client = client_for(&server.base_url);

    assert_ok!(client.ee_express_terminals().await);
    assert_ok!(client.fi_post_offices().await);
    assert_ok!(
        client
            .terminals(Country::Lv, TerminalType::ParcelTerminal, None)
            .await
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].query_values("filter"), ["express"]);
    assert_eq!(requests[1].query_values("country"), ["FI"]);
    assert_eq!(requests[1].query_values("type"), ["PO"]);
    assert_eq!(requests[2].query_values("country"), ["LV"]);
}

#[tokio::test]
async fn listing_error_status_is_a_transport_error() {
    let server = common::start(Reply::json(503, r#"{"message": "down"}"#)).await;
    let client = client_for(&server.base_url);

    let err = client.fi_terminals().await.unwrap_err();
    match err {
        Error::Transport(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(503)),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn listing_without_items_is_a_decode_error() {
    let server = common::start(Reply::json(200, r#"{"places": {}}"#)).await;
    let client = client_for(&server.base_url);
    let err = assert_err!(client.fi_terminals().await);
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn minimal_order_round_trip() {
    let server = common::start(Reply::json(200, r#"{"orders": {"item": [{"barcode": "JJFI1"}]}}"#)).await;
    let client = client_for(&server.base_url);

    let accepted = client.submit_orders(&[order()], &[]).await.unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].barcode, "JJFI1");
    assert_eq!(accepted[0].reference, None);
    assert_eq!(accepted[0].sender, None);

    let request = server.only_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/ext/v1/orders");
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "orders": {
                "report": [],
                "item": [{
                    "source": {"country": "ee"},
                    "recipient": {"name": "Mari Maasikas", "phone": "+3725555555"},
                    "destination": {"place_id": "123", "country": "ee"}
                }]
            }
        })
    );
}

#[tokio::test]
async fn door_code_is_returned_as_number() {
    let server = common::start(Reply::json(
        200,
        r#"{"orders": {"item": [{"barcode": "JJFI2", "reference": "R2", "sender": {"doorcode": "5521"}}]}}"#,
    ))
    .await;
    let client = client_for(&server.base_url);

    let order = order()
        .with_reference("R2")
        .with_weight(Weight::new(1.5).unwrap())
        .with_sender(smartpost::Sender::new("Shop", "+3725000000"));
    let accepted = client
        .submit_orders(&[order], &["ops@example.com".to_string()])
        .await
        .unwrap();
    assert_eq!(accepted[0].sender.map(|s| s.doorcode), Some(5521));

    let body: serde_json::Value = serde_json::from_slice(&server.only_request().body).unwrap();
    assert_eq!(body["orders"]["report"], serde_json::json!(["ops@example.com"]));
    assert_eq!(body["orders"]["item"][0]["weight"], serde_json::json!(1.5));
}

#[tokio::test]
async fn bad_request_becomes_order_rejection() {
    let server = common::start(Reply::json(
        400,
        r#"{"error": {"item": [{"code": "002", "text": "Barcode exists", "input": "JJFI1"}]}}"#,
    ))
    .await;
    let client = client_for(&server.base_url);

    let err = client.submit_orders(&[order()], &[]).await.unwrap_err();
    let Error::OrderRejected(rejection) = err else {
        panic!("expected an order rejection, got {err:?}");
    };
    assert_eq!(rejection.errors.len(), 1);
    assert_eq!(rejection.errors[0].code, ErrorCode::BarcodeExists);
    assert_eq!(rejection.errors[0].message, "Barcode already exists");
    assert_eq!(rejection.errors[0].input.as_deref(), Some("JJFI1"));
}

#[tokio::test]
async fn rejection_with_unknown_code_is_a_decode_error() {
    let server = common::start(Reply::json(
        400,
        r#"{"error": {"item": [{"code": "999", "text": "?"}]}}"#,
    ))
    .await;
    let client = client_for(&server.base_url);
    let err = client.submit_orders(&[order()], &[]).await.unwrap_err();
    assert!(matches!(err, Error::Decode(smartpost::DecodeError::UnknownErrorCode(_))));
}

#[tokio::test]
async fn label_bytes_are_returned_unchanged() {
    let pdf = b"%PDF-1.4\n\x00\x01binary\xff";
    let server = common::start(Reply::pdf(200, pdf)).await;
    let client = client_for(&server.base_url);

    let barcodes = vec!["JJFI1".to_string(), "JJFI2".to_string()];
    let bytes = client.labels(LabelFormat::A6x4, &barcodes).await.unwrap();
    assert_eq!(bytes.as_ref(), pdf);

    let request = server.only_request();
    assert_eq!(request.path, "/api/ext/v1/labels");
    assert_eq!(request.query_values("format"), ["A6-4"]);
    assert_eq!(request.query_values("barcode"), ["JJFI1", "JJFI2"]);
}

#[tokio::test]
async fn label_failure_keeps_status_and_body() {
    let server = common::start(Reply::json(500, "internal failure")).await;
    let client = client_for(&server.base_url);

    let err = client
        .labels(LabelFormat::A5, &["JJFI1".to_string()])
        .await
        .unwrap_err();
    let Error::Labels(failure) = err else {
        panic!("expected a label failure, got {err:?}");
    };
    assert_eq!(failure.status_code, 500);
    assert_eq!(failure.body.as_ref(), b"internal failure");
}

#[tokio::test]
async fn transport_survives_close() {
    let server = common::start(Reply::json(200, r#"{"places": {"item": []}}"#)).await;
    let client = client_for(&server.base_url);

    assert_ok!(client.fi_terminals().await);
    client.close();
    assert_ok!(client.fi_terminals().await);
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn label_barcodes_are_url_encoded() {
    let server = common::start(Reply::pdf(200, b"%PDF")).await;
    let client = client_for(&server.base_url);

    let barcodes = vec!["JJ FI/1+2".to_string(), "ä&b=c".to_string()];
    assert_ok!(client.labels(LabelFormat::A7, &barcodes).await);
    assert_eq!(
        server.only_request().query_values("barcode"),
        ["JJ FI/1+2", "ä&b=c"]
    );
}
