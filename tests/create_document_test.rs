use crpt_api::{CrptApi, CrptError, Description, Document, Product, TimeUnit};
use httpmock::prelude::*;
use std::time::{Duration, Instant};

fn sample_document() -> Document {
    let mut document = Document {
        description: Some(Description {
            participant_inn: Some("7700000000".to_string()),
        }),
        doc_id: Some("123".to_string()),
        doc_type: Some("LP_INTRODUCE_GOODS".to_string()),
        owner_inn: Some("7700000000".to_string()),
        ..Default::default()
    };
    document.add_product(Product {
        tnved_code: Some("6401".to_string()),
        uit_code: Some("0104630034070012".to_string()),
        ..Default::default()
    });
    document
}

#[tokio::test]
async fn test_create_document_success() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v3/lk/documents/create")
            .header("content-type", "application/json")
            .header("authorization", "Bearer test-token")
            .body_contains("\"doc_id\":\"123\"")
            .body_contains("\"participantInn\":\"7700000000\"");
        then.status(200).body("success");
    });

    let api = CrptApi::new(TimeUnit::Seconds, 10)
        .unwrap()
        .with_endpoint(server.url("/api/v3/lk/documents/create"));

    let response = api
        .create_document(&sample_document(), "Bearer test-token")
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(response, "success");
}

#[tokio::test]
async fn test_create_document_failure() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/create");
        then.status(400).body("error");
    });

    let url = server.url("/create");
    let api = CrptApi::new(TimeUnit::Seconds, 10)
        .unwrap()
        .with_endpoint(url.clone());

    let err = api
        .create_document(&Document::default(), "Bearer test-token")
        .await
        .unwrap_err();

    api_mock.assert();
    assert_eq!(
        err.to_string(),
        format!(
            "Unexpected code Response{{code=400, message=Bad Request, url={}}}",
            url
        )
    );
    assert!(matches!(err, CrptError::UnexpectedStatus { status: 400, .. }));
}

#[tokio::test]
async fn test_request_limit_delays_fourth_request() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/create");
        then.status(200).body("success");
    });

    let started = Instant::now();
    let api = CrptApi::new(TimeUnit::Seconds, 3)
        .unwrap()
        .with_endpoint(server.url("/create"));
    let document = sample_document();

    for _ in 0..3 {
        api.create_document(&document, "Bearer test-token").await.unwrap();
    }
    api_mock.assert_hits(3);

    api.create_document(&document, "Bearer test-token").await.unwrap();

    api_mock.assert_hits(4);
    assert!(
        started.elapsed() >= Duration::from_millis(1000),
        "The fourth request was not delayed correctly."
    );
}

#[tokio::test]
async fn test_concurrent_callers_share_limit() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/create");
        then.status(200).body("success");
    });

    let started = Instant::now();
    let api = CrptApi::new(TimeUnit::Seconds, 2)
        .unwrap()
        .with_endpoint(server.url("/create"));

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let api = api.clone();
        tasks.push(tokio::spawn(async move {
            api.create_document(&Document::default(), "Bearer test-token")
                .await
        }));
    }

    for task in tasks {
        tokio_test::assert_ok!(task.await.unwrap());
    }

    api_mock.assert_hits(4);
    assert!(started.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test]
async fn test_invalid_request_limit() {
    let err = CrptApi::new(TimeUnit::Seconds, 0).unwrap_err();
    assert_eq!(err.to_string(), "Request limit must be a positive number.");
}
