//! Integration tests for [`HttpOrderClient`] against a local one-shot server.

use serde_json::Value;
use testresult::TestResult;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

use teakworld::{
    cart::{CartStore, MemoryStorage, NewCartItem},
    orders::{
        CheckoutForm, HttpOrderClient, OrderClient, OrderError, OrderPayload, ValidationError,
        prepare_order,
    },
};

/// Serve exactly one request with `status` and `body`, returning the raw
/// request once the response is written.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> Result<(String, JoinHandle<std::io::Result<String>>), std::io::Error> {
    serve_raw(format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    ))
    .await
}

/// Serve exactly one request with a verbatim `response`.
async fn serve_raw(
    response: String,
) -> Result<(String, JoinHandle<std::io::Result<String>>), std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let handle = tokio::spawn(async move {
        let (mut socket, _peer) = listener.accept().await?;
        let mut request = Vec::new();
        let mut buf = [0_u8; 4096];

        loop {
            let read = socket.read(&mut buf).await?;

            if read == 0 {
                break;
            }

            request.extend(buf.iter().take(read));

            if request_complete(&request) {
                break;
            }
        }

        socket.write_all(response.as_bytes()).await?;
        socket.shutdown().await?;

        Ok(String::from_utf8_lossy(&request).into_owned())
    });

    Ok((base_url, handle))
}

fn request_complete(request: &[u8]) -> bool {
    let text = String::from_utf8_lossy(request);

    let Some((head, body)) = text.split_once("\r\n\r\n") else {
        return false;
    };

    let length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _value)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_name, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    body.len() >= length
}

fn payload() -> Result<OrderPayload, ValidationError> {
    let mut store = CartStore::new(MemoryStorage::new());
    store.add_item(NewCartItem::new("prod-002", "Teak Lounge Chair", 76_415).with_variant("Honey"));

    let form = CheckoutForm {
        email: "ada@example.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: "12 Elm St".to_string(),
        city: "Port Louis".to_string(),
        state: String::new(),
        zip_code: "11302".to_string(),
        country: "Mauritius".to_string(),
        ..CheckoutForm::default()
    };

    prepare_order(&form, store.items())
}

#[tokio::test]
async fn created_order_is_confirmed() -> TestResult {
    let (base_url, server) = serve_once(
        "201 Created",
        r#"{"message":"Order created","documentId":"order-123"}"#,
    )
    .await?;

    let client = HttpOrderClient::new(format!("{base_url}/"));
    let confirmation = client.submit(&payload()?).await?;

    assert_eq!(confirmation.message, "Order created");
    assert_eq!(confirmation.document_id, "order-123");

    let request = server.await??;
    let (head, body) = request.split_once("\r\n\r\n").ok_or("malformed request")?;

    assert!(head.starts_with("POST /api/create-order HTTP/1.1"), "{head}");

    let body: Value = serde_json::from_str(body)?;

    assert_eq!(body["data"]["street"], "12 Elm St");
    assert_eq!(body["data"]["postCode"], "11302");
    assert_eq!(body["data"]["delivery"], "free");
    assert_eq!(body["data"]["items"][0]["documentId"], "prod-002");
    assert_eq!(body["data"]["items"][0]["color"], "Honey");
    assert!(body["data"].get("state").is_none(), "{body}");

    Ok(())
}

#[tokio::test]
async fn server_error_message_is_surfaced() -> TestResult {
    let (base_url, server) = serve_once(
        "400 Bad Request",
        r#"{"error":{"message":"Invalid delivery method"}}"#,
    )
    .await?;

    let client = HttpOrderClient::new(base_url);
    let result = client.submit(&payload()?).await;

    server.await??;

    let Err(error) = result else {
        panic!("a 400 response should fail");
    };

    assert!(matches!(error, OrderError::Rejected { status: 400, .. }));
    assert_eq!(error.to_string(), "Order failed: Invalid delivery method");

    Ok(())
}

#[tokio::test]
async fn status_text_is_used_without_a_message() -> TestResult {
    let (base_url, server) = serve_once("503 Service Unavailable", "{}").await?;

    let client = HttpOrderClient::new(base_url);
    let result = client.submit(&payload()?).await;

    server.await??;

    assert_eq!(
        result.err().map(|error| error.to_string()),
        Some("Order failed: Service Unavailable".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn truncated_error_body_falls_back_to_status_text() -> TestResult {
    let (base_url, server) = serve_raw(
        "HTTP/1.1 400 Bad Request\r\ncontent-type: application/json\r\ncontent-length: 500\r\nconnection: close\r\n\r\n{\"err".to_string(),
    )
    .await?;

    let client = HttpOrderClient::new(base_url);
    let result = client.submit(&payload()?).await;

    server.await??;

    let Err(error) = result else {
        panic!("a 400 response should fail");
    };

    assert!(matches!(error, OrderError::Rejected { status: 400, .. }));
    assert_eq!(error.to_string(), "Order failed: Bad Request");

    Ok(())
}

#[tokio::test]
async fn custom_reason_phrase_is_surfaced() -> TestResult {
    let (base_url, server) = serve_once("409 Delivery Slot Taken", "{}").await?;

    let client = HttpOrderClient::new(base_url);
    let result = client.submit(&payload()?).await;

    server.await??;

    assert_eq!(
        result.err().map(|error| error.to_string()),
        Some("Order failed: Delivery Slot Taken".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() -> TestResult {
    let client = HttpOrderClient::new("http://127.0.0.1:9");

    let result = client.submit(&payload()?).await;

    assert!(matches!(result, Err(OrderError::Transport(_))));

    Ok(())
}
