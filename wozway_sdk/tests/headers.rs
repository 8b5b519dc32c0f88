mod common;
use common::*;

use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use wozway_sdk::prelude::*;
use wozway_test_support::{MockReply, assert_request, json_bytes, mock};

#[tokio::test]
async fn user_agent_and_accept_on_every_call() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&widget())))
        .build();
    let sdk = sdk(transport);

    sdk.request(GetWidget {
        widget_id: "w1".into(),
        request_id: Some("req-7".into()),
    })
    .await
    .unwrap();

    assert_request(&handle.last())
        .header(USER_AGENT, wozway_sdk::USER_AGENT)
        .header_starts_with(USER_AGENT, "wozway-sdk-rust/")
        .header(ACCEPT, "application/json")
        .header("x-request-id", "req-7")
        .header_absent(CONTENT_TYPE)
        .body_absent();
    handle.finish();
}

#[tokio::test]
async fn custom_user_agent_replaces_the_default() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&widget())))
        .build();
    let sdk = builder(transport).user_agent("acme-bot/1").build().unwrap();

    sdk.request(GetWidget {
        widget_id: "w1".into(),
        request_id: None,
    })
    .await
    .unwrap();

    assert_request(&handle.last()).header(USER_AGENT, "acme-bot/1");
    handle.finish();
}

#[tokio::test]
async fn head_requests_skip_accept() {
    let (transport, handle) = mock().reply(MockReply::status(http::StatusCode::OK)).build();
    let sdk = sdk(transport);

    sdk.request(CheckWidget {
        widget_id: "w1".into(),
    })
    .await
    .unwrap();

    assert_request(&handle.last())
        .method(http::Method::HEAD)
        .header_absent(ACCEPT);
    handle.finish();
}

#[tokio::test]
async fn no_content_endpoints_send_no_accept() {
    let (transport, handle) = mock()
        .reply(MockReply::status(http::StatusCode::NO_CONTENT))
        .build();
    let sdk = sdk(transport);

    sdk.request(PatchWidget {
        widget_id: "w1".into(),
        body: None,
    })
    .await
    .unwrap();

    assert_request(&handle.last())
        .method(http::Method::PATCH)
        .header_absent(ACCEPT)
        .body_absent();
    handle.finish();
}

#[tokio::test]
async fn timeouts_layer_per_request() {
    use std::time::Duration;

    let reply = || MockReply::ok_json(json_bytes(&widget()));
    let (transport, handle) = mock().replies([reply(), reply(), reply()]).build();
    let sdk = builder(transport)
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap();
    let ep = || GetWidget {
        widget_id: "w1".into(),
        request_id: None,
    };

    sdk.request(ep()).await.unwrap();
    assert_request(&handle.last()).timeout(Some(Duration::from_secs(30)));

    sdk.request(ep()).timeout(Duration::from_secs(2)).await.unwrap();
    assert_request(&handle.last()).timeout(Some(Duration::from_secs(2)));

    sdk.request(ep()).clear_timeout().await.unwrap();
    assert_request(&handle.last()).timeout(None);

    handle.finish();
}
