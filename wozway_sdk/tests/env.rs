mod common;
use common::*;

use http::header::AUTHORIZATION;
use wozway_sdk::{ENV_BEARER_AUTH, ENV_SERVER_URL, WozwayBuilder};
use wozway_test_support::{MockReply, assert_request, json_bytes, mock};

// Only test in this binary: it mutates the process environment.
#[tokio::test]
async fn builder_reads_server_and_token_from_env() {
    unsafe {
        std::env::set_var(ENV_SERVER_URL, "http://127.0.0.1:9000/");
        std::env::set_var(ENV_BEARER_AUTH, "env-token");
    }

    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&widget())))
        .build();
    let sdk = WozwayBuilder::from_env().transport(transport).build().unwrap();
    assert_eq!(sdk.client().server_url(), "http://127.0.0.1:9000");

    sdk.request(GetWidget {
        widget_id: "w1".into(),
        request_id: None,
    })
    .await
    .unwrap();

    assert_request(&handle.last())
        .host("127.0.0.1")
        .header(AUTHORIZATION, "Bearer env-token");
    handle.finish();

    unsafe {
        std::env::remove_var(ENV_SERVER_URL);
        std::env::remove_var(ENV_BEARER_AUTH);
    }
    let sdk = WozwayBuilder::from_env().build().unwrap();
    assert_eq!(sdk.client().server_url(), "https://api.wozway.com");
}
