mod common;
use common::*;

use wozway_sdk::prelude::*;
use wozway_test_support::{MockReply, assert_request, json_bytes, mock};

#[tokio::test]
async fn path_params_are_percent_encoded() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&widget())))
        .build();
    let sdk = sdk(transport);

    let got = sdk
        .request(GetWidget {
            widget_id: "a b/c".into(),
            request_id: None,
        })
        .await
        .unwrap();
    assert_eq!(got, widget());

    assert_request(&handle.last())
        .host("api.test")
        .path("/widgets/a%20b%2Fc")
        .header_absent("x-request-id");
    handle.finish();
}

#[tokio::test]
async fn exploded_object_in_path() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_text("seg".into()))
        .build();
    let sdk = sdk(transport);

    let got = sdk
        .request(GetSegment {
            key: "k".into(),
            range: Range {
                from: Some(1),
                to: Some(9),
            },
        })
        .await
        .unwrap();
    assert_eq!(got, "seg");

    assert_request(&handle.last()).path("/segments/k/from=1,to=9");
    handle.finish();
}

#[tokio::test]
async fn server_url_keeps_its_base_path() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&widget())))
        .build();
    let sdk = wozway_sdk::Wozway::builder()
        .server_url("http://localhost:8080/v2/")
        .transport(transport)
        .build()
        .unwrap();
    assert_eq!(sdk.client().server_url(), "http://localhost:8080/v2");

    sdk.request(GetWidget {
        widget_id: "w1".into(),
        request_id: None,
    })
    .await
    .unwrap();

    assert_request(&handle.last())
        .host("localhost")
        .path("/v2/widgets/w1");
    handle.finish();
}

#[tokio::test]
async fn per_request_server_override() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&widget())))
        .build();
    let sdk = sdk(transport);

    sdk.request(GetWidget {
        widget_id: "w1".into(),
        request_id: None,
    })
    .server_url("https://eu.api.test/")
    .await
    .unwrap();

    assert_request(&handle.last())
        .host("eu.api.test")
        .path("/widgets/w1");
    handle.finish();
}
