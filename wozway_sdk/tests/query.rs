mod common;
use common::*;

use std::collections::BTreeMap;
use wozway_sdk::prelude::*;
use wozway_test_support::{MockReply, assert_request, json_bytes, mock};

fn list_reply() -> MockReply {
    MockReply::ok_json(json_bytes(&vec![widget()]))
}

#[tokio::test]
async fn form_styles_explode_and_collapse() {
    let (transport, handle) = mock().reply(list_reply()).build();
    let sdk = sdk(transport);

    let out = sdk
        .request(ListWidgets {
            tag: Some(vec!["red".into(), "blue".into()]),
            ids: Some(vec![1, 2, 3]),
            kinds: Some(vec!["a".into(), "b".into()]),
            page_size: Some(20),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(out, vec![widget()]);

    let req = handle.last();
    assert_request(&req)
        .operation("listWidgets")
        .method(http::Method::GET)
        .path("/widgets")
        .query_values("tag", &["red", "blue"])
        .query_values("ids", &["1,2,3"])
        .query_values("kinds", &["a|b"])
        .query_values("pageSize", &["20"])
        .query_keys_exact(&["tag", "ids", "kinds", "pageSize"]);
    assert_eq!(
        req.url.query(),
        Some("tag=red&tag=blue&ids=1%2C2%2C3&kinds=a%7Cb&pageSize=20")
    );
    handle.finish();
}

#[tokio::test]
async fn unset_params_are_left_out() {
    let (transport, handle) = mock().reply(list_reply()).build();
    let sdk = sdk(transport);

    sdk.request(ListWidgets::default()).await.unwrap();

    assert_eq!(handle.last().url.query(), None);
    handle.finish();
}

#[tokio::test]
async fn deep_object_and_exploded_object() {
    let (transport, handle) = mock().reply(list_reply()).build();
    let sdk = sdk(transport);

    let mut filter = BTreeMap::new();
    filter.insert("color".to_string(), "red".to_string());
    filter.insert("size".to_string(), "xl".to_string());

    sdk.request(ListWidgets {
        filter: Some(filter),
        range: Some(Range {
            from: Some(1),
            to: None,
        }),
        ..Default::default()
    })
    .await
    .unwrap();

    assert_request(&handle.last())
        .query_values("filter[color]", &["red"])
        .query_values("filter[size]", &["xl"])
        .query_values("from", &["1"])
        .query_absent("to")
        .query_absent("range");
    handle.finish();
}

#[tokio::test]
async fn json_serialized_query_param() {
    let (transport, handle) = mock().reply(list_reply()).build();
    let sdk = sdk(transport);

    sdk.request(ListWidgets {
        sort: Some(serde_json::json!({"by": "name", "desc": true})),
        ..Default::default()
    })
    .await
    .unwrap();

    assert_request(&handle.last()).query_values("sort", &[r#"{"by":"name","desc":true}"#]);
    handle.finish();
}

#[tokio::test]
async fn globals_fill_unset_fields_and_append_the_rest() {
    let (transport, handle) = mock().replies([list_reply(), list_reply()]).build();
    let globals = Globals::from_params(&TenantGlobals {
        tenant: Some("acme".into()),
        page_size: Some(50),
        region: Some("eu".into()),
    })
    .unwrap();
    let sdk = builder(transport).globals(globals).build().unwrap();

    sdk.request(ListWidgets::default()).await.unwrap();
    assert_request(&handle.last())
        .query_values("pageSize", &["50"])
        .query_values("region", &["eu"])
        .header("x-tenant", "acme");

    sdk.request(ListWidgets {
        page_size: Some(5),
        tenant: Some("globex".into()),
        ..Default::default()
    })
    .await
    .unwrap();
    assert_request(&handle.last())
        .query_values("pageSize", &["5"])
        .header("x-tenant", "globex");

    handle.finish();
}
