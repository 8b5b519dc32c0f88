mod common;
use common::*;

use wozway_core::metadata::{Channel, ParamMetadata, Style};
use wozway_sdk::prelude::*;

#[test]
fn derived_fields_carry_names_and_tags() {
    let ep = ListWidgets {
        ids: Some(vec![4, 5]),
        page_size: Some(10),
        ..Default::default()
    };

    let fields = ep.fields().unwrap();
    let names: Vec<_> = fields.iter().map(|f| (f.name, f.wire_name)).collect();
    assert_eq!(
        names,
        vec![
            ("tag", "tag"),
            ("ids", "ids"),
            ("kinds", "kinds"),
            ("filter", "filter"),
            ("range", "range"),
            ("sort", "sort"),
            ("page_size", "pageSize"),
            ("tenant", "X-Tenant"),
        ]
    );

    let ids = &fields[1];
    assert_eq!(
        ids.param(Channel::Query),
        Some(&ParamMetadata {
            explode: false,
            ..ParamMetadata::query()
        })
    );
    assert_eq!(
        ids.value,
        ParamValue::List(vec![ParamValue::scalar(4), ParamValue::scalar(5)])
    );
    assert_eq!(fields[0].value, ParamValue::Null);
    assert_eq!(
        fields[2].param(Channel::Query).map(|m| m.style),
        Some(Style::PipeDelimited)
    );
}

#[test]
fn fields_with_filters_by_channel() {
    let ep = ListWidgets::default();
    let headers: Vec<_> = ep
        .fields_with(Channel::Header)
        .unwrap()
        .into_iter()
        .map(|f| f.wire_name)
        .collect();
    assert_eq!(headers, vec!["X-Tenant"]);
    assert!(ep.fields_with(Channel::Path).unwrap().is_empty());
}

#[test]
fn request_field_stays_out_of_params() {
    let ep = CreateWidget { body: widget() };
    assert!(ep.fields().unwrap().is_empty());

    let body = ep.request_body().unwrap().expect("body");
    assert_eq!(body.media_type, "application/json");
    assert_eq!(&body.content[..], br#"{"id":"w1","name":"gear"}"#);
}

#[test]
fn nested_struct_becomes_an_object() {
    let range = Range {
        from: Some(1),
        to: None,
    };
    match range.to_param().unwrap() {
        ParamValue::Object(fields) => {
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[0].value, ParamValue::scalar(1));
            assert!(!fields[1].value.is_set());
        }
        other => panic!("expected object, got {other:?}"),
    }
}

#[test]
fn endpoint_constants_come_from_the_attribute() {
    assert_eq!(<ListWidgets as Endpoint>::OPERATION_ID, "listWidgets");
    assert_eq!(<ListWidgets as Endpoint>::METHOD, http::Method::GET);
    assert_eq!(<ListWidgets as Endpoint>::PATH, "/widgets");
    assert_eq!(<ListWidgets as Endpoint>::ERROR_STATUS_CODES, &["4XX", "5XX"]);
    assert_eq!(<DownloadBlob as Endpoint>::SUCCESS_STATUS_CODES, &["200"]);
    assert_eq!(<DownloadBlob as Endpoint>::ERROR_STATUS_CODES, &["404", "5XX"]);
    assert_eq!(<DownloadBlob as Endpoint>::accept_content_type(), "application/octet-stream");
    assert!(<CheckWidget as Endpoint>::response_is_no_content());
}
