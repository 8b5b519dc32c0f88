#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wozway_sdk::models::Security;
use wozway_sdk::prelude::*;
use wozway_sdk::{Wozway, WozwayBuilder};
use wozway_test_support::MockTransport;

pub const BASE: &str = "https://api.test";

pub fn builder(transport: MockTransport) -> WozwayBuilder {
    Wozway::builder().server_url(BASE).transport(transport)
}

pub fn sdk(transport: MockTransport) -> Wozway {
    builder(transport).build().unwrap()
}

pub fn authed(transport: MockTransport, token: &str) -> Wozway {
    builder(transport)
        .security(Security::bearer(token))
        .build()
        .unwrap()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub name: String,
}

pub fn widget() -> Widget {
    Widget {
        id: "w1".into(),
        name: "gear".into(),
    }
}

#[derive(Clone, Debug, Default, Params)]
#[wozway(endpoint(id = "getWidget", method = "get", path = "/widgets/{widget_id}", response = Json<Widget>))]
pub struct GetWidget {
    #[wozway(path)]
    pub widget_id: String,
    #[wozway(header, name = "X-Request-Id")]
    pub request_id: Option<String>,
}

#[derive(Clone, Debug, Default, Params)]
pub struct Range {
    #[wozway(path, query)]
    pub from: Option<u32>,
    #[wozway(path, query)]
    pub to: Option<u32>,
}

#[derive(Clone, Debug, Default, Params)]
#[wozway(endpoint(id = "listWidgets", method = "get", path = "/widgets", response = Json<Vec<Widget>>))]
pub struct ListWidgets {
    #[wozway(query)]
    pub tag: Option<Vec<String>>,
    #[wozway(query(explode = false))]
    pub ids: Option<Vec<u32>>,
    #[wozway(query(style = "pipeDelimited", explode = false))]
    pub kinds: Option<Vec<String>>,
    #[wozway(query(style = "deepObject"), name = "filter")]
    pub filter: Option<BTreeMap<String, String>>,
    #[wozway(query)]
    pub range: Option<Range>,
    #[wozway(query(serialization = "json"))]
    pub sort: Option<serde_json::Value>,
    #[wozway(query, name = "pageSize")]
    pub page_size: Option<u32>,
    #[wozway(header, name = "X-Tenant")]
    pub tenant: Option<String>,
}

#[derive(Clone, Debug, Default, Params)]
#[wozway(endpoint(id = "getSegment", method = "get", path = "/segments/{key}/{range}", response = Text))]
pub struct GetSegment {
    #[wozway(path)]
    pub key: String,
    #[wozway(path(explode = true))]
    pub range: Range,
}

#[derive(Clone, Debug, Default, Params)]
#[wozway(endpoint(id = "checkWidget", method = "head", path = "/widgets/{widget_id}"))]
pub struct CheckWidget {
    #[wozway(path)]
    pub widget_id: String,
}

#[derive(Clone, Debug, Params)]
#[wozway(endpoint(id = "createWidget", method = "post", path = "/widgets", response = Json<Widget>, success_codes = ["201"]))]
pub struct CreateWidget {
    #[wozway(request(media_type = "application/json"))]
    pub body: Widget,
}

#[derive(Clone, Debug, Params)]
#[wozway(endpoint(id = "importWidget", method = "post", path = "/widgets/import", response = Json<Widget>, success_codes = ["201"]))]
pub struct ImportWidget {
    #[wozway(header, name = "Content-Type")]
    pub content_type: Option<String>,
    #[wozway(request(media_type = "application/json"))]
    pub body: Widget,
}

#[derive(Clone, Debug, Default, Params)]
#[wozway(endpoint(id = "patchWidget", method = "patch", path = "/widgets/{widget_id}", response = NoContent, success_codes = ["204"]))]
pub struct PatchWidget {
    #[wozway(path)]
    pub widget_id: String,
    #[wozway(request(media_type = "application/merge-patch+json"))]
    pub body: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, Params)]
#[wozway(endpoint(id = "resetWidget", method = "put", path = "/widgets/{widget_id}/state", response = NoContent, success_codes = ["204"]))]
pub struct ResetWidget {
    #[wozway(path)]
    pub widget_id: String,
    #[wozway(request(media_type = "application/json", nullable))]
    pub body: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, Params)]
pub struct LoginForm {
    #[wozway(form)]
    pub username: String,
    #[wozway(form)]
    pub scopes: Vec<String>,
    #[wozway(form(json))]
    pub meta: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, Params)]
#[wozway(endpoint(id = "login", method = "post", path = "/login", response = Text))]
pub struct Login {
    #[wozway(request(media_type = "application/x-www-form-urlencoded"))]
    pub body: LoginForm,
}

#[derive(Clone, Debug, Params)]
pub struct UploadForm {
    #[wozway(multipart(file))]
    pub file: FilePart,
    #[wozway(multipart)]
    pub labels: Vec<String>,
    #[wozway(multipart(json))]
    pub meta: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Params)]
#[wozway(endpoint(id = "uploadAttachment", method = "post", path = "/attachments", response = NoContent, success_codes = ["2XX"]))]
pub struct UploadAttachment {
    #[wozway(request(media_type = "multipart/form-data"))]
    pub body: UploadForm,
}

#[derive(Clone, Debug, Default, Params)]
#[wozway(endpoint(id = "putBlob", method = "put", path = "/blobs/{name}", response = NoContent, success_codes = ["204"]))]
pub struct PutBlob {
    #[wozway(path)]
    pub name: String,
    #[wozway(request(media_type = "image/png"))]
    pub body: Vec<u8>,
}

#[derive(Clone, Debug, Default, Params)]
#[wozway(endpoint(id = "postNote", method = "post", path = "/notes", response = Text))]
pub struct PostNote {
    #[wozway(request(media_type = "text/plain; charset=utf-8"))]
    pub body: Option<String>,
}

#[derive(Clone, Debug, Default, Params)]
#[wozway(endpoint(id = "downloadBlob", method = "get", path = "/blobs/{name}", response = Binary, success_codes = ["200"], error_codes = ["404", "5XX"]))]
pub struct DownloadBlob {
    #[wozway(path)]
    pub name: String,
}

/// Values the client fills in for any operation that declares them.
#[derive(Clone, Debug, Default, Params)]
pub struct TenantGlobals {
    #[wozway(header, name = "X-Tenant")]
    pub tenant: Option<String>,
    #[wozway(query, name = "pageSize")]
    pub page_size: Option<u32>,
    #[wozway(query, name = "region")]
    pub region: Option<String>,
}
