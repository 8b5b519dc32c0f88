//! Mock transport and request assertions for driving the client in tests.

mod assert;
mod mock;

pub use assert::{RequestAssert, assert_request};
pub use mock::{MockBuilder, MockHandle, MockReply, MockTransport, SentRequest, mock};

use bytes::Bytes;
use serde::Serialize;

pub fn json_bytes<T: Serialize>(v: &T) -> Bytes {
    Bytes::from(serde_json::to_vec(v).expect("serializable test value"))
}
