use crate::error::SdkError;
use crate::params::{FilePart, ParamValue};
use bytes::{BufMut, Bytes, BytesMut};

pub const MULTIPART_MEDIA_TYPE: &str = "multipart/form-data";

#[derive(Clone, Debug, PartialEq)]
pub enum Part {
    Text { name: String, value: String },
    File {
        name: String,
        file: FilePart,
    },
}

impl Part {
    pub fn name(&self) -> &str {
        match self {
            Part::Text { name, .. } | Part::File { name, .. } => name,
        }
    }
}

/// `multipart/form-data` parts plus the boundary that separates them.
#[derive(Clone, Debug)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    #[inline]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(Part::Text {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn push_file(&mut self, name: impl Into<String>, file: FilePart) {
        self.parts.push(Part::File {
            name: name.into(),
            file,
        });
    }

    pub fn content_type(&self) -> String {
        format!("{}; boundary={}", MULTIPART_MEDIA_TYPE, self.boundary)
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        for part in &self.parts {
            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\n");
            match part {
                Part::Text { name, value } => {
                    put_line(
                        &mut buf,
                        &format!("Content-Disposition: form-data; name=\"{}\"", quote(name)),
                    );
                    buf.put_slice(b"\r\n");
                    buf.put_slice(value.as_bytes());
                }
                Part::File { name, file } => {
                    put_line(
                        &mut buf,
                        &format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                            quote(name),
                            quote(&file.file_name)
                        ),
                    );
                    let ct = file
                        .content_type
                        .as_deref()
                        .unwrap_or("application/octet-stream");
                    put_line(&mut buf, &format!("Content-Type: {}", ct));
                    buf.put_slice(b"\r\n");
                    buf.put_slice(&file.content);
                }
            }
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");
        buf.freeze()
    }
}

fn put_line(buf: &mut BytesMut, line: &str) {
    buf.put_slice(line.as_bytes());
    buf.put_slice(b"\r\n");
}

fn quote(s: &str) -> String {
    s.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Parts for the `multipart`-tagged fields of an object body.
pub fn serialize_multipart(body: &ParamValue) -> Result<MultipartForm, SdkError> {
    let ParamValue::Object(fields) = body else {
        return Err(SdkError::InvalidBodyType {
            found: body.type_name(),
            media_type: MULTIPART_MEDIA_TYPE,
        });
    };
    let mut form = MultipartForm::new();
    for field in fields {
        if !field.value.is_set() {
            continue;
        }
        let Some(meta) = field.metadata.multipart.as_ref() else {
            continue;
        };
        let name = field.wire_name;
        if meta.file {
            match &field.value {
                ParamValue::File(file) if !file.file_name.is_empty() => {
                    form.push_file(name, file.clone())
                }
                _ => {
                    return Err(SdkError::InvalidParam(
                        format!("invalid multipart/form-data file (field={})", field.name).into(),
                    ));
                }
            }
        } else if meta.json {
            // plain form-data part, no part-level content type
            form.push_text(name, field.value.flat_string());
        } else if let ParamValue::List(items) = &field.value {
            let key = format!("{}[]", name);
            for v in items.iter().filter(|v| v.is_set()) {
                form.push_text(key.as_str(), v.flat_string());
            }
        } else {
            form.push_text(name, field.value.flat_string());
        }
    }
    Ok(form)
}
