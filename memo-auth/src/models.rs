use serde::{Deserialize, Serialize};

/// Bearer credential issued by the token endpoint and persisted between runs.
///
/// Opaque outside this crate: nothing inspects the token, it is only echoed
/// back in `Authorization` headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub token_type: String,
}

/// Server-owned account data; the client never mutates these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

// Mirror server request/response bodies

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    // `detail` is usually a string but validation errors send structured data
    pub detail: serde_json::Value,
}
