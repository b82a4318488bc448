//! Typed success/error/data wrappers for the remote resource protocol.
//!
//! Wire shape is camelCase:
//! `{ "success": bool, "errorMessages": [string], "data": ... }`.

use serde::{Deserialize, Serialize};

/// Response wrapper for a single-entity exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct EntityResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Error messages when it was not.
    #[serde(default)]
    pub error_messages: Vec<String>,
    /// The entity, when there is one. A successful lookup of a missing
    /// key carries `success: true` with null data.
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> EntityResponse<T> {
    /// A successful response carrying `data`.
    pub fn ok(data: Option<T>) -> Self {
        EntityResponse {
            success: true,
            error_messages: Vec::new(),
            data,
        }
    }

    /// A failed response carrying error messages.
    pub fn fail(messages: Vec<String>) -> Self {
        EntityResponse {
            success: false,
            error_messages: messages,
            data: None,
        }
    }
}

/// Response wrapper for a multiple-entity exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Error messages when it was not.
    #[serde(default)]
    pub error_messages: Vec<String>,
    /// The entities.
    #[serde(default)]
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    /// A successful response carrying `data`.
    pub fn ok(data: Vec<T>) -> Self {
        ListResponse {
            success: true,
            error_messages: Vec::new(),
            data,
        }
    }

    /// A failed response carrying error messages.
    pub fn fail(messages: Vec<String>) -> Self {
        ListResponse {
            success: false,
            error_messages: messages,
            data: Vec::new(),
        }
    }
}
