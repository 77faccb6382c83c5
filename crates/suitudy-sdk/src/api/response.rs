//! JSON-RPC response types.

use crate::error::{SuitudyError, SuitudyResult};
use crate::types::{Amount, ObjectId, SuiAddress, type_name};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One page of a paginated query.
///
/// Coin and object queries use an opaque string cursor; event queries use
/// an [`EventId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T, C = String> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Cursor to pass to fetch the next page.
    pub next_cursor: Option<C>,
    /// Whether more pages exist.
    #[serde(default)]
    pub has_next_page: bool,
}

impl<T, C> Page<T, C> {
    /// Returns the cursor for the next page, if there is one.
    pub fn next(&self) -> Option<&C> {
        if self.has_next_page {
            self.next_cursor.as_ref()
        } else {
            None
        }
    }
}

/// Aggregate balance of one coin type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Fully-qualified coin type.
    pub coin_type: String,
    /// Number of coin objects that make up the balance.
    pub coin_object_count: u64,
    /// Sum of all coin balances.
    pub total_balance: Amount,
}

/// Identifies an event; also the cursor for event pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventId {
    /// Digest of the emitting transaction.
    pub tx_digest: String,
    /// Sequence number within the transaction.
    pub event_seq: String,
}

/// An event emitted by a Move module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEvent {
    /// Event id.
    pub id: EventId,
    /// Package of the emitting module.
    pub package_id: ObjectId,
    /// Name of the emitting module.
    pub transaction_module: String,
    /// Sender of the emitting transaction.
    pub sender: SuiAddress,
    /// Fully-qualified event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload.
    #[serde(default)]
    pub parsed_json: serde_json::Value,
    /// Timestamp, in milliseconds, as a decimal string.
    #[serde(default)]
    pub timestamp_ms: Option<String>,
}

impl SuiEvent {
    /// Returns true if the event's struct name is `name`.
    pub fn is(&self, name: &str) -> bool {
        type_name(&self.event_type) == name
    }

    /// Deserializes the event payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> SuitudyResult<T> {
        Ok(serde_json::from_value(self.parsed_json.clone())?)
    }
}

/// The result of an object read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectResponse {
    /// Object data, absent if the object does not exist.
    #[serde(default)]
    pub data: Option<ObjectData>,
    /// Error reported for this object (for example `deleted`).
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ObjectResponse {
    /// Returns true if the object exists.
    pub fn exists(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }

    /// Returns the object data.
    ///
    /// # Errors
    ///
    /// Returns [`SuitudyError::NotFound`] if the object was deleted or never existed.
    pub fn into_data(self) -> SuitudyResult<ObjectData> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(error)) => Err(SuitudyError::NotFound(error.to_string())),
            (None, None) => Err(SuitudyError::NotFound("object has no data".to_string())),
        }
    }
}

/// Object metadata and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    /// Object id.
    pub object_id: ObjectId,
    /// Object version.
    pub version: String,
    /// Object digest.
    pub digest: String,
    /// Fully-qualified type, when requested.
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    /// Parsed Move content, when requested.
    #[serde(default)]
    pub content: Option<ObjectContent>,
}

impl ObjectData {
    /// Deserializes the Move struct fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the object carries no content or the fields do
    /// not match `T`.
    pub fn fields<T: DeserializeOwned>(&self) -> SuitudyResult<T> {
        let content = self.content.as_ref().ok_or_else(|| {
            SuitudyError::NotFound(format!("content of object {}", self.object_id))
        })?;
        Ok(serde_json::from_value(content.fields.clone())?)
    }
}

/// Parsed Move object content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectContent {
    /// `moveObject` or `package`.
    pub data_type: String,
    /// Struct type of a Move object.
    #[serde(default, rename = "type")]
    pub struct_type: Option<String>,
    /// Struct fields.
    #[serde(default)]
    pub fields: serde_json::Value,
}
