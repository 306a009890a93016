//! Wire types for the Engage integration API.
//!
//! Requests and responses are wrapped in `{"payload": ...}`. Records are kept
//! close to what the server sends; members this crate does not use are carried
//! along in `extra` so a supporter can be sent back in full.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Correct spelling of the activity search upper bound.
pub const MODIFIED_TO_KEY: &str = "modifiedTo";
/// Spelling used by the first client of this API. Selected with
/// `legacyModifiedToKey: true` in the login file.
pub const LEGACY_MODIFIED_TO_KEY: &str = "modidifedTo";

pub const FOUND: &str = "FOUND";
pub const EMAIL_ADDRESS: &str = "EMAIL_ADDRESS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self { payload }
    }
}

/// Body of `POST /activities/search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySearch {
    pub activity_type: String,
    pub modified_from: String,
    pub modified_to: String,
    pub modified_to_key: &'static str,
    pub offset: u64,
    pub count: u64,
}

impl Serialize for ActivitySearch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("type", &self.activity_type)?;
        map.serialize_entry("modifiedFrom", &self.modified_from)?;
        map.serialize_entry(self.modified_to_key, &self.modified_to)?;
        map.serialize_entry("offset", &self.offset)?;
        map.serialize_entry("count", &self.count)?;
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub activity_id: Option<String>,
    pub activity_form_name: Option<String>,
    pub activity_date: Option<String>,
    pub activity_type: Option<String>,
    pub donation_id: Option<String>,
    pub total_received_amount: Option<Value>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub reason: Option<String>,
    pub date: Option<String>,
    pub amount: Option<Value>,
    pub deductible_amount: Option<Value>,
    pub fees_paid: Option<Value>,
    pub gateway_transaction_id: Option<String>,
}

/// Body of `POST /supporters/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupporterSearch {
    pub count: u64,
    pub offset: u64,
    pub identifiers: Vec<String>,
    pub identifier_type: String,
}

impl SupporterSearch {
    pub fn by_email(email: &str) -> Self {
        Self {
            count: 10,
            offset: 0,
            identifiers: vec![email.to_string()],
            identifier_type: EMAIL_ADDRESS.to_string(),
        }
    }
}

/// Request body of `PUT /supporters` and response body of both supporter calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupporterList {
    #[serde(default)]
    pub supporters: Vec<Supporter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supporter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supporter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// `None` when the server sent no `customFieldValues` member at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field_values: Option<Vec<CustomFieldValue>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Supporter {
    pub fn is_found(&self) -> bool {
        self.result.as_deref() == Some(FOUND)
    }

    pub fn custom_fields(&self) -> &[CustomFieldValue] {
        self.custom_field_values.as_deref().unwrap_or_default()
    }

    pub fn custom_fields_mut(&mut self) -> &mut [CustomFieldValue] {
        self.custom_field_values.as_deref_mut().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomFieldValue {
    /// First error the server attached to this field, if any.
    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors.as_ref().and_then(|errors| errors.first())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
