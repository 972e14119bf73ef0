use {
    crate::{Document, StoreError},
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    serde_json::{Map, Value},
};

/// A camera registered to a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub company_id: String,
    #[serde(rename = "cctv_feed_url")]
    pub feed_url: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub camera_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_id: Option<String>,
    /// Display metadata carried verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A polygon within a camera's frame, in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    #[serde(rename = "_id")]
    pub id: String,
    pub camera_id: String,
    #[serde(default)]
    pub coordinates: Vec<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Registry entry pointing at an algorithm implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmDescriptor {
    #[serde(rename = "_id")]
    pub id: String,
    /// Model identifier of the implementation.
    pub path: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

pub(crate) fn from_document<T: DeserializeOwned>(
    collection: &str,
    document: Document,
) -> Result<T, StoreError> {
    let id = document
        .get(crate::document::ID_FIELD)
        .map(|v| v.to_string())
        .unwrap_or_default();
    serde_json::from_value(Value::Object(document))
        .map_err(|e| StoreError::Malformed(format!("{collection} {id}: {e}")))
}
