use {crate::StoreError, serde_json::Value};

/// A stored document: a JSON object with an `_id` field.
pub type Document = serde_json::Map<String, Value>;

pub const ID_FIELD: &str = "_id";

/// Selects documents within a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Eq(String, Value),
}

impl Filter {
    pub fn id(id: &str) -> Self {
        Filter::Eq(ID_FIELD.to_string(), Value::String(id.to_string()))
    }

    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(field.to_string(), value.into())
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => document.get(field) == Some(value),
        }
    }
}

/// Document database boundary.
///
/// Reading a collection that does not exist yields no documents; callers that
/// need to tell "absent" from "empty" ask `has_collection` first.
pub trait DocumentStore: Send + Sync {
    fn has_collection(&self, collection: &str) -> bool;

    fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError> {
        Ok(self.find(collection, filter)?.into_iter().next())
    }

    fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError>;
}
