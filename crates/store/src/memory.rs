use {
    crate::{Document, DocumentStore, Filter, StoreError},
    serde_json::Value,
    std::{collections::HashMap, path::Path, sync::RwLock},
};

/// In-process document store.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `{ "<collection>": [ <document>, ... ], ... }`.
    pub fn from_json(seed: Value) -> Result<Self, StoreError> {
        let Value::Object(collections) = seed else {
            return Err(StoreError::Malformed(
                "seed must be an object of collections".to_string(),
            ));
        };
        let store = Self::new();
        for (name, documents) in collections {
            let Value::Array(documents) = documents else {
                return Err(StoreError::Malformed(format!(
                    "collection {name} must be an array"
                )));
            };
            store.create_collection(&name);
            for document in documents {
                let Value::Object(document) = document else {
                    return Err(StoreError::Malformed(format!(
                        "collection {name} holds a non-object document"
                    )));
                };
                store.insert(&name, document)?;
            }
        }
        Ok(store)
    }

    /// Load a JSON seed file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let store = Self::from_json(serde_json::from_str(&text)?)?;
        log::info!(
            "store: loaded {} collections from {:?}",
            store.collection_names().len(),
            path
        );
        Ok(store)
    }

    pub fn create_collection(&self, collection: &str) {
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        collections.entry(collection.to_string()).or_default();
    }

    pub fn collection_names(&self) -> Vec<String> {
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        names
    }
}

impl DocumentStore for MemoryStore {
    fn has_collection(&self, collection: &str) -> bool {
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        collections.contains_key(collection)
    }

    fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| filter.matches(d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        if !document.contains_key(crate::document::ID_FIELD) {
            return Err(StoreError::Malformed(format!(
                "document in {collection} has no _id"
            )));
        }
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }
}
