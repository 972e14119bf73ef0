use {
    crate::{
        AlgorithmDescriptor, Camera, DocumentStore, Employee, Entity, Filter, RegionOfInterest,
        StoreError, TenantScope, models::from_document,
    },
    serde::de::DeserializeOwned,
    std::sync::Arc,
};

/// Typed reads over a `DocumentStore`.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    // tenant collections must exist; an unknown tenant is NotFound, not an empty list
    fn tenant_collection<'a>(
        &self,
        scope: &'a TenantScope,
        entity: Entity,
    ) -> Result<&'a str, StoreError> {
        let collection = scope.collection(entity);
        if self.store.has_collection(collection) {
            Ok(collection)
        } else {
            Err(StoreError::NotFound(format!(
                "collection {collection} for tenant {}",
                scope.company_id()
            )))
        }
    }

    fn find_all<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<T>, StoreError> {
        self.store
            .find(collection, filter)?
            .into_iter()
            .map(|document| from_document(collection, document))
            .collect()
    }

    pub fn cameras(&self, scope: &TenantScope) -> Result<Vec<Camera>, StoreError> {
        let collection = self.tenant_collection(scope, Entity::Camera)?;
        self.find_all(collection, &Filter::All)
    }

    pub fn camera(&self, scope: &TenantScope, camera_id: &str) -> Result<Camera, StoreError> {
        let collection = self.tenant_collection(scope, Entity::Camera)?;
        match self.store.find_one(collection, &Filter::id(camera_id))? {
            Some(document) => from_document(collection, document),
            None => Err(StoreError::NotFound(format!("camera {camera_id}"))),
        }
    }

    pub fn employees(&self, scope: &TenantScope) -> Result<Vec<Employee>, StoreError> {
        let collection = self.tenant_collection(scope, Entity::Employee)?;
        self.find_all(collection, &Filter::All)
    }

    /// ROIs of one camera, in stored order.
    pub fn camera_rois(
        &self,
        scope: &TenantScope,
        camera_id: &str,
    ) -> Result<Vec<RegionOfInterest>, StoreError> {
        self.find_all(
            scope.collection(Entity::Roi),
            &Filter::eq("camera_id", camera_id),
        )
    }

    pub fn algorithm(&self, algorithm_id: &str) -> Result<AlgorithmDescriptor, StoreError> {
        let collection = crate::tenant::INFERENCE_ALGORITHMS;
        match self.store.find_one(collection, &Filter::id(algorithm_id))? {
            Some(document) => from_document(collection, document),
            None => Err(StoreError::NotFound(format!("algorithm {algorithm_id}"))),
        }
    }
}
