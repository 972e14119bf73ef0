pub const CAMERA_PREFIX: &str = "camera_";
pub const EMPLOYEE_PREFIX: &str = "employee_";
pub const CAMERA_ROIS: &str = "camera_rois";
pub const INSTANCES: &str = "instances";
pub const INFERENCE_ALGORITHMS: &str = "inference_algorithms";
pub const ATTENDANCES: &str = "attendances";

/// Logical entity kinds the router knows how to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Camera,
    Employee,
    Roi,
    Instance,
    Algorithm,
    Attendance,
}

/// Storage locations for one tenant.
///
/// Camera and employee collections are always derived together from the same
/// tenant, so a scope can never point them at different tenants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScope {
    company_id: String,
    cameras: String,
    employees: String,
}

impl TenantScope {
    pub fn new(company_id: &str) -> Self {
        let key = company_id.to_lowercase();
        Self {
            company_id: company_id.to_string(),
            cameras: format!("{CAMERA_PREFIX}{key}"),
            employees: format!("{EMPLOYEE_PREFIX}{key}"),
        }
    }

    /// Repoint both tenant collections at `company_id`.
    pub fn switch(&mut self, company_id: &str) {
        *self = Self::new(company_id);
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn collection(&self, entity: Entity) -> &str {
        match entity {
            Entity::Camera => &self.cameras,
            Entity::Employee => &self.employees,
            Entity::Roi => CAMERA_ROIS,
            Entity::Instance => INSTANCES,
            Entity::Algorithm => INFERENCE_ALGORITHMS,
            Entity::Attendance => ATTENDANCES,
        }
    }
}

/// Hands out a `TenantScope` per request.
#[derive(Debug, Clone)]
pub struct TenantRouter {
    default_company: String,
}

impl TenantRouter {
    pub fn new(default_company: impl Into<String>) -> Self {
        Self {
            default_company: default_company.into(),
        }
    }

    pub fn default_company(&self) -> &str {
        &self.default_company
    }

    /// Scope for the requested tenant, or the default tenant when none is given.
    pub fn scope(&self, company_id: Option<&str>) -> TenantScope {
        match company_id.map(str::trim).filter(|c| !c.is_empty()) {
            Some(company_id) => TenantScope::new(company_id),
            None => TenantScope::new(&self.default_company),
        }
    }
}
