use {
    algorithm::Value,
    store::{Camera, RegionOfInterest},
};

/// Annotation context of one session, handed to every inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiContext {
    company_id: String,
    camera_id: String,
    camera_type: Option<String>,
    rois: Vec<RegionOfInterest>,
}

impl RoiContext {
    /// `fallback_company` is used when the camera record carries no tenant.
    pub fn new(camera: &Camera, rois: Vec<RegionOfInterest>, fallback_company: &str) -> Self {
        let company_id = if camera.company_id.is_empty() {
            fallback_company
        } else {
            &camera.company_id
        };
        Self {
            company_id: company_id.to_string(),
            camera_id: camera.id.clone(),
            camera_type: camera.camera_type.clone(),
            rois,
        }
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    pub fn camera_type(&self) -> Option<&str> {
        self.camera_type.as_deref()
    }

    pub fn rois(&self) -> &[RegionOfInterest] {
        &self.rois
    }

    pub fn to_value(&self) -> Value {
        let rois = self
            .rois
            .iter()
            .map(|roi| {
                let coordinates = roi
                    .coordinates
                    .iter()
                    .map(|[x, y]| Value::Array(vec![Value::from(*x), Value::from(*y)]))
                    .collect();
                let mut value = Value::map()
                    .with("id", roi.id.as_str())
                    .with("coordinates", Value::Array(coordinates));
                if let Some(label) = &roi.label {
                    value.insert("label", label.as_str());
                }
                value
            })
            .collect();
        let mut context = Value::map()
            .with("company_id", self.company_id.as_str())
            .with("camera_id", self.camera_id.as_str())
            .with("rois", Value::Array(rois));
        if let Some(camera_type) = &self.camera_type {
            context.insert("type", camera_type.as_str());
        }
        context
    }
}
