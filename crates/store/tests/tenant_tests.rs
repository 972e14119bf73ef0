use store::{Entity, TenantRouter, TenantScope, tenant};

#[test]
fn test_scope_collections() {
    let scope = TenantScope::new("ACME");
    assert_eq!(scope.company_id(), "ACME");
    assert_eq!(scope.collection(Entity::Camera), "camera_acme");
    assert_eq!(scope.collection(Entity::Employee), "employee_acme");
}

#[test]
fn test_switch_repoints_both_collections() {
    let mut scope = TenantScope::new("t1");
    scope.switch("T2");
    assert_eq!(scope.company_id(), "T2");
    assert_eq!(scope.collection(Entity::Camera), "camera_t2");
    assert_eq!(scope.collection(Entity::Employee), "employee_t2");
    assert_eq!(scope, TenantScope::new("T2"));
}

#[test]
fn test_fixed_collections_ignore_tenant() {
    let a = TenantScope::new("alpha");
    let b = TenantScope::new("beta");
    for entity in [
        Entity::Roi,
        Entity::Instance,
        Entity::Algorithm,
        Entity::Attendance,
    ] {
        assert_eq!(a.collection(entity), b.collection(entity));
    }
    assert_eq!(a.collection(Entity::Roi), tenant::CAMERA_ROIS);
    assert_eq!(a.collection(Entity::Algorithm), tenant::INFERENCE_ALGORITHMS);
    assert_eq!(a.collection(Entity::Attendance), tenant::ATTENDANCES);
    assert_eq!(a.collection(Entity::Instance), tenant::INSTANCES);
}

#[test]
fn test_router_default_tenant() {
    let router = TenantRouter::new("si31793");
    assert_eq!(router.scope(None).company_id(), "si31793");
    assert_eq!(router.scope(Some("  ")).company_id(), "si31793");
    assert_eq!(router.scope(Some("acme")).company_id(), "acme");
}

#[test]
fn test_router_scopes_are_independent() {
    let router = TenantRouter::new("si31793");
    let a = router.scope(Some("acme"));
    let b = router.scope(Some("globex"));
    assert_eq!(a.collection(Entity::Camera), "camera_acme");
    assert_eq!(b.collection(Entity::Camera), "camera_globex");
    assert_eq!(a.collection(Entity::Employee), "employee_acme");
}
