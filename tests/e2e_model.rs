//! End-to-end tests for building and tearing down application models.
//!
//! Each test drives the public proxy and lifecycle API only: register
//! modules, attach accessors, query the structure, remove things again.

use pretty_assertions::assert_eq;

use pvmodel::lifecycle::{attach_variable, detach_variable, register_child, unregister_child};
use pvmodel::traversal::filter::{keep_process_variables, keep_pv_access};
use pvmodel::traversal::presets;
use pvmodel::{
    AccessorSpec, AnyProxy, ChildSpec, EdgeKind, Error, ModelProxy, NativeRef, Registration, RootProxy,
    SearchConfig, SearchType, UpdateMode, VariableDirection, VertexKind,
};

fn feeding() -> AccessorSpec {
    AccessorSpec::new(VariableDirection::feeding(), UpdateMode::Push)
}

fn consuming() -> AccessorSpec {
    AccessorSpec::new(VariableDirection::consuming(), UpdateMode::Push)
}

fn names(proxies: &[AnyProxy]) -> Vec<String> {
    proxies.iter().map(|p| p.name().unwrap()).collect()
}

// ============================================================================
// 1. Nested registration and qualified paths
// ============================================================================

#[test]
fn test_nested_modules_qualified_path() {
    let root = RootProxy::new(NativeRef(0));
    let group = root.add_module_group("G", NativeRef(1)).unwrap();
    let module = group.add_application_module("M", NativeRef(2)).unwrap();
    let (x, _) = attach_variable(&module.clone().into(), "x", feeding()).unwrap();

    assert_eq!(x.qualified_path().unwrap(), "/G/M/x");
    assert_eq!(module.qualified_path().unwrap(), "/G/M");
    assert_eq!(root.qualified_path().unwrap(), "/");

    let all_pvs = root
        .collect(&SearchConfig::new(SearchType::DepthFirst).vertices(keep_process_variables()))
        .unwrap();
    assert_eq!(names(&all_pvs), vec!["x"]);

    let owned = module.collect(&presets::owned_variables()).unwrap();
    assert_eq!(owned, vec![AnyProxy::from(x.clone())]);

    let owner = x.visit_first(&presets::get_owner(), |o| o).unwrap().unwrap();
    assert_eq!(owner, AnyProxy::from(module));
}

#[test]
fn test_register_child_through_any_proxy() {
    let root = RootProxy::new(NativeRef(0));
    let parent: AnyProxy = root.clone().into();
    let spec = ChildSpec::ModuleGroup { name: "Outer".into() };
    let outer = register_child(&parent, &spec, NativeRef(1)).unwrap();
    assert_eq!(outer.proxy_kind(), VertexKind::ModuleGroup);

    let spec = ChildSpec::ApplicationModule { name: "Inner".into() };
    let inner = register_child(&outer, &spec, NativeRef(2)).unwrap();
    assert_eq!(inner.qualified_path().unwrap(), "/Outer/Inner");

    // Application modules cannot own module groups.
    let spec = ChildSpec::ModuleGroup { name: "Nope".into() };
    assert!(matches!(register_child(&inner, &spec, NativeRef(3)), Err(Error::Structural(_))));
}

// ============================================================================
// 2. Relative and illegal module names
// ============================================================================

#[test]
fn test_relative_variable_group_moves_directory() {
    let root = RootProxy::new(NativeRef(0));
    let module = root.add_application_module("mod", NativeRef(1)).unwrap();
    let group = module.add_variable_group("../oneUp", NativeRef(2)).unwrap();

    let dir = group.visit_first(&presets::get_neighbour_directory(), |d| d).unwrap().unwrap();
    assert_eq!(dir.qualified_path().unwrap(), "/oneUp");
    assert!(root.visit_by_path("/oneUp", |_| {}).unwrap());
    assert!(!root.visit_by_path("/mod/oneUp", |_| {}).unwrap());

    // Ownership is unaffected by the directory move.
    assert_eq!(group.owning_module().unwrap(), module);
}

#[test]
fn test_illegal_variable_group_name() {
    let root = RootProxy::new(NativeRef(0));
    let module = root.add_application_module("mod", NativeRef(1)).unwrap();
    let result = module.add_variable_group("//extra//slashes////everywhere///", NativeRef(2));
    assert!(matches!(result, Err(Error::Structural(_))));
}

#[test]
fn test_escaping_above_root_fails() {
    let root = RootProxy::new(NativeRef(0));
    let module = root.add_application_module("mod", NativeRef(1)).unwrap();
    let result = attach_variable(&module.into(), "../../x", feeding());
    assert!(matches!(result, Err(Error::Structural(_))));
}

#[test]
fn test_absolute_variable_name() {
    let root = RootProxy::new(NativeRef(0));
    let group = root.add_module_group("G", NativeRef(1)).unwrap();
    let module = group.add_application_module("M", NativeRef(2)).unwrap();
    let (pv, _) = attach_variable(&module.into(), "/Global/state", feeding()).unwrap();
    assert_eq!(pv.qualified_path().unwrap(), "/Global/state");
}

// ============================================================================
// 3. Shared variables and removal
// ============================================================================

#[test]
fn test_variable_survives_until_last_node_detached() {
    let root = RootProxy::new(NativeRef(0));
    let writer = root.add_application_module("Writer", NativeRef(1)).unwrap();
    let reader = root.add_application_module("Reader", NativeRef(2)).unwrap();

    let (y, feed) = attach_variable(&writer.into(), "/y", feeding()).unwrap();
    let (y_again, consume) = attach_variable(&reader.clone().into(), "/y", consuming()).unwrap();
    assert_eq!(y, y_again);
    assert_eq!(y.nodes().unwrap().len(), 2);

    detach_variable(&y, &feed).unwrap();
    assert!(y.is_valid());
    let nodes = y.nodes().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, consume.id);

    let owned = reader.collect(&presets::owned_variables()).unwrap();
    assert_eq!(owned, vec![AnyProxy::from(y.clone())]);
    let accessors = y
        .collect(&SearchConfig::new(SearchType::Adjacent).edges(keep_pv_access()))
        .unwrap();
    assert_eq!(accessors, vec![AnyProxy::from(reader)]);

    detach_variable(&y, &consume).unwrap();
    assert!(!y.is_valid());
    assert!(!root.visit_by_path("/y", |_| {}).unwrap());
}

#[test]
fn test_unregister_module_collects_its_variables() {
    let root = RootProxy::new(NativeRef(0));
    let keeper = root.add_application_module("Keeper", NativeRef(1)).unwrap();
    let leaver = root.add_application_module("Leaver", NativeRef(2)).unwrap();

    let (shared, _) = attach_variable(&keeper.into(), "/shared", feeding()).unwrap();
    attach_variable(&leaver.clone().into(), "/shared", consuming()).unwrap();
    let (private, _) = attach_variable(&leaver.clone().into(), "private", feeding()).unwrap();

    unregister_child(&leaver.clone().into()).unwrap();
    assert!(!leaver.is_valid());
    assert!(!private.is_valid());
    assert!(shared.is_valid());
    assert_eq!(shared.nodes().unwrap().len(), 1);

    // A second unregistration is an error.
    assert!(unregister_child(&leaver.into()).is_err());
    assert!(unregister_child(&root.into()).is_err());
}

#[test]
fn test_removing_group_disjuncts_its_children() {
    let root = RootProxy::new(NativeRef(0));
    let group = root.add_module_group("G", NativeRef(1)).unwrap();
    let module = group.add_application_module("M", NativeRef(2)).unwrap();

    root.remove(&group).unwrap();
    assert!(!group.is_valid());
    assert!(module.is_valid());
    assert!(module.qualified_path().unwrap().starts_with("<disjunct>"));
}

// ============================================================================
// 4. Idempotence and tags
// ============================================================================

#[test]
fn test_directories_and_variables_are_idempotent() {
    let root = RootProxy::new(NativeRef(0));
    let a = root.add_directory_recursive("A/B/C").unwrap();
    let b = root.add_directory_recursive("/A/B/./C").unwrap();
    assert_eq!(a, b);

    let v1 = a.add_variable("v").unwrap();
    let v2 = b.add_variable("v").unwrap();
    assert_eq!(v1, v2);
    assert_eq!(v1.qualified_path().unwrap(), "/A/B/C/v");
}

#[test]
fn test_tags_accumulate() {
    let root = RootProxy::new(NativeRef(0));
    let m1 = root.add_application_module("M1", NativeRef(1)).unwrap();
    let m2 = root.add_application_module("M2", NativeRef(2)).unwrap();
    let (pv, _) = attach_variable(&m1.into(), "/v", feeding().with_tags(["a"])).unwrap();
    attach_variable(&m2.into(), "/v", consuming().with_tags(["b"])).unwrap();
    pv.add_tag("c").unwrap();

    let mut tags: Vec<String> = pv.tags().unwrap().into_iter().collect();
    tags.sort();
    assert_eq!(tags, vec!["a", "b", "c"]);
}

// ============================================================================
// 5. Native references and guards
// ============================================================================

#[test]
fn test_inform_move_updates_native() {
    let root = RootProxy::new(NativeRef(0));
    let module = root.add_application_module("M", NativeRef(10)).unwrap();
    module.inform_move(NativeRef(11)).unwrap();
    assert_eq!(module.application_module().unwrap(), NativeRef(11));

    root.inform_move(NativeRef(5)).unwrap();
    assert_eq!(root.app().unwrap(), NativeRef(5));
}

#[test]
fn test_registration_guard_unregisters_on_drop() {
    let root = RootProxy::new(NativeRef(0));
    let spec = ChildSpec::ApplicationModule { name: "Scoped".into() };
    let module = {
        let guard = Registration::new(&root.clone().into(), &spec, NativeRef(1)).unwrap();
        let module = guard.proxy().unwrap().clone();
        assert!(module.is_valid());
        module
    };
    assert!(!module.is_valid());
}

#[test]
fn test_visit_by_path_from_variable() {
    let root = RootProxy::new(NativeRef(0));
    let dir = root.add_directory_recursive("A/B").unwrap();
    let pv = dir.add_variable("v").unwrap();
    root.add_directory_recursive("A/C").unwrap().add_variable("w").unwrap();

    let mut found = None;
    assert!(pv.visit_by_path("../../C/w", |p| found = Some(p)).unwrap());
    assert_eq!(found.unwrap().qualified_path().unwrap(), "/A/C/w");
    assert!(!pv.visit_by_path("../D", |_| {}).unwrap());
}

// ============================================================================
// Failed mutations leave no trace
// ============================================================================

fn process_variable_count(root: &RootProxy) -> usize {
    let graph = root.base().model().unwrap().read();
    graph.vertices().filter(|(_, p)| p.kind() == VertexKind::ProcessVariable).count()
}

#[test]
fn test_attach_through_module_group_creates_nothing() {
    let root = RootProxy::new(NativeRef(0));
    let group = root.add_module_group("G", NativeRef(1)).unwrap();
    let before = root.base().model().unwrap().read().vertex_count();

    let result = attach_variable(&AnyProxy::from(group), "sub/x", feeding());
    assert!(matches!(result, Err(Error::Structural(_))));
    assert_eq!(process_variable_count(&root), 0);
    assert_eq!(root.base().model().unwrap().read().vertex_count(), before);
    assert!(!root.visit_by_path("/G/sub", |_| {}).unwrap());
}

#[test]
fn test_attaching_same_node_twice_is_rejected() {
    let root = RootProxy::new(NativeRef(0));
    let module = root.add_application_module("M", NativeRef(1)).unwrap();
    let (pv, node) = attach_variable(&module.clone().into(), "x", feeding()).unwrap();

    assert!(matches!(module.add_variable(&pv, node.clone()), Err(Error::Structural(_))));
    assert_eq!(pv.nodes().unwrap().len(), 1);

    detach_variable(&pv, &node).unwrap();
    assert!(!pv.is_valid());
    assert_eq!(process_variable_count(&root), 0);
}

#[test]
fn test_every_module_has_exactly_one_owner() {
    let root = RootProxy::new(NativeRef(0));
    let group = root.add_module_group("G", NativeRef(1)).unwrap();
    let inner = group.add_module_group("H", NativeRef(2)).unwrap();
    let module = inner.add_application_module("M", NativeRef(3)).unwrap();
    let outer_vg = module.add_variable_group("V", NativeRef(4)).unwrap();
    let inner_vg = outer_vg.add_variable_group("W", NativeRef(5)).unwrap();
    root.add_application_module("N", NativeRef(6)).unwrap();
    group.add_device_module("Dummy0", Some("/tick"), NativeRef(7)).unwrap();
    root.add_device_module("Dummy1", None, NativeRef(8)).unwrap();
    attach_variable(&inner_vg.into(), "../../shared", feeding()).unwrap();
    attach_variable(&module.into(), "shared", consuming()).unwrap();

    let graph = root.base().model().unwrap().read();
    let owners: Vec<(String, usize)> = graph
        .vertices()
        .filter(|(_, p)| p.kind().is_module())
        .map(|(v, p)| {
            let owners = graph.in_edges(v).filter(|(_, e)| e.props.kind == EdgeKind::Ownership).count();
            (p.name().unwrap_or_default().to_string(), owners)
        })
        .collect();
    assert_eq!(owners.len(), 8);
    assert!(owners.iter().all(|(_, n)| *n == 1), "{owners:?}");
}

