// Integration suite for the plugin registry: discovery over namespace trees,
// catalog classification, cross-catalog verification, manifests, and the
// bundled edge-list plugin, all driven through the public API.
mod support;

use anyhow::Result;
use plugin_registry::builtin::edge_list::{OUT_DEGREE, WeightedEdgeList};
use plugin_registry::registry::discovery::{PRIVATE_PREFIX_ENV, RECURSE_ENV};
use plugin_registry::types::standard::{EDGE_MAP, EDGE_SET, NODE_MAP, standard_model};
use plugin_registry::types::{MANIFEST_SCHEMA_VERSION, TypeManifest};
use plugin_registry::{
    Aspect, CapabilitySet, CatalogKind, ConcreteParamType, DiscoveryOptions, Entity, Namespaces,
    PropertyValue, Registry, RegistryError, Tolerance, Translator, TypeBase, TypeDeclaration,
    TypeModel, bootstrap,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use support::{Sequence, foo_model, identity_impl, names, native, signature, wrapper};
use tempfile::NamedTempFile;

fn recursive() -> DiscoveryOptions {
    DiscoveryOptions::default()
}

// Registering the same entity twice leaves one entry in exactly one catalog.
#[test]
fn register_is_idempotent_and_catalogs_are_disjoint() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let concrete = native("FooVec", &foo);
    let complete = wrapper("FooWrap", &foo, CapabilitySet::new());
    let algorithm = signature("util.identity", &foo)?;
    let implementation = identity_impl("util.identity", "vec_identity", &concrete)?;

    let mut registry = Registry::new();
    assert_eq!(registry.register(foo.clone())?, CatalogKind::AbstractTypes);
    assert_eq!(registry.register(foo.clone())?, CatalogKind::AbstractTypes);
    assert_eq!(registry.register(concrete.clone())?, CatalogKind::ConcreteTypes);
    assert_eq!(registry.register(complete.clone())?, CatalogKind::Wrappers);
    assert_eq!(
        registry.register(algorithm.clone())?,
        CatalogKind::AbstractAlgorithms
    );
    assert_eq!(
        registry.register(implementation.clone())?,
        CatalogKind::ConcreteAlgorithms
    );
    registry.register(concrete.clone())?;

    for kind in CatalogKind::ALL {
        let expected = usize::from(kind != CatalogKind::Translators);
        assert_eq!(registry.count(kind), expected, "{kind}");
    }
    assert_eq!(registry.len(), 5);
    assert_eq!(
        registry.catalog_of(&Entity::from(concrete)),
        Some(CatalogKind::ConcreteTypes)
    );
    assert_eq!(
        registry.catalog_of(&Entity::from(complete)),
        Some(CatalogKind::Wrappers)
    );
    assert!(registry.verify().is_empty());
    Ok(())
}

// Structurally identical entities are still two registrations.
#[test]
fn identity_not_name_decides_registration() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let mut registry = Registry::new();
    registry.register(native("FooVec", &foo))?;
    registry.register(native("FooVec", &foo))?;
    assert_eq!(registry.concrete_types().len(), 2);
    Ok(())
}

#[test]
fn wrapper_must_provide_required_capabilities() -> Result<()> {
    let mut model = TypeModel::new();
    let table = model.declare(
        TypeDeclaration::new("Table")
            .requires_method("get_item")
            .requires_property("num_rows"),
    )?;
    let mut registry = Registry::new();

    let partial = wrapper(
        "PartialTable",
        &table,
        CapabilitySet::new().with_method("get_item"),
    );
    let err = registry.register(partial).expect_err("num_rows missing");
    match err {
        RegistryError::MissingCapability { wrapper, missing } => {
            assert_eq!(wrapper, "PartialTable");
            assert_eq!(missing, vec!["property num_rows".to_string()]);
        }
        other => panic!("unexpected error {other}"),
    }

    let full = wrapper(
        "FullTable",
        &table,
        CapabilitySet::new()
            .with_method("get_item")
            .with_property("num_rows"),
    );
    assert_eq!(registry.register(full)?, CatalogKind::Wrappers);
    assert_eq!(registry.len(), 1);
    Ok(())
}

// A plugin that re-exports a type declared elsewhere registers its own
// concrete type but not the borrowed abstract type.
#[test]
fn reexported_types_are_registered_only_by_their_owner() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let foo_impl = native("FooImpl", &foo);

    let mut space = Namespaces::new();
    let mod_a = space.root("mod_a");
    let mod_b = space.root("mod_b");
    space.declare(mod_a, "Foo", foo.clone())?;
    space.import(mod_b, mod_a, "Foo")?;
    space.declare(mod_b, "FooImpl", foo_impl.clone())?;

    let mut registry = Registry::new();
    let report = registry.register_many(&space, &[Entity::Namespace(mod_b)], &recursive())?;
    assert!(registry.abstract_types().is_empty());
    assert!(registry.concrete_types().contains(&foo_impl));
    assert_eq!(report.registered_in(CatalogKind::ConcreteTypes), vec!["FooImpl"]);
    assert_eq!(report.entry("FooImpl").and_then(|e| e.origin), Some(mod_b));

    let report = registry.register_many(
        &space,
        &[Entity::Namespace(mod_a), Entity::Namespace(mod_b)],
        &recursive(),
    )?;
    assert!(registry.abstract_types().contains(&foo));
    assert_eq!(registry.concrete_types().len(), 1);
    // FooImpl was already present, so only Foo is new.
    assert_eq!(report.registered.len(), 1);
    assert_eq!(report.registered[0].name, "Foo");
    Ok(())
}

// Translators and algorithms are registered wherever they are found.
#[test]
fn instance_entities_ignore_origin() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let source = native("FooVec", &foo);
    let target = native("FooArray", &foo);
    let translator = Arc::new(Translator::from_fn(
        "vec_to_array",
        source.clone(),
        target.clone(),
        |seq: &Sequence, _hints: &plugin_registry::PropertyMap| Ok(seq.clone()),
    )?);

    let mut space = Namespaces::new();
    let shared = space.root("shared");
    let plugin = space.root("plugin");
    space.declare(shared, "vec_to_array", translator.clone())?;
    space.declare(shared, "FooVec", source)?;
    space.import(plugin, shared, "vec_to_array")?;
    space.import(plugin, shared, "FooVec")?;

    let mut registry = Registry::new();
    registry.register_many(&space, &[Entity::Namespace(plugin)], &recursive())?;
    assert!(registry.translators().contains(&translator));
    assert!(registry.concrete_types().is_empty());
    assert_eq!(
        registry.verify(),
        vec![
            "translator vec_to_array has unregistered source FooVec".to_string(),
            "translator vec_to_array has unregistered target FooArray".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn private_names_are_skipped() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let hidden = native("Hidden", &foo);
    let visible = native("Visible", &foo);

    let mut space = Namespaces::new();
    let pkg = space.root("pkg");
    let internal = space.child(pkg, "_internal")?;
    space.declare(pkg, "_Hidden", hidden.clone())?;
    space.declare(pkg, "Visible", visible.clone())?;
    space.declare(internal, "Deep", native("Deep", &foo))?;

    let mut registry = Registry::new();
    let report = registry.register_many(&space, &[Entity::Namespace(pkg)], &recursive())?;
    assert_eq!(registry.concrete_types().len(), 1);
    assert!(registry.concrete_types().contains(&visible));
    assert_eq!(report.visits_of(internal), 0);

    let vars = HashMap::from([(PRIVATE_PREFIX_ENV, "__".to_string())]);
    let options = DiscoveryOptions::from_vars(|key| vars.get(key).cloned());
    let mut registry = Registry::new();
    registry.register_many(&space, &[Entity::Namespace(pkg)], &options)?;
    assert_eq!(registry.concrete_types().len(), 3);
    assert!(registry.concrete_types().contains(&hidden));
    Ok(())
}

// Two sibling namespaces that import each other, plus a link back to the root.
#[test]
fn reexport_cycles_terminate_and_visit_each_namespace_once() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let mut space = Namespaces::new();
    let pkg = space.root("pkg");
    let left = space.child(pkg, "left")?;
    let right = space.child(pkg, "right")?;
    space.declare(left, "peer", Entity::Namespace(right))?;
    space.declare(right, "peer", Entity::Namespace(left))?;
    space.declare(right, "up", Entity::Namespace(pkg))?;
    space.declare(left, "Foo", foo.clone())?;
    space.declare(right, "FooVec", native("FooVec", &foo))?;

    let mut registry = Registry::new();
    let report = registry.register_many(&space, &[Entity::Namespace(pkg)], &recursive())?;
    for ns in [pkg, left, right] {
        assert_eq!(report.visits_of(ns), 1, "{}", space.qualified_name(ns));
    }
    assert_eq!(registry.abstract_types().len(), 1);
    assert_eq!(registry.concrete_types().len(), 1);
    Ok(())
}

// A namespace reachable from several roots is scanned under the shallowest.
#[test]
fn shallower_roots_take_precedence() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let mut space = Namespaces::new();
    let pkg = space.root("pkg");
    let types = space.child(pkg, "types")?;
    let nested = space.child(types, "nested")?;
    space.declare(nested, "Foo", foo)?;

    let mut registry = Registry::new();
    let report = registry.register_many(
        &space,
        &[
            Entity::Namespace(nested),
            Entity::Namespace(types),
            Entity::Namespace(pkg),
            Entity::Namespace(types),
        ],
        &recursive(),
    )?;
    assert_eq!(report.visited.len(), 3);
    for ns in [pkg, types, nested] {
        assert_eq!(report.visits_of(ns), 1);
        assert_eq!(report.root_of(ns), Some(pkg));
    }
    assert_eq!(report.visited[0].name, "pkg");
    assert_eq!(registry.abstract_types().len(), 1);
    Ok(())
}

// Same-named namespaces in unrelated trees do not leak into each other.
#[test]
fn ownership_is_by_identity_not_name() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let mut space = Namespaces::new();
    let first = space.root("plugin");
    let first_types = space.child(first, "types")?;
    let second = space.root("plugin");
    let second_types = space.child(second, "types")?;
    let theirs = native("Theirs", &foo);
    space.declare(second_types, "Theirs", theirs.clone())?;
    space.declare(first_types, "Mine", native("Mine", &foo))?;
    // Re-exporting a foreign namespace does not make it part of this tree.
    space.declare(first, "borrowed", Entity::Namespace(second_types))?;
    space.import(first_types, second_types, "Theirs")?;

    let mut registry = Registry::new();
    let report = registry.register_many(&space, &[Entity::Namespace(first)], &recursive())?;
    assert_eq!(report.visits_of(second_types), 0);
    assert_eq!(registry.concrete_types().len(), 1);
    assert!(!registry.concrete_types().contains(&theirs));
    Ok(())
}

#[test]
fn shallow_discovery_skips_subnamespaces() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let mut space = Namespaces::new();
    let pkg = space.root("pkg");
    let types = space.child(pkg, "types")?;
    space.declare(pkg, "Foo", foo.clone())?;
    space.declare(types, "FooVec", native("FooVec", &foo))?;

    let vars = HashMap::from([(RECURSE_ENV, "false".to_string())]);
    let options = DiscoveryOptions::from_vars(|key| vars.get(key).cloned());
    assert_eq!(options, DiscoveryOptions::shallow());

    let mut registry = Registry::new();
    let report = registry.register_many(&space, &[Entity::Namespace(pkg)], &options)?;
    assert_eq!(report.visits_of(types), 0);
    assert_eq!(registry.len(), 1);
    Ok(())
}

#[test]
fn non_namespace_argument_leaves_registry_untouched() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let mut space = Namespaces::new();
    let pkg = space.root("pkg");
    space.declare(pkg, "Foo", foo.clone())?;
    let other_space = Namespaces::new();

    let mut registry = Registry::new();
    let err = registry
        .register_many(
            &space,
            &[Entity::Namespace(pkg), Entity::from(foo)],
            &recursive(),
        )
        .expect_err("a type is not a namespace");
    assert!(matches!(err, RegistryError::ArgumentType { position: 1, .. }));
    assert!(err.to_string().contains("abstract type Foo"));

    let err = registry
        .register_many(&other_space, &[Entity::Namespace(pkg)], &recursive())
        .expect_err("namespace belongs to another arena");
    assert!(matches!(err, RegistryError::ArgumentType { position: 0, .. }));
    assert!(registry.is_empty());
    Ok(())
}

// One incomplete wrapper anywhere in the scan aborts the whole call.
#[test]
fn failed_discovery_registers_nothing() -> Result<()> {
    let mut model = TypeModel::new();
    let table = model.declare(TypeDeclaration::new("Table").requires_method("get_item"))?;
    let mut space = Namespaces::new();
    let pkg = space.root("pkg");
    let late = space.child(pkg, "late")?;
    space.declare(pkg, "Table", table.clone())?;
    space.declare(late, "Broken", wrapper("Broken", &table, CapabilitySet::new()))?;

    let mut registry = Registry::new();
    let err = registry
        .register_many(&space, &[Entity::Namespace(pkg)], &recursive())
        .expect_err("wrapper lacks get_item");
    assert!(matches!(err, RegistryError::MissingCapability { .. }));
    assert!(registry.is_empty());
    Ok(())
}

#[test]
fn bases_plain_types_and_values_are_skipped_by_discovery() -> Result<()> {
    let mut space = Namespaces::new();
    let pkg = space.root("pkg");
    space.declare(pkg, "ConcreteType", TypeBase::ConcreteType)?;
    space.declare(pkg, "Wrapper", TypeBase::Wrapper)?;
    space.declare(pkg, "NodeID", Entity::plain_type("NodeID"))?;
    space.declare(pkg, "LIMIT", Entity::value("10"))?;

    let mut registry = Registry::new();
    let report = registry.register_many(&space, &[Entity::Namespace(pkg)], &recursive())?;
    assert!(registry.is_empty());
    assert!(report.registered.is_empty());

    let err = registry
        .register(TypeBase::AbstractType)
        .expect_err("bases are not plugins");
    assert!(matches!(err, RegistryError::Classification { .. }));
    Ok(())
}

#[test]
fn verify_reports_signature_mismatches() -> Result<()> {
    let (mut model, foo) = foo_model()?;
    let bar = model.declare(TypeDeclaration::new("Bar"))?;
    let foo_vec = native("FooVec", &foo);
    let bar_vec = native("BarVec", &bar);

    let mut registry = Registry::new();
    registry.register(foo.clone())?;
    registry.register(bar.clone())?;
    registry.register(foo_vec.clone())?;
    registry.register(bar_vec.clone())?;
    registry.register(signature("util.identity", &foo)?)?;
    registry.register(identity_impl("util.identity", "bar_identity", &bar_vec)?)?;
    registry.register(identity_impl("util.missing", "orphan", &foo_vec)?)?;

    let problems = registry.verify();
    assert_eq!(problems.len(), 3, "{problems:#?}");
    assert!(problems.iter().any(|p| p.contains("bar_identity: parameter 'x' is BarVec")));
    assert!(problems.iter().any(|p| p.contains("bar_identity: returns BarVec")));
    assert!(
        problems
            .iter()
            .any(|p| p.contains("orphan implements unregistered abstract algorithm util.missing"))
    );
    Ok(())
}

#[test]
fn concrete_parameter_types_must_be_registered() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let unregistered = native("Loose", &foo);
    let mut registry = Registry::new();
    registry.register(foo.clone())?;
    registry.register(signature("util.identity", &foo)?)?;
    registry.register(identity_impl("util.identity", "loose_identity", &unregistered)?)?;
    let problems = registry.verify();
    assert_eq!(
        problems,
        vec![
            "loose_identity: parameter 'x' uses unregistered concrete type Loose".to_string(),
            "loose_identity: parameter 'return' uses unregistered concrete type Loose".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn manifest_file_declares_types() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    let manifest = json!({
        "schema_version": MANIFEST_SCHEMA_VERSION,
        "types": [
            {"name": "Points", "properties": {"dims": [2, 3]}},
            {
                "name": "Mesh",
                "properties": {"is_closed": [true, false]},
                "subcomponents": ["Points"],
                "required_methods": ["faces"]
            }
        ]
    });
    serde_json::to_writer(&mut file, &manifest)?;
    file.flush()?;

    let loaded = TypeManifest::load(file.path())?;
    let mut model = TypeModel::new();
    let declared = model.declare_manifest(&loaded)?;
    assert_eq!(declared.len(), 2);
    assert!(model.reduces_to("Mesh", "Points"));
    let mesh = model.require("Mesh")?;
    assert!(mesh.domain("is_closed").is_some());
    assert!(!mesh.required_capabilities().is_empty());

    let mut bad = NamedTempFile::new()?;
    bad.write_all(b"{\"schema_version\": \"type_manifest_v1\", \"types\": [{\"name\": 3}]}")?;
    bad.flush()?;
    let err = TypeManifest::load(bad.path()).expect_err("name must be a string");
    match err {
        RegistryError::Manifest { path, .. } => assert_eq!(path, bad.path()),
        other => panic!("unexpected error {other}"),
    }
    Ok(())
}

#[test]
fn property_computation_through_registered_types() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let concrete = native("FooVec", &foo);
    let props = concrete.compute_properties(&Sequence(vec![1, 2, 3]), &names(&["is_sorted"]))?;
    assert_eq!(props.get("is_sorted"), Some(&PropertyValue::Bool(true)));

    let err = concrete
        .compute_properties(&Sequence(vec![1]), &names(&["is_dense"]))
        .expect_err("Foo declares no is_dense");
    assert!(matches!(err, RegistryError::UnknownProperty { .. }));

    let err = concrete
        .assert_equal(&Sequence(vec![1, 2]), &Sequence(vec![1]), Tolerance::default())
        .expect_err("different lengths");
    assert!(matches!(
        err,
        RegistryError::ValueMismatch {
            aspect: Aspect::Shape,
            ..
        }
    ));
    Ok(())
}

#[test]
fn bootstrap_discovers_bundled_plugins() -> Result<()> {
    let boot = bootstrap(&DiscoveryOptions::default())?;
    let registry = &boot.registry;
    assert!(boot.problems.is_empty(), "{:#?}", boot.problems);
    assert_eq!(registry.abstract_types().len(), boot.model.len());
    assert_eq!(registry.concrete_types().len(), 2);
    assert_eq!(registry.wrappers().len(), 1);
    assert_eq!(registry.translators().len(), 1);
    assert_eq!(registry.abstract_algorithms().len(), 1);
    assert_eq!(registry.concrete_algorithms().len(), 1);
    // Re-exports in edge_list.types were owned by core, so they came from there.
    assert_eq!(
        report_origin(&boot, EDGE_MAP),
        Some(boot.namespaces.core),
    );
    assert_eq!(boot.report.visits_of(boot.namespaces.edge_list), 1);

    let summary: Value = serde_json::to_value(registry.summary())?;
    assert_eq!(summary["counts"]["wrappers"], json!(1));
    assert_eq!(
        summary["implementations"][OUT_DEGREE],
        json!(["edge_list_out_degree"])
    );
    Ok(())
}

fn report_origin(
    boot: &plugin_registry::Bootstrap,
    name: &str,
) -> Option<plugin_registry::NamespaceId> {
    boot.report.entry(name).and_then(|entry| entry.origin)
}

#[test]
fn discovering_only_the_plugin_skips_core_types() -> Result<()> {
    let model = standard_model()?;
    let mut space = Namespaces::new();
    let installed = plugin_registry::builtin::install(&mut space, &model)?;

    let mut registry = Registry::new();
    registry.register_many(
        &space,
        &[Entity::Namespace(installed.edge_list)],
        &recursive(),
    )?;
    assert!(registry.abstract_types().is_empty());
    assert_eq!(registry.concrete_types().len(), 2);
    let problems = registry.verify();
    assert!(
        problems
            .iter()
            .any(|p| p.contains(&format!("unregistered abstract type {EDGE_SET}")))
    );
    assert!(problems.iter().any(|p| p.contains(NODE_MAP)));
    Ok(())
}

#[test]
fn bundled_plugin_round_trip_through_registry() -> Result<()> {
    let boot = bootstrap(&DiscoveryOptions::default())?;
    let weighted = boot
        .registry
        .concrete_types()
        .iter()
        .find(|ty| ty.name() == "WeightedEdgeList")
        .cloned()
        .expect("registered");
    assert!(
        boot.model
            .reduction_path(EDGE_MAP, EDGE_SET)
            .is_some_and(|path| path.len() == 2)
    );

    let graph = WeightedEdgeList::new(true).with_edge(1, 2, 3.0);
    let props = weighted.compute_properties(&graph, &names(&["has_negative_weights"]))?;
    assert_eq!(
        props.get("has_negative_weights"),
        Some(&PropertyValue::Bool(false))
    );

    let implementation = boot
        .registry
        .concrete_algorithms()
        .iter()
        .next()
        .cloned()
        .expect("registered");
    assert!(matches!(
        implementation.params()[0].1,
        ConcreteParamType::Concrete(ref ty) if Arc::ptr_eq(ty, &weighted)
    ));
    Ok(())
}

// One entity of each kind, discovered together, each in exactly its own catalog.
#[test]
fn each_category_lands_in_exactly_one_catalog() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let concrete = native("FooVec", &foo);
    let complete = wrapper("FooWrap", &foo, CapabilitySet::new());
    let translator = Arc::new(Translator::from_fn(
        "vec_to_wrap",
        concrete.clone(),
        complete.clone(),
        |seq: &Sequence, _hints: &plugin_registry::PropertyMap| Ok(seq.clone()),
    )?);
    let algorithm = signature("util.identity", &foo)?;
    let implementation = identity_impl("util.identity", "vec_identity", &concrete)?;

    let expected = [
        (Entity::from(foo.clone()), CatalogKind::AbstractTypes),
        (Entity::from(concrete.clone()), CatalogKind::ConcreteTypes),
        (Entity::from(complete.clone()), CatalogKind::Wrappers),
        (Entity::from(translator.clone()), CatalogKind::Translators),
        (Entity::from(algorithm.clone()), CatalogKind::AbstractAlgorithms),
        (Entity::from(implementation.clone()), CatalogKind::ConcreteAlgorithms),
    ];

    let mut space = Namespaces::new();
    let pkg = space.root("pkg");
    for (index, (entity, _)) in expected.iter().enumerate() {
        space.declare(pkg, format!("entity_{index}"), entity.clone())?;
    }
    let mut registry = Registry::new();
    registry.register_many(&space, &[Entity::Namespace(pkg)], &recursive())?;

    for (entity, kind) in &expected {
        assert_eq!(registry.catalog_of(entity), Some(*kind), "{}", entity.describe());
    }
    for kind in CatalogKind::ALL {
        assert_eq!(registry.count(kind), 1, "{kind}");
    }
    assert!(registry.verify().is_empty(), "{:#?}", registry.verify());
    Ok(())
}

// A type declared in pkg.inner and re-exported into pkg is owned by pkg.inner.
#[test]
fn nested_reexport_is_registered_once_with_inner_origin() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let mut space = Namespaces::new();
    let outer = space.root("pkg");
    let inner = space.child(outer, "inner")?;
    space.declare(inner, "Foo", foo.clone())?;
    space.import(outer, inner, "Foo")?;
    assert_eq!(space.member(outer, "Foo").map(|m| m.origin), Some(inner));

    let mut registry = Registry::new();
    let report = registry.register_many(&space, &[Entity::Namespace(outer)], &recursive())?;
    assert_eq!(registry.abstract_types().len(), 1);
    assert!(registry.abstract_types().contains(&foo));
    assert_eq!(report.registered.len(), 1);
    assert_eq!(report.entry("Foo").and_then(|e| e.origin), Some(inner));

    // Scanning only the inner namespace finds the same owner.
    let mut registry = Registry::new();
    let report = registry.register_many(&space, &[Entity::Namespace(inner)], &recursive())?;
    assert_eq!(report.entry("Foo").and_then(|e| e.origin), Some(inner));
    Ok(())
}

#[test]
fn manifest_type_with_two_reduction_targets_is_rejected() -> Result<()> {
    let manifest = TypeManifest::from_value(
        Path::new("graph_types.json"),
        json!({
            "schema_version": MANIFEST_SCHEMA_VERSION,
            "types": [
                {"name": "NodeSet"},
                {"name": "EdgeSet"},
                {"name": "Graph", "subcomponents": ["NodeSet", "EdgeSet"]}
            ]
        }),
    )?;
    let mut model = TypeModel::new();
    let err = model
        .declare_manifest(&manifest)
        .expect_err("Graph names two targets");
    match err {
        RegistryError::AmbiguousReduction { from, to, existing } => {
            assert_eq!((from.as_str(), to.as_str()), ("Graph", "EdgeSet"));
            assert_eq!(existing, "NodeSet");
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(model.get("Graph").is_none());
    assert!(model.get("EdgeSet").is_some());
    Ok(())
}

#[test]
fn declaring_into_another_graph_fails() -> Result<()> {
    let (_model, foo) = foo_model()?;
    let mut first = Namespaces::new();
    let mut second = Namespaces::new();
    let foreign = first.root("pkg");
    let local = second.root("pkg");

    let err = second
        .declare(foreign, "Foo", foo.clone())
        .expect_err("foreign namespace id");
    assert!(matches!(err, RegistryError::UnknownNamespace(id) if id == foreign));
    assert!(second.members(local).next().is_none());
    assert!(second.member(foreign, "Foo").is_none());
    Ok(())
}
