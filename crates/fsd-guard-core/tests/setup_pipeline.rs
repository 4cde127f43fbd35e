//! Integration test: the full setup pipeline end-to-end.
//!
//! Builds a layered tree in a temp directory and verifies the whole
//! config → layer model → slice scan → rule derivation → artifact →
//! registry chain, including re-planning after the tree changes.

use fsd_guard_core::rules::{CROSS_LAYER_MESSAGE, CROSS_SLICE_MESSAGE};
use fsd_guard_core::{
    ChangeWatcher, Config, ConfigIssue, Layers, RecordingHost, RecordingSink, RemapKind,
    RuleRegistry, Setup, TreeEvent,
};
use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn scenario_config() -> Config {
    Config {
        layers: ["app", "features", "entities", "shared"]
            .map(String::from)
            .to_vec(),
        segments: ["ui", "api"].map(String::from).to_vec(),
        alias_prefix: "~".to_string(),
        ..Config::default()
    }
}

/// Bare scenario tree: three slices, no segment directories yet.
fn scenario_tree() -> TempDir {
    let tmp = TempDir::new().expect("temp dir should create");
    for dir in [
        "src/app",
        "src/features/cart",
        "src/features/checkout",
        "src/entities/product",
        "src/shared",
    ] {
        fs::create_dir_all(tmp.path().join(dir)).expect("fixture dir should create");
    }
    tmp
}

fn setup_for(tmp: &TempDir) -> Setup {
    Setup::builder()
        .project_dir(tmp.path())
        .config(scenario_config())
        .build()
        .expect("setup should build")
}

// ── Happy-path: one plan covers slices, rules, and artifacts ──

#[test]
fn plan_matches_the_scenario_tree() {
    let tmp = scenario_tree();
    let plan = setup_for(&tmp).plan().expect("planning should succeed");

    assert!(plan.issues.is_empty(), "clean config: {:?}", plan.issues);

    let slices: Vec<String> = plan.slices.iter().map(ToString::to_string).collect();
    assert_eq!(
        slices,
        ["features/cart", "features/checkout", "entities/product"]
    );

    // cart and checkout each guard against one higher layer plus
    // siblings; product sits a layer lower and guards against two.
    let per_slice: Vec<usize> = plan.rules.iter().map(|r| r.rules.len()).collect();
    assert_eq!(per_slice, [2, 2, 3]);
    assert_eq!(plan.rule_count(), 7);

    let aliases: Vec<&str> = plan.aliases.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(aliases, ["~app", "~features", "~entities", "~shared"]);
    assert_eq!(plan.aliases[0].path, plan.root.join("app"));

    assert!(
        plan.import_dirs.is_empty(),
        "no segment directories exist in the bare tree"
    );
    assert!(plan.component_dirs.is_empty());

    assert_eq!(plan.remaps.len(), 2);
    assert_eq!(plan.remaps[0].kind, RemapKind::PageRoutes);
    assert_eq!(plan.remaps[0].path, plan.root.join("app/routes"));
    assert_eq!(plan.remaps[1].kind, RemapKind::Layouts);
    assert_eq!(plan.remaps[1].path, plan.root.join("app/layouts"));
}

#[test]
fn cross_layer_rules_target_every_higher_layer() {
    let tmp = scenario_tree();
    let plan = setup_for(&tmp).plan().expect("planning should succeed");
    let root = plan.root.display().to_string();

    let product = plan
        .rules
        .iter()
        .find(|r| r.slice.to_string() == "entities/product")
        .expect("product slice should have rules");

    assert_eq!(product.rules[0].message, CROSS_LAYER_MESSAGE);
    assert_eq!(product.rules[1].message, CROSS_LAYER_MESSAGE);
    assert_eq!(product.rules[2].message, CROSS_SLICE_MESSAGE);

    // Higher layers in declaration order: app first, then features.
    assert!(product.rules[0]
        .pattern
        .is_match(&format!("{root}/app/init.ts")));
    assert!(!product.rules[0]
        .pattern
        .is_match(&format!("{root}/shared/ui/button.ts")));
    assert!(product.rules[1]
        .pattern
        .is_match(&format!("{root}/features/cart/ui/AddToCart.vue")));
    assert!(!product.rules[1]
        .pattern
        .is_match(&format!("{root}/entities/product/model.ts")));
}

#[test]
fn sibling_rule_honors_public_api_escape() {
    let tmp = scenario_tree();
    let plan = setup_for(&tmp).plan().expect("planning should succeed");
    let root = plan.root.display().to_string();

    let cart = plan
        .rules
        .iter()
        .find(|r| r.slice.to_string() == "features/cart")
        .expect("cart slice should have rules");
    let sibling = cart.rules.last().expect("sibling rule is always last");
    assert_eq!(sibling.message, CROSS_SLICE_MESSAGE);

    assert!(sibling
        .pattern
        .is_match(&format!("{root}/features/checkout/api/pay.ts")));
    assert!(
        !sibling
            .pattern
            .is_match(&format!("{root}/features/cart/model/store.ts")),
        "the slice's own subtree is never a cross-import"
    );
    assert!(
        !sibling
            .pattern
            .is_match(&format!("{root}/features/checkout/@x/cart/index.ts")),
        "the public-API escape addressed to cart is allowed"
    );
    assert!(
        sibling
            .pattern
            .is_match(&format!("{root}/features/checkout/@x/billing/index.ts")),
        "an escape addressed to a different slice stays forbidden"
    );
    assert!(
        !sibling
            .pattern
            .is_match(&format!("{root}/entities/product/ui/Card.vue")),
        "other layers are out of this rule's reach"
    );

    // The collaborator-facing raw form keeps the lookahead syntax.
    assert!(sibling
        .pattern
        .as_str()
        .starts_with(&format!("^{}/features/", regex::escape(&root))));
    assert!(sibling
        .pattern
        .as_str()
        .ends_with("(?!cart(?:/|$)|.+/@x/cart(?:/|$))"));
}

#[test]
fn scope_globs_confine_rules_to_their_slice() {
    let tmp = scenario_tree();
    let plan = setup_for(&tmp).plan().expect("planning should succeed");
    let root = plan.root.display().to_string();

    let cart = plan
        .rules
        .iter()
        .find(|r| r.slice.to_string() == "features/cart")
        .expect("cart slice should have rules");
    let scope = &cart.rules[0].scope;

    assert_eq!(scope.as_str(), format!("{root}/features/cart/**/*"));
    assert!(scope.matches(Path::new(&format!("{root}/features/cart/ui/AddToCart.vue"))));
    assert!(scope.matches(Path::new(&format!("{root}/features/cart/index.ts"))));
    assert!(!scope.matches(Path::new(&format!("{root}/features/checkout/ui/Pay.vue"))));
}

// ── Re-planning: idempotence and tree changes ──

#[test]
fn planning_twice_yields_identical_plans() {
    let tmp = scenario_tree();
    let setup = setup_for(&tmp);

    let first = setup.plan().expect("first plan should succeed");
    let second = setup.plan().expect("second plan should succeed");
    assert_eq!(first, second);
}

#[test]
fn new_slice_appears_on_rescan() {
    let tmp = scenario_tree();
    let setup = setup_for(&tmp);
    assert_eq!(setup.plan().expect("first plan").rule_count(), 7);

    fs::create_dir_all(tmp.path().join("src/features/wishlist")).expect("new slice dir");

    let plan = setup.plan().expect("second plan");
    let slices: Vec<String> = plan.slices.iter().map(ToString::to_string).collect();
    assert_eq!(
        slices,
        [
            "features/cart",
            "features/checkout",
            "features/wishlist",
            "entities/product"
        ]
    );
    assert_eq!(plan.rule_count(), 9);
}

// ── Full cycle: host installation and registry publication ──

#[test]
fn full_cycle_installs_artifacts_and_publishes_bundles() {
    let tmp = scenario_tree();
    let setup = setup_for(&tmp);
    let mut registry = RuleRegistry::new();
    let mut host = RecordingHost::new();
    let mut sink = RecordingSink::new();

    {
        let mut sinks: [&mut dyn fsd_guard_core::EnforcementSink; 1] = [&mut sink];
        setup
            .run_cycle(&mut registry, &mut host, &mut sinks)
            .expect("first cycle should succeed");
    }

    assert_eq!(host.aliases.len(), 4);
    assert_eq!(host.remaps.len(), 2);
    let names: Vec<&str> = sink.bundles().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "fsd:features/cart#1",
            "fsd:features/checkout#1",
            "fsd:entities/product#1"
        ]
    );

    // A second cycle replaces every bundle under fresh names.
    host.clear();
    {
        let mut sinks: [&mut dyn fsd_guard_core::EnforcementSink; 1] = [&mut sink];
        setup
            .run_cycle(&mut registry, &mut host, &mut sinks)
            .expect("second cycle should succeed");
    }

    assert_eq!(registry.cycle(), 2);
    assert_eq!(sink.installs(), 2);
    assert!(sink.bundles().iter().all(|b| b.name.ends_with("#2")));
    assert_eq!(host.aliases.len(), 4, "artifacts are re-registered in full");
}

// ── Soft validation: issues ride along, planning continues ──

#[test]
fn config_issues_do_not_block_planning() {
    let tmp = scenario_tree();
    let mut config = scenario_config();
    config.layers.insert(3, "wid:gets".to_string());

    let setup = Setup::builder()
        .project_dir(tmp.path())
        .config(config)
        .build()
        .expect("setup should build");
    let plan = setup.plan().expect("planning should still succeed");

    assert_eq!(plan.issues.len(), 1);
    assert!(matches!(
        plan.issues[0],
        ConfigIssue::IllegalLayerName { ref name, character }
            if name.as_str() == "wid:gets" && character == ':'
    ));

    // The degraded layer stays in the model, so it still gets an alias;
    // its directory does not exist, so slices and rules are unchanged.
    assert_eq!(plan.aliases.len(), 5);
    assert_eq!(plan.slices.len(), 3);
    assert_eq!(plan.rule_count(), 7);
}

// ── Serialized plan: the JSON wire shape ──

#[test]
fn plan_serializes_for_json_consumers() {
    let tmp = scenario_tree();
    let plan = setup_for(&tmp).plan().expect("planning should succeed");
    let root = plan.root.display().to_string();

    let value = serde_json::to_value(&plan).expect("plan should serialize");

    assert_eq!(value["root"], serde_json::json!(root));
    assert_eq!(value["issues"], serde_json::json!([]));
    assert_eq!(
        value["slices"][0]["layer"]["name"],
        serde_json::json!("features")
    );
    assert_eq!(value["slices"][0]["name"], serde_json::json!("cart"));
    assert_eq!(value["aliases"][0]["name"], serde_json::json!("~app"));
    assert_eq!(value["remaps"][0]["kind"], serde_json::json!("page-routes"));
    assert_eq!(value["remaps"][1]["kind"], serde_json::json!("layouts"));

    // Scope and pattern flatten to plain strings on the wire.
    let first_rule = &value["rules"][0]["rules"][0];
    assert_eq!(
        first_rule["scope"],
        serde_json::json!(format!("{root}/features/cart/**/*"))
    );
    assert_eq!(
        first_rule["pattern"],
        serde_json::json!(format!("^{}/app/", regex::escape(&root)))
    );
    assert_eq!(first_rule["message"], serde_json::json!(CROSS_LAYER_MESSAGE));
}

// ── Watch loop: directory creation drives a fresh plan ──

#[test]
fn watch_loop_replans_when_a_slice_is_created() {
    let tmp = scenario_tree();
    let setup = setup_for(&tmp);
    assert_eq!(setup.plan().expect("initial plan").rule_count(), 7);

    let layers = Layers::resolve(&setup.config().layers).0;
    let watcher = ChangeWatcher::new(setup.root(), layers).expect("watcher start");

    let (plans_tx, plans_rx) = mpsc::channel();
    let replanner = setup.clone();
    thread::spawn(move || {
        watcher.run(|event| {
            let plan = replanner.plan().expect("re-plan should succeed");
            let _ = plans_tx.send((event, plan));
        });
    });

    fs::create_dir(tmp.path().join("src/features/wishlist")).expect("new slice dir");

    let (event, plan) = plans_rx
        .recv_timeout(Duration::from_secs(10))
        .expect("the watch loop should deliver a re-plan");
    assert_eq!(
        event,
        TreeEvent::SliceCreated {
            layer: "features".to_string(),
            slice: "wishlist".to_string(),
        }
    );
    let slices: Vec<String> = plan.slices.iter().map(ToString::to_string).collect();
    assert!(slices.contains(&"features/wishlist".to_string()));
    assert_eq!(plan.rule_count(), 9);
}
