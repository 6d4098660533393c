//! End-to-end integration test for a project configuration tree
//!
//! Exercises the complete flow: source listing -> pattern discovery -> merge
//! -> environment overlay -> runtime overrides -> adhoc shadowing.

use confmesh_core::{
    ConfigMapping, ConfigResolver, Error, GlobDiscovery, RuntimeOverrides,
    SectionPatternRegistry,
};
use confmesh_fs::NormalizedPath;
use confmesh_fs::walk::list_files;
use confmesh_test_utils::ConfTree;
use pretty_assertions::assert_eq;
use serde_json::json;

/// A project laid out as `conf/base` + `conf/local` + `conf/prod`
fn setup_project() -> ConfTree {
    ConfTree::new()
        .with_file(
            "base/catalog.yml",
            "companies:\n  type: pandas.CSVDataset\n  filepath: data/01_raw/companies.csv\n",
        )
        .with_file(
            "base/catalog/shuttles.yml",
            "shuttles:\n  type: pandas.ExcelDataset\n  filepath: data/01_raw/shuttles.xlsx\n",
        )
        .with_file(
            "base/parameters.yml",
            "model_options:\n  test_size: 0.2\n  random_state: 3\n",
        )
        .with_file(
            "base/parameters/data_science.toml",
            "[model_options]\nfeatures = [\"engines\", \"passenger_capacity\"]\n",
        )
        .with_file("base/logging.yml", "version: 1\nroot:\n  level: INFO\n")
        .with_file("base/spark.yml", "spark.driver.maxResultSize: 3g\n")
        .with_file("local/credentials.yml", "dev_s3:\n  key: token\n")
        .with_file(
            "prod/catalog.yml",
            "companies:\n  filepath: s3://bucket/companies.csv\n",
        )
        .with_file("prod/logging.yml", "root:\n  level: WARNING\n")
        .with_file("base/.ipynb_checkpoints/catalog.yml", "companies: broken\n")
        .with_file("base/README.md", "# not configuration\n")
}

fn resolver(tree: &ConfTree, env: &str) -> ConfigResolver {
    let discovery = GlobDiscovery::new().with_optional_section("credentials");
    let registry = SectionPatternRegistry::from_patterns([("spark", ["spark*", "spark*/**"])])
        .unwrap();
    ConfigResolver::with_discovery(tree.root(), discovery)
        .unwrap()
        .with_registry(registry)
        .with_env(env)
}

#[test]
fn test_source_listing_skips_hidden_entries() {
    let tree = setup_project();
    let base = NormalizedPath::new(tree.root()).join("base");

    let files: Vec<String> = list_files(&base)
        .unwrap()
        .iter()
        .map(|f| f.strip_prefix(&base).unwrap().as_str().to_string())
        .collect();

    assert_eq!(
        files,
        vec![
            "README.md",
            "catalog.yml",
            "catalog/shuttles.yml",
            "logging.yml",
            "parameters.yml",
            "parameters/data_science.toml",
            "spark.yml",
        ]
    );
}

#[test]
fn test_prod_resolution() {
    let tree = setup_project();
    let resolver = resolver(&tree, "prod");

    assert_eq!(
        resolver.get("catalog").unwrap(),
        json!({
            "companies": {
                "type": "pandas.CSVDataset",
                "filepath": "s3://bucket/companies.csv"
            },
            "shuttles": {
                "type": "pandas.ExcelDataset",
                "filepath": "data/01_raw/shuttles.xlsx"
            }
        })
    );
    assert_eq!(
        resolver.get("logging").unwrap(),
        json!({ "version": 1, "root": { "level": "WARNING" } })
    );
    assert_eq!(
        resolver.get("parameters").unwrap(),
        json!({
            "model_options": {
                "test_size": 0.2,
                "random_state": 3,
                "features": ["engines", "passenger_capacity"]
            }
        })
    );
    // No credentials in base or prod, declared optional.
    assert_eq!(resolver.get("credentials").unwrap(), json!({}));
    assert_eq!(
        resolver.get("spark").unwrap(),
        json!({ "spark.driver.maxResultSize": "3g" })
    );
}

#[test]
fn test_local_resolution_picks_up_credentials() {
    let tree = setup_project();
    let resolver = resolver(&tree, "local");

    assert_eq!(
        resolver.get("credentials").unwrap(),
        json!({ "dev_s3": { "key": "token" } })
    );
    assert_eq!(
        resolver.get("catalog").unwrap()["companies"]["filepath"],
        "data/01_raw/companies.csv"
    );
}

#[test]
fn test_runtime_params_then_adhoc_shadowing() {
    let tree = setup_project();
    let mut overrides = RuntimeOverrides::new();
    overrides
        .insert("parameters.model_options.test_size", json!(0.3))
        .unwrap();
    let mut resolver = resolver(&tree, "prod").with_runtime_overrides(overrides);

    let params = resolver.get("parameters").unwrap();
    assert_eq!(params["model_options"]["test_size"], 0.3);
    assert_eq!(params["model_options"]["random_state"], 3);

    resolver.set("parameters", json!({ "fixed": true }));
    assert_eq!(resolver.get("parameters").unwrap(), json!({ "fixed": true }));

    resolver.delete("parameters").unwrap();
    assert_eq!(
        resolver.get("parameters").unwrap()["model_options"]["test_size"],
        0.3
    );
}

#[test]
fn test_resolve_all_for_prod() {
    let tree = setup_project();
    let resolver = resolver(&tree, "prod");

    let all = resolver.resolve_all().unwrap();

    assert_eq!(
        all.keys().cloned().collect::<Vec<_>>(),
        vec!["catalog", "credentials", "logging", "parameters", "spark"]
    );
}

#[test]
fn test_broken_overlay_is_reported_with_its_path() {
    let tree = setup_project().with_file("prod/parameters.yml", "model_options: [\n");
    let resolver = resolver(&tree, "prod");

    match resolver.get("parameters").unwrap_err() {
        Error::BadConfiguration { source_id, .. } => {
            assert!(source_id.ends_with("prod/parameters.yml"), "got {source_id}");
        }
        other => panic!("expected BadConfiguration, got {other:?}"),
    }
}
