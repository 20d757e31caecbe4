use citegraph::config::*;
use citegraph::citegraph::CiteGraph;
use citegraph::types::{NodeInclusion, OutputFormat, ResolutionPolicy};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_default_config_matches_dataset_layout() {
    let config = CiteGraphConfig::default();
    assert_eq!(config.metadata_path, PathBuf::from("cord-19/metadata.csv"));
    assert_eq!(config.document_root, PathBuf::from("cord-19"));
    assert_eq!(config.metadata.id_column, "cord_uid");
    assert_eq!(config.metadata.title_column, "title");
    assert_eq!(config.resolution_policy, ResolutionPolicy::IdentifierThenTitle);
    assert_eq!(config.node_inclusion, NodeInclusion::Connected);
    assert_eq!(config.output_format, OutputFormat::Json);
    assert!(config.validate().is_ok());
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("citegraph.json");
    let config = CiteGraphConfig {
        output_format: OutputFormat::Gexf,
        resolution_policy: ResolutionPolicy::TitleOnly,
        largest_component: true,
        ..CiteGraphConfig::default()
    };
    save_config(&path, &config).unwrap();
    let loaded = load_config(&path).unwrap();
    assert_eq!(config, loaded);
    assert!(!path.with_extension("tmp").exists(), "temp file should be renamed away");
}

#[test]
fn test_partial_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("citegraph.json");
    std::fs::write(
        &path,
        r#"{"metadata_path": "data/meta.csv", "resolution_policy": "id-only"}"#,
    )
    .unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.metadata_path, PathBuf::from("data/meta.csv"));
    assert_eq!(config.resolution_policy, ResolutionPolicy::IdentifierOnly);
    assert_eq!(config.metadata.id_column, "cord_uid");
}

#[test]
fn test_load_config_or_default_prefers_file_in_dir() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        load_config_or_default(None, dir.path()).unwrap(),
        CiteGraphConfig::default()
    );

    std::fs::write(dir.path().join(CONFIG_FILENAME), r#"{"largest_component": true}"#).unwrap();
    assert!(load_config_or_default(None, dir.path()).unwrap().largest_component);
}

#[test]
fn test_invalid_config_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("config error"), "got: {}", err);
    assert!(load_config(&dir.path().join("missing.json")).is_err());
}

#[test]
fn test_validate_rejects_bad_columns() {
    let mut config = CiteGraphConfig::default();
    config.metadata.id_column = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = CiteGraphConfig::default();
    config.metadata.title_column = config.metadata.id_column.clone();
    assert!(config.validate().is_err());

    let config = CiteGraphConfig {
        output_path: PathBuf::new(),
        ..CiteGraphConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_default_output_does_not_clobber_config_file() {
    assert_ne!(
        CiteGraphConfig::default().output_path,
        PathBuf::from(CONFIG_FILENAME)
    );
}

#[test]
fn test_saved_config_survives_a_run_with_default_output() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("metadata.csv"), "cord_uid,title\nP1,Title A\n").unwrap();

    let config = CiteGraphConfig {
        metadata_path: dir.path().join("metadata.csv"),
        document_root: dir.path().to_path_buf(),
        output_path: dir.path().join(DEFAULT_OUTPUT_PATH),
        resolution_policy: ResolutionPolicy::IdentifierOnly,
        node_inclusion: NodeInclusion::All,
        ..CiteGraphConfig::default()
    };
    save_config(&dir.path().join(CONFIG_FILENAME), &config).unwrap();

    let loaded = load_config_or_default(None, dir.path()).unwrap();
    CiteGraph::new(loaded).unwrap().run().unwrap();

    let reloaded = load_config_or_default(None, dir.path()).unwrap();
    assert_eq!(reloaded.resolution_policy, ResolutionPolicy::IdentifierOnly);
    assert_eq!(reloaded.node_inclusion, NodeInclusion::All);
}

#[test]
fn test_config_file_uses_command_line_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILENAME);
    std::fs::write(
        &path,
        r#"{"resolution_policy": "title-then-id", "output_format": "gexf"}"#,
    )
    .unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.resolution_policy, ResolutionPolicy::TitleThenIdentifier);
    assert_eq!(config.output_format, OutputFormat::Gexf);

    save_config(&path, &config).unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains(r#""resolution_policy": "title-then-id""#), "got: {}", saved);

    for policy in [
        ResolutionPolicy::IdentifierThenTitle,
        ResolutionPolicy::IdentifierOnly,
        ResolutionPolicy::TitleOnly,
        ResolutionPolicy::TitleThenIdentifier,
    ] {
        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(json, format!("\"{}\"", policy.as_str()));
    }
}
