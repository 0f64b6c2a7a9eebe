use std::path::PathBuf;

use aspectfit::{
    ConflictPolicy, Gravity, JobConfig, KeepAxis, ListStrategy, MergeOptions, Rgba8, merge_layers,
    read_json,
};
use serde_json::json;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn later_config_files_win() {
    let cfg = JobConfig::load(
        &[data("base.json"), data("override.json")],
        &MergeOptions::default(),
    )
    .unwrap();
    let job = cfg.resolve().unwrap();

    assert_eq!(job.fit.aspect.value(), 1.0);
    assert_eq!(job.fit.keep, KeepAxis::Height);
    assert_eq!(job.fit.pad_gravity, Gravity::Bottom);
    assert_eq!(job.fit.pad_color, Rgba8::white());
    assert_eq!(job.save.jpeg_quality, 90);
    assert_eq!(job.save.format, "png");
}

#[test]
fn no_config_files_is_an_empty_layer() {
    let cfg = JobConfig::load::<PathBuf>(&[], &MergeOptions::default()).unwrap();
    assert_eq!(cfg, JobConfig::default());
}

#[test]
fn presets_merge_by_name() {
    let layers = vec![
        read_json(data("presets_a.json")).unwrap(),
        read_json(data("presets_b.json")).unwrap(),
    ];
    let merged = merge_layers(layers, &MergeOptions::by_key("name")).unwrap();
    assert_eq!(
        merged["presets"],
        json!([
            {"name": "square", "aspect": "1:1"},
            {"name": "story", "aspect": "9:16", "pad_color": "white"},
            {"name": "wide", "aspect": "21:9"}
        ])
    );
    // Scalars inside by-key lists are kept in order.
    assert_eq!(merged["tags"], json!(["web", "print", "print", "social"]));
}

#[test]
fn unique_strategy_drops_repeated_tags() {
    let layers = vec![
        read_json(data("presets_a.json")).unwrap(),
        read_json(data("presets_b.json")).unwrap(),
    ];
    let opts = MergeOptions {
        list_strategy: ListStrategy::Unique,
        ..MergeOptions::default()
    };
    let merged = merge_layers(layers, &opts).unwrap();
    assert_eq!(merged["tags"], json!(["web", "print", "social"]));
}

#[test]
fn raise_reports_type_conflict() {
    // `aspect` is a string in one file and a number in the other.
    let opts = MergeOptions {
        conflict: ConflictPolicy::Raise,
        ..MergeOptions::default()
    };
    let err = JobConfig::load(&[data("base.json"), data("override.json")], &opts).unwrap_err();
    assert!(err.to_string().contains("string vs number"), "{err}");
}

#[test]
fn bad_files_are_config_errors() {
    let err = read_json(data("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, aspectfit::AspectFitError::Config(_)));
    assert!(err.to_string().contains("does_not_exist.json"));
}
