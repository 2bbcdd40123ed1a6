//! Multi-station processing integration tests

use super::{station_file, write_latin1};
use crate::config::PipelineConfig;
use crate::processor::BatchProcessor;
use std::fs;
use tempfile::TempDir;

fn feature_years(json: &serde_json::Value) -> Vec<(String, i64)> {
    json["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|feature| {
            (
                feature["properties"]["station"].as_str().unwrap().to_string(),
                feature["properties"]["year"].as_i64().unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_mixed_batch_skips_bad_files_and_continues() {
    let temp_dir = TempDir::new().unwrap();

    write_latin1(
        temp_dir.path(),
        "inmet_a_current.csv",
        &station_file(
            "ATUAL",
            "-19,1",
            "-44,1",
            &[("2025/01/01", "5"), ("2025/01/02", "7,5")],
        ),
    );
    write_latin1(
        temp_dir.path(),
        "inmet_b_fallback.csv",
        &station_file(
            "ANTIGA",
            "-19,2",
            "-44,2",
            &[
                ("2023/01/10", "80"),
                ("2024/01/10", "12"),
                ("2024/06/10", "30"),
            ],
        ),
    );
    write_latin1(temp_dir.path(), "inmet_c_broken.csv", "REGIAO:;SE\nUF:;MG\n");
    write_latin1(temp_dir.path(), "notes.txt", "ignored");

    let output_path = temp_dir.path().join("precipitation.geojson");
    let processor = BatchProcessor::new(temp_dir.path().to_path_buf(), output_path.clone());
    let stats = processor.process().unwrap();

    assert_eq!(stats.files_discovered, 3);
    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.files_failed, 1);
    assert_eq!(stats.records_written, 2);
    assert_eq!(stats.skipped.len(), 1);
    assert_eq!(stats.skipped[0].kind, "malformed_header");
    assert!(stats.skipped[0].path.ends_with("inmet_c_broken.csv"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(
        feature_years(&json),
        vec![("ATUAL".to_string(), 2025), ("ANTIGA".to_string(), 2024)]
    );

    let fallback = &json["features"][1]["properties"];
    assert_eq!(fallback["precip_month"], 12.0);
    assert_eq!(fallback["precip_period"], 122.0);
}

#[test]
fn test_custom_target_and_pattern() {
    let temp_dir = TempDir::new().unwrap();

    write_latin1(
        temp_dir.path(),
        "station_01.CSV",
        &station_file(
            "FEVEREIRO",
            "-19,3",
            "-44,3",
            &[("2026/02/01", "3,5"), ("2026/02/02", "1"), ("2026/01/01", "50")],
        ),
    );
    write_latin1(
        temp_dir.path(),
        "inmet_ignored.csv",
        &station_file("IGNORADA", "-19,4", "-44,4", &[("2026/02/01", "1")]),
    );

    let output_path = temp_dir.path().join("feb.geojson");
    let config = PipelineConfig::default()
        .with_target(2026, 2)
        .with_file_pattern("station_*.CSV");
    let processor = BatchProcessor::new(temp_dir.path().to_path_buf(), output_path.clone())
        .with_config(config);

    let stats = processor.process().unwrap();
    assert_eq!(stats.files_discovered, 1);
    assert_eq!(stats.records_written, 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    let properties = &json["features"][0]["properties"];
    assert_eq!(properties["station"], "FEVEREIRO");
    assert_eq!(properties["year"], 2026);
    assert_eq!(properties["precip_month"], 4.5);
    assert_eq!(properties["precip_period"], 54.5);
}
