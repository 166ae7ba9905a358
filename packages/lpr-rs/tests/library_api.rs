//! Integration tests for the lpr-rs library API

#[test]
fn test_prelude_imports() {
    use lpr_rs::prelude::*;

    assert_eq!(normalize("ab 12 cde"), "AB12CDE");
    assert!(is_compliant("AB12CDE"));
    assert_eq!(correct("4B1OCDE"), "AB10CDE");
    assert_eq!(try_correct("4B1ZCDE"), None);

    let plate = BoundingBox::new(20.0, 60.0, 60.0, 75.0);
    let vehicles = [TrackedVehicle {
        bbox: BoundingBox::new(10.0, 10.0, 100.0, 100.0),
        id: 1,
    }];
    assert_eq!(match_vehicle(&plate, &vehicles).map(|v| v.id), Some(1));
}

#[test]
fn test_canonical_plate_passes_unchanged() {
    use lpr_rs::{correct, is_compliant};

    assert!(is_compliant("AB12CDE"));
    assert_eq!(correct("AB12CDE"), "AB12CDE");
}

#[test]
fn test_unfixable_candidate_is_skipped() {
    use lpr_rs::{first_compliant, TextRegion};

    assert!(!lpr_rs::is_compliant("4B1ZCDE"));
    assert_eq!(first_compliant(&[TextRegion::new("4B1ZCDE", 0.9)]), None);

    let read = first_compliant(&[
        TextRegion::new("4B1ZCDE", 0.9),
        TextRegion::new("4B1OCDE", 0.6),
    ])
    .unwrap();
    assert_eq!(read.text, "AB10CDE");
    assert_eq!(read.confidence, 0.6);
}

#[test]
fn test_first_compliant_wins_over_higher_confidence() {
    use lpr_rs::{first_compliant, TextRegion};

    let read = first_compliant(&[
        TextRegion::new("XY98ZZZ", 0.4),
        TextRegion::new("AB12CDE", 0.9),
    ])
    .unwrap();
    assert_eq!(read.text, "XY98ZZZ");
    assert_eq!(read.confidence, 0.4);
}

#[tokio::test]
async fn test_reader_over_scripted_engine() {
    use lpr_rs::{OcrInput, PlateReader, ScriptedEngine, TextRegion};

    let reader = PlateReader::new(ScriptedEngine::fixed(vec![
        TextRegion::new("??", 0.99),
        TextRegion::new("ab 12 cde", 0.7),
    ]));
    let input = OcrInput::luma(2, 1, vec![0, 255]).unwrap();
    let read = reader.read(&input).await.unwrap().unwrap();
    assert_eq!(read.text, "AB12CDE");
    assert_eq!(read.confidence, 0.7);
}

#[test]
fn test_export_line_format() {
    use lpr_rs::{write_records, BoundingBox, FrameRecord, ResultStore};

    let mut store = ResultStore::new();
    store.insert(FrameRecord {
        frame: 3,
        car_id: 7,
        car_bbox: BoundingBox::new(10.0, 10.0, 50.0, 50.0),
        plate_bbox: BoundingBox::new(20.0, 20.0, 30.0, 25.0),
        plate_score: 0.8,
        text: "AB12CDE".to_string(),
        text_score: 0.95,
    });

    let mut out = Vec::new();
    assert_eq!(write_records(&store, &mut out).unwrap(), 1);
    let csv = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "frame_nmr,car_id,car_bbox,license_plate_bbox,license_plate_bbox_score,license_number,license_number_score",
            "3,7,[10 10 50 50],[20 20 30 25],0.8,AB12CDE,0.95",
        ]
    );
}

#[test]
fn test_config_module() {
    use lpr_rs::config::PipelineConfig;

    let config = PipelineConfig::from_yaml("ocr_concurrency: 4\ntracker:\n  min_hits: 2\n").unwrap();
    assert_eq!(config.ocr_concurrency, 4);
    assert_eq!(config.tracker.min_hits, 2);
    assert_eq!(config.binarize_threshold, 64);
    assert_eq!(config.vehicle_classes, vec![2, 3, 5, 7]);
}
