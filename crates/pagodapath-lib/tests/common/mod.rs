use std::path::PathBuf;

use pagodapath_lib::{Atlas, PointRecord};

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/pagodas.json")
}

pub fn fixture_records() -> Vec<PointRecord> {
    pagodapath_lib::load_points(&fixture_path()).expect("fixture loads")
}

pub fn fixture_atlas() -> Atlas {
    Atlas::from_records(&fixture_records())
        .expect("fixture is valid")
        .0
}

pub fn atlas_of(points: &[(&str, f64, f64)]) -> Atlas {
    let records: Vec<PointRecord> = points
        .iter()
        .map(|(name, lat, lng)| PointRecord {
            name: name.to_string(),
            lat: *lat,
            lng: *lng,
        })
        .collect();
    Atlas::from_records(&records).expect("valid records").0
}
