//! Config loading, grid export and slice extraction as driven by `cep-sim`.

use std::fs;
use std::path::PathBuf;

use chirality_echo_sim::files::{load_config, read_mid_slice, sample_cycle_path, save_grids};
use chirality_echo_sim::npy::write_slice_csv;
use chirality_echo_sim::prelude::*;

/// Fresh scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cep_sim_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn ramp_grid(n: usize, offset: f64) -> VorticityGrid {
    let data = (0..n * n * n).map(|v| v as f64 + offset).collect();
    VorticityGrid::from_vec(n, data).unwrap()
}

#[test]
fn missing_config_path_gives_defaults() {
    assert_eq!(load_config(None).unwrap(), CycleConfig::default());
}

#[test]
fn partial_config_file_is_loaded() {
    let dir = scratch_dir("partial_config");
    let path = dir.join("cycle.json");
    fs::write(&path, r#"{ "foam": { "size": 10 }, "inflation": { "stretch_factor": 2 } }"#).unwrap();

    let config = load_config(Some(&path)).unwrap();
    let _ = fs::remove_dir_all(&dir);

    assert_eq!(config.foam.size, 10);
    assert_eq!(config.final_size(), 20);
    assert_eq!(config.reheating, ReheatingConfig::default());
}

#[test]
fn malformed_config_reports_its_path() {
    let dir = scratch_dir("malformed_config");
    let path = dir.join("broken.json");
    fs::write(&path, "{ \"foam\": ").unwrap();

    let err = load_config(Some(&path)).unwrap_err();
    let _ = fs::remove_dir_all(&dir);

    match err {
        SimError::ConfigParse { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn invalid_config_values_are_rejected() {
    let dir = scratch_dir("invalid_config");
    let sigma = dir.join("sigma.json");
    fs::write(&sigma, r#"{ "foam": { "sigma": 0.0 } }"#).unwrap();
    let stretch = dir.join("stretch.json");
    fs::write(&stretch, r#"{ "foam": { "size": 2 }, "inflation": { "stretch_factor": 4194304 } }"#)
        .unwrap();

    let sigma_err = load_config(Some(&sigma));
    let stretch_err = load_config(Some(&stretch));
    let _ = fs::remove_dir_all(&dir);

    assert!(matches!(sigma_err, Err(SimError::InvalidConfig(_))));
    assert!(matches!(stretch_err, Err(SimError::InvalidConfig(_))));
}

#[test]
fn grids_are_saved_with_one_based_names() {
    let dir = scratch_dir("save_grids");
    let out = dir.join("nested");
    let grids = vec![ramp_grid(3, 0.0), ramp_grid(3, 100.0)];

    let paths = save_grids(&out, &grids).unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["sample_cycle1.npy", "sample_cycle2.npy"]);
    assert_eq!(paths[1], sample_cycle_path(&out, 1));

    let second = read_mid_slice(&paths[1]).unwrap();
    let _ = fs::remove_dir_all(&dir);

    // Plane i = 1 of a 3³ ramp starts at voxel 9.
    assert_eq!(second[0], vec![109.0, 110.0, 111.0]);
}

#[test]
fn saved_cycle_slices_to_csv() {
    let dir = scratch_dir("slice_csv");
    let (_, grid) = run_cycle_seeded(&CycleConfig::default().with_size(4), 3).unwrap();
    let paths = save_grids(&dir, std::slice::from_ref(&grid)).unwrap();

    let plane = read_mid_slice(&paths[0]).unwrap();
    let mut csv = Vec::new();
    write_slice_csv(&mut csv, &plane).unwrap();
    let _ = fs::remove_dir_all(&dir);

    let text = String::from_utf8(csv).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 16);
    assert!(rows.iter().all(|r| r.split(',').count() == 16));
    assert_eq!(plane, grid.mid_slice().unwrap());
}

#[test]
fn empty_grid_file_is_rejected() {
    let dir = scratch_dir("empty_grid");
    let path = dir.join("empty.npy");
    let header = "{'descr': '<f8', 'fortran_order': False, 'shape': (0, 0, 0), }\n";
    let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
    bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());
    fs::write(&path, bytes).unwrap();

    let result = read_mid_slice(&path);
    let _ = fs::remove_dir_all(&dir);

    assert!(matches!(result, Err(SimError::Npy(_))));
}
