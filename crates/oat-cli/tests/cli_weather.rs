use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_fixture(dir: &std::path::Path) -> (String, String) {
    let shutoffs = dir.join("processed-shutoffs.csv");
    fs::write(
        &shutoffs,
        "circuit_name,deenergize_time,restoration_time,total_affected\n\
         APPLE,2020-06-10 13:45:00,2020-06-11 08:00:00,120\n\
         BAKER,2020-10-25 02:00:00,2020-10-26 12:30:00,45\n",
    )
    .unwrap();

    let weather_dir = dir.join("daily");
    fs::create_dir_all(&weather_dir).unwrap();
    fs::write(
        weather_dir.join("weather_0_APPLE_2020-06-10.csv"),
        "time,tmin,tmax,wspd\n\
         2020-06-05,10.0,20.0,3.0\n\
         2020-06-06,11.0,21.0,4.0\n\
         2020-06-07,12.0,22.0,5.0\n\
         2020-06-08,13.0,23.0,6.0\n\
         2020-06-09,14.0,24.0,7.0\n",
    )
    .unwrap();

    (
        shutoffs.to_str().unwrap().to_string(),
        weather_dir.to_str().unwrap().to_string(),
    )
}

#[test]
fn weather_join_writes_merged_csv_and_manifest() {
    let dir = tempdir().unwrap();
    let (shutoffs, weather_dir) = write_fixture(dir.path());
    let out = dir.path().join("out").join("merged.csv");

    Command::cargo_bin("oat")
        .unwrap()
        .args([
            "weather",
            "join",
            "--shutoffs",
            shutoffs.as_str(),
            "--weather-dir",
            weather_dir.as_str(),
            "--out",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "circuit names consistent across join: true",
        ));

    let merged = fs::read_to_string(&out).unwrap();
    let header = merged.lines().next().unwrap();
    assert!(header.contains("circuit_name"));
    assert!(header.contains("tmin_d-5"));
    assert!(header.contains("wspd_d-1"));
    assert!(!header.contains("deenergize_time_date"));
    assert!(!header.contains("index"));
    // Only the shutoff row with weather survives the inner join.
    assert_eq!(merged.lines().count(), 2);
    assert!(merged.lines().nth(1).unwrap().contains("10.0"));

    let manifest_written = fs::read_dir(out.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .any(|e| e.file_name().to_string_lossy().starts_with("run-"));
    assert!(manifest_written);
}

#[test]
fn missing_shutoffs_file_fails() {
    let dir = tempdir().unwrap();
    let (_, weather_dir) = write_fixture(dir.path());

    Command::cargo_bin("oat")
        .unwrap()
        .arg("weather")
        .arg("join")
        .arg("--shutoffs")
        .arg(dir.path().join("absent.csv"))
        .arg("--weather-dir")
        .arg(&weather_dir)
        .arg("--out")
        .arg(dir.path().join("merged.csv"))
        .assert()
        .failure();
}
