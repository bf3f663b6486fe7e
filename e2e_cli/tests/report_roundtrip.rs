//! Summaries written to the metric CSVs recompute exactly from the written columns.

use assert_cmd::prelude::*;
use e2e_core::Summary;
use rstest::rstest;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write_pair(dir: &Path, skews: &[i64]) {
    let mut station = String::new();
    let mut vehicle = String::new();
    for (i, skew) in skews.iter().enumerate() {
        let on = i as i64 * 100_000;
        station.push_str(&format!("GPIO_16_IRQ: {}\nMOTION: {on};{}\n", on + 4_321, on + 2_000));
        vehicle.push_str(&format!(
            "LED_ON: {}\nMOTION: {};{}\n",
            on + skew + 5_000 + i as i64 * 7,
            on + skew,
            on + skew + 1_900
        ));
    }
    fs::write(dir.join("e2e_station_0.txt"), station).unwrap();
    fs::write(dir.join("e2e_vehicle_0.txt"), vehicle).unwrap();
}

fn read_table(path: &Path) -> Vec<Vec<String>> {
    let mut r = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .unwrap();
    r.records()
        .map(|rec| rec.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn column(rows: &[Vec<String>], idx: usize) -> Vec<f64> {
    rows.iter()
        .filter(|r| !r[idx].is_empty())
        .map(|r| r[idx].parse().unwrap())
        .collect()
}

fn written_summary(row: &[String]) -> Summary {
    let v: Vec<f64> = row[4..8].iter().map(|c| c.parse().unwrap()).collect();
    Summary {
        min: v[0],
        max: v[1],
        mean: v[2],
        stdev: v[3],
    }
}

#[rstest]
#[case("M2M")]
#[case("G2G")]
#[case("E2E")]
#[case("PID")]
fn summaries_recompute_from_columns(#[case] sheet: &str) {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_pair(input.path(), &[13, -7, 250, 0, 1_001, -999]);

    Command::cargo_bin("e2e_cli")
        .unwrap()
        .args(["--log-level", "warn", "run", "--input-dir"])
        .arg(input.path())
        .arg("--output-dir")
        .arg(output.path())
        .assert()
        .success();

    let rows = read_table(&output.path().join(format!("output_0/{sheet}.csv")));
    assert_eq!(rows.len(), 6);

    let latency = column(&rows, 0);
    let jitter = column(&rows, 1);
    assert_eq!(latency.len(), 6);
    assert_eq!(jitter.len(), 6);

    assert_eq!(rows[0][3], "Latency");
    assert_eq!(written_summary(&rows[0]), Summary::of_abs(&latency).unwrap());
    assert_eq!(rows[1][3], "Jitter");
    assert_eq!(written_summary(&rows[1]), Summary::of_abs(&jitter[1..]).unwrap());
}

#[test]
fn raw_table_round_trips_integers() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_pair(input.path(), &[5, 6]);

    Command::cargo_bin("e2e_cli")
        .unwrap()
        .args(["--log-level", "warn", "run", "--input-dir"])
        .arg(input.path())
        .arg("--output-dir")
        .arg(output.path())
        .assert()
        .success();

    let rows = read_table(&output.path().join("output_0/RAW_DATA.csv"));
    let ints: Vec<Vec<i64>> = rows
        .iter()
        .map(|r| r.iter().map(|c| c.parse().unwrap()).collect())
        .collect();
    assert_eq!(
        ints,
        vec![
            vec![5, 1_905, 5_005, 0, 2_000, 4_321],
            vec![100_006, 101_906, 105_013, 100_000, 102_000, 104_321],
        ]
    );
}
