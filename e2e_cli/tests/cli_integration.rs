use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn station_log(trials: usize) -> String {
    let mut s = String::from("[    0.000000] e2e: module loaded\n");
    for i in 0..trials {
        let on = i * 1_000_000;
        s.push_str(&format!("[ {i}.100000] {i} - GPIO_16_IRQ: {}\n", on + 150));
        s.push_str(&format!("[ {i}.200000] {i} - MOTION: {on};{}\n", on + 100));
    }
    s
}

fn vehicle_log(trials: usize) -> String {
    let mut s = String::new();
    for i in 0..trials {
        let on = i * 1_000_000;
        s.push_str(&format!("[ {i}.050000] LED_ON: {}\n", on + 160));
        s.push_str(&format!("[ {i}.300000] {i} - MOTION: {};{}\n", on + 10, on + 110));
    }
    s
}

fn write_pair(dir: &Path, index: usize, station: &str, vehicle: &str) {
    fs::write(dir.join(format!("e2e_station_{index}.txt")), station).unwrap();
    fs::write(dir.join(format!("e2e_vehicle_{index}.txt")), vehicle).unwrap();
}

fn run_cmd(input: &Path, output: &Path) -> Command {
    let mut cmd = Command::cargo_bin("e2e_cli").unwrap();
    cmd.arg("--log-level")
        .arg("warn")
        .arg("run")
        .arg("--input-dir")
        .arg(input)
        .arg("--output-dir")
        .arg(output);
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["run", "--help"], 0, "--start-index", "stdout")]
#[case(&["bogus"], 2, "unrecognized subcommand", "stderr")]
#[case(&["run", "--max-pairs", "0"], 2, "invalid value", "stderr")]
#[case(&["run", "--counter", "sideways"], 2, "invalid value", "stderr")]
#[case(&["pair", "--station", "a.txt"], 2, "required", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let mut cmd = Command::cargo_bin("e2e_cli").unwrap();
    for a in args {
        cmd.arg(a);
    }
    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        _ => {
            assert.stderr(predicate::str::contains(needle));
        }
    }
}

#[test]
fn run_writes_a_report_per_pair_until_the_first_gap() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_pair(input.path(), 0, &station_log(3), &vehicle_log(3));
    write_pair(input.path(), 1, &station_log(2), &vehicle_log(2));
    // index 2 missing: pair 3 is never reached
    write_pair(input.path(), 3, &station_log(1), &vehicle_log(1));

    run_cmd(input.path(), output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("pair 0: 3 trial(s)"))
        .stdout(predicate::str::contains("pair 1: 2 trial(s)"))
        .stdout(predicate::str::contains("processed 2 pair(s)"));

    for index in 0..2 {
        let dir = output.path().join(format!("output_{index}"));
        for name in ["RAW_DATA", "M2M", "G2G", "E2E", "PID"] {
            assert!(dir.join(format!("{name}.csv")).is_file(), "{name} for pair {index}");
        }
    }
    assert!(!output.path().join("output_3").exists());
}

#[test]
fn empty_input_directory_processes_nothing() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    run_cmd(input.path(), output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("processed 0 pair(s)"));
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[rstest]
#[case(1, None, &[1, 2])]
#[case(0, Some(2), &[0, 1])]
#[case(2, Some(5), &[2])]
fn start_index_and_max_pairs(
    #[case] start: usize,
    #[case] max: Option<usize>,
    #[case] expected: &[usize],
) {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    for i in 0..3 {
        write_pair(input.path(), i, &station_log(2), &vehicle_log(2));
    }
    let mut cmd = run_cmd(input.path(), output.path());
    cmd.arg("--start-index").arg(start.to_string());
    if let Some(m) = max {
        cmd.arg("--max-pairs").arg(m.to_string());
    }
    cmd.assert().success().stdout(predicate::str::contains(format!(
        "processed {} pair(s)",
        expected.len()
    )));

    let mut written: Vec<usize> = fs::read_dir(output.path())
        .unwrap()
        .map(|e| {
            let name = e.unwrap().file_name().into_string().unwrap();
            name.trim_start_matches("output_").parse().unwrap()
        })
        .collect();
    written.sort_unstable();
    assert_eq!(written, expected);
}

#[test]
fn flagged_gpio_drops_the_trial() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let station = "GPIO_16_IRQ: 150\nMOTION: 0;100\nGPIO_16_IRQ: MULTIPLE\nMOTION: 1000;1100\nGPIO_16_IRQ: 2150\nMOTION: 2000;2100\n";
    let vehicle = "LED_ON: 160\nMOTION: 10;110\nLED_ON: 1160\nMOTION: 1010;1110\nLED_ON: 2160\nMOTION: 2010;2110\n";
    write_pair(input.path(), 0, station, vehicle);

    run_cmd(input.path(), output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("pair 0: 2 trial(s), 1 excluded"));

    let raw = fs::read_to_string(output.path().join("output_0/RAW_DATA.csv")).unwrap();
    assert_eq!(raw.lines().count(), 3);
    assert!(!raw.contains("1010"));
}

#[test]
fn malformed_log_fails_with_humanized_error() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_pair(input.path(), 0, &station_log(1), &vehicle_log(1));
    write_pair(input.path(), 1, "GPIO_16_IRQ: 150\nMOTION: 0;1x0\n", &vehicle_log(1));

    run_cmd(input.path(), output.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("What happened"))
        .stderr(predicate::str::contains("line 2"));

    assert!(output.path().join("output_0").is_dir());
    assert!(!output.path().join("output_1").exists());
}

#[test]
fn missing_led_value_exits_4() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_pair(
        input.path(),
        0,
        &station_log(2),
        "LED_ON: 160\nMOTION: 10;110\nMOTION: 1000010;1000110\n",
    );
    run_cmd(input.path(), output.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("LED_ON"));
}

#[test]
fn non_utf8_log_is_a_source_error() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_pair(input.path(), 0, &station_log(1), &vehicle_log(1));
    fs::write(input.path().join("e2e_vehicle_0.txt"), [0xff, 0xfe, 0x00]).unwrap();
    run_cmd(input.path(), output.path()).assert().code(5);
}

#[test]
fn pair_command_writes_output_zero() {
    let dir = tempdir().unwrap();
    let station = dir.path().join("s.txt");
    let vehicle = dir.path().join("v.txt");
    fs::write(&station, station_log(2)).unwrap();
    fs::write(&vehicle, vehicle_log(2)).unwrap();
    let out = dir.path().join("out");

    Command::cargo_bin("e2e_cli")
        .unwrap()
        .args(["--log-level", "warn", "pair", "--station"])
        .arg(&station)
        .arg("--vehicle")
        .arg(&vehicle)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("processed 1 pair(s)"));
    assert!(out.join("output_0/M2M.csv").is_file());
}

#[test]
fn pair_command_reports_unreadable_files() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("e2e_cli")
        .unwrap()
        .args(["pair", "--station"])
        .arg(dir.path().join("nope.txt"))
        .arg("--vehicle")
        .arg(dir.path().join("nope2.txt"))
        .assert()
        .code(5)
        .stderr(predicate::str::contains("could not be read"))
        .stderr(predicate::str::contains("nope.txt"));
}

#[test]
fn pair_command_rejects_non_utf8_logs_as_source_errors() {
    let dir = tempdir().unwrap();
    let station = dir.path().join("s.txt");
    let vehicle = dir.path().join("v.txt");
    fs::write(&station, station_log(1)).unwrap();
    fs::write(&vehicle, [0xff, 0xfe, 0x00]).unwrap();
    Command::cargo_bin("e2e_cli")
        .unwrap()
        .args(["--json", "pair", "--station"])
        .arg(&station)
        .arg("--vehicle")
        .arg(&vehicle)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .code(5)
        .stdout(predicate::str::contains("\"Source\""));
    assert!(!dir.path().join("out/output_0").exists());
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("cfg.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn config_file_sets_directories_and_prefix() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("logs");
    let output = dir.path().join("reports");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("st_0.log"), station_log(2)).unwrap();
    fs::write(input.join("ve_0.log"), vehicle_log(2)).unwrap();
    let cfg = write_config(
        dir.path(),
        &format!(
            r#"
[input]
dir = "{}"
station_pattern = "st_{{index}}.log"
vehicle_pattern = "ve_{{index}}.log"

[output]
dir = "{}"
prefix = "run_"

[parser]
counter = "per-channel"
"#,
            input.display(),
            output.display()
        ),
    );

    Command::cargo_bin("e2e_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("processed 1 pair(s)"));
    assert!(output.join("run_0/E2E.csv").is_file());
}

#[rstest]
#[case("[input]\ndir = \"\"\n", "Invalid configuration")]
#[case("[parser]\ncounter = \"sideways\"\n", "not valid TOML")]
#[case("[logging]\nrotation = \"weekly\"\n", "Invalid configuration")]
fn bad_config_fails_before_processing(#[case] body: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), body);
    Command::cargo_bin("e2e_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(needle));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("e2e_cli")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file could not be read"));
}

#[test]
fn file_logging_writes_json_lines() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir_all(&input).unwrap();
    write_pair(&input, 0, &station_log(1), &vehicle_log(1));
    let log = dir.path().join("e2e.log");
    let cfg = write_config(
        dir.path(),
        &format!(
            "[input]\ndir = \"{}\"\n[output]\ndir = \"{}\"\n[logging]\nfile = \"{}\"\nlevel = \"info\"\n",
            input.display(),
            dir.path().join("out").display(),
            log.display()
        ),
    );
    Command::cargo_bin("e2e_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("run")
        .assert()
        .success();

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.lines().any(|l| l.contains("run complete")));
}
