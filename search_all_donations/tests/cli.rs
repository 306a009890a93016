use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn run_with_login(contents: &str) -> assert_cmd::assert::Assert {
    let dir = tempdir().expect("temp dir");
    let login = dir.path().join("login.yaml");
    fs::write(&login, contents).expect("write login file");
    Command::cargo_bin("search_all_donations")
        .expect("binary exists")
        .env("RUST_LOG", "off")
        .args(["--login", login.to_str().unwrap()])
        .assert()
}

#[test]
fn login_flag_is_required() {
    Command::cargo_bin("search_all_donations")
        .expect("binary exists")
        .assert()
        .code(2)
        .stderr(contains("--login"));
}

#[test]
fn reports_every_missing_key() {
    let assert = run_with_login("token: abc\nidentifierType: FUNDRAISE\n").code(1);
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    let errors: Vec<&str> = stdout.lines().filter(|l| l.starts_with("Error: ")).collect();
    assert_eq!(errors.len(), 3);
    assert!(errors[0].ends_with("must contain a host."));
    assert!(errors[1].ends_with("must contain a modifiedFrom."));
    assert!(errors[2].ends_with("must contain a modifiedTo."));
    assert!(stdout.ends_with("Too many errors, terminating.\n"));
}

#[test]
fn missing_login_file_fails() {
    Command::cargo_bin("search_all_donations")
        .expect("binary exists")
        .env("RUST_LOG", "off")
        .args(["--login", "/definitely/not/here.yaml"])
        .assert()
        .code(1)
        .stdout(contains("cannot read"));
}

#[test]
fn bad_host_fails_before_any_request() {
    run_with_login(
        "token: abc\nhost: not a url\nidentifierType: FUNDRAISE\n\
         modifiedFrom: \"2018-07-01T00:00:00.000Z\"\nmodifiedTo: \"2018-07-31T23:59:59.999Z\"\n",
    )
    .code(1)
    .stderr(contains("invalid host"));
}

#[test]
fn unreachable_host_ends_search_cleanly() {
    run_with_login(
        "token: abc\nhost: \"http://127.0.0.1:9\"\nidentifierType: FUNDRAISE\n\
         modifiedFrom: \"2018-07-01T00:00:00.000Z\"\nmodifiedTo: \"2018-07-31T23:59:59.999Z\"\n",
    )
    .success()
    .stdout("[    0:00] end of search\n");
}
