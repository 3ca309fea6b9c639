#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn pt() -> Command {
    cargo_bin_cmd!("punchtracker")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_punchtracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Same for the preferences namespace
pub fn setup_test_prefs(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_user_prefs.yaml", name));
    let prefs_path = path.to_string_lossy().to_string();
    fs::remove_file(&prefs_path).ok();
    prefs_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Init DB, log in as `user` and grant the location permission
pub fn init_logged_in(db_path: &str, prefs_path: &str, user: &str) {
    pt()
        .args(["--db", db_path, "--prefs", prefs_path, "--test", "init"])
        .assert()
        .success();

    pt()
        .args([
            "--db", db_path, "--prefs", prefs_path, "login", "--user", user, "--password", "secret",
        ])
        .assert()
        .success();

    pt()
        .args(["--db", db_path, "--prefs", prefs_path, "permission", "--grant"])
        .assert()
        .success();
}

/// One immediate punch-in at a fixed position
pub fn punch_once(db_path: &str, prefs_path: &str, lat: &str, lon: &str) {
    pt()
        .args([
            "--db", db_path, "--prefs", prefs_path, "track", "--lat", lat, "--lon", lon, "--cycles",
            "0",
        ])
        .assert()
        .success();
}
