mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn board_caps_at_fourteen() {
    let env = TestEnv::new();
    let mut args = vec!["refs".to_string(), "add".to_string()];
    for i in 0..15 {
        let p = env.write_png(&format!("ref{i}.png"));
        args.push(p.to_str().unwrap().to_string());
    }

    env.bin()
        .args(&args)
        .assert()
        .success()
        .stdout(predicate::str::contains("board 14/14"))
        .stdout(predicate::str::contains("added 14, skipped 0, rejected 1 (14/14)"))
        .stderr(predicate::str::contains("board is full (14 images max)").count(1));
}

#[test]
fn non_image_files_are_skipped() {
    let env = TestEnv::new();
    let png = env.write_png("ok.png");
    let txt = env.write_file("notes.txt", b"plain text");

    let out = env
        .bin()
        .args([
            "refs",
            "add",
            png.to_str().unwrap(),
            txt.to_str().unwrap(),
            "--json",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let summary = stdout.lines().last().expect("summary line");
    let v: serde_json::Value = serde_json::from_str(summary).unwrap();
    assert_eq!(v["added"], 1);
    assert_eq!(v["skipped"], 1);
    assert_eq!(v["rejected"], 0);
    assert_eq!(v["count"], 1);
}

#[test]
fn missing_file_is_an_error() {
    let env = TestEnv::new();
    env.bin()
        .args(["refs", "add", "does-not-exist.png"])
        .assert()
        .failure();
}
