use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const PBN: &str = "N:T843.K4.KT853.73 J97.J763.642.KJ5 Q52.Q982.QJ.9862 AK6.AT5.A97.AQT4";

fn explorer() -> Command {
    Command::cargo_bin("explorer").unwrap()
}

#[test]
fn test_play_shows_legal_plays() {
    explorer()
        .args(["play", PBN, "--plays", "5D,2D"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trick 1:  N:5D E:2D"))
        .stdout(predicate::str::contains("To play:  S"))
        .stdout(predicate::str::contains("Legal:    QD JD"));
}

#[test]
fn test_play_json() {
    let output = explorer()
        .args(["play", PBN, "--plays", "5D,2D,QD,7D", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["player"], "S");
    assert_eq!(report["ns_tricks"], 1);
    assert_eq!(
        report["notation"],
        "S:Q52.Q982.J.9862 AK6.AT5.A9.AQT4 T843.K4.KT83.73 J97.J763.64.KJ5"
    );
}

#[test]
fn test_play_undo_to() {
    explorer()
        .args(["play", PBN, "--plays", "5D,2D,QD,7D,2S", "--undo-to", "QD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("To play:  S"))
        .stdout(predicate::str::contains("plays=5D,2D\n"));
}

#[test]
fn test_play_with_declarer() {
    // East declares, so South leads
    explorer()
        .args(["play", PBN, "--strain", "S", "--declarer", "E"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deal:     S:Q52.Q982.QJ.9862"))
        .stdout(predicate::str::contains("To play:  S"));
}

#[test]
fn test_revoke_is_rejected() {
    explorer()
        .args(["play", PBN, "--plays", "5D,3C"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot play 3C"));
}

#[test]
fn test_bad_notation_is_rejected() {
    explorer()
        .args(["play", "N:AKQ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid deal"));
}

#[test]
fn test_rotate() {
    explorer()
        .args(["rotate", PBN, "W"])
        .assert()
        .success()
        .stdout("W:AK6.AT5.A97.AQT4 T843.K4.KT853.73 J97.J763.642.KJ5 Q52.Q982.QJ.9862\n");
}

#[test]
fn test_split_writes_html() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("session.pbn");
    let output = dir.path().join("out.html");
    fs::write(
        &input,
        format!(
            "[Event \"Club\"]\n[Board \"1\"]\n[Dealer \"N\"]\n[Vulnerable \"None\"]\n[Deal \"{PBN}\"]\n\n\
             [Board \"2\"]\n[Dealer \"E\"]\n[Vulnerable \"NS\"]\n[Deal \"{PBN}\"]\n"
        ),
    )
    .unwrap();

    explorer()
        .arg("split")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 boards"));

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("Board 2</a>"));
    assert!(html.contains("Dealer: East"));
    assert_eq!(html.matches("page-break-after").count(), 3);
}

#[test]
fn test_split_missing_file() {
    explorer()
        .args(["split", "/nonexistent/deals.pbn"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading /nonexistent/deals.pbn"));
}

#[test]
fn test_recognize_rejects_wrong_size_templates() {
    let dir = tempfile::tempdir().unwrap();
    let small = dir.path().join("small.png");
    image::RgbImage::new(20, 30).save(&small).unwrap();

    explorer()
        .arg("recognize")
        .arg(&small)
        .arg("--black")
        .arg(&small)
        .arg("--red")
        .arg(&small)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "invalid black reference screenshot: expected 750x1334, got 20x30",
        ));
}

#[test]
fn test_recognize_missing_image() {
    explorer()
        .args(["recognize", "shot.png", "--black", "/nonexistent/black.png", "--red", "red.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading /nonexistent/black.png"));
}

#[cfg(unix)]
#[test]
fn test_solve_with_shell_solver() {
    let script = r#"read request
case "$request" in
  *'"plays":["5D"]'*)
    echo '{"player":"E","tricks":{"ns":0,"ew":0},"plays":[
      {"suit":"D","rank":"6","equals":[],"score":9},
      {"suit":"D","rank":"4","equals":["2"],"score":8}]}' ;;
  *) exit 1 ;;
esac
"#;
    explorer()
        .args(["solve", PBN, "--plays", "5D", "--solver", "sh"])
        .args(["--solver-arg", "-c", "--solver-arg", script])
        .assert()
        .success()
        .stdout(predicate::str::contains("To play:  E"))
        .stdout(predicate::str::contains("  6D  +9 (side 9, declarer 9)\n"))
        .stdout(predicate::str::contains("  4D  +8 (side 8, declarer 8)  = 2\n"));
}

#[cfg(unix)]
#[test]
fn test_solve_reports_solver_failure() {
    explorer()
        .args(["solve", PBN, "--solver", "sh", "--solver-arg", "-c", "--solver-arg", "exit 3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("solver failed"));
}
