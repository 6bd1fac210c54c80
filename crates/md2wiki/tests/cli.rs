use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;

const SAMPLE: &str = "# Title

Some **bold** and *italic* text with `code`.

/src/app.py:
```python
print(\"hi\")
```

- item one
2. item two
";

#[test]
fn convert_markdown_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.md");
    let output = dir.path().join("output.txt");
    fs::write(&input, SAMPLE).unwrap();

    let mut cmd = cargo_bin_cmd!("md2wiki");
    cmd.arg(&input).arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Converted to Confluence wiki format"))
        .stdout(predicate::str::contains("output.txt"));

    let converted = fs::read_to_string(&output).unwrap();
    assert!(converted.lines().any(|line| line == "h1. Title"));
    assert!(converted.contains("Some *bold* and _italic_ text with {{code}}."));
    assert!(converted.contains("h3. app.py\n{code:title=app.py|language=python|linenumbers=true|collapse=false}\nprint(\"hi\")\n{code}"));
    assert!(converted.lines().any(|line| line == "* item one"));
    assert!(converted.lines().any(|line| line == "# item two"));
}

#[test]
fn output_file_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.md");
    let output = dir.path().join("output.txt");
    fs::write(&input, "[Docs](https://example.com)").unwrap();
    fs::write(&output, "stale content that is much longer than the result").unwrap();

    cargo_bin_cmd!("md2wiki")
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "[Docs|https://example.com]"
    );
}

#[test]
fn wrong_argument_count_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.md");
    fs::write(&input, "# Title").unwrap();

    cargo_bin_cmd!("md2wiki")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage: md2wiki"));

    cargo_bin_cmd!("md2wiki")
        .arg(&input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("<INPUT> <OUTPUT>"));

    let output = dir.path().join("output.txt");
    cargo_bin_cmd!("md2wiki")
        .arg(&input)
        .arg(&output)
        .arg(dir.path().join("extra.txt"))
        .assert()
        .code(1);
    assert!(!output.exists());
}

#[test]
fn missing_input_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.md");
    let output = dir.path().join("output.txt");

    cargo_bin_cmd!("md2wiki")
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.md"));

    assert!(!output.exists());
}

#[test]
fn unwritable_output_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.md");
    fs::write(&input, "# Title").unwrap();
    let output = dir.path().join("no-such-dir").join("output.txt");

    cargo_bin_cmd!("md2wiki")
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to write"));
}

#[test]
fn config_file_and_flags_change_languages() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.md");
    let output = dir.path().join("output.txt");
    let config = dir.path().join("md2wiki.toml");
    fs::write(
        &input,
        "/src/main.rs:\n```\nfn main() {}\n```\n/bin/tool:\n```\nrun\n```\n",
    )
    .unwrap();
    fs::write(&config, "[languages]\nrs = \"rust\"\n").unwrap();

    cargo_bin_cmd!("md2wiki")
        .arg("--config")
        .arg(&config)
        .arg("--fallback-language")
        .arg("text")
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    let converted = fs::read_to_string(&output).unwrap();
    assert!(converted.contains("{code:title=main.rs|language=rust|"));
    assert!(converted.contains("{code:title=tool|language=text|"));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.md");
    let output = dir.path().join("output.txt");
    fs::write(&input, "# Title").unwrap();

    cargo_bin_cmd!("md2wiki")
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));

    assert!(!output.exists());
}
