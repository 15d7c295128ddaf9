use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::path::Path;
use std::process::Command;

/// Run the built codepdf binary from the crate root, so the bundled
/// templates/default.json is found relative to the working directory.
fn run_codepdf(args: &[&str]) -> (String, String, Option<i32>) {
    run_codepdf_in(Path::new(env!("CARGO_MANIFEST_DIR")), args)
}

fn run_codepdf_in(dir: &Path, args: &[&str]) -> (String, String, Option<i32>) {
    let bin = std::path::PathBuf::from(env!("CARGO_BIN_EXE_codepdf"));

    let output = Command::new(&bin)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute codepdf");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code())
}

fn read_pdf(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn test_converts_source_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.child("hello.py");
    input.write_str("def hello():\n    print(\"hello world\")\n").unwrap();
    let output = dir.child("hello.pdf");

    let (_, stderr, code) = run_codepdf(&[
        input.path().to_str().unwrap(),
        output.path().to_str().unwrap(),
    ]);

    assert_eq!(code, Some(0), "stderr: {}", stderr);
    assert!(stderr.contains("PDF created at"), "stderr: {}", stderr);
    let pdf = read_pdf(output.path());
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(pdf.ends_with(b"%%EOF\n"));
    assert!(contains(&pdf, b"(hello.py) Tj"));
    assert!(contains(&pdf, b"hello world"));
}

#[test]
fn test_long_lines_are_marked() {
    let dir = TempDir::new().unwrap();
    let input = dir.child("long.txt");
    input.write_str(&format!("{}\n", "a".repeat(150))).unwrap();
    let output = dir.child("long.pdf");

    let (_, stderr, code) = run_codepdf(&[
        input.path().to_str().unwrap(),
        output.path().to_str().unwrap(),
        "--width",
        "10",
    ]);

    assert_eq!(code, Some(0), "stderr: {}", stderr);
    let pdf = read_pdf(output.path());
    assert!(contains(&pdf, b"(aaaaaaaaa) Tj"));
    assert!(contains(&pdf, b"(\xBF) Tj"));
    assert!(contains(&pdf, b"(\xAE) Tj"));
    assert!(!contains(&pdf, b"(aaaaaaaaaa"));
}

#[test]
fn test_derives_output_name_in_working_directory() {
    let src = TempDir::new().unwrap();
    let input = src.child("module.rs");
    input.write_str("fn main() {}\n").unwrap();

    let work = TempDir::new().unwrap();
    let stylesheet = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/default.json");

    let (_, stderr, code) = run_codepdf_in(
        work.path(),
        &[input.path().to_str().unwrap(), "--stylesheet", stylesheet],
    );

    assert_eq!(code, Some(0), "stderr: {}", stderr);
    assert!(work.path().join("module.pdf").exists());
}

#[test]
fn test_invalid_style_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = dir.child("hello.py");
    input.write_str("print(1)\n").unwrap();
    let output = dir.child("hello.pdf");

    let (_, stderr, code) = run_codepdf(&[
        input.path().to_str().unwrap(),
        output.path().to_str().unwrap(),
        "--style",
        "doesnotexist",
    ]);

    assert_eq!(code, Some(1));
    assert!(stderr.contains("Invalid style name: doesnotexist"), "stderr: {}", stderr);
    assert!(stderr.contains("InspiredGitHub"), "stderr: {}", stderr);
    assert!(!output.path().exists());
}

#[test]
fn test_missing_input_exits_2() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.py");
    let output = dir.child("missing.pdf");

    let (_, stderr, code) = run_codepdf(&[
        missing.to_str().unwrap(),
        output.path().to_str().unwrap(),
    ]);

    assert_eq!(code, Some(2));
    assert!(stderr.contains("Unable to read file"), "stderr: {}", stderr);
    assert!(!output.path().exists());
}

#[test]
fn test_missing_stylesheet_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = dir.child("hello.py");
    input.write_str("print(1)\n").unwrap();
    let output = dir.child("hello.pdf");

    // No templates/ directory in the temp dir
    let (_, stderr, code) = run_codepdf_in(
        dir.path(),
        &[input.path().to_str().unwrap(), output.path().to_str().unwrap()],
    );

    assert_eq!(code, Some(1));
    assert!(stderr.contains("style sheet"), "stderr: {}", stderr);
    assert!(!output.path().exists());
}

#[test]
fn test_invalid_width_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = dir.child("hello.py");
    input.write_str("print(1)\n").unwrap();

    let (_, stderr, code) = run_codepdf(&[input.path().to_str().unwrap(), "--width", "1"]);

    assert_eq!(code, Some(1));
    assert!(stderr.contains("Invalid wrap width"), "stderr: {}", stderr);
}

#[test]
fn test_version_flag() {
    for flag in ["-v", "--version"] {
        let (stdout, _, code) = run_codepdf(&[flag]);
        assert_eq!(code, Some(0));
        assert!(
            stdout.contains(concat!("v. ", env!("CARGO_PKG_VERSION"))),
            "stdout: {}",
            stdout
        );
    }
}

#[test]
fn test_list_styles() {
    let (stdout, _, code) = run_codepdf(&["--list-styles"]);
    assert_eq!(code, Some(0));
    assert!(stdout.lines().any(|l| l == "InspiredGitHub"));
    assert!(stdout.lines().any(|l| l == "Solarized (light)"));
}
