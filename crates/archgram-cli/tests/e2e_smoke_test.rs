use std::{fs, path::PathBuf};

use tempfile::tempdir;

use archgram::{ArchgramError, model::ModelError};
use archgram_cli::{Args, run};

/// Collects all .toml and .json descriptions from a directory
fn collect_descriptions(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && matches!(
                        path.extension().and_then(|s| s.to_str()),
                        Some("toml" | "json")
                    )
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn diagrams_dir() -> PathBuf {
    // Diagrams are at workspace root, relative to workspace not the crate
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("diagrams")
}

fn args(input: Option<String>, output: String) -> Args {
    Args {
        input,
        output,
        format: None,
        scale: 1.0,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_shipped_diagrams() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let diagrams = collect_descriptions(diagrams_dir());
    assert!(!diagrams.is_empty(), "No diagrams found in diagrams/");

    let mut failed = Vec::new();

    for diagram_path in &diagrams {
        let stem = diagram_path.file_stem().unwrap().to_string_lossy();

        for extension in ["svg", "png"] {
            let output_path = temp_dir.path().join(format!("{stem}.{extension}"));
            let args = args(
                Some(diagram_path.to_string_lossy().to_string()),
                output_path.to_string_lossy().to_string(),
            );

            match run(&args) {
                Ok(()) => {
                    let bytes = fs::read(&output_path).expect("Output file should exist");
                    assert!(!bytes.is_empty(), "{} is empty", output_path.display());
                }
                Err(e) => failed.push((diagram_path.clone(), e)),
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDiagrams that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} render(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_built_in_diagram() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("x-algorithm.svg");

    run(&args(None, output_path.to_string_lossy().to_string()))
        .expect("Built-in diagram should render");

    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(svg.contains("X Algorithm Architecture"));
    assert!(svg.contains("data-component-id=\"twitter-app\""));
}

#[test]
fn e2e_smoke_test_png_header() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("out.png");

    run(&args(None, output_path.to_string_lossy().to_string()))
        .expect("PNG export should succeed");

    let bytes = fs::read(&output_path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn e2e_smoke_test_error_inputs() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let cases = [
        ("syntax.toml", "[[layers]\nname = \"A\"\n"),
        ("syntax.json", "{ \"layers\": [ }"),
        (
            "duplicate.toml",
            "[[layers]]\nname = \"A\"\ncolor_key = \"api\"\nposition = { x = 0, y = 0 }\ncomponents = [\n  { name = \"One\", id = \"x\" },\n  { name = \"Two\", id = \"x\" },\n]\n",
        ),
    ];

    for (name, source) in cases {
        let input_path = temp_dir.path().join(name);
        fs::write(&input_path, source).unwrap();
        let output_path = temp_dir.path().join(format!("{name}.svg"));

        let result = run(&args(
            Some(input_path.to_string_lossy().to_string()),
            output_path.to_string_lossy().to_string(),
        ));

        assert!(result.is_err(), "{name} should fail");
        assert!(!output_path.exists(), "{name} should not produce output");
    }
}

#[test]
fn e2e_smoke_test_duplicate_component_id() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input_path = temp_dir.path().join("duplicate.toml");
    fs::write(
        &input_path,
        r#"
name = "Duplicates"

[[layers]]
name = "Top"
color_key = "client"
position = { x = 50, y = 50 }
components = [{ name = "One", id = "x" }]

[[layers]]
name = "Bottom"
color_key = "api"
position = { x = 50, y = 200 }
components = [{ name = "Two", id = "x" }]
"#,
    )
    .unwrap();
    let output_path = temp_dir.path().join("duplicate.svg");

    let result = run(&args(
        Some(input_path.to_string_lossy().to_string()),
        output_path.to_string_lossy().to_string(),
    ));

    match result {
        Err(ArchgramError::Model(ModelError::DuplicateComponentId { id, layer })) => {
            assert_eq!(id, "x");
            assert_eq!(layer, "Bottom");
        }
        other => panic!("expected duplicate component id error, got {other:?}"),
    }
    assert!(!output_path.exists());
}

#[test]
fn e2e_smoke_test_missing_input() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let result = run(&args(
        Some(temp_dir.path().join("absent.toml").to_string_lossy().to_string()),
        temp_dir.path().join("out.svg").to_string_lossy().to_string(),
    ));
    assert!(result.is_err());
}
