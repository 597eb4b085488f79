use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::{TempDir, tempdir};

use stencil_cli::Args;

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

/// Collects all .toml scene files from a directory
fn collect_scene_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Writes a config selecting font-independent text metrics.
fn write_fixed_config(dir: &TempDir) -> String {
    let path = dir.path().join("config.toml");
    fs::write(&path, "[style]\ntext_measure = \"fixed\"\n").expect("Failed to write config");
    path.to_string_lossy().to_string()
}

fn args_for(scene: &Path, dir: &TempDir, config: &str) -> Args {
    let output_filename = format!("{}.svg", scene.file_stem().unwrap().to_string_lossy());
    Args {
        input: scene.to_string_lossy().to_string(),
        output: dir.path().join(output_filename).to_string_lossy().to_string(),
        config: Some(config.to_string()),
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_fixed_config(&temp_dir);

    let scenes = collect_scene_files(demos_dir());
    assert!(!scenes.is_empty(), "No scenes found in demos/");

    let mut failed = Vec::new();
    for scene in &scenes {
        let args = args_for(scene, &temp_dir, &config);
        match stencil_cli::run(&args) {
            Ok(()) => {
                let svg = fs::read_to_string(&args.output).expect("Output was not written");
                assert!(svg.contains("<svg"), "{}: output is not SVG", scene.display());
                assert!(svg.contains("</svg>"), "{}: output is incomplete", scene.display());
            }
            Err(e) => failed.push((scene.clone(), e)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemo scenes that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo scene(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_fixed_config(&temp_dir);

    let scenes = collect_scene_files(demos_dir().join("errors"));
    assert!(!scenes.is_empty(), "No scenes found in demos/errors/");

    let mut unexpectedly_passed = Vec::new();
    for scene in &scenes {
        let args = args_for(scene, &temp_dir, &config);
        if stencil_cli::run(&args).is_ok() {
            unexpectedly_passed.push(scene.clone());
        }
        assert!(
            !Path::new(&args.output).exists(),
            "{}: output written despite the error",
            scene.display()
        );
    }

    assert!(
        unexpectedly_passed.is_empty(),
        "error scenes rendered without error: {unexpectedly_passed:?}"
    );
}

#[test]
fn e2e_missing_input_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_fixed_config(&temp_dir);

    let args = args_for(&temp_dir.path().join("absent.toml"), &temp_dir, &config);
    let err = stencil_cli::run(&args).unwrap_err();
    assert!(matches!(err, stencil::StencilError::Io(_)));
}
