use std::{fs, path::PathBuf};

use tempfile::tempdir;

use trellis::TrellisError;
use trellis_cli::{Args, Command, Target, error_adapter::to_reportables, run_with_output};

/// Collects all .trellis files directly inside a directory
fn collect_trellis_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("trellis")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(command: Command) -> Args {
    Args {
        command,
        config: None,
        log_level: "off".to_string(),
    }
}

fn run_to_string(args: &Args) -> Result<String, TrellisError> {
    let mut out = Vec::new();
    run_with_output(args, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn e2e_smoke_test_demos_are_valid() {
    let demos = collect_trellis_files(demos_path());
    assert!(!demos.is_empty(), "No demos found in demos/");

    let mut failed = Vec::new();
    for demo in &demos {
        let input = demo.to_string_lossy().to_string();
        match run_to_string(&args(Command::Check { input })) {
            Ok(out) => assert!(out.contains("valid"), "{out}"),
            Err(err) => failed.push((demo.clone(), err)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
            for reportable in to_reportables(err) {
                eprintln!("      {reportable}");
            }
        }
        panic!("{} demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_toggle_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    for demo in collect_trellis_files(demos_path()) {
        let output = temp_dir
            .path()
            .join(demo.file_name().unwrap())
            .to_string_lossy()
            .to_string();
        run_to_string(&args(Command::Toggle {
            input: demo.to_string_lossy().to_string(),
            output: Some(output.clone()),
        }))
        .unwrap_or_else(|err| panic!("{}: {err}", demo.display()));

        let toggled = fs::read_to_string(&output).unwrap();
        let detected = run_to_string(&args(Command::Detect { input: output })).unwrap();
        let original = run_to_string(&args(Command::Detect {
            input: demo.to_string_lossy().to_string(),
        }))
        .unwrap();
        assert!(!toggled.is_empty());
        assert_ne!(
            detected.split_whitespace().next(),
            original.split_whitespace().next(),
            "{} did not switch syntax",
            demo.display()
        );
    }
}

#[test]
fn e2e_invalid_document_fails_with_diagnostics() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("broken.trellis");
    fs::write(&input, "Shop -> Main\nAdmin -> Main\nMain @ src/main.ts\n").unwrap();

    let err = run_to_string(&args(Command::Check {
        input: input.to_string_lossy().to_string(),
    }))
    .unwrap_err();

    let reportables = to_reportables(&err);
    assert_eq!(reportables.len(), 1);
    assert_eq!(
        reportables[0].to_string(),
        "program `Admin` is declared after program `Shop`"
    );
}

#[test]
fn e2e_convert_with_config() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("shop.trellis");
    let config = temp_dir.path().join("config.toml");
    fs::write(&input, "Shop -> Main\nMain @ src/main.ts\n  -> run\n").unwrap();
    fs::write(&config, "[convert]\nindent = 4\n").unwrap();

    let out = run_to_string(&Args {
        command: Command::Convert {
            input: input.to_string_lossy().to_string(),
            to: Target::Long,
            output: None,
        },
        config: Some(config.to_string_lossy().to_string()),
        log_level: "off".to_string(),
    })
    .unwrap();

    assert_eq!(
        out,
        "program Shop {\n    entry: Main\n}\n\nfile Main {\n    path: src/main.ts\n    exports: [run]\n}\n"
    );
}

#[test]
fn e2e_missing_input_is_io_error() {
    let err = run_to_string(&args(Command::Detect {
        input: "no/such/file.trellis".to_string(),
    }))
    .unwrap_err();
    assert!(matches!(err, TrellisError::Io(_)));
}

#[test]
fn e2e_grammar_lists_both_syntaxes() {
    let out = run_to_string(&args(Command::Grammar)).unwrap();
    assert!(out.contains("Shortform declarations"));
    assert!(out.contains("Longform properties"));
}
