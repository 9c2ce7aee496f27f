use docsnap::{Assembler, Config, ConfigError, ReadFailure, Section, run_docsnap};
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use tokio::fs;

/// Creates a Config pointing at a manifest with no overrides.
fn test_config(manifest_path: PathBuf) -> Config {
    Config {
        manifest_path,
        output_dir: None,
        base_path: None,
        only: Vec::new(),
        verbosity: 0,
    }
}

/// Writes a small two-document manifest into `root` and returns its path.
fn write_manifest(root: &Path) -> anyhow::Result<PathBuf> {
    let manifest = r#"
context = "AlarmApp Codebase"
base_path = "app"
output_dir = "docs"
language = "swift"

[[documents]]
title = "CORE"
output = "CODEBASE_CORE.md"

[[documents.sections]]
name = "Domain - Models"
files = ["Models/Alarm.swift", "Models/Missing.swift"]

[[documents.sections]]
name = "Services"
files = ["Services/AudioService.swift"]

[[documents]]
title = "UI AND VIEWS"
output = "CODEBASE_UI_AND_TESTS.md"

[[documents.sections]]
name = "Views"
files = ["Views/ContentView.swift"]
"#;
    let path = root.join("docsnap.toml");
    std::fs::write(&path, manifest)?;
    Ok(path)
}

fn write_sources(root: &Path) -> anyhow::Result<()> {
    let app = root.join("app");
    std::fs::create_dir_all(app.join("Models"))?;
    std::fs::create_dir_all(app.join("Services"))?;
    std::fs::create_dir_all(app.join("Views"))?;
    std::fs::write(app.join("Models/Alarm.swift"), "struct Alarm {}\n")?;
    std::fs::write(app.join("Services/AudioService.swift"), "final class AudioService {}\n")?;
    std::fs::write(app.join("Views/ContentView.swift"), "struct ContentView: View {}\n")?;
    Ok(())
}

/// Drops the `> Generated:` line so runs can be compared.
fn without_timestamp(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with("> Generated:"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn it_renders_scenario_with_readable_file() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let base = temp_dir.path();
    std::fs::write(base.join("Alarm.swift"), "struct A {}")?;

    let sections = vec![
        Section::new("Models", ["Alarm.swift"]),
        Section::new("Views", Vec::<String>::new()),
    ];
    let document = Assembler::new("AlarmApp Codebase", base)
        .with_language(Some("swift".to_string()))
        .assemble("CORE", &sections)?;

    let toc_entries = document
        .text
        .lines()
        .filter(|l| l.starts_with("1. [") || l.starts_with("2. ["))
        .count();
    assert_eq!(toc_entries, 2);

    let models = document.text.split("## 1. Models").nth(1).unwrap();
    let models = models.split("## 2. Views").next().unwrap();
    assert_eq!(models.matches("### ").count(), 1);
    assert!(models.contains("```swift\nstruct A {}\n```"));

    let views = document.text.split("## 2. Views").nth(1).unwrap();
    assert!(!views.contains("### "));
    assert!(document.failures.is_empty());

    Ok(())
}

#[test]
fn it_renders_scenario_with_missing_file() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let base = temp_dir.path();

    let sections = vec![
        Section::new("Models", ["Alarm.swift"]),
        Section::new("Views", Vec::<String>::new()),
    ];
    let document = Assembler::new("AlarmApp Codebase", base).assemble("CORE", &sections)?;

    let expected = format!("// FILE NOT FOUND: {}", base.join("Alarm.swift").display());
    assert!(document.text.contains(&expected));
    assert!(document.text.contains("## 2. Views"));
    assert_eq!(document.file_count, 1);
    assert_eq!(document.failures.len(), 1);
    assert_eq!(document.failures[0].reason, ReadFailure::NotFound);

    Ok(())
}

#[test]
fn it_renders_one_block_per_file_ref() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let base = temp_dir.path();
    std::fs::write(base.join("a.swift"), "let a = 1")?;
    std::fs::write(base.join("b.swift"), "let b = 2")?;

    let sections = vec![
        Section::new("First", ["a.swift", "missing.swift", "b.swift"]),
        Section::new("Second", ["b.swift"]),
        Section::new("Third", ["a.swift", "a.swift"]),
    ];
    let document = Assembler::new("Ctx", base).assemble("T", &sections)?;

    assert_eq!(document.file_count, 6);
    assert_eq!(document.text.matches("\n### ").count(), 6);

    // Blocks follow the declared order.
    let a = document.text.find("let a = 1").unwrap();
    let missing = document.text.find("FILE NOT FOUND").unwrap();
    let b = document.text.find("let b = 2").unwrap();
    assert!(a < missing && missing < b);

    Ok(())
}

#[test]
fn it_is_stable_across_runs() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let base = temp_dir.path();
    std::fs::write(base.join("Alarm.swift"), "struct A {}\r\n")?;

    let sections = vec![Section::new("Domain - Models", ["Alarm.swift", "Gone.swift"])];
    let assembler = Assembler::new("Ctx", base);

    let first = assembler.assemble("T", &sections)?;
    let second = assembler.assemble("T", &sections)?;
    assert_eq!(without_timestamp(&first.text), without_timestamp(&second.text));
    assert!(first.text.contains("struct A {}\r\n"));

    Ok(())
}

#[test]
fn it_rejects_empty_section_list() {
    let err = Assembler::new("Ctx", "/nowhere").assemble("T", &[]).unwrap_err();
    assert!(matches!(err, ConfigError::EmptySections { .. }));
}

#[tokio::test]
async fn it_generates_documents_from_manifest() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_sources(root)?;
    let manifest = write_manifest(root)?;

    let reports = run_docsnap(test_config(manifest)).await?;
    assert_eq!(reports.len(), 2);

    let core_path = root.join("docs/CODEBASE_CORE.md");
    assert_eq!(reports[0].output_path, core_path);
    assert_eq!(reports[0].file_count, 3);
    assert_eq!(reports[0].failures.len(), 1);

    let core = fs::read_to_string(&core_path).await?;
    assert_eq!(reports[0].bytes, core.len() as u64);
    assert!(core.starts_with("# AlarmApp Codebase - CORE\n> Generated: "));
    assert!(core.contains("1. [Domain - Models](#domain---models)\n   - Alarm.swift\n   - Missing.swift\n"));
    assert!(core.contains("2. [Services](#services)\n   - AudioService.swift\n"));
    assert!(core.contains("```swift\nstruct Alarm {}\n\n```"));
    assert!(core.contains("// FILE NOT FOUND: "));

    let ui = fs::read_to_string(root.join("docs/CODEBASE_UI_AND_TESTS.md")).await?;
    assert!(ui.starts_with("# AlarmApp Codebase - UI AND VIEWS\n"));
    assert!(ui.contains("struct ContentView: View {}"));
    assert!(!ui.contains("AudioService"));

    Ok(())
}

#[tokio::test]
async fn it_applies_overrides_and_selection() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_sources(root)?;
    let manifest = write_manifest(root)?;

    let out = root.join("elsewhere");
    let config = Config {
        output_dir: Some(out.clone()),
        base_path: Some(root.join("app")),
        only: vec!["ui and views".to_string()],
        ..test_config(manifest)
    };

    let reports = run_docsnap(config).await?;
    assert_eq!(reports.len(), 1);
    assert!(out.join("CODEBASE_UI_AND_TESTS.md").exists());
    assert!(!out.join("CODEBASE_CORE.md").exists());
    assert!(!root.join("docs").exists());

    Ok(())
}

#[tokio::test]
async fn it_writes_nothing_on_invalid_manifest() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    let manifest = root.join("docsnap.toml");
    std::fs::write(
        &manifest,
        r#"
context = "Ctx"
base_path = "."
output_dir = "docs"

[[documents]]
title = "Good"
output = "good.md"
[[documents.sections]]
name = "S"

[[documents]]
title = "Bad"
output = "bad.md"
"#,
    )?;

    let err = run_docsnap(test_config(manifest)).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::EmptySections { .. })
    ));
    assert!(!root.join("docs").exists());

    Ok(())
}

#[tokio::test]
async fn it_writes_nothing_when_a_later_output_cannot_open() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    let manifest = root.join("docsnap.toml");
    std::fs::write(
        &manifest,
        r#"
context = "Ctx"
base_path = "."
output_dir = "out"

[[documents]]
title = "A"
output = "A.md"
[[documents.sections]]
name = "S"

[[documents]]
title = "B"
output = "B.md"
[[documents.sections]]
name = "S"
"#,
    )?;
    // B's destination is taken by a directory.
    std::fs::create_dir_all(root.join("out/B.md"))?;

    let err = run_docsnap(test_config(manifest)).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Sink { .. })
    ));
    assert!(!root.join("out/A.md").exists());

    let leftovers: Vec<_> = std::fs::read_dir(root.join("out"))?
        .map(|e| e.map(|e| e.file_name()))
        .collect::<Result<_, _>>()?;
    assert_eq!(leftovers, vec![std::ffi::OsString::from("B.md")]);

    Ok(())
}

#[test]
fn it_parses_the_bundled_demo_manifest() -> anyhow::Result<()> {
    let manifest = docsnap::Manifest::parse(include_str!("../demos/alarm_app.toml"))?;
    assert_eq!(manifest.documents.len(), 2);
    assert_eq!(manifest.documents[0].sections.len(), 11);
    assert_eq!(manifest.documents[1].sections.len(), 2);
    assert_eq!(manifest.language.as_deref(), Some("swift"));
    Ok(())
}
