//! Tests for the versioned lookup tables.

use std::io::Write;

use tempfile::NamedTempFile;
use vgc_standards::{OTHER_GENERATION, embedded_lookups, load_lookups, paths};

#[test]
fn documented_platform_generations_resolve() {
    let tables = embedded_lookups().expect("lookups");
    let expected = [
        ("PS", "5th Gen"),
        ("PS2", "6th Gen"),
        ("PS3", "7th Gen"),
        ("PS4", "8th Gen"),
        ("PS5", "9th Gen"),
        ("N64", "5th Gen"),
        ("Wii", "7th Gen"),
        ("PC", "PC"),
        ("MAC", "PC"),
        ("LIN", "PC"),
        ("3DS", "8th Gen"),
    ];
    for (platform, label) in expected {
        assert_eq!(tables.generation_for(platform), label, "platform {platform}");
    }
}

#[test]
fn unmapped_platform_is_other() {
    let tables = embedded_lookups().expect("lookups");
    assert_eq!(tables.generation_for("Atari 2600"), OTHER_GENERATION);
    assert_eq!(tables.generation_for("ps2"), OTHER_GENERATION);
    assert!(tables.generation_labels().contains(OTHER_GENERATION));
}

#[test]
fn allow_lists_match_exactly() {
    let tables = embedded_lookups().expect("lookups");
    assert!(tables.is_major_publisher("Nintendo"));
    assert!(tables.is_major_publisher("Sony Computer Entertainment"));
    assert!(!tables.is_major_publisher("nintendo"));
    assert!(tables.is_top_platform("X360"));
    assert!(!tables.is_top_platform("PS"));
}

#[test]
fn aliases_and_placeholders() {
    let tables = embedded_lookups().expect("lookups");
    assert_eq!(tables.canonical_column("console"), Some("platform"));
    assert_eq!(tables.canonical_column(" Console "), Some("platform"));
    assert_eq!(tables.canonical_column("genre"), None);
    assert!(tables.is_placeholder("nan"));
    assert!(!tables.is_placeholder("Nintendo"));
    assert!(tables.year_is_plausible(1998));
    assert!(!tables.year_is_plausible(1200));
}

#[test]
fn loads_extended_tables_from_file() {
    let source =
        std::fs::read_to_string(paths::standards_root().join(paths::LOOKUPS_FILE_NAME))
            .expect("read standards/lookups.toml");
    let extended = source.replace(
        "LIN = \"PC\"",
        "LIN = \"PC\"\nDC = \"6th Gen\"",
    );
    let mut file = NamedTempFile::new().expect("temp file");
    write!(file, "{extended}").expect("write lookups");

    let tables = load_lookups(file.path()).expect("load lookups");
    assert_eq!(tables.generation_for("DC"), "6th Gen");
    assert_ne!(tables.sha256, embedded_lookups().expect("lookups").sha256);
}

#[test]
fn missing_file_is_io_error() {
    let err = load_lookups(std::path::Path::new("/nonexistent/lookups.toml")).unwrap_err();
    assert!(err.to_string().starts_with("failed to read file"));
}

#[test]
fn generation_labels_snapshot() {
    let tables = embedded_lookups().expect("lookups");
    let labels: Vec<&str> = tables.generation_labels().into_iter().collect();
    insta::assert_snapshot!(labels.join("\n"), @r"
    4th Gen
    5th Gen
    6th Gen
    7th Gen
    8th Gen
    9th Gen
    Other
    PC
    ");
}
