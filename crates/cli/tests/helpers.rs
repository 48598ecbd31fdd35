use std::path::PathBuf;

use funcviz::commands::{describe, InputArgs, StyleArgs};
use funcviz::{canonicalize_or_current, default_output_name};
use funcviz_core::graph::{GraphOptions, HttpMode, Palette};
use funcviz_core::services::InputSource;
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let result = canonicalize_or_current(".").expect("canonicalize");
    assert_eq!(result, std::env::current_dir().expect("cwd"));
}

#[test]
fn canonicalize_or_current_resolves_existing_path() {
    let tmp = tempdir().expect("tempdir");
    let nested = tmp.path().join("nested");
    std::fs::create_dir_all(&nested).expect("create nested");

    let result = canonicalize_or_current(&nested.to_string_lossy()).expect("canonicalize nested");
    assert_eq!(result, nested.canonicalize().expect("canonicalize nested"));
}

#[test]
fn canonicalize_or_current_joins_missing_relative_path() {
    let result = canonicalize_or_current("does/not/exist.dot").expect("resolve");
    let expected = std::env::current_dir().expect("cwd").join("does/not/exist.dot");
    assert_eq!(result, expected);
}

#[test]
fn default_output_name_uses_format_extension() {
    assert_eq!(default_output_name("svg"), "output.svg");
    assert_eq!(default_output_name("png:cairo"), "output.png");
    assert_eq!(default_output_name(""), "output.out");
}

#[test]
fn input_source_prefers_repository_then_zip_then_dir() {
    let repo = InputArgs { repo: Some("https://github.com/acme/app".into()), ..InputArgs::default() };
    assert_eq!(
        repo.source().unwrap(),
        InputSource::RemoteRepository {
            url: "https://github.com/acme/app".into(),
            branch: "master".into()
        }
    );

    let tmp = tempdir().expect("tempdir");
    let archive = tmp.path().join("app.zip");
    let zip = InputArgs { zip: Some(archive.to_string_lossy().to_string()), ..InputArgs::default() };
    assert_eq!(zip.source().unwrap(), InputSource::ZipArchive(archive));

    let dir = InputArgs::default();
    assert_eq!(
        dir.source().unwrap(),
        InputSource::Directory(std::env::current_dir().expect("cwd"))
    );
}

#[test]
fn branch_is_forwarded() {
    let args = InputArgs {
        repo: Some("https://example.com/r".into()),
        branch: Some("main".into()),
        ..InputArgs::default()
    };
    let source = args.source().unwrap();
    assert_eq!(describe(&source), "repository https://example.com/r (main)");
}

#[test]
fn style_args_override_options() {
    let style = StyleArgs { http_mode: Some("node".into()), palette: Some("classic".into()) };
    let options = style.apply(GraphOptions::default()).unwrap();
    assert_eq!(options.http_mode, HttpMode::Node);
    assert_eq!(options.palette, Palette::Classic);

    let untouched = StyleArgs::default().apply(GraphOptions::default()).unwrap();
    assert_eq!(untouched, GraphOptions::default());

    assert!(describe(&InputSource::Directory(PathBuf::from("/srv/app"))).contains("/srv/app"));
}
