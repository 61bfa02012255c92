//! Integration test: full pipeline against an in-memory artifact source.
//!
//! Builds a real tar.gz fixture, serves it from a map-backed source, and
//! drives install/verify/test end to end into a tempdir install root.

use flate2::write::GzEncoder;
use flate2::Compression;
use keg_core::caveat::CaveatSink;
use keg_core::checksum;
use keg_core::fetch::{ArtifactSource, FetchError};
use keg_core::install::InstallRoot;
use keg_core::pipeline::{self, PipelineError, Stage};
use keg_core::recipe::{Check, InstallAction, Recipe, Shell};
use semver::Version;
use std::collections::HashMap;
use tempfile::tempdir;

/// Map-backed artifact source; anything not in the map is a 404.
struct MapSource {
    archives: HashMap<String, Vec<u8>>,
}

impl ArtifactSource for MapSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.archives
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Http {
                url: url.to_string(),
                status: 404,
            })
    }
}

#[derive(Default)]
struct RecordingSink {
    emitted: Vec<String>,
}

impl CaveatSink for RecordingSink {
    fn emit(&mut self, text: &str) {
        self.emitted.push(text.to_string());
    }
}

fn tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Release archive whose binary is a shell script reporting `version_line`.
fn release_archive(version_line: &str) -> Vec<u8> {
    let script = format!(
        "#!/bin/sh\ncase \"$1\" in\n  --version) echo \"{version_line}\" ;;\n  --help) echo \"usage: ak <command>\"; echo \"  install   set up a device\" ;;\nesac\n"
    );
    tar_gz(&[
        ("build/ak", script.as_bytes()),
        ("build/completions/_ak", b"#compdef ak\n"),
    ])
}

fn recipe(version: &str, sha256: &str, expect_version: &str) -> Recipe {
    Recipe {
        name: "ak".into(),
        version: Version::parse(version).unwrap(),
        homepage: "https://example.org/ak".into(),
        url: "https://example.org/ak/v{version}/ak-v{version}.tar.gz".into(),
        sha256: sha256.into(),
        license: "MIT".into(),
        actions: vec![
            InstallAction::PlaceExecutable {
                source: "build/ak".into(),
                name: "ak".into(),
            },
            InstallAction::PlaceCompletionScript {
                source: "build/completions/_ak".into(),
                shell: Shell::Zsh,
                name: "_ak".into(),
            },
        ],
        caveat: Some("restart your shell to pick up completions".into()),
        checks: vec![
            Check {
                label: "version string".into(),
                args: vec!["--version".into()],
                expect: expect_version.into(),
            },
            Check {
                label: "product descriptor".into(),
                args: vec!["--version".into()],
                expect: "ADB extensions kit".into(),
            },
            Check {
                label: "install subcommand listed".into(),
                args: vec!["--help".into()],
                expect: "install".into(),
            },
        ],
    }
}

fn source_for(recipe: &Recipe, archive: Vec<u8>) -> MapSource {
    let mut archives = HashMap::new();
    archives.insert(recipe.archive_url(), archive);
    MapSource { archives }
}

fn file_count(dir: &std::path::Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    walk(dir)
}

fn walk(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let e = e.unwrap();
            if e.file_type().unwrap().is_dir() {
                walk(&e.path())
            } else {
                1
            }
        })
        .sum()
}

#[test]
fn pipeline_installs_verifies_and_passes() {
    let archive = release_archive("ak 1.0.3 - ADB extensions kit");
    let r = recipe("1.0.3", &checksum::sha256_bytes(&archive), "1.0.3");
    let source = source_for(&r, archive);

    let prefix = tempdir().unwrap();
    let root = InstallRoot::under(prefix.path());
    let mut caveats = RecordingSink::default();

    let success = pipeline::run(&r, &source, &root, &mut caveats).expect("pipeline");
    assert_eq!(success.checks_run, 3);

    let state = success.state;
    assert_eq!(state.package, "ak");
    assert_eq!(state.version, Version::parse("1.0.3").unwrap());
    let bin = state.binary_path.unwrap();
    let comp = state.completion_path.unwrap();
    assert_eq!(bin, root.bin_dir().join("ak"));
    assert_eq!(comp, root.zsh_completion_dir().join("_ak"));
    assert!(bin.exists() && comp.exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&bin).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode, 0o755);
    }

    // Caveat emitted exactly once.
    assert_eq!(
        caveats.emitted,
        vec!["restart your shell to pick up completions".to_string()]
    );
}

#[test]
fn corrupted_digest_aborts_before_any_write() {
    let archive = release_archive("ak 1.0.3 - ADB extensions kit");
    let mut sha256 = checksum::sha256_bytes(&archive);
    // Flip one hex character.
    let flipped = if sha256.ends_with('0') { '1' } else { '0' };
    sha256.pop();
    sha256.push(flipped);

    let r = recipe("1.0.3", &sha256, "1.0.3");
    let source = source_for(&r, archive);

    let prefix = tempdir().unwrap();
    let root = InstallRoot::under(prefix.path());
    let mut caveats = RecordingSink::default();

    let failure = pipeline::run(&r, &source, &root, &mut caveats).unwrap_err();
    assert_eq!(failure.stage, Stage::Verifying);
    assert!(matches!(failure.error, PipelineError::Integrity(_)));

    // Zero filesystem writes and no caveat on a failed install.
    assert_eq!(file_count(prefix.path()), 0);
    assert!(caveats.emitted.is_empty());
}

#[test]
fn stale_expected_version_fails_testing_but_leaves_install() {
    // Recipe 1.1.2 installs a binary that reports 1.1.2, while its
    // carried-over check expects the literal "1.0.3".
    let archive = release_archive("ak 1.1.2 - ADB extensions kit");
    let r = recipe("1.1.2", &checksum::sha256_bytes(&archive), "1.0.3");
    let source = source_for(&r, archive);

    let prefix = tempdir().unwrap();
    let root = InstallRoot::under(prefix.path());
    let mut caveats = RecordingSink::default();

    let failure = pipeline::run(&r, &source, &root, &mut caveats).unwrap_err();
    assert_eq!(failure.stage, Stage::Testing);
    let failures = match failure.error {
        PipelineError::Verification(v) => v.failures,
        other => panic!("expected verification error, got {other}"),
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].expected, "1.0.3");
    assert!(failures[0].actual.contains("1.1.2"));

    // Files stay in place (diagnostic, not rollback), and the caveat was
    // already shown because the install stage itself succeeded.
    assert!(root.bin_dir().join("ak").exists());
    assert_eq!(caveats.emitted.len(), 1);
}

#[test]
fn reinstall_is_idempotent() {
    let archive = release_archive("ak 1.0.3 - ADB extensions kit");
    let r = recipe("1.0.3", &checksum::sha256_bytes(&archive), "1.0.3");
    let source = source_for(&r, archive);

    let prefix = tempdir().unwrap();
    let root = InstallRoot::under(prefix.path());

    let mut caveats = RecordingSink::default();
    let first = pipeline::run(&r, &source, &root, &mut caveats).expect("first install");
    let count_after_first = file_count(prefix.path());

    let second = pipeline::run(&r, &source, &root, &mut caveats).expect("second install");

    assert_eq!(first.state, second.state);
    assert_eq!(file_count(prefix.path()), count_after_first);
    // One caveat per successful invocation.
    assert_eq!(caveats.emitted.len(), 2);
}

#[test]
fn unreachable_source_fails_in_fetching() {
    let r = recipe("1.0.3", &"ab".repeat(32), "1.0.3");
    let source = MapSource {
        archives: HashMap::new(),
    };

    let prefix = tempdir().unwrap();
    let root = InstallRoot::under(prefix.path());
    let mut caveats = RecordingSink::default();

    let failure = pipeline::run(&r, &source, &root, &mut caveats).unwrap_err();
    assert_eq!(failure.stage, Stage::Fetching);
    assert!(matches!(
        failure.error,
        PipelineError::Fetch(FetchError::Http { status: 404, .. })
    ));
    assert_eq!(file_count(prefix.path()), 0);
    assert!(caveats.emitted.is_empty());
}
