//! Builtin recipe book: the published `ak` revisions.
//!
//! Each revision is carried over from the upstream manifests verbatim,
//! including the expected-version strings in the later check batteries.
//! From 1.0.3 onward upstream still asserts `"1.0.3"` against `--version`;
//! the harness compares against these literals so the mismatch in 1.1.x
//! reproduces as a test finding rather than being silently corrected.

use super::{Check, InstallAction, Recipe, RecipeBook, Shell};
use semver::Version;

const AK_HOMEPAGE: &str = "https://github.com/luminousvault/adb-extensions";
const AK_URL: &str =
    "https://github.com/luminousvault/adb-extensions/releases/download/v{version}/adb-extensions-v{version}.tar.gz";

const AK_CAVEAT: &str =
    "zsh completions were installed as _ak; restart your shell (or run `exec zsh`) to pick them up.";

fn ak_checks(expect_version: &str) -> Vec<Check> {
    vec![
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
    ]
}

fn ak(version: &str, sha256: &str, bin_source: &str, expect_version: &str) -> Recipe {
    Recipe {
        name: "ak".into(),
        version: Version::parse(version).expect("builtin version"),
        homepage: AK_HOMEPAGE.into(),
        url: AK_URL.into(),
        sha256: sha256.into(),
        license: "MIT".into(),
        actions: vec![
            InstallAction::PlaceExecutable {
                source: bin_source.into(),
                name: "ak".into(),
            },
            InstallAction::PlaceCompletionScript {
                source: "build/completions/_ak".into(),
                shell: Shell::Zsh,
                name: "_ak".into(),
            },
        ],
        caveat: (version != "1.0.0").then(|| AK_CAVEAT.into()),
        checks: ak_checks(expect_version),
    }
}

/// The builtin recipe book.
pub fn builtin() -> RecipeBook {
    let mut book = RecipeBook::new();
    let revisions = [
        // 1.0.x shipped the binary as build/ak.bin; 1.0.3+ renamed it to build/ak.
        ak(
            "1.0.0",
            "878ec096dbd8569f2dd37c6b7cac10cabfc94d81ab55f8c093c6fc03af37d4bc",
            "build/ak.bin",
            "1.0.0",
        ),
        ak(
            "1.0.3",
            "38ed6645710b015003df1cc6af5cdf579e4059af14767c18961ee1435ca7ce2b",
            "build/ak",
            "1.0.3",
        ),
        ak(
            "1.1.0",
            "b3d8db7b58f11f832d9c7ba6e1b516b2f5db0165a3dbaf4ca07c62192eaa4165",
            "build/ak",
            "1.0.3",
        ),
        ak(
            "1.1.2",
            "d8fcc847c9a7ed6c0ee50ada8c3fabdf8f38d5f9a6c693ba4a258327ec8aa929",
            "build/ak",
            "1.0.3",
        ),
        ak(
            "1.1.4",
            "cb85cd98c0292a82c40b7c63aee942f25be0584c107f0e29e6e0a8a41619725e",
            "build/ak",
            "1.0.3",
        ),
    ];
    for recipe in revisions {
        book.publish(recipe).expect("builtin revisions are ordered");
    }
    book
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_book_lists_all_ak_revisions() {
        let book = builtin();
        let versions: Vec<String> = book
            .revisions("ak")
            .iter()
            .map(|r| r.version.to_string())
            .collect();
        assert_eq!(versions, vec!["1.0.0", "1.0.3", "1.1.0", "1.1.2", "1.1.4"]);
        assert_eq!(book.latest("ak").unwrap().version, Version::new(1, 1, 4));
    }

    #[test]
    fn late_revisions_keep_the_stale_version_assertion() {
        let book = builtin();
        for v in ["1.1.0", "1.1.2", "1.1.4"] {
            let r = book.get("ak", &Version::parse(v).unwrap()).unwrap();
            // Upstream carried the 1.0.3 assertion forward unchanged.
            assert_eq!(r.checks[0].expect, "1.0.3");
            assert_ne!(r.checks[0].expect, r.version.to_string());
        }
    }

    #[test]
    fn every_revision_has_a_well_formed_digest() {
        let book = builtin();
        for r in book.revisions("ak") {
            assert_eq!(r.sha256.len(), 64);
            assert!(r.sha256.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn url_template_expands_per_revision() {
        let book = builtin();
        let r = book.get("ak", &Version::new(1, 1, 2)).unwrap();
        assert_eq!(
            r.archive_url(),
            "https://github.com/luminousvault/adb-extensions/releases/download/v1.1.2/adb-extensions-v1.1.2.tar.gz"
        );
    }
}
