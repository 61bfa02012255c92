//! Append-only collection of published recipes, keyed by package name.

use super::Recipe;
use semver::Version;
use std::collections::BTreeMap;
use std::fmt;

/// Publishing a revision can only append a strictly newer version.
#[derive(Debug)]
pub enum PublishError {
    /// The version is not newer than the latest already-published revision.
    NotMonotonic {
        name: String,
        version: Version,
        latest: Version,
    },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::NotMonotonic {
                name,
                version,
                latest,
            } => write!(
                f,
                "{name} {version} is not newer than already-published {latest}"
            ),
        }
    }
}

impl std::error::Error for PublishError {}

/// Versioned recipe collection. Revisions are append-only: publishing never
/// edits an existing record, and versions per package strictly increase.
#[derive(Debug, Default)]
pub struct RecipeBook {
    entries: BTreeMap<String, Vec<Recipe>>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new revision. Rejects versions that do not strictly exceed
    /// the latest published version of the same package.
    pub fn publish(&mut self, recipe: Recipe) -> Result<(), PublishError> {
        let revisions = self.entries.entry(recipe.name.clone()).or_default();
        if let Some(last) = revisions.last() {
            if recipe.version <= last.version {
                return Err(PublishError::NotMonotonic {
                    name: recipe.name.clone(),
                    version: recipe.version.clone(),
                    latest: last.version.clone(),
                });
            }
        }
        revisions.push(recipe);
        Ok(())
    }

    /// Look up a specific published revision.
    pub fn get(&self, name: &str, version: &Version) -> Option<&Recipe> {
        self.entries
            .get(name)?
            .iter()
            .find(|r| &r.version == version)
    }

    /// Latest published revision of a package.
    pub fn latest(&self, name: &str) -> Option<&Recipe> {
        self.entries.get(name)?.last()
    }

    /// Package names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All published revisions of a package, oldest first.
    pub fn revisions(&self, name: &str) -> &[Recipe] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{Check, InstallAction};

    fn recipe(version: &str) -> Recipe {
        Recipe {
            name: "ak".into(),
            version: Version::parse(version).unwrap(),
            homepage: "https://example.org".into(),
            url: "https://example.org/ak-v{version}.tar.gz".into(),
            sha256: "ab".repeat(32),
            license: "MIT".into(),
            actions: vec![InstallAction::PlaceExecutable {
                source: "build/ak".into(),
                name: "ak".into(),
            }],
            caveat: None,
            checks: vec![Check {
                label: "version".into(),
                args: vec!["--version".into()],
                expect: version.into(),
            }],
        }
    }

    #[test]
    fn publish_and_lookup() {
        let mut book = RecipeBook::new();
        book.publish(recipe("1.0.0")).unwrap();
        book.publish(recipe("1.1.0")).unwrap();

        assert_eq!(book.latest("ak").unwrap().version, Version::new(1, 1, 0));
        assert!(book.get("ak", &Version::new(1, 0, 0)).is_some());
        assert!(book.get("ak", &Version::new(0, 9, 0)).is_none());
        assert!(book.latest("missing").is_none());
        assert_eq!(book.revisions("ak").len(), 2);
    }

    #[test]
    fn rejects_non_monotonic_versions() {
        let mut book = RecipeBook::new();
        book.publish(recipe("1.1.0")).unwrap();

        let older = book.publish(recipe("1.0.0"));
        assert!(matches!(older, Err(PublishError::NotMonotonic { .. })));

        let duplicate = book.publish(recipe("1.1.0"));
        assert!(matches!(duplicate, Err(PublishError::NotMonotonic { .. })));
    }

    #[test]
    fn packages_are_independent() {
        let mut book = RecipeBook::new();
        book.publish(recipe("1.1.0")).unwrap();
        let mut other = recipe("1.0.0");
        other.name = "zk".into();
        book.publish(other).unwrap();

        let names: Vec<_> = book.names().collect();
        assert_eq!(names, vec!["ak", "zk"]);
    }
}
