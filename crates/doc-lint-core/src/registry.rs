//! Registry of documentable code objects.
//!
//! The registry itself is built by an external documentation extractor.
//! This module defines the object model the engine consumes, the
//! [`Registry`] lookup interface, and [`InMemoryRegistry`], which serves
//! objects loaded from the extractor's JSON dump.

use crate::visibility::Visibility;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Kind of a documentable code object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// A module or namespace.
    Module,
    /// A class.
    Class,
    /// A method.
    Method,
    /// A constant.
    Constant,
    /// A class variable or attribute.
    Attribute,
}

/// Declared visibility of a code object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectVisibility {
    /// Public member.
    #[default]
    Public,
    /// Protected member.
    Protected,
    /// Private member.
    Private,
}

/// A documentation tag such as `@param` or `@return`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name without the `@` (e.g. `param`).
    pub name: String,
    /// Parameter name for tags that carry one.
    #[serde(default)]
    pub param_name: Option<String>,
    /// Declared types, if any.
    #[serde(default)]
    pub types: Vec<String>,
    /// Free text of the tag.
    #[serde(default)]
    pub text: String,
}

impl Tag {
    /// Creates a tag with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A documentable code object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeObject {
    /// Fully qualified path (e.g. `Foo::Bar#baz`).
    pub path: String,
    /// Object kind.
    pub kind: ObjectKind,
    /// Declared visibility.
    #[serde(default)]
    pub visibility: ObjectVisibility,
    /// Source file, when known.
    #[serde(default)]
    pub file: Option<String>,
    /// Source line, when known.
    #[serde(default)]
    pub line: Option<usize>,
    /// Raw documentation text.
    #[serde(default)]
    pub docstring: String,
    /// Parsed documentation tags, in source order.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl CodeObject {
    /// Creates a public object with no location or documentation.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            path: path.into(),
            kind,
            visibility: ObjectVisibility::Public,
            file: None,
            line: None,
            docstring: String::new(),
            tags: Vec::new(),
        }
    }

    /// Sets the source location.
    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: usize) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Sets the visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: ObjectVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Sets the documentation text.
    #[must_use]
    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = docstring.into();
        self
    }

    /// Appends a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Display title of the object.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.path
    }

    /// Returns true if the object has a docstring or any tag.
    #[must_use]
    pub fn is_documented(&self) -> bool {
        !self.docstring.trim().is_empty() || !self.tags.is_empty()
    }

    /// Returns true if the object is visible at the given level.
    #[must_use]
    pub fn is_visible_at(&self, visibility: Visibility) -> bool {
        match visibility {
            Visibility::All => true,
            Visibility::Public => self.visibility == ObjectVisibility::Public,
        }
    }

    /// Tags with the given name.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |t| t.name == name)
    }
}

/// Supplies code objects to in-process validators.
pub trait Registry: Send + Sync {
    /// Objects visible at `visibility`, whose file matches none of
    /// `file_excludes`, restricted to `file_selection` when given.
    fn objects_for_validator(
        &self,
        visibility: Visibility,
        file_excludes: &[String],
        file_selection: Option<&[PathBuf]>,
    ) -> Vec<&CodeObject>;
}

/// Errors loading a registry dump.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// IO error reading the dump.
    #[error("Failed to read registry {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The dump is not valid JSON for the object model.
    #[error("Failed to parse registry: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A registry backed by a list of objects held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    objects: Vec<CodeObject>,
}

impl InMemoryRegistry {
    /// Creates a registry over the given objects.
    #[must_use]
    pub fn new(objects: Vec<CodeObject>) -> Self {
        Self { objects }
    }

    /// Parses a JSON array of objects.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the object model.
    pub fn from_json(content: &str) -> Result<Self, RegistryError> {
        Ok(Self::new(serde_json::from_str(content)?))
    }

    /// Loads a JSON dump from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|e| RegistryError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// All objects, unfiltered.
    #[must_use]
    pub fn objects(&self) -> &[CodeObject] {
        &self.objects
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the registry holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Registry for InMemoryRegistry {
    fn objects_for_validator(
        &self,
        visibility: Visibility,
        file_excludes: &[String],
        file_selection: Option<&[PathBuf]>,
    ) -> Vec<&CodeObject> {
        let patterns: Vec<glob::Pattern> = file_excludes
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    debug!("Ignoring invalid exclude pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();

        self.objects
            .iter()
            .filter(|o| o.is_visible_at(visibility))
            .filter(|o| match o.file.as_deref() {
                Some(file) => !is_excluded(file, &patterns),
                None => true,
            })
            .filter(|o| match (file_selection, o.file.as_deref()) {
                (None, _) => true,
                (Some(selection), Some(file)) => is_selected(file, selection),
                (Some(_), None) => false,
            })
            .collect()
    }
}

fn normalize(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}

fn is_excluded(file: &str, patterns: &[glob::Pattern]) -> bool {
    let file = normalize(file);
    patterns.iter().any(|p| p.matches(file))
}

/// Registry files are relative to the project root, while selected paths
/// may be absolute or relative to another directory. A selected path
/// matches when its trailing components are the file's components.
fn is_selected(file: &str, selection: &[PathBuf]) -> bool {
    let file = Path::new(file);
    if file.is_absolute() {
        return selection.iter().any(|s| s.components().eq(file.components()));
    }
    let wanted = significant_components(file);
    if wanted.is_empty() {
        return false;
    }
    selection
        .iter()
        .any(|s| significant_components(s).ends_with(&wanted))
}

fn significant_components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
