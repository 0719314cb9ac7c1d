//! Include resolution.
//!
//! Starting from a root document, every `<include>` is loaded depth first
//! and its declarations are merged ahead of the including document. The
//! root document's `<dialect>` is the only one that counts.

use crate::document::{DialectDocument, RawEnum, RawMessage};
use crate::error::SchemaError;
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Read access to dialect files.
pub trait Loader {
    /// Returns the canonical form of `path`, used as the identity of a file
    /// for cycle detection and de-duplication.
    ///
    /// # Errors
    /// Returns an `io::ErrorKind::NotFound` error if the file does not exist.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Reads the content of a file previously returned by
    /// [`Loader::canonicalize`].
    ///
    /// # Errors
    /// Returns the underlying IO error.
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Loader backed by the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl Loader for FsLoader {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn load(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Loader serving documents from memory, keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document.
    pub fn insert(&mut self, path: impl AsRef<Path>, xml: impl Into<String>) {
        self.files.insert(normalize(path.as_ref()), xml.into());
    }

    /// Adds a document, builder style.
    #[must_use]
    pub fn with(mut self, path: impl AsRef<Path>, xml: impl Into<String>) -> Self {
        self.insert(path, xml);
        self
    }
}

impl Loader for MemoryLoader {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let path = normalize(path);
        if self.files.contains_key(&path) {
            Ok(path)
        } else {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such document"))
        }
    }

    fn load(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such document"))
    }
}

/// Lexically removes `.` and resolves `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// A declaration together with the file that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    /// Declaring file.
    pub source: PathBuf,
    /// The declaration.
    pub item: T,
}

/// Declarations of a root document and all of its includes.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    /// Canonical path of the root document.
    pub root: PathBuf,
    /// Dialect version of the root document.
    pub dialect: u32,
    /// Files in merge order, the root last.
    pub files: Vec<PathBuf>,
    /// Enums in merge order.
    pub enums: Vec<Sourced<RawEnum>>,
    /// Messages in merge order.
    pub messages: Vec<Sourced<RawMessage>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Visiting,
    Done,
}

struct Resolver<'a, L: ?Sized> {
    loader: &'a L,
    states: HashMap<PathBuf, State>,
    stack: Vec<PathBuf>,
    enum_sources: HashMap<String, PathBuf>,
    message_sources: HashMap<String, PathBuf>,
    out: Declarations,
}

/// Loads `root` and everything it includes.
///
/// # Arguments
/// * `root` - Path of the root dialect document
/// * `loader` - Source of document contents
///
/// # Errors
/// Returns `IncludeNotFound`, `IncludeCycle`, `MalformedDocument`, `Io`, or
/// `DuplicateName` when two files declare the same enum or message name.
pub fn resolve<L: Loader + ?Sized>(root: &Path, loader: &L) -> Result<Declarations, SchemaError> {
    let canonical = loader
        .canonicalize(root)
        .map_err(|source| SchemaError::Io {
            path: root.to_path_buf(),
            source,
        })?;

    let mut resolver = Resolver {
        loader,
        states: HashMap::new(),
        stack: Vec::new(),
        enum_sources: HashMap::new(),
        message_sources: HashMap::new(),
        out: Declarations {
            root: canonical.clone(),
            ..Declarations::default()
        },
    };
    resolver.visit(&canonical, true)?;
    Ok(resolver.out)
}

impl<L: Loader + ?Sized> Resolver<'_, L> {
    fn visit(&mut self, path: &Path, is_root: bool) -> Result<(), SchemaError> {
        match self.states.get(path) {
            Some(State::Visiting) => {
                let start = self.stack.iter().position(|p| p == path).unwrap_or(0);
                let mut cycle = self.stack[start..].to_vec();
                cycle.push(path.to_path_buf());
                return Err(SchemaError::IncludeCycle { cycle });
            }
            Some(State::Done) => return Ok(()),
            None => {}
        }

        let xml = self.loader.load(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = DialectDocument::parse(path, &xml).map_err(|source| {
            SchemaError::MalformedDocument {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(
            path = %path.display(),
            includes = doc.includes.len(),
            enums = doc.enums.len(),
            messages = doc.messages.len(),
            "loaded dialect document"
        );

        self.states.insert(path.to_path_buf(), State::Visiting);
        self.stack.push(path.to_path_buf());

        for include in &doc.includes {
            let target = doc.include_path(include);
            let canonical = self.loader.canonicalize(&target).map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    SchemaError::IncludeNotFound {
                        path: target.clone(),
                        referenced_by: path.to_path_buf(),
                    }
                } else {
                    SchemaError::Io {
                        path: target.clone(),
                        source,
                    }
                }
            })?;
            self.visit(&canonical, false)?;
        }

        self.stack.pop();
        self.states.insert(path.to_path_buf(), State::Done);

        if is_root {
            self.out.dialect = doc.dialect_version();
        }
        self.merge(doc)
    }

    fn merge(&mut self, doc: DialectDocument) -> Result<(), SchemaError> {
        for raw in doc.enums {
            claim_name(&mut self.enum_sources, "enum", &raw.name, &doc.path)?;
            self.out.enums.push(Sourced {
                source: doc.path.clone(),
                item: raw,
            });
        }
        for raw in doc.messages {
            claim_name(&mut self.message_sources, "message", &raw.name, &doc.path)?;
            self.out.messages.push(Sourced {
                source: doc.path.clone(),
                item: raw,
            });
        }
        self.out.files.push(doc.path);
        Ok(())
    }
}

fn claim_name(
    owners: &mut HashMap<String, PathBuf>,
    kind: &'static str,
    name: &str,
    source: &Path,
) -> Result<(), SchemaError> {
    if let Some(first) = owners.get(name) {
        return Err(SchemaError::DuplicateName {
            kind,
            name: name.to_string(),
            first: first.display().to_string(),
            second: source.display().to_string(),
        });
    }
    owners.insert(name.to_string(), source.to_path_buf());
    Ok(())
}
