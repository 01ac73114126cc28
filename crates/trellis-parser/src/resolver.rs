//! Cross-document import resolution.
//!
//! A [`Resolver`] walks the `import` statements of a scanned document,
//! loads each imported document through a [`DocumentSource`], resolves its
//! own imports recursively, and merges the result into the importing graph,
//! optionally under an `alias.` prefix. A resolution stack detects circular
//! imports and a cache scans every document once per [`Resolver::resolve`]
//! call. The merged graph is linked again at the end.

use std::{
    collections::{HashMap, HashSet},
    fs, io,
    path::{Component, Path, PathBuf},
};

use log::{debug, trace};
use thiserror::Error;
use trellis_core::{Entity, EntityGraph, graph::split_method_reference};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    linker::link,
    scanner::{ImportStatement, ScannedDocument, scan},
};

/// Error raised by a [`DocumentSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("document `{}` not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where imported documents come from.
pub trait DocumentSource {
    /// Turn an import path written in the document at `base` into the key
    /// of the imported document. `base` is `None` for a root document
    /// without a location.
    fn locate(&self, base: Option<&Path>, path: &str) -> Result<PathBuf, SourceError> {
        let dir = base.and_then(Path::parent).unwrap_or_else(|| Path::new(""));
        Ok(normalize(&dir.join(path)))
    }

    /// Read the document under `key`.
    fn read(&self, key: &Path) -> Result<String, SourceError>;
}

/// Reads documents from the file system, relative to the importing document.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemSource;

impl DocumentSource for FileSystemSource {
    fn read(&self, key: &Path) -> Result<String, SourceError> {
        fs::read_to_string(key).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(key.to_path_buf()),
            _ => SourceError::Io {
                path: key.to_path_buf(),
                source,
            },
        })
    }
}

/// Serves documents from memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document under `path`.
    pub fn insert(&mut self, path: impl AsRef<Path>, text: impl Into<String>) {
        self.documents
            .insert(normalize(path.as_ref()), text.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }
}

impl DocumentSource for MemorySource {
    fn read(&self, key: &Path) -> Result<String, SourceError> {
        self.documents
            .get(key)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(key.to_path_buf()))
    }
}

/// Lexically normalize `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// The outcome of resolving a document and everything it imports.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// The merged, linked graph.
    pub graph: EntityGraph,
    /// Scanner, resolver and linker diagnostics of every document.
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolves imports for one root document.
pub struct Resolver<'a> {
    source: &'a dyn DocumentSource,
    stack: Vec<PathBuf>,
    cache: HashMap<PathBuf, EntityGraph>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Resolver<'a> {
    pub fn new(source: &'a dyn DocumentSource) -> Self {
        Self {
            source,
            stack: Vec::new(),
            cache: HashMap::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Resolve every import of `root`, located at `base`, and link the merged
    /// graph.
    pub fn resolve(mut self, root: ScannedDocument, base: Option<&Path>) -> Resolution {
        debug!(imports = root.imports.len(); "Resolving imports");
        let ScannedDocument {
            graph,
            imports,
            diagnostics,
        } = root;
        self.diagnostics.extend(diagnostics);

        let base = base.map(normalize);
        if let Some(base) = &base {
            self.stack.push(base.clone());
        }
        let mut graph = self.merge_imports(graph, &imports, base.as_deref(), None);
        self.diagnostics.extend(link(&mut graph));

        debug!(entities = graph.len(), documents = self.cache.len(); "Resolved imports");
        Resolution {
            graph,
            diagnostics: self.diagnostics.finish(),
        }
    }

    /// Merge the imports of the document at `location` into its `graph`.
    ///
    /// `document` names the document in diagnostics; `None` is the root.
    fn merge_imports(
        &mut self,
        mut graph: EntityGraph,
        imports: &[ImportStatement],
        location: Option<&Path>,
        document: Option<&str>,
    ) -> EntityGraph {
        for import in imports {
            let key = match self.source.locate(location, &import.path) {
                Ok(key) => key,
                Err(err) => {
                    self.unreadable(import, document, &err);
                    continue;
                }
            };

            if let Some(start) = self.stack.iter().position(|entry| *entry == key) {
                let cycle: Vec<String> = self.stack[start..]
                    .iter()
                    .chain(std::iter::once(&key))
                    .map(|path| path.display().to_string())
                    .collect();
                self.diagnostics.emit(
                    Diagnostic::error(format!("circular import: {}", cycle.join(" -> ")))
                        .with_code(ErrorCode::E101)
                        .with_position(import.position)
                        .with_label(import.span, ErrorCode::E101.description())
                        .with_help("remove one of the imports in the cycle")
                        .or_document(document),
                );
                continue;
            }

            let imported = match self.cache.get(&key) {
                Some(cached) => {
                    trace!(path:% = key.display(); "Import served from cache");
                    cached.clone()
                }
                None => match self.load(&key) {
                    Ok(imported) => imported,
                    Err(err) => {
                        self.unreadable(import, document, &err);
                        continue;
                    }
                },
            };

            merge(&mut graph, &imported, import.alias.as_deref());
        }
        graph
    }

    /// Scan the document under `key` and resolve its own imports.
    fn load(&mut self, key: &Path) -> Result<EntityGraph, SourceError> {
        let text = self.source.read(key)?;
        let origin = key.display().to_string();
        debug!(path = origin.as_str(); "Loading import");

        let ScannedDocument {
            mut graph,
            imports,
            diagnostics,
        } = scan(&text);
        graph.set_origin(&origin);
        self.diagnostics
            .extend(diagnostics.into_iter().map(|d| d.or_document(Some(&origin))));

        self.stack.push(key.to_path_buf());
        let graph = self.merge_imports(graph, &imports, Some(key), Some(&origin));
        self.stack.pop();

        self.cache.insert(key.to_path_buf(), graph.clone());
        Ok(graph)
    }

    fn unreadable(&mut self, import: &ImportStatement, document: Option<&str>, err: &SourceError) {
        self.diagnostics.emit(
            Diagnostic::error(format!("cannot import `{}`: {err}", import.path))
                .with_code(ErrorCode::E100)
                .with_position(import.position)
                .with_label(import.span, ErrorCode::E100.description())
                .or_document(document),
        );
    }
}

/// Prefix `entity` and its document-local references with `alias`.
fn aliased(entity: &Entity, alias: Option<&str>, local: &HashSet<&str>) -> Entity {
    let mut entity = entity.clone();
    let Some(alias) = alias else {
        return entity;
    };

    entity.set_name(format!("{alias}.{}", entity.name()));
    entity.data_mut().rewrite_references(|reference| {
        let is_local = local.contains(reference)
            || split_method_reference(reference).is_some_and(|(owner, _)| local.contains(owner))
            || reference.strip_suffix(".*").is_some_and(|namespace| {
                let namespace = format!("{namespace}.");
                local.iter().any(|name| name.starts_with(&namespace))
            });
        is_local.then(|| format!("{alias}.{reference}"))
    });
    entity
}

/// Merge `imported` into `target`.
///
/// An entity already merged from the same origin with the same definition,
/// as happens with diamond imports, is merged once. Any other name collision
/// is recorded as a duplicate.
fn merge(target: &mut EntityGraph, imported: &EntityGraph, alias: Option<&str>) {
    let local: HashSet<&str> = imported.names().collect();
    let already_merged = |target: &EntityGraph, entity: &Entity| {
        target
            .get(entity.name())
            .is_some_and(|existing| existing.origin() == entity.origin() && existing.same_definition(entity))
    };

    for entity in imported.iter() {
        let entity = aliased(entity, alias, &local);
        if already_merged(target, &entity) {
            trace!(name = entity.name(); "Entity already merged");
            continue;
        }
        if let Err(err) = target.insert(entity) {
            debug!(name = err.name.as_str(); "Imported entity collides with an existing name");
        }
    }

    for duplicate in imported.duplicates() {
        let entity = aliased(duplicate.entity(), alias, &local);
        let recorded = target.duplicates().iter().any(|existing| {
            existing.entity().origin() == entity.origin() && existing.entity().same_definition(&entity)
        });
        if recorded {
            continue;
        }
        match target.id_of(entity.name()) {
            Some(original) => target.push_duplicate(entity, original),
            None => {
                let _ = target.insert(entity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(source: &MemorySource, root: &str) -> Resolution {
        let text = source.read(Path::new(root)).unwrap();
        Resolver::new(source).resolve(scan(&text), Some(Path::new(root)))
    }

    fn codes(resolution: &Resolution) -> Vec<ErrorCode> {
        resolution.diagnostics.iter().filter_map(|d| d.code()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize(Path::new("/x/../y")), PathBuf::from("/y"));
    }

    #[test]
    fn test_locate_relative_to_importer() {
        let source = MemorySource::new();
        let key = source
            .locate(Some(Path::new("app/main.trellis")), "../lib/ui.trellis")
            .unwrap();
        assert_eq!(key, PathBuf::from("lib/ui.trellis"));
    }

    #[test]
    fn test_merge_with_alias_rewrites_local_references() {
        let source = MemorySource::new()
            .with("main.trellis", "import \"ui.trellis\" as ui\nApp &! \"Root\"\n  > ui.Header\n")
            .with("ui.trellis", "Header & \"Top bar\"\n  > Logo\nLogo & \"Logo\"\nrender :: () => void\n  ~ Header, External\n");
        let resolution = resolve(&source, "main.trellis");

        assert!(resolution.diagnostics.is_empty(), "{:?}", resolution.diagnostics);
        let graph = &resolution.graph;
        assert!(graph.contains("ui.Header"));
        assert_eq!(graph.get("ui.Header").unwrap().origin(), Some("ui.trellis"));
        assert!(graph.get("App").unwrap().origin().is_none());
        let contains: Vec<_> = graph.get("ui.Header").unwrap().data().references();
        assert_eq!(contains[0].1, "ui.Logo");
        let render = graph.get("ui.render").unwrap().data().references();
        assert_eq!(render[0].1, "ui.Header");
        assert_eq!(render[1].1, "External");
        assert_eq!(graph.back_references().contained_by("ui.Header"), ["App"]);
    }

    #[test]
    fn test_nested_imports_are_transitive() {
        let source = MemorySource::new()
            .with("main.trellis", "import \"a.trellis\"\n")
            .with("a.trellis", "import \"lib/b.trellis\"\nA @ a.ts\n")
            .with("lib/b.trellis", "B @ lib/b.ts\n");
        let resolution = resolve(&source, "main.trellis");

        assert!(resolution.graph.contains("A"));
        assert!(resolution.graph.contains("B"));
        assert_eq!(resolution.graph.get("B").unwrap().origin(), Some("lib/b.trellis"));
    }

    #[test]
    fn test_circular_import_reports_full_cycle() {
        let source = MemorySource::new()
            .with("a.trellis", "import \"b.trellis\"\nA @ a.ts\n")
            .with("b.trellis", "import \"a.trellis\"\nB @ b.ts\n");
        let resolution = resolve(&source, "a.trellis");

        assert_eq!(codes(&resolution), [ErrorCode::E101]);
        let diagnostic = &resolution.diagnostics[0];
        assert_eq!(diagnostic.message(), "circular import: a.trellis -> b.trellis -> a.trellis");
        assert_eq!(diagnostic.document(), Some("b.trellis"));
        assert!(resolution.graph.contains("B"));
    }

    #[test]
    fn test_self_import() {
        let source = MemorySource::new().with("a.trellis", "import \"a.trellis\"\n");
        let resolution = resolve(&source, "a.trellis");

        assert_eq!(codes(&resolution), [ErrorCode::E101]);
        assert_eq!(
            resolution.diagnostics[0].message(),
            "circular import: a.trellis -> a.trellis"
        );
    }

    #[test]
    fn test_diamond_is_merged_once() {
        let source = MemorySource::new()
            .with("main.trellis", "import \"a.trellis\"\nimport \"b.trellis\"\n")
            .with("a.trellis", "import \"c.trellis\"\nA @ a.ts\n")
            .with("b.trellis", "import \"c.trellis\"\nB @ b.ts\n")
            .with("c.trellis", "C @ c.ts\n");
        let resolution = resolve(&source, "main.trellis");

        assert!(resolution.diagnostics.is_empty());
        assert!(resolution.graph.duplicates().is_empty());
        assert_eq!(resolution.graph.len(), 3);
    }

    #[test]
    fn test_collision_is_recorded_as_duplicate() {
        let source = MemorySource::new()
            .with("main.trellis", "import \"a.trellis\"\nShared @ main.ts\n")
            .with("a.trellis", "Shared @ a.ts\n");
        let resolution = resolve(&source, "main.trellis");

        assert_eq!(resolution.graph.duplicates().len(), 1);
        assert_eq!(resolution.graph.get("Shared").unwrap().data().path(), Some("main.ts"));
    }

    #[test]
    fn test_unreadable_import_continues_with_siblings() {
        let source = MemorySource::new()
            .with("main.trellis", "import \"missing.trellis\"\nimport \"a.trellis\"\n")
            .with("a.trellis", "A @ a.ts\n");
        let resolution = resolve(&source, "main.trellis");

        assert_eq!(codes(&resolution), [ErrorCode::E100]);
        assert_eq!(resolution.diagnostics[0].position().line(), 1);
        assert!(resolution.graph.contains("A"));
    }

    #[test]
    fn test_relink_distributes_imported_names() {
        let source = MemorySource::new()
            .with("main.trellis", "import \"lib.trellis\"\nrun :: () => void\n  ~> [helper, PORT]\n")
            .with("lib.trellis", "helper :: () => void\nPORT $env \"Port\"\n");
        let resolution = resolve(&source, "main.trellis");

        let refs = resolution.graph.get("run").unwrap().data().references();
        assert!(refs.contains(&(trellis_core::Relation::Calls, "helper")));
        assert!(refs.contains(&(trellis_core::Relation::Consumes, "PORT")));
        assert_eq!(resolution.graph.back_references().consumed_by("PORT"), ["run"]);
    }
}
