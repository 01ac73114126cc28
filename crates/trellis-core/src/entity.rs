//! Entity records for the architecture graph.
//!
//! Every declaration in a Trellis document becomes one [`Entity`]: a set of
//! common fields (name, location, raw text, comment) plus an [`EntityData`]
//! variant holding the kind-specific fields. Consumers match on
//! [`EntityData`] exhaustively instead of probing for optional fields.
//!
//! Relationship fields hold entity *names*. Names are resolved against an
//! [`EntityGraph`](crate::graph::EntityGraph) when needed, so records stay
//! valid while the graph is still being assembled.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::span::{Position, Span};

/// The kind tag of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EntityKind {
    Program,
    File,
    Function,
    Class,
    ClassFile,
    Constants,
    Dto,
    Asset,
    UiComponent,
    RunParameter,
    Dependency,
}

impl EntityKind {
    /// All kinds in rendering precedence order.
    pub const ALL: [EntityKind; 11] = [
        EntityKind::Program,
        EntityKind::File,
        EntityKind::ClassFile,
        EntityKind::Class,
        EntityKind::Function,
        EntityKind::Dto,
        EntityKind::Constants,
        EntityKind::UiComponent,
        EntityKind::RunParameter,
        EntityKind::Asset,
        EntityKind::Dependency,
    ];

    /// The longform keyword that introduces a block of this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            EntityKind::Program => "program",
            EntityKind::File => "file",
            EntityKind::Function => "function",
            EntityKind::Class => "class",
            EntityKind::ClassFile => "classfile",
            EntityKind::Constants => "constants",
            EntityKind::Dto => "dto",
            EntityKind::Asset => "asset",
            EntityKind::UiComponent => "component",
            EntityKind::RunParameter => "parameter",
            EntityKind::Dependency => "dependency",
        }
    }

    /// Look up a kind by its longform keyword.
    ///
    /// `uicomponent` and `runparameter` are accepted as long spellings of
    /// `component` and `parameter`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "program" => EntityKind::Program,
            "file" => EntityKind::File,
            "function" => EntityKind::Function,
            "class" => EntityKind::Class,
            "classfile" => EntityKind::ClassFile,
            "constants" => EntityKind::Constants,
            "dto" => EntityKind::Dto,
            "asset" => EntityKind::Asset,
            "component" | "uicomponent" => EntityKind::UiComponent,
            "parameter" | "runparameter" => EntityKind::RunParameter,
            "dependency" => EntityKind::Dependency,
            _ => return None,
        };
        Some(kind)
    }

    /// Position of this kind in the fixed rendering order.
    pub fn precedence(&self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| kind == self)
            .unwrap_or(Self::ALL.len())
    }

    /// Whether entities of this kind may appear in an export list.
    pub fn is_exportable(&self) -> bool {
        !matches!(
            self,
            EntityKind::Asset
                | EntityKind::UiComponent
                | EntityKind::RunParameter
                | EntityKind::Dependency
        )
    }

    /// Whether this kind occupies a source file (File or ClassFile).
    pub fn is_file_like(&self) -> bool {
        matches!(self, EntityKind::File | EntityKind::ClassFile)
    }

    /// Whether this kind can own methods (Class or ClassFile).
    pub fn is_class_like(&self) -> bool {
        matches!(self, EntityKind::Class | EntityKind::ClassFile)
    }

    /// Whether this kind is a consumable resource.
    pub fn is_consumable(&self) -> bool {
        matches!(
            self,
            EntityKind::RunParameter
                | EntityKind::Asset
                | EntityKind::Constants
                | EntityKind::Dependency
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Program => "program",
            EntityKind::File => "file",
            EntityKind::Function => "function",
            EntityKind::Class => "class",
            EntityKind::ClassFile => "class file",
            EntityKind::Constants => "constants",
            EntityKind::Dto => "DTO",
            EntityKind::Asset => "asset",
            EntityKind::UiComponent => "UI component",
            EntityKind::RunParameter => "run parameter",
            EntityKind::Dependency => "dependency",
        };
        f.write_str(label)
    }
}

/// A forward relationship authored on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Relation {
    Entry,
    Imports,
    Exports,
    Calls,
    Affects,
    Consumes,
    Contains,
    Methods,
    Input,
    Output,
    Schema,
    Base,
    Interfaces,
    /// Mixed list entries that have not been distributed yet.
    Dependencies,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Relation::Entry => "entry",
            Relation::Imports => "imports",
            Relation::Exports => "exports",
            Relation::Calls => "calls",
            Relation::Affects => "affects",
            Relation::Consumes => "consumes",
            Relation::Contains => "contains",
            Relation::Methods => "methods",
            Relation::Input => "input",
            Relation::Output => "output",
            Relation::Schema => "schema",
            Relation::Base => "extends",
            Relation::Interfaces => "implements",
            Relation::Dependencies => "dependencies",
        };
        f.write_str(label)
    }
}

/// The kind of a run parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RunParameterKind {
    Env,
    Iam,
    Runtime,
    Config,
}

impl RunParameterKind {
    /// The lowercase token used in both surface syntaxes.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunParameterKind::Env => "env",
            RunParameterKind::Iam => "iam",
            RunParameterKind::Runtime => "runtime",
            RunParameterKind::Config => "config",
        }
    }
}

impl fmt::Display for RunParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a run parameter kind token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown run parameter kind `{0}`, expected one of: env, iam, runtime, config")]
pub struct UnknownRunParameterKind(pub String);

impl FromStr for RunParameterKind {
    type Err = UnknownRunParameterKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "env" => Ok(RunParameterKind::Env),
            "iam" => Ok(RunParameterKind::Iam),
            "runtime" => Ok(RunParameterKind::Runtime),
            "config" => Ok(RunParameterKind::Config),
            other => Err(UnknownRunParameterKind(other.to_string())),
        }
    }
}

/// One field of a DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DtoField {
    pub name: String,
    /// The field type, kept as opaque text.
    pub ty: String,
    pub description: Option<String>,
    pub optional: bool,
}

impl DtoField {
    /// Create a required field without description.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            description: None,
            optional: false,
        }
    }

    /// Whether the field type spells a function type.
    ///
    /// Recognized forms: arrow types (`(a: A) => B`, `A -> B`), `fn(...)`,
    /// `function ...`, and the bare `Function`.
    pub fn has_function_type(&self) -> bool {
        let ty = self.ty.trim();
        ty.contains("=>")
            || ty.contains("->")
            || ty.starts_with("fn(")
            || ty.starts_with("function")
            || ty == "Function"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgramData {
    pub entry: String,
    pub version: Option<String>,
    pub purpose: Option<String>,
    pub exports: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileData {
    pub path: String,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionData {
    pub signature: String,
    pub description: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub calls: Vec<String>,
    pub affects: Vec<String>,
    pub consumes: Vec<String>,
    /// Authored mixed dependency names not yet distributed by the linker.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassData {
    pub base: Option<String>,
    pub interfaces: Vec<String>,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassFileData {
    pub path: String,
    pub base: Option<String>,
    pub interfaces: Vec<String>,
    pub methods: Vec<String>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConstantsData {
    pub path: String,
    pub schema: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DtoData {
    pub purpose: Option<String>,
    pub fields: Vec<DtoField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetData {
    pub description: Option<String>,
    /// Label of the program the asset ships with; not resolved as a reference.
    pub program: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiComponentData {
    pub description: Option<String>,
    pub root: bool,
    pub contains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunParameterData {
    pub kind: RunParameterKind,
    pub description: Option<String>,
    pub required: bool,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyData {
    pub purpose: Option<String>,
    pub version: Option<String>,
}

/// Kind-specific fields of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum EntityData {
    Program(ProgramData),
    File(FileData),
    Function(FunctionData),
    Class(ClassData),
    ClassFile(ClassFileData),
    Constants(ConstantsData),
    Dto(DtoData),
    Asset(AssetData),
    UiComponent(UiComponentData),
    RunParameter(RunParameterData),
    Dependency(DependencyData),
}

impl EntityData {
    /// Create empty data for `kind`.
    pub fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Program => EntityData::Program(ProgramData::default()),
            EntityKind::File => EntityData::File(FileData::default()),
            EntityKind::Function => EntityData::Function(FunctionData::default()),
            EntityKind::Class => EntityData::Class(ClassData::default()),
            EntityKind::ClassFile => EntityData::ClassFile(ClassFileData::default()),
            EntityKind::Constants => EntityData::Constants(ConstantsData::default()),
            EntityKind::Dto => EntityData::Dto(DtoData::default()),
            EntityKind::Asset => EntityData::Asset(AssetData::default()),
            EntityKind::UiComponent => EntityData::UiComponent(UiComponentData::default()),
            EntityKind::RunParameter => EntityData::RunParameter(RunParameterData {
                kind: RunParameterKind::Env,
                description: None,
                required: false,
                default: None,
            }),
            EntityKind::Dependency => EntityData::Dependency(DependencyData::default()),
        }
    }

    /// The kind tag of this data.
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityData::Program(_) => EntityKind::Program,
            EntityData::File(_) => EntityKind::File,
            EntityData::Function(_) => EntityKind::Function,
            EntityData::Class(_) => EntityKind::Class,
            EntityData::ClassFile(_) => EntityKind::ClassFile,
            EntityData::Constants(_) => EntityKind::Constants,
            EntityData::Dto(_) => EntityKind::Dto,
            EntityData::Asset(_) => EntityKind::Asset,
            EntityData::UiComponent(_) => EntityKind::UiComponent,
            EntityData::RunParameter(_) => EntityKind::RunParameter,
            EntityData::Dependency(_) => EntityKind::Dependency,
        }
    }

    /// The source path, for kinds that occupy one.
    pub fn path(&self) -> Option<&str> {
        match self {
            EntityData::File(file) => Some(&file.path),
            EntityData::ClassFile(class_file) => Some(&class_file.path),
            EntityData::Constants(constants) => Some(&constants.path),
            _ => None,
        }
    }

    /// The import list, for File and ClassFile.
    pub fn imports(&self) -> &[String] {
        match self {
            EntityData::File(file) => &file.imports,
            EntityData::ClassFile(class_file) => &class_file.imports,
            _ => &[],
        }
    }

    /// The explicit export list, for File, ClassFile and Program.
    pub fn exports(&self) -> &[String] {
        match self {
            EntityData::File(file) => &file.exports,
            EntityData::ClassFile(class_file) => &class_file.exports,
            EntityData::Program(program) => &program.exports,
            _ => &[],
        }
    }

    /// The method list, for Class and ClassFile.
    pub fn methods(&self) -> &[String] {
        match self {
            EntityData::Class(class) => &class.methods,
            EntityData::ClassFile(class_file) => &class_file.methods,
            _ => &[],
        }
    }

    /// Every forward reference authored on this entity, in field order.
    pub fn references(&self) -> Vec<(Relation, &str)> {
        let mut refs = Vec::new();
        match self {
            EntityData::Program(program) => {
                if !program.entry.is_empty() {
                    refs.push((Relation::Entry, program.entry.as_str()));
                }
                push_all(&mut refs, Relation::Exports, &program.exports);
            }
            EntityData::File(file) => {
                push_all(&mut refs, Relation::Imports, &file.imports);
                push_all(&mut refs, Relation::Exports, &file.exports);
            }
            EntityData::Function(function) => {
                if let Some(input) = &function.input {
                    refs.push((Relation::Input, input.as_str()));
                }
                if let Some(output) = &function.output {
                    refs.push((Relation::Output, output.as_str()));
                }
                push_all(&mut refs, Relation::Calls, &function.calls);
                push_all(&mut refs, Relation::Affects, &function.affects);
                push_all(&mut refs, Relation::Consumes, &function.consumes);
                push_all(&mut refs, Relation::Dependencies, &function.dependencies);
            }
            EntityData::Class(class) => {
                if let Some(base) = &class.base {
                    refs.push((Relation::Base, base.as_str()));
                }
                push_all(&mut refs, Relation::Interfaces, &class.interfaces);
                push_all(&mut refs, Relation::Methods, &class.methods);
            }
            EntityData::ClassFile(class_file) => {
                if let Some(base) = &class_file.base {
                    refs.push((Relation::Base, base.as_str()));
                }
                push_all(&mut refs, Relation::Interfaces, &class_file.interfaces);
                push_all(&mut refs, Relation::Methods, &class_file.methods);
                push_all(&mut refs, Relation::Imports, &class_file.imports);
                push_all(&mut refs, Relation::Exports, &class_file.exports);
            }
            EntityData::Constants(constants) => {
                if let Some(schema) = &constants.schema {
                    refs.push((Relation::Schema, schema.as_str()));
                }
            }
            EntityData::UiComponent(component) => {
                push_all(&mut refs, Relation::Contains, &component.contains);
            }
            EntityData::Dto(_)
            | EntityData::Asset(_)
            | EntityData::RunParameter(_)
            | EntityData::Dependency(_) => {}
        }
        refs
    }

    /// Rewrite every reference in place.
    ///
    /// `rewrite` returns the replacement name, or `None` to keep a reference
    /// unchanged.
    pub fn rewrite_references<F>(&mut self, mut rewrite: F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut one = |name: &mut String| {
            if let Some(replacement) = rewrite(name) {
                *name = replacement;
            }
        };

        match self {
            EntityData::Program(program) => {
                if !program.entry.is_empty() {
                    one(&mut program.entry);
                }
                program.exports.iter_mut().for_each(&mut one);
            }
            EntityData::File(file) => {
                file.imports.iter_mut().for_each(&mut one);
                file.exports.iter_mut().for_each(&mut one);
            }
            EntityData::Function(function) => {
                function.input.iter_mut().for_each(&mut one);
                function.output.iter_mut().for_each(&mut one);
                function.calls.iter_mut().for_each(&mut one);
                function.affects.iter_mut().for_each(&mut one);
                function.consumes.iter_mut().for_each(&mut one);
                function.dependencies.iter_mut().for_each(&mut one);
            }
            EntityData::Class(class) => {
                class.base.iter_mut().for_each(&mut one);
                class.interfaces.iter_mut().for_each(&mut one);
                class.methods.iter_mut().for_each(&mut one);
            }
            EntityData::ClassFile(class_file) => {
                class_file.base.iter_mut().for_each(&mut one);
                class_file.interfaces.iter_mut().for_each(&mut one);
                class_file.methods.iter_mut().for_each(&mut one);
                class_file.imports.iter_mut().for_each(&mut one);
                class_file.exports.iter_mut().for_each(&mut one);
            }
            EntityData::Constants(constants) => {
                constants.schema.iter_mut().for_each(&mut one);
            }
            EntityData::UiComponent(component) => {
                component.contains.iter_mut().for_each(&mut one);
            }
            EntityData::Dto(_)
            | EntityData::Asset(_)
            | EntityData::RunParameter(_)
            | EntityData::Dependency(_) => {}
        }
    }
}

fn push_all<'a>(refs: &mut Vec<(Relation, &'a str)>, relation: Relation, names: &'a [String]) {
    refs.extend(names.iter().map(|name| (relation, name.as_str())));
}

/// A property authored on an entity whose kind does not support it.
///
/// The scanner records these instead of dropping them so the validator can
/// report capability violations with a precise position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsupportedProperty {
    pub name: String,
    pub position: Position,
}

/// One named, typed node of the architecture graph.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    name: String,
    position: Position,
    span: Span,
    raw: String,
    comment: Option<String>,
    origin: Option<String>,
    unsupported: Vec<UnsupportedProperty>,
    data: EntityData,
}

impl Entity {
    /// Create an entity declared at `position`.
    pub fn new(name: impl Into<String>, position: Position, data: EntityData) -> Self {
        Self {
            name: name.into(),
            position,
            span: Span::default(),
            raw: String::new(),
            comment: None,
            origin: None,
            unsupported: Vec::new(),
            data,
        }
    }

    /// Set the byte span of the declaration.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set the raw source text of the declaration.
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    /// Set the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Get the entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the kind tag.
    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }

    /// Get the 1-based declaration position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Get the byte span of the declaration in its document.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the raw source text the entity was scanned from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Get the comment, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Get the document the entity was merged from; `None` for the root document.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Get the properties authored on the entity that its kind does not support.
    pub fn unsupported(&self) -> &[UnsupportedProperty] {
        &self.unsupported
    }

    /// Get the kind-specific data.
    pub fn data(&self) -> &EntityData {
        &self.data
    }

    /// Get mutable kind-specific data.
    pub fn data_mut(&mut self) -> &mut EntityData {
        &mut self.data
    }

    /// Rename the entity.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set the raw source text.
    pub fn set_raw(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
    }

    /// Set the byte span.
    pub fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    /// Set the origin document.
    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.origin = Some(origin.into());
    }

    /// Append a comment line; successive lines are joined with `\n`.
    pub fn push_comment(&mut self, line: &str) {
        match &mut self.comment {
            Some(comment) => {
                comment.push('\n');
                comment.push_str(line);
            }
            None => self.comment = Some(line.to_string()),
        }
    }

    /// Record a property its kind cannot hold.
    pub fn push_unsupported(&mut self, name: impl Into<String>, position: Position) {
        self.unsupported.push(UnsupportedProperty {
            name: name.into(),
            position,
        });
    }

    /// Compare two entities by what they declare, ignoring location, raw text
    /// and origin.
    pub fn same_definition(&self, other: &Entity) -> bool {
        self.name == other.name && self.comment == other.comment && self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(
            EntityKind::from_keyword("uicomponent"),
            Some(EntityKind::UiComponent)
        );
        assert_eq!(EntityKind::from_keyword("module"), None);
    }

    #[test]
    fn test_precedence_is_total() {
        let mut precedences: Vec<_> = EntityKind::ALL.iter().map(|k| k.precedence()).collect();
        precedences.dedup();
        assert_eq!(precedences, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn test_exportable_kinds() {
        assert!(EntityKind::Class.is_exportable());
        assert!(EntityKind::Dto.is_exportable());
        assert!(!EntityKind::Asset.is_exportable());
        assert!(!EntityKind::UiComponent.is_exportable());
        assert!(!EntityKind::RunParameter.is_exportable());
        assert!(!EntityKind::Dependency.is_exportable());
    }

    #[test]
    fn test_run_parameter_kind_from_str() {
        assert_eq!("iam".parse::<RunParameterKind>(), Ok(RunParameterKind::Iam));
        let err = "secret".parse::<RunParameterKind>().unwrap_err();
        assert!(err.to_string().contains("`secret`"));
    }

    #[test]
    fn test_function_type_detection() {
        assert!(DtoField::new("cb", "(x: number) => void").has_function_type());
        assert!(DtoField::new("cb", "Int -> Int").has_function_type());
        assert!(DtoField::new("cb", "fn(u8)").has_function_type());
        assert!(DtoField::new("cb", "Function").has_function_type());
        assert!(!DtoField::new("id", "string").has_function_type());
        assert!(!DtoField::new("items", "Array<Item>").has_function_type());
    }

    #[test]
    fn test_references_in_field_order() {
        let data = EntityData::Function(FunctionData {
            signature: "() => void".to_string(),
            input: Some("In".to_string()),
            calls: vec!["a".to_string(), "Store.get".to_string()],
            affects: vec!["Header".to_string()],
            ..FunctionData::default()
        });

        let refs = data.references();
        assert_eq!(
            refs,
            vec![
                (Relation::Input, "In"),
                (Relation::Calls, "a"),
                (Relation::Calls, "Store.get"),
                (Relation::Affects, "Header"),
            ]
        );
    }

    #[test]
    fn test_rewrite_references() {
        let mut data = EntityData::File(FileData {
            path: "a.ts".to_string(),
            imports: vec!["B".to_string(), "External".to_string()],
            exports: vec!["helper".to_string()],
        });

        data.rewrite_references(|name| (name != "External").then(|| format!("ns.{name}")));

        assert_eq!(data.imports(), ["ns.B", "External"]);
        assert_eq!(data.exports(), ["ns.helper"]);
        assert_eq!(data.path(), Some("a.ts"));
    }

    #[test]
    fn test_push_comment_joins_lines() {
        let mut entity = Entity::new(
            "Main",
            Position::start(),
            EntityData::empty(EntityKind::File),
        );
        entity.push_comment("first");
        entity.push_comment("second");
        assert_eq!(entity.comment(), Some("first\nsecond"));
    }

    #[test]
    fn test_same_definition_ignores_location() {
        let a = Entity::new("Logo", Position::new(1, 1), EntityData::empty(EntityKind::Asset))
            .with_raw("Logo ~ \"x\"");
        let b = Entity::new("Logo", Position::new(9, 3), EntityData::empty(EntityKind::Asset))
            .with_raw("asset Logo {}");
        assert!(a.same_definition(&b));
    }
}
