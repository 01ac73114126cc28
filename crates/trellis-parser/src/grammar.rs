//! The declarative grammar table.
//!
//! Every line-level construct of both surface syntaxes is one row of data:
//! a regex pattern with named captures, a description and an example. The
//! scanner matches lines against the compiled table, the format detector
//! classifies lines with it, and `trellis grammar` prints it.
//!
//! Rows are tried in table order. Shortform declarations are distinguished by
//! the operator right after the name, so their order is free; continuation
//! markers that share a prefix (`<-` and `<`, `~>` and `~`, `>>` and `>`)
//! list the longer marker first.

use std::{fmt, sync::LazyLock};

use log::error;
use regex::{Captures, Regex};
use trellis_core::EntityKind;

/// The two surface syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// Terse operator-based lines.
    Shortform,
    /// Keyword and brace blocks.
    Longform,
}

impl Syntax {
    /// The other syntax.
    pub fn opposite(&self) -> Syntax {
        match self {
            Syntax::Shortform => Syntax::Longform,
            Syntax::Longform => Syntax::Shortform,
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Syntax::Shortform => write!(f, "shortform"),
            Syntax::Longform => write!(f, "longform"),
        }
    }
}

/// An indented shortform continuation line, identified by its marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `<-` imports, or a function's input DTO.
    Imports,
    /// `->` exports, or a function's output DTO.
    Exports,
    /// `~>` a function's mixed dependency list.
    Dependencies,
    /// `=>` calls.
    Calls,
    /// `$<` consumed resources.
    Consumes,
    /// `>>` an asset's program.
    Program,
    /// `>` methods, or a component's children.
    Members,
    /// `<` a run parameter's default.
    Default,
    /// `~` affected components.
    Affects,
    /// `- name: type` a DTO field.
    Field,
    /// A quoted description or purpose.
    Text,
    /// `#` an entity comment.
    Comment,
}

impl Marker {
    /// The marker token as written.
    pub fn token(&self) -> &'static str {
        match self {
            Marker::Imports => "<-",
            Marker::Exports => "->",
            Marker::Dependencies => "~>",
            Marker::Calls => "=>",
            Marker::Consumes => "$<",
            Marker::Program => ">>",
            Marker::Members => ">",
            Marker::Default => "<",
            Marker::Affects => "~",
            Marker::Field => "-",
            Marker::Text => "\"",
            Marker::Comment => "#",
        }
    }
}

/// Document-level statements shared by both syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statement {
    /// `import "path" [as alias]`
    Import,
    /// `keyword Name {` opening a longform block.
    Block,
}

/// A shortform declaration rule.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationRule {
    pub kind: EntityKind,
    pub pattern: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

/// A shortform continuation rule.
#[derive(Debug, Clone, Copy)]
pub struct ContinuationRule {
    pub marker: Marker,
    pub pattern: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

/// A document-level statement rule.
#[derive(Debug, Clone, Copy)]
pub struct StatementRule {
    pub statement: Statement,
    pub pattern: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

/// The properties a longform block of one kind accepts.
#[derive(Debug, Clone, Copy)]
pub struct PropertyRule {
    pub kind: EntityKind,
    pub keys: &'static [&'static str],
    pub example: &'static str,
}

pub const SHORTFORM_DECLARATIONS: &[DeclarationRule] = &[
    DeclarationRule {
        kind: EntityKind::Program,
        pattern: r#"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*->\s*(?P<entry>[A-Za-z_][A-Za-z0-9_.]*)(?:\s+(?P<version>v?\d[\w.+-]*))?(?:\s+(?P<purpose>"(?:[^"\\]|\\.)*"))?\s*$"#,
        description: "program with entry file, optional version and purpose",
        example: r#"Shop -> Main v1.2.0 "Online shop""#,
    },
    DeclarationRule {
        kind: EntityKind::File,
        pattern: r"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*@\s*(?P<path>\S+?):?\s*$",
        description: "file at a source path",
        example: "Main @ src/main.ts:",
    },
    DeclarationRule {
        kind: EntityKind::Function,
        pattern: r"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*::\s*(?P<signature>.*?)\s*$",
        description: "function with an opaque signature",
        example: "checkout :: (cart: Cart) => Receipt",
    },
    DeclarationRule {
        kind: EntityKind::Class,
        pattern: r"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*<:\s*(?P<parents>.*?)\s*$",
        description: "class with optional base (`_` for none) and interfaces",
        example: "CartStore <: Store, Observable",
    },
    DeclarationRule {
        kind: EntityKind::ClassFile,
        pattern: r"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*#:\s*(?P<path>\S+?)(?:\s*<:\s*(?P<parents>.*?))?\s*$",
        description: "class file at a source path, with optional base and interfaces",
        example: "Api #: src/api.ts <: Client",
    },
    DeclarationRule {
        kind: EntityKind::Constants,
        pattern: r"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*!\s*(?P<path>\S+?)(?:\s*:\s*(?P<schema>[A-Za-z_][A-Za-z0-9_.]*))?\s*$",
        description: "constants file with an optional DTO schema",
        example: "Settings ! config/app.json : SettingsDto",
    },
    DeclarationRule {
        kind: EntityKind::Dto,
        pattern: r#"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*%\s*(?P<purpose>"(?:[^"\\]|\\.)*")?\s*$"#,
        description: "data transfer object with a purpose",
        example: r#"CartDto % "Cart payload""#,
    },
    DeclarationRule {
        kind: EntityKind::Asset,
        pattern: r#"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*~\s*(?P<description>"(?:[^"\\]|\\.)*")?\s*$"#,
        description: "asset with a description",
        example: r#"Logo ~ "Brand logo""#,
    },
    DeclarationRule {
        kind: EntityKind::UiComponent,
        pattern: r#"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*&(?P<root>!)?\s*(?P<description>"(?:[^"\\]|\\.)*")?\s*$"#,
        description: "UI component; `&!` marks the root component",
        example: r#"App &! "Root view""#,
    },
    DeclarationRule {
        kind: EntityKind::RunParameter,
        pattern: r#"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\$(?P<kind>[A-Za-z]+)\s*(?P<description>"(?:[^"\\]|\\.)*")?\s*(?P<required>\(required\))?\s*$"#,
        description: "run parameter of kind env, iam, runtime or config",
        example: r#"PORT $env "Listen port" (required)"#,
    },
    DeclarationRule {
        kind: EntityKind::Dependency,
        pattern: r#"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\^\s*(?P<purpose>"(?:[^"\\]|\\.)*")?(?:\s*(?P<version>v?\d[\w.+-]*))?\s*$"#,
        description: "external dependency with purpose and optional version",
        example: r#"React ^ "UI library" v18.2.0"#,
    },
];

pub const CONTINUATIONS: &[ContinuationRule] = &[
    ContinuationRule {
        marker: Marker::Imports,
        pattern: r"^<-\s*(?P<value>.*?)\s*$",
        description: "imports (file, class file); input DTO (function)",
        example: "  <- React, CartStore",
    },
    ContinuationRule {
        marker: Marker::Exports,
        pattern: r"^->\s*(?P<value>.*?)\s*$",
        description: "exports (file, class file, program); output DTO (function)",
        example: "  -> checkout, CartDto",
    },
    ContinuationRule {
        marker: Marker::Dependencies,
        pattern: r"^~>\s*(?P<value>.*?)\s*$",
        description: "mixed dependency list, distributed by kind (function)",
        example: "  ~> [formatPrice, Header, PORT, CartDto]",
    },
    ContinuationRule {
        marker: Marker::Calls,
        pattern: r"^=>\s*(?P<value>.*?)\s*$",
        description: "calls (function)",
        example: "  => formatPrice, CartStore.load",
    },
    ContinuationRule {
        marker: Marker::Consumes,
        pattern: r"^\$<\s*(?P<value>.*?)\s*$",
        description: "consumed resources (function)",
        example: "  $< PORT, Settings",
    },
    ContinuationRule {
        marker: Marker::Program,
        pattern: r"^>>\s*(?P<value>.*?)\s*$",
        description: "contained program (asset)",
        example: "  >> Shop",
    },
    ContinuationRule {
        marker: Marker::Members,
        pattern: r"^>\s*(?P<value>.*?)\s*$",
        description: "methods (class, class file); children (UI component)",
        example: "  > load, save",
    },
    ContinuationRule {
        marker: Marker::Default,
        pattern: r"^<\s*(?P<value>.*?)\s*$",
        description: "default value (run parameter)",
        example: "  < 8080",
    },
    ContinuationRule {
        marker: Marker::Affects,
        pattern: r"^~\s*(?P<value>.*?)\s*$",
        description: "affected UI components (function)",
        example: "  ~ Header, CartBadge",
    },
    ContinuationRule {
        marker: Marker::Field,
        pattern: r#"^-\s*(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*:\s*(?P<type>.+?)(?:\s+(?P<description>"(?:[^"\\]|\\.)*"))?(?:\s*(?P<optional>\(optional\)))?\s*$"#,
        description: "DTO field with type, optional description and `(optional)` flag",
        example: r#"  - total: number "Sum in cents" (optional)"#,
    },
    ContinuationRule {
        marker: Marker::Text,
        pattern: r#"^(?P<value>"(?:[^"\\]|\\.)*")\s*$"#,
        description: "description or purpose",
        example: r#"  "Computes the cart total""#,
    },
    ContinuationRule {
        marker: Marker::Comment,
        pattern: r"^#\s?(?P<value>.*?)\s*$",
        description: "entity comment",
        example: "  # kept in sync with the backend",
    },
];

pub const STATEMENTS: &[StatementRule] = &[
    StatementRule {
        statement: Statement::Import,
        pattern: r#"^\s*import\s+(?P<path>"(?:[^"\\]|\\.)*")(?:\s+as\s+(?P<alias>[A-Za-z_][A-Za-z0-9_]*))?\s*$"#,
        description: "import another document, optionally under an alias",
        example: r#"import "shared/ui.trellis" as ui"#,
    },
    StatementRule {
        statement: Statement::Block,
        pattern: r"^\s*(?P<keyword>[a-z]+)\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\{",
        description: "longform block `keyword Name { key: value }`",
        example: r#"function checkout { signature: "(cart: Cart) => Receipt" }"#,
    },
];

pub const LONGFORM_PROPERTIES: &[PropertyRule] = &[
    PropertyRule {
        kind: EntityKind::Program,
        keys: &["entry", "version", "purpose", "exports"],
        example: r#"program Shop { entry: Main, version: 1.2.0, purpose: "Online shop" }"#,
    },
    PropertyRule {
        kind: EntityKind::File,
        keys: &["path", "imports", "exports"],
        example: "file Main { path: src/main.ts, imports: [React], exports: [checkout] }",
    },
    PropertyRule {
        kind: EntityKind::Function,
        keys: &[
            "signature",
            "description",
            "input",
            "output",
            "calls",
            "affects",
            "consumes",
            "dependencies",
        ],
        example: r#"function checkout { signature: "(cart: Cart) => Receipt", calls: [pay] }"#,
    },
    PropertyRule {
        kind: EntityKind::Class,
        keys: &["extends", "implements", "methods"],
        example: "class CartStore { extends: Store, methods: [load, save] }",
    },
    PropertyRule {
        kind: EntityKind::ClassFile,
        keys: &["path", "imports", "exports", "extends", "implements", "methods"],
        example: "classfile Api { path: src/api.ts, extends: Client, methods: [get] }",
    },
    PropertyRule {
        kind: EntityKind::Constants,
        keys: &["path", "schema"],
        example: "constants Settings { path: config/app.json, schema: SettingsDto }",
    },
    PropertyRule {
        kind: EntityKind::Dto,
        keys: &["purpose", "fields"],
        example: r#"dto CartDto { purpose: "Cart payload", fields: { total: number } }"#,
    },
    PropertyRule {
        kind: EntityKind::Asset,
        keys: &["description", "program"],
        example: r#"asset Logo { description: "Brand logo" }"#,
    },
    PropertyRule {
        kind: EntityKind::UiComponent,
        keys: &["description", "root", "contains"],
        example: r#"component App { description: "Root view", root: true, contains: [Header] }"#,
    },
    PropertyRule {
        kind: EntityKind::RunParameter,
        keys: &["kind", "description", "required", "default"],
        example: r#"parameter PORT { kind: env, required: true, default: "8080" }"#,
    },
    PropertyRule {
        kind: EntityKind::Dependency,
        keys: &["purpose", "version"],
        example: r#"dependency React { purpose: "UI library", version: 18.2.0 }"#,
    },
];

/// Property accepted on every longform block.
pub const COMMENT_PROPERTY: &str = "comment";

/// The longform keys accepted by `kind`, excluding `comment`.
pub fn longform_keys(kind: EntityKind) -> &'static [&'static str] {
    LONGFORM_PROPERTIES
        .iter()
        .find(|rule| rule.kind == kind)
        .map_or(&[], |rule| rule.keys)
}

/// The grammar table compiled to regexes.
#[derive(Debug)]
pub struct Grammar {
    declarations: Vec<(EntityKind, Regex)>,
    continuations: Vec<(Marker, Regex)>,
    statements: Vec<(Statement, Regex)>,
}

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(Grammar::compile);

/// The shared compiled grammar.
pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}

impl Grammar {
    fn compile() -> Self {
        Self {
            declarations: compile_rows(SHORTFORM_DECLARATIONS.iter().map(|r| (r.kind, r.pattern))),
            continuations: compile_rows(CONTINUATIONS.iter().map(|r| (r.marker, r.pattern))),
            statements: compile_rows(STATEMENTS.iter().map(|r| (r.statement, r.pattern))),
        }
    }

    /// Match a column-1 shortform declaration line.
    pub fn declaration<'t>(&self, line: &'t str) -> Option<(EntityKind, Captures<'t>)> {
        self.declarations
            .iter()
            .find_map(|(kind, regex)| regex.captures(line).map(|caps| (*kind, caps)))
    }

    /// Match a continuation line with its indentation already stripped.
    pub fn continuation<'t>(&self, trimmed: &'t str) -> Option<(Marker, Captures<'t>)> {
        self.continuations
            .iter()
            .find_map(|(marker, regex)| regex.captures(trimmed).map(|caps| (*marker, caps)))
    }

    /// Match a document-level statement.
    pub fn statement<'t>(&self, statement: Statement, line: &'t str) -> Option<Captures<'t>> {
        self.statements
            .iter()
            .filter(|(candidate, _)| *candidate == statement)
            .find_map(|(_, regex)| regex.captures(line))
    }

    /// Whether `line` opens a longform block of a known kind.
    pub fn is_longform_declaration(&self, line: &str) -> bool {
        self.statement(Statement::Block, line)
            .and_then(|caps| EntityKind::from_keyword(&caps["keyword"]))
            .is_some()
    }

    /// Whether `line` is a shortform declaration.
    pub fn is_shortform_declaration(&self, line: &str) -> bool {
        self.declaration(line).is_some()
    }
}

fn compile_rows<T: fmt::Debug>(rows: impl Iterator<Item = (T, &'static str)>) -> Vec<(T, Regex)> {
    rows.filter_map(|(tag, pattern)| match Regex::new(pattern) {
        Ok(regex) => Some((tag, regex)),
        Err(err) => {
            error!(rule:? = tag, err:%; "Invalid grammar pattern");
            None
        }
    })
    .collect()
}
