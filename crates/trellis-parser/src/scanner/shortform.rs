//! Shortform declarations and their indented continuation lines.

use log::trace;
use regex::Captures;
use trellis_core::{
    Entity, EntityData, EntityKind, Position, Span,
    entity::{DtoField, RunParameterKind},
};

use super::Line;
use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    grammar::{Marker, grammar},
    value::{normalize_version, parse_list, unquote},
};

/// A shortform entity still collecting continuation lines.
pub(super) struct Pending {
    entity: Entity,
    start: usize,
    end: usize,
}

impl Pending {
    pub(super) fn new(entity: Entity, line: &Line<'_>) -> Self {
        Self {
            entity,
            start: line.start,
            end: line.end(),
        }
    }

    /// Close the entity, attaching its span and raw text.
    pub(super) fn finish(self, source: &str) -> Entity {
        let span = Span::new(self.start..self.end);
        let raw = source.get(self.start..self.end).unwrap_or_default();
        self.entity.with_span(span).with_raw(raw)
    }
}

fn capture(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().to_string())
}

fn quoted(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name).map(|m| unquote(m.as_str()))
}

/// Split `Base, I1, I2` into base and interfaces; `_` stands for no base.
fn parents(text: Option<&str>) -> (Option<String>, Vec<String>) {
    let Some(text) = text else {
        return (None, Vec::new());
    };
    let mut parts = text.split(',').map(str::trim);
    let base = parts
        .next()
        .filter(|base| !base.is_empty() && *base != "_")
        .map(str::to_string);
    let interfaces = parts
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    (base, interfaces)
}

/// Build the entity declared by a matched shortform line.
pub(super) fn declaration(
    kind: EntityKind,
    caps: &Captures<'_>,
    line: &Line<'_>,
    diagnostics: &mut DiagnosticCollector,
) -> Entity {
    let mut data = EntityData::empty(kind);
    match &mut data {
        EntityData::Program(program) => {
            program.entry = capture(caps, "entry").unwrap_or_default();
            program.version = caps.name("version").map(|m| normalize_version(m.as_str()));
            program.purpose = quoted(caps, "purpose");
        }
        EntityData::File(file) => {
            file.path = capture(caps, "path").unwrap_or_default();
        }
        EntityData::Function(function) => {
            function.signature = capture(caps, "signature").unwrap_or_default();
        }
        EntityData::Class(class) => {
            (class.base, class.interfaces) = parents(caps.name("parents").map(|m| m.as_str()));
        }
        EntityData::ClassFile(class_file) => {
            class_file.path = capture(caps, "path").unwrap_or_default();
            (class_file.base, class_file.interfaces) =
                parents(caps.name("parents").map(|m| m.as_str()));
        }
        EntityData::Constants(constants) => {
            constants.path = capture(caps, "path").unwrap_or_default();
            constants.schema = capture(caps, "schema");
        }
        EntityData::Dto(dto) => {
            dto.purpose = quoted(caps, "purpose");
        }
        EntityData::Asset(asset) => {
            asset.description = quoted(caps, "description");
        }
        EntityData::UiComponent(component) => {
            component.root = caps.name("root").is_some();
            component.description = quoted(caps, "description");
        }
        EntityData::RunParameter(parameter) => {
            let token = caps.name("kind").map_or("", |m| m.as_str());
            match token.parse::<RunParameterKind>() {
                Ok(kind) => parameter.kind = kind,
                Err(err) => diagnostics.emit(
                    Diagnostic::error(err.to_string())
                        .with_code(ErrorCode::E004)
                        .with_position(line.first_position())
                        .with_label(line.span(), ErrorCode::E004.description()),
                ),
            }
            parameter.description = quoted(caps, "description");
            parameter.required = caps.name("required").is_some();
        }
        EntityData::Dependency(dependency) => {
            dependency.purpose = quoted(caps, "purpose");
            dependency.version = caps.name("version").map(|m| normalize_version(m.as_str()));
        }
    }

    let name = caps.name("name").map_or("", |m| m.as_str());
    Entity::new(name, line.first_position(), data)
}

fn list(
    text: &str,
    position: Position,
    span: Span,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<String> {
    parse_list(text).unwrap_or_else(|| {
        diagnostics.emit(
            Diagnostic::warning(format!("malformed list `{text}`"))
                .with_code(ErrorCode::E003)
                .with_position(position)
                .with_label(span, ErrorCode::E003.description())
                .with_help("write names as `A, B` or `[A, B]`"),
        );
        Vec::new()
    })
}

/// A function's single input or output DTO.
fn single(
    text: &str,
    position: Position,
    span: Span,
    diagnostics: &mut DiagnosticCollector,
) -> Option<String> {
    let mut names = list(text, position, span, diagnostics).into_iter();
    let first = names.next();
    if names.next().is_some() {
        diagnostics.emit(
            Diagnostic::warning("a function takes a single input and a single output DTO")
                .with_code(ErrorCode::E003)
                .with_position(position)
                .with_label(span, "only the first name is kept"),
        );
    }
    first
}

fn text_value(text: &str) -> String {
    if text.starts_with('"') {
        unquote(text)
    } else {
        text.to_string()
    }
}

/// Attach an indented continuation line to the pending entity.
pub(super) fn continuation(
    pending: &mut Pending,
    line: &Line<'_>,
    diagnostics: &mut DiagnosticCollector,
) {
    let trimmed = line.text.trim();
    let position = line.first_position();
    let span = line.span();

    let Some((marker, caps)) = grammar().continuation(trimmed) else {
        diagnostics.emit(
            Diagnostic::warning(format!("unrecognized continuation `{trimmed}`"))
                .with_code(ErrorCode::E001)
                .with_position(position)
                .with_label(span, ErrorCode::E001.description()),
        );
        return;
    };
    pending.end = line.end();
    let payload = caps.name("value").map_or("", |m| m.as_str());
    trace!(marker = marker.token(), line = line.number; "Continuation");

    let entity = &mut pending.entity;
    if marker == Marker::Comment {
        entity.push_comment(payload);
        return;
    }

    let unsupported = match (entity.data_mut(), marker) {
        (EntityData::File(file), Marker::Imports) => {
            file.imports.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::ClassFile(class_file), Marker::Imports) => {
            class_file.imports.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::Function(function), Marker::Imports) => {
            function.input = single(payload, position, span, diagnostics);
            None
        }
        (EntityData::File(file), Marker::Exports) => {
            file.exports.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::ClassFile(class_file), Marker::Exports) => {
            class_file.exports.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::Program(program), Marker::Exports) => {
            program.exports.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::Function(function), Marker::Exports) => {
            function.output = single(payload, position, span, diagnostics);
            None
        }
        (EntityData::Function(function), Marker::Dependencies) => {
            function.dependencies.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::Function(function), Marker::Calls) => {
            function.calls.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::Function(function), Marker::Consumes) => {
            function.consumes.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::Function(function), Marker::Affects) => {
            function.affects.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::Asset(asset), Marker::Program) => {
            asset.program = Some(text_value(payload));
            None
        }
        (EntityData::Class(class), Marker::Members) => {
            class.methods.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::ClassFile(class_file), Marker::Members) => {
            class_file.methods.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::UiComponent(component), Marker::Members) => {
            component.contains.extend(list(payload, position, span, diagnostics));
            None
        }
        (EntityData::RunParameter(parameter), Marker::Default) => {
            parameter.default = Some(text_value(payload));
            None
        }
        (EntityData::Dto(dto), Marker::Field) => {
            let mut field = DtoField::new(&caps["name"], &caps["type"]);
            field.description = caps.name("description").map(|m| unquote(m.as_str()));
            field.optional = caps.name("optional").is_some();
            dto.fields.push(field);
            None
        }
        (EntityData::Program(program), Marker::Text) => {
            program.purpose = Some(unquote(payload));
            None
        }
        (EntityData::Function(function), Marker::Text) => {
            function.description = Some(unquote(payload));
            None
        }
        (EntityData::Dto(dto), Marker::Text) => {
            dto.purpose = Some(unquote(payload));
            None
        }
        (EntityData::Asset(asset), Marker::Text) => {
            asset.description = Some(unquote(payload));
            None
        }
        (EntityData::UiComponent(component), Marker::Text) => {
            component.description = Some(unquote(payload));
            None
        }
        (EntityData::RunParameter(parameter), Marker::Text) => {
            parameter.description = Some(unquote(payload));
            None
        }
        (EntityData::Dependency(dependency), Marker::Text) => {
            dependency.purpose = Some(unquote(payload));
            None
        }
        (_, marker) => Some(property_name(marker)),
    };

    if let Some(property) = unsupported {
        trace!(property, name = entity.name(); "Unsupported property recorded");
        entity.push_unsupported(property, position);
    }
}

/// The property a marker stands for, as reported on kinds that lack it.
fn property_name(marker: Marker) -> &'static str {
    match marker {
        Marker::Imports => "imports",
        Marker::Exports => "exports",
        Marker::Dependencies => "dependencies",
        Marker::Calls => "calls",
        Marker::Consumes => "consumes",
        Marker::Program => "program",
        Marker::Members => "methods",
        Marker::Default => "default",
        Marker::Affects => "affects",
        Marker::Field => "fields",
        Marker::Text => "description",
        Marker::Comment => "comment",
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::{EntityData, entity::RunParameterKind};

    use crate::{error::ErrorCode, scanner::scan};

    #[test]
    fn test_program_declaration() {
        let doc = scan("Shop -> Main v1.2.0 \"Online shop\"\n  -> Api\n");
        let EntityData::Program(program) = doc.graph.get("Shop").unwrap().data().clone() else {
            panic!("expected a program");
        };

        assert_eq!(program.entry, "Main");
        assert_eq!(program.version.as_deref(), Some("1.2.0"));
        assert_eq!(program.purpose.as_deref(), Some("Online shop"));
        assert_eq!(program.exports, ["Api"]);
    }

    #[test]
    fn test_function_continuations() {
        let doc = scan(
            "checkout :: (cart: Cart) => Receipt\n  \"Pays for a cart\"\n  <- CartDto\n  -> ReceiptDto\n  => pay, Store.save\n  ~ Header\n  $< PORT\n  ~> [format, Badge]\n  # first\n  # second\n",
        );
        let entity = doc.graph.get("checkout").unwrap();
        let EntityData::Function(function) = entity.data() else {
            panic!("expected a function");
        };

        assert!(doc.diagnostics.is_empty(), "{:?}", doc.diagnostics);
        assert_eq!(function.signature, "(cart: Cart) => Receipt");
        assert_eq!(function.description.as_deref(), Some("Pays for a cart"));
        assert_eq!(function.input.as_deref(), Some("CartDto"));
        assert_eq!(function.output.as_deref(), Some("ReceiptDto"));
        assert_eq!(function.calls, ["pay", "Store.save"]);
        assert_eq!(function.affects, ["Header"]);
        assert_eq!(function.consumes, ["PORT"]);
        assert_eq!(function.dependencies, ["format", "Badge"]);
        assert_eq!(entity.comment(), Some("first\nsecond"));
        assert!(entity.raw().ends_with("# second"));
    }

    #[test]
    fn test_class_parents() {
        let doc = scan("CartStore <: Store, Observable\n  > load, save\nPlain <: _, Json\n");
        let EntityData::Class(cart) = doc.graph.get("CartStore").unwrap().data().clone() else {
            panic!("expected a class");
        };
        let EntityData::Class(plain) = doc.graph.get("Plain").unwrap().data().clone() else {
            panic!("expected a class");
        };

        assert_eq!(cart.base.as_deref(), Some("Store"));
        assert_eq!(cart.interfaces, ["Observable"]);
        assert_eq!(cart.methods, ["load", "save"]);
        assert_eq!(plain.base, None);
        assert_eq!(plain.interfaces, ["Json"]);
    }

    #[test]
    fn test_dto_fields() {
        let doc = scan(
            "CartDto % \"Cart payload\"\n  - id: string\n  - total: number \"Sum in cents\" (optional)\n",
        );
        let EntityData::Dto(dto) = doc.graph.get("CartDto").unwrap().data().clone() else {
            panic!("expected a DTO");
        };

        assert_eq!(dto.purpose.as_deref(), Some("Cart payload"));
        assert_eq!(dto.fields.len(), 2);
        assert_eq!(dto.fields[1].ty, "number");
        assert_eq!(dto.fields[1].description.as_deref(), Some("Sum in cents"));
        assert!(dto.fields[1].optional);
        assert!(!dto.fields[0].optional);
    }

    #[test]
    fn test_run_parameter() {
        let doc = scan("PORT $env \"Listen port\" (required)\n  < 8080\n");
        let EntityData::RunParameter(port) = doc.graph.get("PORT").unwrap().data().clone() else {
            panic!("expected a run parameter");
        };

        assert_eq!(port.kind, RunParameterKind::Env);
        assert!(port.required);
        assert_eq!(port.default.as_deref(), Some("8080"));
    }

    #[test]
    fn test_unknown_run_parameter_kind() {
        let doc = scan("TOKEN $secret \"Api token\"\n");

        assert!(doc.graph.contains("TOKEN"));
        assert_eq!(doc.diagnostics.len(), 1);
        assert_eq!(doc.diagnostics[0].code(), Some(ErrorCode::E004));
        assert!(doc.has_errors());
    }

    #[test]
    fn test_unsupported_continuation_is_recorded() {
        let doc = scan("Store <: _\n  <- React\nMain @ src/main.ts\n  > render\n");

        let store = doc.graph.get("Store").unwrap();
        assert_eq!(store.unsupported().len(), 1);
        assert_eq!(store.unsupported()[0].name, "imports");
        assert_eq!(store.unsupported()[0].position.line(), 2);
        assert_eq!(doc.graph.get("Main").unwrap().unsupported()[0].name, "methods");
    }

    #[test]
    fn test_ui_component_and_asset() {
        let doc = scan("App &! \"Root view\"\n  > Header\nLogo ~ \"Brand logo\"\n  >> Shop\n");
        let EntityData::UiComponent(app) = doc.graph.get("App").unwrap().data().clone() else {
            panic!("expected a component");
        };
        let EntityData::Asset(logo) = doc.graph.get("Logo").unwrap().data().clone() else {
            panic!("expected an asset");
        };

        assert!(app.root);
        assert_eq!(app.contains, ["Header"]);
        assert_eq!(logo.program.as_deref(), Some("Shop"));
    }

    #[test]
    fn test_constants_and_dependency() {
        let doc = scan("Settings ! config/app.json : SettingsDto\nReact ^ \"UI library\" v18.2.0\n");
        let settings = doc.graph.get("Settings").unwrap().data().clone();
        let react = doc.graph.get("React").unwrap().data().clone();

        let EntityData::Constants(settings) = settings else {
            panic!("expected constants");
        };
        let EntityData::Dependency(react) = react else {
            panic!("expected a dependency");
        };
        assert_eq!(settings.path, "config/app.json");
        assert_eq!(settings.schema.as_deref(), Some("SettingsDto"));
        assert_eq!(react.version.as_deref(), Some("18.2.0"));
    }
}
