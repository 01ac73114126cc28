//! Longform `keyword Name { key: value }` blocks.

use log::trace;
use trellis_core::{
    Entity, EntityData, EntityKind, Position, Span,
    entity::{DtoField, RunParameterKind},
};

use super::{Line, Scanner};
use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    grammar::COMMENT_PROPERTY,
    value::{Property, Value, normalize_version, parse_properties},
};

/// The matched head line of a block.
pub(super) struct BlockHead {
    pub(super) keyword: String,
    pub(super) name: String,
    /// Absolute offset of the keyword.
    pub(super) keyword_start: usize,
    /// Absolute offset of the opening brace.
    pub(super) open_brace: usize,
}

/// Find the brace closing the one at `open`, skipping over strings and
/// `#` comments.
fn closing_brace(source: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut in_comment = false;

    for (offset, ch) in source.get(open..)?.char_indices() {
        if in_comment {
            in_comment = ch != '\n';
            continue;
        }
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '#' => in_comment = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Scan the block opened by `head`, returning the index of the first line
/// after it.
pub(super) fn scan_block(scanner: &mut Scanner<'_>, lines: &[Line<'_>], head: BlockHead) -> usize {
    let source = scanner.source;
    let position = Position::from_offset(source, head.keyword_start);

    let Some(close) = closing_brace(source, head.open_brace) else {
        scanner.diagnostics.emit(
            Diagnostic::error(format!("block `{}` is never closed", head.name))
                .with_code(ErrorCode::E002)
                .with_position(position)
                .with_label(
                    Span::new(head.open_brace..head.open_brace + 1),
                    "opened here",
                )
                .with_help("add the closing `}`"),
        );
        return lines.len();
    };
    let next = lines.partition_point(|line| line.start <= close);

    if let Some(last) = next.checked_sub(1).map(|idx| lines[idx]) {
        let rest = source.get(close + 1..last.end()).unwrap_or_default().trim();
        if !rest.is_empty() && !rest.starts_with('#') {
            scanner.diagnostics.emit(
                Diagnostic::warning(format!("unexpected text `{rest}` after block"))
                    .with_code(ErrorCode::E001)
                    .with_position(Position::from_offset(source, close + 1))
                    .with_label(Span::new(close + 1..last.end()), ErrorCode::E001.description()),
            );
        }
    }

    let span = Span::new(head.keyword_start..close + 1);
    let Some(kind) = EntityKind::from_keyword(&head.keyword) else {
        scanner.diagnostics.emit(
            Diagnostic::warning(format!("unknown block keyword `{}`", head.keyword))
                .with_code(ErrorCode::E001)
                .with_position(position)
                .with_label(span, ErrorCode::E001.description())
                .with_help("expected one of: program, file, function, class, classfile, constants, dto, asset, component, parameter, dependency"),
        );
        return next;
    };

    let body_start = head.open_brace + 1;
    let body = source.get(body_start..close).unwrap_or_default();
    let mut block = Block {
        source,
        body_start,
        diagnostics: &mut scanner.diagnostics,
    };

    let (properties, errors) = parse_properties(body);
    for error in errors {
        let span = error.span.shifted(body_start);
        block.diagnostics.emit(
            Diagnostic::warning(error.message)
                .with_code(ErrorCode::E003)
                .with_position(Position::from_offset(source, span.start()))
                .with_label(span, ErrorCode::E003.description()),
        );
    }

    let mut entity = Entity::new(head.name, position, EntityData::empty(kind))
        .with_span(span)
        .with_raw(source.get(span.start()..span.end()).unwrap_or_default());
    for property in &properties {
        block.apply(&mut entity, property);
    }

    scanner.insert(entity);
    next
}

struct Block<'a, 's> {
    source: &'s str,
    body_start: usize,
    diagnostics: &'a mut DiagnosticCollector,
}

impl Block<'_, '_> {
    fn position(&self, property: &Property) -> Position {
        Position::from_offset(self.source, self.body_start + property.span.start())
    }

    fn malformed(&mut self, property: &Property, expected: &str) {
        let span = property.span.shifted(self.body_start);
        let position = self.position(property);
        self.diagnostics.emit(
            Diagnostic::warning(format!(
                "property `{}` expects {expected}, found a {}",
                property.key,
                property.value.shape()
            ))
            .with_code(ErrorCode::E003)
            .with_position(position)
            .with_label(span, ErrorCode::E003.description()),
        );
    }

    fn text(&mut self, property: &Property) -> Option<String> {
        let text = property.value.as_text().map(str::to_string);
        if text.is_none() {
            self.malformed(property, "a string");
        }
        text
    }

    fn list(&mut self, property: &Property) -> Vec<String> {
        property.value.to_list().unwrap_or_else(|| {
            self.malformed(property, "a list of names");
            Vec::new()
        })
    }

    fn flag(&mut self, property: &Property) -> bool {
        property.value.as_bool().unwrap_or_else(|| {
            self.malformed(property, "`true` or `false`");
            false
        })
    }

    fn fields(&mut self, property: &Property) -> Vec<DtoField> {
        let Some(entries) = property.value.as_map() else {
            self.malformed(property, "a map of fields");
            return Vec::new();
        };

        let mut fields = Vec::new();
        for entry in entries {
            match &entry.value {
                Value::String(ty) | Value::Word(ty) => fields.push(DtoField::new(&entry.key, ty)),
                Value::Map(attributes) => {
                    let mut field = DtoField::new(&entry.key, "");
                    for attribute in attributes {
                        match attribute.key.as_str() {
                            "type" => field.ty = self.text(attribute).unwrap_or_default(),
                            "description" => field.description = self.text(attribute),
                            "optional" => field.optional = self.flag(attribute),
                            _ => self.malformed(attribute, "one of `type`, `description`, `optional`"),
                        }
                    }
                    fields.push(field);
                }
                Value::List(_) => self.malformed(entry, "a type or a field map"),
            }
        }
        fields
    }

    fn apply(&mut self, entity: &mut Entity, property: &Property) {
        let key = property.key.as_str();
        if key == COMMENT_PROPERTY {
            if let Some(comment) = self.text(property) {
                comment.lines().for_each(|line| entity.push_comment(line));
            }
            return;
        }

        let supported = match (entity.data_mut(), key) {
            (EntityData::Program(program), "entry") => {
                program.entry = self.text(property).unwrap_or_default();
                true
            }
            (EntityData::Program(program), "version") => {
                program.version = self.text(property).map(|v| normalize_version(&v));
                true
            }
            (EntityData::Program(program), "purpose") => {
                program.purpose = self.text(property);
                true
            }
            (EntityData::Program(program), "exports") => {
                program.exports = self.list(property);
                true
            }
            (EntityData::File(file), "path") => {
                file.path = self.text(property).unwrap_or_default();
                true
            }
            (EntityData::File(file), "imports") => {
                file.imports = self.list(property);
                true
            }
            (EntityData::File(file), "exports") => {
                file.exports = self.list(property);
                true
            }
            (EntityData::Function(function), "signature") => {
                function.signature = self.text(property).unwrap_or_default();
                true
            }
            (EntityData::Function(function), "description") => {
                function.description = self.text(property);
                true
            }
            (EntityData::Function(function), "input") => {
                function.input = self.text(property);
                true
            }
            (EntityData::Function(function), "output") => {
                function.output = self.text(property);
                true
            }
            (EntityData::Function(function), "calls") => {
                function.calls = self.list(property);
                true
            }
            (EntityData::Function(function), "affects") => {
                function.affects = self.list(property);
                true
            }
            (EntityData::Function(function), "consumes") => {
                function.consumes = self.list(property);
                true
            }
            (EntityData::Function(function), "dependencies") => {
                function.dependencies = self.list(property);
                true
            }
            (EntityData::Class(class), "extends") => {
                class.base = self.text(property);
                true
            }
            (EntityData::Class(class), "implements") => {
                class.interfaces = self.list(property);
                true
            }
            (EntityData::Class(class), "methods") => {
                class.methods = self.list(property);
                true
            }
            (EntityData::ClassFile(class_file), "path") => {
                class_file.path = self.text(property).unwrap_or_default();
                true
            }
            (EntityData::ClassFile(class_file), "imports") => {
                class_file.imports = self.list(property);
                true
            }
            (EntityData::ClassFile(class_file), "exports") => {
                class_file.exports = self.list(property);
                true
            }
            (EntityData::ClassFile(class_file), "extends") => {
                class_file.base = self.text(property);
                true
            }
            (EntityData::ClassFile(class_file), "implements") => {
                class_file.interfaces = self.list(property);
                true
            }
            (EntityData::ClassFile(class_file), "methods") => {
                class_file.methods = self.list(property);
                true
            }
            (EntityData::Constants(constants), "path") => {
                constants.path = self.text(property).unwrap_or_default();
                true
            }
            (EntityData::Constants(constants), "schema") => {
                constants.schema = self.text(property);
                true
            }
            (EntityData::Dto(dto), "purpose") => {
                dto.purpose = self.text(property);
                true
            }
            (EntityData::Dto(dto), "fields") => {
                dto.fields = self.fields(property);
                true
            }
            (EntityData::Asset(asset), "description") => {
                asset.description = self.text(property);
                true
            }
            (EntityData::Asset(asset), "program") => {
                asset.program = self.text(property);
                true
            }
            (EntityData::UiComponent(component), "description") => {
                component.description = self.text(property);
                true
            }
            (EntityData::UiComponent(component), "root") => {
                component.root = self.flag(property);
                true
            }
            (EntityData::UiComponent(component), "contains") => {
                component.contains = self.list(property);
                true
            }
            (EntityData::RunParameter(parameter), "kind") => {
                if let Some(token) = self.text(property) {
                    match token.parse::<RunParameterKind>() {
                        Ok(kind) => parameter.kind = kind,
                        Err(err) => {
                            let position = self.position(property);
                            let span = property.span.shifted(self.body_start);
                            self.diagnostics.emit(
                                Diagnostic::error(err.to_string())
                                    .with_code(ErrorCode::E004)
                                    .with_position(position)
                                    .with_label(span, ErrorCode::E004.description()),
                            );
                        }
                    }
                }
                true
            }
            (EntityData::RunParameter(parameter), "description") => {
                parameter.description = self.text(property);
                true
            }
            (EntityData::RunParameter(parameter), "required") => {
                parameter.required = self.flag(property);
                true
            }
            (EntityData::RunParameter(parameter), "default") => {
                parameter.default = self.text(property);
                true
            }
            (EntityData::Dependency(dependency), "purpose") => {
                dependency.purpose = self.text(property);
                true
            }
            (EntityData::Dependency(dependency), "version") => {
                dependency.version = self.text(property).map(|v| normalize_version(&v));
                true
            }
            _ => false,
        };

        if !supported {
            trace!(property = key, name = entity.name(); "Unsupported property recorded");
            entity.push_unsupported(key, self.position(property));
        }
    }
}
