//! Shortform rendering: one declaration line per entity followed by
//! indented continuation lines.

use std::fmt::Write as _;

use trellis_core::{Entity, EntityData, entity::DtoField};
use trellis_parser::{Syntax, grammar::Marker, value::quote};

use super::{Renderer, check_name, is_identifier, item, items};
use crate::convert::ConvertError;

/// Renders shortform declarations.
#[derive(Debug, Clone)]
pub struct ShortformRenderer {
    indent: String,
}

impl ShortformRenderer {
    /// Continuation lines are indented by `indent` spaces, at least one.
    pub fn new(indent: usize) -> Self {
        Self {
            indent: " ".repeat(indent.max(1)),
        }
    }
}

impl Default for ShortformRenderer {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Collects the lines of one entity.
struct Lines<'e> {
    entity: &'e Entity,
    indent: &'e str,
    out: String,
}

impl<'e> Lines<'e> {
    fn unrepresentable(&self, reason: impl Into<String>) -> ConvertError {
        ConvertError::Unrepresentable {
            name: self.entity.name().to_string(),
            syntax: Syntax::Shortform,
            reason: reason.into(),
        }
    }

    fn head(&mut self, text: String) {
        self.out.push_str(&text);
        self.out.push('\n');
    }

    fn line(&mut self, marker: Marker, payload: &str) {
        let _ = writeln!(self.out, "{}{} {payload}", self.indent, marker.token());
    }

    fn list(&mut self, marker: Marker, list: &[String]) {
        if !list.is_empty() {
            self.line(marker, &items(list));
        }
    }

    fn text(&mut self, text: Option<&str>) {
        if let Some(text) = text {
            let _ = writeln!(self.out, "{}{}", self.indent, quote(text));
        }
    }

    fn comment(&mut self) {
        let Some(comment) = self.entity.comment() else {
            return;
        };
        for line in comment.lines() {
            if line.is_empty() {
                let _ = writeln!(self.out, "{}#", self.indent);
            } else {
                let _ = writeln!(self.out, "{}# {line}", self.indent);
            }
        }
    }

    /// A path that fits the `\S+` slot of a declaration line.
    fn path<'p>(&self, path: &'p str, forbidden: &[char]) -> Result<&'p str, ConvertError> {
        if path.is_empty() {
            return Err(self.unrepresentable("an empty path has no shortform"));
        }
        let breaks_line = path.ends_with(':')
            || path
                .chars()
                .any(|c| c.is_whitespace() || forbidden.contains(&c));
        if breaks_line {
            return Err(
                self.unrepresentable(format!("path `{path}` cannot be written in shortform"))
            );
        }
        Ok(path)
    }

    /// A version token `v1.2.3`.
    fn version(&self, version: Option<&str>) -> Result<String, ConvertError> {
        let Some(version) = version else {
            return Ok(String::new());
        };
        let valid = version.starts_with(|c: char| c.is_ascii_digit())
            && version
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '+' | '-'));
        if valid {
            Ok(format!(" v{version}"))
        } else {
            Err(self.unrepresentable(format!(
                "version `{version}` cannot be written in shortform"
            )))
        }
    }

    /// `Base, I1, I2` with `_` standing for no base.
    fn parents(&self, base: Option<&str>, interfaces: &[String]) -> Result<String, ConvertError> {
        let names = base.into_iter().chain(interfaces.iter().map(String::as_str));
        for name in names {
            let breaks_list = name.is_empty()
                || name == "_"
                || name.contains(|c: char| c == ',' || c.is_whitespace());
            if breaks_list {
                return Err(self.unrepresentable(format!(
                    "parent `{name}` cannot be written in shortform"
                )));
            }
        }
        let mut parents = vec![base.unwrap_or("_")];
        parents.extend(interfaces.iter().map(String::as_str));
        Ok(parents.join(", "))
    }

    fn field(&mut self, field: &DtoField) -> Result<(), ConvertError> {
        let ty = field.ty.as_str();
        let ambiguous = ty.is_empty()
            || ty.trim() != ty
            || ty.contains(['"', '\n'])
            || ty.ends_with("(optional)");
        if !is_identifier(&field.name) || ambiguous {
            return Err(self.unrepresentable(format!(
                "field `{}: {ty}` cannot be written in shortform",
                field.name
            )));
        }

        let mut line = format!("{} {}: {ty}", Marker::Field.token(), field.name);
        if let Some(description) = &field.description {
            line.push(' ');
            line.push_str(&quote(description));
        }
        if field.optional {
            line.push_str(" (optional)");
        }
        let _ = writeln!(self.out, "{}{line}", self.indent);
        Ok(())
    }
}

/// A quoted trailer ` "text"`, or nothing.
fn trailer(text: Option<&str>) -> String {
    text.map(|text| format!(" {}", quote(text)))
        .unwrap_or_default()
}

/// A default value as the `<` payload: bare unless the scanner would change it.
fn default_value(value: &str) -> String {
    if value.is_empty() || value.trim() != value || value.starts_with('"') {
        quote(value)
    } else {
        value.to_string()
    }
}

impl Renderer for ShortformRenderer {
    fn syntax(&self) -> Syntax {
        Syntax::Shortform
    }

    fn render_entity(&self, entity: &Entity, out: &mut String) -> Result<(), ConvertError> {
        check_name(entity, Syntax::Shortform)?;
        let name = entity.name();
        let mut lines = Lines {
            entity,
            indent: &self.indent,
            out: String::new(),
        };

        match entity.data() {
            EntityData::Program(program) => {
                let entry = program.entry.as_str();
                let entry_ok = entry.split('.').all(is_identifier);
                if !entry_ok {
                    return Err(lines.unrepresentable(format!(
                        "entry `{entry}` cannot be written in shortform"
                    )));
                }
                let version = lines.version(program.version.as_deref())?;
                let purpose = trailer(program.purpose.as_deref());
                lines.head(format!("{name} -> {entry}{version}{purpose}"));
                lines.comment();
                lines.list(Marker::Exports, &program.exports);
            }
            EntityData::File(file) => {
                let path = lines.path(&file.path, &[])?;
                lines.head(format!("{name} @ {path}"));
                lines.comment();
                lines.list(Marker::Imports, &file.imports);
                lines.list(Marker::Exports, &file.exports);
            }
            EntityData::Function(function) => {
                let signature = function.signature.as_str();
                if signature.trim() != signature || signature.contains('\n') {
                    return Err(lines.unrepresentable(
                        "signatures with surrounding whitespace or line breaks have no shortform",
                    ));
                }
                if signature.is_empty() {
                    lines.head(format!("{name} ::"));
                } else {
                    lines.head(format!("{name} :: {signature}"));
                }
                lines.text(function.description.as_deref());
                lines.comment();
                if let Some(input) = &function.input {
                    lines.line(Marker::Imports, &item(input));
                }
                if let Some(output) = &function.output {
                    lines.line(Marker::Exports, &item(output));
                }
                lines.list(Marker::Calls, &function.calls);
                lines.list(Marker::Affects, &function.affects);
                lines.list(Marker::Consumes, &function.consumes);
                if !function.dependencies.is_empty() {
                    lines.line(
                        Marker::Dependencies,
                        &format!("[{}]", items(&function.dependencies)),
                    );
                }
            }
            EntityData::Class(class) => {
                let parents = lines.parents(class.base.as_deref(), &class.interfaces)?;
                lines.head(format!("{name} <: {parents}"));
                lines.comment();
                lines.list(Marker::Members, &class.methods);
            }
            EntityData::ClassFile(class_file) => {
                let path = lines.path(&class_file.path, &['<'])?;
                let mut head = format!("{name} #: {path}");
                if class_file.base.is_some() || !class_file.interfaces.is_empty() {
                    let parents =
                        lines.parents(class_file.base.as_deref(), &class_file.interfaces)?;
                    head.push_str(" <: ");
                    head.push_str(&parents);
                }
                lines.head(head);
                lines.comment();
                lines.list(Marker::Imports, &class_file.imports);
                lines.list(Marker::Exports, &class_file.exports);
                lines.list(Marker::Members, &class_file.methods);
            }
            EntityData::Constants(constants) => {
                let path = lines.path(&constants.path, &[':'])?;
                let mut head = format!("{name} ! {path}");
                if let Some(schema) = &constants.schema {
                    if !schema.split('.').all(is_identifier) {
                        return Err(lines.unrepresentable(format!(
                            "schema `{schema}` cannot be written in shortform"
                        )));
                    }
                    head.push_str(" : ");
                    head.push_str(schema);
                }
                lines.head(head);
                lines.comment();
            }
            EntityData::Dto(dto) => {
                lines.head(format!("{name} %{}", trailer(dto.purpose.as_deref())));
                lines.comment();
                for field in &dto.fields {
                    lines.field(field)?;
                }
            }
            EntityData::Asset(asset) => {
                lines.head(format!("{name} ~{}", trailer(asset.description.as_deref())));
                lines.comment();
                if let Some(program) = &asset.program {
                    lines.line(Marker::Program, &default_value(program));
                }
            }
            EntityData::UiComponent(component) => {
                let marker = if component.root { "&!" } else { "&" };
                let description = trailer(component.description.as_deref());
                lines.head(format!("{name} {marker}{description}"));
                lines.comment();
                lines.list(Marker::Members, &component.contains);
            }
            EntityData::RunParameter(parameter) => {
                let description = trailer(parameter.description.as_deref());
                let required = if parameter.required { " (required)" } else { "" };
                lines.head(format!(
                    "{name} ${}{description}{required}",
                    parameter.kind.as_str()
                ));
                lines.comment();
                if let Some(default) = &parameter.default {
                    lines.line(Marker::Default, &default_value(default));
                }
            }
            EntityData::Dependency(dependency) => {
                let purpose = trailer(dependency.purpose.as_deref());
                let version = lines.version(dependency.version.as_deref())?;
                lines.head(format!("{name} ^{purpose}{version}"));
                lines.comment();
            }
        }

        out.push_str(&lines.out);
        Ok(())
    }
}
