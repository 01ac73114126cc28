//! Longform rendering: one `keyword Name { ... }` block per entity, one
//! property per line.

use std::fmt::Write as _;

use trellis_core::{Entity, EntityData, entity::DtoField};
use trellis_parser::{Syntax, value::quote};

use super::{Renderer, check_name, is_identifier, item, items};
use crate::convert::ConvertError;

/// Renders longform blocks.
#[derive(Debug, Clone)]
pub struct LongformRenderer {
    indent: String,
}

impl LongformRenderer {
    /// Properties are indented by `indent` spaces, at least one.
    pub fn new(indent: usize) -> Self {
        Self {
            indent: " ".repeat(indent.max(1)),
        }
    }
}

impl Default for LongformRenderer {
    fn default() -> Self {
        Self::new(2)
    }
}

struct Block<'e> {
    indent: &'e str,
    out: String,
}

impl Block<'_> {
    fn property(&mut self, key: &str, value: &str) {
        let _ = writeln!(self.out, "{}{key}: {value}", self.indent);
    }

    /// Free text, always quoted.
    fn text(&mut self, key: &str, text: Option<&str>) {
        if let Some(text) = text {
            self.property(key, &quote(text));
        }
    }

    /// A name, path or token, bare when possible.
    fn word(&mut self, key: &str, word: Option<&str>) {
        if let Some(word) = word {
            self.property(key, &item(word));
        }
    }

    fn list(&mut self, key: &str, list: &[String]) {
        if !list.is_empty() {
            self.property(key, &format!("[{}]", items(list)));
        }
    }

    fn flag(&mut self, key: &str, flag: bool) {
        if flag {
            self.property(key, "true");
        }
    }

    fn fields(&mut self, name: &str, fields: &[DtoField]) -> Result<(), ConvertError> {
        if fields.is_empty() {
            return Ok(());
        }
        let _ = writeln!(self.out, "{}fields: {{", self.indent);
        for field in fields {
            if !is_identifier(&field.name) {
                return Err(ConvertError::Unrepresentable {
                    name: name.to_string(),
                    syntax: Syntax::Longform,
                    reason: format!("field name `{}` is not an identifier", field.name),
                });
            }
            let value = if field.description.is_none() && !field.optional {
                item(&field.ty)
            } else {
                let mut attributes = vec![format!("type: {}", item(&field.ty))];
                if let Some(description) = &field.description {
                    attributes.push(format!("description: {}", quote(description)));
                }
                if field.optional {
                    attributes.push("optional: true".to_string());
                }
                format!("{{ {} }}", attributes.join(", "))
            };
            let _ = writeln!(self.out, "{0}{0}{1}: {value}", self.indent, field.name);
        }
        let _ = writeln!(self.out, "{}}}", self.indent);
        Ok(())
    }
}

impl Renderer for LongformRenderer {
    fn syntax(&self) -> Syntax {
        Syntax::Longform
    }

    fn render_entity(&self, entity: &Entity, out: &mut String) -> Result<(), ConvertError> {
        check_name(entity, Syntax::Longform)?;
        let mut block = Block {
            indent: &self.indent,
            out: String::new(),
        };

        match entity.data() {
            EntityData::Program(program) => {
                block.word("entry", Some(&program.entry));
                block.word("version", program.version.as_deref());
                block.text("purpose", program.purpose.as_deref());
                block.list("exports", &program.exports);
            }
            EntityData::File(file) => {
                block.word("path", Some(&file.path));
                block.list("imports", &file.imports);
                block.list("exports", &file.exports);
            }
            EntityData::Function(function) => {
                block.text("signature", Some(&function.signature));
                block.text("description", function.description.as_deref());
                block.word("input", function.input.as_deref());
                block.word("output", function.output.as_deref());
                block.list("calls", &function.calls);
                block.list("affects", &function.affects);
                block.list("consumes", &function.consumes);
                block.list("dependencies", &function.dependencies);
            }
            EntityData::Class(class) => {
                block.word("extends", class.base.as_deref());
                block.list("implements", &class.interfaces);
                block.list("methods", &class.methods);
            }
            EntityData::ClassFile(class_file) => {
                block.word("path", Some(&class_file.path));
                block.word("extends", class_file.base.as_deref());
                block.list("implements", &class_file.interfaces);
                block.list("methods", &class_file.methods);
                block.list("imports", &class_file.imports);
                block.list("exports", &class_file.exports);
            }
            EntityData::Constants(constants) => {
                block.word("path", Some(&constants.path));
                block.word("schema", constants.schema.as_deref());
            }
            EntityData::Dto(dto) => {
                block.text("purpose", dto.purpose.as_deref());
                block.fields(entity.name(), &dto.fields)?;
            }
            EntityData::Asset(asset) => {
                block.text("description", asset.description.as_deref());
                block.word("program", asset.program.as_deref());
            }
            EntityData::UiComponent(component) => {
                block.text("description", component.description.as_deref());
                block.flag("root", component.root);
                block.list("contains", &component.contains);
            }
            EntityData::RunParameter(parameter) => {
                block.word("kind", Some(parameter.kind.as_str()));
                block.text("description", parameter.description.as_deref());
                block.flag("required", parameter.required);
                block.text("default", parameter.default.as_deref());
            }
            EntityData::Dependency(dependency) => {
                block.text("purpose", dependency.purpose.as_deref());
                block.word("version", dependency.version.as_deref());
            }
        }
        block.text("comment", entity.comment());

        let _ = writeln!(out, "{} {} {{", entity.kind().keyword(), entity.name());
        out.push_str(&block.out);
        out.push_str("}\n");
        Ok(())
    }
}
