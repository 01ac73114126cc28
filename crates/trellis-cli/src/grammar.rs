//! Plain-text rendering of the grammar table for `trellis grammar`.

use std::fmt::Write as _;

use trellis_parser::grammar::{
    COMMENT_PROPERTY, CONTINUATIONS, LONGFORM_PROPERTIES, SHORTFORM_DECLARATIONS, STATEMENTS,
    Statement,
};

const WIDTH: usize = 12;

/// Every rule of both syntaxes with its example and description.
pub fn table() -> String {
    let mut out = String::new();

    out.push_str("Statements\n");
    for rule in STATEMENTS {
        let name = match rule.statement {
            Statement::Import => "import",
            Statement::Block => "block",
        };
        row(&mut out, name, rule.example, rule.description);
    }

    out.push_str("\nShortform declarations\n");
    for rule in SHORTFORM_DECLARATIONS {
        row(&mut out, rule.kind.keyword(), rule.example, rule.description);
    }

    out.push_str("\nShortform continuations (indented)\n");
    for rule in CONTINUATIONS {
        row(&mut out, rule.marker.token(), rule.example.trim(), rule.description);
    }

    out.push_str("\nLongform properties\n");
    for rule in LONGFORM_PROPERTIES {
        let mut keys = rule.keys.to_vec();
        keys.push(COMMENT_PROPERTY);
        row(&mut out, rule.kind.keyword(), rule.example, &keys.join(", "));
    }
    out
}

fn row(out: &mut String, name: &str, example: &str, description: &str) {
    let _ = writeln!(out, "  {name:<WIDTH$} {example}");
    let _ = writeln!(out, "  {:<WIDTH$} {description}", "");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_rule() {
        let table = table();
        for rule in SHORTFORM_DECLARATIONS {
            assert!(table.contains(rule.example), "missing `{}`", rule.example);
        }
        for rule in CONTINUATIONS {
            assert!(table.contains(rule.example.trim()), "missing `{}`", rule.example);
        }
        for rule in LONGFORM_PROPERTIES {
            assert!(table.contains(rule.example), "missing `{}`", rule.example);
        }
        assert!(table.contains("import \"shared/ui.trellis\" as ui"));
    }
}
