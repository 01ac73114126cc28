use std::collections::BTreeSet;

use proptest::prelude::*;

use trellis::{ValidationReport, config::ValidationConfig, validate::validate};
use trellis_parser::{error::ErrorCode, parse};

fn check(source: &str) -> ValidationReport {
    let document = parse(source);
    assert!(
        document.diagnostics.is_empty(),
        "unexpected scan diagnostics: {:?}",
        document.diagnostics
    );
    validate(&document.graph, &ValidationConfig::default())
}

fn messages(report: &ValidationReport, code: ErrorCode) -> Vec<&str> {
    report.with_code(code).map(|d| d.message()).collect()
}

/// The first backtick-quoted name in a message.
fn quoted_name(message: &str) -> Option<&str> {
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(&message[start..start + len])
}

// ===================
// Scenarios
// ===================

#[test]
fn test_valid_model_has_no_findings() {
    let report = check(
        "Shop -> Main\n\nMain @ src/main.ts\n  -> checkout, CartDto\n\ncheckout :: (cart: CartDto) => void\n  <- CartDto\n\nCartDto % \"Cart\"\n  - total: number\n",
    );
    assert!(report.is_empty(), "{report}");
}

#[test]
fn test_mutual_imports_are_one_cycle() {
    let report = check("Shop -> A\n\nA @ src/a.ts\n  <- B\n\nB @ src/b.ts\n  <- A\n");

    assert_eq!(messages(&report, ErrorCode::E202), ["circular import: A -> B -> A"]);
}

#[test]
fn test_function_field_in_valid_model_is_one_finding() {
    let report = check(
        "Shop -> Main\n\nMain @ src/main.ts\n  -> checkout, CartDto\n\ncheckout :: (cart: CartDto) => void\n  <- CartDto\n\nCartDto % \"Cart\"\n  - total: number\n  - onChange: (value: number) => void\n",
    );

    assert_eq!(report.len(), 1, "{report}");
    assert_eq!(report.diagnostics()[0].code(), Some(ErrorCode::E211));
    assert!(!report.is_valid());
}

#[test]
fn test_second_program_is_one_finding() {
    let report = check("Shop -> Main\nAdmin -> Main\nMain @ src/main.ts\n");

    let multiple = messages(&report, ErrorCode::E204);
    assert_eq!(multiple, ["program `Admin` is declared after program `Shop`"]);
    assert_eq!(report.len(), 1, "{report}");
}

#[test]
fn test_missing_program() {
    let report = check("Main @ src/main.ts\n");
    assert_eq!(messages(&report, ErrorCode::E203), ["no program is declared"]);
}

#[test]
fn test_findings_are_ordered_by_position() {
    let report = check("Shop -> Main\nMain @ src/main.ts\nzeta :: () => void\nalpha :: () => void\n");

    let lines: Vec<u32> = report
        .diagnostics()
        .iter()
        .map(|d| d.position().line())
        .collect();
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert!(report.with_code(ErrorCode::E200).count() >= 2);
}

#[test]
fn test_suggestions_can_be_disabled() {
    let graph = parse("Shop -> Maim\nMain @ src/main.ts\n").graph;

    let with = validate(&graph, &ValidationConfig::default());
    let entry = with.with_code(ErrorCode::E205).next().unwrap();
    assert!(entry.help().is_some_and(|help| help.contains("Main")));

    let without = validate(&graph, &ValidationConfig::new(false, 0.6));
    let entry = without.with_code(ErrorCode::E205).next().unwrap();
    assert!(entry.help().is_none_or(|help| !help.contains("did you mean")));
}

// ===================
// Properties
// ===================

fn import_ring(n: usize, closed: bool) -> String {
    let mut source = String::from("Shop -> F0\n");
    for i in 0..n {
        source.push_str(&format!("F{i} @ src/f{i}.ts\n"));
        if i + 1 < n {
            source.push_str(&format!("  <- F{}\n", i + 1));
        } else if closed {
            source.push_str("  <- F0\n");
        }
    }
    source
}

fn call_ring(n: usize, closed: bool) -> String {
    let names: Vec<String> = (0..n).map(|i| format!("f{i}")).collect();
    let mut source = format!("Shop -> Main\nMain @ src/main.ts\n  -> {}\n", names.join(", "));
    for i in 0..n {
        source.push_str(&format!("f{i} :: () => void\n"));
        if i + 1 < n {
            source.push_str(&format!("  => f{}\n", i + 1));
        } else if closed {
            source.push_str("  => f0\n");
        }
    }
    source
}

/// A ring `first -> ... -> first` over `n` names.
fn ring_path(prefix: &str, n: usize) -> String {
    let mut names: Vec<String> = (0..n).map(|i| format!("{prefix}{i}")).collect();
    names.push(format!("{prefix}0"));
    names.join(" -> ")
}

proptest! {
    #[test]
    fn import_ring_is_one_cycle(n in 1usize..=8) {
        let report = check(&import_ring(n, true));
        let expected = format!("circular import: {}", ring_path("F", n));
        prop_assert_eq!(messages(&report, ErrorCode::E202), vec![expected.as_str()]);
    }

    #[test]
    fn import_chain_has_no_cycle(n in 1usize..=8) {
        let report = check(&import_ring(n, false));
        prop_assert_eq!(report.with_code(ErrorCode::E202).count(), 0);
    }

    #[test]
    fn call_ring_is_one_cycle(n in 1usize..=8) {
        let report = check(&call_ring(n, true));
        let expected = format!("circular call: {}", ring_path("f", n));
        prop_assert_eq!(messages(&report, ErrorCode::E202), vec![expected.as_str()]);
    }

    #[test]
    fn call_chain_has_no_cycle(n in 1usize..=8) {
        let report = check(&call_ring(n, false));
        prop_assert_eq!(report.with_code(ErrorCode::E202).count(), 0);
    }

    /// Every function not exported and not called by another function is
    /// reported as an orphan, and nothing else is.
    #[test]
    fn orphans_are_exactly_the_unreferenced(
        exported in prop::collection::vec(any::<bool>(), 1..8),
        calls in prop::collection::vec((0usize..8, 0usize..8), 0..10),
    ) {
        let n = exported.len();
        let calls: Vec<(usize, usize)> = calls.into_iter().map(|(a, b)| (a % n, b % n)).collect();

        let exports: Vec<String> = (0..n)
            .filter(|&i| exported[i])
            .map(|i| format!("f{i}"))
            .collect();
        let mut source = String::from("Shop -> Main\nMain @ src/main.ts\n");
        if !exports.is_empty() {
            source.push_str(&format!("  -> {}\n", exports.join(", ")));
        }
        for i in 0..n {
            source.push_str(&format!("f{i} :: () => void\n"));
            let callees: Vec<String> = calls
                .iter()
                .filter(|(from, _)| *from == i)
                .map(|(_, to)| format!("f{to}"))
                .collect();
            if !callees.is_empty() {
                source.push_str(&format!("  => {}\n", callees.join(", ")));
            }
        }

        let expected: BTreeSet<String> = (0..n)
            .filter(|&i| !exported[i] && !calls.iter().any(|&(from, to)| to == i && from != i))
            .map(|i| format!("f{i}"))
            .collect();

        let report = check(&source);
        let actual: BTreeSet<String> = report
            .with_code(ErrorCode::E200)
            .filter_map(|d| quoted_name(d.message()))
            .map(str::to_string)
            .collect();
        prop_assert_eq!(actual, expected);
    }
}
