use trellis::{config::ConvertConfig, convert::convert};
use trellis_core::{EntityGraph, EntityKind};
use trellis_parser::{Syntax, parse};

/// One entity of every kind, with most optional properties set.
const EVERY_KIND: &str = r#"
import "shared/ui.trellis" as ui

Shop -> Main v1.2.0 "Online shop"
  -> checkout

Main @ src/main.ts
  # entry point
  <- React, Store
  -> checkout, CartDto

Api #: src/api.ts <: Client, Closeable
  <- Settings
  -> Api
  > fetch

Store <: _, Observable
  > load, save

Client <: _

checkout :: (cart: CartDto) => Receipt
  "Takes payment"
  <- CartDto
  -> Receipt
  => Store.load, fetch
  ~ Header
  $< PORT, Settings
  ~> [Missing]

fetch :: (url: string) => Response
load :: () => void
save ::

CartDto % "Cart payload"
  - total: number "Sum in cents"
  - items: Item[]
  - coupon: string (optional)

Receipt %

Settings ! config/app.json : SettingsDto

App &! "Root view"
  > Header

Header & "Top bar"

PORT $env "Listen port" (required)
  < 8080

Logo ~ "Brand logo"
  >> Shop

React ^ "UI library" v18.2.0
"#;

fn assert_same_graph(expected: &EntityGraph, actual: &EntityGraph) {
    assert_eq!(expected.len(), actual.len());
    for entity in expected.iter() {
        let other = actual
            .get(entity.name())
            .unwrap_or_else(|| panic!("`{}` is missing after the round trip", entity.name()));
        assert!(
            entity.same_definition(other),
            "`{}` changed:\n  before: {:?}\n  after:  {:?}",
            entity.name(),
            entity.data(),
            other.data()
        );
    }
}

fn reparse(text: &str) -> trellis_parser::ParsedDocument {
    let document = parse(text);
    assert!(
        document.diagnostics.is_empty(),
        "rendered text does not parse cleanly: {:?}\n{text}",
        document.diagnostics
    );
    document
}

#[test]
fn test_fixture_covers_every_kind() {
    let document = reparse(EVERY_KIND);
    for kind in EntityKind::ALL {
        assert!(
            document.graph.of_kind(kind).next().is_some(),
            "no {kind} in the fixture"
        );
    }
}

#[test]
fn test_round_trip_through_longform() {
    let config = ConvertConfig::default();
    let original = reparse(EVERY_KIND);

    let longform = convert(&original, Syntax::Longform, &config).unwrap();
    let reparsed = reparse(&longform);
    assert_same_graph(&original.graph, &reparsed.graph);
    let imports: Vec<_> = reparsed
        .imports
        .iter()
        .map(|import| (import.path.as_str(), import.alias.as_deref()))
        .collect();
    assert_eq!(imports, [("shared/ui.trellis", Some("ui"))]);

    let shortform = convert(&reparsed, Syntax::Shortform, &config).unwrap();
    assert_same_graph(&original.graph, &reparse(&shortform).graph);
}

#[test]
fn test_round_trip_through_shortform() {
    let config = ConvertConfig::new(4);
    let original = reparse(EVERY_KIND);

    let shortform = convert(&original, Syntax::Shortform, &config).unwrap();
    let reparsed = reparse(&shortform);
    assert_same_graph(&original.graph, &reparsed.graph);

    let longform = convert(&reparsed, Syntax::Longform, &config).unwrap();
    assert_same_graph(&original.graph, &reparse(&longform).graph);
}

#[test]
fn test_rendering_is_a_fixpoint() {
    let config = ConvertConfig::default();
    for syntax in [Syntax::Shortform, Syntax::Longform] {
        let first = convert(&reparse(EVERY_KIND), syntax, &config).unwrap();
        let second = convert(&reparse(&first), syntax, &config).unwrap();
        assert_eq!(first, second, "{syntax} output changed on the second pass");
    }
}

#[test]
fn test_output_order_follows_kind_precedence() {
    let longform = convert(
        &reparse(EVERY_KIND),
        Syntax::Longform,
        &ConvertConfig::default(),
    )
    .unwrap();
    let keywords: Vec<&str> = longform
        .lines()
        .filter(|line| !line.starts_with(' ') && line.ends_with('{'))
        .filter_map(|line| line.split_whitespace().next())
        .collect();

    let mut sorted = keywords.clone();
    sorted.sort_by_key(|keyword| {
        EntityKind::from_keyword(keyword)
            .map(|kind| kind.precedence())
            .unwrap_or(usize::MAX)
    });
    assert_eq!(keywords, sorted);
    assert_eq!(keywords.first(), Some(&"program"));
    assert_eq!(keywords.last(), Some(&"dependency"));
}
