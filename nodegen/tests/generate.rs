//! End-to-end tests over the generation pipeline: schema in, framed
//! declaration text out.

use codespan_reporting::term::termcolor::NoColor;

use nodegen::compile;
use nodegen::decl::emit;
use nodegen::nodes;
use nodegen::schema::{field, validate, Field, FieldType, NodeFamily, Schema, Variant};
use nodegen::{Driver, Status};

fn render(schema: &Schema, guard: &str) -> String {
    validate::check(schema).unwrap();
    let header = compile::compile_schema(schema, guard);
    let mut buffer = Vec::new();
    emit::emit_header(&mut buffer, &header).unwrap();
    String::from_utf8(buffer).unwrap()
}

fn variant(name: &'static str, fields: Vec<Field>) -> Variant {
    Variant {
        name,
        support: Vec::new(),
        aliases: Vec::new(),
        contained: None,
        fields,
    }
}

fn expr_family(variants: Vec<Variant>) -> Schema {
    Schema {
        tag_enum: "NodeType",
        dispatch: "Visitor",
        includes: Vec::new(),
        externs: Vec::new(),
        aliases: Vec::new(),
        families: vec![NodeFamily {
            name: "Expr",
            base: "Expr",
            label: "Expression",
            base_fields: Vec::new(),
            base_ctor: false,
            variants,
        }],
        helpers: Vec::new(),
    }
}

/// The two-variant scenario: a literal with a single value field and a
/// unary expression holding a token and a child handle.
fn example_schema() -> Schema {
    expr_family(vec![
        variant("Literal", vec![field("value", FieldType::Value("Value"))]),
        variant(
            "Unary",
            vec![
                field("oper", FieldType::Token),
                field("right", FieldType::Node("Expr")),
            ],
        ),
    ])
}

fn position(text: &str, needle: &str) -> usize {
    match text.find(needle) {
        Some(position) => position,
        None => panic!("`{needle}` not found in output"),
    }
}

#[test]
fn identical_runs_produce_identical_output() {
    let first = render(&nodes::definition(), "AST_HPP");
    let second = render(&nodes::definition(), "AST_HPP");

    if first != second {
        for change in diff::lines(&first, &second) {
            match change {
                diff::Result::Left(line) => println!("-{line}"),
                diff::Result::Right(line) => println!("+{line}"),
                diff::Result::Both(..) => {}
            }
        }
        panic!("two runs over the same schema diverged");
    }
}

#[test]
fn every_variant_appears_exactly_once_everywhere() {
    let schema = nodes::definition();
    let text = render(&schema, "AST_HPP");

    let mut total = 0;
    for family in &schema.families {
        for variant in &family.variants {
            total += 1;
            let decl = variant.decl_name(family);

            let tag_entries = text
                .lines()
                .filter(|line| *line == format!("    {decl},") || *line == format!("    {decl}"))
                .count();
            assert_eq!(tag_entries, 1, "tag entries for {decl}");

            let dispatch_methods = text.matches(&format!("visit({decl} &")).count();
            assert_eq!(dispatch_methods, 1, "dispatch methods for {decl}");

            let definitions = text
                .matches(&format!("struct {decl} final: public {} {{", family.base))
                .count();
            assert_eq!(definitions, 1, "definitions for {decl}");

            let forwards = text.matches(&format!("struct {decl};")).count();
            assert_eq!(forwards, 1, "forward declarations for {decl}");
        }
    }

    // One forwarding acceptance override per variant, no more.
    assert_eq!(text.matches("return visitor.visit(*this);").count(), total);
    let dispatch_contracts = text
        .lines()
        .filter(|line| line.contains("virtual") && line.contains("visit("))
        .count();
    assert_eq!(dispatch_contracts, total);
}

#[test]
fn tag_order_follows_schema_order() {
    let schema = nodes::definition();
    let text = render(&schema, "AST_HPP");

    let enum_start = position(&text, "enum class NodeType {");
    let enum_end = enum_start + position(&text[enum_start..], "};");
    let body = &text[enum_start..enum_end];

    let emitted: Vec<&str> = body
        .lines()
        .skip(1)
        .filter(|line| !line.is_empty())
        .map(|line| line.trim().trim_end_matches(','))
        .collect();
    let declared: Vec<String> = schema
        .families
        .iter()
        .flat_map(|family| {
            family
                .variants
                .iter()
                .map(|variant| variant.decl_name(family))
        })
        .collect();
    assert_eq!(emitted, declared);
}

#[test]
fn reordering_variants_reorders_tags_correspondingly() {
    let swapped = expr_family(vec![
        variant(
            "Unary",
            vec![
                field("oper", FieldType::Token),
                field("right", FieldType::Node("Expr")),
            ],
        ),
        variant("Literal", vec![field("value", FieldType::Value("Value"))]),
    ]);

    let text = render(&example_schema(), "G");
    let swapped_text = render(&swapped, "G");

    assert!(position(&text, "    LiteralExpr") < position(&text, "    UnaryExpr"));
    assert!(position(&swapped_text, "    UnaryExpr") < position(&swapped_text, "    LiteralExpr"));
}

#[test]
fn constructors_mirror_the_field_list() {
    let text = render(&example_schema(), "G");

    // One field: one parameter, marked explicit.
    assert!(text.contains(
        "    explicit LiteralExpr(Value value):\n        value{std::move(value)} {}\n"
    ));

    // Two fields: two parameters, initialisers in field order, the
    // owning handle move-initialised.
    assert!(text.contains(
        "    UnaryExpr(Token oper, ExprNode right):\n        oper{std::move(oper)}, right{std::move(right)} {}\n"
    ));
    assert!(!text.contains("explicit UnaryExpr"));
}

#[test]
fn copied_fields_are_not_moved() {
    let schema = expr_family(vec![variant(
        "Variable",
        vec![
            field("name", FieldType::Token),
            field("slot", FieldType::Size),
        ],
    )]);
    let text = render(&schema, "G");
    assert!(text.contains("name{std::move(name)}, slot{slot} {}"));
}

#[test]
fn forward_declarations_precede_every_definition() {
    let schema = nodes::definition();
    let text = render(&schema, "AST_HPP");

    for family in &schema.families {
        let base_forward = position(&text, &format!("struct {};", family.base));
        let handle_alias = position(&text, &format!("using {} = ", family.handle()));
        assert!(base_forward < handle_alias);

        for variant in &family.variants {
            let decl = variant.decl_name(family);
            let forward = position(&text, &format!("struct {decl};"));
            let definition = position(&text, &format!("struct {decl} final"));
            assert!(forward < definition, "{decl} defined before its forward");
        }
    }
}

#[test]
fn example_scenario_artifacts_appear_in_order() {
    let text = render(&example_schema(), "G");

    let checkpoints = [
        "struct Expr;",
        "using ExprNode = std::unique_ptr<Expr>;",
        "struct LiteralExpr;",
        "struct UnaryExpr;",
        "enum class NodeType {",
        "struct Visitor {",
        "struct Expr {",
        "struct LiteralExpr final: public Expr {",
        "struct UnaryExpr final: public Expr {",
    ];
    let mut last = 0;
    for checkpoint in checkpoints {
        let found = position(&text, checkpoint);
        assert!(
            found >= last,
            "`{checkpoint}` emitted out of order"
        );
        last = found;
    }
}

#[test]
fn duplicate_variant_aborts_with_no_output() {
    let schema = expr_family(vec![
        variant("Literal", vec![field("value", FieldType::Value("Value"))]),
        variant("Literal", vec![field("value", FieldType::Value("Value"))]),
    ]);

    let messages = validate::check(&schema).unwrap_err();
    assert!(messages
        .iter()
        .any(|message| matches!(message, validate::Message::DuplicateVariant { .. })));

    let path = std::env::temp_dir().join("nodegen-duplicate-variant.hpp");
    let _ = std::fs::remove_file(&path);

    let mut driver = Driver::new();
    driver.set_diagnostic_writer(NoColor::new(std::io::sink()));
    let status = driver.generate(&schema, "G", Some(&path));

    assert!(matches!(status, Status::Error));
    assert!(!path.exists(), "aborted run left output behind");
}

#[test]
fn built_in_schema_is_valid() {
    assert!(validate::check(&nodes::definition()).is_ok());
}
