//! Schema validation.
//!
//! Every check here runs before lowering begins: a schema that fails
//! validation produces no output at all. Checks are total; every
//! violation is reported, not just the first.

use codespan_reporting::diagnostic::Diagnostic;
use fxhash::FxHashSet;
use std::fmt;

use crate::schema::{AuxAlias, Field, FieldType, Schema, Support};

/// Validation diagnostic messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// The schema declares no families at all.
    EmptySchema,
    /// A family declares no variants.
    EmptyFamily { family: String },
    /// Two variants in one family share a name.
    DuplicateVariant { family: String, variant: String },
    /// Two variants in different families lower to the same declaration
    /// name, which would collide in the tag enumeration.
    DuplicateDeclName {
        decl: String,
        family: String,
        other_family: String,
    },
    /// A field-type reference does not resolve to any declared name.
    UnresolvedReference {
        at: String,
        name: String,
        suggestion: Option<String>,
    },
}

impl Message {
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::error().with_message(self.to_string());
        match self {
            Message::UnresolvedReference {
                suggestion: Some(suggestion),
                ..
            } => diagnostic.with_notes(vec![format!("did you mean `{suggestion}`?")]),
            Message::DuplicateVariant { .. } => diagnostic.with_notes(vec![
                "variant order fixes tag values; renaming, not reordering, resolves this"
                    .to_owned(),
            ]),
            _ => diagnostic,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::EmptySchema => write!(f, "schema declares no node families"),
            Message::EmptyFamily { family } => {
                write!(f, "family `{family}` declares no variants")
            }
            Message::DuplicateVariant { family, variant } => {
                write!(f, "duplicate variant `{variant}` in family `{family}`")
            }
            Message::DuplicateDeclName {
                decl,
                family,
                other_family,
            } => write!(
                f,
                "declaration name `{decl}` is produced by both family `{family}` and family `{other_family}`"
            ),
            Message::UnresolvedReference { at, name, .. } => {
                write!(f, "unresolved type reference `{name}` in {at}")
            }
        }
    }
}

/// Validate a schema, reporting every violation through `report`.
pub fn validate(schema: &Schema, report: &mut dyn FnMut(Message)) {
    if schema.families.is_empty() {
        report(Message::EmptySchema);
        return;
    }

    let mut decl_names: Vec<(String, &'static str)> = Vec::new();
    for family in &schema.families {
        if family.variants.is_empty() {
            report(Message::EmptyFamily {
                family: family.name.to_owned(),
            });
        }

        let mut seen = FxHashSet::default();
        for variant in &family.variants {
            if !seen.insert(variant.name) {
                report(Message::DuplicateVariant {
                    family: family.name.to_owned(),
                    variant: variant.name.to_owned(),
                });
            }

            let decl = variant.decl_name(family);
            match decl_names.iter().find(|(name, _)| *name == decl) {
                Some((_, other_family)) if *other_family != family.name => {
                    report(Message::DuplicateDeclName {
                        decl,
                        family: family.name.to_owned(),
                        other_family: (*other_family).to_owned(),
                    });
                }
                _ => decl_names.push((decl, family.name)),
            }
        }
    }

    let mut checker = Checker::new(schema);
    for alias in &schema.aliases {
        checker.check_type(
            &[],
            &alias.target,
            &format!("schema alias `{}`", alias.name),
            report,
        );
    }
    for family in &schema.families {
        for base_field in &family.base_fields {
            checker.check_field(&[], base_field, &format!("base `{}`", family.base), report);
        }
        for variant in &family.variants {
            let decl = variant.decl_name(family);
            for support in &variant.support {
                if let Support::Union(union) = support {
                    for alias in &union.aliases {
                        checker.check_type(
                            &union.aliases,
                            &alias.target,
                            &format!("alias `{}` of `{}`", alias.name, union.name),
                            report,
                        );
                    }
                    for union_field in &union.fields {
                        checker.check_field(
                            &union.aliases,
                            union_field,
                            &format!("`{}`", union.name),
                            report,
                        );
                    }
                }
            }
            for alias in &variant.aliases {
                checker.check_type(
                    &variant.aliases,
                    &alias.target,
                    &format!("alias `{}` of `{}`", alias.name, decl),
                    report,
                );
            }
            for variant_field in &variant.fields {
                checker.check_field(&variant.aliases, variant_field, &format!("`{decl}`"), report);
            }
        }
    }
}

/// Validate and collect, for callers without a report sink.
pub fn check(schema: &Schema) -> Result<(), Vec<Message>> {
    let mut messages = Vec::new();
    validate(schema, &mut |message| messages.push(message));
    if messages.is_empty() {
        Ok(())
    } else {
        Err(messages)
    }
}

struct Checker<'schema> {
    schema: &'schema Schema,
    families: FxHashSet<&'static str>,
    decls: FxHashSet<String>,
    enums: FxHashSet<&'static str>,
    unions: FxHashSet<&'static str>,
    known: Vec<String>,
}

impl<'schema> Checker<'schema> {
    fn new(schema: &'schema Schema) -> Checker<'schema> {
        Checker {
            schema,
            families: schema.families.iter().map(|family| family.name).collect(),
            decls: schema.decl_names(),
            enums: schema
                .support_enums()
                .into_iter()
                .chain(schema.externs.iter().copied())
                .collect(),
            unions: schema.support_unions(),
            known: schema.known_names(),
        }
    }

    fn check_field(
        &mut self,
        locals: &[AuxAlias],
        field: &Field,
        at: &str,
        report: &mut dyn FnMut(Message),
    ) {
        let at = format!("field `{}` of {}", field.name, at);
        self.check_type(locals, &field.ty, &at, report);
    }

    fn check_type(
        &mut self,
        locals: &[AuxAlias],
        ty: &FieldType,
        at: &str,
        report: &mut dyn FnMut(Message),
    ) {
        match ty {
            FieldType::Bool
            | FieldType::Size
            | FieldType::StringView
            | FieldType::Token
            | FieldType::Value(_) => {}
            FieldType::Node(family) => {
                if !self.families.contains(family) {
                    self.unresolved(family, at, report);
                }
            }
            FieldType::Own(decl) | FieldType::Inline(decl) | FieldType::Raw(decl) => {
                if !self.decls.contains(*decl) {
                    self.unresolved(decl, at, report);
                }
            }
            FieldType::Enum(name) => {
                if !self.enums.contains(name) {
                    self.unresolved(name, at, report);
                }
            }
            FieldType::Union(name) => {
                if !self.unions.contains(name) {
                    self.unresolved(name, at, report);
                }
            }
            FieldType::Alias(name) => {
                if self.schema.resolve_alias(locals, name).is_none() {
                    self.unresolved(name, at, report);
                }
            }
            FieldType::Seq(element) => self.check_type(locals, element, at, report),
            FieldType::Pair(first, second) => {
                self.check_type(locals, first, at, report);
                self.check_type(locals, second, at, report);
            }
            FieldType::Map(key, value) => {
                self.check_type(locals, key, at, report);
                self.check_type(locals, value, at, report);
            }
            FieldType::Tuple(elements) | FieldType::Sum(elements) => {
                for element in elements {
                    self.check_type(locals, element, at, report);
                }
            }
        }
    }

    fn unresolved(&self, name: &str, at: &str, report: &mut dyn FnMut(Message)) {
        report(Message::UnresolvedReference {
            at: at.to_owned(),
            name: name.to_owned(),
            suggestion: self.suggest(name),
        });
    }

    /// The closest known name within a small edit distance, if any.
    fn suggest(&self, name: &str) -> Option<String> {
        self.known
            .iter()
            .map(|candidate| (levenshtein::levenshtein(name, candidate), candidate))
            .filter(|(distance, _)| *distance <= 2)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{field, NodeFamily, Variant};

    fn toy_schema(variants: Vec<Variant>) -> Schema {
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

    fn variant(name: &'static str, fields: Vec<Field>) -> Variant {
        Variant {
            name,
            support: Vec::new(),
            aliases: Vec::new(),
            contained: None,
            fields,
        }
    }

    #[test]
    fn duplicate_variant_is_fatal() {
        let schema = toy_schema(vec![
            variant("Literal", vec![field("value", FieldType::Token)]),
            variant("Literal", vec![field("value", FieldType::Token)]),
        ]);
        let messages = check(&schema).unwrap_err();
        assert!(messages.contains(&Message::DuplicateVariant {
            family: "Expr".to_owned(),
            variant: "Literal".to_owned(),
        }));
    }

    #[test]
    fn empty_family_is_fatal() {
        let schema = toy_schema(Vec::new());
        let messages = check(&schema).unwrap_err();
        assert!(messages.contains(&Message::EmptyFamily {
            family: "Expr".to_owned(),
        }));
    }

    #[test]
    fn unresolved_reference_suggests_nearest_name() {
        let schema = toy_schema(vec![
            variant("Literal", vec![field("value", FieldType::Token)]),
            variant("Unary", vec![field("right", FieldType::Node("Expt"))]),
        ]);
        let messages = check(&schema).unwrap_err();
        match &messages[0] {
            Message::UnresolvedReference {
                name, suggestion, ..
            } => {
                assert_eq!(name, "Expt");
                assert_eq!(suggestion.as_deref(), Some("Expr"));
            }
            message => panic!("unexpected message: {message}"),
        }
    }

    #[test]
    fn well_formed_schema_passes() {
        let schema = toy_schema(vec![
            variant("Literal", vec![field("value", FieldType::Token)]),
            variant(
                "Unary",
                vec![
                    field("oper", FieldType::Token),
                    field("right", FieldType::Node("Expr")),
                ],
            ),
        ]);
        assert!(check(&schema).is_ok());
    }
}
