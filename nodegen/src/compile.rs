//! Lowering from the node-set schema to declaration records.
//!
//! A single deterministic pass: the schema is walked once, in order, and
//! every record is derived from it with no backtracking and no mutable
//! bookkeeping outside the output sequence itself. Constructor parameter
//! lists and member-initialiser lists are built in the same loop over the
//! field list, so they cannot drift apart.

use itertools::Itertools;

use crate::decl::{
    BaseDecl, Ctor, Decl, Dispatch, DispatchGroup, Header, HelperDecl, IncludeLine, Member,
    NodeDecl, PlainEnum, PlainStruct, TagEnum, UsingAlias,
};
use crate::schema::{
    AuxAlias, Field, FieldType, Include, NodeFamily, Passing, Schema, Support, UnionSupport,
    Variant,
};

/// Lower a validated schema to a complete output unit.
pub fn compile_schema(schema: &Schema, guard: &str) -> Header {
    let mut decls = Vec::new();

    // Forward declarations and ownership aliases come first so that
    // mutually referencing families resolve without ordering errors.
    decls.push(Decl::Forward(
        schema
            .families
            .iter()
            .map(|family| family.base.to_owned())
            .collect(),
    ));
    decls.push(Decl::Aliases(
        schema
            .families
            .iter()
            .map(|family| UsingAlias {
                name: family.handle(),
                target: format!("std::unique_ptr<{}>", family.base),
            })
            .collect(),
    ));
    if !schema.aliases.is_empty() {
        decls.push(Decl::Aliases(
            schema
                .aliases
                .iter()
                .map(|alias| UsingAlias {
                    name: alias.name.to_owned(),
                    target: render_type(&alias.target),
                })
                .collect(),
        ));
    }

    for family in &schema.families {
        decls.push(Decl::Banner(format!("{} nodes", family.label)));
        decls.push(Decl::Forward(
            family
                .variants
                .iter()
                .map(|variant| variant.decl_name(family))
                .collect(),
        ));
    }

    decls.push(Decl::TagEnum(TagEnum {
        name: schema.tag_enum.to_owned(),
        groups: schema
            .families
            .iter()
            .map(|family| {
                family
                    .variants
                    .iter()
                    .map(|variant| variant.decl_name(family))
                    .collect()
            })
            .collect(),
    }));

    decls.push(Decl::Dispatch(Dispatch {
        name: schema.dispatch.to_owned(),
        groups: schema
            .families
            .iter()
            .map(|family| DispatchGroup {
                result: family.visitor_type(),
                param: family.base.to_lowercase(),
                nodes: family
                    .variants
                    .iter()
                    .map(|variant| variant.decl_name(family))
                    .collect(),
            })
            .collect(),
    }));

    for family in &schema.families {
        decls.push(Decl::Base(compile_base(schema, family)));
    }

    for family in &schema.families {
        decls.push(Decl::Banner(format!("{} node definitions", family.label)));
        for variant in &family.variants {
            for support in &variant.support {
                decls.push(compile_support(support));
            }
            decls.push(Decl::Node(compile_variant(schema, family, variant)));
        }
        decls.push(Decl::Banner(format!(
            "End of {} node definitions",
            family.label.to_lowercase()
        )));
    }

    for group in &schema.helpers {
        decls.push(Decl::Helpers(
            group
                .iter()
                .map(|helper| HelperDecl {
                    doc: helper.doc.map(str::to_owned),
                    ret: helper.ret.to_owned(),
                    name: helper.name.to_owned(),
                    params: helper.params.to_owned(),
                })
                .collect(),
        ));
    }

    Header {
        guard: guard.to_owned(),
        includes: schema
            .includes
            .iter()
            .map(|include| match include {
                Include::Local(path) => IncludeLine {
                    system: false,
                    path: (*path).to_owned(),
                },
                Include::System(path) => IncludeLine {
                    system: true,
                    path: (*path).to_owned(),
                },
            })
            .collect(),
        decls,
    }
}

fn compile_base(schema: &Schema, family: &NodeFamily) -> BaseDecl {
    let members = members_of(&family.base_fields);
    let ctor = family.base_ctor.then(|| Ctor {
        explicit: false,
        params: members_of(&family.base_fields),
        inits: family
            .base_fields
            .iter()
            .map(|base_field| init_expr(schema, &[], base_field))
            .collect(),
    });
    BaseDecl {
        name: family.base.to_owned(),
        members,
        ctor,
        result: family.visitor_type(),
        tag_enum: schema.tag_enum.to_owned(),
        interface: schema.dispatch.to_owned(),
    }
}

fn compile_variant(schema: &Schema, family: &NodeFamily, variant: &Variant) -> NodeDecl {
    let mut params = Vec::new();
    let mut inits = Vec::new();

    // A base with a non-trivial constructor receives the shared fields
    // positionally, ahead of the variant's own fields.
    if family.base_ctor {
        params.extend(members_of(&family.base_fields));
        inits.push(format!(
            "{}{{{}}}",
            family.base,
            family.base_fields.iter().map(|f| f.name).join(", ")
        ));
    }
    for variant_field in &variant.fields {
        params.push(member_of(variant_field));
        inits.push(init_expr(schema, &variant.aliases, variant_field));
    }

    NodeDecl {
        name: variant.decl_name(family),
        base: family.base.to_owned(),
        aliases: aliases_of(&variant.aliases),
        contained: variant.contained.as_ref().map(|contained| PlainEnum {
            name: "Contained".to_owned(),
            members: contained.members.iter().map(|m| (*m).to_owned()).collect(),
            explicit_values: true,
        }),
        members: members_of(&variant.fields),
        ctor: Ctor {
            // A single-parameter constructor must not become an implicit
            // conversion from its argument type.
            explicit: params.len() == 1,
            params,
            inits,
        },
        result: family.visitor_type(),
        tag_enum: schema.tag_enum.to_owned(),
        interface: schema.dispatch.to_owned(),
    }
}

fn compile_support(support: &Support) -> Decl {
    match support {
        Support::Enum { name, members } => Decl::PlainEnum(PlainEnum {
            name: (*name).to_owned(),
            members: members.iter().map(|m| (*m).to_owned()).collect(),
            explicit_values: false,
        }),
        Support::Union(union) => Decl::PlainStruct(compile_union(union)),
    }
}

fn compile_union(union: &UnionSupport) -> PlainStruct {
    PlainStruct {
        name: union.name.to_owned(),
        aliases: aliases_of(&union.aliases),
        contained: Some(PlainEnum {
            name: "Contained".to_owned(),
            members: union
                .contained
                .members
                .iter()
                .map(|m| (*m).to_owned())
                .collect(),
            explicit_values: true,
        }),
        members: members_of(&union.fields),
    }
}

fn aliases_of(aliases: &[AuxAlias]) -> Vec<UsingAlias> {
    aliases
        .iter()
        .map(|alias| UsingAlias {
            name: alias.name.to_owned(),
            target: render_type(&alias.target),
        })
        .collect()
}

fn members_of(fields: &[Field]) -> Vec<Member> {
    fields.iter().map(member_of).collect()
}

fn member_of(field: &Field) -> Member {
    Member::new(render_type(&field.ty), field.name)
}

/// The member initialiser for one constructor parameter: identity move
/// for owning handles and compound values, plain copy otherwise.
fn init_expr(schema: &Schema, locals: &[AuxAlias], field: &Field) -> String {
    match schema.passing(locals, &field.ty) {
        Passing::Move => format!("{0}{{std::move({0})}}", field.name),
        Passing::Copy => format!("{0}{{{0}}}", field.name),
    }
}

/// Render a field-type descriptor as declaration text.
fn render_type(ty: &FieldType) -> String {
    match ty {
        FieldType::Bool => "bool".to_owned(),
        FieldType::Size => "std::size_t".to_owned(),
        FieldType::StringView => "std::string_view".to_owned(),
        FieldType::Token => "Token".to_owned(),
        FieldType::Value(text) => (*text).to_owned(),
        FieldType::Node(family) => format!("{family}Node"),
        FieldType::Own(decl) => format!("std::unique_ptr<{decl}>"),
        FieldType::Inline(decl) => (*decl).to_owned(),
        FieldType::Seq(element) => format!("std::vector<{}>", render_type(element)),
        FieldType::Pair(first, second) => {
            format!("std::pair<{}, {}>", render_type(first), render_type(second))
        }
        FieldType::Tuple(elements) => format!(
            "std::tuple<{}>",
            elements.iter().map(render_type).join(", ")
        ),
        FieldType::Sum(alternatives) => format!(
            "std::variant<{}>",
            alternatives.iter().map(render_type).join(", ")
        ),
        FieldType::Map(key, value) => format!(
            "std::unordered_map<{}, {}>",
            render_type(key),
            render_type(value)
        ),
        FieldType::Alias(name) => (*name).to_owned(),
        FieldType::Enum(name) => (*name).to_owned(),
        FieldType::Union(name) => (*name).to_owned(),
        FieldType::Raw(decl) => format!("{decl} *"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_rendering() {
        assert_eq!(render_type(&FieldType::Node("Expr")), "ExprNode");
        assert_eq!(
            render_type(&FieldType::Own("ListType")),
            "std::unique_ptr<ListType>"
        );
        assert_eq!(
            render_type(&FieldType::seq(FieldType::Raw("ReturnStmt"))),
            "std::vector<ReturnStmt *>"
        );
        assert_eq!(
            render_type(&FieldType::Tuple(vec![
                FieldType::Node("Expr"),
                FieldType::Enum("NumericConversionType"),
                FieldType::Alias("RequiresCopy"),
            ])),
            "std::tuple<ExprNode, NumericConversionType, RequiresCopy>"
        );
        assert_eq!(
            render_type(&FieldType::map(FieldType::StringView, FieldType::Size)),
            "std::unordered_map<std::string_view, std::size_t>"
        );
    }

    #[test]
    fn pointer_members_stay_tight() {
        let member = member_of(&crate::schema::field("class_", FieldType::Raw("ClassStmt")));
        assert_eq!(member.declarator(), "ClassStmt *class_");
    }
}
