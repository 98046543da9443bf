//! Emission of declaration records as framed header text.
//!
//! The writer is a pure sink: it renders records in exactly the order it
//! is handed them, wraps the whole unit in a one-time inclusion guard,
//! and applies a single indentation unit. The only failure mode is the
//! underlying write medium, surfaced as `io::Error`.

use std::io::{self, Write};

use crate::decl::{
    BaseDecl, Ctor, Decl, Dispatch, Header, HelperDecl, Member, NodeDecl, PlainEnum, PlainStruct,
    TagEnum,
};

const INDENT: &str = "    ";

/// Render a complete output unit.
pub fn emit_header(writer: &mut impl Write, header: &Header) -> io::Result<()> {
    writeln!(writer, "#pragma once")?;
    writeln!(writer)?;
    writeln!(writer, "#ifndef {}", header.guard)?;
    writeln!(writer, "#define {}", header.guard)?;
    writeln!(writer)?;

    let locals = header.includes.iter().filter(|include| !include.system);
    let systems = header.includes.iter().filter(|include| include.system);
    let mut wrote_local = false;
    for include in locals {
        writeln!(writer, "#include \"{}\"", include.path)?;
        wrote_local = true;
    }
    if wrote_local {
        writeln!(writer)?;
    }
    let mut wrote_system = false;
    for include in systems {
        writeln!(writer, "#include <{}>", include.path)?;
        wrote_system = true;
    }
    if wrote_system {
        writeln!(writer)?;
    }

    for decl in &header.decls {
        emit_decl(writer, decl)?;
        writeln!(writer)?;
    }

    writeln!(writer, "#endif")?;
    Ok(())
}

fn emit_decl(writer: &mut impl Write, decl: &Decl) -> io::Result<()> {
    match decl {
        Decl::Banner(text) => writeln!(writer, "// {text}"),
        Decl::Forward(names) => {
            for name in names {
                writeln!(writer, "struct {name};")?;
            }
            Ok(())
        }
        Decl::Aliases(aliases) => {
            for alias in aliases {
                writeln!(writer, "using {} = {};", alias.name, alias.target)?;
            }
            Ok(())
        }
        Decl::TagEnum(tag_enum) => emit_tag_enum(writer, tag_enum),
        Decl::Dispatch(dispatch) => emit_dispatch(writer, dispatch),
        Decl::Base(base) => emit_base(writer, base),
        Decl::PlainEnum(plain_enum) => emit_plain_enum(writer, plain_enum),
        Decl::PlainStruct(plain_struct) => emit_plain_struct(writer, plain_struct),
        Decl::Node(node) => emit_node(writer, node),
        Decl::Helpers(helpers) => emit_helpers(writer, helpers),
    }
}

fn emit_tag_enum(writer: &mut impl Write, tag_enum: &TagEnum) -> io::Result<()> {
    writeln!(writer, "enum class {} {{", tag_enum.name)?;
    let total: usize = tag_enum.groups.iter().map(Vec::len).sum();
    let mut index = 0;
    for (group_index, group) in tag_enum.groups.iter().enumerate() {
        if group_index > 0 {
            writeln!(writer)?;
        }
        for name in group {
            index += 1;
            let separator = if index < total { "," } else { "" };
            writeln!(writer, "{INDENT}{name}{separator}")?;
        }
    }
    writeln!(writer, "}};")
}

fn emit_dispatch(writer: &mut impl Write, dispatch: &Dispatch) -> io::Result<()> {
    writeln!(writer, "struct {} {{", dispatch.name)?;
    for (group_index, group) in dispatch.groups.iter().enumerate() {
        if group_index > 0 {
            writeln!(writer)?;
        }
        for node in &group.nodes {
            writeln!(
                writer,
                "{INDENT}virtual {} visit({} &{}) = 0;",
                group.result, node, group.param
            )?;
        }
    }
    writeln!(writer, "}};")
}

fn emit_base(writer: &mut impl Write, base: &BaseDecl) -> io::Result<()> {
    writeln!(writer, "struct {} {{", base.name)?;
    for member in &base.members {
        writeln!(writer, "{INDENT}{}{{}};", member.declarator())?;
    }
    if !base.members.is_empty() {
        writeln!(writer)?;
    }
    writeln!(writer, "{INDENT}{}() = default;", base.name)?;
    if let Some(ctor) = &base.ctor {
        writeln!(
            writer,
            "{INDENT}{}({}): {} {{}}",
            base.name,
            params_of(ctor),
            ctor.inits.join(", ")
        )?;
    }
    writeln!(writer, "{INDENT}virtual std::string_view string_tag() = 0;")?;
    writeln!(writer, "{INDENT}virtual {} type_tag() = 0;", base.tag_enum)?;
    writeln!(
        writer,
        "{INDENT}virtual {} accept({} &visitor) = 0;",
        base.result, base.interface
    )?;
    writeln!(writer, "{INDENT}virtual ~{}() = default;", base.name)?;
    writeln!(writer, "}};")
}

fn emit_plain_enum(writer: &mut impl Write, plain_enum: &PlainEnum) -> io::Result<()> {
    writeln!(writer, "enum class {} {{", plain_enum.name)?;
    for (index, member) in plain_enum.members.iter().enumerate() {
        let separator = if index + 1 < plain_enum.members.len() {
            ","
        } else {
            ""
        };
        writeln!(writer, "{INDENT}{member}{separator}")?;
    }
    writeln!(writer, "}};")
}

/// Nested discriminant enums are emitted on one line, with explicit
/// values pinning them to the alternatives of their `std::variant`.
fn contained_line(contained: &PlainEnum) -> String {
    let members = contained
        .members
        .iter()
        .enumerate()
        .map(|(value, member)| format!("{member} = {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("enum {} {{ {} }};", contained.name, members)
}

fn emit_plain_struct(writer: &mut impl Write, plain_struct: &PlainStruct) -> io::Result<()> {
    writeln!(writer, "struct {} {{", plain_struct.name)?;
    for alias in &plain_struct.aliases {
        writeln!(writer, "{INDENT}using {} = {};", alias.name, alias.target)?;
    }
    if let Some(contained) = &plain_struct.contained {
        writeln!(writer, "{INDENT}{}", contained_line(contained))?;
    }
    writeln!(writer)?;
    for member in &plain_struct.members {
        writeln!(writer, "{INDENT}{}{{}};", member.declarator())?;
    }
    writeln!(writer, "}};")
}

fn emit_node(writer: &mut impl Write, node: &NodeDecl) -> io::Result<()> {
    writeln!(writer, "struct {} final: public {} {{", node.name, node.base)?;

    let mut wrote_prelude = false;
    for alias in &node.aliases {
        writeln!(writer, "{INDENT}using {} = {};", alias.name, alias.target)?;
        wrote_prelude = true;
    }
    if let Some(contained) = &node.contained {
        writeln!(writer, "{INDENT}{}", contained_line(contained))?;
        wrote_prelude = true;
    }
    if wrote_prelude {
        writeln!(writer)?;
    }

    for member in &node.members {
        writeln!(writer, "{INDENT}{}{{}};", member.declarator())?;
    }
    if !node.members.is_empty() {
        writeln!(writer)?;
    }

    writeln!(
        writer,
        "{INDENT}std::string_view string_tag() override final {{"
    )?;
    writeln!(writer, "{INDENT}{INDENT}return \"{}\";", node.name)?;
    writeln!(writer, "{INDENT}}}")?;
    writeln!(writer)?;

    writeln!(writer, "{INDENT}{} type_tag() override final {{", node.tag_enum)?;
    writeln!(
        writer,
        "{INDENT}{INDENT}return {}::{};",
        node.tag_enum, node.name
    )?;
    writeln!(writer, "{INDENT}}}")?;
    writeln!(writer)?;

    writeln!(writer, "{INDENT}{}() = default;", node.name)?;
    if !node.ctor.params.is_empty() {
        let explicit = if node.ctor.explicit { "explicit " } else { "" };
        writeln!(
            writer,
            "{INDENT}{explicit}{}({}):",
            node.name,
            params_of(&node.ctor)
        )?;
        writeln!(
            writer,
            "{INDENT}{INDENT}{} {{}}",
            node.ctor.inits.join(", ")
        )?;
    }
    writeln!(writer)?;

    writeln!(
        writer,
        "{INDENT}{} accept({} &visitor) override final {{",
        node.result, node.interface
    )?;
    writeln!(writer, "{INDENT}{INDENT}return visitor.visit(*this);")?;
    writeln!(writer, "{INDENT}}}")?;
    writeln!(writer, "}};")
}

fn emit_helpers(writer: &mut impl Write, helpers: &[HelperDecl]) -> io::Result<()> {
    for helper in helpers {
        if let Some(doc) = &helper.doc {
            writeln!(writer, "// {doc}")?;
        }
        writeln!(writer, "{} {}({});", helper.ret, helper.name, helper.params)?;
    }
    Ok(())
}

fn params_of(ctor: &Ctor) -> String {
    ctor.params
        .iter()
        .map(Member::declarator)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::IncludeLine;

    fn render(header: &Header) -> String {
        let mut buffer = Vec::new();
        emit_header(&mut buffer, header).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn guard_frames_the_whole_unit() {
        let header = Header {
            guard: "AST_HPP".to_owned(),
            includes: vec![IncludeLine {
                system: false,
                path: "Token.hpp".to_owned(),
            }],
            decls: vec![Decl::Forward(vec!["Expr".to_owned()])],
        };
        let text = render(&header);
        assert!(text.starts_with("#pragma once\n\n#ifndef AST_HPP\n#define AST_HPP\n"));
        assert!(text.ends_with("#endif\n"));
        assert!(text.contains("#include \"Token.hpp\"\n"));
        assert!(text.contains("struct Expr;\n"));
    }

    #[test]
    fn tag_enum_groups_are_blank_separated() {
        let header = Header {
            guard: "G".to_owned(),
            includes: Vec::new(),
            decls: vec![Decl::TagEnum(TagEnum {
                name: "NodeType".to_owned(),
                groups: vec![
                    vec!["LiteralExpr".to_owned(), "UnaryExpr".to_owned()],
                    vec!["BlockStmt".to_owned()],
                ],
            })],
        };
        let text = render(&header);
        assert!(text.contains(
            "enum class NodeType {\n    LiteralExpr,\n    UnaryExpr,\n\n    BlockStmt\n};\n"
        ));
    }
}
