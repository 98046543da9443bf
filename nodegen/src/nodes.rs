//! The built-in node-set definition.
//!
//! This is configuration, not computed data: the families, variants and
//! fields below are the hand-curated description of the front end's
//! syntax tree, in the exact order the generated declarations, tag
//! values and dispatch methods must follow. Reordering two variants
//! changes their tag values and is a breaking change to anything that
//! persisted a tag.

use crate::schema::{
    field, AuxAlias, Contained, Field, FieldType, Helper, Include, NodeFamily, Schema, Support,
    UnionSupport, ValueAlias, Variant,
};

use crate::schema::FieldType::{Bool, Size, StringView, Token};

/// A fresh schema describing the full node set. Each generation run
/// starts from its own copy; nothing here is shared or mutated.
pub fn definition() -> Schema {
    Schema {
        tag_enum: "NodeType",
        dispatch: "Visitor",
        includes: vec![
            Include::Local("Token.hpp"),
            Include::Local("VisitorTypes.hpp"),
            Include::System("filesystem"),
            Include::System("memory"),
            Include::System("string"),
            Include::System("string_view"),
            Include::System("tuple"),
            Include::System("unordered_map"),
            Include::System("vector"),
        ],
        externs: vec!["Type"],
        aliases: vec![ValueAlias {
            name: "RequiresCopy",
            target: Bool,
        }],
        families: vec![expressions(), statements(), types()],
        helpers: helpers(),
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

fn alias(name: &'static str, target: FieldType) -> AuxAlias {
    AuxAlias { name, target }
}

/// The `(expression, conversion kind, copy flag)` element tuple shared
/// by call arguments and list/tuple literal elements.
fn element_tuple() -> FieldType {
    FieldType::Tuple(vec![
        FieldType::Node("Expr"),
        FieldType::Enum("NumericConversionType"),
        FieldType::Alias("RequiresCopy"),
    ])
}

fn expressions() -> NodeFamily {
    NodeFamily {
        name: "Expr",
        base: "Expr",
        label: "Expression",
        // Family-wide bookkeeping lives on the base: every expression
        // carries its synthesised and inherited attribute blocks, and no
        // variant declares its own copy.
        base_fields: vec![
            field("synthesized_attrs", FieldType::Value("ExprSynthesizedAttrs")),
            field("inherited_attrs", FieldType::Value("ExprInheritedAttrs")),
        ],
        base_ctor: false,
        variants: vec![
            Variant {
                name: "Assign",
                support: vec![
                    Support::Enum {
                        name: "NumericConversionType",
                        members: vec!["FLOAT_TO_INT", "INT_TO_FLOAT", "NONE"],
                    },
                    Support::Enum {
                        name: "IdentifierType",
                        members: vec!["LOCAL", "GLOBAL", "FUNCTION", "CLASS"],
                    },
                ],
                aliases: Vec::new(),
                contained: None,
                fields: vec![
                    field("target", Token),
                    field("value", FieldType::Node("Expr")),
                    field("conversion_type", FieldType::Enum("NumericConversionType")),
                    field("requires_copy", FieldType::Alias("RequiresCopy")),
                    field("target_type", FieldType::Enum("IdentifierType")),
                ],
            },
            variant(
                "Binary",
                vec![
                    field("left", FieldType::Node("Expr")),
                    field("right", FieldType::Node("Expr")),
                ],
            ),
            Variant {
                name: "Call",
                support: Vec::new(),
                aliases: vec![alias("ArgumentType", element_tuple())],
                contained: None,
                fields: vec![
                    field("function", FieldType::Node("Expr")),
                    field("args", FieldType::seq(FieldType::Alias("ArgumentType"))),
                    field("is_native_call", Bool),
                ],
            },
            variant(
                "Comma",
                vec![field("exprs", FieldType::seq(FieldType::Node("Expr")))],
            ),
            variant(
                "Get",
                vec![
                    field("object", FieldType::Node("Expr")),
                    field("name", Token),
                ],
            ),
            variant(
                "Grouping",
                vec![
                    field("expr", FieldType::Node("Expr")),
                    field("type", FieldType::Node("Type")),
                ],
            ),
            variant(
                "Index",
                vec![
                    field("object", FieldType::Node("Expr")),
                    field("index", FieldType::Node("Expr")),
                ],
            ),
            Variant {
                name: "List",
                support: Vec::new(),
                aliases: vec![alias("ElementType", element_tuple())],
                contained: None,
                fields: vec![
                    field("bracket", Token),
                    field("elements", FieldType::seq(FieldType::Alias("ElementType"))),
                    field("type", FieldType::Own("ListType")),
                ],
            },
            variant(
                "ListAssign",
                vec![
                    field("list", FieldType::Inline("IndexExpr")),
                    field("value", FieldType::Node("Expr")),
                    field("conversion_type", FieldType::Enum("NumericConversionType")),
                    field("requires_copy", FieldType::Alias("RequiresCopy")),
                ],
            ),
            variant(
                "ListRepeat",
                vec![
                    field("bracket", Token),
                    field("expr", FieldType::Alias("ListExpr::ElementType")),
                    field("quantity", FieldType::Alias("ListExpr::ElementType")),
                    field("type", FieldType::Own("ListType")),
                ],
            ),
            variant(
                "Literal",
                vec![
                    field("value", FieldType::Value("LiteralValue")),
                    field("type", FieldType::Node("Type")),
                ],
            ),
            variant(
                "Logical",
                vec![
                    field("left", FieldType::Node("Expr")),
                    field("right", FieldType::Node("Expr")),
                ],
            ),
            variant("Move", vec![field("expr", FieldType::Node("Expr"))]),
            variant(
                "ScopeAccess",
                vec![
                    field("scope", FieldType::Node("Expr")),
                    field("name", Token),
                ],
            ),
            variant(
                "ScopeName",
                vec![
                    field("name", Token),
                    field("module_path", FieldType::Value("std::filesystem::path")),
                    field("class_", FieldType::Raw("ClassStmt")),
                ],
            ),
            variant(
                "Set",
                vec![
                    field("object", FieldType::Node("Expr")),
                    field("name", Token),
                    field("value", FieldType::Node("Expr")),
                    field("conversion_type", FieldType::Enum("NumericConversionType")),
                    field("requires_copy", FieldType::Alias("RequiresCopy")),
                ],
            ),
            variant(
                "Super",
                vec![field("keyword", Token), field("name", Token)],
            ),
            variant(
                "Ternary",
                vec![
                    field("left", FieldType::Node("Expr")),
                    field("middle", FieldType::Node("Expr")),
                    field("right", FieldType::Node("Expr")),
                ],
            ),
            variant("This", vec![field("keyword", Token)]),
            Variant {
                name: "Tuple",
                support: Vec::new(),
                aliases: vec![alias("ElementType", element_tuple())],
                contained: None,
                fields: vec![
                    field("brace", Token),
                    field("elements", FieldType::seq(FieldType::Alias("ElementType"))),
                    field("type", FieldType::Own("TupleType")),
                ],
            },
            variant(
                "Unary",
                vec![field("oper", Token), field("right", FieldType::Node("Expr"))],
            ),
            variant(
                "Variable",
                vec![
                    field("name", Token),
                    field("type", FieldType::Enum("IdentifierType")),
                ],
            ),
        ],
    }
}

fn statements() -> NodeFamily {
    NodeFamily {
        name: "Stmt",
        base: "Stmt",
        label: "Statement",
        base_fields: Vec::new(),
        base_ctor: false,
        variants: vec![
            variant(
                "Block",
                vec![field("stmts", FieldType::seq(FieldType::Node("Stmt")))],
            ),
            variant("Break", vec![field("keyword", Token)]),
            Variant {
                name: "Class",
                support: vec![Support::Enum {
                    name: "VisibilityType",
                    members: vec!["PRIVATE", "PROTECTED", "PUBLIC"],
                }],
                aliases: vec![
                    alias(
                        "MemberType",
                        FieldType::pair(
                            FieldType::Raw("VarStmt"),
                            FieldType::Enum("VisibilityType"),
                        ),
                    ),
                    alias(
                        "MethodType",
                        FieldType::pair(
                            FieldType::Raw("FunctionStmt"),
                            FieldType::Enum("VisibilityType"),
                        ),
                    ),
                ],
                contained: None,
                fields: vec![
                    field("name", Token),
                    field("ctor", FieldType::Raw("FunctionStmt")),
                    field("dtor", FieldType::Raw("FunctionStmt")),
                    field("stmts", FieldType::seq(FieldType::Node("Stmt"))),
                    field("members", FieldType::seq(FieldType::Alias("MemberType"))),
                    field("methods", FieldType::seq(FieldType::Alias("MethodType"))),
                    field("member_map", FieldType::map(StringView, Size)),
                    field("method_map", FieldType::map(StringView, Size)),
                    field("module_path", FieldType::Value("std::filesystem::path")),
                ],
            },
            variant("Continue", vec![field("keyword", Token)]),
            variant("Expression", vec![field("expr", FieldType::Node("Expr"))]),
            Variant {
                name: "For",
                support: vec![Support::Union(UnionSupport {
                    name: "IdentifierTuple",
                    aliases: vec![
                        alias(
                            "DeclarationDetails",
                            FieldType::Tuple(vec![
                                Token,
                                FieldType::Enum("NumericConversionType"),
                                FieldType::Alias("RequiresCopy"),
                                FieldType::Node("Type"),
                            ]),
                        ),
                        alias(
                            "TupleType",
                            FieldType::seq(FieldType::Sum(vec![
                                FieldType::Union("IdentifierTuple"),
                                FieldType::Alias("DeclarationDetails"),
                            ])),
                        ),
                    ],
                    contained: Contained {
                        members: vec!["IDENT_TUPLE", "DECL_DETAILS"],
                    },
                    fields: vec![field("tuple", FieldType::Alias("TupleType"))],
                })],
                aliases: Vec::new(),
                contained: None,
                fields: vec![
                    field("initializer", FieldType::Node("Stmt")),
                    field("condition", FieldType::Node("Expr")),
                    field("increment", FieldType::Node("Stmt")),
                    field("body", FieldType::Node("Stmt")),
                    field("keyword", Token),
                ],
            },
            Variant {
                name: "Function",
                support: Vec::new(),
                aliases: vec![alias(
                    "ParameterType",
                    FieldType::pair(
                        FieldType::Sum(vec![FieldType::Union("IdentifierTuple"), Token]),
                        FieldType::Node("Type"),
                    ),
                )],
                contained: Some(Contained {
                    members: vec!["IDENT_TUPLE", "TOKEN"],
                }),
                fields: vec![
                    field("name", Token),
                    field("return_type", FieldType::Node("Type")),
                    field("params", FieldType::seq(FieldType::Alias("ParameterType"))),
                    field("body", FieldType::Node("Stmt")),
                    field("return_stmts", FieldType::seq(FieldType::Raw("ReturnStmt"))),
                    field("scope_depth", Size),
                    field("class_", FieldType::Raw("ClassStmt")),
                ],
            },
            variant(
                "If",
                vec![
                    field("keyword", Token),
                    field("condition", FieldType::Node("Expr")),
                    field("thenBranch", FieldType::Node("Stmt")),
                    field("elseBranch", FieldType::Node("Stmt")),
                ],
            ),
            variant(
                "Return",
                vec![
                    field("keyword", Token),
                    field("value", FieldType::Node("Expr")),
                    field("locals_popped", Size),
                    field("function", FieldType::Raw("FunctionStmt")),
                ],
            ),
            variant(
                "Switch",
                vec![
                    field("condition", FieldType::Node("Expr")),
                    field(
                        "cases",
                        FieldType::seq(FieldType::pair(
                            FieldType::Node("Expr"),
                            FieldType::Node("Stmt"),
                        )),
                    ),
                    field("default_case", FieldType::Node("Stmt")),
                ],
            ),
            variant(
                "Type",
                vec![field("name", Token), field("type", FieldType::Node("Type"))],
            ),
            variant(
                "Var",
                vec![
                    field("keyword", Token),
                    field("name", Token),
                    field("type", FieldType::Node("Type")),
                    field("initializer", FieldType::Node("Expr")),
                    field("conversion_type", FieldType::Enum("NumericConversionType")),
                    field("requires_copy", FieldType::Alias("RequiresCopy")),
                    field("originally_typeless", Bool),
                ],
            ),
            variant(
                "VarTuple",
                vec![
                    field("names", FieldType::Union("IdentifierTuple")),
                    field("type", FieldType::Node("Type")),
                    field("initializer", FieldType::Node("Expr")),
                    field("token", Token),
                    field("keyword", Token),
                    field("originally_typeless", Bool),
                ],
            ),
            variant(
                "While",
                vec![
                    field("keyword", Token),
                    field("condition", FieldType::Node("Expr")),
                    field("body", FieldType::Node("Stmt")),
                    field("increment", FieldType::Node("Stmt")),
                ],
            ),
            variant("SingleLineComment", vec![field("contents", Token)]),
            variant(
                "MultiLineComment",
                vec![field("contents", Token), field("lines", Size)],
            ),
        ],
    }
}

fn types() -> NodeFamily {
    NodeFamily {
        name: "Type",
        base: "BaseType",
        label: "Type",
        base_fields: vec![
            field("primitive", FieldType::Enum("Type")),
            field("is_const", Bool),
            field("is_ref", Bool),
        ],
        base_ctor: true,
        variants: vec![
            variant("Primitive", Vec::new()),
            variant(
                "UserDefined",
                vec![
                    field("name", Token),
                    field("class_", FieldType::Raw("ClassStmt")),
                ],
            ),
            variant("List", vec![field("contained", FieldType::Node("Type"))]),
            variant(
                "Tuple",
                vec![field("types", FieldType::seq(FieldType::Node("Type")))],
            ),
            variant("Typeof", vec![field("expr", FieldType::Node("Expr"))]),
        ],
    }
}

fn helpers() -> Vec<Vec<Helper>> {
    vec![
        vec![
            Helper {
                doc: Some("Helper function to turn a given type node into a string"),
                ret: "std::string",
                name: "stringify",
                params: "BaseType *node",
            },
            Helper {
                doc: Some("Helper function to turn the type of a given node into a shortened form"),
                ret: "std::string",
                name: "stringify_short",
                params: "const BaseType *node, bool consider_const, bool consider_ref",
            },
        ],
        vec![Helper {
            doc: Some(
                "Helper function to copy a given type node (list size expressions are not copied however)",
            ),
            ret: "BaseTypeVisitorType",
            name: "copy_type",
            params: "BaseType *node",
        }],
        vec![Helper {
            doc: Some("Helper function to get the size of a given vartuple"),
            ret: "std::size_t",
            name: "vartuple_size",
            params: "IdentifierTuple::TupleType &tuple",
        }],
        vec![
            Helper {
                doc: Some("Determine whether passed type is trivial"),
                ret: "bool",
                name: "is_trivial_type",
                params: "Type type",
            },
            Helper {
                doc: None,
                ret: "bool",
                name: "is_trivial_type",
                params: "BaseType *node",
            },
        ],
        vec![
            Helper {
                doc: Some("Determine whether passed type is non-trivial"),
                ret: "bool",
                name: "is_nontrivial_type",
                params: "Type type",
            },
            Helper {
                doc: None,
                ret: "bool",
                name: "is_nontrivial_type",
                params: "BaseType *node",
            },
        ],
        vec![Helper {
            doc: Some("Determine whether given function is a constructor"),
            ret: "bool",
            name: "is_constructor",
            params: "FunctionStmt *stmt",
        }],
        vec![Helper {
            doc: Some("Determine whether given function is a destructor"),
            ret: "bool",
            name: "is_destructor",
            params: "FunctionStmt *stmt",
        }],
    ]
}
