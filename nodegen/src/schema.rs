//! The node-set schema consumed by the generator.
//!
//! A [`Schema`] is an ordered, hand-curated description of every node
//! family a compiler front end works with, together with the auxiliary
//! declarations (support enums, tagged-union payloads, helper prototypes)
//! that belong in the generated header. Ordering is significant
//! throughout: emitted declarations, tag values and dispatch methods all
//! follow schema order exactly.

use fxhash::FxHashSet;

pub mod validate;

/// A complete description of the node set for one generation run.
///
/// Constructed once before lowering begins, immutable afterwards.
pub struct Schema {
    /// Name of the variant-tag enumeration, e.g. `NodeType`.
    pub tag_enum: &'static str,
    /// Name of the dispatch interface, e.g. `Visitor`.
    pub dispatch: &'static str,
    /// Header references emitted before any declaration.
    pub includes: Vec<Include>,
    /// Value-kind names supplied by the includes (e.g. a primitive-kind
    /// enum) that fields may reference without declaring.
    pub externs: Vec<&'static str>,
    /// Schema-wide value aliases, e.g. `RequiresCopy = bool`.
    pub aliases: Vec<ValueAlias>,
    /// Node families in declaration order.
    pub families: Vec<NodeFamily>,
    /// Helper prototypes declared after the node definitions, in groups
    /// that are emitted contiguously.
    pub helpers: Vec<Vec<Helper>>,
}

/// A header reference required by the generated declarations.
pub enum Include {
    /// A project-local header, e.g. the token representation.
    Local(&'static str),
    /// A standard-library header.
    System(&'static str),
}

/// A schema-wide value alias.
pub struct ValueAlias {
    pub name: &'static str,
    pub target: FieldType,
}

/// One polymorphic node category (expressions, statements, types).
pub struct NodeFamily {
    /// Declaration-name suffix for the family's variants, e.g. `Expr`.
    pub name: &'static str,
    /// Name of the abstract base contract, e.g. `BaseType`.
    pub base: &'static str,
    /// Banner label used in section comments, e.g. `Expression`.
    pub label: &'static str,
    /// Fields every variant inherits structurally (possibly empty).
    pub base_fields: Vec<Field>,
    /// Whether the base declares a constructor initialising
    /// `base_fields` positionally. When set, every variant constructor
    /// takes the base fields first and forwards them to the base.
    pub base_ctor: bool,
    /// Concrete cases, in declaration order.
    pub variants: Vec<Variant>,
}

impl NodeFamily {
    /// The owning-handle alias for this family, e.g. `ExprNode`.
    pub fn handle(&self) -> String {
        format!("{}Node", self.name)
    }

    /// The dispatch-result placeholder for this family, e.g.
    /// `ExprVisitorType`.
    pub fn visitor_type(&self) -> String {
        format!("{}VisitorType", self.base)
    }
}

/// One concrete case of a family.
pub struct Variant {
    /// Name within the family; the declaration name derives as
    /// `<name><family.name>`.
    pub name: &'static str,
    /// Support declarations emitted immediately before this variant.
    pub support: Vec<Support>,
    /// Auxiliary aliases scoped to this variant, emitted before its
    /// fields so the fields may reference them.
    pub aliases: Vec<AuxAlias>,
    /// Discriminant names for a nested `std::variant` alias, if any.
    pub contained: Option<Contained>,
    /// Data members, in declaration order. Field order fixes both
    /// constructor parameter order and member-initialiser order.
    pub fields: Vec<Field>,
}

impl Variant {
    /// The full declaration name of this variant, e.g. `LiteralExpr`.
    pub fn decl_name(&self, family: &NodeFamily) -> String {
        format!("{}{}", self.name, family.name)
    }
}

/// Named discriminants pairing a `std::variant` alias, emitted as a
/// nested plain enum with explicit values.
pub struct Contained {
    pub members: Vec<&'static str>,
}

/// A nested type alias scoped to one variant or support struct.
pub struct AuxAlias {
    pub name: &'static str,
    pub target: FieldType,
}

/// One data member of a variant.
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

pub fn field(name: &'static str, ty: FieldType) -> Field {
    Field { name, ty }
}

/// Semantic type descriptor for a field.
///
/// The descriptor decides three things during lowering: the rendered
/// type text, whether the constructor parameter is moved or copied into
/// the member, and which names validation must resolve.
#[derive(Clone)]
pub enum FieldType {
    /// `bool`, copied.
    Bool,
    /// `std::size_t`, copied.
    Size,
    /// `std::string_view`, copied.
    StringView,
    /// The token representation supplied by the includes, moved.
    Token,
    /// A plain value type rendered verbatim (literal payloads, paths,
    /// attribute blocks), moved.
    Value(&'static str),
    /// Owning handle to a family, via its `<family>Node` alias. Moved.
    Node(&'static str),
    /// Owning handle to one concrete variant declaration. Moved.
    Own(&'static str),
    /// A concrete variant stored inline by value. Moved.
    Inline(&'static str),
    /// Owning sequence of the element type. Moved.
    Seq(Box<FieldType>),
    /// `std::pair` of the two types. Moved.
    Pair(Box<FieldType>, Box<FieldType>),
    /// `std::tuple` over the element types. Moved.
    Tuple(Vec<FieldType>),
    /// `std::variant` over the alternative types. Moved.
    Sum(Vec<FieldType>),
    /// `std::unordered_map` from key to value. Moved.
    Map(Box<FieldType>, Box<FieldType>),
    /// Reference to an auxiliary alias: variant-local (`ElementType`),
    /// qualified from another declaration (`ListExpr::ElementType`), or
    /// schema-wide (`RequiresCopy`). Passing follows the resolved target.
    Alias(&'static str),
    /// Reference to a declared support enum (or an extern value kind),
    /// copied.
    Enum(&'static str),
    /// A declared tagged-union payload struct, stored by value. Moved.
    Union(&'static str),
    /// Non-owning back-reference pointer to a variant declaration,
    /// copied. Carries no lifetime responsibility.
    Raw(&'static str),
}

impl FieldType {
    pub fn seq(element: FieldType) -> FieldType {
        FieldType::Seq(Box::new(element))
    }

    pub fn pair(first: FieldType, second: FieldType) -> FieldType {
        FieldType::Pair(Box::new(first), Box::new(second))
    }

    pub fn map(key: FieldType, value: FieldType) -> FieldType {
        FieldType::Map(Box::new(key), Box::new(value))
    }
}

/// How a constructor parameter reaches its member.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Passing {
    Copy,
    Move,
}

/// Support declarations interleaved with the node definitions.
pub enum Support {
    /// A plain scoped enumeration, e.g. a conversion-kind enum.
    Enum {
        name: &'static str,
        members: Vec<&'static str>,
    },
    /// A tagged-union payload struct with nested aliases and a
    /// discriminant enum.
    Union(UnionSupport),
}

pub struct UnionSupport {
    pub name: &'static str,
    pub aliases: Vec<AuxAlias>,
    pub contained: Contained,
    pub fields: Vec<Field>,
}

/// A free-function prototype declared after the node definitions. The
/// bodies belong to the consuming compiler, never to the generator.
pub struct Helper {
    pub doc: Option<&'static str>,
    pub ret: &'static str,
    pub name: &'static str,
    pub params: &'static str,
}

impl Schema {
    /// Resolve an alias reference as seen from a declaration whose own
    /// aliases are `locals`: local names first, then qualified names
    /// declared by any variant or support struct, then schema-wide value
    /// aliases.
    pub fn resolve_alias<'a>(
        &'a self,
        locals: &'a [AuxAlias],
        name: &str,
    ) -> Option<&'a FieldType> {
        if let Some((scope, alias)) = name.split_once("::") {
            return self.qualified_alias(scope, alias);
        }
        if let Some(found) = locals.iter().find(|a| a.name == name) {
            return Some(&found.target);
        }
        self.aliases
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.target)
    }

    fn qualified_alias(&self, scope: &str, alias: &str) -> Option<&FieldType> {
        for family in &self.families {
            for variant in &family.variants {
                if variant.decl_name(family) == scope {
                    return variant
                        .aliases
                        .iter()
                        .find(|a| a.name == alias)
                        .map(|a| &a.target);
                }
                for support in &variant.support {
                    if let Support::Union(union) = support {
                        if union.name == scope {
                            return union
                                .aliases
                                .iter()
                                .find(|a| a.name == alias)
                                .map(|a| &a.target);
                        }
                    }
                }
            }
        }
        None
    }

    /// Whether a constructor parameter of this type is moved or copied
    /// into its member. Owning handles and compound values move; scalars,
    /// enums and back-references copy. Alias references follow their
    /// resolved target.
    pub fn passing(&self, locals: &[AuxAlias], ty: &FieldType) -> Passing {
        match ty {
            FieldType::Bool
            | FieldType::Size
            | FieldType::StringView
            | FieldType::Enum(_)
            | FieldType::Raw(_) => Passing::Copy,
            FieldType::Alias(name) => match self.resolve_alias(locals, name) {
                Some(target) => self.passing(locals, target),
                None => Passing::Move,
            },
            _ => Passing::Move,
        }
    }

    /// All names a field-type reference may legally resolve to, used for
    /// "did you mean" suggestions.
    pub fn known_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for family in &self.families {
            names.push(family.name.to_owned());
            for variant in &family.variants {
                names.push(variant.decl_name(family));
                for alias in &variant.aliases {
                    names.push(format!("{}::{}", variant.decl_name(family), alias.name));
                }
                for support in &variant.support {
                    match support {
                        Support::Enum { name, .. } => names.push((*name).to_owned()),
                        Support::Union(union) => {
                            names.push(union.name.to_owned());
                            for alias in &union.aliases {
                                names.push(format!("{}::{}", union.name, alias.name));
                            }
                        }
                    }
                }
            }
        }
        for alias in &self.aliases {
            names.push(alias.name.to_owned());
        }
        for name in &self.externs {
            names.push((*name).to_owned());
        }
        names
    }

    /// Every declared support enum name, schema-wide.
    pub(crate) fn support_enums(&self) -> FxHashSet<&'static str> {
        let mut enums = FxHashSet::default();
        for family in &self.families {
            for variant in &family.variants {
                for support in &variant.support {
                    if let Support::Enum { name, .. } = support {
                        enums.insert(*name);
                    }
                }
            }
        }
        enums
    }

    /// Every declared tagged-union payload name, schema-wide.
    pub(crate) fn support_unions(&self) -> FxHashSet<&'static str> {
        let mut unions = FxHashSet::default();
        for family in &self.families {
            for variant in &family.variants {
                for support in &variant.support {
                    if let Support::Union(union) = support {
                        unions.insert(union.name);
                    }
                }
            }
        }
        unions
    }

    /// Every concrete variant declaration name, schema-wide.
    pub(crate) fn decl_names(&self) -> FxHashSet<String> {
        let mut decls = FxHashSet::default();
        for family in &self.families {
            for variant in &family.variants {
                decls.insert(variant.decl_name(family));
            }
        }
        decls
    }
}
