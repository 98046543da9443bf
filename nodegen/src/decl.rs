//! Declaration records produced by lowering.
//!
//! This is the output-side model: a flat, ordered sequence of records
//! that the emitter renders without reordering. The record set is a
//! closed sum, so adding a record kind without rendering it fails to
//! compile.

pub mod emit;

/// A complete output unit: guard framing, header references, and the
/// declaration records in emission order.
pub struct Header {
    /// The unique inclusion-guard name for this unit.
    pub guard: String,
    pub includes: Vec<IncludeLine>,
    pub decls: Vec<Decl>,
}

pub struct IncludeLine {
    pub system: bool,
    pub path: String,
}

/// One declaration record. Records are emitted in sequence, separated
/// by a single blank line.
pub enum Decl {
    /// A `// ...` section banner.
    Banner(String),
    /// A run of name-only forward declarations.
    Forward(Vec<String>),
    /// A run of `using` alias declarations.
    Aliases(Vec<UsingAlias>),
    /// The variant-tag enumeration, grouped by family.
    TagEnum(TagEnum),
    /// The dispatch interface, one method per variant, grouped by family.
    Dispatch(Dispatch),
    /// An abstract family base contract.
    Base(BaseDecl),
    /// A plain scoped enumeration (support declaration).
    PlainEnum(PlainEnum),
    /// A tagged-union payload struct (support declaration).
    PlainStruct(PlainStruct),
    /// A concrete variant definition.
    Node(NodeDecl),
    /// A run of helper prototypes emitted contiguously.
    Helpers(Vec<HelperDecl>),
}

pub struct UsingAlias {
    pub name: String,
    pub target: String,
}

pub struct TagEnum {
    pub name: String,
    /// One inner vector per family, in schema order.
    pub groups: Vec<Vec<String>>,
}

pub struct Dispatch {
    pub name: String,
    pub groups: Vec<DispatchGroup>,
}

/// The dispatch methods for one family.
pub struct DispatchGroup {
    /// The family's dispatch-result placeholder, e.g. `ExprVisitorType`.
    pub result: String,
    /// Parameter name, e.g. `expr`.
    pub param: String,
    /// Variant declaration names, in schema order.
    pub nodes: Vec<String>,
}

/// A member or constructor parameter: rendered type text plus name.
pub struct Member {
    pub ty: String,
    pub name: String,
}

impl Member {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Member {
        Member {
            ty: ty.into(),
            name: name.into(),
        }
    }

    /// Render as a declarator, keeping pointer types tight against the
    /// name (`ClassStmt *class_`).
    pub fn declarator(&self) -> String {
        if self.ty.ends_with('*') {
            format!("{}{}", self.ty, self.name)
        } else {
            format!("{} {}", self.ty, self.name)
        }
    }
}

pub struct BaseDecl {
    pub name: String,
    pub members: Vec<Member>,
    /// Positional base constructor, present when the family's shared
    /// fields require initialisation at the base level.
    pub ctor: Option<Ctor>,
    /// Dispatch-result placeholder, e.g. `ExprVisitorType`.
    pub result: String,
    pub tag_enum: String,
    pub interface: String,
}

pub struct PlainEnum {
    pub name: String,
    pub members: Vec<String>,
    /// Emit `= 0, = 1, ...` discriminant values.
    pub explicit_values: bool,
}

pub struct PlainStruct {
    pub name: String,
    pub aliases: Vec<UsingAlias>,
    pub contained: Option<PlainEnum>,
    pub members: Vec<Member>,
}

pub struct NodeDecl {
    pub name: String,
    pub base: String,
    pub aliases: Vec<UsingAlias>,
    pub contained: Option<PlainEnum>,
    pub members: Vec<Member>,
    pub ctor: Ctor,
    /// Dispatch-result placeholder, e.g. `ExprVisitorType`.
    pub result: String,
    pub tag_enum: String,
    pub interface: String,
}

/// A constructor whose parameter list and member-initialiser list were
/// derived 1:1, in order, from the field list.
pub struct Ctor {
    /// Marked `explicit` when the parameter list has exactly one entry.
    pub explicit: bool,
    pub params: Vec<Member>,
    /// Fully rendered initialisers, e.g. `value{std::move(value)}`.
    pub inits: Vec<String>,
}

pub struct HelperDecl {
    pub doc: Option<String>,
    pub ret: String,
    pub name: String,
    pub params: String,
}
