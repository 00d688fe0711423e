//! The subset of Python syntax needed to declare `TypedDict`s.
//!
//! Declarations are built as values and printed by [`crate::unparse`], so the generator never
//! concatenates source text itself.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// A bare identifier, e.g. `int` or `NotRequired`
    Name(String),
    /// A string literal
    Str(String),
    Int(i64),
    /// `value[a, b, ...]`
    Subscript { value: Box<Expr>, slice: Vec<Expr> },
    /// `func(a, b, ...)`
    Call { func: Box<Expr>, args: Vec<Expr> },
    /// `{k: v, ...}`
    Dict(Vec<(Expr, Expr)>),
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// `name[slice...]`
    pub fn generic(name: impl Into<String>, slice: Vec<Expr>) -> Self {
        Self::Subscript {
            value: Box::new(Self::name(name)),
            slice,
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            func: Box::new(Self::name(name)),
            args,
        }
    }

    /// Whether printing this expression spans several lines.
    pub fn is_block(&self) -> bool {
        match self {
            Self::Dict(entries) => !entries.is_empty(),
            Self::Call { args, .. } => args.iter().any(Self::is_block),
            Self::Name(_) | Self::Str(_) | Self::Int(_) | Self::Subscript { .. } => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    /// `# text`
    Comment(String),
    /// `from module import a, b`
    ImportFrom { module: String, names: Vec<String> },
    /// `target = value`
    Assign { target: String, value: Expr },
    /// `target: annotation = value`
    AnnAssign {
        target: String,
        annotation: Expr,
        value: Expr,
    },
}

impl Stmt {
    /// Comments and imports form the file header and are printed without blank lines between
    /// them.
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Comment(_) | Self::ImportFrom { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Module {
    pub body: Vec<Stmt>,
}
