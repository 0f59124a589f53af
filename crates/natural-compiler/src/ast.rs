//! Syntax model of a module as the host hands it over: imports, function and
//! type definitions, already resolved to [`TypeId`]s where the host could
//! type them.
//!
//! Only the nodes the rewrite pipeline reads or produces are modelled; every
//! other member of a document stays opaque to this crate.
use std::fmt;

use crate::oracle::TypeId;

/// Byte range inside a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// One compilation unit: a module with its source and test documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub name: String,
    pub documents: Vec<Document>,
    pub test_documents: Vec<Document>,
}

impl Module {
    /// Source documents first, then test documents.
    pub fn all_documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().chain(self.test_documents.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub name: String,
    pub imports: Vec<ImportDecl>,
    pub members: Vec<Member>,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_import(mut self, import: ImportDecl) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.members.iter().filter_map(|member| match member {
            Member::Function(function) => Some(function),
            Member::Type(_) => None,
        })
    }

    pub fn type_definitions(&self) -> impl Iterator<Item = &TypeDef> {
        self.members.iter().filter_map(|member| match member {
            Member::Type(definition) => Some(definition),
            Member::Function(_) => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions().find(|function| function.name == name)
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDef> {
        self.type_definitions().find(|definition| definition.name == name)
    }
}

/// `import org/module.path as prefix;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Absent for same-package imports used by module tests.
    pub org: Option<String>,
    pub module: Vec<String>,
    pub prefix: Option<String>,
    pub span: Span,
}

impl ImportDecl {
    pub fn new(org: Option<&str>, module: &[&str], prefix: Option<&str>) -> Self {
        Self {
            org: org.map(str::to_owned),
            module: module.iter().map(|segment| (*segment).to_owned()).collect(),
            prefix: prefix.map(str::to_owned),
            span: Span::default(),
        }
    }

    /// Name under which the module's symbols are visible in the document.
    pub fn alias(&self) -> &str {
        match &self.prefix {
            Some(prefix) => prefix,
            None => self.module.last().map(String::as_str).unwrap_or_default(),
        }
    }
}

impl fmt::Display for ImportDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import ")?;
        if let Some(org) = &self.org {
            write!(f, "{org}/")?;
        }
        write!(f, "{}", self.module.join("."))?;
        if let Some(prefix) = &self.prefix {
            write!(f, " as {prefix}")?;
        }
        write!(f, ";")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Function(FunctionDef),
    Type(TypeDef),
}

impl From<FunctionDef> for Member {
    fn from(value: FunctionDef) -> Self {
        Member::Function(value)
    }
}

impl From<TypeDef> for Member {
    fn from(value: TypeDef) -> Self {
        Member::Type(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<ReturnType>,
    pub body: FunctionBody,
    pub span: Span,
}

impl FunctionDef {
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }
}

/// The `returns T` clause. `ty` is `None` when the host could not type it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnType {
    pub ty: Option<TypeId>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub ty: Option<TypeId>,
    pub span: Span,
    pub type_span: Span,
}

impl Param {
    pub fn new(name: impl Into<String>, kind: ParamKind, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            kind,
            ty: Some(ty),
            span: Span::default(),
            type_span: Span::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Required,
    Defaultable,
    IncludedRecord,
    Rest,
}

impl ParamKind {
    pub fn is_required_or_defaultable(self) -> bool {
        matches!(self, ParamKind::Required | ParamKind::Defaultable)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    /// `= @annotations external;`
    External { annotations: Vec<Annotation> },
    /// `=> expression;`
    Expression(CallExpr),
    /// Any hand-written block, kept verbatim.
    Block(String),
}

/// `prefix:name`, or a bare `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub prefix: Option<String>,
    pub name: String,
}

impl QualifiedName {
    pub fn new(prefix: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.map(str::to_owned),
            name: name.into(),
        }
    }

    pub fn is(&self, prefix: &str, name: &str) -> bool {
        self.prefix.as_deref() == Some(prefix) && self.name == name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// `@reference value`, where `value` is the mapping-constructor source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub reference: QualifiedName,
    pub value: Option<String>,
}

impl Annotation {
    pub fn new(reference: QualifiedName) -> Self {
        Self {
            reference,
            value: None,
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.reference)?;
        if let Some(value) = &self.value {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

/// `callee(arg, ...)` with positional name-reference arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub callee: QualifiedName,
    pub args: Vec<String>,
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.callee, self.args.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub ty: TypeId,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
            span: Span::default(),
        }
    }
}
