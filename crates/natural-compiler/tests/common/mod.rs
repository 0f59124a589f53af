#![allow(dead_code)]

use natural_compiler::{
    MarkerConfig, TypeId,
    ast::{
        Annotation, Document, FunctionBody, FunctionDef, ImportDecl, Param, ParamKind,
        QualifiedName, ReturnType, Span, TypeDef,
    },
    host::TypeArena,
};
use natural_core::schema::PrimitiveKind;

/// Arena with the marker module's capability types exported under
/// `natural/np`, plus a few scalar types.
pub struct Fixture {
    pub arena: TypeArena,
    pub config: MarkerConfig,
    pub prompt: TypeId,
    pub context: TypeId,
    pub model: TypeId,
    pub string: TypeId,
    pub int: TypeId,
    pub boolean: TypeId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut arena = TypeArena::new();
        let prompt = arena.nominal("Prompt", &[]);
        let context = arena.nominal("Context", &[]);
        let model = arena.nominal("Model", &[]);
        arena.export("natural", "np", "Prompt", prompt);
        arena.export("natural", "np", "Context", context);
        arena.export("natural", "np", "Model", model);

        let string = arena.primitive(PrimitiveKind::String);
        let int = arena.primitive(PrimitiveKind::Int);
        let boolean = arena.primitive(PrimitiveKind::Boolean);

        Self {
            arena,
            config: MarkerConfig::default(),
            prompt,
            context,
            model,
            string,
            int,
            boolean,
        }
    }

    /// `type Cat record {| string name; int lives; |};`
    pub fn cat(&mut self) -> TypeId {
        let body = self.arena.record(&[("name", self.string, false), ("lives", self.int, false)]);
        self.arena.named("Cat", body)
    }

    /// `type Dog record {| string name; boolean good?; |};`
    pub fn dog(&mut self) -> TypeId {
        let body = self.arena.record(&[("name", self.string, false), ("good", self.boolean, true)]);
        self.arena.named("Dog", body)
    }

    pub fn prompt_param(&self) -> Param {
        Param::new("prompt", ParamKind::Required, self.prompt)
    }

    pub fn context_param(&self) -> Param {
        Param::new("context", ParamKind::Defaultable, self.context)
    }

    pub fn model_param(&self) -> Param {
        Param::new("model", ParamKind::Defaultable, self.model)
    }

    /// `returns <members>|error`
    pub fn returns_with_error(&mut self, members: &[TypeId]) -> TypeId {
        let mut all = members.to_vec();
        all.push(self.arena.error());
        self.arena.union(&all)
    }
}

pub fn np_import() -> ImportDecl {
    ImportDecl::new(Some("natural"), &["np"], None)
}

pub fn marker(alias: &str, name: &str) -> Annotation {
    Annotation::new(QualifiedName::new(Some(alias), name))
}

/// `function <name>(<params>) returns <ty> = @np:NaturalFunction external;`
pub fn natural_fn(name: &str, params: Vec<Param>, returns: Option<TypeId>) -> FunctionDef {
    tagged_fn(name, params, returns, marker("np", "NaturalFunction"))
}

/// Same as [`natural_fn`] with `@np:LlmCall`.
pub fn llm_call_fn(name: &str, params: Vec<Param>, returns: Option<TypeId>) -> FunctionDef {
    tagged_fn(name, params, returns, marker("np", "LlmCall"))
}

pub fn tagged_fn(
    name: &str,
    params: Vec<Param>,
    returns: Option<TypeId>,
    annotation: Annotation,
) -> FunctionDef {
    FunctionDef {
        name: name.to_owned(),
        params,
        return_type: returns.map(|ty| ReturnType {
            ty: Some(ty),
            span: Span::new(100, 110),
        }),
        body: FunctionBody::External {
            annotations: vec![annotation],
        },
        span: Span::new(0, 120),
    }
}

pub fn type_def(name: &str, ty: TypeId) -> TypeDef {
    TypeDef::new(name, ty)
}

pub fn document(name: &str) -> Document {
    Document::new(name)
}
