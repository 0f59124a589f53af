mod common;

use common::*;
use natural_compiler::{
    CodeModifier, DiagnosticCode, ModifyOutcome,
    ast::{Annotation, FunctionBody, ImportDecl, Member, Module, QualifiedName},
    host::OpenApiMapper,
};
use natural_core::SchemaValue;
use serde_json::json;

fn run(fx: &Fixture, module: Module) -> ModifyOutcome {
    let mapper = OpenApiMapper::new(&fx.arena);
    CodeModifier::new(&fx.arena, &mapper, &fx.config).modify(module)
}

fn schema_annotations<'a>(module: &'a Module, type_name: &str) -> Vec<&'a Annotation> {
    module
        .all_documents()
        .filter_map(|document| document.type_definition(type_name))
        .flat_map(|definition| definition.annotations.iter())
        .filter(|annotation| annotation.reference.name == "Schema")
        .collect()
}

fn payload(annotation: &Annotation) -> SchemaValue {
    SchemaValue::from_canonical_text(annotation.value.as_deref().unwrap()).unwrap()
}

/// `classify(Prompt prompt) returns Cat|Dog|error` with both records declared
/// next to it.
fn classify_module(fx: &mut Fixture) -> Module {
    let cat = fx.cat();
    let dog = fx.dog();
    let returns = fx.returns_with_error(&[cat, dog]);
    let main = document("main.bal")
        .with_import(np_import())
        .with_member(type_def("Cat", cat))
        .with_member(type_def("Dog", dog))
        .with_member(natural_fn("classify", vec![fx.prompt_param()], Some(returns)));

    Module {
        name: "pets".into(),
        documents: vec![main],
        test_documents: Vec::new(),
    }
}

#[test]
fn classify_end_to_end() {
    let mut fx = Fixture::new();
    let module = classify_module(&mut fx);

    let outcome = run(&fx, module);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.rewritten, 1);

    let main = &outcome.module.documents[0];
    let classify = main.function("classify").unwrap();
    let FunctionBody::Expression(call) = &classify.body else {
        panic!("body was not rewritten: {:?}", classify.body);
    };
    assert_eq!(call.to_string(), "np:callLlm(prompt)");

    let cat = schema_annotations(&outcome.module, "Cat");
    assert_eq!(cat.len(), 1);
    assert_eq!(cat[0].reference, QualifiedName::new(Some("np"), "Schema"));
    assert_eq!(
        payload(cat[0]).as_value(),
        &json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "lives": { "type": "integer" }
            },
            "required": ["lives", "name"]
        })
    );

    let dog = schema_annotations(&outcome.module, "Dog");
    assert_eq!(dog.len(), 1);
    let dog_schema = payload(dog[0]);
    assert_eq!(dog_schema.root_type(), Some("object"));
    assert_eq!(dog_schema.as_value()["required"], json!(["name"]));
    assert_eq!(dog_schema.as_value()["properties"]["good"], json!({ "type": "boolean" }));

    assert_eq!(main.imports.len(), 1);
}

#[test]
fn annotation_payload_is_canonical_text() {
    let mut fx = Fixture::new();
    let module = classify_module(&mut fx);
    let outcome = run(&fx, module);

    let cat = schema_annotations(&outcome.module, "Cat");
    assert_eq!(
        cat[0].value.as_deref(),
        Some(r#"{"properties":{"lives":{"type":"integer"},"name":{"type":"string"}},"required":["lives","name"],"type":"object"}"#)
    );
}

#[test]
fn companion_parameters_are_forwarded() {
    let mut fx = Fixture::new();
    let returns = fx.returns_with_error(&[fx.string]);
    let main = document("main.bal")
        .with_import(np_import())
        .with_member(natural_fn(
            "summarize",
            vec![fx.prompt_param(), fx.context_param()],
            Some(returns),
        ))
        .with_member(llm_call_fn(
            "translate",
            vec![fx.prompt_param(), fx.model_param()],
            Some(returns),
        ));
    let module = Module {
        name: "text".into(),
        documents: vec![main],
        test_documents: Vec::new(),
    };

    let outcome = run(&fx, module);
    assert_eq!(outcome.rewritten, 2);
    let main = &outcome.module.documents[0];
    for (name, expected) in [
        ("summarize", "np:callLlm(prompt, context)"),
        ("translate", "np:callLlm(prompt, model)"),
    ] {
        let FunctionBody::Expression(call) = &main.function(name).unwrap().body else {
            panic!("{name} was not rewritten");
        };
        assert_eq!(call.to_string(), expected);
    }
    assert!(outcome.schemas.is_empty());
}

#[test]
fn any_error_leaves_the_module_untouched() {
    let mut fx = Fixture::new();
    let mut module = classify_module(&mut fx);
    let broken = natural_fn("broken", Vec::new(), Some(fx.arena.error()));
    module.documents[0].members.push(broken.into());
    let before = module.clone();

    let outcome = run(&fx, module);
    assert_eq!(outcome.module, before);
    assert_eq!(outcome.rewritten, 0);
    assert!(outcome.schemas.is_empty());
    let reported: Vec<_> = outcome.diagnostics.iter().map(|diagnostic| diagnostic.code).collect();
    assert_eq!(
        reported,
        vec![
            DiagnosticCode::PromptParamIsRequired,
            DiagnosticCode::ReturnTypeMustContainAUnionOfNonErrorAndError,
        ]
    );
}

#[test]
fn unit_without_marker_import_is_untouched() {
    let mut fx = Fixture::new();
    let mut module = classify_module(&mut fx);
    module.documents[0].imports.clear();
    let before = module.clone();

    let outcome = run(&fx, module);
    assert!(!outcome.is_modified());
    assert_eq!(outcome.module, before);
}

#[test]
fn aliased_marker_import_is_used_for_calls_and_annotations() {
    let mut fx = Fixture::new();
    let cat = fx.cat();
    let returns = fx.returns_with_error(&[cat]);
    let main = document("main.bal")
        .with_import(ImportDecl::new(Some("natural"), &["np"], Some("ai")))
        .with_member(type_def("Cat", cat))
        .with_member(tagged_fn(
            "pick",
            vec![fx.prompt_param()],
            Some(returns),
            marker("ai", "NaturalFunction"),
        ));
    let module = Module {
        name: "pets".into(),
        documents: vec![main],
        test_documents: Vec::new(),
    };

    let outcome = run(&fx, module);
    let main = &outcome.module.documents[0];
    let FunctionBody::Expression(call) = &main.function("pick").unwrap().body else {
        panic!("pick was not rewritten");
    };
    assert_eq!(call.to_string(), "ai:callLlm(prompt)");
    let cat = schema_annotations(&outcome.module, "Cat");
    assert_eq!(cat[0].reference, QualifiedName::new(Some("ai"), "Schema"));
    assert_eq!(main.imports.len(), 1);
}

#[test]
fn types_in_other_documents_get_an_import() {
    let mut fx = Fixture::new();
    let cat = fx.cat();
    let dog = fx.dog();
    let returns = fx.returns_with_error(&[cat, dog]);
    let main = document("main.bal")
        .with_import(np_import())
        .with_member(natural_fn("classify", vec![fx.prompt_param()], Some(returns)));
    let cats = document("cats.bal").with_member(type_def("Cat", cat));
    let dogs = document("dogs.bal")
        .with_import(ImportDecl::new(Some("acme"), &["np"], None))
        .with_member(type_def("Dog", dog));
    let module = Module {
        name: "pets".into(),
        documents: vec![main, cats, dogs],
        test_documents: Vec::new(),
    };

    let outcome = run(&fx, module);
    let docs = &outcome.module.documents;

    assert_eq!(docs[1].imports, vec![np_import()]);
    assert_eq!(docs[1].imports[0].to_string(), "import natural/np;");
    assert_eq!(
        docs[1].type_definition("Cat").unwrap().annotations[0].reference,
        QualifiedName::new(Some("np"), "Schema")
    );

    assert_eq!(docs[2].imports.len(), 2);
    assert_eq!(docs[2].imports[1].to_string(), "import natural/np as np1;");
    assert_eq!(
        docs[2].type_definition("Dog").unwrap().annotations[0].reference,
        QualifiedName::new(Some("np1"), "Schema")
    );
}

#[test]
fn existing_schema_annotations_are_kept() {
    let mut fx = Fixture::new();
    let mut module = classify_module(&mut fx);
    let mut user = Annotation::new(QualifiedName::new(Some("np"), "Schema"));
    user.value = Some(r#"{ "type": "object" }"#.into());
    let main = &mut module.documents[0];
    let position = main
        .members
        .iter()
        .position(|member| matches!(member, Member::Type(def) if def.name == "Cat"))
        .unwrap();
    if let Member::Type(def) = &mut main.members[position] {
        def.annotations.push(user.clone());
    }

    let outcome = run(&fx, module);
    let cat = schema_annotations(&outcome.module, "Cat");
    assert_eq!(cat, vec![&user]);
    assert_eq!(
        outcome.schemas.get("Cat").map(SchemaValue::canonical_text).as_deref(),
        Some(r#"{"type":"object"}"#)
    );
    assert_eq!(schema_annotations(&outcome.module, "Dog").len(), 1);
}

#[test]
fn running_twice_changes_nothing_more() {
    let mut fx = Fixture::new();
    let module = classify_module(&mut fx);
    let first = run(&fx, module);
    let second = run(&fx, first.module.clone());

    assert_eq!(second.module, first.module);
    assert!(!second.is_modified());
    assert_eq!(schema_annotations(&second.module, "Cat").len(), 1);
}

#[test]
fn test_documents_share_the_schema_cache() {
    let mut fx = Fixture::new();
    let cat = fx.cat();
    let returns = fx.returns_with_error(&[cat]);
    let main = document("main.bal").with_member(type_def("Cat", cat));
    let tests = document("tests/main_test.bal")
        .with_import(ImportDecl::new(None, &["np"], None))
        .with_member(natural_fn("fakeCat", vec![fx.prompt_param()], Some(returns)));
    let module = Module {
        name: "pets".into(),
        documents: vec![main],
        test_documents: vec![tests],
    };

    let outcome = run(&fx, module);
    assert_eq!(outcome.rewritten, 1);
    assert!(matches!(
        outcome.module.test_documents[0].function("fakeCat").unwrap().body,
        FunctionBody::Expression(_)
    ));
    assert_eq!(schema_annotations(&outcome.module, "Cat").len(), 1);
    assert_eq!(outcome.module.documents[0].imports, vec![np_import()]);
}

#[test]
fn nested_named_types_are_extracted() {
    let mut fx = Fixture::new();
    let cat = fx.cat();
    let owner_body = fx.arena.record(&[("name", fx.string, false), ("pet", cat, false)]);
    let owner = fx.arena.named("Owner", owner_body);
    let owners = fx.arena.array(owner);
    let returns = fx.returns_with_error(&[owners]);
    let main = document("main.bal")
        .with_import(np_import())
        .with_member(type_def("Owner", owner))
        .with_member(type_def("Cat", cat))
        .with_member(natural_fn("owners", vec![fx.prompt_param()], Some(returns)));
    let module = Module {
        name: "pets".into(),
        documents: vec![main],
        test_documents: Vec::new(),
    };

    let outcome = run(&fx, module);
    assert!(outcome.schemas.contains("Owner"));
    assert!(outcome.schemas.contains("Cat"));
    assert_eq!(schema_annotations(&outcome.module, "Owner").len(), 1);
    assert_eq!(schema_annotations(&outcome.module, "Cat").len(), 1);
}

#[test]
fn underivable_types_are_left_for_the_runtime() {
    let mut fx = Fixture::new();
    let list = fx.arena.declare("IntList");
    let elements = fx.arena.array(list);
    let body = fx.arena.union(&[fx.int, elements]);
    fx.arena.define(list, body);
    let returns = fx.returns_with_error(&[list]);
    let main = document("main.bal")
        .with_import(np_import())
        .with_member(type_def("IntList", list))
        .with_member(natural_fn("numbers", vec![fx.prompt_param()], Some(returns)));
    let module = Module {
        name: "numbers".into(),
        documents: vec![main],
        test_documents: Vec::new(),
    };

    let outcome = run(&fx, module);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.rewritten, 1);
    assert!(!outcome.schemas.contains("IntList"));
    assert!(schema_annotations(&outcome.module, "IntList").is_empty());
}

#[test]
fn aliases_of_non_record_types_are_annotated() {
    let mut fx = Fixture::new();
    let ints = fx.arena.array(fx.int);
    let scores = fx.arena.named("Scores", ints);
    let returns = fx.returns_with_error(&[scores]);
    let main = document("main.bal")
        .with_import(np_import())
        .with_member(type_def("Scores", scores))
        .with_member(natural_fn("rank", vec![fx.prompt_param()], Some(returns)));
    let module = Module {
        name: "scores".into(),
        documents: vec![main],
        test_documents: Vec::new(),
    };

    let outcome = run(&fx, module);
    let annotations = schema_annotations(&outcome.module, "Scores");
    assert_eq!(annotations.len(), 1);
    assert_eq!(
        payload(annotations[0]).as_value(),
        &json!({ "type": "array", "items": { "type": "integer" } })
    );
}
