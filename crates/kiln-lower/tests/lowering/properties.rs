//! `message` / `cause` reads

use super::harness::*;

/// `class Custom(s: String) : Throwable(s)`
fn custom_class(rt: &mut Runtime) -> (Subclass, IrFile) {
    let custom = rt.subclass("Custom", None, vec![Parameter::new("s", IrType::string())]);
    let b = builder();
    let file = class_file(
        "Custom.kt",
        custom.class,
        custom.ctor,
        vec![b
            .delegating_call(
                rt.ctor_message,
                vec![b.get_value(ValueRef::Parameter(0), IrType::string())],
            )
            .into()],
    );
    (custom, file)
}

/// `class Loud : Throwable() { override val message get() = "LOUD" }`
struct Loud {
    class: ClassId,
    ctor: FunctionId,
    message_getter: FunctionId,
}

fn loud_class(rt: &mut Runtime, file: &mut IrFile) -> Loud {
    let class = rt
        .symbols
        .declare_class(ClassDecl::new("app", "Loud").with_supertypes(vec![rt.throwable]));
    let ctor = rt.symbols.declare_constructor(class, vec![], DeclOrigin::Source);
    let message = rt
        .symbols
        .declare_property(class, "message", string_n(), DeclOrigin::Source);
    let message_getter = rt
        .symbols
        .declare_getter(message, DeclOrigin::Source, vec![rt.message_getter]);

    let b = builder();
    file.add_declaration(FileDeclaration::Class {
        class,
        members: vec![
            FileDeclaration::Function(FunctionBody::new(
                ctor,
                vec![b.delegating_call(rt.ctor_empty, vec![]).into()],
            )),
            FileDeclaration::Function(FunctionBody::new(
                message_getter,
                vec![Statement::Return(Some(b.string("LOUD")))],
            )),
        ],
    });

    Loud {
        class,
        ctor,
        message_getter,
    }
}

fn main_return(file: &IrFile, main: FunctionId) -> &Expr {
    match file.body_of(main).map(|body| &body.statements[..]) {
        Some([Statement::Return(Some(value))]) => value,
        other => panic!("unexpected main body: {:?}", other),
    }
}

#[test]
fn test_message_through_subclass_becomes_field_read() {
    let mut rt = runtime();
    let (custom, mut file) = custom_class(&mut rt);
    let main = rt.function("main", string_n());
    let b = builder();

    // Custom("boom").message
    let instance = b.call(IrType::class(custom.class), custom.ctor, None, vec![b.string("boom")]);
    add_main(
        &mut file,
        main,
        b.call(string_n(), custom.message_getter, Some(instance), vec![]),
    );

    let stats = rt.lower(&mut file);
    assert_eq!(stats.property_reads, 1);

    let read = main_return(&file, main);
    assert!(read.is_call_to(rt.field_get));
    assert_eq!(read.ty, string_n());

    let mut eval = rt.evaluator(&file);
    assert_eq!(eval.call(main, None, vec![]), Ok(Value::string("boom")));
}

#[test]
fn test_base_getter_on_lowered_construction() {
    let mut rt = runtime();
    let main = rt.function("main", string_n());
    let b = builder();

    // Throwable("direct").message
    let instance = b.call(rt.throwable_type(), rt.ctor_message, None, vec![b.string("direct")]);
    let mut file = IrFile::new("Main.kt");
    add_main(
        &mut file,
        main,
        b.call(string_n(), rt.message_getter, Some(instance), vec![]),
    );

    let stats = rt.lower(&mut file);
    assert_eq!(stats.constructor_calls, 1);
    assert_eq!(stats.property_reads, 1);

    let mut eval = rt.evaluator(&file);
    assert_eq!(eval.call(main, None, vec![]), Ok(Value::string("direct")));
}

#[test]
fn test_cause_then_message_chain() {
    let mut rt = runtime();
    let throwable_n = rt.throwable_type().make_nullable();
    let wrapper = rt.subclass("Wrapper", None, vec![Parameter::new("t", throwable_n)]);
    let main = rt.function("main", string_n());
    let b = builder();

    let mut file = class_file(
        "Wrapper.kt",
        wrapper.class,
        wrapper.ctor,
        vec![b
            .delegating_call(rt.ctor_cause, vec![b.get_value(ValueRef::Parameter(0), throwable_n)])
            .into()],
    );

    // Wrapper(Throwable("inner")).cause.message
    let inner = b.call(rt.throwable_type(), rt.ctor_message, None, vec![b.string("inner")]);
    let wrapped = b.call(IrType::class(wrapper.class), wrapper.ctor, None, vec![inner]);
    let cause = b.call(throwable_n, wrapper.cause_getter, Some(wrapped), vec![]);
    add_main(
        &mut file,
        main,
        b.call(string_n(), rt.message_getter, Some(cause), vec![]),
    );

    let stats = rt.lower(&mut file);
    assert_eq!(stats.property_reads, 2);

    let mut eval = rt.evaluator(&file);
    assert_eq!(eval.call(main, None, vec![]), Ok(Value::string("inner")));
}

#[test]
fn test_synthetic_chain_of_subclasses() {
    let mut rt = runtime();
    let (custom, mut file) = custom_class(&mut rt);
    let leaf = rt.subclass("Leaf", Some(&custom), vec![Parameter::new("s", IrType::string())]);
    let main = rt.function("main", string_n());
    let b = builder();

    file.add_declaration(FileDeclaration::Class {
        class: leaf.class,
        members: vec![FileDeclaration::Function(FunctionBody::new(
            leaf.ctor,
            vec![b
                .delegating_call(
                    custom.ctor,
                    vec![b.get_value(ValueRef::Parameter(0), IrType::string())],
                )
                .into()],
        ))],
    });
    let instance = b.call(IrType::class(leaf.class), leaf.ctor, None, vec![b.string("deep")]);
    add_main(
        &mut file,
        main,
        b.call(string_n(), leaf.message_getter, Some(instance), vec![]),
    );

    let stats = rt.lower(&mut file);
    assert_eq!(stats.property_reads, 1);
    assert!(main_return(&file, main).is_call_to(rt.field_get));

    let mut eval = rt.evaluator(&file);
    assert_eq!(eval.call(main, None, vec![]), Ok(Value::string("deep")));
}

#[test]
fn test_genuine_override_is_kept() {
    let mut rt = runtime();
    let mut file = IrFile::new("Loud.kt");
    let loud = loud_class(&mut rt, &mut file);
    let main = rt.function("main", string_n());
    let b = builder();

    let instance = b.call(IrType::class(loud.class), loud.ctor, None, vec![]);
    add_main(
        &mut file,
        main,
        b.call(string_n(), loud.message_getter, Some(instance), vec![]),
    );

    let stats = rt.lower(&mut file);
    assert_eq!(stats.property_reads, 0);
    assert_eq!(stats.delegating_calls, 1);
    assert!(main_return(&file, main).is_call_to(loud.message_getter));

    let mut eval = rt.evaluator(&file);
    assert_eq!(eval.call(main, None, vec![]), Ok(Value::string("LOUD")));
}

#[test]
fn test_synthetic_override_of_genuine_override_is_kept() {
    let mut rt = runtime();
    let mut file = IrFile::new("Loud.kt");
    let loud = loud_class(&mut rt, &mut file);

    // class Quiet : Loud()  (inherits Loud's message)
    let quiet = rt
        .symbols
        .declare_class(ClassDecl::new("app", "Quiet").with_supertypes(vec![loud.class]));
    let quiet_ctor = rt.symbols.declare_constructor(quiet, vec![], DeclOrigin::Source);
    let message = rt
        .symbols
        .declare_property(quiet, "message", string_n(), DeclOrigin::SyntheticOverride);
    let quiet_getter = rt.symbols.declare_getter(
        message,
        DeclOrigin::SyntheticOverride,
        vec![loud.message_getter],
    );
    let main = rt.function("main", string_n());
    let b = builder();

    file.add_declaration(FileDeclaration::Class {
        class: quiet,
        members: vec![FileDeclaration::Function(FunctionBody::new(
            quiet_ctor,
            vec![b.delegating_call(loud.ctor, vec![]).into()],
        ))],
    });
    let instance = b.call(IrType::class(quiet), quiet_ctor, None, vec![]);
    add_main(
        &mut file,
        main,
        b.call(string_n(), quiet_getter, Some(instance), vec![]),
    );

    let stats = rt.lower(&mut file);
    assert_eq!(stats.property_reads, 0);
    assert!(main_return(&file, main).is_call_to(quiet_getter));

    let mut eval = rt.evaluator(&file);
    assert_eq!(eval.call(main, None, vec![]), Ok(Value::string("LOUD")));
}

#[test]
fn test_unrelated_getter_is_kept() {
    let mut rt = runtime();
    let (custom, mut file) = custom_class(&mut rt);
    let code = rt
        .symbols
        .declare_property(custom.class, "code", IrType::int(), DeclOrigin::Source);
    let code_getter = rt.symbols.declare_getter(code, DeclOrigin::Source, vec![]);
    let main = rt.function("main", IrType::int());
    let b = builder();

    let instance = b.call(IrType::class(custom.class), custom.ctor, None, vec![b.string("x")]);
    add_main(
        &mut file,
        main,
        b.call(IrType::int(), code_getter, Some(instance), vec![]),
    );

    let stats = rt.lower(&mut file);
    assert_eq!(stats.property_reads, 0);
    assert!(main_return(&file, main).is_call_to(code_getter));
}
