use curly::{
    CompileError, CompileOptions, CompiledTemplate, Fields, RenderOptions, Strictness, Value,
};

macro_rules! ctx {
    () => {
        Value::Map(std::collections::BTreeMap::new())
    };
    ($($key:literal => $value:expr),+ $(,)?) => {
        Value::from_iter([$(($key, Value::from($value))),+])
    };
}

macro_rules! list {
    ($($item:expr),* $(,)?) => {
        Value::List(vec![$($item),*])
    };
}

/// Install a fmt subscriber once so the engine's tracing output (compile
/// events, render spans, dead-content warnings) is visible in test runs
/// via `RUST_LOG`.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn render(source: &str, context: &Value) -> String {
    init_tracing();
    CompiledTemplate::compile(source)
        .expect("compile failed")
        .render(context)
        .expect("render failed")
}

// ── Progressively complex good cases ────────────────────────────────────

#[test]
fn test_literals_round_trip() {
    let cases = ["", "a", "hi there", "no braces at all\nacross lines"];
    for source in cases {
        assert_eq!(render(source, &ctx! {}), source, "source: {source:?}");
    }
}

#[test]
fn test_simple_substitutions() {
    let cases: Vec<(&str, Value, &str)> = vec![
        ("{=status}", ctx! { "status" => "STATUS" }, "STATUS"),
        ("{=status}", ctx! { "status" => 67.2334 }, "67.2334"),
        ("{=status}", ctx! { "status" => Value::Null }, ""),
        ("{=status}", ctx! { "status" => false }, "false"),
        ("BEFORE{=status}", ctx! { "status" => "STATUS" }, "BEFORESTATUS"),
        ("{=status}AFTER", ctx! { "status" => "STATUS" }, "STATUSAFTER"),
    ];
    for (source, context, expected) in cases {
        assert_eq!(render(source, &context), expected, "source: {source:?}");
    }
}

#[test]
fn test_substitutions_with_text_between() {
    let two = ctx! { "one" => "ONE", "two" => "TWO" };
    let cases = [
        ("{=one}{=two}", "ONETWO"),
        ("{=one}AND{=two}", "ONEANDTWO"),
        ("{=one} {=two}", "ONE TWO"),
        ("{=one}   {=two}", "ONE   TWO"),
        ("{=one}, {=two}", "ONE, TWO"),
        ("{=one} ({=two})", "ONE (TWO)"),
    ];
    for (source, expected) in cases {
        assert_eq!(render(source, &two), expected, "source: {source:?}");
    }

    assert_eq!(
        render(
            "well{=here}it{=goes}with{=some}test",
            &ctx! { "here" => "HERE", "goes" => "GOES", "some" => "SOME" },
        ),
        "wellHEREitGOESwithSOMEtest"
    );
}

#[test]
fn test_conditional_wrapping_markup() {
    assert_eq!(
        render(
            r#"{?useimg hallo <img src="path/names/{=component}/with/{=component}.jpg">}"#,
            &ctx! { "useimg" => true, "component" => "filesystem" },
        ),
        r#"hallo <img src="path/names/filesystem/with/filesystem.jpg">"#
    );
}

#[test]
fn test_simple_repetitions() {
    let colors = ctx! {
        "cls" => list![
            ctx! { "co" => "red" },
            ctx! { "co" => "gr" },
            ctx! { "co" => "bl" },
        ]
    };
    let cases = [
        ("{#cls{=co}}", "redgrbl"),
        ("{#cls <{=co}>}", "<red><gr><bl>"),
        ("{#cls {=co}, }", "red, gr, bl, "),
        ("{#cls {=co} x }", "red x gr x bl x "),
        ("{#cls {=co} _}", "red _gr _bl _"),
    ];
    for (source, expected) in cases {
        assert_eq!(render(source, &colors), expected, "source: {source:?}");
    }
}

#[test]
fn test_conditional_truthiness() {
    let cases: Vec<(&str, Value, &str)> = vec![
        ("throw a {?condition big }party", ctx! { "condition" => true }, "throw a big party"),
        ("throw a {?condition big }tantrum", ctx! { "condition" => 42i64 }, "throw a big tantrum"),
        ("throw a {?condition big }party", ctx! { "condition" => false }, "throw a party"),
        ("throw a {?condition big }tantrum", ctx! { "condition" => Value::Null }, "throw a tantrum"),
        // Non-empty strings and lists are truthy; empty ones are not.
        ("{?c X}", ctx! { "c" => "no" }, "X"),
        ("{?c X}", ctx! { "c" => "" }, ""),
        ("{?c X}", ctx! { "c" => list![Value::Null] }, "X"),
        ("{?c X}", ctx! { "c" => list![] }, ""),
        ("{?c X}", ctx! { "c" => 0i64 }, ""),
    ];
    for (source, context, expected) in cases {
        assert_eq!(render(source, &context), expected, "source: {source:?}");
    }
}

#[test]
fn test_inverted_conditional_pair() {
    let source = "A!{?condition B}!C!{!condition D}!E";
    assert_eq!(render(source, &ctx! { "condition" => true }), "A!B!C!!E");
    assert_eq!(render(source, &ctx! { "condition" => false }), "A!!C!D!E");
}

#[test]
fn test_repetition_bodies() {
    let cases: Vec<(&str, Value, &str)> = vec![
        (
            "{#a{=b}{=c}}",
            ctx! { "a" => list![ctx! { "b" => 11i64, "c" => 22i64 }] },
            "1122",
        ),
        (
            "{#a {=b} {=c}}",
            ctx! { "a" => list![ctx! { "b" => 33i64, "c" => 44i64 }] },
            "33 44",
        ),
        (
            "{#a STA{=b}STO  BEG{=c}END }",
            ctx! { "a" => list![ctx! { "b" => 55i64, "c" => 66i64 }] },
            "STA55STO  BEG66END ",
        ),
        (
            "{#a {=b} {=c}}",
            ctx! {
                "a" => list![
                    ctx! { "b" => 7.70, "c" => 88i64 },
                    ctx! { "b" => 99i64, "c" => 1.234567 },
                ]
            },
            "7.7 8899 1.234567",
        ),
        ("{#a {=b} {=c}}", ctx! { "a" => list![] }, ""),
    ];
    for (source, context, expected) in cases {
        assert_eq!(render(source, &context), expected, "source: {source:?}");
    }
}

#[test]
fn test_directive_name_terminated_by_newline() {
    let blop = ctx! {
        "blop" => list![ctx! { "you" => 123i64 }, ctx! { "you" => 456i64 }]
    };
    assert_eq!(render("{#blop\n{=you}}", &blop), "123456");
    assert_eq!(render("{#blop\n{=you}\n}", &blop), "123\n456\n");
}

#[test]
fn test_separator_join() {
    assert_eq!(
        render(
            "{#colors {=color}{/comma , }}",
            &ctx! {
                "colors" => list![
                    ctx! { "color" => "red" },
                    ctx! { "color" => "green" },
                    ctx! { "color" => "blue" },
                ]
            },
        ),
        "red, green, blue"
    );
}

#[test]
fn test_repetition_mixed_with_outer_substitutions() {
    assert_eq!(
        render(
            "buy {=count} articles: {#articles {=nam} txt {=pri}, }",
            &ctx! {
                "count" => 2i64,
                "articles" => list![
                    ctx! { "nam" => "Ur", "pri" => 1i64 },
                    ctx! { "nam" => "Mo", "pri" => 2i64 },
                ]
            },
        ),
        "buy 2 articles: Ur txt 1, Mo txt 2, "
    );

    assert_eq!(
        render(
            "sell {=count} stocks: {#articles {=nam} &euro; {=pri}{/comma , }}",
            &ctx! {
                "count" => 2i64,
                "articles" => list![
                    ctx! { "nam" => "APPL", "pri" => 320i64 },
                    ctx! { "nam" => "GOOG", "pri" => 120i64 },
                ]
            },
        ),
        "sell 2 stocks: APPL &euro; 320, GOOG &euro; 120"
    );
}

#[test]
fn test_nested_repetitions() {
    // The outer block's closing brace is missing: end-of-input closes it.
    assert_eq!(
        render(
            "Contents: {#chapters Chapter {=name}. {#sections Section {=name}. }",
            &ctx! {
                "chapters" => list![
                    ctx! {
                        "name" => "Intro",
                        "sections" => list![
                            ctx! { "name" => "Foreword" },
                            ctx! { "name" => "Methodology" },
                        ]
                    },
                    ctx! {
                        "name" => "Middle",
                        "sections" => list![
                            ctx! { "name" => "Measuring" },
                            ctx! { "name" => "Calculation" },
                            ctx! { "name" => "Results" },
                        ]
                    },
                    ctx! {
                        "name" => "Epilogue",
                        "sections" => list![ctx! { "name" => "Conclusion" }]
                    },
                ]
            },
        ),
        "Contents: Chapter Intro. Section Foreword. Section Methodology. \
         Chapter Middle. Section Measuring. Section Calculation. Section Results. \
         Chapter Epilogue. Section Conclusion. "
    );
}

#[test]
fn test_inner_last_flag_does_not_leak_into_outer_separator() {
    // Each inner repetition ends on its own last element, which must not
    // suppress the outer repetition's separator.
    assert_eq!(
        render(
            "{#outer {#inner {=x}{/s , }}{/os ; }}",
            &ctx! {
                "outer" => list![
                    ctx! { "inner" => list![ctx! { "x" => "a" }, ctx! { "x" => "b" }] },
                    ctx! { "inner" => list![ctx! { "x" => "c" }] },
                ]
            },
        ),
        "a, b; c"
    );
}

#[test]
fn test_conditional_containing_repetition() {
    assert_eq!(
        render(
            "Dear {=name}, {?market Please get the following groceries:\n\
             {#groceries \tItem: {=item}, {=count} pieces\n}}\
             {?deadline Please be back before {=time}!}",
            &ctx! {
                "name" => "Joe",
                "market" => "True",
                "count" => 5i64,
                "groceries" => list![
                    ctx! { "item" => "lemon", "count" => 2i64 },
                    ctx! { "item" => "cookies", "count" => 4i64 },
                ],
                "deadline" => true,
                "time" => "17:30",
            },
        ),
        "Dear Joe, Please get the following groceries:\n\tItem: \
         lemon, 2 pieces\n\tItem: cookies, 4 pieces\nPlease be \
         back before 17:30!"
    );
}

// ── Record contexts (attribute-style lookup) ────────────────────────────

struct Entry {
    name: &'static str,
    telephone: &'static str,
}

impl Fields for Entry {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(self.name.into()),
            "telephone" => Some(self.telephone.into()),
            _ => None,
        }
    }
}

#[test]
fn test_record_elements_resolve_by_field() {
    let phonebook = ctx! {
        "phonebook" => list![
            Value::record(Entry { name: "Mary", telephone: "0203898" }),
            Value::record(Entry { name: "Jan", telephone: "0683928" }),
        ]
    };
    assert_eq!(
        render("{#phonebook {=name} {=telephone}{/sep , }}", &phonebook),
        "Mary 0203898, Jan 0683928"
    );
}

#[test]
fn test_conditional_resolves_record_fields() {
    // Conditionals use the same key-then-attribute lookup as
    // substitutions: a present field is truthy-checked, a missing one
    // counts as false.
    let context = Value::record(Entry {
        name: "Mary",
        telephone: "0203898",
    });
    assert_eq!(render("{?name X}{!name Y}", &context), "X");
    assert_eq!(render("{?address X}{!address Y}", &context), "Y");
}

#[test]
fn test_record_missing_field_is_unknown_variable() {
    let context = ctx! { "phonebook" => list![Value::record(Entry {
        name: "Mary",
        telephone: "0203898",
    })] };
    let out = render("{#phonebook {=address}}", &context);
    assert!(out.contains("unknown variable"));
    assert!(out.contains("\"address\""));
}

// ── Error behavior across modes ─────────────────────────────────────────

#[test]
fn test_unbalanced_close_fails_in_both_modes() {
    for strictness in [Strictness::Lenient, Strictness::Strict] {
        let options = CompileOptions::new().strictness(strictness);
        let result = CompiledTemplate::compile_with_options("=a}", &options);
        assert!(
            matches!(result, Err(CompileError::UnbalancedCloseBrace { .. })),
            "strictness: {strictness:?}"
        );
    }
}

#[test]
fn test_bad_operator_strict_vs_lenient() {
    // '&' is not a directive operator.
    let strict = CompileOptions::new().strictness(Strictness::Strict);
    assert!(matches!(
        CompiledTemplate::compile_with_options("{&name}", &strict),
        Err(CompileError::UnrecognizedDirective { .. })
    ));

    let out = render("{&name}", &ctx! {});
    assert!(out.contains("template error"));
}

#[test]
fn test_lenient_markers_distinguish_directive_kinds() {
    let sub = render("{=nope}", &ctx! {});
    let rep = render("{#nope x}", &ctx! {});
    assert!(sub.contains("substitution"));
    assert!(rep.contains("repetition"));
    assert_ne!(sub, rep);
}

#[test]
fn test_lenient_render_keeps_going_after_a_marker() {
    let out = render("a {=nope} b {=ok} c", &ctx! { "ok" => "OK" });
    assert!(out.starts_with("a ["));
    assert!(out.ends_with(" b OK c"));
}

#[test]
fn test_strict_render_aborts() {
    let template = CompiledTemplate::compile("a {=nope} b").unwrap();
    let options = RenderOptions::new().strictness(Strictness::Strict);
    assert!(template.render_with_options(&ctx! {}, &options).is_err());
}

// ── Concurrency ─────────────────────────────────────────────────────────

#[test]
fn test_shared_template_renders_from_multiple_threads() {
    let template = std::sync::Arc::new(
        CompiledTemplate::compile("{#items <{=id}>}").unwrap(),
    );

    let handles: Vec<_> = (0..4i64)
        .map(|t| {
            let template = template.clone();
            std::thread::spawn(move || {
                let context = ctx! {
                    "items" => list![ctx! { "id" => t }, ctx! { "id" => t + 10 }]
                };
                template.render(&context).unwrap()
            })
        })
        .collect();

    for (t, handle) in handles.into_iter().enumerate() {
        let t = t as i64;
        assert_eq!(handle.join().unwrap(), format!("<{t}><{}>", t + 10));
    }
}
