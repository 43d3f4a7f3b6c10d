use crate::event::{CommentKind, IntegerKind, Primitive, StringKind};
use crate::{Error, Listener, ParserOptions, SyntaxErrorKind};

#[derive(Debug, Clone, PartialEq)]
enum Rec {
    Begin,
    End,
    BeginObject(String, String),
    BeginObjectValue(String),
    BeginMap(String),
    BeginMapValue,
    BeginList(String, String),
    BeginListValue(String),
    BeginArray(String),
    BeginArrayValue,
    EndObject,
    EndMap,
    EndList,
    EndArray,
    Property(String, OwnedPrimitive),
    Value(OwnedPrimitive),
    NullProperty(String),
    NullValue,
    Comment(String, CommentKind),
    Directive(String),
}

#[derive(Debug, Clone, PartialEq)]
enum OwnedPrimitive {
    Null,
    Boolean(bool),
    Integer(i32, IntegerKind),
    Float(f32),
    Str(String, StringKind),
    Bytes(Vec<u8>, StringKind),
}

impl From<&Primitive<'_>> for OwnedPrimitive {
    fn from(p: &Primitive<'_>) -> Self {
        match p {
            Primitive::Null => OwnedPrimitive::Null,
            Primitive::Boolean(b) => OwnedPrimitive::Boolean(*b),
            Primitive::Integer(v, k) => OwnedPrimitive::Integer(*v, *k),
            Primitive::Float(f) => OwnedPrimitive::Float(*f),
            Primitive::Str(t, k) => OwnedPrimitive::Str(t.as_str().to_string(), *k),
            Primitive::Bytes(b, k) => OwnedPrimitive::Bytes(b.as_slice().to_vec(), *k),
        }
    }
}

fn str_val(s: &str) -> OwnedPrimitive {
    OwnedPrimitive::Str(s.to_string(), StringKind::SingleLine)
}

fn int_val(v: i32, k: IntegerKind) -> OwnedPrimitive {
    OwnedPrimitive::Integer(v, k)
}

#[derive(Default)]
struct Recorder {
    events: Vec<Rec>,
    function_replies: Vec<(String, String)>,
}

impl Recorder {
    fn reply(&mut self, trigger: &str, replacement: &str) {
        self.function_replies
            .push((trigger.to_string(), replacement.to_string()));
    }
}

impl Listener for Recorder {
    fn begin(&mut self) {
        self.events.push(Rec::Begin);
    }
    fn end(&mut self) {
        self.events.push(Rec::End);
    }
    fn begin_object(&mut self, key: &str, class: &str) {
        self.events
            .push(Rec::BeginObject(key.to_string(), class.to_string()));
    }
    fn begin_object_value(&mut self, class: &str) {
        self.events.push(Rec::BeginObjectValue(class.to_string()));
    }
    fn begin_map(&mut self, key: &str) {
        self.events.push(Rec::BeginMap(key.to_string()));
    }
    fn begin_map_value(&mut self) {
        self.events.push(Rec::BeginMapValue);
    }
    fn begin_list(&mut self, key: &str, class: &str) {
        self.events
            .push(Rec::BeginList(key.to_string(), class.to_string()));
    }
    fn begin_list_value(&mut self, class: &str) {
        self.events.push(Rec::BeginListValue(class.to_string()));
    }
    fn begin_array(&mut self, key: &str) {
        self.events.push(Rec::BeginArray(key.to_string()));
    }
    fn begin_array_value(&mut self) {
        self.events.push(Rec::BeginArrayValue);
    }
    fn end_object(&mut self) {
        self.events.push(Rec::EndObject);
    }
    fn end_map(&mut self) {
        self.events.push(Rec::EndMap);
    }
    fn end_list(&mut self) {
        self.events.push(Rec::EndList);
    }
    fn end_array(&mut self) {
        self.events.push(Rec::EndArray);
    }
    fn property(&mut self, key: &str, value: &Primitive<'_>) {
        self.events
            .push(Rec::Property(key.to_string(), value.into()));
    }
    fn value(&mut self, value: &Primitive<'_>) {
        self.events.push(Rec::Value(value.into()));
    }
    fn null_property(&mut self, key: &str) {
        self.events.push(Rec::NullProperty(key.to_string()));
    }
    fn null_value(&mut self) {
        self.events.push(Rec::NullValue);
    }
    fn comment(&mut self, text: &str, kind: CommentKind) {
        self.events.push(Rec::Comment(text.to_string(), kind));
    }
    fn directive(&mut self, text: &str) {
        self.events.push(Rec::Directive(text.to_string()));
    }
    fn function(&mut self, text: &str) -> String {
        for (trigger, replacement) in &self.function_replies {
            if trigger == text {
                return replacement.clone();
            }
        }
        let mut out = String::from("\"@");
        out.push_str(text);
        out.push('"');
        out
    }
}

fn parse(input: &str) -> Recorder {
    let mut rec = Recorder::default();
    crate::parse_str(input, &mut rec, ParserOptions::default()).unwrap();
    rec
}

fn try_parse(input: &str) -> Result<Recorder, Error> {
    let mut rec = Recorder::default();
    crate::parse_str(input, &mut rec, ParserOptions::default())?;
    Ok(rec)
}

#[test]
fn scenario_bare_member() {
    let rec = parse("x: 1");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Property("x".into(), int_val(1, IntegerKind::Plain)),
            Rec::End,
        ]
    );
}

#[test]
fn scenario_quoteless_string_with_spaces() {
    let rec = parse("x: no tea");
    assert_eq!(
        rec.events,
        vec![Rec::Begin, Rec::Property("x".into(), str_val("no tea")), Rec::End]
    );
}

#[test]
fn scenario_comma_in_nonliteral_quoteless_value_is_kept() {
    let rec = parse("x: a, b c");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Property("x".into(), str_val("a, b c")),
            Rec::End,
        ]
    );
}

#[test]
fn scenario_comma_after_literal_terminates_it() {
    let rec = parse("[1, 2]");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::BeginArrayValue,
            Rec::Value(int_val(1, IntegerKind::Plain)),
            Rec::Value(int_val(2, IntegerKind::Plain)),
            Rec::EndArray,
            Rec::End,
        ]
    );
}

#[test]
fn scenario_comma_separates_quoteless_array_elements() {
    let rec = parse(r#"inventory: (item) [sword, axe, "no tea"]"#);
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::BeginList("inventory".into(), "item".into()),
            Rec::Value(str_val("sword")),
            Rec::Value(str_val("axe")),
            Rec::Value(str_val("no tea")),
            Rec::EndList,
            Rec::End,
        ]
    );
}

#[test]
fn empty_untyped_map_at_member_position_parses() {
    let rec = parse("x: {}");
    assert_eq!(
        rec.events,
        vec![Rec::Begin, Rec::BeginMap("x".into()), Rec::EndMap, Rec::End]
    );
}

#[test]
fn empty_untyped_array_as_anonymous_member_value_parses() {
    let rec = parse("[]");
    assert_eq!(
        rec.events,
        vec![Rec::Begin, Rec::BeginArrayValue, Rec::EndArray, Rec::End]
    );
}

#[test]
fn bareword_class_tag_object() {
    let rec = parse("weapon: sword { damage: 5 }");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::BeginObject("weapon".into(), "sword".into()),
            Rec::Property("damage".into(), int_val(5, IntegerKind::Plain)),
            Rec::EndObject,
            Rec::End,
        ]
    );
}

#[test]
fn parenthesized_class_tag_list() {
    let rec = parse("items: (Loot) [ 1, 2 ]");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::BeginList("items".into(), "Loot".into()),
            Rec::Value(int_val(1, IntegerKind::Plain)),
            Rec::Value(int_val(2, IntegerKind::Plain)),
            Rec::EndList,
            Rec::End,
        ]
    );
}

#[test]
fn parenthesized_class_tag_requires_opener() {
    let err = try_parse("x: (Foo) bar").unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax {
            kind: SyntaxErrorKind::ExpectedContainerAfterClassTag,
            ..
        }
    ));
}

#[test]
fn anonymous_root_class_tag_object() {
    let rec = parse("Player { hp: 10 }");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::BeginObjectValue("Player".into()),
            Rec::Property("hp".into(), int_val(10, IntegerKind::Plain)),
            Rec::EndObject,
            Rec::End,
        ]
    );
}

#[test]
fn hex_and_binary_integers() {
    let rec = parse("a: 0xFF\nb: %1010");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Property("a".into(), int_val(255, IntegerKind::Hex)),
            Rec::Property("b".into(), int_val(10, IntegerKind::Binary)),
            Rec::End,
        ]
    );
}

#[test]
fn hex_reinterprets_as_32_bit_word() {
    let rec = parse("a: 0xFFFFFFFF");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Property("a".into(), int_val(-1, IntegerKind::Hex)),
            Rec::End,
        ]
    );
}

#[test]
fn overflowing_decimal_demotes_to_string() {
    let rec = parse("a: 99999999999999999999");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Property("a".into(), str_val("99999999999999999999")),
            Rec::End,
        ]
    );
}

#[test]
fn quoted_string_escapes() {
    let rec = parse(r#"x: "a\nbA""#);
    assert_eq!(
        rec.events,
        vec![Rec::Begin, Rec::Property("x".into(), str_val("a\nbA")), Rec::End]
    );
}

#[test]
fn newline_in_quoted_string_is_an_error() {
    let err = try_parse("x: \"a\nb\"").unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax {
            kind: SyntaxErrorKind::NewlineInQuotedString,
            ..
        }
    ));
}

#[test]
fn triple_quoted_string_strips_alignment_and_blank_first_line() {
    let input = "x: '''\n    hello\n    world\n    '''";
    let rec = parse(input);
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Property(
                "x".into(),
                OwnedPrimitive::Str("hello\nworld".into(), StringKind::MultiLine)
            ),
            Rec::End,
        ]
    );
}

#[test]
fn triple_quoted_string_single_line_strips_leading_run_only() {
    let rec = parse("x: '''   hello'''");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Property(
                "x".into(),
                OwnedPrimitive::Str("hello".into(), StringKind::MultiLine)
            ),
            Rec::End,
        ]
    );
}

#[test]
fn quoted_and_triple_bytes_decode_base64() {
    let rec = parse("a: `aGk=`\nb: <<<\naGk=\n>>>");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Property(
                "a".into(),
                OwnedPrimitive::Bytes(b"hi".to_vec(), StringKind::SingleLine)
            ),
            Rec::Property(
                "b".into(),
                OwnedPrimitive::Bytes(b"hi".to_vec(), StringKind::MultiLine)
            ),
            Rec::End,
        ]
    );
}

#[test]
fn invalid_base64_byte_is_an_error() {
    let err = try_parse("a: `@@@@`").unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax {
            kind: SyntaxErrorKind::InvalidBase64,
            ..
        }
    ));
}

#[test]
fn comments_are_reported_and_skipped() {
    let rec = parse("// leading\nx: 1 # trailing\n/* block */\n");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Comment(" leading".into(), CommentKind::SlashSlash),
            Rec::Property("x".into(), int_val(1, IntegerKind::Plain)),
            Rec::Comment(" trailing".into(), CommentKind::Hash),
            Rec::Comment(" block ".into(), CommentKind::Block),
            Rec::End,
        ]
    );
}

#[test]
fn root_directive_is_reported() {
    let rec = parse("#thjson v1\nx: 1");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Directive("thjson v1".into()),
            Rec::Property("x".into(), int_val(1, IntegerKind::Plain)),
            Rec::End,
        ]
    );
}

#[test]
fn function_call_default_passthrough_quotes_text() {
    let rec = parse("x: @env HOME");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Property("x".into(), str_val("@env HOME")),
            Rec::End,
        ]
    );
}

#[test]
fn function_call_expands_into_listener_supplied_text() {
    let mut rec = Recorder::default();
    rec.reply("double 21", "42");
    crate::parse_str("x: @double 21", &mut rec, ParserOptions::default()).unwrap();
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Property("x".into(), int_val(42, IntegerKind::Plain)),
            Rec::End,
        ]
    );
}

#[test]
fn function_call_recursion_is_bounded() {
    let mut rec = Recorder::default();
    rec.reply("loop", "@loop");
    let options = ParserOptions {
        max_recursion: 3,
        ..ParserOptions::default()
    };
    let err = crate::parse_str("x: @loop", &mut rec, options).unwrap_err();
    assert!(matches!(err, Error::RecursionLimit { .. }));
}

#[test]
fn root_without_braces_allows_multiple_anonymous_values() {
    let rec = parse("1\n2\n");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::Value(int_val(1, IntegerKind::Plain)),
            Rec::Value(int_val(2, IntegerKind::Plain)),
            Rec::End,
        ]
    );
}

#[test]
fn null_and_boolean_literals() {
    let rec = parse("a: null\nb: true\nc: false");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::NullProperty("a".into()),
            Rec::Property("b".into(), OwnedPrimitive::Boolean(true)),
            Rec::Property("c".into(), OwnedPrimitive::Boolean(false)),
            Rec::End,
        ]
    );
}

#[test]
fn nested_arrays_and_maps() {
    let rec = parse("a: [1, { b: 2 }]");
    assert_eq!(
        rec.events,
        vec![
            Rec::Begin,
            Rec::BeginArray("a".into()),
            Rec::Value(int_val(1, IntegerKind::Plain)),
            Rec::BeginMapValue,
            Rec::Property("b".into(), int_val(2, IntegerKind::Plain)),
            Rec::EndMap,
            Rec::EndArray,
            Rec::End,
        ]
    );
}

#[test]
fn empty_class_tag_is_an_error() {
    let err = try_parse("x: () {}").unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax {
            kind: SyntaxErrorKind::EmptyClassTag,
            ..
        }
    ));
}

#[test]
fn from_reader_matches_from_str() {
    let mut rec_slice = Recorder::default();
    crate::parse_str("x: 1", &mut rec_slice, ParserOptions::default()).unwrap();
    let mut rec_reader = Recorder::default();
    crate::parse_reader(
        std::io::Cursor::new(b"x: 1".to_vec()),
        &mut rec_reader,
        ParserOptions::default(),
    )
    .unwrap();
    assert_eq!(rec_slice.events, rec_reader.events);
}
