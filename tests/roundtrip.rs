//! Round-trip properties: parsing serialized output should reproduce the original value
//! tree, and repeated serialization with fixed options should be stable.
use burnish_json::{parse, serialize, JsonValue};

fn sample_tree() -> JsonValue {
    JsonValue::Object(vec![
        ("zeta".to_string(), JsonValue::Null),
        (
            "items".to_string(),
            JsonValue::Array(vec![
                JsonValue::Integer(1),
                JsonValue::Float(2.5),
                JsonValue::Boolean(false),
                JsonValue::String("nested \"text\"\nwith lines".to_string()),
                JsonValue::Object(vec![(
                    "inner".to_string(),
                    JsonValue::Array(vec![]),
                )]),
            ]),
        ),
        ("alpha".to_string(), JsonValue::Integer(-42)),
    ])
}

#[test]
fn compact_output_should_round_trip() {
    let value = sample_tree();
    let text = serialize(&value, 0, false);
    assert_eq!(parse(&text).unwrap(), value);
}

#[test]
fn indented_output_should_round_trip() {
    let value = sample_tree();
    for indent in [1, 2, 4, 8] {
        let text = serialize(&value, indent, false);
        assert_eq!(parse(&text).unwrap(), value, "failed at indent {}", indent);
    }
}

#[test]
fn serialization_should_be_idempotent() {
    let value = sample_tree();
    let first = serialize(&value, 2, true);
    let reparsed = parse(&first).unwrap();
    assert_eq!(serialize(&reparsed, 2, true), first);
}

#[test]
fn control_characters_and_quotes_should_survive_a_round_trip() {
    for raw in [
        "\u{0000}\u{0001}\u{001f}",
        "quote \" backslash \\ slash /",
        "newline\ntab\tcr\r",
        "mixed é 😀 \u{0007}",
    ] {
        let value = JsonValue::String(raw.to_string());
        let text = serialize(&value, 0, false);
        assert_eq!(parse(&text).unwrap(), value, "failed for {:?}", raw);
    }
}

#[test]
fn escaped_codepoints_should_parse_to_decoded_strings() {
    let value = parse(r#""\u00e9""#).unwrap();
    assert_eq!(value, JsonValue::String("é".to_string()));
    let text = serialize(&value, 4, false);
    assert_eq!(parse(&text).unwrap(), value);
}

#[test]
fn numbers_should_round_trip_through_text() {
    let text = "[0,-1,42,3.14,-0.001,10000000000.0,0.0025]";
    let value = parse(text).unwrap();
    assert_eq!(serialize(&value, 0, false), text);
}
