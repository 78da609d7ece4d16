//! Property-based tests for the core format guarantees: escaping is an
//! involution, field splitting survives arbitrary escaped content, and
//! decode/encode round-trips are stable at the tree level.

use linestruct::{decode, decode_with_options, encode, escape, unescape, DecodeOptions, Map, Value};
use proptest::prelude::*;

/// Scalar content including every structural code point, but not the
/// escape itself: an unescaped escape consumes whatever code point
/// follows it, so it cannot round-trip as data.
fn scalar() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zA-Z0-9 ¦‹›«»|{}:,.-]{1,16}").unwrap()
}

proptest! {
    #[test]
    fn prop_escape_unescape_involution(s in scalar()) {
        prop_assert_eq!(unescape(&escape(&s)), s);
    }

    #[test]
    fn prop_escaped_scalars_survive_a_row(values in prop::collection::vec(scalar(), 1..6)) {
        // Build a document with one string column per value and decode it
        // back; the splitter must not trip over any escaped special.
        let schema: Vec<String> = (0..values.len()).map(|i| format!("f{}:string", i)).collect();
        let row: Vec<String> = values.iter().map(|v| escape(v)).collect();
        let input = format!(
            "EntityName:T\nschema:{}\n{}\n",
            schema.join("¦"),
            row.join("¦")
        );

        let doc = decode_with_options(&input, &DecodeOptions::strict()).unwrap();
        prop_assert_eq!(doc.rows.len(), 1);
        for (i, expected) in values.iter().enumerate() {
            let got = doc.rows[0].get(&format!("f{}", i)).and_then(|v| v.as_str());
            prop_assert_eq!(got, Some(expected.as_str()));
        }
    }

    #[test]
    fn prop_flat_rows_round_trip(
        rows in prop::collection::vec(
            (any::<i64>(), any::<bool>(), scalar(), prop::num::f64::NORMAL),
            1..8,
        )
    ) {
        let maps: Vec<Map> = rows
            .iter()
            .map(|(id, flag, label, score)| {
                let mut map = Map::new();
                map.insert("id".to_string(), Value::Int(*id));
                map.insert("flag".to_string(), Value::Bool(*flag));
                map.insert("label".to_string(), Value::String(label.clone()));
                map.insert("score".to_string(), Value::Float(*score));
                map
            })
            .collect();

        let text = encode("Props", &maps);
        let doc = decode(&text).unwrap();
        prop_assert_eq!(doc.rows, maps);
    }

    #[test]
    fn prop_string_arrays_round_trip(
        arrays in prop::collection::vec(prop::collection::vec(scalar(), 0..5), 1..5)
    ) {
        let maps: Vec<Map> = arrays
            .iter()
            .enumerate()
            .map(|(i, items)| {
                let mut map = Map::new();
                map.insert("id".to_string(), Value::Int(i as i64));
                map.insert(
                    "items".to_string(),
                    Value::Array(items.iter().cloned().map(Value::String).collect()),
                );
                map
            })
            .collect();

        let text = encode("Arrays", &maps);
        let doc = decode(&text).unwrap();
        prop_assert_eq!(doc.rows, maps);
    }

    #[test]
    fn prop_encode_decode_encode_is_stable(
        rows in prop::collection::vec((any::<i64>(), scalar()), 1..6)
    ) {
        let maps: Vec<Map> = rows
            .iter()
            .map(|(id, label)| {
                let mut map = Map::new();
                map.insert("id".to_string(), Value::Int(*id));
                map.insert("label".to_string(), Value::String(label.clone()));
                map
            })
            .collect();

        let once = encode("Stable", &maps);
        let doc = decode(&once).unwrap();
        let twice = encode("Stable", &doc.rows);
        prop_assert_eq!(once, twice);
    }
}
