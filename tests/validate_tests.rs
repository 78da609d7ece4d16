use linestruct::{
    is_valid_document, schema_from_yaml, schema_to_yaml, validate_against, validate_against_yaml,
    Schema,
};

const ORDERS: &str = "\
EntityName:Order
schema:id:int¦customer:‹name:string¦email:string›¦items:«‹product:string¦price:float›»¦status:{pending|shipped}
1¦‹John¦j@x.com›¦«‹Laptop¦999.99›»¦pending
";

#[test]
fn test_valid_document() {
    assert!(is_valid_document(ORDERS));
}

#[test]
fn test_invalid_documents() {
    // Value of the wrong type.
    assert!(!is_valid_document("EntityName:P\nschema:id:int\nabc\n"));
    // Too many values.
    assert!(!is_valid_document("EntityName:P\nschema:id:int\n1¦2\n"));
    // Missing required value.
    assert!(!is_valid_document("EntityName:P\nschema:id:int¦n:string\n1\n"));
    // Bad date shape.
    assert!(!is_valid_document("EntityName:P\nschema:d:date\n2024/01/01\n"));
    // No schema line at all.
    assert!(!is_valid_document("EntityName:P\n1¦2\n"));
}

#[test]
fn test_validate_against_matching_schema() {
    let external = Schema::parse(
        "schema:id:int¦customer:‹name:string¦email:string›¦items:«‹product:string¦price:float›»¦status:{pending|shipped|delivered}",
    )
    .unwrap();
    // External enum is a superset; that is compatible.
    assert_eq!(validate_against(&external, ORDERS), None);
}

#[test]
fn test_validate_against_reports_line_numbers() {
    let external = Schema::parse("schema:id:int¦name:string").unwrap();
    let doc = "\
EntityName:P
schema:id:int¦name:string
1¦John
two¦Jane
";
    let diag = validate_against(&external, doc).unwrap();
    assert!(diag.starts_with("Line 4:"), "diagnostic was: {}", diag);
    assert!(diag.contains("id"));
}

#[test]
fn test_validate_against_type_conflict() {
    let external = Schema::parse("schema:id:string").unwrap();
    let doc = "EntityName:P\nschema:id:int\n1\n";
    let diag = validate_against(&external, doc).unwrap();
    assert!(diag.contains("type mismatch"), "diagnostic was: {}", diag);
}

#[test]
fn test_yaml_aliases_are_normalized() {
    let yaml = "\
fields:
  id:
    type: integer
    required: true
  name:
    type: str
    required: true
  score:
    type: double
    required: false
  active:
    type: boolean
    required: true
";
    let doc = "\
EntityName:P
schema:id:int¦name:string¦score:<float>?¦active:bool
1¦John¦1.5¦true
2¦Jane¦¦false
";
    assert_eq!(validate_against_yaml(yaml, doc), None);
}

#[test]
fn test_yaml_shorthand_schema() {
    let yaml = "id: int\nname: string\nnote: string?\n";
    let doc = "EntityName:P\nschema:id:int¦name:string\n1¦John\n";
    assert_eq!(validate_against_yaml(yaml, doc), None);
}

#[test]
fn test_yaml_missing_required_field() {
    let yaml = "id: int\nage: int\n";
    let doc = "EntityName:P\nschema:id:int\n1\n";
    let diag = validate_against_yaml(yaml, doc).unwrap();
    assert!(diag.contains("age"), "diagnostic was: {}", diag);
}

#[test]
fn test_bad_yaml_is_reported() {
    let doc = "EntityName:P\nschema:id:int\n1\n";
    assert!(validate_against_yaml("id: varchar\n", doc).is_some());
    assert!(validate_against_yaml("[1, 2, 3]", doc).is_some());
}

#[test]
fn test_schema_yaml_round_trip_validates() {
    let line = "schema:id:int¦customer:‹name:string¦email:string›¦items:«‹product:string¦price:float›»¦status:{pending|shipped}";
    let schema = Schema::parse(line).unwrap();
    let yaml = schema_to_yaml("Order", &schema).unwrap();
    assert_eq!(schema_from_yaml(&yaml).unwrap(), schema);
    assert_eq!(validate_against_yaml(&yaml, ORDERS), None);
}
