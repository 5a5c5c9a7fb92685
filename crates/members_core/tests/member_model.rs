use chrono::NaiveDate;
use members_core::db::ColumnType;
use members_core::{
    extract_data, hydrate_member, member_column_types, Address, Email, Height, Member,
    MemberDetails, MemberValidationError, RepoError, Weight, MEMBER_COLUMNS,
};
use std::collections::BTreeMap;

fn details() -> MemberDetails {
    MemberDetails {
        password: "hashed".to_string(),
        address: Address::new("Canada", "British Columbia", "Vancouver", "V6B 1A1"),
        date_of_birth: NaiveDate::from_ymd_opt(1975, 12, 1).unwrap(),
        limits: "none".to_string(),
        height: Height::new(181).unwrap(),
        weight: Weight::new(90).unwrap(),
        body_type: "average".to_string(),
        ethnicity: "unspecified".to_string(),
        email: Email::parse("sam@example.com").unwrap(),
    }
}

#[test]
fn try_new_rejects_blank_username() {
    let err = Member::try_new("   ", details()).unwrap_err();
    assert_eq!(err, MemberValidationError::EmptyUsername);
}

#[test]
fn value_objects_parse_and_format_storage_text() {
    assert_eq!(Height::parse(" 165 ").unwrap().value(), 165);
    assert_eq!(Weight::parse("72").unwrap().to_string(), "72");
    assert_eq!(
        Email::parse("  a.b@mail.example.org ").unwrap().as_str(),
        "a.b@mail.example.org"
    );
}

#[test]
fn value_objects_reject_invalid_input() {
    assert_eq!(
        Height::parse("tall").unwrap_err(),
        MemberValidationError::InvalidHeight("tall".to_string())
    );
    assert!(Height::new(0).is_err());
    assert!(Weight::parse("-4").is_err());
    assert!(Weight::parse("").is_err());
    for bad in ["", "plain", "no@tld", "two words@example.com", "@example.com"] {
        assert!(Email::parse(bad).is_err(), "`{bad}` should be rejected");
    }
}

#[test]
fn height_and_weight_reject_fractional_text() {
    assert_eq!(
        Height::parse("170.5").unwrap_err(),
        MemberValidationError::InvalidHeight("170.5".to_string())
    );
    assert_eq!(
        Weight::parse("70.5").unwrap_err(),
        MemberValidationError::InvalidWeight("70.5".to_string())
    );
}

#[test]
fn extract_data_flattens_in_column_order() {
    let member = Member::try_new("sam", details()).unwrap();
    let row = extract_data(&member);

    let columns: Vec<&str> = row.iter().map(|(column, _)| *column).collect();
    assert_eq!(columns, MEMBER_COLUMNS.to_vec());

    let values: BTreeMap<&str, &str> = row
        .iter()
        .map(|(column, value)| (*column, value.as_str()))
        .collect();
    assert_eq!(values["username"], "sam");
    assert_eq!(values["province"], "British Columbia");
    assert_eq!(values["date_of_birth"], "1975-12-01");
    assert_eq!(values["height"], "181");
    assert_eq!(values["weight"], "90");
    assert_eq!(values["email"], "sam@example.com");
}

#[test]
fn column_types_tag_only_date_of_birth_as_date() {
    let types = member_column_types();
    assert_eq!(types.len(), MEMBER_COLUMNS.len());

    for (column, kind) in MEMBER_COLUMNS.iter().zip(types) {
        let expected = if *column == "date_of_birth" {
            ColumnType::Date
        } else {
            ColumnType::String
        };
        assert_eq!(*kind, expected, "column `{column}`");
    }
}

#[test]
fn hydrate_inverts_extract_data() {
    let member = Member::try_new("sam", details()).unwrap();
    let row: BTreeMap<String, String> = extract_data(&member)
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect();

    assert_eq!(hydrate_member(&row).unwrap(), member);
}

#[test]
fn hydrate_reports_missing_column() {
    let member = Member::try_new("sam", details()).unwrap();
    let mut row: BTreeMap<String, String> = extract_data(&member)
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect();
    row.remove("email");

    match hydrate_member(&row).unwrap_err() {
        RepoError::InvalidData(message) => assert!(message.contains("email")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn member_serialization_uses_column_names() {
    let member = Member::try_new("sam", details()).unwrap();

    let json = serde_json::to_value(&member).unwrap();
    assert_eq!(json["username"], "sam");
    assert_eq!(json["address"]["postal_code"], "V6B 1A1");
    assert_eq!(json["date_of_birth"], "1975-12-01");
    assert_eq!(json["height"], 181);
    assert_eq!(json["email"], "sam@example.com");

    let decoded: Member = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, member);
}

#[test]
fn deserialize_rejects_invalid_members() {
    let member = Member::try_new("sam", details()).unwrap();

    let mut blank_username = serde_json::to_value(&member).unwrap();
    blank_username["username"] = serde_json::json!("");
    let err = serde_json::from_value::<Member>(blank_username).unwrap_err();
    assert!(err.to_string().contains("username cannot be empty"));

    let mut bad_email = serde_json::to_value(&member).unwrap();
    bad_email["email"] = serde_json::json!("not-an-email");
    let err = serde_json::from_value::<Member>(bad_email).unwrap_err();
    assert!(err.to_string().contains("invalid email address"));
}
