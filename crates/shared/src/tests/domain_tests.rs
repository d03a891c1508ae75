use super::*;

#[test]
fn student_serializes_with_bare_numeric_id() {
    let student = Student {
        id: StudentId(7),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        course: "Math".into(),
        age: 21,
    };
    let json = serde_json::to_value(&student).expect("serialize");
    assert_eq!(json["id"], 7);
    assert_eq!(json["age"], 21);
}

#[test]
fn draft_drops_the_id() {
    let student = Student {
        id: StudentId(3),
        name: "Lin".into(),
        email: "lin@example.com".into(),
        course: "Physics".into(),
        age: 30,
    };
    let json = serde_json::to_value(student.draft()).expect("serialize");
    assert!(json.get("id").is_none());
    assert_eq!(json["name"], "Lin");
}

#[test]
fn parses_sort_field_and_direction_case_insensitively() {
    assert_eq!("Name".parse::<SortField>(), Ok(SortField::Name));
    assert_eq!(" age ".parse::<SortField>(), Ok(SortField::Age));
    assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
    assert!("grade".parse::<SortField>().is_err());
    assert!("sideways".parse::<SortDirection>().is_err());
}

#[test]
fn student_field_round_trips_through_wire_name() {
    for field in StudentField::ALL {
        assert_eq!(field.as_str().parse::<StudentField>(), Ok(field));
    }
    assert!("editEmail".parse::<StudentField>().is_err());
}
