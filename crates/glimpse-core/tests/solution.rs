use glimpse_core::{Solution, ViewState};

#[test]
fn solution_uses_wire_field_names() {
    let solution = Solution {
        code: "print(1)".into(),
        thoughts: vec!["t1".into()],
        time_complexity: "O(1)".into(),
        space_complexity: "O(1)".into(),
    };
    let json = serde_json::to_value(&solution).unwrap();
    assert_eq!(json["code"], "print(1)");
    assert_eq!(json["thoughts"][0], "t1");
    assert_eq!(json["time_complexity"], "O(1)");
    assert_eq!(json["space_complexity"], "O(1)");
}

#[test]
fn view_state_defaults_to_queue() {
    assert_eq!(ViewState::default(), ViewState::Queue);
    assert_eq!(ViewState::Solutions.as_str(), "solutions");
}
