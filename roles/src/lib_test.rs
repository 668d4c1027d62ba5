use super::*;

#[test]
fn role_labels_match_backend_enumeration() {
    assert_eq!(Role::Patient.as_str(), "PATIENT");
    assert_eq!(Role::Doctor.as_str(), "DOCTOR");
    assert_eq!(Role::Assistant.as_str(), "ASSISTANT");
    assert_eq!(Role::SuperAdmin.as_str(), "SUPER_ADMIN");
}

#[test]
fn role_parses_every_known_label() {
    for role in Role::ALL {
        assert_eq!(role.as_str().parse::<Role>(), Ok(role));
    }
}

#[test]
fn role_parse_rejects_labels_outside_enumeration() {
    assert_eq!("GUEST".parse::<Role>(), Err(UnknownRole("GUEST".to_owned())));
    assert_eq!("doctor".parse::<Role>(), Err(UnknownRole("doctor".to_owned())));
    assert!("".parse::<Role>().is_err());
}

#[test]
fn role_serde_uses_screaming_snake_case() {
    assert_eq!(serde_json::to_string(&Role::SuperAdmin).expect("json"), "\"SUPER_ADMIN\"");
    let role: Role = serde_json::from_str("\"ASSISTANT\"").expect("role");
    assert_eq!(role, Role::Assistant);
}

#[test]
fn least_privileged_is_patient() {
    assert_eq!(Role::least_privileged(), Role::Patient);
    assert_eq!(Role::ALL[0], Role::least_privileged());
}

#[test]
fn display_matches_wire_label() {
    assert_eq!(Role::Doctor.to_string(), "DOCTOR");
    assert_eq!(Role::SuperAdmin.label(), "Super Admin");
}
