use super::*;

#[test]
fn defaults_fill_missing_fields() {
    let opts = ProgramOpts::from_json(r#"{ "uniform_binding": 3 }"#).unwrap();
    assert_eq!(opts.entry_point, "main_color");
    assert_eq!(opts.uniform_group, 0);
    assert_eq!(opts.uniform_binding, 3);
    assert!(opts.allow_dst_read);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = ProgramOpts::from_json(r#"{ "entry": "x" }"#).unwrap_err();
    assert!(matches!(err, FxError::Serde(_)));
}

#[test]
fn entry_point_must_be_a_free_identifier() {
    for bad in ["", "1abc", "has space", "fp0", "fp12", "sk_main", "u", "__x"] {
        let opts = ProgramOpts {
            entry_point: bad.to_string(),
            ..ProgramOpts::default()
        };
        assert!(opts.validate().is_err(), "{bad:?} accepted");
    }
    for good in ["main", "_main", "fp", "fpx", "fp0a", "shade_2"] {
        let opts = ProgramOpts {
            entry_point: good.to_string(),
            ..ProgramOpts::default()
        };
        assert!(opts.validate().is_ok(), "{good:?} rejected");
    }
}

#[test]
fn from_json_validates() {
    assert!(matches!(
        ProgramOpts::from_json(r#"{ "entry_point": "fp1" }"#),
        Err(FxError::Validation(_))
    ));
}
