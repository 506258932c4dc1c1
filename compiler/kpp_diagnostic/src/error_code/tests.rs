use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2001.as_str(), "E2001");
}

#[test]
fn test_predicate_exclusivity() {
    for code in ErrorCode::ALL {
        let hits = [
            code.is_lexer_error(),
            code.is_parser_error(),
            code.is_transform_error(),
            code.is_io_error(),
            code.is_internal_error(),
        ]
        .iter()
        .filter(|&&b| b)
        .count();
        assert_eq!(hits, 1, "{code} matches {hits} phase predicates");
    }
}

#[test]
fn test_phase_digit_matches_predicate() {
    for code in ErrorCode::ALL {
        let digit = code.as_str().as_bytes()[1];
        let expected = match digit {
            b'0' => code.is_lexer_error(),
            b'1' => code.is_parser_error(),
            b'2' => code.is_transform_error(),
            b'3' => code.is_io_error(),
            b'9' => code.is_internal_error(),
            _ => false,
        };
        assert!(expected, "{code} has no matching phase");
    }
}

#[test]
fn test_from_str_round_trips_all() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
    assert_eq!("e0002".parse::<ErrorCode>(), Ok(ErrorCode::E0002));
    assert_eq!("E7777".parse::<ErrorCode>(), Err(()));
}

#[test]
fn test_descriptions_are_nonempty() {
    for code in ErrorCode::ALL {
        assert!(!code.description().is_empty());
    }
}
