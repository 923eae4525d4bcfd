use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MalathError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(MalathError::render("x").to_string().contains("render error:"));
    assert!(
        MalathError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        MalathError::transcription("offline")
            .to_string()
            .contains("transcription failed: offline")
    );
    assert!(MalathError::InvalidGrayscale(300).to_string().contains("300"));
}

#[test]
fn unrecognized_messages_name_the_missing_part() {
    let color = MalathError::Unrecognized {
        missing: Missing::Color,
        zone: Some(1),
        color: None,
    };
    assert_eq!(color.to_string(), "color not recognized (zone 1 was heard)");

    let zone = MalathError::Unrecognized {
        missing: Missing::Zone,
        zone: None,
        color: Some("red".to_owned()),
    };
    assert_eq!(
        zone.to_string(),
        "zone number not recognized (color \"red\" was heard)"
    );

    let both = MalathError::Unrecognized {
        missing: Missing::ColorAndZone,
        zone: None,
        color: None,
    };
    assert!(both.to_string().contains("neither"));
}

#[test]
fn missing_flags() {
    assert!(Missing::Color.color() && !Missing::Color.zone());
    assert!(Missing::Zone.zone() && !Missing::Zone.color());
    assert!(Missing::ColorAndZone.color() && Missing::ColorAndZone.zone());
}

#[test]
fn interaction_failures_are_recoverable() {
    assert!(MalathError::AudioTimeout { secs: 10 }.is_recoverable());
    assert!(MalathError::transcription("x").is_recoverable());
    assert!(
        MalathError::Unrecognized {
            missing: Missing::Zone,
            zone: None,
            color: None,
        }
        .is_recoverable()
    );
    assert!(!MalathError::ZeroZoneCount.is_recoverable());
    assert!(!MalathError::UnknownTemplate("x".into()).is_recoverable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MalathError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
