use hadr_core::errors::{ErrorInfo, HadrError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("particle", "neutron")
        .with_context("energy_mev", "900")
}

#[test]
fn unknown_species_surface() {
    let err = HadrError::UnknownSpecies(sample_info("dispatch_unknown_species", "no bindings"));
    assert_eq!(err.info().code, "dispatch_unknown_species");
    assert_eq!(err.kind(), "unknown_species");
    assert!(err.info().context.contains_key("particle"));
}

#[test]
fn no_applicable_model_surface() {
    let err = HadrError::NoApplicableModel(sample_info("dispatch_no_model", "gap"));
    assert_eq!(err.kind(), "no_applicable_model");
    assert!(err.info().context.contains_key("energy_mev"));
}

#[test]
fn display_renders_context_and_hint() {
    let err = HadrError::ConfigurationGap(
        ErrorInfo::new("dispatch_gap", "uncovered energies")
            .with_context("from", "1000")
            .with_hint("extend the string model"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("configuration gap: uncovered energies (code: dispatch_gap)"));
    assert!(rendered.contains("from=1000"));
    assert!(rendered.ends_with("hint: extend the string model"));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = HadrError::ReconfigurationNotAllowed(ErrorInfo::new("scorer_locked", "in use"));
    let value = serde_json::to_value(&err).expect("serialize");
    assert_eq!(value["family"], "ReconfigurationNotAllowed");
    assert_eq!(value["detail"]["code"], "scorer_locked");
    let back: HadrError = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, err);
}
