use orbit_lab_core::cfg::SimConfig;
use orbit_lab_core::error::InvalidConfigurationError;
use orbit_lab_core::sim::{BodyConfiguration, KinematicEngine, SimulationModel};
use orbit_lab_core::units;

/// A saved starting configuration restores into a fresh model unchanged.
#[test]
fn starting_configuration_survives_json() -> Result<(), Box<dyn std::error::Error>> {
    let mut source = SimulationModel::with_defaults(KinematicEngine::new(), SimConfig::default())?;
    source.set_body_active(1, true);
    source.bodies_mut()[3].position.x = -12.5;
    source.finish_body_edit(3);

    let saved = serde_json::to_string(source.starting_configuration())?;
    let restored: Vec<BodyConfiguration> = serde_json::from_str(&saved)?;

    let mut target = SimulationModel::with_defaults(KinematicEngine::new(), SimConfig::default())?;
    target.restore_state(|m| m.load_configuration(&restored));

    assert_eq!(target.starting_configuration(), source.starting_configuration());
    target.restart();
    assert_eq!(target.bodies()[3].position.x, -12.5);
    assert!(target.bodies()[1].is_active);
    Ok(())
}

#[test]
fn corrupt_entry_is_reported() {
    let err = BodyConfiguration::from_json_str(r#"{"mass": -2, "position": [0, 0], "velocity": [1, 1]}"#)
        .unwrap_err();
    assert!(matches!(err, InvalidConfigurationError::NonPositiveMass(m) if m == -2.0));

    let err = BodyConfiguration::from_json_str(r#"{"mass": 1, "position": [0], "velocity": [1, 1]}"#)
        .unwrap_err();
    assert!(matches!(err, InvalidConfigurationError::Malformed(_)));
}

#[test]
fn unit_system_passes_self_test() {
    units::self_test().unwrap();
    units::check_force_round_trip(7.3e22, 5.97e24, 3.84e8).unwrap();
}
