use std::collections::{BTreeMap, BTreeSet};

use super::record::ModelConfig;
use super::value::ParamValue;

/// Input parameters that are meaningful for every contact model
const BASE_PARAMETERS: [&str; 11] = [
    "density_p",
    "young_w",
    "young_p",
    "poisson_p",
    "poisson_w",
    "rest_coef_pw",
    "rest_coef_pp",
    "fric_coef_pp",
    "fric_coef_pw",
    "roll_fric_pp",
    "roll_fric_pw",
];

const HOOKE_PARAMETERS: [&str; 1] = ["char_vel"];

const EPSD_PARAMETERS: [&str; 2] = ["roll_damp_pw", "roll_damp_pp"];

const SJKR_PARAMETERS: [&str; 2] = ["cohesion_energy_pp", "cohesion_energy_pw"];

const ADAPTIVE_COHESION_PARAMETERS: [&str; 8] = [
    "init_coh_stress_pw",
    "init_coh_stress_pp",
    "max_coh_stress_pp_0",
    "max_coh_stress_pp_min",
    "max_coh_stress_pp_max",
    "coh_strength_pp_0",
    "coh_strength_pp_min",
    "coh_strength_pp_max",
];

/// Input parameter names kept for the given model configuration
pub fn allowed_input_parameters(models: &ModelConfig) -> BTreeSet<&'static str> {
    let mut allowed: BTreeSet<&'static str> = BASE_PARAMETERS.into_iter().collect();

    if models.normal_contact_model == "hooke" {
        allowed.extend(HOOKE_PARAMETERS);
    }
    if models.rolling_friction_model == "epsd" {
        allowed.extend(EPSD_PARAMETERS);
    }
    match models.cohesion_model.as_str() {
        "sjkr" | "sjkr2" => allowed.extend(SJKR_PARAMETERS),
        "adaptive" => allowed.extend(ADAPTIVE_COHESION_PARAMETERS),
        _ => {}
    }

    allowed
}

/// Restrict `parameters` to the names allowed for `models`.
///
/// Only removes entries; a whitelisted name absent from the log stays absent.
pub fn filter_input_parameters(
    parameters: BTreeMap<String, ParamValue>,
    models: &ModelConfig,
) -> BTreeMap<String, ParamValue> {
    let allowed = allowed_input_parameters(models);
    parameters
        .into_iter()
        .filter(|(name, _)| allowed.contains(name.as_str()))
        .collect()
}
