//! Shipped data files match the built-in defaults.

use projection_core::{
    campaign::CampaignSettings,
    config::{self, ModelConfig},
};

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");

/// data/model/model_config.json is the default config.
#[test]
fn shipped_model_config_matches_default() {
    let loaded = ModelConfig::load(DATA_DIR).expect("load model config");
    assert_eq!(loaded, ModelConfig::default());
}

/// The reference campaign file is the reference defaults.
#[test]
fn shipped_campaign_matches_reference_defaults() {
    let path = format!("{DATA_DIR}/campaigns/reference_campaign.json");
    let loaded = config::load_campaign(&path).expect("load campaign");
    assert_eq!(loaded, CampaignSettings::reference_defaults());
}

/// A missing data directory is an error, not a panic.
#[test]
fn missing_config_is_an_error() {
    let err = ModelConfig::load("/nonexistent/projection-data").unwrap_err();
    assert!(err.to_string().contains("Cannot read"), "got {err}");
}
