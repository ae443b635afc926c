use crate::config::ModelConfig;
use crate::error::Result;
use crate::models::{LnModel, Retina, VisionModel};

/// Build a boxed vision model from a `ModelConfig`.
pub fn build_model(config: ModelConfig) -> Result<Box<dyn VisionModel>> {
    log::debug!("Building {} model", config.name());
    match config {
        ModelConfig::Retina(c) => Ok(Box::new(Retina::with_config(c)?)),
        ModelConfig::Ln(c) => Ok(Box::new(LnModel::with_config(c)?)),
    }
}
