pub mod factory;
pub mod ln;
pub mod model_trait;
pub mod output;
pub mod retina;

pub use ln::LnModel;
pub use model_trait::VisionModel;
pub use output::ModelOutput;
pub use retina::{Intermediates, Retina};
