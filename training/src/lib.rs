//! Repeated training trials for the single-hidden-layer network, plus the
//! XOR truth tables it is usually trained on.

pub mod datasets;
mod training;
mod training_config;
mod training_history;

pub use training::{Trainer, TrainingError, TrainingRun};
pub use training_config::TrainingConfig;
pub use training_history::{TrainingHistory, TrialRecord};

pub mod prelude {
    pub use crate::datasets;
    pub use crate::{Trainer, TrainingConfig, TrainingHistory, TrainingRun};
}
