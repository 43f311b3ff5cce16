//! Display settings: presentation labels and property bags.

mod label;
mod settings;

pub use label::Label;
pub use settings::DisplaySettings;
