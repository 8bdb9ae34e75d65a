mod normalize;
mod state;

pub use normalize::{is_color_setting, prepare_for_save};
pub use state::{ConfigController, LoadPhase, PendingSave};
