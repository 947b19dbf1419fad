pub mod export;
pub mod play;

pub use export::run_export;
pub use play::PlayMode;
