pub mod error;
pub mod i18n;
pub mod messages;
pub mod notify;
pub mod settings;

pub use error::{AppError, AppResult};
