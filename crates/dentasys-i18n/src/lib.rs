//! DentaSys localization.
//!
//! English and Arabic display text for the clinic UI, with placeholder
//! formatting and right-to-left awareness.
//!
//! There is no process-wide translation state. A [`LocaleContext`] owns the
//! active language and the observers to notify on a switch; rendering code
//! receives a borrowed [`Locale`] and reads text through it.
//!
//! # Modules
//!
//! - [`language`]: Supported languages and text direction
//! - [`catalog`]: Key/value catalogs and placeholder formatting
//! - [`context`]: Active-language context with observer notification

pub mod catalog;
pub mod context;
pub mod language;

pub use catalog::{Arg, Catalog};
pub use context::{Locale, LocaleContext, ObserverId, SwitchReport};
pub use language::{Direction, Language};

use thiserror::Error;

/// Localization errors.
#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Catalog parse error: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("Observer failed: {0}")]
    Observer(String),
}

pub type I18nResult<T> = Result<T, I18nError>;
