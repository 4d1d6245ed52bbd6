//! Crate error type. Simulation code never fails; everything here comes from the
//! browser shell or from loading a configuration.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GameError {
    /// A required DOM element (by id) is not on the page.
    #[error("missing element #{0}")]
    MissingElement(&'static str),

    /// A browser API threw or returned an unexpected object.
    #[error("dom error: {0}")]
    Dom(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            GameError::MissingElement("gameCanvas").to_string(),
            "missing element #gameCanvas"
        );
        assert_eq!(
            GameError::InvalidConfig("gravity must be positive".into()).to_string(),
            "invalid config: gravity must be positive"
        );
    }

    #[test]
    fn json_errors_convert() {
        let err: GameError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GameError::Config(_)));
    }
}
