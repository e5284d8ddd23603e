use thiserror::Error;

pub type HfResult<T> = Result<T, HfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Negative value for {what}: {value}")]
    Negative { what: &'static str, value: f64 },

    #[error("Topology error: {what}")]
    Topology { what: String },
}
