use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoChartCommonError {
    #[error("Invalid CSS color: `{0}`")]
    InvalidColor(String),
}
