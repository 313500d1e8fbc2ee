use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("invalid route code: {0:?}")]
    BadRouteCode(String),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
