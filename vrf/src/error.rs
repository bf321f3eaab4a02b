use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("failed to obtain randomness: {0}")]
    Randomness(String),

    #[error("oracle not available: {0}")]
    Unavailable(String),

    #[error("eligible pool has {available} members, {requested} jurors requested")]
    PoolTooSmall { available: usize, requested: usize },

    #[error("fulfilment channel closed")]
    ChannelClosed,
}
