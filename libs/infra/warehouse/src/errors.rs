// [libs/infra/warehouse/src/errors.rs]
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("[WH-CONN] could not reach warehouse: {0}")]
    Connection(String),

    #[error("[WH-QUERY] query rejected: {0}")]
    Query(String),

    #[error("[WH-IDENT] unsafe identifier rejected: {0:?}")]
    UnsafeIdentifier(String),

    #[error("[WH-DECODE] could not decode warehouse response: {0}")]
    Decode(String),
}
