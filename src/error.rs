#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No process has been selected")]
    NoProcess,
    #[error("Input product is not set")]
    MissingInputProduct,
    #[error("Input lot is not set")]
    MissingInputLot,
    #[error("Output product is not set")]
    MissingOutputProduct,
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("cart slot could not be decoded: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("cart slot is unavailable: {0}")]
    Unavailable(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Remote(String),
    #[error("{kind} {id} does not exist")]
    NotFound { kind: &'static str, id: i64 },
    #[error("lot {lot} does not belong to product {product}")]
    LotMismatch { lot: i64, product: i64 },
    #[error("record store failure: {0}")]
    Store(#[from] sled::Error),
    #[error("record could not be encoded or decoded: {0}")]
    Codec(String),
}

#[derive(thiserror::Error, Debug)]
pub enum TransitionError {
    #[error("Order {0} must reference an input product and lot before confirming")]
    MissingInput(i64),
    #[error("Order {0} must reference an output product before confirming")]
    MissingOutput(i64),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<minicbor::decode::Error> for ServiceError {
    fn from(value: minicbor::decode::Error) -> Self {
        ServiceError::Codec(value.to_string())
    }
}

impl<E: std::fmt::Display> From<minicbor::encode::Error<E>> for ServiceError {
    fn from(value: minicbor::encode::Error<E>) -> Self {
        ServiceError::Codec(value.to_string())
    }
}
