use thiserror::Error;

/// Input problems that stop an analysis before it starts.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("seller list must not be empty")]
    NoSellers,

    #[error("product list must not be empty")]
    NoProducts,

    #[error("purchase record list must not be empty")]
    NoPurchaseRecords,
}
