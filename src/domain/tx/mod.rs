//! Transaction assembly and signing

mod builder;
mod signer;

pub use builder::{UnsignedTransaction, TRANSFER_GAS_LIMIT};
pub use signer::{sign, SignedTransaction};
