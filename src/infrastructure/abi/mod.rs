//! ABI infrastructure - alloy-dyn-abi backed codec

mod codec;

pub use codec::DynAbiCodec;
