//! PKCS#1 v1.5 padding codec.
//!
//! The engine applies these for you; they are exposed for interoperability
//! tests and diagnostics.

pub use crate::algorithms::pkcs1v15::{
    analyze_padding, max_payload_len, pkcs1v15_encrypt_pad, pkcs1v15_sign_pad, pkcs1v15_unpad,
    BlockType, PaddingDefect, PaddingReport, MIN_PADDING_LEN, PADDING_OVERHEAD,
};
