#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod traits;
pub use traits::{BlockCodec, BlockRecord};

mod block;
pub use block::{CompactBlock, CompactTx};

mod codec;
pub use codec::RlpCodec;

mod errors;
pub use errors::CodecError;
