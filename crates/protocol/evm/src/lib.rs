#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod error;
pub use error::DisassemblyError;

mod opcodes;
pub use opcodes::{Opcode, opcode};

mod disasm;
pub use disasm::{Disassembly, Halt, Instruction, disassemble, disassemble_hex};

mod boundary;
pub use boundary::{DeploymentBoundary, detect_boundary, detect_boundary_hex};

mod signature;
pub use signature::{
    DEFAULT_ARGUMENT_TYPES, DEFAULT_KEYWORDS, SignatureGuesser, hash_signature,
};
