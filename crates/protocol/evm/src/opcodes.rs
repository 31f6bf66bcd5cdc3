//! The opcode table.
//!
//! Mnemonics follow the historical names used in stored listings (`SHA3`,
//! `DIFFICULTY`, `SUICIDE`).

/// An opcode table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    /// The opcode byte.
    pub byte: u8,
    /// The mnemonic.
    pub mnemonic: &'static str,
    /// Number of immediate operand bytes following the opcode.
    pub immediate: usize,
}

const PUSH: [&str; 32] = [
    "PUSH1", "PUSH2", "PUSH3", "PUSH4", "PUSH5", "PUSH6", "PUSH7", "PUSH8", "PUSH9", "PUSH10",
    "PUSH11", "PUSH12", "PUSH13", "PUSH14", "PUSH15", "PUSH16", "PUSH17", "PUSH18", "PUSH19",
    "PUSH20", "PUSH21", "PUSH22", "PUSH23", "PUSH24", "PUSH25", "PUSH26", "PUSH27", "PUSH28",
    "PUSH29", "PUSH30", "PUSH31", "PUSH32",
];

const DUP: [&str; 16] = [
    "DUP1", "DUP2", "DUP3", "DUP4", "DUP5", "DUP6", "DUP7", "DUP8", "DUP9", "DUP10", "DUP11",
    "DUP12", "DUP13", "DUP14", "DUP15", "DUP16",
];

const SWAP: [&str; 16] = [
    "SWAP1", "SWAP2", "SWAP3", "SWAP4", "SWAP5", "SWAP6", "SWAP7", "SWAP8", "SWAP9", "SWAP10",
    "SWAP11", "SWAP12", "SWAP13", "SWAP14", "SWAP15", "SWAP16",
];

const LOG: [&str; 5] = ["LOG0", "LOG1", "LOG2", "LOG3", "LOG4"];

/// Looks up the table entry for `byte`.
pub const fn opcode(byte: u8) -> Option<Opcode> {
    let (mnemonic, immediate) = match byte {
        0x00 => ("STOP", 0),
        0x01 => ("ADD", 0),
        0x02 => ("MUL", 0),
        0x03 => ("SUB", 0),
        0x04 => ("DIV", 0),
        0x05 => ("SDIV", 0),
        0x06 => ("MOD", 0),
        0x07 => ("SMOD", 0),
        0x08 => ("ADDMOD", 0),
        0x09 => ("MULMOD", 0),
        0x0a => ("EXP", 0),
        0x0b => ("SIGNEXTEND", 0),

        0x10 => ("LT", 0),
        0x11 => ("GT", 0),
        0x12 => ("SLT", 0),
        0x13 => ("SGT", 0),
        0x14 => ("EQ", 0),
        0x15 => ("ISZERO", 0),
        0x16 => ("AND", 0),
        0x17 => ("OR", 0),
        0x18 => ("XOR", 0),
        0x19 => ("NOT", 0),
        0x1a => ("BYTE", 0),
        0x1b => ("SHL", 0),
        0x1c => ("SHR", 0),
        0x1d => ("SAR", 0),

        0x20 => ("SHA3", 0),

        0x30 => ("ADDRESS", 0),
        0x31 => ("BALANCE", 0),
        0x32 => ("ORIGIN", 0),
        0x33 => ("CALLER", 0),
        0x34 => ("CALLVALUE", 0),
        0x35 => ("CALLDATALOAD", 0),
        0x36 => ("CALLDATASIZE", 0),
        0x37 => ("CALLDATACOPY", 0),
        0x38 => ("CODESIZE", 0),
        0x39 => ("CODECOPY", 0),
        0x3a => ("GASPRICE", 0),
        0x3b => ("EXTCODESIZE", 0),
        0x3c => ("EXTCODECOPY", 0),
        0x3d => ("RETURNDATASIZE", 0),
        0x3e => ("RETURNDATACOPY", 0),
        0x3f => ("EXTCODEHASH", 0),

        0x40 => ("BLOCKHASH", 0),
        0x41 => ("COINBASE", 0),
        0x42 => ("TIMESTAMP", 0),
        0x43 => ("NUMBER", 0),
        0x44 => ("DIFFICULTY", 0),
        0x45 => ("GASLIMIT", 0),
        0x46 => ("CHAINID", 0),
        0x47 => ("SELFBALANCE", 0),
        0x48 => ("BASEFEE", 0),
        0x49 => ("BLOBHASH", 0),
        0x4a => ("BLOBBASEFEE", 0),

        0x50 => ("POP", 0),
        0x51 => ("MLOAD", 0),
        0x52 => ("MSTORE", 0),
        0x53 => ("MSTORE8", 0),
        0x54 => ("SLOAD", 0),
        0x55 => ("SSTORE", 0),
        0x56 => ("JUMP", 0),
        0x57 => ("JUMPI", 0),
        0x58 => ("PC", 0),
        0x59 => ("MSIZE", 0),
        0x5a => ("GAS", 0),
        0x5b => ("JUMPDEST", 0),
        0x5c => ("TLOAD", 0),
        0x5d => ("TSTORE", 0),
        0x5e => ("MCOPY", 0),
        0x5f => ("PUSH0", 0),

        0x60..=0x7f => {
            let n = (byte - 0x5f) as usize;
            (PUSH[n - 1], n)
        }
        0x80..=0x8f => (DUP[(byte - 0x80) as usize], 0),
        0x90..=0x9f => (SWAP[(byte - 0x90) as usize], 0),
        0xa0..=0xa4 => (LOG[(byte - 0xa0) as usize], 0),

        0xf0 => ("CREATE", 0),
        0xf1 => ("CALL", 0),
        0xf2 => ("CALLCODE", 0),
        0xf3 => ("RETURN", 0),
        0xf4 => ("DELEGATECALL", 0),
        0xf5 => ("CREATE2", 0),
        0xfa => ("STATICCALL", 0),
        0xfd => ("REVERT", 0),
        0xfe => ("INVALID", 0),
        0xff => ("SUICIDE", 0),

        _ => return None,
    };
    Some(Opcode { byte, mnemonic, immediate })
}
