//! Detection of the constructor epilogue that returns the runtime code.
//!
//! Solidity creation code ends its constructor with
//! `PUSH2 <len> DUP1 PUSH2 <offset> PUSH1 00 CODECOPY PUSH1 00 RETURN`; the matched
//! suffix is `PUSH2 <offset> PUSH1 00 CODECOPY PUSH1 00 RETURN` and everything from
//! `<offset>` onwards is runtime code.

use crate::DisassemblyError;
use alloy_primitives::hex;
use core::fmt;

/// Length of the matched epilogue in bytes.
const PATTERN_LEN: usize = 9;

/// The located init/runtime boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentBoundary {
    /// Offset of the `PUSH2` opening the epilogue.
    pub start: usize,
    /// Offset one past the closing `RETURN`.
    pub end: usize,
    /// The runtime code offset carried by the `PUSH2` operand.
    pub runtime_offset: u16,
    /// The matched bytes.
    pub pattern: [u8; PATTERN_LEN],
}

impl fmt::Display for DeploymentBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:x}:{:x}", hex::encode(self.pattern), self.start, self.end)
    }
}

const fn is_epilogue(window: &[u8]) -> bool {
    matches!(window, [0x61, _, _, 0x60, 0x00, 0x39, 0x60, 0x00, 0xf3])
}

/// Finds the first byte-aligned epilogue in `code`.
pub fn detect_boundary(code: &[u8]) -> Option<DeploymentBoundary> {
    let start = code.windows(PATTERN_LEN).position(is_epilogue)?;
    let mut pattern = [0u8; PATTERN_LEN];
    pattern.copy_from_slice(&code[start..start + PATTERN_LEN]);

    Some(DeploymentBoundary {
        start,
        end: start + PATTERN_LEN,
        runtime_offset: u16::from_be_bytes([pattern[1], pattern[2]]),
        pattern,
    })
}

/// Finds the first epilogue in a hex string, with or without a `0x` prefix.
pub fn detect_boundary_hex(input: &str) -> Result<Option<DeploymentBoundary>, DisassemblyError> {
    let code = hex::decode(input.trim()).map_err(|e| DisassemblyError::InvalidHex(e.to_string()))?;
    Ok(detect_boundary(&code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Creation input of 0xe5da56901c48d12e17ed9bc731dcd1d7424f8423d588ec943f8ec48552683c66.
    const LEGACY_CREATION: &str = "0x606060405260008055600380546006808355919082908015829011604357818360005260206000209182019101604391905b80821115609a57600081556001016031565b505080543392506000908110156002579081527fc2575a0e9e593c00f959f8c92f12db2869c3395a3b0502d05e2516446f71f85b8054600160a060020a0319169092179091556001556102fe8061009f6000396000f35b50905600";

    // Creation header of 0x863df6bfa4469f3ead0be8f9f2aae51c91a907b4.
    const MODERN_CREATION: &str = "0x6060604052341561000c57fe5b5b61170f8061001c6000396000f300";

    #[rstest]
    #[case::legacy(LEGACY_CREATION, 0x91, 0x9a, 0x9f)]
    #[case::modern(MODERN_CREATION, 0x12, 0x1b, 0x1c)]
    fn test_detects_epilogue(
        #[case] input: &str,
        #[case] start: usize,
        #[case] end: usize,
        #[case] runtime_offset: u16,
    ) {
        let boundary = detect_boundary_hex(input).unwrap().unwrap();
        assert_eq!(boundary.start, start);
        assert_eq!(boundary.end, end);
        assert_eq!(boundary.runtime_offset, runtime_offset);
    }

    #[test]
    fn test_display() {
        let boundary = detect_boundary_hex(LEGACY_CREATION).unwrap().unwrap();
        assert_eq!(boundary.to_string(), "61009f6000396000f3 at 91:9a");
    }

    #[test]
    fn test_no_epilogue() {
        assert_eq!(detect_boundary_hex("0x6060604052").unwrap(), None);
        assert_eq!(detect_boundary(&[]), None);
    }
}
