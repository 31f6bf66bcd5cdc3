//! Linear-sweep bytecode disassembly.

use crate::{DisassemblyError, opcode};
use alloy_primitives::hex;
use core::fmt;

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Byte offset of the opcode within the input.
    pub offset: usize,
    /// The opcode byte.
    pub opcode: u8,
    /// The opcode mnemonic.
    pub mnemonic: &'static str,
    /// Immediate operand bytes. Shorter than the declared width when the input ends early.
    pub operand: Option<Vec<u8>>,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}:\t({:02x})\t{}", self.offset, self.opcode, self.mnemonic)?;
        if let Some(operand) = &self.operand {
            write!(f, "\t0x{}", hex::encode(operand))?;
        }
        Ok(())
    }
}

/// The reason a sweep stopped before consuming the whole input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// A byte with no opcode table entry was found.
    UnknownOpcode {
        /// Offset of the unknown byte.
        offset: usize,
        /// The unknown byte.
        byte: u8,
    },
    /// The final PUSH ran past the end of the input.
    TruncatedOperand {
        /// Offset of the PUSH opcode.
        offset: usize,
        /// Declared operand width.
        expected: usize,
        /// Operand bytes actually present.
        available: usize,
    },
}

/// The result of disassembling a byte string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disassembly {
    /// Decoded instructions in input order.
    pub instructions: Vec<Instruction>,
    /// Set when the sweep stopped early or the last operand was truncated.
    pub halt: Option<Halt>,
}

impl Disassembly {
    /// Returns `true` if every byte of the input was decoded.
    pub const fn is_complete(&self) -> bool {
        self.halt.is_none()
    }
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

/// Disassembles raw bytecode.
///
/// Operand bytes of a `PUSHn` are consumed together with the opcode and are never
/// decoded as instructions themselves. An unknown byte stops the sweep; the listing
/// decoded so far is returned together with the [`Halt`] position.
pub fn disassemble(code: &[u8]) -> Disassembly {
    let mut instructions = Vec::new();
    let mut offset = 0;

    while offset < code.len() {
        let byte = code[offset];
        let Some(op) = opcode(byte) else {
            warn!(target: "evm", offset, byte = format_args!("{byte:02x}"), "Unknown opcode");
            return Disassembly { instructions, halt: Some(Halt::UnknownOpcode { offset, byte }) };
        };

        let start = offset + 1;
        let end = (start + op.immediate).min(code.len());
        let operand = (op.immediate > 0).then(|| code[start..end].to_vec());
        instructions.push(Instruction { offset, opcode: byte, mnemonic: op.mnemonic, operand });

        if end - start < op.immediate {
            warn!(
                target: "evm",
                offset,
                expected = op.immediate,
                available = end - start,
                "Truncated push operand"
            );
            let halt =
                Halt::TruncatedOperand { offset, expected: op.immediate, available: end - start };
            return Disassembly { instructions, halt: Some(halt) };
        }
        offset = end;
    }

    Disassembly { instructions, halt: None }
}

/// Disassembles a hex string, with or without a `0x` prefix.
pub fn disassemble_hex(input: &str) -> Result<Disassembly, DisassemblyError> {
    let code = hex::decode(input.trim()).map_err(|e| DisassemblyError::InvalidHex(e.to_string()))?;
    Ok(disassemble(&code))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Runtime code fragment of 0xa327075af2a223a1c83a36ada1126afe7430f955.
    const LONG_INPUT: &str = "0x6060604052361561001f5760e060020a600035046372ea4b8c811461010c575b61011b3460008080678ac7230489e8000084106101d557600180548101908190556003805433929081101561000257906000526020600020900160006101000a815481600160a060020a0302191690830217905550678ac7230489e80000840393508350678ac7230489e800006000600082828250540192505081905550600260016000505411151561011d576003";

    const LONG_LISTING: &[&str] = &[
        "0x0000:\t(60)\tPUSH1\t0x60\n",
        "0x0002:\t(60)\tPUSH1\t0x40\n",
        "0x0004:\t(52)\tMSTORE\n",
        "0x0005:\t(36)\tCALLDATASIZE\n",
        "0x0006:\t(15)\tISZERO\n",
        "0x0007:\t(61)\tPUSH2\t0x001f\n",
        "0x000a:\t(57)\tJUMPI\n",
        "0x000b:\t(60)\tPUSH1\t0xe0\n",
        "0x000d:\t(60)\tPUSH1\t0x02\n",
        "0x000f:\t(0a)\tEXP\n",
        "0x0010:\t(60)\tPUSH1\t0x00\n",
        "0x0012:\t(35)\tCALLDATALOAD\n",
        "0x0013:\t(04)\tDIV\n",
        "0x0014:\t(63)\tPUSH4\t0x72ea4b8c\n",
        "0x0019:\t(81)\tDUP2\n",
        "0x001a:\t(14)\tEQ\n",
        "0x001b:\t(61)\tPUSH2\t0x010c\n",
        "0x001e:\t(57)\tJUMPI\n",
        "0x001f:\t(5b)\tJUMPDEST\n",
        "0x0020:\t(61)\tPUSH2\t0x011b\n",
        "0x0023:\t(34)\tCALLVALUE\n",
        "0x0024:\t(60)\tPUSH1\t0x00\n",
        "0x0026:\t(80)\tDUP1\n",
        "0x0027:\t(80)\tDUP1\n",
        "0x0028:\t(67)\tPUSH8\t0x8ac7230489e80000\n",
        "0x0031:\t(84)\tDUP5\n",
        "0x0032:\t(10)\tLT\n",
        "0x0033:\t(61)\tPUSH2\t0x01d5\n",
        "0x0036:\t(57)\tJUMPI\n",
        "0x0037:\t(60)\tPUSH1\t0x01\n",
        "0x0039:\t(80)\tDUP1\n",
        "0x003a:\t(54)\tSLOAD\n",
        "0x003b:\t(81)\tDUP2\n",
        "0x003c:\t(01)\tADD\n",
        "0x003d:\t(90)\tSWAP1\n",
        "0x003e:\t(81)\tDUP2\n",
        "0x003f:\t(90)\tSWAP1\n",
        "0x0040:\t(55)\tSSTORE\n",
        "0x0041:\t(60)\tPUSH1\t0x03\n",
        "0x0043:\t(80)\tDUP1\n",
        "0x0044:\t(54)\tSLOAD\n",
        "0x0045:\t(33)\tCALLER\n",
        "0x0046:\t(92)\tSWAP3\n",
        "0x0047:\t(90)\tSWAP1\n",
        "0x0048:\t(81)\tDUP2\n",
        "0x0049:\t(10)\tLT\n",
        "0x004a:\t(15)\tISZERO\n",
        "0x004b:\t(61)\tPUSH2\t0x0002\n",
        "0x004e:\t(57)\tJUMPI\n",
        "0x004f:\t(90)\tSWAP1\n",
        "0x0050:\t(60)\tPUSH1\t0x00\n",
        "0x0052:\t(52)\tMSTORE\n",
        "0x0053:\t(60)\tPUSH1\t0x20\n",
        "0x0055:\t(60)\tPUSH1\t0x00\n",
        "0x0057:\t(20)\tSHA3\n",
        "0x0058:\t(90)\tSWAP1\n",
        "0x0059:\t(01)\tADD\n",
        "0x005a:\t(60)\tPUSH1\t0x00\n",
        "0x005c:\t(61)\tPUSH2\t0x0100\n",
        "0x005f:\t(0a)\tEXP\n",
        "0x0060:\t(81)\tDUP2\n",
        "0x0061:\t(54)\tSLOAD\n",
        "0x0062:\t(81)\tDUP2\n",
        "0x0063:\t(60)\tPUSH1\t0x01\n",
        "0x0065:\t(60)\tPUSH1\t0xa0\n",
        "0x0067:\t(60)\tPUSH1\t0x02\n",
        "0x0069:\t(0a)\tEXP\n",
        "0x006a:\t(03)\tSUB\n",
        "0x006b:\t(02)\tMUL\n",
        "0x006c:\t(19)\tNOT\n",
        "0x006d:\t(16)\tAND\n",
        "0x006e:\t(90)\tSWAP1\n",
        "0x006f:\t(83)\tDUP4\n",
        "0x0070:\t(02)\tMUL\n",
        "0x0071:\t(17)\tOR\n",
        "0x0072:\t(90)\tSWAP1\n",
        "0x0073:\t(55)\tSSTORE\n",
        "0x0074:\t(50)\tPOP\n",
        "0x0075:\t(67)\tPUSH8\t0x8ac7230489e80000\n",
        "0x007e:\t(84)\tDUP5\n",
        "0x007f:\t(03)\tSUB\n",
        "0x0080:\t(93)\tSWAP4\n",
        "0x0081:\t(50)\tPOP\n",
        "0x0082:\t(83)\tDUP4\n",
        "0x0083:\t(50)\tPOP\n",
        "0x0084:\t(67)\tPUSH8\t0x8ac7230489e80000\n",
        "0x008d:\t(60)\tPUSH1\t0x00\n",
        "0x008f:\t(60)\tPUSH1\t0x00\n",
        "0x0091:\t(82)\tDUP3\n",
        "0x0092:\t(82)\tDUP3\n",
        "0x0093:\t(82)\tDUP3\n",
        "0x0094:\t(50)\tPOP\n",
        "0x0095:\t(54)\tSLOAD\n",
        "0x0096:\t(01)\tADD\n",
        "0x0097:\t(92)\tSWAP3\n",
        "0x0098:\t(50)\tPOP\n",
        "0x0099:\t(50)\tPOP\n",
        "0x009a:\t(81)\tDUP2\n",
        "0x009b:\t(90)\tSWAP1\n",
        "0x009c:\t(55)\tSSTORE\n",
        "0x009d:\t(50)\tPOP\n",
        "0x009e:\t(60)\tPUSH1\t0x02\n",
        "0x00a0:\t(60)\tPUSH1\t0x01\n",
        "0x00a2:\t(60)\tPUSH1\t0x00\n",
        "0x00a4:\t(50)\tPOP\n",
        "0x00a5:\t(54)\tSLOAD\n",
        "0x00a6:\t(11)\tGT\n",
        "0x00a7:\t(15)\tISZERO\n",
        "0x00a8:\t(15)\tISZERO\n",
        "0x00a9:\t(61)\tPUSH2\t0x011d\n",
        "0x00ac:\t(57)\tJUMPI\n",
        "0x00ad:\t(60)\tPUSH1\t0x03\n",
    ];

    #[test]
    fn test_long_listing() {
        let disassembly = disassemble_hex(LONG_INPUT).unwrap();
        assert!(disassembly.is_complete());
        assert_eq!(disassembly.to_string(), LONG_LISTING.concat());
    }

    #[test]
    fn test_push_operand_not_decoded() {
        // PUSH1 0x01 followed by ADD; the operand byte equals the ADD opcode.
        let disassembly = disassemble(&[0x60, 0x01, 0x01]);
        assert_eq!(disassembly.instructions.len(), 2);
        assert_eq!(disassembly.instructions[0].operand.as_deref(), Some(&[0x01][..]));
        assert_eq!(disassembly.instructions[1].offset, 2);
        assert_eq!(disassembly.instructions[1].mnemonic, "ADD");
        assert_eq!(disassembly.to_string(), "0x0000:\t(60)\tPUSH1\t0x01\n0x0002:\t(01)\tADD\n");
    }

    #[test]
    fn test_push32_operand_skipped() {
        let mut code = vec![0x7f];
        code.extend([0x5b; 32]);
        code.push(0x00);
        let disassembly = disassemble(&code);
        assert_eq!(disassembly.instructions.len(), 2);
        assert_eq!(disassembly.instructions[1].offset, 33);
        assert_eq!(disassembly.instructions[1].mnemonic, "STOP");
    }

    #[test]
    fn test_unknown_opcode_halts() {
        let disassembly = disassemble(&[0x60, 0x80, 0x0c, 0x01]);
        assert_eq!(disassembly.instructions.len(), 1);
        assert_eq!(disassembly.halt, Some(Halt::UnknownOpcode { offset: 2, byte: 0x0c }));
        assert_eq!(disassembly.to_string(), "0x0000:\t(60)\tPUSH1\t0x80\n");
    }

    #[test]
    fn test_truncated_operand_emitted() {
        let disassembly = disassemble(&[0x00, 0x62, 0xaa, 0xbb]);
        assert_eq!(
            disassembly.halt,
            Some(Halt::TruncatedOperand { offset: 1, expected: 3, available: 2 })
        );
        assert_eq!(disassembly.to_string(), "0x0000:\t(00)\tSTOP\n0x0001:\t(62)\tPUSH3\t0xaabb\n");
    }

    #[test]
    fn test_empty_and_invalid_input() {
        assert_eq!(disassemble_hex("0x").unwrap(), Disassembly::default());
        assert!(matches!(disassemble_hex("0x600"), Err(DisassemblyError::InvalidHex(_))));
        assert!(matches!(disassemble_hex("zz"), Err(DisassemblyError::InvalidHex(_))));
    }
}
