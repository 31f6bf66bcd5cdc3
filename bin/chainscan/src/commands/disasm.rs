//! The `disasm` mode.

use anyhow::{Context, Result, bail};
use alloy_primitives::{Address, Bytes, hex};
use chainscan_evm::{detect_boundary, disassemble};
use chainscan_node_client::{ChainNode, NodeResponse};
use clap::Parser;
use tracing::warn;

/// The `disasm` mode.
///
/// Prints one line per instruction. Bytecode comes from the command line or, with
/// `--address`, from the node.
///
/// # Usage
///
/// ```sh
/// chainscan disasm 0x6080604052
/// chainscan disasm --address 0xcd234a471b72ba2f1ccf0a70fcaba648a5eecd8d
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Disassembles EVM bytecode")]
pub struct DisasmCommand {
    /// Hex bytecode, with or without `0x`.
    #[arg(required_unless_present = "address", conflicts_with = "address")]
    pub code: Option<String>,
    /// Fetch the runtime code of this account from the node instead.
    #[arg(long, short)]
    pub address: Option<Address>,
    /// Also report the constructor epilogue that returns the runtime code.
    #[arg(long, short)]
    pub boundary: bool,
}

impl DisasmCommand {
    /// Runs the disassembly, using `node` when an address was given.
    pub async fn run<N: ChainNode>(self, node: Option<&N>) -> Result<()> {
        let code = self.bytecode(node).await?;
        print!("{}", self.render(&code));
        Ok(())
    }

    /// Resolves the bytecode to disassemble.
    pub async fn bytecode<N: ChainNode>(&self, node: Option<&N>) -> Result<Bytes> {
        if let Some(code) = &self.code {
            return hex::decode(code.trim()).map(Into::into).context("invalid hex bytecode");
        }
        let (Some(address), Some(node)) = (self.address, node) else {
            bail!("no bytecode or address given");
        };
        match node.code(address).await? {
            NodeResponse::Found(code) if code.is_empty() => bail!("{address} has no code"),
            NodeResponse::Found(code) => Ok(code),
            NodeResponse::Null => bail!("node returned no code for {address}"),
            NodeResponse::RpcError(payload) => bail!("node rejected eth_getCode: {payload}"),
        }
    }

    /// Formats the listing of `code`, followed by the halt and boundary reports.
    pub fn render(&self, code: &[u8]) -> String {
        let disassembly = disassemble(code);
        let mut out = disassembly.to_string();
        if let Some(halt) = disassembly.halt {
            warn!(target: "chainscan", ?halt, "Disassembly stopped early");
            out.push_str(&format!("halted: {halt:?}\n"));
        }
        if self.boundary {
            match detect_boundary(code) {
                Some(boundary) => out.push_str(&format!(
                    "boundary: {boundary}, runtime code at 0x{:x}\n",
                    boundary.runtime_offset
                )),
                None => out.push_str("boundary: none\n"),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainscan_node_client::{MockChainNode, NodeClient};

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        disasm: DisasmCommand,
    }

    fn parse(args: &[&str]) -> DisasmCommand {
        TestCli::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
            .disasm
    }

    #[test]
    fn test_render_listing() {
        let command = parse(&["0x6080604052"]);
        let code = hex::decode("6080604052").unwrap();
        assert_eq!(
            command.render(&code),
            "0x0000:\t(60)\tPUSH1\t0x80\n0x0002:\t(60)\tPUSH1\t0x40\n0x0004:\t(52)\tMSTORE\n"
        );
    }

    #[test]
    fn test_render_boundary() {
        let command = parse(&["--boundary", "00"]);
        let code = hex::decode("006100106000396000f3").unwrap();
        let out = command.render(&code);
        assert!(out.ends_with("boundary: 6100106000396000f3 at 1:a, runtime code at 0x10\n"));

        assert!(command.render(&[0x00]).ends_with("boundary: none\n"));
    }

    #[test]
    fn test_code_or_address_required() {
        assert!(TestCli::try_parse_from(["test"]).is_err());
        assert!(TestCli::try_parse_from(["test", "00", "--address", &Address::ZERO.to_string()])
            .is_err());
    }

    #[tokio::test]
    async fn test_bytecode_from_node() {
        let address = Address::repeat_byte(0x11);
        let mut node = MockChainNode::new();
        node.expect_code()
            .withf(move |a| *a == address)
            .returning(|_| Ok(NodeResponse::Found(Bytes::from_static(&[0x60, 0x01]))));
        let command = parse(&["--address", &address.to_string()]);

        let code = command.bytecode(Some(&node)).await.unwrap();

        assert_eq!(code.as_ref(), &[0x60, 0x01]);
    }

    #[tokio::test]
    async fn test_account_without_code() {
        let mut node = MockChainNode::new();
        node.expect_code().returning(|_| Ok(NodeResponse::Found(Bytes::new())));
        let command = parse(&["--address", &Address::ZERO.to_string()]);

        assert!(command.bytecode(Some(&node)).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_hex() {
        let command = parse(&["0xzz"]);
        assert!(command.bytecode::<NodeClient>(None).await.is_err());
    }
}
