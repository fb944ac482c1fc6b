//! Unsigned transactions handed back to the caller for signing.

use serde::{Deserialize, Serialize};
use warps_types::ChainEnv;

const MIN_GAS_LIMIT: u64 = 50_000;
const GAS_PER_DATA_BYTE: u64 = 1_500;
pub const REGISTRY_CALL_GAS_LIMIT: u64 = 10_000_000;

/// A transaction ready to be signed and broadcast by the caller's wallet.
///
/// Nothing in this crate signs or submits transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTransaction {
    pub sender: String,
    pub receiver: String,
    pub data: String,
    pub value: String,
    pub gas_limit: u64,
    pub chain_id: String,
}

impl UnsignedTransaction {
    /// Self-addressed transaction carrying `data`, priced by payload length.
    pub fn inscription(sender: &str, data: String, env: ChainEnv) -> Self {
        let gas_limit = MIN_GAS_LIMIT + GAS_PER_DATA_BYTE * data.len() as u64;
        Self {
            sender: sender.to_string(),
            receiver: sender.to_string(),
            data,
            value: "0".to_string(),
            gas_limit,
            chain_id: env.chain_id().to_string(),
        }
    }

    /// Contract call encoded as `func@hexarg@hexarg`.
    pub fn contract_call(
        sender: &str,
        contract: &str,
        func: &str,
        args: &[&str],
        env: ChainEnv,
    ) -> Self {
        let mut data = func.to_string();
        for arg in args {
            data.push('@');
            data.push_str(&hex::encode(arg));
        }

        Self {
            sender: sender.to_string(),
            receiver: contract.to_string(),
            data,
            value: "0".to_string(),
            gas_limit: REGISTRY_CALL_GAS_LIMIT,
            chain_id: env.chain_id().to_string(),
        }
    }
}
