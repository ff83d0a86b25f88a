//! Hash plugin for generating hashes

use super::traits::Plugin;
use crate::config::{AdapterConfig, AdapterConfigs};
use async_trait::async_trait;
use serde_json::{json, Value};
use sha2::{Digest, Sha256, Sha512};

/// Plugin for generating cryptographic hashes of `<algorithm> <text>` queries
pub struct HashPlugin {
    config: AdapterConfig,
}

impl HashPlugin {
    pub const TYPE_NAME: &'static str = "HashPlugin";

    pub fn new(configs: &AdapterConfigs) -> Self {
        Self {
            config: configs.get(Self::TYPE_NAME),
        }
    }

    fn compute_hash(algorithm: &str, input: &str) -> Option<String> {
        match algorithm {
            "md5" => Some(format!("{:x}", md5::compute(input.as_bytes()))),
            "sha256" | "sha-256" => {
                let mut hasher = Sha256::new();
                hasher.update(input.as_bytes());
                Some(format!("{:x}", hasher.finalize()))
            }
            "sha512" | "sha-512" => {
                let mut hasher = Sha512::new();
                hasher.update(input.as_bytes());
                Some(format!("{:x}", hasher.finalize()))
            }
            _ => None,
        }
    }

    fn answer(query: &str) -> Option<String> {
        let (algorithm, input) = query.trim().split_once(' ')?;
        let algorithm = algorithm.to_lowercase();
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        Self::compute_hash(&algorithm, input).map(|hash| {
            format!(
                "{} hash of \"{}\": {}",
                algorithm.to_uppercase(),
                input,
                hash
            )
        })
    }
}

#[async_trait]
impl Plugin for HashPlugin {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    async fn run(&self, query: &str) -> anyhow::Result<Value> {
        Ok(match Self::answer(query) {
            Some(answer) => json!({ "answer": answer }),
            None => json!({}),
        })
    }
}
