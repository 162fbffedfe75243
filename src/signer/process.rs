//! Signing delegated to an external program.
//!
//! The program is invoked as `program [args..] <private_key> <hash>` and must
//! print the signature on stdout. This is how BLS signing is usually wired in
//! deployments that ship a JS or Go signer next to the wallet.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::signer::{Signer, SignerError};

#[derive(Debug, Clone)]
pub struct ProcessSigner {
    program: String,
    args: Vec<String>,
    signature_len: usize,
    timeout: Duration,
}

impl ProcessSigner {
    pub fn new(program: String, args: Vec<String>, signature_len: usize, timeout: Duration) -> Self {
        Self {
            program,
            args,
            signature_len,
            timeout,
        }
    }
}

#[async_trait]
impl Signer for ProcessSigner {
    async fn sign(&self, private_key: &str, hash_hex: &str) -> Result<String, SignerError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(private_key)
            .arg(hash_hex)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| SignerError::Timeout(self.timeout.as_millis() as u64))?
            .map_err(|e| SignerError::Process(format!("failed to run '{}': {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SignerError::Process(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let signature = String::from_utf8(output.stdout)
            .map_err(|_| SignerError::Process("signature is not UTF-8".to_string()))?;

        tracing::debug!(program = %self.program, "External signer returned");
        Ok(signature.trim().to_string())
    }

    fn signature_len(&self) -> usize {
        self.signature_len
    }
}
