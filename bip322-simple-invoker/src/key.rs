use crate::error::InvokerError;
use std::io::{self, BufRead};
use zeroize::Zeroizing;

/// Where the WIF key is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// The named environment variable.
    Env(String),
    /// The first line of standard input.
    Stdin,
}

/// Reads the WIF key from `source`. The returned text is wiped on drop.
pub fn read_key(source: &KeySource) -> Result<Zeroizing<String>, InvokerError> {
    match source {
        KeySource::Env(name) => {
            let value = Zeroizing::new(std::env::var(name).map_err(|_| {
                InvokerError::MissingKey(format!("environment variable '{}' is not set", name))
            })?);
            non_empty(value.trim())
        }
        KeySource::Stdin => read_key_from(io::stdin().lock()),
    }
}

/// Reads the first line of `reader` as a WIF key.
pub fn read_key_from<R: BufRead>(mut reader: R) -> Result<Zeroizing<String>, InvokerError> {
    let mut line = Zeroizing::new(String::new());
    reader
        .read_line(&mut line)
        .map_err(|e| InvokerError::MissingKey(format!("failed to read standard input: {}", e)))?;
    non_empty(line.trim())
}

fn non_empty(key: &str) -> Result<Zeroizing<String>, InvokerError> {
    if key.is_empty() {
        return Err(InvokerError::MissingKey("key input is empty".to_string()));
    }
    Ok(Zeroizing::new(key.to_string()))
}
