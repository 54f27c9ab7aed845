use std::{fs, sync::Arc};

use crate::networks::{DEV, HOLESKY, HOODI, MAINNET, NetworkSpec};

/// Resolves a built-in network by name, or reads a YAML network spec from the given path.
pub fn network_spec_parser(network_string: &str) -> Result<Arc<NetworkSpec>, String> {
    match network_string {
        "mainnet" => Ok(MAINNET.clone()),
        "holesky" => Ok(HOLESKY.clone()),
        "hoodi" => Ok(HOODI.clone()),
        "dev" => Ok(DEV.clone()),
        path => read_network_spec(path),
    }
}

fn read_network_spec(path: &str) -> Result<Arc<NetworkSpec>, String> {
    let contents = fs::read_to_string(path).map_err(|err| format!("Failed to read file: {err}"))?;
    Ok(Arc::new(serde_yaml::from_str(&contents).map_err(
        |err| format!("Failed to parse YAML from: {err}"),
    )?))
}
