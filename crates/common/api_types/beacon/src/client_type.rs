/// Deployment topology of the beacon node behind a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeaconClientType {
    /// Beacon node and validator client run as separate processes.
    SplitProcess,
    /// Beacon node and validator client share one process or container, so request pacing
    /// should be gentler.
    SingleProcess,
    Unknown,
}

impl BeaconClientType {
    /// Classifies a node from the version string reported by `/eth/v1/node/version`,
    /// e.g. `Lighthouse/v5.3.0-d6ba8c3/x86_64-linux`.
    pub fn from_node_version(version: &str) -> Self {
        let Some((client, _)) = version.split_once('/') else {
            return BeaconClientType::Unknown;
        };
        match client.to_ascii_lowercase().as_str() {
            "nimbus" => BeaconClientType::SingleProcess,
            "lighthouse" | "prysm" | "teku" | "lodestar" | "grandine" | "ream" => {
                BeaconClientType::SplitProcess
            }
            _ => BeaconClientType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Nimbus/v24.10.0-0ea4e9/linux-amd64", BeaconClientType::SingleProcess)]
    #[case("Lighthouse/v5.3.0-d6ba8c3/x86_64-linux", BeaconClientType::SplitProcess)]
    #[case(
        "teku/v24.10.3/linux-x86_64/-eclipseadoptium-openjdk64bitservervm-java-21",
        BeaconClientType::SplitProcess
    )]
    #[case("Prysm/v5.1.2/0c6b5b0", BeaconClientType::SplitProcess)]
    #[case("garbage", BeaconClientType::Unknown)]
    #[case("Mystery/v1.0.0", BeaconClientType::Unknown)]
    fn classifies_node_versions(#[case] version: &str, #[case] expected: BeaconClientType) {
        assert_eq!(BeaconClientType::from_node_version(version), expected);
    }
}
