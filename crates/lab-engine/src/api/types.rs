use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The simulations the lab can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationKind {
    FreeFall,
    Pendulum,
    Projectile,
    Titration,
    Circuit,
}

impl SimulationKind {
    pub const ALL: [SimulationKind; 5] = [
        SimulationKind::FreeFall,
        SimulationKind::Pendulum,
        SimulationKind::Projectile,
        SimulationKind::Titration,
        SimulationKind::Circuit,
    ];

    /// Identifier used by the host page (`"free-fall"`, `"pendulum"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            SimulationKind::FreeFall => "free-fall",
            SimulationKind::Pendulum => "pendulum",
            SimulationKind::Projectile => "projectile",
            SimulationKind::Titration => "titration",
            SimulationKind::Circuit => "circuit",
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a host page names a simulation the lab does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown simulation kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for SimulationKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SimulationKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Opaque token for a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Identifies a state-change subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u32);

/// Identifies one asynchronous texture load.
/// A result carrying a ticket the viewport no longer waits on is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetTicket(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in SimulationKind::ALL {
            assert_eq!(kind.name().parse::<SimulationKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_rejected() {
        let err = "orbit".parse::<SimulationKind>().unwrap_err();
        assert_eq!(err, UnknownKind("orbit".into()));
    }

    #[test]
    fn serde_uses_host_names() {
        let json = serde_json::to_string(&SimulationKind::FreeFall).unwrap();
        assert_eq!(json, "\"free-fall\"");
    }
}
