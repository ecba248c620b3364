use std::fmt;
use std::str::FromStr;

/// How sprite pixels that fall off the 64x32 grid are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Coordinates are taken modulo the grid width and height.
    Wrap,
    /// Pixels outside the grid are dropped. They never collide.
    Clip,
}

impl Default for EdgePolicy {
    fn default() -> Self {
        EdgePolicy::Wrap
    }
}

impl FromStr for EdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wrap" => Ok(EdgePolicy::Wrap),
            "clip" => Ok(EdgePolicy::Clip),
            other => Err(format!("unknown edge policy `{}`, expected wrap or clip", other)),
        }
    }
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgePolicy::Wrap => write!(f, "wrap"),
            EdgePolicy::Clip => write!(f, "clip"),
        }
    }
}

/// Behaviours that differ between CHIP-8 interpreters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    pub edge: EdgePolicy,
    /// FX55/FX65 leave I at I + X + 1 like the COSMAC VIP interpreter.
    pub load_store_increments_i: bool,
}

#[cfg(test)]
mod tests {
    use super::{EdgePolicy, Quirks};

    #[test]
    fn test_default() {
        let quirks = Quirks::default();

        assert_eq!(quirks.edge, EdgePolicy::Wrap);
        assert_eq!(quirks.load_store_increments_i, false);
    }

    #[test]
    fn test_edge_policy_from_str() {
        assert_eq!("wrap".parse(), Ok(EdgePolicy::Wrap));
        assert_eq!("CLIP".parse(), Ok(EdgePolicy::Clip));
        assert!("bounce".parse::<EdgePolicy>().is_err());
    }
}
