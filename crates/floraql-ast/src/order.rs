//! Sort specifications

use crate::AttributePath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction of one order entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
    Random,
    Topflop,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::Random => "random",
            Self::Topflop => "topflop",
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            "random" => Ok(Self::Random),
            "topflop" => Ok(Self::Topflop),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `instrument.name:asc`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderSpec {
    pub attribute: AttributePath,
    pub direction: Direction,
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.attribute.join("."), self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn test_direction_is_case_sensitive() {
        assert_eq!("asc".parse::<Direction>(), Ok(Direction::Asc));
        assert_eq!("topflop".parse::<Direction>(), Ok(Direction::Topflop));
        assert!("ASC".parse::<Direction>().is_err());
        assert!("as".parse::<Direction>().is_err());
    }

    #[test]
    fn test_order_spec_wire_shape() {
        let spec = OrderSpec {
            attribute: path(&["instrument", "id"]),
            direction: Direction::Desc,
        };
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({ "attribute": ["instrument", "id"], "direction": "desc" })
        );
        assert_eq!(spec.to_string(), "instrument.id:desc");
    }
}
