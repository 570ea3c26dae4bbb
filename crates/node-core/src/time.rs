//! ISO-8601 text representation of `chrono` date/time values.
//!
//! | Type | Text |
//! |---|---|
//! | `NaiveDate` | `2026-02-17` |
//! | `NaiveTime` | `14:30:00` |
//! | `NaiveDateTime` | `2026-02-17T14:30:00` |
//! | `DateTime<Utc>`, `DateTime<FixedOffset>` | `2026-02-17T14:30:00+00:00` |
//! | `DateTime<chrono_tz::Tz>` | `2026-02-17T14:30:00-08:00[America/Los_Angeles]` |
//!
//! Sub-second precision is not carried.

use crate::de::FromNode;
use crate::error::{DeserializationError, NodeError, Result};
use crate::node::Node;
use crate::ser::ToNode;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

const DATE: &str = "%Y-%m-%d";
const TIME: &str = "%H:%M:%S";
const DATETIME: &str = "%Y-%m-%dT%H:%M:%S";
const ZONED: &str = "%Y-%m-%dT%H:%M:%S%:z";

fn invalid(target: &'static str, message: impl ToString) -> NodeError {
    DeserializationError::InvalidText {
        target,
        message: message.to_string(),
    }
    .into()
}

impl ToNode for NaiveDate {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::Text(self.format(DATE).to_string()))
    }
}

impl FromNode for NaiveDate {
    fn from_node(node: &Node) -> Result<Self> {
        NaiveDate::parse_from_str(node.as_str()?, DATE).map_err(|e| invalid("date", e))
    }
}

impl ToNode for NaiveTime {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::Text(self.format(TIME).to_string()))
    }
}

impl FromNode for NaiveTime {
    fn from_node(node: &Node) -> Result<Self> {
        NaiveTime::parse_from_str(node.as_str()?, TIME).map_err(|e| invalid("time", e))
    }
}

impl ToNode for NaiveDateTime {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::Text(self.format(DATETIME).to_string()))
    }
}

impl FromNode for NaiveDateTime {
    fn from_node(node: &Node) -> Result<Self> {
        NaiveDateTime::parse_from_str(node.as_str()?, DATETIME)
            .map_err(|e| invalid("datetime", e))
    }
}

impl ToNode for DateTime<FixedOffset> {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::Text(self.format(ZONED).to_string()))
    }
}

impl FromNode for DateTime<FixedOffset> {
    fn from_node(node: &Node) -> Result<Self> {
        DateTime::parse_from_rfc3339(node.as_str()?).map_err(|e| invalid("zoned datetime", e))
    }
}

impl ToNode for DateTime<Utc> {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::Text(self.format(ZONED).to_string()))
    }
}

/// Accepts any offset (including `Z`) and normalizes to UTC.
impl FromNode for DateTime<Utc> {
    fn from_node(node: &Node) -> Result<Self> {
        DateTime::<FixedOffset>::from_node(node).map(|dt| dt.with_timezone(&Utc))
    }
}

impl ToNode for DateTime<Tz> {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::Text(format!(
            "{}[{}]",
            self.format(ZONED),
            self.timezone().name()
        )))
    }
}

impl FromNode for DateTime<Tz> {
    fn from_node(node: &Node) -> Result<Self> {
        let text = node.as_str()?;
        let (stamp, zone) = text
            .strip_suffix(']')
            .and_then(|rest| rest.split_once('['))
            .ok_or_else(|| invalid("zoned datetime", "missing `[Area/City]` zone suffix"))?;
        let tz: Tz = zone.parse().map_err(|e| invalid("time zone", e))?;
        let fixed =
            DateTime::parse_from_rfc3339(stamp).map_err(|e| invalid("zoned datetime", e))?;
        Ok(fixed.with_timezone(&tz))
    }
}
