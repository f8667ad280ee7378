//! Rate tables are stored as JSON objects, so minute offsets travel as strings.
//!
//! Use with `#[serde(with = "crate::core::rates::keys")]`.

use std::fmt::Formatter;

use serde::{
    Deserializer,
    Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::{
    core::rates::{Minute, RateTable},
    prelude::warn,
    quantity::rate::KilowattHourRate,
};

pub fn serialize<S>(table: &RateTable, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut serialize_map = serializer.serialize_map(Some(table.len()))?;
    for (minute, rate) in table {
        serialize_map.serialize_entry(&minute.to_string(), rate)?;
    }
    serialize_map.end()
}

/// Keys that are not valid minute offsets are skipped with a warning, the rest of the table is kept.
pub fn deserialize<'de, D>(deserializer: D) -> Result<RateTable, D::Error>
where
    D: Deserializer<'de>,
{
    struct RateTableVisitor;

    impl<'de> Visitor<'de> for RateTableVisitor {
        type Value = RateTable;

        fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
            write!(formatter, "a map of minute offsets to rates")
        }

        fn visit_map<MA>(self, mut map_access: MA) -> Result<Self::Value, MA::Error>
        where
            MA: MapAccess<'de>,
        {
            let mut table = RateTable::new();
            while let Some((key, rate)) = map_access.next_entry::<String, KilowattHourRate>()? {
                match key.parse::<Minute>() {
                    Ok(minute) => {
                        table.insert(minute, rate);
                    }
                    Err(error) => {
                        warn!("skipping malformed minute key `{key}`: {error}");
                    }
                }
            }
            Ok(table)
        }
    }

    deserializer.deserialize_map(RateTableVisitor)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::prelude::Result;

    #[derive(Serialize, Deserialize)]
    struct Wrapper(#[serde(with = "crate::core::rates::keys")] RateTable);

    #[test]
    fn test_serialize_minute_keys_as_strings() -> Result {
        let table = RateTable::from([(90, 25.0.into()), (0, 10.0.into())]);
        assert_eq!(serde_json::to_string(&Wrapper(table))?, r#"{"0":10.0,"90":25.0}"#);
        Ok(())
    }

    #[test]
    fn test_deserialize_minute_keys() -> Result {
        let Wrapper(table) = serde_json::from_str(r#"{"30": 15.0, "0": 10}"#)?;
        assert_eq!(table, RateTable::from([(0, 10.0.into()), (30, 15.0.into())]));
        Ok(())
    }

    #[test]
    fn test_deserialize_skips_malformed_keys() -> Result {
        let Wrapper(table) =
            serde_json::from_str(r#"{"0": 10.0, "noon": 12.0, "-30": 1.0, "60": 20.0}"#)?;
        assert_eq!(table, RateTable::from([(0, 10.0.into()), (60, 20.0.into())]));
        Ok(())
    }

    #[test]
    fn test_deserialize_rejects_non_numeric_rate() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"0": "expensive"}"#).is_err());
    }
}
