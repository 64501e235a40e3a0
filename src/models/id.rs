use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use uuid::Uuid;

const LOCAL_PREFIX: &str = "local-";

/// Identifier of a cached entity. Server rows always carry `Server`;
/// optimistically created entities carry `Local` until the next
/// authoritative refetch replaces them.
///
/// Server-bound request types use plain `Uuid`, so a `Local` id cannot
/// end up in a persisted write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    Server(Uuid),
    Local(u64),
}

impl EntityId {
    pub fn is_local(&self) -> bool {
        matches!(self, EntityId::Local(_))
    }

    pub fn as_server(&self) -> Option<Uuid> {
        match self {
            EntityId::Server(id) => Some(*id),
            EntityId::Local(_) => None,
        }
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        EntityId::Server(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Server(id) => write!(f, "{}", id),
            EntityId::Local(n) => write!(f, "{}{}", LOCAL_PREFIX, n),
        }
    }
}

impl FromStr for EntityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix(LOCAL_PREFIX) {
            let n = rest
                .parse::<u64>()
                .map_err(|_| format!("invalid local id: {}", s))?;
            return Ok(EntityId::Local(n));
        }

        Uuid::parse_str(s)
            .map(EntityId::Server)
            .map_err(|_| format!("invalid entity id: {}", s))
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// Database columns are plain UUIDs; decoding always yields `Server`.
impl sqlx::Type<sqlx::Postgres> for EntityId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for EntityId {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <Uuid as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(EntityId::Server(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_id_round_trips_as_uuid_string() {
        let uuid = Uuid::new_v4();
        let id = EntityId::Server(uuid);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));

        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(!back.is_local());
    }

    #[test]
    fn local_id_round_trips_with_prefix() {
        let id = EntityId::Local(7);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"local-7\"");

        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(back.is_local());
        assert_eq!(back.as_server(), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("not-an-id".parse::<EntityId>().is_err());
        assert!("local-xyz".parse::<EntityId>().is_err());
    }
}
