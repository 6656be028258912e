//! Typed database-credential secret.

use serde::{Deserialize, Deserializer};

/// The conventional shape of an RDS credential secret.
///
/// `port` accepts either a JSON number or a numeric string; secrets
/// created through the console store every field as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct DbSecret {
    pub host: String,
    #[serde(deserialize_with = "port_from_number_or_string")]
    pub port: u16,
    pub dbname: String,
    pub username: String,
    pub password: String,
}

impl DbSecret {
    /// Render `host:port/dbname`, the short connection locator used in logs.
    pub fn url(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.dbname)
    }
}

fn port_from_number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortRepr {
        Number(u16),
        Text(String),
    }

    match PortRepr::deserialize(deserializer)? {
        PortRepr::Number(n) => Ok(n),
        PortRepr::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_port() {
        let secret: DbSecret = serde_json::from_str(
            r#"{"host":"db.internal","port":5432,"dbname":"etl","username":"u","password":"p"}"#,
        )
        .unwrap();
        assert_eq!(secret.port, 5432);
    }

    #[test]
    fn string_port() {
        let secret: DbSecret = serde_json::from_str(
            r#"{"host":"db.internal","port":"6432","dbname":"etl","username":"u","password":"p"}"#,
        )
        .unwrap();
        assert_eq!(secret.port, 6432);
    }

    #[test]
    fn non_numeric_port_rejected() {
        let result: Result<DbSecret, _> = serde_json::from_str(
            r#"{"host":"db.internal","port":"not-a-port","dbname":"etl","username":"u","password":"p"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn url_locator() {
        let secret: DbSecret = serde_json::from_str(
            r#"{"host":"db.internal","port":5432,"dbname":"etl","username":"u","password":"p"}"#,
        )
        .unwrap();
        assert_eq!(secret.url(), "db.internal:5432/etl");
    }
}
