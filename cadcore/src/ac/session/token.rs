use serde::{
    de,
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use std::{
    fmt,
    str::FromStr,
};

use crate::error::ValueError;

/// Opaque bearer token identifying a session; rendered as 32 lowercase
/// hexadecimal characters, the only form it is parsed from.
#[derive(Copy, Clone, Default, Eq, Hash, PartialEq)]
pub struct SessionToken(pub(super) u128);

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // never leak the full token into logs
        let s = self.to_string();
        f.debug_tuple("SessionToken")
            .field(&format!("{}...", &s[..8]))
            .finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl FromStr for SessionToken {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            (s.len() == 32 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')))
                .then(|| u128::from_str_radix(s, 16).ok())
                .flatten()
                .ok_or_else(|| ValueError::Unsupported(
                    format!("{s} is not a 32 character long hexadecimal")
                ))?
        ))
    }
}

impl<'de> Deserialize<'de> for SessionToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for SessionToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use super::*;

    #[test]
    fn parse_token() -> anyhow::Result<()> {
        assert!(SessionToken::from_str("0").is_err());
        assert!(SessionToken::from_str("111111111111111111111111111111111").is_err());
        assert!(SessionToken::from_str("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        assert!(SessionToken::from_str("+1111111111111111111111111111111").is_err());
        assert!(SessionToken::from_str("0123456789ABCDEF0123456789ABCDEF").is_err());
        let zeros = "00000000000000000000000000000000";
        let token = SessionToken::from_str(zeros)?;
        assert_eq!(token, SessionToken::default());
        assert_eq!(zeros, token.to_string());
        let hex = "0123456789abcdef0123456789abcdef";
        assert_eq!(hex, SessionToken::from_str(hex)?.to_string());
        Ok(())
    }

    #[test]
    fn debug_is_truncated() -> anyhow::Result<()> {
        let token = SessionToken::from_str("0123456789abcdef0123456789abcdef")?;
        assert_eq!(format!("{token:?}"), r#"SessionToken("01234567...")"#);
        Ok(())
    }
}
