//! Session identifiers and their shareable location form

use std::fmt;
use std::str::FromStr;

use rand::Rng;

/// Four-digit session number shared between host and joiner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u16);

impl SessionId {
    pub const MIN: u16 = 1000;
    pub const MAX: u16 = 9999;

    pub fn new(raw: u16) -> Result<Self, SessionIdError> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(SessionIdError::OutOfRange(raw))
        }
    }

    /// Fresh id for a new host session
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    /// Extract the first run of four digits from a location path like `/4821`
    pub fn from_location_path(path: &str) -> Result<Self, SessionIdError> {
        let bytes = path.as_bytes();
        let start = bytes
            .windows(4)
            .position(|w| w.iter().all(u8::is_ascii_digit))
            .ok_or_else(|| SessionIdError::NotFound(path.to_string()))?;

        let digits = &path[start..start + 4];
        let raw: u16 = digits
            .parse()
            .map_err(|_| SessionIdError::NotFound(path.to_string()))?;
        Self::new(raw)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Path the host publishes so a joiner can find the session
    pub fn location_path(self) -> String {
        format!("/{}", self.0)
    }

    /// Connection query string for the relay
    pub fn query(self) -> String {
        format!("gameUuid={}", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_location_path(s)
    }
}

/// Session id parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionIdError {
    #[error("no 4-digit session id in {0:?}")]
    NotFound(String),

    #[error("session id {0} outside 1000..=9999")]
    OutOfRange(u16),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn parses_id_from_location_path() {
        assert_eq!(SessionId::from_location_path("/4821").unwrap().get(), 4821);
        assert_eq!(SessionId::from_location_path("/game/1234/extra").unwrap().get(), 1234);
        assert_eq!("/98765".parse::<SessionId>().unwrap().get(), 9876);
    }

    #[test]
    fn rejects_paths_without_four_digits() {
        assert_eq!(
            SessionId::from_location_path("/"),
            Err(SessionIdError::NotFound("/".to_string()))
        );
        assert!(SessionId::from_location_path("/12a34").is_err());
    }

    #[test]
    fn rejects_leading_zero_ids() {
        assert_eq!(
            SessionId::from_location_path("/0042"),
            Err(SessionIdError::OutOfRange(42))
        );
    }

    #[test]
    fn generated_ids_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let id = SessionId::generate(&mut rng);
            assert!((SessionId::MIN..=SessionId::MAX).contains(&id.get()));
        }
    }

    #[test]
    fn location_path_round_trips() {
        let id = SessionId::new(5150).unwrap();
        assert_eq!(id.location_path(), "/5150");
        assert_eq!(SessionId::from_location_path(&id.location_path()), Ok(id));
        assert_eq!(id.query(), "gameUuid=5150");
    }
}
