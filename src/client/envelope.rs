use serde::ser::{Serialize, SerializeMap, Serializer};

/// Outcome of a client call: the decoded payload or an error message.
///
/// Serializes as `{"success": true, ...payload}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(T),
    Failure(String),
}

impl<T> Envelope<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        Envelope::Failure(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Success(data) => Some(data),
            Envelope::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Failure(message) => Some(message),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Envelope<U> {
        match self {
            Envelope::Success(data) => Envelope::Success(f(data)),
            Envelope::Failure(message) => Envelope::Failure(message),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Envelope::Success(data) => Ok(data),
            Envelope::Failure(message) => Err(message),
        }
    }

    /// Returns the payload, or the fallback built from the error message.
    pub fn unwrap_or_else<F: FnOnce(&str) -> T>(self, fallback: F) -> T {
        match self {
            Envelope::Success(data) => data,
            Envelope::Failure(message) => {
                tracing::warn!(error = %message, "using fallback data");
                fallback(&message)
            }
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::Success(data) => {
                #[derive(serde::Serialize)]
                struct Success<'a, T> {
                    success: bool,
                    #[serde(flatten)]
                    data: &'a T,
                }
                Success {
                    success: true,
                    data,
                }
                .serialize(serializer)
            }
            Envelope::Failure(message) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(serde::Serialize)]
    struct Payload {
        stats: u32,
    }

    #[test]
    fn success_flattens_payload_next_to_flag() {
        let value = serde_json::to_value(Envelope::Success(Payload { stats: 3 })).unwrap();
        assert_eq!(value, json!({ "success": true, "stats": 3 }));
    }

    #[test]
    fn failure_carries_only_the_error() {
        let value = serde_json::to_value(Envelope::<Payload>::failure("Failed to fetch interview stats")).unwrap();
        assert_eq!(
            value,
            json!({ "success": false, "error": "Failed to fetch interview stats" })
        );
    }

    #[test]
    fn fallback_only_applies_to_failures() {
        assert_eq!(Envelope::Success(1).unwrap_or_else(|_| 2), 1);
        assert_eq!(Envelope::<u8>::failure("down").unwrap_or_else(|_| 2), 2);
        assert_eq!(Envelope::<u8>::failure("down").into_result(), Err("down".to_string()));
        assert_eq!(Envelope::Success(2).map(|n| n * 2).data(), Some(&4));
    }
}
