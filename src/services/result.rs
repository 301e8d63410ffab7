//! Tagged result shapes shared by all services
//!
//! Expected conditions (validation failure, not-found, not-authenticated)
//! are data, carried as human-readable messages; services reserve `Err` for
//! infrastructure failures, which propagate verbatim to the transport layer.

/// Either a single entity or a list of messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOneResult<T> {
    Entity(T),
    Messages(Vec<String>),
}

impl<T> QueryOneResult<T> {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Messages(vec![msg.into()])
    }

    pub fn entity(self) -> Option<T> {
        match self {
            Self::Entity(e) => Some(e),
            Self::Messages(_) => None,
        }
    }

    pub fn messages(&self) -> Option<&[String]> {
        match self {
            Self::Entity(_) => None,
            Self::Messages(m) => Some(m),
        }
    }
}

/// Either an array of entities or a list of messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryArrayResult<T> {
    Entities(Vec<T>),
    Messages(Vec<String>),
}

impl<T> QueryArrayResult<T> {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Messages(vec![msg.into()])
    }

    pub fn entities(self) -> Option<Vec<T>> {
        match self {
            Self::Entities(e) => Some(e),
            Self::Messages(_) => None,
        }
    }

    pub fn messages(&self) -> Option<&[String]> {
        match self {
            Self::Entities(_) => None,
            Self::Messages(m) => Some(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_result_accessors() {
        let ok: QueryOneResult<i32> = QueryOneResult::Entity(7);
        assert_eq!(ok.clone().entity(), Some(7));
        assert_eq!(ok.messages(), None);

        let err: QueryOneResult<i32> = QueryOneResult::message("nope");
        assert_eq!(err.messages(), Some(&["nope".to_string()][..]));
        assert_eq!(err.entity(), None);
    }

    #[test]
    fn test_array_result_accessors() {
        let empty: QueryArrayResult<i32> = QueryArrayResult::Entities(vec![]);
        // zero entities is a valid non-error result
        assert_eq!(empty.messages(), None);
        assert_eq!(empty.entities(), Some(vec![]));
    }
}
