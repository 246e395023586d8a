//! Capability names and their route bindings

use std::fmt;

use axum::http::Method;

/// Whether a capability is served on the collection path or the item path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `/{parent}/{version}/{resource}`
    Collection,
    /// `/{parent}/{version}/{resource}/{id}`
    Item,
}

/// One named data adapter operation
///
/// Each capability maps to exactly one HTTP verb and path. The display form is
/// the camelCase name used in error messages (`"createOne not yet implemented"`).
///
/// # Example
///
/// ```rust
/// use resty::adapter::{Capability, Scope};
///
/// assert_eq!(Capability::SelectMany.to_string(), "selectMany");
/// assert_eq!(Capability::SelectOne.scope(), Scope::Item);
/// assert_eq!(Capability::CreateOne.method(), axum::http::Method::POST);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// `POST` on the collection path
    CreateOne,
    /// `GET` on the item path
    SelectOne,
    /// `GET` on the collection path
    SelectMany,
    /// `PUT` on the item path
    UpdateOne,
    /// `DELETE` on the item path
    DeleteOne,
    /// `DELETE` on the collection path
    DeleteAll,
}

impl Capability {
    /// Every capability, in declaration order
    pub const ALL: [Capability; 6] = [
        Self::CreateOne,
        Self::SelectOne,
        Self::SelectMany,
        Self::UpdateOne,
        Self::DeleteOne,
        Self::DeleteAll,
    ];

    /// The camelCase capability name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateOne => "createOne",
            Self::SelectOne => "selectOne",
            Self::SelectMany => "selectMany",
            Self::UpdateOne => "updateOne",
            Self::DeleteOne => "deleteOne",
            Self::DeleteAll => "deleteAll",
        }
    }

    /// The HTTP verb the capability is bound to
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::SelectMany | Self::SelectOne => Method::GET,
            Self::CreateOne => Method::POST,
            Self::UpdateOne => Method::PUT,
            Self::DeleteOne | Self::DeleteAll => Method::DELETE,
        }
    }

    /// The path the capability is bound to
    #[must_use]
    pub const fn scope(&self) -> Scope {
        match self {
            Self::SelectMany | Self::CreateOne | Self::DeleteAll => Scope::Collection,
            Self::SelectOne | Self::UpdateOne | Self::DeleteOne => Scope::Item,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
