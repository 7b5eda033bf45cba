//! Domain identifiers (strongly-typed IDs).
//!
//! ULID ベースの ID を Phantom type パターンで型付けします。
//! - `PrunerId`: one per `Pruner` instance, used to correlate logs and events
//! - `PassId`: one per pruning pass (a tick that actually pruned)
//!
//! `PrunerId` と `PassId` は異なる型なので、混同できない。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"pruner-", "pass-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// `T` は PhantomData で、実行時にはメモリを消費しません。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Pruner のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pruner {}

impl IdMarker for Pruner {
    fn prefix() -> &'static str {
        "pruner-"
    }
}

/// Pass のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pass {}

impl IdMarker for Pass {
    fn prefix() -> &'static str {
        "pass-"
    }
}

/// Identifier of a pruner instance.
pub type PrunerId = Id<Pruner>;

/// Identifier of one pruning pass over the registry.
pub type PassId = Id<Pass>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_type_prefix() {
        let ulid = Ulid::new();
        let pruner = PrunerId::from_ulid(ulid);
        let pass: PassId = ulid.into();

        assert_eq!(pruner.as_ulid(), pass.as_ulid());
        assert_eq!(pruner.to_string(), format!("pruner-{ulid}"));
        assert_eq!(pass.to_string(), format!("pass-{ulid}"));
    }

    #[test]
    fn ids_round_trip_through_json() {
        let id = PassId::from_ulid(Ulid::new());
        let json = serde_json::to_string(&id).unwrap();
        let back: PassId = serde_json::from_str(&json).unwrap();

        assert_eq!(id, back);
        assert!(!json.contains("pass-"));
    }

    #[test]
    fn phantom_marker_is_zero_sized() {
        assert_eq!(std::mem::size_of::<PrunerId>(), std::mem::size_of::<Ulid>());
    }
}
