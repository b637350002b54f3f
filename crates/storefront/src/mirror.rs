//! Cart/wishlist membership mirror.
//!
//! The server owns cart and wishlist membership; this mirror is the
//! session-held copy of the two booleans per product. The rules:
//!
//! - flags change only after server confirmation (`commit`); a failed call
//!   (`abort`) leaves them exactly as they were
//! - a toggle may not start while one is already in flight for the same
//!   product and kind - the second attempt is rejected, not queued
//! - `apply_cart` / `apply_wishlist` replace the flags wholesale from a
//!   fresh server list, which is the only way membership is ever removed
//!   without a confirmed toggle
//!
//! The mirror serializes into the session, so it survives exactly as long
//! as the shopper's session does.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use saffron_core::ProductId;

/// Which membership a toggle targets. The two are independent per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleKind {
    Cart,
    Wishlist,
}

impl std::fmt::Display for ToggleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cart => write!(f, "cart"),
            Self::Wishlist => write!(f, "wishlist"),
        }
    }
}

/// Rejection raised when a toggle is already in flight for the entity.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("a {kind} update for this product is already in progress")]
pub struct ToggleInFlight {
    /// The membership the rejected toggle targeted.
    pub kind: ToggleKind,
}

/// Per-product membership state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Membership {
    in_cart: bool,
    in_wishlist: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    cart_in_flight: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    wishlist_in_flight: bool,
}

impl Membership {
    fn flag(&self, kind: ToggleKind) -> bool {
        match kind {
            ToggleKind::Cart => self.in_cart,
            ToggleKind::Wishlist => self.in_wishlist,
        }
    }

    fn flag_mut(&mut self, kind: ToggleKind) -> &mut bool {
        match kind {
            ToggleKind::Cart => &mut self.in_cart,
            ToggleKind::Wishlist => &mut self.in_wishlist,
        }
    }

    fn in_flight_mut(&mut self, kind: ToggleKind) -> &mut bool {
        match kind {
            ToggleKind::Cart => &mut self.cart_in_flight,
            ToggleKind::Wishlist => &mut self.wishlist_in_flight,
        }
    }

    fn is_default(&self) -> bool {
        !self.in_cart && !self.in_wishlist && !self.cart_in_flight && !self.wishlist_in_flight
    }
}

/// The session-held membership mirror.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipMirror {
    entries: HashMap<String, Membership>,
}

impl MembershipMirror {
    /// Whether the product is in the cart, per the last confirmed state.
    #[must_use]
    pub fn in_cart(&self, product: &ProductId) -> bool {
        self.entries
            .get(product.as_str())
            .is_some_and(|m| m.in_cart)
    }

    /// Whether the product is in the wishlist, per the last confirmed state.
    #[must_use]
    pub fn in_wishlist(&self, product: &ProductId) -> bool {
        self.entries
            .get(product.as_str())
            .is_some_and(|m| m.in_wishlist)
    }

    /// Mark a toggle as in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ToggleInFlight`] when a toggle for the same product and
    /// kind has begun and not yet resolved.
    pub fn begin_toggle(
        &mut self,
        product: &ProductId,
        kind: ToggleKind,
    ) -> Result<(), ToggleInFlight> {
        let membership = self.entries.entry(product.as_str().to_string()).or_default();
        let in_flight = membership.in_flight_mut(kind);
        if *in_flight {
            return Err(ToggleInFlight { kind });
        }
        *in_flight = true;
        Ok(())
    }

    /// Resolve an in-flight toggle after server confirmation, setting the
    /// flag to the toggle's target value.
    pub fn commit(&mut self, product: &ProductId, kind: ToggleKind, member: bool) {
        if let Some(membership) = self.entries.get_mut(product.as_str()) {
            *membership.in_flight_mut(kind) = false;
            *membership.flag_mut(kind) = member;
        }
        self.prune(product);
    }

    /// Resolve an in-flight toggle after a failure, leaving the flag at its
    /// pre-toggle value.
    pub fn abort(&mut self, product: &ProductId, kind: ToggleKind) {
        if let Some(membership) = self.entries.get_mut(product.as_str()) {
            *membership.in_flight_mut(kind) = false;
        }
        self.prune(product);
    }

    /// Replace all cart flags from a fresh server list.
    pub fn apply_cart<'a>(&mut self, members: impl IntoIterator<Item = &'a ProductId>) {
        self.apply(ToggleKind::Cart, members);
    }

    /// Replace all wishlist flags from a fresh server list.
    pub fn apply_wishlist<'a>(&mut self, members: impl IntoIterator<Item = &'a ProductId>) {
        self.apply(ToggleKind::Wishlist, members);
    }

    fn apply<'a>(&mut self, kind: ToggleKind, members: impl IntoIterator<Item = &'a ProductId>) {
        let members: HashSet<&str> = members.into_iter().map(ProductId::as_str).collect();

        for (id, membership) in &mut self.entries {
            *membership.flag_mut(kind) = members.contains(id.as_str());
        }
        for id in members {
            let membership = self.entries.entry(id.to_string()).or_default();
            *membership.flag_mut(kind) = true;
        }
        self.entries.retain(|_, m| !m.is_default());
    }

    /// Flags for one product as `(in_cart, in_wishlist)`.
    #[must_use]
    pub fn membership(&self, product: &ProductId) -> (bool, bool) {
        self.entries
            .get(product.as_str())
            .map_or((false, false), |m| (m.in_cart, m.in_wishlist))
    }

    fn prune(&mut self, product: &ProductId) {
        if self
            .entries
            .get(product.as_str())
            .is_some_and(Membership::is_default)
        {
            self.entries.remove(product.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: &str) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_successful_toggle_sets_target_flag() {
        let mut mirror = MembershipMirror::default();
        mirror
            .begin_toggle(&pid("p1"), ToggleKind::Wishlist)
            .expect("no toggle in flight");
        mirror.commit(&pid("p1"), ToggleKind::Wishlist, true);
        assert!(mirror.in_wishlist(&pid("p1")));
        assert!(!mirror.in_cart(&pid("p1")));
    }

    #[test]
    fn test_failed_toggle_preserves_previous_flag() {
        let mut mirror = MembershipMirror::default();
        mirror
            .begin_toggle(&pid("p1"), ToggleKind::Cart)
            .expect("no toggle in flight");
        mirror.commit(&pid("p1"), ToggleKind::Cart, true);

        // A later remove fails; the flag must stay true.
        mirror
            .begin_toggle(&pid("p1"), ToggleKind::Cart)
            .expect("previous toggle resolved");
        mirror.abort(&pid("p1"), ToggleKind::Cart);
        assert!(mirror.in_cart(&pid("p1")));
    }

    #[test]
    fn test_second_toggle_rejected_while_in_flight() {
        let mut mirror = MembershipMirror::default();
        mirror
            .begin_toggle(&pid("p1"), ToggleKind::Cart)
            .expect("no toggle in flight");
        let err = mirror
            .begin_toggle(&pid("p1"), ToggleKind::Cart)
            .expect_err("second toggle must be rejected");
        assert_eq!(err.kind, ToggleKind::Cart);
    }

    #[test]
    fn test_cart_and_wishlist_toggles_are_independent() {
        let mut mirror = MembershipMirror::default();
        mirror
            .begin_toggle(&pid("p1"), ToggleKind::Cart)
            .expect("no toggle in flight");
        // A wishlist toggle for the same product is a different entity.
        mirror
            .begin_toggle(&pid("p1"), ToggleKind::Wishlist)
            .expect("different kind is independent");
    }

    #[test]
    fn test_toggles_on_different_products_are_independent() {
        let mut mirror = MembershipMirror::default();
        mirror
            .begin_toggle(&pid("p1"), ToggleKind::Cart)
            .expect("no toggle in flight");
        mirror
            .begin_toggle(&pid("p2"), ToggleKind::Cart)
            .expect("different product is independent");
    }

    #[test]
    fn test_apply_wishlist_reconciles_from_server_truth() {
        let mut mirror = MembershipMirror::default();
        mirror
            .begin_toggle(&pid("p1"), ToggleKind::Wishlist)
            .expect("no toggle in flight");
        mirror.commit(&pid("p1"), ToggleKind::Wishlist, true);

        // Server truth: p1 gone, p2 present. Refetch wins; no blind removal.
        let members = vec![pid("p2")];
        mirror.apply_wishlist(&members);
        assert!(!mirror.in_wishlist(&pid("p1")));
        assert!(mirror.in_wishlist(&pid("p2")));
    }

    #[test]
    fn test_apply_cart_leaves_wishlist_untouched() {
        let mut mirror = MembershipMirror::default();
        mirror
            .begin_toggle(&pid("p1"), ToggleKind::Wishlist)
            .expect("no toggle in flight");
        mirror.commit(&pid("p1"), ToggleKind::Wishlist, true);

        mirror.apply_cart(&[pid("p2")]);
        assert!(mirror.in_wishlist(&pid("p1")));
        assert!(mirror.in_cart(&pid("p2")));
        assert!(!mirror.in_cart(&pid("p1")));
    }

    #[test]
    fn test_session_round_trip() {
        let mut mirror = MembershipMirror::default();
        mirror
            .begin_toggle(&pid("p1"), ToggleKind::Cart)
            .expect("no toggle in flight");
        mirror.commit(&pid("p1"), ToggleKind::Cart, true);

        let json = serde_json::to_string(&mirror).expect("serialize");
        let back: MembershipMirror = serde_json::from_str(&json).expect("deserialize");
        assert!(back.in_cart(&pid("p1")));
    }
}
