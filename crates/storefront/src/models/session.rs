//! Session-related types.
//!
//! The cart is the only thing this service keeps in the session. Session
//! lifetime (cookie expiry, store eviction) is an external concern; the
//! purchase path never expires a cart itself.

/// Session keys for customer state.
pub mod keys {
    /// Key for the session-scoped shopping cart.
    pub const CART: &str = "cart";
}
