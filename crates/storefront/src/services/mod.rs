//! Business services for the storefront.

pub mod checkout;

pub use checkout::{
    CheckoutError, CheckoutPlan, CheckoutReceipt, CheckoutService, DEFAULT_DELIVERY_DAYS,
    LineCharge, plan,
};
