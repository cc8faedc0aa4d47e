//! Screen components.

pub mod coupon;

pub use coupon::CouponScreen;
