//! Authentication: password hashing and JWT sessions

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::{Session, auth_middleware, create_customer_token, create_staff_token};
