// Core types shared by the gateway, the input loop and the session.

pub mod error;
pub mod value;

pub use error::HotelError;
pub use value::SqlValue;
