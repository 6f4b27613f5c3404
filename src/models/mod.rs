pub mod notification;
pub mod response;
