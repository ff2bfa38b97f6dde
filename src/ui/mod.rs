pub mod highlight;
pub mod output;

pub use output::{display_error, display_response, display_session, display_unauthorized, mask_token};
