//! TMDB integration: the HTTP gateway, the catalog query surface, and the
//! response/domain types.

pub mod api_types;
pub mod client;
pub mod queries;
pub mod types;
