//! Terminal chess board served through a client-side route table.
//!
//! The binary mounts [`rook::RouterView`] over the table built by
//! [`routes::create_route_table`]; the Chess view is loaded on the first navigation to `/`.

pub mod config;
pub mod logging;
pub mod routes;
pub mod views;
