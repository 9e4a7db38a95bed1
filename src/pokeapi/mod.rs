//! PokéAPI access: wire types, the entity mapper, the data-access actions and
//! their cached counterparts.

pub mod api_types;
pub mod cache;
pub mod cached_client;
pub mod client;
pub mod mapper;
#[cfg(test)]
pub mod testing;
pub mod transport;
pub mod types;
