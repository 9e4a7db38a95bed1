//! Search by name or id: a pure term filter plus a debounce utility for
//! interactive input.

mod debounce;
mod filter;

pub use debounce::debounce;
pub use filter::filter;
