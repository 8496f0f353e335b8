// Record storage: validation, CSV / in-memory stores and the record API.

pub mod handlers;
pub mod store;
pub mod validation;
