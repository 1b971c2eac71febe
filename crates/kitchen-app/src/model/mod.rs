//! Wire data structures shared by the REST client, the hub and the replicas.

pub mod order;
pub mod product;
pub mod status;

pub use order::*;
pub use product::*;
pub use status::*;
