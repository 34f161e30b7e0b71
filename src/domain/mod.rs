// Domain layer: entities and the storage port. Nothing here knows about HTTP or caching.

pub mod model;
pub mod ports;
