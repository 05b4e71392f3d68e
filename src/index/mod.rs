pub mod entity_store;
pub mod city_index;
pub mod driver_city;
pub mod ranking;
pub mod deferred;
