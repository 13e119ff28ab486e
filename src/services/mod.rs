pub mod quotes;
pub mod db_init;

pub mod passwords;
pub mod user_store;
pub mod auth_service;
pub mod investor_service;
pub mod agent_service;
pub mod ledger_service;
pub mod order_service;
pub mod contract_service;
pub mod geo_service;
