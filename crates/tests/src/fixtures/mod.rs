pub mod seed;
pub mod stock_host;
pub mod stub_backend;
