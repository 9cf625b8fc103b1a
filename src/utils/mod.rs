pub mod rates_cache;
