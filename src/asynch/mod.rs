pub mod channel;
pub mod debounce;
pub mod feature_cache;
pub mod join_gate;
pub mod operation;
pub mod urc;
pub mod urc_handler;
