// src/chain/mod.rs

pub mod agw;
pub mod client;
pub mod deploy;
pub mod erc20;
