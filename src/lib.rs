//! # Web3 basics
//!
//! A module with three small Concordium smart contracts:
//!
//! - [`counter`]: a counter that anyone can increment or decrement, but never
//!   below zero.
//! - [`call_once`]: a guard whose `initialize` entrypoint succeeds exactly
//!   once per instance.
//! - [`hello_web3`]: a contract that holds the greeting `"Hello Web3"`.
//!
//! Every entrypoint checks its guard before touching the state, so a rejected
//! call leaves the instance exactly as it was. The caller is read from the
//! receive context and only ever ends up in the logged events, never in the
//! logic.
//!
//! Run `cargo concordium test --out concordium-out/module.wasm.v1` to build
//! the module and run every test; the integration tests in `tests/` deploy
//! that file to a local test chain.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod call_once;
pub mod counter;
pub mod hello_web3;
