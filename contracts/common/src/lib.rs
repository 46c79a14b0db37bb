//! Shared building blocks for the staking, governance and treasury contracts.
//!
//! This crate provides:
//! - [`AccessPolicy`]: the tiered admin capability every contract consults
//!   before a privileged mutation.
//! - Basis-point and fixed-point helpers used by reward and quorum math.

#![no_std]

pub mod access;
pub mod math;

pub use access::{AccessPolicy, AccessTier};
pub use math::{apply_bps, meets_bps, mul_div, mul_div_rem, BPS_DENOMINATOR};
