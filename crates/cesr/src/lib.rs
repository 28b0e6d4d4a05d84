//! Command-line front end for the CESR stream decoder.
//!
//! The decoding engine lives in `cesr-core`; this crate adds input loading,
//! table selection and line-oriented rendering for the `cesr-decode` binary.

pub mod cli;
