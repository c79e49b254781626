//! # faqx API
//!
//! REST surface over a shared [`FaqAssistant`](faqx_similarity::FaqAssistant):
//! product listing, per-product question space and conversational answers.

pub mod rest;

pub use rest::{routes, RestApi, EMPTY_QUERY_WARNING};
