#![doc(test(attr(deny(warnings))))]

//! MaPocket core keeps budget projects consistent: a category → subcategory →
//! expense line tree whose derived amounts are recalculated bottom-up, exactly
//! once per edit.

pub mod budget;
pub mod config;
pub mod currency;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("MaPocket core tracing initialized.");
    });
}
