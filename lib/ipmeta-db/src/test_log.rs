/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

use std::cell::RefCell;
use std::sync::Once;

thread_local! {
    static WARNINGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

struct WarnCollector;

static COLLECTOR: WarnCollector = WarnCollector;

impl log::Log for WarnCollector {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            WARNINGS.with(|w| w.borrow_mut().push(record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Run `f` and return the warnings it logged.
///
/// Collection is per thread, so concurrently running tests do not see each
/// other's warnings.
pub(crate) fn capture_warnings<F: FnOnce()>(f: F) -> Vec<String> {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&COLLECTOR).unwrap();
        log::set_max_level(log::LevelFilter::Warn);
    });

    WARNINGS.with(|w| w.borrow_mut().clear());
    f();
    WARNINGS.with(|w| w.take())
}
