#![no_main]

use libfuzzer_sys::fuzz_target;
use logdoctor_analyzer::{LogScanner, ScannerConfig, SelectorRegistry};

fuzz_target!(|data: &[u8]| {
    let scanner = LogScanner::new(ScannerConfig::default(), SelectorRegistry::with_defaults());
    let mut session = scanner.session();
    for line in data.split(|&b| b == b'\n') {
        session.process_line(line);
    }
    let outcome = session.finish(None);
    assert_eq!(outcome.digest.is_empty(), outcome.stats.severe_records == 0);
});
