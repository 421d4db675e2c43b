#![no_main]

use libfuzzer_sys::fuzz_target;
use logdoctor_analyzer::RecordParser;

fuzz_target!(|data: &[u8]| {
    let parser = RecordParser::new();
    if let Ok(record) = parser.parse(data) {
        // 보조 필드 접근은 타입이 달라도 패닉하지 않아야 함
        let _ = record.is_severe();
        let _ = record.extras.str("errorMessage");
        let _ = record.extras.nested_str("err", "message");
        let _ = record.extras.array("errors");
    }
});
