#![no_main]

use demvironment::extract::{parse_calibrated_params, parse_log, ExtractOptions, PsdOrder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Logs are decoded lossily, so any byte sequence is a candidate log
    let text = String::from_utf8_lossy(data);

    // Either order must succeed or fail gracefully, never panic
    for order in [PsdOrder::FileOrder, PsdOrder::ReverseScan] {
        let options = ExtractOptions::default().with_psd_order(order);
        if let Ok(record) = parse_log(&text, &options) {
            assert_eq!(record.psd.radii_list.len(), record.psd.dispersity);
        }
    }

    let _ = parse_calibrated_params(&text);
});
