#![no_main]

use demvironment::registry::MetadataRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    // Anything accepted as a record must survive being written back out
    if let Ok(record) = MetadataRecord::from_value(value) {
        let text = record.to_pretty_string().unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(MetadataRecord::from_value(reparsed).unwrap(), record);
    }
});
