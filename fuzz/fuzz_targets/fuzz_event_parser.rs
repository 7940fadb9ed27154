#![no_main]

use cpstatus_core::{map_status, InboundEvent};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Should never panic on arbitrary trigger payloads
    if let Ok(event) = InboundEvent::from_json(data) {
        let valid = event.validate().is_ok();
        assert_eq!(
            valid,
            !event.execution_id.is_empty()
                && !event.github_token.is_empty()
                && !event.pipeline.is_empty()
        );
    }

    let lossy = String::from_utf8_lossy(data);
    let _ = map_status(&lossy);
});
