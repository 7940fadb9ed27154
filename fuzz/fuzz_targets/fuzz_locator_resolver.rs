#![no_main]

use cpstatus_core::{resolve_str, LocatorHosts};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let hosts = LocatorHosts::default();

        // Raw input as a locator
        if let Ok(repo) = resolve_str(text, &hosts) {
            assert!(!repo.owner().is_empty());
            assert!(!repo.repo().is_empty());
            assert!(!repo.repo().contains('/'));
        }

        // Input spliced into both supported locator shapes
        let direct = format!("https://github.com/{}", text);
        let _ = resolve_str(&direct, &hosts);

        let redirect = format!(
            "https://eu-west-1.console.aws.amazon.com/codesuite/settings/connections/redirect?FullRepositoryId={}",
            text
        );
        if let Ok(repo) = resolve_str(&redirect, &hosts) {
            assert_eq!(repo.as_str().matches('/').count(), 1);
        }
    }
});
