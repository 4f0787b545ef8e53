#![no_main]

use libfuzzer_sys::fuzz_target;
use portfolio_core::PortfolioConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = PortfolioConfig::from_json(text) else {
        return;
    };
    // Anything accepted must survive re-serialization unchanged.
    let json = serde_json::to_string(&config).expect("config serializes");
    let reparsed = PortfolioConfig::from_json(&json).expect("serialized config is valid");
    assert_eq!(reparsed, config);
});
