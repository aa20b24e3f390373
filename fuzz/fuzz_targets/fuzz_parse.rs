#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(doc) = gifti::from_slice(data) {
        let out = gifti::to_vec(&doc).unwrap();
        let back = gifti::from_slice(&out).unwrap();
        assert_eq!(back.number_of_data_arrays(), doc.number_of_data_arrays());
    }
});
