#![no_main]
use grob::{Alignment, ListOptions, ProgramOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding, serializing and emitting must never panic
    if let Ok(bitmap) = grob::bmp::decode(data) {
        assert_eq!(bitmap.pixels().len(), bitmap.pixel_data_len());
        let _ = grob::program::emit(&bitmap, &ProgramOptions::default());
    }

    let columns = data.first().map_or(1, |&b| usize::from(b % 16) + 1);
    let options = ListOptions::default().with_columns(columns);
    let text = grob::list::serialize(data, &options).unwrap();
    assert_eq!(text.matches('\n').count(), data.len().div_ceil(8).div_ceil(columns));

    let strict = options.with_alignment(Alignment::Reject);
    assert_eq!(grob::list::serialize(data, &strict).is_ok(), data.len() % 8 == 0);
});
