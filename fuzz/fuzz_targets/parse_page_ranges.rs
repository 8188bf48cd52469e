#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfdeck::range;

fuzz_target!(|data: &[u8]| {
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let page_count = u32::from(count);
    let expression = String::from_utf8_lossy(rest);

    let Ok(ranges) = range::parse(&expression, page_count) else {
        return;
    };

    // Every accepted range lies inside the document
    for r in &ranges {
        assert!(r.start() >= 1 && r.start() <= r.end() && r.end() <= page_count);
    }

    // Canonical form parses back to the same pages
    let pages: Vec<u32> = range::expand(&ranges).into_iter().collect();
    let canonical = range::pages_to_expression(&pages);
    let reparsed = range::parse(&canonical, page_count).unwrap();
    assert_eq!(range::expand(&reparsed).into_iter().collect::<Vec<_>>(), pages);
});
