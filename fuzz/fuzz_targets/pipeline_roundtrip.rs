#![no_main]
use huffpar::{compress, Backend, Error, PipelineConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, u8)| {
    let (input, nw) = data;
    let nw = (nw % 16) as usize + 1;

    let single = match compress(&input, &PipelineConfig::sequential()) {
        Ok(out) => out,
        Err(Error::EmptyInput) => {
            assert!(input.is_empty());
            return;
        }
        Err(e) => panic!("unexpected error: {e}"),
    };

    for backend in [Backend::Threads, Backend::Pool] {
        let out = compress(&input, &PipelineConfig::new(backend, nw)).unwrap();
        assert_eq!(out.bytes, single.bytes);
    }

    // Decode by matching accumulated bits against the code table.
    let mut decoded = Vec::with_capacity(input.len());
    let mut current = Vec::new();
    for i in 0..single.payload_bits {
        current.push((single.bytes[i / 8] >> (7 - i % 8)) & 1);
        if let Some((s, _)) = single.codes.iter().find(|(_, c)| *c == current.as_slice()) {
            decoded.push(s);
            current.clear();
        }
    }
    assert_eq!(decoded, input);
});
