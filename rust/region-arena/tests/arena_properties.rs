use region_arena::{Arena, CommandPayload, Region, Span};

fn random_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|_| fastrand::u8(..)).collect()
}

#[test]
fn test_random_allocations_stay_in_bounds() {
    fastrand::seed(9472617);
    let capacity = 64 * 1024;
    let mut arena = Arena::new(capacity);

    for _ in 0..2000 {
        let size = fastrand::u64(0..2048);
        let used = arena.used();
        match arena.allocate(size) {
            Some(span) => {
                assert!(size <= capacity as u64 - used);
                assert_eq!(span.offset(), used);
                assert_eq!(span.len(), size);
                assert!(span.offset() + span.len() <= arena.capacity());
                assert_eq!(arena.used(), used + size);
            }
            None => {
                assert!(size > capacity as u64 - used);
                assert_eq!(arena.used(), used);
                assert!(arena.allocate(size).is_none());
                assert_eq!(arena.used(), used);
                arena.reset();
            }
        }
        assert!(arena.used() <= arena.capacity());
    }
}

#[test]
fn test_emplaced_bytes_read_back() {
    fastrand::seed(31337);
    let mut arena = Arena::new(256 * 1024);
    let mut stored: Vec<(Span, Vec<u8>)> = Vec::new();

    loop {
        let data = random_bytes(fastrand::usize(0..700));
        let Some(span) = arena.emplace(&data) else {
            break;
        };
        stored.push((span, data));
    }

    assert!(stored.len() > 100);
    for (span, data) in &stored {
        assert!(arena.is_current(*span));
        assert_eq!(arena.bytes(*span).unwrap(), data.as_slice());
    }
}

#[test]
fn test_reset_after_exhaustion_allows_full_allocation() {
    fastrand::seed(5);
    for _ in 0..20 {
        let capacity = fastrand::u32(1..32 * 1024);
        let mut arena = Arena::new(capacity);
        while arena.allocate(fastrand::u64(1..512)).is_some() {}
        arena.reset();
        assert_eq!(arena.used(), 0);
        assert!(arena.allocate(capacity as u64).is_some());
        assert_eq!(arena.remaining(), 0);
    }
}

#[test]
fn test_sub_arenas_partition_the_parent() {
    fastrand::seed(777);
    let mut arena = Arena::new(16 * 1024);
    let mut offsets = Vec::new();

    while arena.remaining() > 0 {
        let size = fastrand::u64(1..=1024).min(arena.remaining());
        let start = arena.used();
        let fill = (offsets.len() % 251) as u8 + 1;
        {
            let mut sub = arena.carve_region(size);
            assert_eq!(sub.capacity(), size);
            sub.alloc_bytes(size).unwrap().fill(fill);
            assert!(sub.allocate(1).is_none());
        }
        assert_eq!(arena.used(), start + size);
        offsets.push((start, size, fill));
    }

    arena.reset();
    let whole = arena.allocate(arena.capacity()).unwrap();
    let bytes = arena.bytes(whole).unwrap();
    for (start, size, fill) in offsets {
        let range = start as usize..(start + size) as usize;
        assert!(bytes[range].iter().all(|&b| b == fill));
    }
}

#[test]
fn test_command_payloads_share_one_arena() {
    fastrand::seed(42);
    let mut data = Arena::new(8 * 1024);
    let payloads: Vec<_> = (0..64)
        .map(|_| {
            let bytes = random_bytes(fastrand::usize(1..100));
            let payload = CommandPayload::emplace(&mut data, &bytes).unwrap();
            (payload, bytes)
        })
        .collect();

    for (payload, bytes) in &payloads {
        assert_eq!(payload.size as usize, bytes.len());
        assert_eq!(payload.bytes(&data).unwrap(), bytes.as_slice());
    }
}
