use crate::page_block::{self, PageBlock};
use crate::{OsPageReserver, PageReserver, mmap};

#[test]
fn test_reserve_regular_basic() {
    let block = PageBlock::reserve_regular(1024).expect("reserve 1024");
    assert_eq!(block.len(), 1024);
    assert!(!block.is_empty());
    assert_eq!(block.capacity(), mmap::page_size());
    assert_eq!(block.alignment(), mmap::page_size());
    assert!(block.addr().is_multiple_of(mmap::page_size()));
    assert!(!block.uses_large_pages());
}

#[test]
fn test_reserve_regular_zero_size() {
    let block = PageBlock::reserve_regular(0).expect("reserve 0");
    assert_eq!(block.len(), 0);
    assert!(block.is_empty());
    assert_eq!(
        block.capacity(),
        mmap::page_size(),
        "Zero size should map one page"
    );
}

#[test]
fn test_reserve_rounds_up_to_pages() {
    let page_size = mmap::page_size();
    let block = PageBlock::reserve_regular(page_size * 3 + 100).expect("reserve");
    assert_eq!(block.len(), page_size * 3 + 100);
    assert_eq!(block.capacity(), page_size * 4);

    let block = PageBlock::reserve_regular(page_size).expect("reserve");
    assert_eq!(block.capacity(), page_size);
}

#[test]
fn test_reserved_block_is_zero_filled() {
    let block = PageBlock::reserve_regular(64 * 1024).expect("reserve");
    assert!(block.iter().all(|&b| b == 0));
}

#[test]
fn test_block_write_read() {
    let size = 10 * 1024 * 1024;
    let mut block = PageBlock::reserve_regular(size).expect("reserve");
    block[0] = 1;
    block[size / 2] = 2;
    block[size - 1] = 3;

    let bytes: &[u8] = block.as_ref();
    assert_eq!(bytes[0], 1);
    assert_eq!(bytes[size / 2], 2);
    assert_eq!(bytes[size - 1], 3);
}

#[test]
fn test_block_debug() {
    let block = PageBlock::reserve_regular(1024).expect("reserve");
    let text = format!("{block:?}");
    assert!(text.contains("PageBlock"));
    assert!(text.contains("capacity"));
}

#[test]
fn test_page_sizes() {
    let regular = PageBlock::regular_page_size();
    let large = PageBlock::large_page_size();
    assert!(regular.is_power_of_two());
    assert!(large.is_power_of_two());
    assert!(large >= regular);
}

#[test]
fn test_reserve_large_pages_when_available() {
    if let Err(e) = page_block::check_and_enable_large_page_support() {
        println!("large pages unavailable: {e:?}");
        return;
    }
    let Ok(block) = PageBlock::reserve_large(1024 * 1024) else {
        return;
    };
    assert!(block.uses_large_pages());
    assert_eq!(block.alignment(), PageBlock::large_page_size());
    assert!(block.addr().is_multiple_of(PageBlock::large_page_size()));
    assert!(block.iter().all(|&b| b == 0));
}

#[test]
fn test_reserve_with_fallback_always_succeeds() {
    let block = PageBlock::reserve_with_fallback(4096).expect("fallback reserve");
    assert_eq!(block.len(), 4096);
    if block.uses_large_pages() {
        assert_eq!(block.alignment(), PageBlock::large_page_size());
    } else {
        assert_eq!(block.alignment(), PageBlock::regular_page_size());
    }
}

#[test]
fn test_os_reserver() {
    let reserver = OsPageReserver::regular();
    assert!(!reserver.prefers_large_pages());
    let block = reserver.reserve(5000).expect("reserve");
    assert_eq!(block.len(), 5000);
    assert!(block.iter().all(|&b| b == 0));

    let reserver = OsPageReserver::large_pages();
    assert!(reserver.prefers_large_pages());
    let block = (&reserver).reserve(100).expect("reserve");
    assert_eq!(block.len(), 100);
}

#[test]
fn test_reserve_helper() {
    let block = crate::reserve(256).expect("reserve");
    assert_eq!(block.len(), 256);
}

#[test]
fn test_many_blocks_are_disjoint() {
    let blocks: Vec<_> = [512usize, 1024, 4096, 8192]
        .iter()
        .map(|&size| PageBlock::reserve_regular(size).expect("reserve"))
        .collect();
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            let overlap = a.addr() < b.addr() + b.capacity() && b.addr() < a.addr() + a.capacity();
            assert!(!overlap);
        }
    }
}

#[test]
fn test_ensure_zeroed_clears_unless_backend_zero_fills() {
    let mut block = PageBlock::reserve_regular(300).expect("reserve 300");
    block.fill(0xAB);

    block.ensure_zeroed(true);
    assert!(block.iter().all(|&b| b == 0xAB));

    block.ensure_zeroed(false);
    assert!(block.iter().all(|&b| b == 0));
    assert_eq!(block.len(), 300);
}
