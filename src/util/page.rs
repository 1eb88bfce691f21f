/// Returns the system memory page size in bytes.
///
/// Falls back to 4096 when `sysconf` reports an error, which is the page
/// size on every platform this tool targets anyway.
pub fn page_size() -> usize {
    // SAFETY: sysconf(_SC_PAGESIZE) has no preconditions.
    let sz = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if sz > 0 {
        sz as usize
    } else {
        4096
    }
}

/// Rounds `n` up to the next multiple of `page` (which must be non-zero).
#[inline]
pub fn round_up_to_page(n: u64, page: usize) -> u64 {
    let page = page as u64;
    n.div_ceil(page) * page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_positive_power_of_two() {
        let p = page_size();
        assert!(p >= 512);
        assert_eq!(p & (p - 1), 0);
    }

    #[test]
    fn round_up_boundaries() {
        assert_eq!(round_up_to_page(0, 4096), 0);
        assert_eq!(round_up_to_page(1, 4096), 4096);
        assert_eq!(round_up_to_page(4096, 4096), 4096);
        assert_eq!(round_up_to_page(4097, 4096), 8192);
    }
}
