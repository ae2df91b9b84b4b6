/// Width of the zero-padded numeric suffix.
pub const ID_WIDTH: usize = 4;

/// Next identifier for `prefix`, one past the largest numeric suffix in use.
///
/// Ids that do not start with `prefix` or whose remainder is not all digits
/// are ignored. Two callers working from the same snapshot get the same id;
/// nothing here guards against that.
pub fn next_id<'a, I>(existing: I, prefix: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|id| numeric_suffix(id.trim(), prefix))
        .max()
        .unwrap_or(0);
    format!("{}{:0width$}", prefix, max.saturating_add(1), width = ID_WIDTH)
}

fn numeric_suffix(id: &str, prefix: &str) -> Option<u64> {
    let suffix = id.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one() {
        assert_eq!(next_id(std::iter::empty(), "REQ-"), "REQ-0001");
    }

    #[test]
    fn skips_malformed_suffixes() {
        assert_eq!(next_id(["REQ-0001", "REQ-XYZ"], "REQ-"), "REQ-0002");
        assert_eq!(next_id(["REQ-", "REQ-12a", "REQ--3"], "REQ-"), "REQ-0001");
    }

    #[test]
    fn uses_max_not_count() {
        assert_eq!(next_id(["REQ-0007", "REQ-0002"], "REQ-"), "REQ-0008");
    }

    #[test]
    fn ignores_other_prefixes() {
        assert_eq!(next_id(["PO-0040", "RQ0009", "REQ-0003"], "REQ-"), "REQ-0004");
        assert_eq!(next_id(["RQ0009", "REQ-0003"], "RQ"), "RQ0010");
    }

    #[test]
    fn grows_past_the_pad_width() {
        assert_eq!(next_id(["REQ-9999"], "REQ-"), "REQ-10000");
    }
}
